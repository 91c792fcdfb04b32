use dotenv::dotenv;
use finance_dashboard_backend::app::app::App;
use finance_dashboard_backend::util::logger::Logger;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env before the logger so LOG_DIR and RUST_LOG apply
    let dotenv_result = dotenv();
    let _logger = Logger::new()?;

    info!("🚀 Starting Finance Dashboard Backend");
    match dotenv_result {
        Ok(_) => info!("✅ Successfully loaded .env file"),
        Err(e) => warn!("⚠️ Failed to load .env file: {} (using system env vars)", e),
    }

    let app = match App::new().await {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to initialise application: {}", e);
            return Err(e.into());
        }
    };
    app.start().await?;
    Ok(())
}
