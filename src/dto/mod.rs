pub mod analytics_dto;
pub mod api_response;
pub mod auth_dto;
pub mod chart_dto;
pub mod dashboard_dto;
pub mod transaction_dto;

use validator::ValidationErrors;

/// Picks one human readable message from a failed `validate()`, checking
/// fields in `priority` order so the reply does not depend on map ordering.
pub fn first_validation_message(errors: &ValidationErrors, priority: &[&str]) -> String {
    let field_errors = errors.field_errors();
    for field in priority {
        if let Some(errs) = field_errors.get(*field) {
            if let Some(message) = errs.iter().find_map(|e| e.message.as_ref()) {
                return message.to_string();
            }
        }
    }
    format!("Validation error: {}", errors)
}
