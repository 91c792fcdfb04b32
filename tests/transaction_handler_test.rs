mod common;

use axum::body::to_bytes;
use axum::http::{header, StatusCode};
use common::{days_ago, demo_token, request, send, send_raw, test_app, tx, TestApp};
use finance_dashboard_backend::model::transaction::Transaction;
use serde_json::json;

fn sample() -> Vec<Transaction> {
    vec![
        tx("user_001", "Alice", 100.0, "Revenue", "Completed", &days_ago(1)),
        tx("user_002", "Bob", 40.0, "Food", "Pending", &days_ago(3)),
        tx("user_001", "Alice", 25.0, "Transport", "Completed", &days_ago(10)),
        tx("user_003", "Carol", 300.0, "Revenue", "Failed", &days_ago(40)),
        tx("user_002", "Bob", 60.0, "Food", "Completed", &days_ago(100)),
    ]
}

async fn setup() -> (TestApp, String) {
    let app = test_app(sample());
    let token = demo_token(&app.router).await;
    (app, token)
}

#[tokio::test]
async fn test_list_requires_token() {
    let app = test_app(sample());
    let (status, body) = send(&app.router, request("GET", "/api/transactions", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Access token required");
}

#[tokio::test]
async fn test_list_defaults_newest_first() {
    let (app, token) = setup().await;
    let (status, body) = send(&app.router, request("GET", "/api/transactions", Some(&token), None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Transactions retrieved successfully");
    assert_eq!(body["pagination"], json!({ "page": 1, "limit": 10, "total": 5 }));
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0]["amount"], 100.0);
    assert_eq!(rows[0]["type"], "Income");
    assert_eq!(rows[0]["email"], "user_001@example.com");
    assert_eq!(rows[1]["type"], "Expense");
    assert_eq!(rows[4]["amount"], 60.0);
}

#[tokio::test]
async fn test_list_pagination() {
    let (app, token) = setup().await;
    let (status, body) =
        send(&app.router, request("GET", "/api/transactions?page=2&limit=2", Some(&token), None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"], json!({ "page": 2, "limit": 2, "total": 5 }));
    let names: Vec<&str> = body["data"].as_array().unwrap().iter().map(|r| r["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Alice", "Carol"]);
}

#[tokio::test]
async fn test_list_filters() {
    let (app, token) = setup().await;
    let cases = [
        ("/api/transactions?dateRange=7days", 2),
        ("/api/transactions?dateRange=30days", 3),
        ("/api/transactions?type=income", 2),
        ("/api/transactions?type=expense", 3),
        ("/api/transactions?search=bob", 2),
        ("/api/transactions?search=USER_003", 1),
        ("/api/transactions?category=food", 2),
        ("/api/transactions?status=completed", 3),
        ("/api/transactions?status=all&category=all", 5),
        ("/api/transactions?type=expense&dateRange=30days", 2),
    ];
    for (uri, expected) in cases {
        let (status, body) = send(&app.router, request("GET", uri, Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK, "{}", uri);
        assert_eq!(body["pagination"]["total"], expected, "{}", uri);
        assert_eq!(body["data"].as_array().unwrap().len(), expected as usize, "{}", uri);
    }
}

#[tokio::test]
async fn test_list_sort_by_amount_ascending() {
    let (app, token) = setup().await;
    let (_, body) = send(
        &app.router,
        request("GET", "/api/transactions?sortField=amount&sortDirection=asc", Some(&token), None),
    )
    .await;
    let amounts: Vec<f64> = body["data"].as_array().unwrap().iter().map(|r| r["amount"].as_f64().unwrap()).collect();
    assert_eq!(amounts, vec![25.0, 40.0, 60.0, 100.0, 300.0]);
}

#[tokio::test]
async fn test_list_rejects_invalid_params() {
    let (app, token) = setup().await;
    for uri in [
        "/api/transactions?limit=0",
        "/api/transactions?limit=1000",
        "/api/transactions?page=0",
        "/api/transactions?page=abc",
        "/api/transactions?sortField=password",
        "/api/transactions?sortDirection=sideways",
        "/api/transactions?dateRange=yesterday",
        "/api/transactions?type=transfer",
        "/api/transactions?page=18446744073709551615",
        "/api/transactions?page=9223372036854775807&limit=100",
    ] {
        let (status, body) = send(&app.router, request("GET", uri, Some(&token), None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body["success"], false, "{}", uri);
    }
}

#[tokio::test]
async fn test_export_csv() {
    let (app, token) = setup().await;
    let payload = json!({
        "columns": ["name", "amount", "category"],
        "filters": { "type": "expense" },
        "sort": { "field": "amount", "direction": "asc" },
        "format": "csv"
    });
    let resp = send_raw(&app.router, request("POST", "/api/transactions/export", Some(&token), Some(payload))).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::CONTENT_TYPE], "text/csv");
    assert_eq!(resp.headers()[header::CONTENT_DISPOSITION], "attachment; filename=transactions.csv");
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines, vec!["name,amount,category", "Alice,25,Transport", "Bob,40,Food", "Bob,60,Food"]);
}

#[tokio::test]
async fn test_export_with_date_bounds() {
    let (app, token) = setup().await;
    let start = days_ago(20);
    let payload = json!({
        "columns": ["category"],
        "dateRange": { "start": &start[..10], "end": &days_ago(0)[..10] }
    });
    let resp = send_raw(&app.router, request("POST", "/api/transactions/export", Some(&token), Some(payload))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    // Header plus the three transactions of the last ten days.
    assert_eq!(text.lines().count(), 4);
}

#[tokio::test]
async fn test_export_validation() {
    let (app, token) = setup().await;
    let cases = [
        (json!({ "columns": [] }), Some("At least one column must be selected")),
        (json!({ "columns": ["name"], "format": "pdf" }), Some("Unsupported export format: pdf")),
        (json!({ "columns": ["password"] }), Some("Unknown export column: password")),
        (json!({ "columns": ["name"], "dateRange": { "start": "soon", "end": "2024-01-01" } }), None),
        (json!({ "columns": ["name"], "filters": { "dateRange": "forever" } }), None),
    ];
    for (payload, message) in cases {
        let (status, body) =
            send(&app.router, request("POST", "/api/transactions/export", Some(&token), Some(payload.clone()))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", payload);
        if let Some(message) = message {
            assert_eq!(body["message"], message);
        }
    }
}

#[tokio::test]
async fn test_export_requires_token() {
    let app = test_app(sample());
    let (status, _) =
        send(&app.router, request("POST", "/api/transactions/export", None, Some(json!({ "columns": ["name"] })))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
