use serde::Serialize;

/// Success envelope shared by every JSON endpoint.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        ApiResponse { success: true, message: message.into(), data: Some(data), pagination: None }
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        ApiResponse { success: true, message: message.into(), data: None, pagination: None }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_omits_empty_fields() {
        let value = serde_json::to_value(ApiResponse::message("Password changed successfully")).unwrap();
        assert_eq!(value, json!({ "success": true, "message": "Password changed successfully" }));
    }

    #[test]
    fn test_envelope_with_pagination() {
        let response = ApiResponse::ok("ok", vec![1, 2]).with_pagination(Pagination { page: 1, limit: 2, total: 5 });
        let value = serde_json::to_value(response).unwrap();
        assert_eq!(value["pagination"], json!({ "page": 1, "limit": 2, "total": 5 }));
        assert_eq!(value["data"], json!([1, 2]));
    }
}
