use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::auth_models::UserResponse;

/// Both fields are optional at the wire level so a missing key and an
/// empty string produce the same 400 instead of a deserialization error.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(required, length(min = 1))]
    pub username: Option<String>,
    #[validate(required, length(min = 1))]
    pub password: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub user: UserResponse,
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn login_request_rejects_missing_fields() {
        let request: LoginRequest = serde_json::from_str(r#"{"username": "admin"}"#).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn login_request_rejects_empty_strings() {
        let request: LoginRequest =
            serde_json::from_str(r#"{"username": "admin", "password": ""}"#).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn login_request_accepts_complete_credentials() {
        let request: LoginRequest =
            serde_json::from_str(r#"{"username": "admin", "password": "admin123"}"#).unwrap();
        assert!(request.validate().is_ok());
    }

    #[test]
    fn login_response_serializes_expected_keys() {
        let response = LoginResponse {
            success: true,
            token: "signed-jwt".to_string(),
            user: UserResponse {
                id: Uuid::new_v4(),
                username: "admin".to_string(),
                role: "admin".to_string(),
            },
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["token"], "signed-jwt");
        assert_eq!(json["user"]["username"], "admin");
        assert_eq!(json["user"]["role"], "admin");
        assert!(json["user"]["id"].is_string());
    }
}
