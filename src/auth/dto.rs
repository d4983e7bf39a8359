use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Request body for both registration and login. Fields are optional so that a missing
/// value is reported by the handler instead of the JSON extractor.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl CredentialsRequest {
    /// Email and password exactly as sent, or `None` if either is absent or empty.
    pub fn into_parts(self) -> Option<(String, String)> {
        let email = self.email.filter(|e| !e.is_empty())?;
        let password = self.password.filter(|p| !p.is_empty())?;
        Some((email, password))
    }
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
}

#[derive(Debug, Serialize)]
pub struct ProtectedResponse {
    pub logged_in_as: String,
    pub message: String,
}

/// Public part of the user returned to clients.
#[derive(Debug, Serialize, FromRow)]
pub struct PublicUser {
    pub id: i64,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> CredentialsRequest {
        serde_json::from_str(json).expect("valid json")
    }

    #[test]
    fn complete_credentials_are_accepted() {
        let (email, password) = parse(r#"{"email":"a@example.com","password":" pw "}"#)
            .into_parts()
            .expect("parts");
        assert_eq!(email, "a@example.com");
        assert_eq!(password, " pw ");
    }

    #[test]
    fn whitespace_is_not_missing() {
        let (email, _) = parse(r#"{"email":"   ","password":"pw"}"#)
            .into_parts()
            .expect("parts");
        assert_eq!(email, "   ");
    }

    #[test]
    fn absent_null_or_empty_fields_are_missing() {
        assert!(parse(r#"{}"#).into_parts().is_none());
        assert!(parse(r#"{"email":"a@example.com"}"#).into_parts().is_none());
        assert!(parse(r#"{"password":"pw"}"#).into_parts().is_none());
        assert!(parse(r#"{"email":null,"password":"pw"}"#).into_parts().is_none());
        assert!(parse(r#"{"email":"a@example.com","password":""}"#).into_parts().is_none());
    }

    #[test]
    fn public_user_has_no_hash() {
        let json = serde_json::to_value(PublicUser {
            id: 1,
            email: "a@example.com".into(),
        })
        .expect("serialize");
        assert_eq!(json, serde_json::json!({"id": 1, "email": "a@example.com"}));
    }
}
