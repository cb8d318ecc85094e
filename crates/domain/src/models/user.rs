//! User and authentication models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::time::optional_timestamp;
use validator::Validate;

use super::event::UserId;

lazy_static::lazy_static! {
    static ref USERNAME_REGEX: regex::Regex =
        regex::Regex::new(r"^[A-Za-z0-9_.\-]+$").unwrap();
}

/// A user account as returned by login and sign-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub department: String,
    pub year: String,
    #[serde(default)]
    pub is_organizer: bool,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub profile_picture: Option<String>,
}

impl User {
    /// Organizers and admins may create events.
    pub fn can_create_events(&self) -> bool {
        self.is_organizer || self.is_admin
    }

    /// Owners and admins may edit or delete an event.
    pub fn can_manage(&self, created_by: UserId) -> bool {
        self.is_admin || self.id == created_by
    }
}

/// Request to log in.
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Request to create an account.
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct SignUpRequest {
    #[validate(length(min = 3, max = 80, message = "Username must be 3-80 characters"))]
    #[validate(regex(
        path = *USERNAME_REGEX,
        message = "Username may only contain letters, digits, '_', '.' and '-'"
    ))]
    pub username: String,

    #[validate(email(message = "Invalid email format"), length(max = 120))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    #[validate(length(min = 1, max = 100, message = "Department is required"))]
    pub department: String,

    #[validate(length(min = 1, max = 20, message = "Year is required"))]
    pub year: String,

    pub is_organizer: bool,
}

/// Response for login and sign-up.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AuthResponse {
    #[serde(default)]
    pub message: String,
    pub token: String,
    pub user: User,
}

/// Per-user participation counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProfileStatistics {
    pub events_created: u64,
    pub events_registered: u64,
    pub events_attended: u64,
}

/// The caller's profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Profile {
    #[serde(flatten)]
    pub user: User,
    #[serde(default, with = "optional_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub statistics: ProfileStatistics,
}

/// Response for `GET /profile`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProfileResponse {
    pub profile: Profile,
}

/// Request to update the caller's profile. Absent fields are unchanged.
#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 3, max = 80, message = "Username must be 3-80 characters"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Department cannot be empty"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,

    #[validate(length(min = 1, max = 20, message = "Year cannot be empty"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: UserId) -> User {
        User {
            id,
            username: "asha".to_string(),
            email: "asha@college.edu".to_string(),
            department: "Civil Engineering".to_string(),
            year: "3".to_string(),
            is_organizer: false,
            is_admin: false,
            profile_picture: None,
        }
    }

    #[test]
    fn test_permissions() {
        let mut u = user(5);
        assert!(!u.can_create_events());
        assert!(u.can_manage(5));
        assert!(!u.can_manage(6));

        u.is_admin = true;
        assert!(u.can_create_events());
        assert!(u.can_manage(6));
    }

    #[test]
    fn test_login_request_validation() {
        let valid = LoginRequest {
            email: "asha@college.edu".to_string(),
            password: "secret".to_string(),
        };
        assert!(valid.validate().is_ok());

        let invalid = LoginRequest {
            email: "asha".to_string(),
            password: String::new(),
        };
        let errors = invalid.validate().unwrap_err();
        assert_eq!(errors.field_errors().len(), 2);
    }

    #[test]
    fn test_sign_up_username_rules() {
        let mut request = SignUpRequest {
            username: "asha_k".to_string(),
            email: "asha@college.edu".to_string(),
            password: "secret1".to_string(),
            department: "Civil Engineering".to_string(),
            year: "3".to_string(),
            is_organizer: false,
        };
        assert!(request.validate().is_ok());

        request.username = "asha k!".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_profile_flattens_user() {
        let json = r#"{"profile":{"id":5,"username":"asha","email":"asha@college.edu",
            "department":"Civil Engineering","year":"3","is_organizer":true,"is_admin":false,
            "created_at":"2024-08-01T09:00:00","profile_picture":null,
            "statistics":{"events_created":2,"events_registered":4,"events_attended":1}}}"#;
        let response: ProfileResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.profile.user.id, 5);
        assert!(response.profile.user.is_organizer);
        assert_eq!(response.profile.statistics.events_registered, 4);
        assert!(response.profile.created_at.is_some());
    }

    #[test]
    fn test_update_profile_omits_absent_fields() {
        let request = UpdateProfileRequest {
            year: Some("4".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({"year": "4"}));
    }
}
