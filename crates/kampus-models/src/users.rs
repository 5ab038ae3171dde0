//! User domain models and role resolution.
//!
//! A [`User`] may have at most one [`UserProfile`] which carries its school
//! role ([`UserType`]). Requests are attributed to a [`Principal`] (the
//! authenticated identity from the access token) and resolved to a [`Role`].
//!
//! # Role resolution
//!
//! | Principal | Profile | Staff flag | Role |
//! |-----------|---------|------------|------|
//! | none | - | - | `Anonymous` |
//! | some | `user_type` | - | that type |
//! | some | none | set | `Admin` |
//! | some | none | unset | `Unknown` |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// A user account.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_staff: bool,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn principal(&self) -> Principal {
        Principal {
            user_id: self.id,
            email: self.email.clone(),
            is_staff: self.is_staff,
        }
    }
}

/// A user together with its stored password hash. Never serialized.
#[derive(FromRow, Debug, Clone)]
pub struct UserCredentials {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub is_staff: bool,
    pub is_active: bool,
}

/// School role stored on a user profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Student,
    Teacher,
    Admin,
}

impl UserType {
    pub fn as_str(self) -> &'static str {
        match self {
            UserType::Student => "student",
            UserType::Teacher => "teacher",
            UserType::Admin => "admin",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(UserType::Student),
            "teacher" => Ok(UserType::Teacher),
            "admin" => Ok(UserType::Admin),
            other => Err(format!("Invalid user type: {}", other)),
        }
    }
}

/// Optional one-to-one profile attached to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    pub user_id: Uuid,
    pub user_type: UserType,
}

/// The authenticated identity behind a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Principal {
    pub user_id: Uuid,
    pub email: String,
    pub is_staff: bool,
}

/// Role resolved for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
    Admin,
    /// Authenticated, but no profile and no staff flag (or the profile could not be read).
    Unknown,
    /// No authenticated principal.
    Anonymous,
}

impl Role {
    /// Resolve the role of an authenticated user from its staff flag and profile.
    pub fn from_profile(is_staff: bool, user_type: Option<UserType>) -> Self {
        match user_type {
            Some(user_type) => user_type.into(),
            None if is_staff => Role::Admin,
            None => Role::Unknown,
        }
    }

    /// The `user_type` value exposed on requests; `None` for anonymous requests.
    pub fn user_type(self) -> Option<&'static str> {
        match self {
            Role::Student => Some("student"),
            Role::Teacher => Some("teacher"),
            Role::Admin => Some("admin"),
            Role::Unknown => Some("unknown"),
            Role::Anonymous => None,
        }
    }

    pub fn is_authenticated(self) -> bool {
        self != Role::Anonymous
    }
}

impl From<UserType> for Role {
    fn from(user_type: UserType) -> Self {
        match user_type {
            UserType::Student => Role::Student,
            UserType::Teacher => Role::Teacher,
            UserType::Admin => Role::Admin,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.user_type().unwrap_or("anonymous"))
    }
}

/// Principal and resolved role of the current request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CurrentUser {
    pub principal: Option<Principal>,
    pub role: Role,
}

impl CurrentUser {
    pub fn anonymous() -> Self {
        Self {
            principal: None,
            role: Role::Anonymous,
        }
    }

    pub fn is_staff(&self) -> bool {
        self.principal.as_ref().is_some_and(|p| p.is_staff)
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.principal.as_ref().map(|p| p.user_id)
    }

    /// Identity used in log lines.
    pub fn identity(&self) -> &str {
        self.principal
            .as_ref()
            .map(|p| p.email.as_str())
            .unwrap_or("anonymous")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_wins_over_staff_flag() {
        assert_eq!(Role::from_profile(true, Some(UserType::Teacher)), Role::Teacher);
        assert_eq!(Role::from_profile(false, Some(UserType::Student)), Role::Student);
        assert_eq!(Role::from_profile(false, Some(UserType::Admin)), Role::Admin);
    }

    #[test]
    fn test_missing_profile() {
        assert_eq!(Role::from_profile(true, None), Role::Admin);
        assert_eq!(Role::from_profile(false, None), Role::Unknown);
    }

    #[test]
    fn test_user_type_strings() {
        assert_eq!(Role::Unknown.user_type(), Some("unknown"));
        assert_eq!(Role::Anonymous.user_type(), None);
        assert!(!Role::Anonymous.is_authenticated());
        assert!(Role::Unknown.is_authenticated());
    }

    #[test]
    fn test_parse_user_type() {
        assert_eq!("teacher".parse::<UserType>(), Ok(UserType::Teacher));
        assert!("Teacher".parse::<UserType>().is_err());
        assert!("".parse::<UserType>().is_err());
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Teacher).unwrap(), r#""teacher""#);
    }

    #[test]
    fn test_anonymous_identity() {
        let current = CurrentUser::anonymous();
        assert_eq!(current.identity(), "anonymous");
        assert!(!current.is_staff());
        assert_eq!(current.user_id(), None);
    }
}
