//! # Kampus CLI
//!
//! Account and role administration used by the `kampus-cli` binary.
//!
//! The commands work against any [`Directory`], so they run the same way on
//! Postgres and on the in-memory directory.
//!
//! ```ignore
//! use kampus_cli::{create_admin, NewAdmin};
//!
//! let user = create_admin(&directory, NewAdmin { .. }).await?;
//! ```

use kampus_core::hash_password;
use kampus_db::{Directory, DirectoryError, NewUser};
use kampus_models::{User, UserType};
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error("User with email {0} already exists")]
    DuplicateEmail(String),
    #[error("No user with email {0}")]
    UserNotFound(String),
    #[error("Failed to hash password: {0}")]
    Password(String),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

/// Fields for a new administrator account.
#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Create a staff user with an `admin` profile.
pub async fn create_admin(directory: &dyn Directory, admin: NewAdmin) -> Result<User, AdminError> {
    if directory.find_user_by_email(&admin.email).await?.is_some() {
        return Err(AdminError::DuplicateEmail(admin.email));
    }

    let password_hash =
        hash_password(&admin.password).map_err(|e| AdminError::Password(e.to_string()))?;

    let user = directory
        .create_user(NewUser {
            first_name: admin.first_name,
            last_name: admin.last_name,
            email: admin.email,
            password_hash,
            is_staff: true,
        })
        .await?;
    directory.set_user_type(user.id, Some(UserType::Admin)).await?;

    info!(user_id = %user.id, email = %user.email, "Administrator created");
    Ok(user)
}

/// Attach or replace the profile of the user with `email`.
pub async fn set_role(
    directory: &dyn Directory,
    email: &str,
    user_type: UserType,
) -> Result<User, AdminError> {
    let user = find_by_email(directory, email).await?;
    directory.set_user_type(user.id, Some(user_type)).await?;
    info!(user_id = %user.id, user_type = %user_type, "Profile updated");
    Ok(user)
}

/// Remove the profile of the user with `email`.
pub async fn clear_role(directory: &dyn Directory, email: &str) -> Result<User, AdminError> {
    let user = find_by_email(directory, email).await?;
    directory.set_user_type(user.id, None).await?;
    info!(user_id = %user.id, "Profile removed");
    Ok(user)
}

async fn find_by_email(directory: &dyn Directory, email: &str) -> Result<User, AdminError> {
    directory
        .find_user_by_email(email)
        .await?
        .ok_or_else(|| AdminError::UserNotFound(email.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kampus_core::verify_password;
    use kampus_db::InMemoryDirectory;

    fn admin(email: &str) -> NewAdmin {
        NewAdmin {
            first_name: "Zeynep".to_string(),
            last_name: "Kaya".to_string(),
            email: email.to_string(),
            password: "s3cret-pass".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_admin_sets_staff_and_profile() {
        let directory = InMemoryDirectory::new();
        let user = create_admin(&directory, admin("root@kampus.edu")).await.unwrap();

        assert!(user.is_staff);
        let profile = directory.find_profile(user.id).await.unwrap().unwrap();
        assert_eq!(profile.user_type, UserType::Admin);

        let creds = directory
            .find_credentials("root@kampus.edu")
            .await
            .unwrap()
            .unwrap();
        assert!(verify_password("s3cret-pass", &creds.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_create_admin_rejects_duplicate() {
        let directory = InMemoryDirectory::new();
        create_admin(&directory, admin("root@kampus.edu")).await.unwrap();
        let err = create_admin(&directory, admin("root@kampus.edu"))
            .await
            .unwrap_err();
        assert!(matches!(err, AdminError::DuplicateEmail(_)));
    }

    #[tokio::test]
    async fn test_set_and_clear_role() {
        let directory = InMemoryDirectory::new();
        let user = create_admin(&directory, admin("t@kampus.edu")).await.unwrap();

        set_role(&directory, "t@kampus.edu", UserType::Teacher).await.unwrap();
        let profile = directory.find_profile(user.id).await.unwrap().unwrap();
        assert_eq!(profile.user_type, UserType::Teacher);

        clear_role(&directory, "t@kampus.edu").await.unwrap();
        assert!(directory.find_profile(user.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_email() {
        let directory = InMemoryDirectory::new();
        let err = clear_role(&directory, "nobody@kampus.edu").await.unwrap_err();
        assert!(matches!(err, AdminError::UserNotFound(_)));
    }
}
