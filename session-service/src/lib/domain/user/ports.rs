use async_trait::async_trait;

use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::PasswordDigest;
use crate::domain::user::models::PlaintextPassword;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserListing;
use crate::user::errors::UserError;

/// Port for user administration operations.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Create new user, hashing the supplied password.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `Password` - Hashing failed
    /// * `Storage` - Database operation failed
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError>;

    /// Retrieve user by unique identifier.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `Storage` - Database operation failed
    async fn get_user(&self, id: &UserId) -> Result<User, UserError>;

    /// List all users ordered by last name, flagged with session presence.
    async fn list_users(&self) -> Result<Vec<UserListing>, UserError>;

    /// Update existing user with optional fields.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `EmailAlreadyExists` - New email is already registered
    /// * `Storage` - Database operation failed
    async fn update_user(&self, id: &UserId, command: UpdateUserCommand)
        -> Result<User, UserError>;

    /// Delete existing user together with its tokens.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `Storage` - Database operation failed
    async fn delete_user(&self, id: &UserId) -> Result<(), UserError>;

    /// Replace the password and revoke every session of the user.
    ///
    /// # Returns
    /// Number of sessions revoked
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `Password` - Hashing failed
    /// * `Storage` - Database operation failed
    async fn reset_password(
        &self,
        id: &UserId,
        password: PlaintextPassword,
    ) -> Result<u64, UserError>;
}

/// Persistence operations for user aggregate.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist new user; the store assigns the id.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `Storage` - Database operation failed
    async fn create(&self, user: NewUser) -> Result<User, UserError>;

    /// Retrieve user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve user by email address.
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError>;

    /// Retrieve all users ordered by last name.
    async fn list_all(&self) -> Result<Vec<UserListing>, UserError>;

    /// Update profile fields and the active flag.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `EmailAlreadyExists` - New email is already registered
    /// * `Storage` - Database operation failed
    async fn update(&self, user: User) -> Result<User, UserError>;

    /// Store a new password digest and delete the user's tokens, atomically.
    ///
    /// # Returns
    /// Number of tokens deleted
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `Storage` - Database operation failed
    async fn replace_password(
        &self,
        id: &UserId,
        digest: &PasswordDigest,
    ) -> Result<u64, UserError>;

    /// Remove user from storage.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `Storage` - Database operation failed
    async fn delete(&self, id: &UserId) -> Result<(), UserError>;
}
