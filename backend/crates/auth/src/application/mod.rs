//! Application Layer
//!
//! Use cases and application services.

pub mod change_password;
pub mod config;
pub mod delete_user;
pub mod queries;
pub mod refresh;
pub mod register;
pub mod sign_in;
pub mod sign_out;
pub mod token_service;
pub mod update_email;

// Re-exports
pub use change_password::{ChangePasswordInput, ChangePasswordUseCase};
pub use config::AuthConfig;
pub use delete_user::DeleteUserUseCase;
pub use queries::UserQueries;
pub use refresh::RefreshUseCase;
pub use register::{RegisterInput, RegisterUseCase};
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use sign_out::SignOutUseCase;
pub use token_service::{TokenPair, TokenService};
pub use update_email::UpdateEmailUseCase;
