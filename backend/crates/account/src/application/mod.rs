//! Application Layer
//!
//! Use cases and application services.

pub mod admin;
pub mod authenticate;
pub mod authorize;
pub mod check_session;
pub mod config;
pub mod profile;
pub mod register;
pub mod sign_in;
pub mod sign_out;

// Re-exports
pub use admin::{AdminUpdateInput, AdminUseCase};
pub use authenticate::{AuthenticateInput, AuthenticateUseCase};
pub use authorize::{authorize, require_session};
pub use check_session::CheckSessionUseCase;
pub use config::AccountConfig;
pub use profile::{ProfileEdit, ProfileUseCase};
pub use register::{RegisterInput, RegisterUseCase};
pub use sign_in::{SignInOutput, SignInUseCase};
pub use sign_out::SignOutUseCase;
