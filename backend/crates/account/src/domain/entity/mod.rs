pub mod account;
pub mod auth_session;
pub mod session_identity;
