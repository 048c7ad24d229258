pub mod account_name;
pub mod email;
pub mod login_status;
pub mod role;

pub use kernel::id::AccountId;
