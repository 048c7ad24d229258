//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Password hashing (Argon2id with fixed cost parameters)
//! - Cryptographic utilities (SHA-256, HMAC-signed tokens)
//! - Session cookie handling

pub mod cookie;
pub mod crypto;
pub mod password;
