//! Credential and token adapters.
//!
//! - **bcrypt**: [`BcryptPasswordHasher`] implements `PasswordHasher`.
//! - **jwt**: [`JwtTokenService`] implements `TokenService` with HS256.

mod bcrypt_password_hasher;
mod jwt_token_service;

pub use bcrypt_password_hasher::{BCRYPT_MAX_COST, BCRYPT_MIN_COST, BcryptPasswordHasher};
pub use jwt_token_service::JwtTokenService;
