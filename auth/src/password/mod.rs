pub mod argon2;
pub mod errors;

pub use argon2::CredentialVerifier;
pub use errors::PasswordError;
