//! Credential verification library
//!
//! Provides the password-hashing half of the portal's login flow:
//! Argon2id hashing for admin accounts and verification against stored
//! PHC-format hashes. Ordinary attendee logins carry no password, so the
//! verifier also handles the "no hash stored" case as a plain rejection.
//!
//! # Examples
//!
//! ```
//! use auth::CredentialVerifier;
//!
//! let verifier = CredentialVerifier::new();
//! let hash = verifier.hash("my_password").unwrap();
//! assert!(verifier.verify("my_password", &hash).unwrap());
//!
//! // An account with no stored hash never verifies.
//! assert!(!verifier.verify_against("anything", None).unwrap());
//! ```

pub mod password;

pub use password::CredentialVerifier;
pub use password::PasswordError;
