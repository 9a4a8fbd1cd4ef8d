//! Authorization collaborator: bearer-token identities and password hashing.
//!
//! Tokens are HMAC-signed JWTs carrying the user's id, username and role. The
//! [`Identity`] extractor turns an `Authorization: Bearer` header into a caller
//! identity or rejects the request with 401.

pub mod error;
pub mod extract;
pub mod password;
pub mod token;

pub use error::{AuthError, Result};
pub use password::PasswordHasher;
pub use token::{Claims, Identity, TokenService};
