//! Authentication module - the access guard for the admin back office
//!
//! Token issuance lives outside this server; this module only validates
//! bearer credentials and yields a [`CurrentUser`] principal.

pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::require_auth;
