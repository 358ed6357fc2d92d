//! `strata-auth` — pure authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage. It defines
//! who is acting (`Actor`), what they may do (`Capability` + `authorize`),
//! and the token claims the API layer exchanges for an actor.

pub mod actor;
pub mod authorize;
pub mod claims;
pub mod roles;
pub mod token;

pub use actor::Actor;
pub use authorize::{authorize, authorize_owner, AuthzError, Capability};
pub use claims::{validate_claims, JwtClaims, TokenValidationError};
pub use roles::Role;
pub use token::Hs256TokenCodec;
