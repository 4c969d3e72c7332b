//! User accounts, password hashing and bearer tokens.

mod jwt;
mod password;
mod store;
mod types;

pub use jwt::JwtKeys;
pub use store::UserStore;
pub use types::{AuthError, UserSummary};
