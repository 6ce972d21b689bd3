//! Well-known role name constants.
//!
//! Tokens issued by the identity provider carry one of these in `role`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";
