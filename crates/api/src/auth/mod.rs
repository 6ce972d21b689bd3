//! Token handling for identities issued by the external identity provider.

pub mod jwt;
