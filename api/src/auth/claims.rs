use serde::{Deserialize, Serialize};

/// Claims carried by an admin token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    pub sub: String,
    pub admin: bool,
    pub iat: usize,
    pub exp: usize,
}

/// A request whose bearer token verified as an unexpired admin token.
#[derive(Debug, Clone)]
pub struct AdminUser(pub Claims);
