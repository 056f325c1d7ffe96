pub mod claims;
pub mod extractors;
pub mod guards;
pub mod middleware;

pub use claims::{AdminUser, Claims};

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, Header, Validation, decode, encode, errors::Error as JwtError};
use util::state::AppState;

/// Subject recorded in every admin token.
pub const ADMIN_SUBJECT: &str = "admin";

/// Signs an admin JWT and returns it with its RFC 3339 expiry.
pub fn generate_jwt(state: &AppState) -> Result<(String, String), JwtError> {
    let now = Utc::now();
    let expiry = now + Duration::minutes(state.config().jwt_duration_minutes as i64);

    let claims = Claims {
        sub: ADMIN_SUBJECT.to_string(),
        admin: true,
        iat: now.timestamp() as usize,
        exp: expiry.timestamp() as usize,
    };

    let token = encode(&Header::new(Algorithm::HS256), &claims, state.encoding_key())?;
    Ok((token, expiry.to_rfc3339()))
}

/// Verifies signature and expiry, then requires the admin flag.
///
/// Returns `None` for anything that is not a currently valid admin token.
pub fn verify_admin_token(state: &AppState, token: &str) -> Option<Claims> {
    let data = decode::<Claims>(token, state.decoding_key(), &Validation::new(Algorithm::HS256)).ok()?;
    data.claims.admin.then_some(data.claims)
}
