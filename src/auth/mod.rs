pub mod password;
pub mod token;

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpRequest};
use futures::future::{ready, Ready};

use crate::db::models::User;
use crate::db::store::CatalogStore;
use crate::error::ApiError;
use token::{Claims, TokenConfig};

/// Extractor for the verified bearer token on a request. Rejects with
/// `Unauthenticated` when the header is missing, malformed, or the token
/// fails signature/expiry validation.
pub struct AuthClaims(pub Claims);

impl FromRequest for AuthClaims {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(claims_from_request(req))
    }
}

fn claims_from_request(req: &HttpRequest) -> Result<AuthClaims, ApiError> {
    let config = req
        .app_data::<web::Data<TokenConfig>>()
        .expect("TokenConfig not registered in app data");
    let bearer = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(ApiError::Unauthenticated)?;
    let claims = token::validate(bearer, config).map_err(|_| ApiError::Unauthenticated)?;
    Ok(AuthClaims(claims))
}

/// The mutation gate: resolve the token subject to a user row and require
/// the professor role. An unknown subject (e.g. a deleted account with a
/// still-valid token) is treated as unauthenticated, not forbidden.
pub async fn require_professor(
    store: &dyn CatalogStore,
    claims: &Claims,
) -> Result<User, ApiError> {
    let user = store
        .get_user(claims.sub)
        .await?
        .ok_or(ApiError::Unauthenticated)?;
    if !user.is_professor() {
        return Err(ApiError::Forbidden);
    }
    Ok(user)
}
