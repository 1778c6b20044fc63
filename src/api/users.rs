use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::auth::token::{self, TokenConfig};
use crate::auth::{password, AuthClaims};
use crate::db::models::{AuthUser, ROLE_PROFESSOR, ROLE_STUDENT};
use crate::db::store::{CatalogStore, NewUser};
use crate::error::ApiError;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .route("/register", web::post().to(register))
            .route("/login", web::post().to(login))
            .route("/logout", web::post().to(logout))
            .route("/me", web::get().to(me)),
    );
}

#[derive(Debug, Deserialize)]
struct RegisterRequest {
    username: String,
    password: String,
    #[serde(rename = "type")]
    role: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    username: String,
    password: String,
}

async fn register(
    store: web::Data<dyn CatalogStore>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();
    if body.username.trim().is_empty() {
        return Err(ApiError::Validation("username is required".to_string()));
    }
    password::validate_strength(&body.password).map_err(ApiError::Validation)?;
    let role = body.role.unwrap_or_else(|| ROLE_STUDENT.to_string());
    if role != ROLE_PROFESSOR && role != ROLE_STUDENT {
        return Err(ApiError::Validation("unknown account type".to_string()));
    }

    let password_hash =
        password::hash(&body.password).map_err(|e| ApiError::Internal(e.to_string()))?;
    let user = store
        .create_user(NewUser {
            username: body.username,
            password_hash,
            role,
        })
        .await?;
    Ok(HttpResponse::Created().json(AuthUser::from(&user)))
}

async fn login(
    store: web::Data<dyn CatalogStore>,
    token_config: web::Data<TokenConfig>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();
    let user = store
        .get_user_by_username(&body.username)
        .await?
        .ok_or(ApiError::Unauthenticated)?;
    let verified = password::verify(&body.password, &user.password_hash)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    if !verified {
        return Err(ApiError::Unauthenticated);
    }
    // Only professor accounts log in through this path.
    if !user.is_professor() {
        return Err(ApiError::Forbidden);
    }

    let token =
        token::generate(&user, &token_config).map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Login successful",
        "user": AuthUser::from(&user),
        "token": token,
    })))
}

async fn me(
    store: web::Data<dyn CatalogStore>,
    claims: AuthClaims,
) -> Result<HttpResponse, ApiError> {
    let user = store
        .get_user(claims.0.sub)
        .await?
        .ok_or(ApiError::Unauthenticated)?;
    Ok(HttpResponse::Ok().json(AuthUser::from(&user)))
}

// Bearer tokens are stateless; the endpoint exists for client parity and the
// client simply discards its token.
async fn logout() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "message": "Logged out" }))
}
