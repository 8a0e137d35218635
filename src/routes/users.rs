use crate::{
    auth::{hash_password, issue_token, verify_password, Authenticated, Credentials, AUTH_PURPOSE},
    config::Config,
    error::AppError,
    models::User,
};
use actix_web::{delete, get, post, web, HttpResponse, Responder};
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Issues a fresh "auth" token for `user_id` and appends it to the user's
/// stored token list. Registration and login both end here; each call adds
/// another concurrent session.
async fn append_auth_token(
    pool: &PgPool,
    config: &Config,
    user_id: Uuid,
) -> Result<String, AppError> {
    let token = issue_token(&config.jwt_secret, user_id, AUTH_PURPOSE)?;

    sqlx::query("INSERT INTO user_tokens (user_id, purpose, token) VALUES ($1, $2, $3)")
        .bind(user_id)
        .bind(AUTH_PURPOSE)
        .bind(&token)
        .execute(pool)
        .await?;

    Ok(token)
}

/// Register a new user
///
/// Creates a user from an email + password pair, immediately logs the new
/// user in, and returns the public user body with the fresh token in the
/// `x-auth` response header.
///
/// ## Responses:
/// - `200 OK`: user body, `x-auth` header set.
/// - `400 Bad Request`: invalid email/password, unknown body fields, or the
///   email is already registered.
#[post("")]
pub async fn register(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    credentials: web::Json<Credentials>,
) -> Result<impl Responder, AppError> {
    credentials.validate()?;

    let existing = sqlx::query("SELECT id FROM users WHERE email = $1")
        .bind(&credentials.email)
        .fetch_optional(&**pool)
        .await?;

    if existing.is_some() {
        return Err(AppError::BadRequest("Email already registered".into()));
    }

    let password_hash = hash_password(&credentials.password)?;

    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (id, email, password_hash, created_at)
         VALUES ($1, $2, $3, $4)
         RETURNING id, email, created_at",
    )
    .bind(Uuid::new_v4())
    .bind(&credentials.email)
    .bind(&password_hash)
    .bind(Utc::now())
    .fetch_one(&**pool)
    .await?;

    let token = append_auth_token(pool.get_ref(), &config, user.id).await?;

    Ok(HttpResponse::Ok().insert_header(("x-auth", token)).json(user))
}

/// Login user
///
/// Verifies an email + password pair, appends a new token to the user's
/// token list and returns it like registration does. An unknown email and a
/// wrong password are indistinguishable: both answer 400 without hinting
/// which half of the pair was wrong, and neither appends a token.
#[post("/login")]
pub async fn login(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    credentials: web::Json<Credentials>,
) -> Result<impl Responder, AppError> {
    credentials.validate()?;

    let row = sqlx::query_as::<_, (Uuid, String)>(
        "SELECT id, password_hash FROM users WHERE email = $1",
    )
    .bind(&credentials.email)
    .fetch_optional(&**pool)
    .await?;

    let (user_id, password_hash) = match row {
        Some(row) => row,
        None => return Err(AppError::BadRequest("Invalid credentials".into())),
    };

    if !verify_password(&credentials.password, &password_hash)? {
        return Err(AppError::BadRequest("Invalid credentials".into()));
    }

    let user = sqlx::query_as::<_, User>("SELECT id, email, created_at FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_one(&**pool)
        .await?;

    let token = append_auth_token(pool.get_ref(), &config, user.id).await?;

    Ok(HttpResponse::Ok().insert_header(("x-auth", token)).json(user))
}

/// Returns the authenticated user's public representation.
#[get("/me")]
pub async fn me(auth: Authenticated) -> Result<impl Responder, AppError> {
    Ok(HttpResponse::Ok().json(auth.user))
}

/// Logout
///
/// Removes exactly the token this request authenticated with from the
/// user's token list. Removing a token that is already gone still answers
/// 200; only a store failure is an error (400).
#[delete("/me/token")]
pub async fn logout(
    pool: web::Data<PgPool>,
    auth: Authenticated,
) -> Result<impl Responder, AppError> {
    sqlx::query("DELETE FROM user_tokens WHERE user_id = $1 AND token = $2")
        .bind(auth.user.id)
        .bind(&auth.token)
        .execute(&**pool)
        .await?;

    Ok(HttpResponse::Ok().finish())
}
