use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::ResponseError,
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use sqlx::PgPool;
use std::rc::Rc;

use crate::auth::extractors::Authenticated;
use crate::auth::token::{verify_token, AUTH_PURPOSE};
use crate::config::Config;
use crate::error::AppError;
use crate::models::User;

/// Request-level authentication gate.
///
/// Every request outside the public paths must carry a valid token in the
/// `x-auth` header. The signature check is stateless; the token must then
/// also be present in the user's stored token list, so revoked tokens fail
/// even while their signature is still valid. On success the resolved
/// `Authenticated` identity is attached to the request; on any failure the
/// guard answers 401 itself and no handler runs.
pub struct AuthGuard;

impl<S, B> Transform<S, ServiceRequest> for AuthGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthGuardService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthGuardService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthGuardService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthGuardService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // Registration and login issue tokens, so they cannot require one;
        // the health check is public as well.
        let path = req.path();
        if path == "/health" || path == "/users" || path == "/users/login" {
            let fut = self.service.call(req);
            return Box::pin(async move { Ok(fut.await?.map_into_left_body()) });
        }

        let token = req
            .headers()
            .get("x-auth")
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let service = Rc::clone(&self.service);
        Box::pin(async move {
            let outcome = match token {
                Some(token) => resolve_user(&req, &token).await.map(|user| (user, token)),
                None => Err(AppError::Unauthorized("Missing x-auth token".into())),
            };

            match outcome {
                Ok((user, token)) => {
                    req.extensions_mut().insert(Authenticated { user, token });
                    Ok(service.call(req).await?.map_into_left_body())
                }
                Err(err) => {
                    let response = err.error_response().map_into_right_body();
                    Ok(req.into_response(response))
                }
            }
        })
    }
}

/// Verifies the token and resolves it to a user whose stored token list
/// contains that exact string with the "auth" purpose. Any failure along
/// the way, including a store error, is reported as 401.
async fn resolve_user(req: &ServiceRequest, token: &str) -> Result<User, AppError> {
    let config = req
        .app_data::<web::Data<Config>>()
        .ok_or_else(|| AppError::Unauthorized("Authentication is not configured".into()))?;
    let pool = req
        .app_data::<web::Data<PgPool>>()
        .ok_or_else(|| AppError::Unauthorized("Authentication is not configured".into()))?;

    let claims = verify_token(&config.jwt_secret, token)?;
    if claims.purpose != AUTH_PURPOSE {
        return Err(AppError::Unauthorized("Invalid token".into()));
    }

    sqlx::query_as::<_, User>(
        "SELECT u.id, u.email, u.created_at
         FROM users u
         JOIN user_tokens t ON t.user_id = u.id
         WHERE u.id = $1 AND t.token = $2 AND t.purpose = $3",
    )
    .bind(claims.sub)
    .bind(token)
    .bind(AUTH_PURPOSE)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        log::error!("Token lookup failed: {}", e);
        AppError::Unauthorized("Invalid token".to_string())
    })?
    .ok_or_else(|| AppError::Unauthorized("Invalid token".to_string()))
}
