use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::error::AppError;
use crate::models::User;

/// The authenticated identity of a request, inserted into request
/// extensions by `AuthGuard` and pulled out by handlers through this
/// extractor.
///
/// Carries the resolved user and the exact token string the request
/// presented; logout needs the latter to remove precisely that token from
/// the user's token list.
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub user: User,
    pub token: String,
}

impl FromRequest for Authenticated {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<Authenticated>().cloned() {
            Some(auth) => ready(Ok(auth)),
            None => {
                // Reached only if a guarded route was registered without
                // AuthGuard in front of it; answering 401 is the safe default.
                let err = AppError::Unauthorized("Request is not authenticated".to_string());
                ready(Err(err.into()))
            }
        }
    }
}
