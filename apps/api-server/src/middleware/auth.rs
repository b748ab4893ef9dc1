//! Authenticated identity extractor.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use std::future::{Ready, ready};

use crate::middleware::error::AppError;
use crate::state::AppState;

/// The authenticated caller, decoded from the bearer token.
///
/// Use as a handler argument to protect a route:
/// ```ignore
/// async fn protected(identity: Identity) -> impl Responder { ... }
/// ```
/// Missing, malformed and expired tokens all produce the same 401.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: uuid::Uuid,
    pub is_admin: bool,
}

impl Identity {
    /// Gate an administrator-only operation. Called before any mutating
    /// effect so a 403 never leaves partial state behind.
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(state) = req.app_data::<web::Data<AppState>>() else {
            tracing::error!("AppState not found in app data");
            return ready(Err(AppError::Internal(
                "Server configuration error".to_string(),
            )));
        };

        let token = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));

        let Some(token) = token else {
            return ready(Err(AppError::Unauthorized));
        };

        match state.tokens.verify(token) {
            Ok(claims) => ready(Ok(Identity {
                user_id: claims.user_id,
                is_admin: claims.is_admin,
            })),
            Err(e) => {
                tracing::debug!("token rejected: {e}");
                ready(Err(AppError::Unauthorized))
            }
        }
    }
}
