use crate::auth::jwt::verify_token;
use crate::config::Config;
use crate::error::ApiError;
use crate::model::role::Role;
use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload, error::ErrorUnauthorized, web::Data};
use futures::future::{Ready, ready};

/// Authenticated principal of a request.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub user_id: u64,
    pub username: String,
    /// Business document; matches `Instructor::documento` for instructors.
    pub document: String,
    pub role: Role,
}

impl FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        // already decoded by auth_middleware on protected scopes
        if let Some(user) = req.extensions().get::<AuthUser>() {
            return ready(Ok(user.clone()));
        }

        let token = match req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
        {
            Some(t) => t,
            None => return ready(Err(ErrorUnauthorized("Missing token"))),
        };

        let config = match req.app_data::<Data<Config>>() {
            Some(c) => c,
            None => {
                return ready(Err(
                    actix_web::error::ErrorInternalServerError("Config missing"),
                ))
            }
        };

        match verify_token(token, &config.jwt_secret) {
            Ok(claims) => ready(Ok(AuthUser {
                user_id: claims.user_id,
                username: claims.sub,
                document: claims.document,
                role: Role::from_user_type(&claims.user_type),
            })),
            Err(_) => ready(Err(ErrorUnauthorized("Invalid token"))),
        }
    }
}

impl AuthUser {
    pub fn is_instructor(&self) -> bool {
        self.role == Role::Instructor
    }

    pub fn is_trainee(&self) -> bool {
        self.role == Role::Trainee
    }

    pub fn require_instructor(&self) -> Result<(), ApiError> {
        if self.is_instructor() {
            Ok(())
        } else {
            Err(ApiError::forbidden(
                "Solo los instructores pueden realizar esta acción.",
            ))
        }
    }

    pub fn require_trainee(&self) -> Result<(), ApiError> {
        if self.is_trainee() {
            Ok(())
        } else {
            Err(ApiError::forbidden(
                "Solo los aprendices pueden realizar esta acción.",
            ))
        }
    }
}
