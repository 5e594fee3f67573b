//! Credential-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use jdl_core::actor::Actor;
use jdl_core::error::CoreError;
use jdl_core::types::EntityId;
use jdl_db::models::user::User;
use jdl_db::repositories::UserRepo;

use crate::auth::jwt::{validate_token, Claims};
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a Bearer credential in the
/// `Authorization` header.
///
/// The stored user record, when one exists, is loaded alongside the claims:
/// a locked record rejects the request with 403, and a stored admin flag
/// grants admin even when the credential does not carry one.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %user.user_id, is_admin = user.is_admin, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Identity-provider subject (`claims.sub`), also the `users.id` value.
    pub user_id: EntityId,
    /// Effective admin flag: the credential claim OR the stored flag.
    pub is_admin: bool,
    /// The admin claim exactly as issued.
    pub claims_admin: bool,
    pub name: Option<String>,
    pub email: Option<String>,
    /// The stored user record, `None` until the user registers via `/me`.
    pub record: Option<User>,
}

impl AuthUser {
    /// The request-scoped actor passed into policy and repository calls.
    pub fn actor(&self) -> Actor {
        Actor::new(self.user_id.clone(), self.is_admin)
    }

    fn from_claims(claims: Claims, record: Option<User>) -> Self {
        let stored_admin = record.as_ref().is_some_and(|u| u.is_admin);
        AuthUser {
            user_id: claims.sub,
            is_admin: claims.admin || stored_admin,
            claims_admin: claims.admin,
            name: claims.name,
            email: claims.email,
            record,
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Authorization header is required".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Authorization header must use the Bearer scheme".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.auth).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Credential is invalid or expired".into()))
        })?;
        if claims.sub.trim().is_empty() {
            return Err(AppError::Core(CoreError::Unauthorized(
                "Token has no subject".into(),
            )));
        }

        let record = UserRepo::find_by_id(&state.pool, &claims.sub).await?;
        if record.as_ref().is_some_and(|u| u.is_locked) {
            return Err(AppError::Core(CoreError::Forbidden(
                "User account is locked".into(),
            )));
        }

        Ok(AuthUser::from_claims(claims, record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(admin: bool) -> Claims {
        Claims {
            sub: "u1".into(),
            email: None,
            name: Some("Mio".into()),
            admin,
            exp: 0,
            iat: 0,
            iss: None,
            aud: None,
            jti: None,
        }
    }

    fn record(is_admin: bool) -> User {
        let now = chrono::Utc::now();
        User {
            id: "u1".into(),
            name: "Mio".into(),
            email: None,
            is_admin,
            is_locked: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn stored_admin_flag_grants_admin() {
        let user = AuthUser::from_claims(claims(false), Some(record(true)));
        assert!(user.is_admin);
        assert!(!user.claims_admin);
        assert!(user.actor().is_admin);
    }

    #[test]
    fn claim_admin_without_record_is_admin() {
        let user = AuthUser::from_claims(claims(true), None);
        assert!(user.is_admin);
        assert_eq!(user.actor().user_id, "u1");
    }

    #[test]
    fn plain_user_is_not_admin() {
        let user = AuthUser::from_claims(claims(false), Some(record(false)));
        assert!(!user.is_admin);
    }
}
