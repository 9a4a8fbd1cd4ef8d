// Identity extractor for bearer-authenticated routes

use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::{header::AUTHORIZATION, request::Parts};
use folio_http::AppError;

use crate::{AuthError, Identity, TokenService};

/// Pull the token out of an `Authorization: Bearer <token>` header
fn bearer_token(parts: &Parts) -> Result<&str, AuthError> {
    let value = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AuthError::MissingToken)?;

    let (scheme, token) = value.split_once(' ').ok_or(AuthError::MissingToken)?;
    if !scheme.eq_ignore_ascii_case("bearer") || token.trim().is_empty() {
        return Err(AuthError::MissingToken);
    }

    Ok(token.trim())
}

impl<S> FromRequestParts<S> for Identity
where
    Arc<TokenService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let tokens = Arc::<TokenService>::from_ref(state);

        let identity = bearer_token(parts)
            .and_then(|token| tokens.verify(token))
            .inspect_err(|err| tracing::debug!(error = %err, "bearer authentication failed"))?;

        tracing::debug!(user_id = identity.user_id, "caller authenticated");
        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::get,
        Router,
    };
    use jsonwebtoken::Algorithm;
    use std::time::Duration;
    use tower::ServiceExt;

    fn tokens() -> Arc<TokenService> {
        Arc::new(
            TokenService::new(b"extractor-secret", Algorithm::HS256, Duration::from_secs(60))
                .unwrap(),
        )
    }

    fn app(tokens: Arc<TokenService>) -> Router {
        Router::new()
            .route(
                "/me",
                get(|identity: Identity| async move { identity.username }),
            )
            .with_state(tokens)
    }

    fn request(authorization: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/me");
        if let Some(value) = authorization {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn valid_bearer_token_yields_identity() {
        let tokens = tokens();
        let token = tokens
            .issue(
                &Identity {
                    user_id: 1,
                    username: "reader".to_string(),
                    role: "user".to_string(),
                },
                None,
            )
            .unwrap();

        let response = app(tokens)
            .oneshot(request(Some(&format!("Bearer {token}"))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_header_is_unauthorized() {
        let response = app(tokens()).oneshot(request(None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn wrong_scheme_is_unauthorized() {
        let response = app(tokens())
            .oneshot(request(Some("Basic cmVhZGVyOnNlY3JldA==")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn forged_token_is_unauthorized() {
        let response = app(tokens())
            .oneshot(request(Some("Bearer abc.def.ghi")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
