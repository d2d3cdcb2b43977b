// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Bearer token authentication middleware.

use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::{header, Request},
    response::{IntoResponse, Response},
};
use tower::{Layer, Service};
use warden_core::{Identity, TokenCodec};

use crate::error::ApiError;

// =============================================================================
// AuthLayer
// =============================================================================

/// Layer for bearer token authentication.
///
/// Decodes the `Authorization: Bearer` token with a verifying codec, rejects
/// expired tokens, and stores the resulting [`Identity`] (and its
/// [`ClaimSet`](warden_core::ClaimSet)) in the request extensions.
#[derive(Clone)]
pub struct AuthLayer {
    codec: Arc<TokenCodec>,
    public_paths: Arc<HashSet<String>>,
}

impl AuthLayer {
    /// Creates a new auth layer.
    pub fn new(codec: Arc<TokenCodec>) -> Self {
        if !codec.verifies_signature() {
            tracing::warn!("AuthLayer created with a codec that does not verify signatures");
        }
        Self {
            codec,
            public_paths: Arc::new(HashSet::new()),
        }
    }

    /// Sets paths that don't require authentication.
    ///
    /// A trailing `*` makes the entry a prefix match.
    pub fn with_public_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.public_paths = Arc::new(paths.into_iter().map(Into::into).collect());
        self
    }

    /// Uses the account endpoints that must stay reachable without a token.
    pub fn with_default_public_paths(self) -> Self {
        self.with_public_paths([
            "/health",
            "/api/account/login",
            "/api/account/register",
            "/api/account/forgot-password",
            "/api/account/reset-password",
        ])
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthMiddleware {
            inner,
            codec: self.codec.clone(),
            public_paths: self.public_paths.clone(),
        }
    }
}

// =============================================================================
// AuthMiddleware
// =============================================================================

/// Middleware for bearer token authentication.
#[derive(Clone)]
pub struct AuthMiddleware<S> {
    inner: S,
    codec: Arc<TokenCodec>,
    public_paths: Arc<HashSet<String>>,
}

impl<S> AuthMiddleware<S> {
    /// Checks if a path is public.
    fn is_public_path(&self, path: &str) -> bool {
        if self.public_paths.contains(path) {
            return true;
        }

        self.public_paths.iter().any(|public| {
            public
                .strip_suffix('*')
                .is_some_and(|prefix| path.starts_with(prefix))
        })
    }
}

impl<S> Service<Request<Body>> for AuthMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let codec = self.codec.clone();
        let is_public = self.is_public_path(req.uri().path());
        let mut inner = self.inner.clone();

        Box::pin(async move {
            if is_public {
                return inner.call(req).await;
            }

            let Some(token) = extract_bearer_token(&req) else {
                tracing::debug!("No authorization token provided");
                return Ok(
                    ApiError::unauthorized("No authorization token provided").into_response()
                );
            };

            let claims = match codec.decode_unexpired(&token) {
                Ok(claims) => claims,
                Err(e) => {
                    tracing::debug!(error = %e, "Token validation failed");
                    return Ok(ApiError::unauthorized(e.to_string()).into_response());
                }
            };

            tracing::trace!(subject = %claims.subject_id, "Request authenticated");
            req.extensions_mut().insert(Identity::from(&claims));
            req.extensions_mut().insert(claims);

            inner.call(req).await
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token<B>(req: &Request<B>) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, StatusCode};
    use std::convert::Infallible;
    use tower::ServiceExt;
    use warden_core::{ClaimSet, JwtConfig};

    const SECRET: &str = "api-test-secret-key-that-is-long-enough";

    fn codec() -> Arc<TokenCodec> {
        Arc::new(TokenCodec::new(JwtConfig::new(SECRET)).unwrap())
    }

    fn echo_identity() -> impl Service<
        Request<Body>,
        Response = Response,
        Error = Infallible,
        Future = impl Future<Output = Result<Response, Infallible>> + Send,
    > + Clone
    + Send {
        tower::service_fn(|req: Request<Body>| async move {
            let id = req
                .extensions()
                .get::<Identity>()
                .map(|i| i.id.clone())
                .unwrap_or_else(|| "anonymous".to_string());
            Ok::<_, Infallible>(Response::new(Body::from(id)))
        })
    }

    fn request(path: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_extract_bearer_token() {
        let mut req = Request::builder().uri("/test").body(Body::empty()).unwrap();
        assert!(extract_bearer_token(&req).is_none());

        req.headers_mut()
            .insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(extract_bearer_token(&req).is_none());

        req.headers_mut()
            .insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert!(extract_bearer_token(&req).is_none());

        req.headers_mut().insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer mytoken123"),
        );
        assert_eq!(extract_bearer_token(&req), Some("mytoken123".to_string()));
    }

    #[test]
    fn test_public_paths() {
        let layer = AuthLayer::new(codec()).with_public_paths(["/health", "/api/account/*"]);
        let middleware = layer.layer(echo_identity());

        assert!(middleware.is_public_path("/health"));
        assert!(middleware.is_public_path("/api/account/login"));
        assert!(!middleware.is_public_path("/api/roles"));
    }

    #[tokio::test]
    async fn test_valid_token_sets_identity() {
        let codec = codec();
        let token = codec.encode(&ClaimSet::builder("42").build()).unwrap();
        let service = AuthLayer::new(codec).layer(echo_identity());

        let response = service
            .oneshot(request("/api/account/detail", Some(&token)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "42");
    }

    #[tokio::test]
    async fn test_missing_token_rejected() {
        let service = AuthLayer::new(codec()).layer(echo_identity());

        let response = service.oneshot(request("/api/roles", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_expired_token_rejected() {
        let codec = codec();
        let token = codec
            .encode(&ClaimSet::builder("42").expires_in(-10).build())
            .unwrap();
        let service = AuthLayer::new(codec).layer(echo_identity());

        let response = service
            .oneshot(request("/api/roles", Some(&token)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_forged_token_rejected() {
        let forged = TokenCodec::new(JwtConfig::new("another-secret-key-of-sufficient-size"))
            .unwrap()
            .encode(&ClaimSet::builder("42").add_role("Admin").build())
            .unwrap();
        let service = AuthLayer::new(codec()).layer(echo_identity());

        let response = service
            .oneshot(request("/api/roles", Some(&forged)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_public_path_skips_authentication() {
        let service = AuthLayer::new(codec())
            .with_default_public_paths()
            .layer(echo_identity());

        let response = service
            .oneshot(request("/api/account/login", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "anonymous");
    }
}
