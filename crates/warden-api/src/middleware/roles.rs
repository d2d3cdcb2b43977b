// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Role requirement middleware.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Response},
};
use tower::{Layer, Service};
use warden_core::{authorize, AuthorizationOutcome, Identity};

use crate::error::ApiError;

// =============================================================================
// RoleLayer
// =============================================================================

/// Layer requiring at least one of a set of roles.
///
/// Must sit inside an [`AuthLayer`](super::AuthLayer). A request without an
/// identity gets 401; an identity with none of the roles gets 403. An empty
/// role set only requires authentication.
#[derive(Clone)]
pub struct RoleLayer {
    required: Arc<Vec<String>>,
}

impl RoleLayer {
    /// Creates a layer requiring any of `roles`.
    pub fn require_any<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            required: Arc::new(roles.into_iter().map(Into::into).collect()),
        }
    }

    /// Creates a layer requiring only an authenticated identity.
    pub fn authenticated() -> Self {
        Self {
            required: Arc::new(Vec::new()),
        }
    }
}

impl<S> Layer<S> for RoleLayer {
    type Service = RoleMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RoleMiddleware {
            inner,
            required: self.required.clone(),
        }
    }
}

// =============================================================================
// RoleMiddleware
// =============================================================================

/// Middleware enforcing a [`RoleLayer`] requirement.
#[derive(Clone)]
pub struct RoleMiddleware<S> {
    inner: S,
    required: Arc<Vec<String>>,
}

impl<S> Service<Request<Body>> for RoleMiddleware<S>
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

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let required = self.required.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let identity = req.extensions().get::<Identity>();

            match authorize(required.as_slice(), identity) {
                AuthorizationOutcome::Allowed => inner.call(req).await,
                AuthorizationOutcome::RedirectToLogin => {
                    tracing::warn!("No identity found, denying access");
                    Ok(ApiError::unauthorized("Authentication required").into_response())
                }
                AuthorizationOutcome::Denied => {
                    tracing::warn!(
                        user_id = identity.map(|i| i.id.as_str()).unwrap_or_default(),
                        required_roles = ?required.as_slice(),
                        user_roles = ?identity.map(|i| i.roles.as_slice()),
                        "Role requirement not met"
                    );
                    Ok(ApiError::forbidden("Insufficient roles").into_response())
                }
            }
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use std::convert::Infallible;
    use tower::ServiceExt;

    fn mock_service() -> impl Service<
        Request<Body>,
        Response = Response,
        Error = Infallible,
        Future = impl Future<Output = Result<Response, Infallible>> + Send,
    > + Clone
    + Send {
        tower::service_fn(|_req| async { Ok::<_, Infallible>(Response::new(Body::empty())) })
    }

    fn request_with(roles: Option<&[&str]>) -> Request<Body> {
        let mut req = Request::builder().uri("/test").body(Body::empty()).unwrap();
        if let Some(roles) = roles {
            req.extensions_mut().insert(Identity {
                id: "7".into(),
                full_name: "Grace".into(),
                email: "grace@example.com".into(),
                roles: roles.iter().map(|r| r.to_string()).collect(),
            });
        }
        req
    }

    #[tokio::test]
    async fn test_role_granted() {
        let service = RoleLayer::require_any(["Admin", "Manager"]).layer(mock_service());

        let response = service.oneshot(request_with(Some(&["Manager"]))).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_role_denied() {
        let service = RoleLayer::require_any(["Admin"]).layer(mock_service());

        let response = service.oneshot(request_with(Some(&["User"]))).await.unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_role_match_is_case_sensitive() {
        let service = RoleLayer::require_any(["Admin"]).layer(mock_service());

        let response = service.oneshot(request_with(Some(&["admin"]))).await.unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_no_identity() {
        let service = RoleLayer::require_any(["Admin"]).layer(mock_service());

        let response = service.oneshot(request_with(None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_authenticated_only() {
        let mut service = RoleLayer::authenticated().layer(mock_service());

        let response = service
            .ready()
            .await
            .unwrap()
            .call(request_with(Some(&[])))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
