//! Bearer token authentication.
//!
//! Resolves `Authorization: Bearer <token>` against the configured token table
//! and inserts the resulting `Actor` into the request extensions. Permission
//! checks happen in the handlers, which know which permission a route needs.

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{header, Request, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use shared_types::Actor;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::{Layer, Service};
use tracing::{debug, warn};

use crate::domain::config::TokenConfig;

/// Paths served without a token.
pub const PUBLIC_PATHS: &[&str] = &["/api/v1/status", "/metrics"];

/// Authentication layer
#[derive(Clone)]
pub struct AuthLayer {
    tokens: Arc<Vec<TokenConfig>>,
}

impl AuthLayer {
    pub fn new(tokens: Vec<TokenConfig>) -> Self {
        Self {
            tokens: Arc::new(tokens),
        }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthService {
            inner,
            tokens: Arc::clone(&self.tokens),
        }
    }
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService<S> {
    inner: S,
    tokens: Arc<Vec<TokenConfig>>,
}

impl<S> Service<Request<Body>> for AuthService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let tokens = Arc::clone(&self.tokens);
        let mut inner = self.inner.clone();

        Box::pin(async move {
            if PUBLIC_PATHS.contains(&req.uri().path()) {
                return inner.call(req).await;
            }

            let Some(presented) = bearer_token(&req) else {
                debug!(path = %req.uri().path(), "Request without bearer token");
                return Ok(unauthorized_response("Authorization token not found"));
            };

            let Some(mut actor) = resolve_token(&tokens, presented) else {
                warn!(path = %req.uri().path(), "Request with unknown bearer token");
                return Ok(unauthorized_response("Invalid token"));
            };

            if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
                actor = actor.with_origin(addr.ip());
            }

            debug!(subject = %actor.subject, role = %actor.role, "Authenticated request");
            req.extensions_mut().insert(actor);
            inner.call(req).await
        })
    }
}

fn bearer_token<B>(req: &Request<B>) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Every entry is compared so lookup time does not depend on which one matches.
pub fn resolve_token(tokens: &[TokenConfig], presented: &str) -> Option<Actor> {
    let mut found = None;
    for entry in tokens {
        if constant_time_compare(presented, &entry.token) && found.is_none() {
            found = Some(Actor::new(entry.subject.clone(), entry.role));
        }
    }
    found
}

/// Constant-time string comparison.
///
/// Both sides are padded to the longer length with different bytes, so a
/// length mismatch never compares equal and never exits early.
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    use subtle::ConstantTimeEq;

    let max_len = std::cmp::max(a.len(), b.len());

    let mut a_padded = vec![0u8; max_len];
    let mut b_padded = vec![0xFFu8; max_len];

    a_padded[..a.len()].copy_from_slice(a.as_bytes());
    b_padded[..b.len()].copy_from_slice(b.as_bytes());

    let lengths_equal = a.len().ct_eq(&b.len());
    let contents_equal = a_padded.ct_eq(&b_padded);

    (lengths_equal & contents_equal).into()
}

fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, "Bearer")],
        Json(serde_json::json!({ "error": message })),
    )
        .into_response()
}
