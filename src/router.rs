use std::sync::Arc;

use axum::extract::Request;
use axum::handler::Handler;
use axum::http::{header, HeaderName, HeaderValue};
use axum::middleware::{from_fn, Next};
use axum::routing::{get, put};
use axum::{Extension, Router};
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{authenticate, authorize, scopes, TokenVerifier};
use crate::handlers::todos;
use crate::store::DynTodoStore;

/// Assemble the application: four routes, each behind its own scope, all of
/// them behind bearer-token authentication.
pub fn app(store: DynTodoStore, verifier: Arc<TokenVerifier>) -> Router {
    let router = Router::new()
        .route(
            "/",
            get(scoped(todos::list, scopes::READ_TODOS))
                .post(scoped(todos::create, scopes::CREATE_TODOS)),
        )
        .route(
            "/:id",
            put(scoped(todos::update, scopes::UPDATE_TODOS))
                .delete(scoped(todos::delete, scopes::DELETE_TODOS)),
        )
        .layer(from_fn(authenticate))
        .layer(Extension(verifier))
        .layer(Extension(store))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    security_headers(router)
}

/// Baseline security headers on every response, including rejected requests.
fn security_headers(router: Router) -> Router {
    let set = |name: HeaderName, value: &'static str| {
        SetResponseHeaderLayer::overriding(name, HeaderValue::from_static(value))
    };

    router
        .layer(set(header::X_DNS_PREFETCH_CONTROL, "off"))
        .layer(set(header::X_FRAME_OPTIONS, "SAMEORIGIN"))
        .layer(set(
            header::STRICT_TRANSPORT_SECURITY,
            "max-age=15552000; includeSubDomains",
        ))
        .layer(set(HeaderName::from_static("x-download-options"), "noopen"))
        .layer(set(header::X_CONTENT_TYPE_OPTIONS, "nosniff"))
        .layer(set(header::X_XSS_PROTECTION, "1; mode=block"))
}

/// Wrap `handler` so it only runs when the authenticated claims grant
/// `scope`.
fn scoped<H, T>(handler: H, scope: &'static str) -> impl Handler<T, ()>
where
    H: Handler<T, ()>,
    T: 'static,
{
    handler.layer(from_fn(move |request: Request, next: Next| {
        authorize(scope, request, next)
    }))
}
