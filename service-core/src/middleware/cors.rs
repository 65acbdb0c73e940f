use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, Method, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Fixed CORS header set for one route.
///
/// Every response passing through [`cors_middleware`] carries these headers,
/// including error responses, and `OPTIONS` preflights are answered with an
/// empty 200 before the request reaches any handler or auth layer.
#[derive(Debug, Clone, Copy)]
pub struct CorsPolicy {
    pub allow_origin: &'static str,
    pub allow_methods: &'static str,
    pub allow_headers: &'static str,
}

impl CorsPolicy {
    pub const fn new(allow_methods: &'static str, allow_headers: &'static str) -> Self {
        Self {
            allow_origin: "*",
            allow_methods,
            allow_headers,
        }
    }

    pub fn apply(&self, headers: &mut HeaderMap) {
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static(self.allow_origin),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(self.allow_methods),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(self.allow_headers),
        );
    }
}

pub async fn cors_middleware(
    State(policy): State<CorsPolicy>,
    req: Request,
    next: Next,
) -> Response {
    let mut response = if req.method() == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        next.run(req).await
    };

    policy.apply(response.headers_mut());
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, middleware::from_fn_with_state, routing::get};
    use tower::ServiceExt;

    const POLICY: CorsPolicy = CorsPolicy::new("GET, OPTIONS", "Content-Type");

    fn app() -> Router {
        Router::new()
            .route("/", get(|| async { (StatusCode::IM_A_TEAPOT, "brewing") }))
            .layer(from_fn_with_state(POLICY, cors_middleware))
    }

    #[tokio::test]
    async fn preflight_short_circuits_with_empty_body() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_METHODS],
            "GET, OPTIONS"
        );
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn headers_added_to_handler_response() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_HEADERS],
            "Content-Type"
        );
    }
}
