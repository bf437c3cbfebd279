use axum::{
    extract::{Request, State},
    http::header::{self, HeaderValue, InvalidHeaderValue},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

const API_CONTENT_SECURITY_POLICY: &str = "default-src 'none'; frame-ancestors 'none'";

/// Content-Security-Policy applied to HTML pages. API and asset responses
/// always get the locked-down policy.
#[derive(Debug, Clone)]
pub struct SecurityHeaders {
    page_policy: HeaderValue,
}

impl SecurityHeaders {
    pub fn new(page_policy: &str) -> Result<Self, InvalidHeaderValue> {
        Ok(Self {
            page_policy: HeaderValue::from_str(page_policy)?,
        })
    }
}

pub async fn security_headers_middleware(
    State(policy): State<Arc<SecurityHeaders>>,
    req: Request,
    next: Next,
) -> Response {
    let mut response = next.run(req).await;

    let is_html = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("text/html"));

    let headers = response.headers_mut();

    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        header::X_XSS_PROTECTION,
        HeaderValue::from_static("1; mode=block"),
    );
    headers.insert(
        header::STRICT_TRANSPORT_SECURITY,
        HeaderValue::from_static("max-age=31536000; includeSubDomains"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));

    if is_html {
        headers.insert(header::CONTENT_SECURITY_POLICY, policy.page_policy.clone());
    } else {
        headers.insert(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static(API_CONTENT_SECURITY_POLICY),
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        body::Body,
        http::StatusCode,
        middleware::from_fn_with_state,
        response::{Html, IntoResponse},
        routing::get,
    };
    use tower::util::ServiceExt;

    fn app() -> Router {
        let policy = Arc::new(SecurityHeaders::new("default-src 'self'; img-src 'self' data:").unwrap());
        Router::new()
            .route("/", get(|| async { Html("<p>page</p>") }))
            .route("/api", get(|| async { (StatusCode::OK, "{}").into_response() }))
            .layer(from_fn_with_state(policy, security_headers_middleware))
    }

    async fn csp_for(uri: &str) -> String {
        let response = app()
            .oneshot(axum::http::Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
        response.headers()[header::CONTENT_SECURITY_POLICY]
            .to_str()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn html_pages_get_the_page_policy() {
        assert_eq!(csp_for("/").await, "default-src 'self'; img-src 'self' data:");
    }

    #[tokio::test]
    async fn non_html_responses_get_the_strict_policy() {
        assert_eq!(csp_for("/api").await, API_CONTENT_SECURITY_POLICY);
    }

    #[test]
    fn rejects_policies_that_are_not_header_safe() {
        assert!(SecurityHeaders::new("default-src 'self'\n").is_err());
    }
}
