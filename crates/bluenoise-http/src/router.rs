//! Request routing: maps method and path to a [`StoreOperation`].
//!
//! Every operation is served on a fixed path with a single method, and all
//! operation parameters travel in the query string. A known path hit with the
//! wrong method yields `MethodNotAllowed`; an unknown path yields `NotFound`.

use bluenoise_model::ApiError;
use bluenoise_model::operations::StoreOperation;
use percent_encoding::percent_decode_str;

/// Stateless router over the fixed operation table.
#[derive(Debug, Clone, Copy, Default)]
pub struct StoreRouter;

/// The result of routing an HTTP request.
#[derive(Debug, Clone)]
pub struct RoutingContext {
    /// The identified operation.
    pub operation: StoreOperation,
    /// Decoded query parameters, in request order.
    pub query_params: Vec<(String, String)>,
}

impl RoutingContext {
    /// First value of the query parameter `name`, if present.
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query_params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Like [`RoutingContext::query_param`] but treats absent or empty values
    /// as a missing parameter.
    pub fn required_param(&self, name: &str) -> Result<&str, ApiError> {
        self.query_param(name)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ApiError::missing_parameter(name))
    }
}

impl StoreRouter {
    /// Create a router.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Resolve a request to its operation and parsed query string.
    pub fn resolve<B>(&self, req: &http::Request<B>) -> Result<RoutingContext, ApiError> {
        route(req.method(), req.uri())
    }

    /// Like [`StoreRouter::resolve`] for a request already split into parts.
    pub fn resolve_parts(&self, parts: &http::request::Parts) -> Result<RoutingContext, ApiError> {
        route(&parts.method, &parts.uri)
    }
}

fn route(method: &http::Method, uri: &http::Uri) -> Result<RoutingContext, ApiError> {
    let path = normalize_path(uri.path());
    let operation = StoreOperation::from_path(path).ok_or_else(|| ApiError::not_found(path))?;

    if *method != operation.method() {
        return Err(ApiError::method_not_allowed(method.as_str()));
    }

    Ok(RoutingContext {
        operation,
        query_params: parse_query_params(uri.query().unwrap_or("")),
    })
}

/// Drop a single trailing slash so `/list/` routes like `/list`.
fn normalize_path(path: &str) -> &str {
    match path.strip_suffix('/') {
        Some(stripped) if !stripped.is_empty() => stripped,
        _ => path,
    }
}

/// Percent-decode a URI component, treating `+` as a space.
fn decode_uri_component(s: &str) -> String {
    let spaced = s.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

/// Parse a query string into decoded key-value pairs.
fn parse_query_params(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|s| !s.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (decode_uri_component(k), decode_uri_component(v)),
            None => (decode_uri_component(pair), String::new()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use bluenoise_model::ErrorCode;

    use super::*;

    fn request(method: http::Method, uri: &str) -> http::Request<()> {
        http::Request::builder()
            .method(method)
            .uri(uri)
            .body(())
            .expect("valid request")
    }

    #[test]
    fn test_should_route_every_operation_on_its_method() {
        let router = StoreRouter::new();
        for op in StoreOperation::ALL {
            let ctx = router
                .resolve(&request(op.method(), op.path()))
                .unwrap_or_else(|e| panic!("{op} should route: {e}"));
            assert_eq!(ctx.operation, op);
        }
    }

    #[test]
    fn test_should_reject_wrong_method_on_known_path() {
        let err = StoreRouter::new()
            .resolve(&request(http::Method::GET, "/delete?bucket=b&filename=k"))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::MethodNotAllowed);
        assert_eq!(err.status_code, http::StatusCode::METHOD_NOT_ALLOWED);
    }

    #[test]
    fn test_should_reject_unknown_path() {
        let err = StoreRouter::new()
            .resolve(&request(http::Method::GET, "/buckets/photos"))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.resource.as_deref(), Some("/buckets/photos"));
    }

    #[test]
    fn test_should_tolerate_trailing_slash() {
        let ctx = StoreRouter::new()
            .resolve(&request(http::Method::GET, "/list/?bucket=photos"))
            .expect("route");
        assert_eq!(ctx.operation, StoreOperation::ListObjects);
        assert_eq!(ctx.query_param("bucket"), Some("photos"));
    }

    #[test]
    fn test_should_decode_query_params() {
        let ctx = StoreRouter::new()
            .resolve(&request(
                http::Method::GET,
                "/download?bucket=photos&filename=summer%20trip%2Fa+b.png",
            ))
            .expect("route");
        assert_eq!(ctx.query_param("filename"), Some("summer trip/a b.png"));
    }

    #[test]
    fn test_should_treat_empty_required_param_as_missing() {
        let ctx = StoreRouter::new()
            .resolve(&request(http::Method::GET, "/list?bucket="))
            .expect("route");
        assert_eq!(ctx.query_param("bucket"), Some(""));
        let err = ctx.required_param("bucket").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRequest);
        assert!(err.message.contains("bucket"));
    }

    #[test]
    fn test_should_parse_valueless_params() {
        let params = parse_query_params("flag&bucket=a&&x=1=2");
        assert_eq!(
            params,
            vec![
                ("flag".to_owned(), String::new()),
                ("bucket".to_owned(), "a".to_owned()),
                ("x".to_owned(), "1=2".to_owned()),
            ]
        );
    }
}
