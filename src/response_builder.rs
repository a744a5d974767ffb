use crate::responder::{AssetDecision, CacheHeaders};
use http::response::Builder as HttpResponseBuilder;
use http::{header, HeaderMap, Method, Request, Response, Result, StatusCode};
use http_body_util::Full;
use hyper::body::Bytes;

const FORBIDDEN_BODY: &str = "Forbidden";
const NOT_FOUND_BODY: &str = "File not found";
const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// Utility to build the response for an `AssetDecision`.
///
/// This is typically a short-lived, per-request instance.
#[derive(Clone, Debug, Default)]
pub struct ResponseBuilder {
    /// Whether this is a `HEAD` request, with no response body.
    pub is_head: bool,
}

impl ResponseBuilder {
    /// Create a new response builder with a default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply parameters based on a request.
    pub fn request<B>(&mut self, req: &Request<B>) -> &mut Self {
        self.method(req.method())
    }

    /// Build responses for the given request method.
    pub fn method(&mut self, value: &Method) -> &mut Self {
        self.is_head = *value == Method::HEAD;
        self
    }

    /// Build a Hyper response for the given decision.
    pub fn build(&self, decision: AssetDecision) -> Result<Response<Full<Bytes>>> {
        self.build_parts(decision).map(|res| res.map(Full::new))
    }

    /// Build a response with a plain `Bytes` body, for use with any HTTP layer.
    pub fn build_parts(&self, decision: AssetDecision) -> Result<Response<Bytes>> {
        let (status, headers, body) = decision.into_parts()?;

        // `HEAD` keeps the headers, including `Content-Length`, but drops the body.
        let mut res = Response::new(if self.is_head { Bytes::new() } else { body });
        *res.status_mut() = status;
        *res.headers_mut() = headers;
        Ok(res)
    }
}

impl AssetDecision {
    /// Split the decision into status, headers and body, for use with any HTTP layer.
    ///
    /// The body is empty for `NotModified`, and a short plain-text message for `Forbidden`
    /// and `NotFound`. Fails only if a header value cannot be represented.
    pub fn into_parts(self) -> Result<(StatusCode, HeaderMap, Bytes)> {
        let (res, body) = match self {
            AssetDecision::NotModified(cache_headers) => (
                validators(HttpResponseBuilder::new(), &cache_headers)
                    .status(StatusCode::NOT_MODIFIED),
                Bytes::new(),
            ),
            AssetDecision::Forbidden => (
                text(StatusCode::FORBIDDEN, FORBIDDEN_BODY),
                Bytes::from_static(FORBIDDEN_BODY.as_bytes()),
            ),
            AssetDecision::NotFound => (
                text(StatusCode::NOT_FOUND, NOT_FOUND_BODY),
                Bytes::from_static(NOT_FOUND_BODY.as_bytes()),
            ),
            AssetDecision::Content(content) => (
                validators(HttpResponseBuilder::new(), &content.cache_headers)
                    .status(StatusCode::OK)
                    .header(header::CONTENT_TYPE, content.content_type)
                    .header(
                        header::CONTENT_LENGTH,
                        content.cache_headers.content_length,
                    ),
                content.body,
            ),
        };

        let (parts, body) = res.body(body)?.into_parts();
        Ok((parts.status, parts.headers, body))
    }
}

fn text(status: StatusCode, body: &'static str) -> HttpResponseBuilder {
    HttpResponseBuilder::new()
        .status(status)
        .header(header::CONTENT_TYPE, TEXT_PLAIN)
        .header(header::CONTENT_LENGTH, body.len())
}

/// Add validators and cache headers, shared by 200 and 304 responses.
fn validators(res: HttpResponseBuilder, cache_headers: &CacheHeaders) -> HttpResponseBuilder {
    res.header(header::LAST_MODIFIED, cache_headers.last_modified_header())
        .header(header::ETAG, cache_headers.etag.as_str())
        .header(header::CACHE_CONTROL, cache_headers.cache_control_header())
        .header(header::EXPIRES, cache_headers.expires_header())
}
