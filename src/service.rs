use crate::util::RequestedPath;
use crate::{AssetDecision, AssetRequest, AssetResponder, Error, ResponseBuilder};
use futures_util::future::{self, BoxFuture, FutureExt};
use http::response::Builder as HttpResponseBuilder;
use http::{header, Method, Request, Response, StatusCode};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::service::Service;
use std::path::PathBuf;

/// High-level interface for serving static assets.
///
/// This struct serves files from a single root path, which may be absolute or relative. The
/// request URI path is percent-decoded, stripped of the optional mount prefix, and resolved
/// under the root. Only regular files are served; directories yield 404 and paths escaping
/// the root yield 403.
///
/// Settings are initialized using the builder pattern. The struct is cheap to clone, and
/// implements the `hyper::service::Service` trait, which simply wraps `StaticAssets::serve`.
#[derive(Clone, Debug)]
pub struct StaticAssets {
    /// The responder doing the actual work.
    pub responder: AssetResponder,
    /// Route prefix stripped from request paths, without trailing slash.
    pub prefix: String,
}

impl StaticAssets {
    /// Create a new instance of `StaticAssets` with a given root path.
    ///
    /// The root is canonicalized here, once, and must be an existing directory.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, Error> {
        Ok(StaticAssets {
            responder: AssetResponder::new(root)?,
            prefix: String::new(),
        })
    }

    /// Advertise the given cache lifespan in seconds, in `Cache-Control` and `Expires`.
    pub fn max_age(&mut self, seconds: u32) -> &mut Self {
        self.responder.max_age(seconds);
        self
    }

    /// Serve only request paths below the given prefix, such as `/static`.
    pub fn prefix(&mut self, prefix: &str) -> &mut Self {
        self.prefix = prefix.trim_end_matches('/').to_owned();
        self
    }

    /// Serve a request.
    pub fn serve<B>(
        &self,
        request: &Request<B>,
    ) -> BoxFuture<'static, Result<Response<Full<Bytes>>, Error>> {
        let mut builder = ResponseBuilder::new();
        builder.request(request);

        // Handle only `GET`/`HEAD` and simple path requests.
        match *request.method() {
            Method::HEAD | Method::GET => {}
            _ => return future::ready(method_not_allowed()).boxed(),
        }
        if request.uri().scheme_str().is_some() || request.uri().host().is_some() {
            return future::ready(not_found(&builder)).boxed();
        }
        let relative = match self.strip_prefix(request.uri().path()) {
            Some(relative) => relative,
            None => return future::ready(not_found(&builder)).boxed(),
        };

        let requested = RequestedPath::from_uri_path(relative);
        let asset_request =
            AssetRequest::from_headers(requested.relative.to_string_lossy(), request);

        let responder = self.responder.clone();
        async move {
            match responder.serve_async(asset_request).await {
                Ok(decision) => builder.build(decision).map_err(Error::from),
                Err(err) => {
                    log::error!("{}", err);
                    Err(err)
                }
            }
        }
        .boxed()
    }

    fn strip_prefix<'a>(&self, path: &'a str) -> Option<&'a str> {
        let rest = path.strip_prefix(self.prefix.as_str())?;
        if rest.is_empty() || rest.starts_with('/') {
            Some(rest)
        } else {
            None
        }
    }
}

fn not_found(builder: &ResponseBuilder) -> Result<Response<Full<Bytes>>, Error> {
    Ok(builder.build(AssetDecision::NotFound)?)
}

fn method_not_allowed() -> Result<Response<Full<Bytes>>, Error> {
    Ok(HttpResponseBuilder::new()
        .status(StatusCode::METHOD_NOT_ALLOWED)
        .header(header::ALLOW, "GET, HEAD")
        .body(Full::new(Bytes::new()))?)
}

impl<B> Service<Request<B>> for StaticAssets {
    type Response = Response<Full<Bytes>>;
    type Error = Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn call(&self, request: Request<B>) -> Self::Future {
        self.serve(&request)
    }
}
