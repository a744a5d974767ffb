use crate::negotiate::{decide, Conditionals, Negotiation};
use crate::resolve::{Forbidden, PathResolver};
use crate::util::{content_type, to_http_date, HeaderSource};
use crate::Error;
use hyper::body::Bytes;
use md5::{Digest, Md5};
use std::fs::{self, Metadata};
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

/// Cache lifetime used unless configured otherwise: one year.
pub const DEFAULT_MAX_AGE: u32 = 31_536_000;

/// A single request for an asset.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssetRequest {
    /// Path of the asset, relative to the static root.
    pub relative_path: String,
    /// Conditional request headers.
    pub conditionals: Conditionals,
}

impl AssetRequest {
    /// Create an unconditional request for the given path.
    pub fn new(relative_path: impl Into<String>) -> Self {
        AssetRequest {
            relative_path: relative_path.into(),
            conditionals: Conditionals::new(),
        }
    }

    /// Create a request for the given path, with conditionals read from `headers`.
    pub fn from_headers<H: HeaderSource + ?Sized>(
        relative_path: impl Into<String>,
        headers: &H,
    ) -> Self {
        AssetRequest {
            relative_path: relative_path.into(),
            conditionals: Conditionals::from_headers(headers),
        }
    }
}

/// A file found under the static root, with its validators.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedAsset {
    /// Canonical path of the file.
    pub path: PathBuf,
    /// Size in bytes.
    pub size: u64,
    /// Last modification time.
    pub modified: SystemTime,
    /// Lowercase hex MD5 digest of the content.
    pub content_hash: String,
}

impl ResolvedAsset {
    /// The `ETag` value for this asset: the content hash, quoted.
    pub fn etag(&self) -> String {
        format!("\"{}\"", self.content_hash)
    }
}

/// Validation and caching headers sent along with an asset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheHeaders {
    /// Value of `Content-Length`.
    pub content_length: u64,
    /// Value of `Last-Modified`.
    pub last_modified: SystemTime,
    /// Value of `ETag`, quoted.
    pub etag: String,
    /// Lifespan advertised in `Cache-Control`.
    pub max_age: u32,
    /// Value of `Expires`.
    pub expires: SystemTime,
}

impl CacheHeaders {
    /// Cache headers for an asset, expiring `max_age` seconds from now.
    pub fn for_asset(asset: &ResolvedAsset, max_age: u32) -> Self {
        CacheHeaders {
            content_length: asset.size,
            last_modified: asset.modified,
            etag: asset.etag(),
            max_age,
            expires: SystemTime::now() + Duration::from_secs(max_age.into()),
        }
    }

    /// `Last-Modified` formatted as an HTTP date.
    pub fn last_modified_header(&self) -> String {
        to_http_date(self.last_modified)
    }

    /// `Expires` formatted as an HTTP date.
    pub fn expires_header(&self) -> String {
        to_http_date(self.expires)
    }

    /// The `Cache-Control` value.
    pub fn cache_control_header(&self) -> String {
        format!("public, max-age={}", self.max_age)
    }
}

/// Full content of an asset, ready to be sent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetContent {
    /// File content, unmodified.
    pub body: Bytes,
    /// Content type derived from the file extension.
    pub content_type: &'static str,
    /// Headers to send with the content.
    pub cache_headers: CacheHeaders,
}

/// The result of serving an asset request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssetDecision {
    /// The client copy is current. Carries the headers to repeat on the 304.
    NotModified(CacheHeaders),
    /// The path escapes the static root.
    Forbidden,
    /// The path does not name a regular file.
    NotFound,
    /// The asset content.
    Content(AssetContent),
}

/// Serves asset requests from a single static root.
///
/// Every request is handled from scratch: the path is resolved and checked, the file is
/// stat'ed and read, and nothing is cached between requests. `serve` blocks on the
/// filesystem; `serve_async` moves it onto the tokio blocking pool.
#[derive(Clone, Debug)]
pub struct AssetResponder {
    /// Resolver confining requests to the root.
    pub resolver: PathResolver,
    /// Cache lifespan in seconds, used for `Cache-Control` and `Expires`.
    pub max_age: u32,
}

impl AssetResponder {
    /// Create a responder for the given root directory.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, Error> {
        Ok(Self::with_resolver(PathResolver::new(root)?))
    }

    /// Create a responder using an existing resolver.
    pub fn with_resolver(resolver: PathResolver) -> Self {
        AssetResponder {
            resolver,
            max_age: DEFAULT_MAX_AGE,
        }
    }

    /// Advertise the given cache lifespan in seconds.
    pub fn max_age(&mut self, seconds: u32) -> &mut Self {
        self.max_age = seconds;
        self
    }

    /// Serve a request.
    ///
    /// Paths outside the root, missing files and fresh client copies are regular outcomes.
    /// Only an IO failure after the path was found to be a file is returned as an error.
    pub fn serve(&self, request: &AssetRequest) -> Result<AssetDecision, Error> {
        let path = match self.resolver.resolve(&request.relative_path) {
            Ok(path) => path,
            Err(Forbidden) => return Ok(AssetDecision::Forbidden),
        };

        let metadata = match fs::metadata(&path) {
            Ok(metadata) if metadata.is_file() => metadata,
            _ => {
                log::debug!("not found: {:?}", path);
                return Ok(AssetDecision::NotFound);
            }
        };

        let (asset, body) = read_asset(path, &metadata)?;
        let cache_headers = CacheHeaders::for_asset(&asset, self.max_age);

        if decide(asset.modified, &asset.content_hash, &request.conditionals)
            == Negotiation::NotModified
        {
            log::debug!("not modified: {:?}", asset.path);
            return Ok(AssetDecision::NotModified(cache_headers));
        }

        log::debug!("serving {:?} ({} bytes)", asset.path, asset.size);
        Ok(AssetDecision::Content(AssetContent {
            body,
            content_type: content_type::from_path(&asset.path),
            cache_headers,
        }))
    }

    /// Serve a request on the tokio blocking pool.
    pub async fn serve_async(&self, request: AssetRequest) -> Result<AssetDecision, Error> {
        let responder = self.clone();
        run_blocking(move || responder.serve(&request)).await
    }
}

/// Run a blocking closure on the tokio blocking pool.
///
/// A panic in the closure surfaces as `Error::Task`.
async fn run_blocking<T, F>(f: F) -> Result<T, Error>
where
    F: FnOnce() -> Result<T, Error> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|_| Error::Task)?
}

/// Read a file and compute its validators.
///
/// The content is read once, and both hashed and returned as the body. The size reported is
/// that of the content actually read.
fn read_asset(path: PathBuf, metadata: &Metadata) -> Result<(ResolvedAsset, Bytes), Error> {
    let modified = match metadata.modified() {
        Ok(modified) => modified,
        Err(source) => return Err(Error::Read { path, source }),
    };
    let data = match fs::read(&path) {
        Ok(data) => data,
        Err(source) => return Err(Error::Read { path, source }),
    };

    let asset = ResolvedAsset {
        size: data.len() as u64,
        modified,
        content_hash: hash_content(&data),
        path,
    };
    Ok((asset, data.into()))
}

/// Compute the content hash used as `ETag`.
pub fn hash_content(data: &[u8]) -> String {
    hex::encode(Md5::digest(data))
}
