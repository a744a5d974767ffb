use std::io::Error as IoError;
use std::path::PathBuf;

/// Failures that are not a regular outcome of serving an asset.
///
/// A path outside the root, a missing file and a satisfied conditional request are all
/// normal results, reflected in `AssetDecision`. The variants here are what remains, and are
/// expected to become a 5xx response.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The static root could not be canonicalized, or is not a directory.
    #[error("invalid static root {path:?}: {source}")]
    Root {
        /// The root as configured.
        path: PathBuf,
        /// The underlying IO error.
        source: IoError,
    },
    /// A filesystem operation failed after the path was validated.
    #[error("failed to read {path:?}: {source}")]
    Read {
        /// The file being served.
        path: PathBuf,
        /// The underlying IO error.
        source: IoError,
    },
    /// The blocking task serving the request did not complete.
    #[error("background task failed")]
    Task,
    /// The response could not be constructed.
    #[error(transparent)]
    Http(#[from] http::Error),
}
