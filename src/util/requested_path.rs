use std::path::{Component, Path, PathBuf};

#[inline]
fn decode_percents(string: &str) -> String {
    percent_encoding::percent_decode_str(string)
        .decode_utf8_lossy()
        .into_owned()
}

/// Make `path` relative so it can be joined onto a root.
///
/// Leading separators, drive prefixes and `.` segments are dropped. Unlike a lexical
/// normalization, `..` segments are kept: whether they escape the root is decided on the
/// canonical path later, not here.
pub fn relativize(path: &Path) -> PathBuf {
    path.components()
        .fold(PathBuf::new(), |mut result, p| match p {
            Component::Normal(x) => {
                // Parse again to prevent a malicious component containing
                // a Windows drive letter, e.g.: `/anypath/c:/windows/win.ini`
                if Path::new(&x)
                    .components()
                    .all(|c| matches!(c, Component::Normal(_)))
                {
                    result.push(x);
                }
                result
            }
            Component::ParentDir => {
                result.push("..");
                result
            }
            _ => result,
        })
}

/// Requested path, as taken from a request URI.
pub struct RequestedPath {
    /// Percent-decoded path, relative to the asset root.
    pub relative: PathBuf,
}

impl RequestedPath {
    /// Decode a URI path into a path relative to the asset root.
    pub fn from_uri_path(uri_path: &str) -> Self {
        RequestedPath {
            relative: relativize(Path::new(&decode_percents(uri_path))),
        }
    }
}
