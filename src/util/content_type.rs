//! The fixed extension to content type table used for served assets.

use std::path::Path;

/// Content type used for unknown or missing extensions.
pub const OCTET_STREAM: &str = "application/octet-stream";

const CONTENT_TYPES: &[(&str, &str)] = &[
    ("css", "text/css"),
    ("js", "application/javascript"),
    ("json", "application/json"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("svg", "image/svg+xml"),
    ("ico", "image/x-icon"),
    ("webp", "image/webp"),
    ("woff", "font/woff"),
    ("woff2", "font/woff2"),
    ("ttf", "font/ttf"),
    ("eot", "application/vnd.ms-fontobject"),
    ("pdf", "application/pdf"),
    ("txt", "text/plain"),
    ("html", "text/html"),
    ("htm", "text/html"),
    ("xml", "application/xml"),
    ("zip", "application/zip"),
];

/// Look up the content type for a file extension, ignoring case.
pub fn from_extension(extension: &str) -> &'static str {
    CONTENT_TYPES
        .iter()
        .find(|(ext, _)| ext.eq_ignore_ascii_case(extension))
        .map_or(OCTET_STREAM, |&(_, mime)| mime)
}

/// Look up the content type for a file path, based on its extension.
pub fn from_path(path: &Path) -> &'static str {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(OCTET_STREAM, from_extension)
}
