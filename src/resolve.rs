use crate::util::relativize;
use crate::Error;
use std::io::{Error as IoError, ErrorKind as IoErrorKind};
use std::path::{Path, PathBuf};

/// The requested path resolves outside of the static root.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("path escapes the static root")]
pub struct Forbidden;

/// Maps relative request paths onto the filesystem, confined to a single root directory.
///
/// The root is canonicalized once, when the resolver is created. Every resolved path is
/// checked against it on canonical form, so `..` segments and symlinks pointing out of the
/// root are both caught. The check compares whole path components: a root of `/srv/static`
/// does not contain `/srv/static-evil`.
#[derive(Clone, Debug)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    /// Create a resolver for the given root directory.
    ///
    /// The root may be absolute or relative, but must exist and be a directory.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, Error> {
        let path = root.into();
        let root = match path.canonicalize() {
            Ok(root) => root,
            Err(source) => return Err(Error::Root { path, source }),
        };
        if !root.is_dir() {
            return Err(Error::Root {
                path,
                source: IoError::new(IoErrorKind::InvalidInput, "not a directory"),
            });
        }
        Ok(PathResolver { root })
    }

    /// The canonical form of the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a path relative to the root.
    ///
    /// Leading separators and drive prefixes are stripped before joining, so absolute input
    /// cannot replace the root. If the target does not exist, containment is checked on its
    /// parent directory instead; if that does not exist either, the path is rejected.
    ///
    /// On success, returns the canonical path of the target, or for a missing target, the
    /// canonical parent joined with the file name. Symlinks are already resolved, so the
    /// result needs no further canonicalization. Whether it is actually a file is left to
    /// the caller: an empty path resolves to the root directory itself.
    pub fn resolve(&self, relative_path: &str) -> Result<PathBuf, Forbidden> {
        let candidate = self.root.join(relativize(Path::new(relative_path)));
        let resolved = match candidate.canonicalize() {
            Ok(canonical) => self.contain(canonical),
            Err(_) => self.resolve_missing(&candidate),
        };
        if resolved.is_err() {
            log::warn!("rejected {:?}: outside of static root", relative_path);
        }
        resolved
    }

    fn resolve_missing(&self, candidate: &Path) -> Result<PathBuf, Forbidden> {
        let (parent, file_name) = match (candidate.parent(), candidate.file_name()) {
            (Some(parent), Some(file_name)) => (parent, file_name),
            _ => return Err(Forbidden),
        };
        let parent = parent.canonicalize().map_err(|_| Forbidden)?;
        self.contain(parent).map(|parent| parent.join(file_name))
    }

    fn contain(&self, path: PathBuf) -> Result<PathBuf, Forbidden> {
        // `Path::starts_with` compares components, not bytes.
        if path.starts_with(&self.root) {
            Ok(path)
        } else {
            Err(Forbidden)
        }
    }
}

/// Resolve a path relative to `root` in one go.
///
/// This canonicalizes the root on every call. An unusable root rejects every path. Prefer
/// keeping a `PathResolver` around when serving more than one request.
pub fn resolve_path(root: impl Into<PathBuf>, relative_path: &str) -> Result<PathBuf, Forbidden> {
    PathResolver::new(root)
        .map_err(|_| Forbidden)?
        .resolve(relative_path)
}
