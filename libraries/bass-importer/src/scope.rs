//! Scoped access to user-picked files
//!
//! Files picked outside the app container are readable only between a
//! begin/end access pair. [`AccessGuard`] ties the end to a scope so every
//! exit path releases access.

use std::path::{Path, PathBuf};

/// Grants temporary read access to a picked file
pub trait SecurityScope: Send + Sync {
    /// Begin access; `false` means the file may not be read
    fn begin_access(&self, path: &Path) -> bool;

    /// End access previously granted by [`begin_access`](Self::begin_access)
    fn end_access(&self, path: &Path);
}

/// Scope for platforms without sandboxed file access
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopScope;

impl SecurityScope for NoopScope {
    fn begin_access(&self, _path: &Path) -> bool {
        true
    }

    fn end_access(&self, _path: &Path) {}
}

/// Releases access on drop
pub struct AccessGuard<'a> {
    scope: &'a dyn SecurityScope,
    path: PathBuf,
}

impl<'a> AccessGuard<'a> {
    /// Begin access, returning `None` if it was refused
    pub fn acquire(scope: &'a dyn SecurityScope, path: &Path) -> Option<Self> {
        scope.begin_access(path).then(|| Self {
            scope,
            path: path.to_path_buf(),
        })
    }
}

impl Drop for AccessGuard<'_> {
    fn drop(&mut self) {
        self.scope.end_access(&self.path);
    }
}
