//! Path confinement for every tool operation.
//!
//! A [`WorkingRoot`] is fixed once per run. Model-supplied paths are joined
//! onto it, normalized lexically, and rejected unless the result is still a
//! descendant of the root. The deepest ancestor that already exists is also
//! canonicalized, so a symlink inside the root cannot be used to reach out.

use anyhow::{Context, Result};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::error::ToolError;

/// Links followed before giving up, matching the usual `SYMLOOP_MAX`.
const MAX_LINK_HOPS: usize = 40;

/// What a tool intends to do with a path. Only affects the error wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    List,
    Read,
    Execute,
    Write,
}

impl Access {
    fn verb(self) -> &'static str {
        match self {
            Access::List => "list",
            Access::Read => "read",
            Access::Execute => "execute",
            Access::Write => "write to",
        }
    }
}

/// The directory beneath which all sandboxed file operations are confined.
#[derive(Debug, Clone)]
pub struct WorkingRoot {
    /// Canonical absolute path of the root.
    path: PathBuf,
}

impl WorkingRoot {
    /// Creates a root from an existing directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the path does not exist or is not a directory.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let canonical = path
            .canonicalize()
            .with_context(|| format!("Working directory {} does not exist", path.display()))?;
        if !canonical.is_dir() {
            anyhow::bail!("Working directory {} is not a directory", path.display());
        }
        Ok(Self { path: canonical })
    }

    /// Returns the canonical root path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Resolves `relative` against the root and checks containment.
    ///
    /// Absolute inputs replace the root entirely, so they only pass when they
    /// already point inside it.
    pub fn resolve(&self, relative: &str, access: Access) -> Result<PathBuf, ToolError> {
        let escape = || ToolError::PathEscape {
            action: access.verb(),
            path: relative.to_string(),
        };

        let target = normalize(&self.path.join(relative));
        if !target.starts_with(&self.path) {
            return Err(escape());
        }

        if !real_path(&target)?.starts_with(&self.path) {
            return Err(escape());
        }

        Ok(target)
    }
}

impl fmt::Display for WorkingRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// Where `path` actually lands once every symlink along it is followed.
///
/// Components that do not exist yet are carried over unchanged. Dangling
/// links are followed through their target, since a write would create it.
fn real_path(path: &Path) -> Result<PathBuf, ToolError> {
    let mut current = path.to_path_buf();
    for _ in 0..MAX_LINK_HOPS {
        let Some(existing) = current
            .ancestors()
            .find(|p| p.symlink_metadata().is_ok())
            .map(Path::to_path_buf)
        else {
            return Ok(current);
        };
        let rest = current
            .strip_prefix(&existing)
            .map(Path::to_path_buf)
            .unwrap_or_default();

        if existing.exists() {
            return Ok(existing.canonicalize()?.join(rest));
        }

        // Only a dangling symlink has metadata but does not exist.
        let link = fs::read_link(&existing)?;
        let base = existing.parent().unwrap_or(Path::new("/"));
        current = normalize(&base.join(link).join(rest));
    }
    Err(ToolError::Io(io::Error::other("too many levels of symbolic links")))
}

/// Collapses `.` and `..` components without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
