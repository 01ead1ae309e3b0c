//! Card effect script lookup.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Supplies card effect scripts to the engine by file name.
pub trait ScriptLoader: Send + Sync {
    /// Returns the script named `name`, or `None` if there is none.
    fn load(&self, name: &str) -> Option<Vec<u8>>;
}

/// Loads nothing; every card behaves as if it had no effect script.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoScripts;

impl ScriptLoader for NoScripts {
    fn load(&self, _name: &str) -> Option<Vec<u8>> {
        None
    }
}

/// Reads scripts from a directory.
///
/// The engine asks for paths such as `./script/c4031.lua`; only the file name
/// is used, so scripts cannot be read from outside the directory.
#[derive(Debug, Clone)]
pub struct ScriptDirectory {
    root: PathBuf,
}

impl ScriptDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, name: &str) -> Option<PathBuf> {
        match Path::new(name).components().next_back()? {
            Component::Normal(file) => Some(self.root.join(file)),
            _ => None,
        }
    }
}

impl ScriptLoader for ScriptDirectory {
    fn load(&self, name: &str) -> Option<Vec<u8>> {
        let path = self.resolve(name)?;
        match fs::read(&path) {
            Ok(bytes) => Some(bytes),
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => {
                tracing::warn!(path = %path.display(), ?err, "failed to read script");
                None
            }
        }
    }
}
