//! Bundled fixture lookup for stubbed responses.
//!
//! A `FixtureBundle` is a directory of pre-recorded payloads addressed by
//! `(name, extension, directory)`. Lookups hit the filesystem on every call;
//! nothing is cached.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

/// Environment variable that relocates the main bundle.
pub const FIXTURES_DIR_ENV: &str = "ENDPOINT_FIXTURES_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureBundle {
    root: PathBuf,
}

impl FixtureBundle {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The bundle shipped with this crate, or `$ENDPOINT_FIXTURES_DIR` when set.
    pub fn main() -> Self {
        Self::from_env_or(Self::bundled())
    }

    /// The `fixtures/` directory of this crate, ignoring the environment.
    pub fn bundled() -> Self {
        Self::new(concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures"))
    }

    /// `$ENDPOINT_FIXTURES_DIR` when set, otherwise `default`.
    pub fn from_env_or(default: FixtureBundle) -> Self {
        from_var_or(FIXTURES_DIR_ENV, default)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location of `directory/name.extension` inside the bundle, if it exists.
    pub fn path_for(&self, name: &str, extension: &str, directory: &str) -> Option<PathBuf> {
        let file_name = if extension.is_empty() {
            name.to_string()
        } else {
            format!("{name}.{extension}")
        };
        let path = self.root.join(directory).join(file_name);
        path.is_file().then_some(path)
    }

    /// Contents of the resource as UTF-8 text, or `None` when it is missing,
    /// unreadable, or not valid UTF-8.
    pub fn read_string(&self, name: &str, extension: &str, directory: &str) -> Option<String> {
        let path = self.path_for(name, extension, directory)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Some(contents),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "fixture unreadable");
                None
            }
        }
    }

    /// Resource bytes for stubbing. Missing or unreadable resources yield an
    /// empty payload rather than an error.
    pub fn data(&self, name: &str, extension: &str, directory: &str) -> Vec<u8> {
        match self.read_string(name, extension, directory) {
            Some(contents) => contents.into_bytes(),
            None => {
                warn!(
                    root = %self.root.display(),
                    fixture = name,
                    extension,
                    "fixture unavailable, stubbing an empty payload"
                );
                Vec::new()
            }
        }
    }
}

fn from_var_or(key: &str, default: FixtureBundle) -> FixtureBundle {
    match std::env::var_os(key) {
        Some(dir) => FixtureBundle::new(dir),
        None => default,
    }
}
