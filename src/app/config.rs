//! Config directory resolution for `theme.conf`, `keybinds.conf` and the log file.

use std::path::{Path, PathBuf};

use crate::error::{Context, Result};

const APP_DIR: &str = "pokedex-manager";

/// Where config files are read from and written to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigPaths {
    dir: PathBuf,
}

impl ConfigPaths {
    /// Use `dir` as given.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Resolve the config dir: explicit path, then `$XDG_CONFIG_HOME`, then
    /// `$HOME/.config`, then the current directory.
    pub fn resolve(explicit: Option<PathBuf>) -> Self {
        Self::resolve_with(explicit, |k| std::env::var_os(k).map(PathBuf::from))
    }

    fn resolve_with<F>(explicit: Option<PathBuf>, env: F) -> Self
    where
        F: Fn(&str) -> Option<PathBuf>,
    {
        if let Some(dir) = explicit {
            return Self::new(dir);
        }
        if let Some(xdg) = env("XDG_CONFIG_HOME").filter(|p| !p.as_os_str().is_empty()) {
            return Self::new(xdg.join(APP_DIR));
        }
        if let Some(home) = env("HOME").filter(|p| !p.as_os_str().is_empty()) {
            return Self::new(home.join(".config").join(APP_DIR));
        }
        Self::new(".")
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of a file inside the config dir.
    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Create the config dir if it does not exist yet.
    pub fn ensure_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_ctx(|| format!("create config dir {}", self.dir.display()))
    }
}

impl Default for ConfigPaths {
    fn default() -> Self {
        Self::resolve(None)
    }
}
