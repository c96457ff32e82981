//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use furniro_cart::CartHandle;
use furniro_storage::FileStore;

use crate::config::{CliConfig, CONFIG_FILE_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
    /// Config file in use, if one was found.
    pub config_path: Option<PathBuf>,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = if let Some(path) = config_path {
            let path = PathBuf::from(path);
            (CliConfig::load(&path)?, Some(path))
        } else {
            // Try to find config in current directory or parent directories
            match find_config(&cwd) {
                Some((config, path)) => (config, Some(path)),
                None => (CliConfig::default(), None),
            }
        };

        Ok(Self {
            config,
            output,
            cwd,
            config_path,
        })
    }

    /// Directory holding snapshot files.
    ///
    /// Relative paths resolve against the config file's directory, or the
    /// working directory when no config file was found.
    pub fn storage_dir(&self) -> PathBuf {
        let dir = &self.config.storage.dir;
        if dir.is_absolute() {
            return dir.clone();
        }
        let base = self
            .config_path
            .as_deref()
            .and_then(Path::parent)
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(self.cwd.as_path());
        base.join(dir)
    }

    /// Open the cart store over the configured directory.
    pub fn open_cart(&self) -> Result<CartHandle<FileStore>> {
        let dir = self.storage_dir();
        let files = FileStore::open(&dir)
            .with_context(|| format!("Failed to open storage directory: {}", dir.display()))?;
        self.output.debug(&format!("Using storage at {}", dir.display()));

        let cart = CartHandle::open(files, self.config.cart.clone());
        if let Some(warning) = cart.last_warning() {
            self.output.warn(&warning.to_string());
        }
        Ok(cart)
    }
}

/// Find config file in directory tree.
fn find_config(start: &Path) -> Option<(CliConfig, PathBuf)> {
    let mut current = start.to_path_buf();
    loop {
        for name in &CONFIG_FILE_NAMES {
            let config_path = current.join(name);
            if config_path.exists() {
                if let Ok(config) = CliConfig::load(&config_path) {
                    return Some((config, config_path));
                }
            }
        }

        if !current.pop() {
            break;
        }
    }

    None
}
