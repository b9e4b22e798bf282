//! Theme Kit command wrapper.
//!
//! Theme creation, code upload and code download are delegated to the
//! `theme` binary (Shopify Theme Kit), which owns the file-set mechanics.
//! This module only builds argument lists, spawns the process and converts a
//! non-zero exit into an error carrying the captured stderr.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, instrument};

use theme_actions_core::ThemeId;

use crate::config::ShopifyConfig;

const DEFAULT_BINARY: &str = "theme";

/// Errors from running a Theme Kit command.
#[derive(Debug, Error)]
pub enum ThemeKitError {
    /// The binary could not be spawned at all.
    #[error("failed to run '{binary}': {source}")]
    Spawn {
        /// The binary that was invoked.
        binary: String,
        /// Underlying spawn failure.
        #[source]
        source: std::io::Error,
    },

    /// The command ran and exited non-zero.
    #[error("theme {subcommand} exited with {status}: {stderr}")]
    Command {
        /// The subcommand that failed (`new`, `deploy`, `download`).
        subcommand: String,
        /// Formatted exit status.
        status: String,
        /// Captured stderr.
        stderr: String,
    },
}

/// Wrapper around the Theme Kit CLI.
///
/// Credentials are passed per-invocation on the command line, the same way
/// the themekit module takes them; nothing is written to a config file.
#[derive(Clone)]
pub struct ThemeKit {
    binary: PathBuf,
    store_url: String,
    password: SecretString,
    /// Extra `--flag=value` pairs appended to every command.
    flags: Vec<(String, String)>,
}

impl std::fmt::Debug for ThemeKit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeKit")
            .field("binary", &self.binary)
            .field("store_url", &self.store_url)
            .field("password", &"[REDACTED]")
            .field("flags", &self.flags)
            .finish()
    }
}

impl ThemeKit {
    /// Create a wrapper using the `theme` binary from `PATH`.
    #[must_use]
    pub fn new(config: &ShopifyConfig, flags: Vec<(String, String)>) -> Self {
        Self {
            binary: PathBuf::from(DEFAULT_BINARY),
            store_url: config.store_url.clone(),
            password: config.password.clone(),
            flags,
        }
    }

    /// Create a new (empty) theme with the given name.
    ///
    /// Theme Kit reports no id back; callers must re-resolve by name.
    ///
    /// # Errors
    ///
    /// Returns error if the command cannot be spawned or exits non-zero.
    #[instrument(skip(self), fields(store = %self.store_url))]
    pub async fn new_theme(&self, name: &str) -> Result<(), ThemeKitError> {
        let args = self.new_theme_args(name);
        self.run("new", &args).await
    }

    /// Push local theme code to the remote theme.
    ///
    /// # Errors
    ///
    /// Returns error if the command cannot be spawned or exits non-zero,
    /// including Theme Kit's own refusal to touch a live theme without
    /// `--allow-live`.
    #[instrument(skip(self), fields(store = %self.store_url, theme_id = %theme_id))]
    pub async fn deploy(
        &self,
        theme_id: ThemeId,
        dir: &Path,
        allow_live: bool,
    ) -> Result<(), ThemeKitError> {
        let args = self.deploy_args(theme_id, dir, allow_live);
        self.run("deploy", &args).await
    }

    /// Download the full content of a remote theme into `dir`.
    ///
    /// # Errors
    ///
    /// Returns error if the command cannot be spawned or exits non-zero.
    #[instrument(skip(self), fields(store = %self.store_url, theme_id = %theme_id))]
    pub async fn download(&self, theme_id: ThemeId, dir: &Path) -> Result<(), ThemeKitError> {
        let args = self.download_args(theme_id, dir);
        self.run("download", &args).await
    }

    fn base_args(&self) -> Vec<String> {
        let mut args = vec![
            format!("--store={}", self.store_url),
            format!("--password={}", self.password.expose_secret()),
        ];
        for (flag, value) in &self.flags {
            args.push(format!("--{flag}={value}"));
        }
        args
    }

    fn new_theme_args(&self, name: &str) -> Vec<String> {
        let mut args = self.base_args();
        args.push(format!("--name={name}"));
        args
    }

    fn deploy_args(&self, theme_id: ThemeId, dir: &Path, allow_live: bool) -> Vec<String> {
        let mut args = self.base_args();
        args.push(format!("--themeid={theme_id}"));
        args.push(format!("--dir={}", dir.display()));
        if allow_live {
            args.push("--allow-live".to_string());
        }
        args
    }

    fn download_args(&self, theme_id: ThemeId, dir: &Path) -> Vec<String> {
        let mut args = self.base_args();
        args.push(format!("--themeid={theme_id}"));
        args.push(format!("--dir={}", dir.display()));
        args
    }

    async fn run(&self, subcommand: &str, args: &[String]) -> Result<(), ThemeKitError> {
        let output = Command::new(&self.binary)
            .arg(subcommand)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| ThemeKitError::Spawn {
                binary: self.binary.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(ThemeKitError::Command {
                subcommand: subcommand.to_string(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        debug!(subcommand, "Theme Kit command succeeded");
        Ok(())
    }
}
