//! Server configuration.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::error::{Result, UrlSenseError};
use crate::inference::DEFAULT_MODEL_FILE;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address
    pub addr: SocketAddr,
    /// CORS enabled (permissive, any origin)
    pub cors_enabled: bool,
    /// Model artifact path; `None` resolves to the default path next to the
    /// executable
    pub model_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            // All interfaces, fixed service port.
            addr: SocketAddr::from(([0, 0, 0, 0], 5001)),
            cors_enabled: true,
            model_path: None,
        }
    }
}

impl ServerConfig {
    /// Create with custom port
    pub fn with_port(mut self, port: u16) -> Self {
        self.addr.set_port(port);
        self
    }

    /// Set the host, keeping the current port.
    pub fn with_host(mut self, host: &str) -> Result<Self> {
        let addr = format!("{host}:{}", self.addr.port())
            .parse()
            .map_err(|e| UrlSenseError::Config(format!("invalid host {host:?}: {e}")))?;
        self.addr = addr;
        Ok(self)
    }

    /// Set address directly
    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    /// Set model artifact path
    pub fn with_model(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = Some(path.into());
        self
    }

    /// Disable CORS
    pub fn without_cors(mut self) -> Self {
        self.cors_enabled = false;
        self
    }

    /// The model artifact path to load: the configured path, or the default
    /// artifact next to the executable.
    pub fn resolved_model_path(&self) -> PathBuf {
        self.model_path
            .clone()
            .unwrap_or_else(Self::default_model_path)
    }

    /// Default artifact location: `suspicious_url_model.safetensors` in the
    /// executable's directory.
    pub fn default_model_path() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .map_or_else(
                || PathBuf::from(DEFAULT_MODEL_FILE),
                |dir| dir.join(DEFAULT_MODEL_FILE),
            )
    }
}
