//! Configuration loading (.env + fastly.toml) and the per-invocation context

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use serde::Deserialize;

use crate::api::Client;
use crate::cli::GlobalArgs;
use crate::error::{ErrLog, FastlyError};

pub const MANIFEST_FILE: &str = "fastly.toml";
pub const SERVICE_ID_ENV: &str = "FASTLY_SERVICE_ID";

/// Project directory (where .env and fastly.toml are)
pub fn project_dir() -> PathBuf {
    // Check FASTLY_PROJECT_DIR env first
    if let Ok(dir) = std::env::var("FASTLY_PROJECT_DIR") {
        return PathBuf::from(dir);
    }
    // Default to current directory
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Load .env file if there is one. Returns whether a file was loaded.
pub fn load_env() -> Result<bool, dotenvy::Error> {
    let env_path = project_dir().join(".env");
    if !env_path.is_file() {
        return Ok(false);
    }
    dotenvy::from_path(&env_path)?;
    Ok(true)
}

// ============ Manifest ============

#[derive(Debug, Default, Clone, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub manifest_version: Option<u32>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub service_id: Option<String>,
}

impl Manifest {
    /// Read a manifest file. A missing file yields an empty manifest.
    pub fn load_from(path: &Path) -> Result<Self, FastlyError> {
        if !path.exists() {
            tracing::debug!("no manifest at {}", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| FastlyError::Manifest {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let manifest: Self = toml::from_str(&content).map_err(|e| FastlyError::Manifest {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        tracing::debug!(
            name = ?manifest.name,
            manifest_version = ?manifest.manifest_version,
            "loaded manifest {}",
            path.display()
        );
        Ok(manifest)
    }
}

/// Where a service ID came from, for verbose output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceIdSource {
    Flag,
    NameLookup,
    Env,
    Manifest,
}

impl fmt::Display for ServiceIdSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let via = match self {
            ServiceIdSource::Flag => "--service-id",
            ServiceIdSource::NameLookup => "--service-name",
            ServiceIdSource::Env => SERVICE_ID_ENV,
            ServiceIdSource::Manifest => MANIFEST_FILE,
        };
        f.write_str(via)
    }
}

/// Defaults that apply when flags leave something out.
#[derive(Debug, Default, Clone)]
pub struct ProjectConfig {
    pub manifest: Manifest,
    pub env_service_id: Option<String>,
}

impl ProjectConfig {
    pub fn load() -> Result<Self, FastlyError> {
        let manifest = Manifest::load_from(&project_dir().join(MANIFEST_FILE))?;
        let env_service_id = std::env::var(SERVICE_ID_ENV).ok();
        Ok(Self { manifest, env_service_id })
    }

    /// Service ID to use when neither --service-id nor --service-name is given.
    pub fn default_service_id(&self) -> Option<(&str, ServiceIdSource)> {
        fn non_empty(v: &Option<String>) -> Option<&str> {
            v.as_deref().filter(|s| !s.trim().is_empty())
        }
        if let Some(id) = non_empty(&self.env_service_id) {
            return Some((id, ServiceIdSource::Env));
        }
        non_empty(&self.manifest.service_id).map(|id| (id, ServiceIdSource::Manifest))
    }
}

// ============ Invocation context ============

/// Everything a command needs besides its own flags.
#[derive(Debug)]
pub struct Globals {
    pub client: Client,
    pub project: ProjectConfig,
    pub verbose: bool,
    pub errlog: ErrLog,
}

impl Globals {
    pub fn new(client: Client, project: ProjectConfig, verbose: bool) -> Self {
        Self { client, project, verbose, errlog: ErrLog::new() }
    }

    pub fn from_args(args: &GlobalArgs) -> Result<Self, FastlyError> {
        let client = Client::new(
            &args.endpoint,
            args.token.clone(),
            Duration::from_secs(args.timeout),
        )?;
        Ok(Self::new(client, ProjectConfig::load()?, args.verbose))
    }
}
