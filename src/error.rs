//! Error types and the error log
//!
//! `FastlyError` covers every failure the CLI classifies itself. Commands
//! work with `anyhow::Result` and attach context; `main` looks for a
//! `FastlyError` in the chain to pick the exit code and remediation hint.

use std::cell::RefCell;

use thiserror::Error;

pub const AUTOCLONE_REMEDIATION: &str =
    "Repeat the command with the --autoclone flag to allow the version to be cloned";
pub const SERVICE_ID_REMEDIATION: &str = "Please provide one via the --service-id or --service-name flag, \
     or by setting the FASTLY_SERVICE_ID environment variable, or within your fastly.toml manifest";
pub const TOKEN_REMEDIATION: &str =
    "Provide an API token with --token or by setting the FASTLY_API_TOKEN environment variable";
pub const VERSION_REMEDIATION: &str =
    "Pass --version with a version number, 'latest' or 'active'";

/// Broad failure class, used for exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Input,
    Auth,
    Remote,
    Timeout,
    System,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Input => "in",
            Category::Auth => "auth",
            Category::Remote => "ext",
            Category::Timeout => "time",
            Category::System => "sys",
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Category::Input => 1,
            Category::Auth => 3,
            Category::Timeout => 4,
            Category::Remote | Category::System => 2,
        }
    }
}

#[derive(Debug, Error)]
pub enum FastlyError {
    #[error("invalid flag combination, --verbose and --json")]
    InvalidVerboseJsonCombo,

    #[error("invalid flag combination, --service-id and --service-name")]
    ServiceIdNameConflict,

    #[error("error reading service: no service ID found")]
    NoServiceId,

    #[error("error reading service version: no service version found")]
    NoServiceVersion,

    #[error("error parsing flag: --version must be a positive integer, 'latest' or 'active' (got '{0}')")]
    InvalidVersion(String),

    #[error("service version {0} is not editable")]
    ActiveLockedVersion(u32),

    #[error("no active service version found")]
    NoActiveVersion,

    #[error("error listing service versions: no versions available")]
    NoVersions,

    #[error("error parsing arguments: {0}")]
    InvalidArguments(String),

    #[error("no API token found")]
    NoToken,

    #[error("error reading manifest {path}: {message}")]
    Manifest { path: String, message: String },

    #[error("invalid API endpoint '{0}'")]
    InvalidEndpoint(String),

    #[error("{status} - {message}")]
    Api { status: u16, message: String },

    #[error("error decoding API response: {0}")]
    Decode(String),

    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

impl FastlyError {
    pub fn category(&self) -> Category {
        match self {
            FastlyError::InvalidVerboseJsonCombo
            | FastlyError::ServiceIdNameConflict
            | FastlyError::NoServiceId
            | FastlyError::NoServiceVersion
            | FastlyError::InvalidVersion(_)
            | FastlyError::ActiveLockedVersion(_)
            | FastlyError::InvalidArguments(_)
            | FastlyError::Manifest { .. }
            | FastlyError::InvalidEndpoint(_) => Category::Input,
            FastlyError::NoToken => Category::Auth,
            FastlyError::Api { status, .. } if *status == 401 || *status == 403 => Category::Auth,
            FastlyError::Api { .. } | FastlyError::NoActiveVersion | FastlyError::NoVersions => {
                Category::Remote
            }
            FastlyError::Transport(e) if e.is_timeout() => Category::Timeout,
            FastlyError::Transport(_) => Category::Remote,
            FastlyError::Decode(_) => Category::System,
        }
    }

    /// Hint printed below the error message.
    pub fn remediation(&self) -> Option<&'static str> {
        match self {
            FastlyError::InvalidVerboseJsonCombo => {
                Some("Use either --verbose or --json, not both")
            }
            FastlyError::ServiceIdNameConflict => {
                Some("Use either --service-id or --service-name, not both")
            }
            FastlyError::NoServiceId => Some(SERVICE_ID_REMEDIATION),
            FastlyError::NoServiceVersion | FastlyError::InvalidVersion(_) => {
                Some(VERSION_REMEDIATION)
            }
            FastlyError::ActiveLockedVersion(_) => Some(AUTOCLONE_REMEDIATION),
            FastlyError::NoToken => Some(TOKEN_REMEDIATION),
            FastlyError::Api { status, .. } if *status == 401 || *status == 403 => {
                Some(TOKEN_REMEDIATION)
            }
            FastlyError::Api { status: 404, .. } => {
                Some("Check the service ID, version and resource name are correct")
            }
            FastlyError::Transport(_) => Some("Check your network connection and API endpoint"),
            _ => None,
        }
    }
}

/// Find the classified error inside an `anyhow` chain.
pub fn classify(err: &anyhow::Error) -> Option<&FastlyError> {
    err.chain().find_map(|e| e.downcast_ref::<FastlyError>())
}

/// A recorded failure and the fields that were known when it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub message: String,
    pub context: Vec<(&'static str, String)>,
}

/// Error-tracking log shared by every command of an invocation.
#[derive(Debug, Default)]
pub struct ErrLog {
    entries: RefCell<Vec<LogEntry>>,
}

impl ErrLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn add(&self, err: &anyhow::Error, context: Vec<(&'static str, String)>) {
        let message = format!("{:#}", err);
        tracing::debug!(error = %message, context = ?context, "recorded error");
        self.entries.borrow_mut().push(LogEntry { message, context });
    }

    /// Log `err` with `context` and hand it back for propagation.
    pub fn record<E>(&self, err: E, context: Vec<(&'static str, String)>) -> anyhow::Error
    where
        E: Into<anyhow::Error>,
    {
        let err = err.into();
        self.add(&err, context);
        err
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.borrow().clone()
    }
}
