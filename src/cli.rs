//! CLI definition using clap

use clap::{Args, Parser, Subcommand};

use crate::api::{SnippetType, DEFAULT_ENDPOINT};

#[derive(Parser, Debug)]
#[command(name = "fastly")]
#[command(version)]
#[command(about = "Manage Fastly service logging endpoints and VCL snippets")]
#[command(long_about = r#"
Fastly CLI - manage the configuration of Fastly services

Commands:
  logging  Logging endpoints (Datadog, FTP, Loggly, Splunk)
  vcl      VCL snippets

Setup:
  Provide an API token with --token or FASTLY_API_TOKEN (a .env file in the
  project directory is read too). The service ID comes from --service-id,
  --service-name, FASTLY_SERVICE_ID or the service_id in fastly.toml.
"#)]
#[command(after_help = r#"
Examples:

  List Datadog endpoints on the active version:
    fastly logging datadog list --service-id SU1Z0isxPaozGVKXdv0eY --version active

  Show an FTP endpoint as JSON:
    fastly logging ftp describe -s SU1Z0isxPaozGVKXdv0eY --version 3 --name archive --json

  Update a versioned VCL snippet, cloning the active version first:
    fastly vcl snippet update --version active --autoclone --name geo --content ./geo.vcl
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub globals: GlobalArgs,
}

#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Verbose logging and output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Fastly API token
    #[arg(short, long, global = true, env = "FASTLY_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Fastly API endpoint
    #[arg(long, global = true, env = "FASTLY_API_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// HTTP timeout in seconds
    #[arg(long, global = true, default_value_t = 60, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manipulate Fastly service version logging endpoints
    Logging(LoggingCommand),

    /// Manipulate Fastly service version VCL
    Vcl(VclCommand),
}

// ============ Shared flags ============

/// Which service and version a command targets.
#[derive(Args, Debug, Clone)]
pub struct ServiceArgs {
    /// Service ID (falls back to FASTLY_SERVICE_ID, then fastly.toml)
    #[arg(short = 's', long = "service-id")]
    pub service_id: Option<String>,

    /// The name of the service
    #[arg(long = "service-name")]
    pub service_name: Option<String>,

    /// 'latest', 'active', or the number of a specific version
    #[arg(long = "version")]
    pub service_version: String,
}

#[derive(Args, Debug, Clone, Copy)]
pub struct JsonArgs {
    /// Render output as JSON
    #[arg(short, long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone, Copy)]
pub struct AutoCloneArgs {
    /// If the selected service version is not editable, clone it and use the clone
    #[arg(long)]
    pub autoclone: bool,
}

/// Fields every logging backend accepts.
#[derive(Args, Debug, Clone, Default)]
pub struct CommonLoggingFields {
    /// Apache style log formatting
    #[arg(long)]
    pub format: Option<String>,

    /// The version of the custom logging format used for the configured endpoint (1 or 2)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=2))]
    pub format_version: Option<u32>,

    /// The name of an existing condition in the configured endpoint
    #[arg(long)]
    pub response_condition: Option<String>,

    /// Where in the generated VCL the logging call should be placed
    #[arg(long)]
    pub placement: Option<String>,
}

// ============ Logging Commands ============

#[derive(Args, Debug)]
pub struct LoggingCommand {
    #[command(subcommand)]
    pub backend: LoggingBackend,
}

#[derive(Subcommand, Debug)]
pub enum LoggingBackend {
    /// Manipulate Fastly service version Datadog logging endpoints
    Datadog(DatadogCommand),

    /// Manipulate Fastly service version FTP logging endpoints
    Ftp(FtpCommand),

    /// Manipulate Fastly service version Loggly logging endpoints
    Loggly(LogglyCommand),

    /// Manipulate Fastly service version Splunk logging endpoints
    Splunk(SplunkCommand),
}

// Every backend has the same five verbs; only the create/update flags differ.
macro_rules! logging_actions {
    ($command:ident, $action:ident, $create:ty, $update:ty, $display:literal) => {
        #[derive(Args, Debug)]
        pub struct $command {
            #[command(subcommand)]
            pub action: $action,
        }

        #[derive(Subcommand, Debug)]
        pub enum $action {
            #[command(about = concat!("List ", $display, " endpoints on a Fastly service version"))]
            List {
                #[command(flatten)]
                service: ServiceArgs,
                #[command(flatten)]
                output: JsonArgs,
            },

            #[command(
                alias = "get",
                about = concat!("Show detailed information about a ", $display, " logging endpoint on a Fastly service version")
            )]
            Describe {
                #[command(flatten)]
                service: ServiceArgs,
                #[command(flatten)]
                output: JsonArgs,
                #[arg(short, long, help = concat!("The name of the ", $display, " logging object"))]
                name: String,
            },

            #[command(about = concat!("Create a ", $display, " logging endpoint on a Fastly service version"))]
            Create {
                #[command(flatten)]
                service: ServiceArgs,
                #[command(flatten)]
                autoclone: AutoCloneArgs,
                #[command(flatten)]
                fields: $create,
            },

            #[command(about = concat!("Update a ", $display, " logging endpoint on a Fastly service version"))]
            Update {
                #[command(flatten)]
                service: ServiceArgs,
                #[command(flatten)]
                autoclone: AutoCloneArgs,
                #[command(flatten)]
                fields: $update,
            },

            #[command(about = concat!("Delete a ", $display, " logging endpoint on a Fastly service version"))]
            Delete {
                #[command(flatten)]
                service: ServiceArgs,
                #[command(flatten)]
                autoclone: AutoCloneArgs,
                #[arg(short, long, help = concat!("The name of the ", $display, " logging object"))]
                name: String,
            },
        }
    };
}

logging_actions!(DatadogCommand, DatadogAction, DatadogCreate, DatadogUpdate, "Datadog");
logging_actions!(FtpCommand, FtpAction, FtpCreate, FtpUpdate, "FTP");
logging_actions!(LogglyCommand, LogglyAction, LogglyCreate, LogglyUpdate, "Loggly");
logging_actions!(SplunkCommand, SplunkAction, SplunkCreate, SplunkUpdate, "Splunk");

#[derive(Args, Debug, Clone)]
pub struct DatadogCreate {
    /// The name of the Datadog logging object. Used as a primary key for API access
    #[arg(short, long)]
    pub name: String,

    /// The API key from your Datadog account
    #[arg(long = "auth-token")]
    pub token: String,

    /// The region that log data will be sent to. One of US or EU. Defaults to US if undefined
    #[arg(long)]
    pub region: Option<String>,

    #[command(flatten)]
    pub common: CommonLoggingFields,
}

#[derive(Args, Debug, Clone)]
pub struct DatadogUpdate {
    /// The name of the Datadog logging object
    #[arg(short, long)]
    pub name: String,

    /// New name of the Datadog logging object
    #[arg(long)]
    pub new_name: Option<String>,

    /// The API key from your Datadog account
    #[arg(long = "auth-token")]
    pub token: Option<String>,

    /// The region that log data will be sent to. One of US or EU
    #[arg(long)]
    pub region: Option<String>,

    #[command(flatten)]
    pub common: CommonLoggingFields,
}

#[derive(Args, Debug, Clone)]
pub struct FtpCreate {
    /// The name of the FTP logging object. Used as a primary key for API access
    #[arg(short, long)]
    pub name: String,

    /// An hostname or IPv4 address
    #[arg(long)]
    pub address: String,

    /// The username for the server (can be anonymous)
    #[arg(long)]
    pub user: String,

    /// The password for the server (for anonymous use an email address)
    #[arg(long)]
    pub password: String,

    /// The path to upload log files to. If the path ends in / then it is treated as a directory
    #[arg(long)]
    pub path: String,

    /// The port number
    #[arg(long)]
    pub port: Option<u32>,

    /// A PGP public key that Fastly will use to encrypt your log files before writing them to disk
    #[arg(long)]
    pub public_key: Option<String>,

    /// How frequently log files are finalized so they can be available for reading (in seconds, default 3600)
    #[arg(long)]
    pub period: Option<u32>,

    /// What level of GZIP encoding to have when dumping logs (default 0, no compression)
    #[arg(long)]
    pub gzip_level: Option<u32>,

    /// The codec used for compression of your logs. One of zstd, snappy, gzip
    #[arg(long)]
    pub compression_codec: Option<String>,

    /// strftime specified timestamp formatting (default "%Y-%m-%dT%H:%M:%S.000")
    #[arg(long)]
    pub timestamp_format: Option<String>,

    /// How the message should be formatted. One of: classic (default), loggly, logplex or blank
    #[arg(long)]
    pub message_type: Option<String>,

    #[command(flatten)]
    pub common: CommonLoggingFields,
}

#[derive(Args, Debug, Clone)]
pub struct FtpUpdate {
    /// The name of the FTP logging object
    #[arg(short, long)]
    pub name: String,

    /// New name of the FTP logging object
    #[arg(long)]
    pub new_name: Option<String>,

    /// An hostname or IPv4 address
    #[arg(long)]
    pub address: Option<String>,

    /// The username for the server (can be anonymous)
    #[arg(long)]
    pub user: Option<String>,

    /// The password for the server
    #[arg(long)]
    pub password: Option<String>,

    /// The path to upload log files to
    #[arg(long)]
    pub path: Option<String>,

    /// The port number
    #[arg(long)]
    pub port: Option<u32>,

    /// A PGP public key that Fastly will use to encrypt your log files before writing them to disk
    #[arg(long)]
    pub public_key: Option<String>,

    /// How frequently log files are finalized so they can be available for reading (in seconds)
    #[arg(long)]
    pub period: Option<u32>,

    /// What level of GZIP encoding to have when dumping logs
    #[arg(long)]
    pub gzip_level: Option<u32>,

    /// The codec used for compression of your logs. One of zstd, snappy, gzip
    #[arg(long)]
    pub compression_codec: Option<String>,

    /// strftime specified timestamp formatting
    #[arg(long)]
    pub timestamp_format: Option<String>,

    /// How the message should be formatted. One of: classic, loggly, logplex or blank
    #[arg(long)]
    pub message_type: Option<String>,

    #[command(flatten)]
    pub common: CommonLoggingFields,
}

#[derive(Args, Debug, Clone)]
pub struct LogglyCreate {
    /// The name of the Loggly logging object. Used as a primary key for API access
    #[arg(short, long)]
    pub name: String,

    /// The token to use for authentication (https://www.loggly.com/docs/customer-token-authentication-token/)
    #[arg(long = "auth-token")]
    pub token: String,

    #[command(flatten)]
    pub common: CommonLoggingFields,
}

#[derive(Args, Debug, Clone)]
pub struct LogglyUpdate {
    /// The name of the Loggly logging object
    #[arg(short, long)]
    pub name: String,

    /// New name of the Loggly logging object
    #[arg(long)]
    pub new_name: Option<String>,

    /// The token to use for authentication
    #[arg(long = "auth-token")]
    pub token: Option<String>,

    #[command(flatten)]
    pub common: CommonLoggingFields,
}

#[derive(Args, Debug, Clone)]
pub struct SplunkCreate {
    /// The name of the Splunk logging object. Used as a primary key for API access
    #[arg(short, long)]
    pub name: String,

    /// The URL to POST to
    #[arg(long)]
    pub url: String,

    /// A Splunk token for use in posting logs over HTTP to your collector
    #[arg(long = "auth-token")]
    pub token: Option<String>,

    /// A secure certificate to authenticate the server with. Must be in PEM format
    #[arg(long)]
    pub tls_ca_cert: Option<String>,

    /// The hostname used to verify the server's certificate
    #[arg(long)]
    pub tls_hostname: Option<String>,

    /// The client certificate used to make authenticated requests. Must be in PEM format
    #[arg(long)]
    pub tls_client_cert: Option<String>,

    /// The client private key used to make authenticated requests. Must be in PEM format
    #[arg(long)]
    pub tls_client_key: Option<String>,

    #[command(flatten)]
    pub common: CommonLoggingFields,
}

#[derive(Args, Debug, Clone)]
pub struct SplunkUpdate {
    /// The name of the Splunk logging object
    #[arg(short, long)]
    pub name: String,

    /// New name of the Splunk logging object
    #[arg(long)]
    pub new_name: Option<String>,

    /// The URL to POST to
    #[arg(long)]
    pub url: Option<String>,

    /// A Splunk token for use in posting logs over HTTP to your collector
    #[arg(long = "auth-token")]
    pub token: Option<String>,

    /// A secure certificate to authenticate the server with. Must be in PEM format
    #[arg(long)]
    pub tls_ca_cert: Option<String>,

    /// The hostname used to verify the server's certificate
    #[arg(long)]
    pub tls_hostname: Option<String>,

    /// The client certificate used to make authenticated requests. Must be in PEM format
    #[arg(long)]
    pub tls_client_cert: Option<String>,

    /// The client private key used to make authenticated requests. Must be in PEM format
    #[arg(long)]
    pub tls_client_key: Option<String>,

    #[command(flatten)]
    pub common: CommonLoggingFields,
}

// ============ VCL Commands ============

#[derive(Args, Debug)]
pub struct VclCommand {
    #[command(subcommand)]
    pub resource: VclResource,
}

#[derive(Subcommand, Debug)]
pub enum VclResource {
    /// Manipulate VCL snippets on a Fastly service version
    Snippet(SnippetCommand),
}

#[derive(Args, Debug)]
pub struct SnippetCommand {
    #[command(subcommand)]
    pub action: SnippetAction,
}

#[derive(Subcommand, Debug)]
pub enum SnippetAction {
    /// Create a VCL snippet for a particular service and version
    #[command(after_help = "Examples:
  fastly vcl snippet create --version latest --name geo --type recv --content ./geo.vcl")]
    Create {
        #[command(flatten)]
        service: ServiceArgs,
        #[command(flatten)]
        autoclone: AutoCloneArgs,
        /// The name of the VCL snippet
        #[arg(long)]
        name: String,
        /// VCL snippet passed as file path or content, e.g. $(< snippet.vcl)
        #[arg(long)]
        content: String,
        /// The location in generated VCL where the snippet should be placed
        #[arg(long = "type", value_enum)]
        location: SnippetType,
        /// Priority determines execution order. Lower numbers execute first
        #[arg(short, long, default_value_t = 100)]
        priority: u32,
        /// Whether the VCL snippet is dynamic or versioned
        #[arg(long)]
        dynamic: bool,
    },

    /// Delete a VCL snippet from a particular service and version
    Delete {
        #[command(flatten)]
        service: ServiceArgs,
        #[command(flatten)]
        autoclone: AutoCloneArgs,
        /// The name of the VCL snippet to delete
        #[arg(long)]
        name: String,
    },

    /// Get the uploaded VCL snippet for a particular service and version
    #[command(alias = "get")]
    Describe {
        #[command(flatten)]
        service: ServiceArgs,
        #[command(flatten)]
        output: JsonArgs,
        /// The name of the VCL snippet
        #[arg(long)]
        name: Option<String>,
        /// Whether the VCL snippet is dynamic or versioned
        #[arg(long)]
        dynamic: bool,
        /// Alphanumeric string identifying a VCL Snippet
        #[arg(long)]
        snippet_id: Option<String>,
    },

    /// List the uploaded VCL snippets for a particular service and version
    List {
        #[command(flatten)]
        service: ServiceArgs,
        #[command(flatten)]
        output: JsonArgs,
    },

    /// Update a VCL snippet for a particular service and version
    #[command(after_help = "Examples:
  fastly vcl snippet update --version active --autoclone --name geo --priority 10
  fastly vcl snippet update --version active --dynamic --snippet-id 62Yd1WfiCBPENLloXfXmlO --content ./geo.vcl")]
    Update {
        #[command(flatten)]
        service: ServiceArgs,
        #[command(flatten)]
        autoclone: AutoCloneArgs,
        /// VCL snippet passed as file path or content, e.g. $(< snippet.vcl)
        #[arg(long)]
        content: Option<String>,
        /// Whether the VCL snippet is dynamic or versioned
        #[arg(long)]
        dynamic: bool,
        /// The name of the VCL snippet to update
        #[arg(long)]
        name: Option<String>,
        /// New name for the VCL snippet
        #[arg(long)]
        new_name: Option<String>,
        /// Priority determines execution order. Lower numbers execute first
        #[arg(short, long)]
        priority: Option<u32>,
        /// Alphanumeric string identifying a VCL Snippet
        #[arg(long)]
        snippet_id: Option<String>,
        /// The location in generated VCL where the snippet should be placed
        #[arg(long = "type", value_enum)]
        location: Option<SnippetType>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn describe_has_get_alias() {
        let cli = Cli::try_parse_from([
            "fastly", "logging", "ftp", "get", "-s", "svc", "--version", "2", "-n", "archive",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Logging(LoggingCommand {
                backend: LoggingBackend::Ftp(FtpCommand { action: FtpAction::Describe { name, service, .. } }),
            })) => {
                assert_eq!(name, "archive");
                assert_eq!(service.service_id.as_deref(), Some("svc"));
                assert_eq!(service.service_version, "2");
            }
            other => panic!("unexpected parse: {:?}", other),
        }
    }

    #[test]
    fn version_flag_is_required() {
        let err = Cli::try_parse_from(["fastly", "logging", "datadog", "list", "-s", "svc"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn timeout_must_be_positive() {
        let err = Cli::try_parse_from([
            "fastly", "vcl", "snippet", "list", "--version", "1", "--timeout", "0",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);

        let cli = Cli::try_parse_from(["fastly", "vcl", "snippet", "list", "--version", "1", "--timeout", "5"])
            .unwrap();
        assert_eq!(cli.globals.timeout, 5);
    }

    #[test]
    fn snippet_type_is_restricted() {
        let err = Cli::try_parse_from([
            "fastly", "vcl", "snippet", "update", "--version", "1", "--name", "x", "--type", "nowhere",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }
}
