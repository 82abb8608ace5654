//! Logging endpoint resources
//!
//! Every backend lives under `/service/{id}/version/{n}/logging/{kind}` and
//! shares the same verbs, so commands are written once against
//! [`LoggingEndpoint`] and each backend only describes its own fields.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::types::{lenient_u32, nullable_string};

pub trait LoggingEndpoint: DeserializeOwned + Serialize {
    /// Path segment under `logging/`.
    const KIND: &'static str;
    /// Name shown to users.
    const DISPLAY: &'static str;

    fn name(&self) -> &str;
    fn service_id(&self) -> &str;
    fn service_version(&self) -> u32;

    /// Backend fields as `(label, value)`, in display order.
    fn detail_fields(&self) -> Vec<(&'static str, String)>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Datadog {
    pub name: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub service_id: String,
    #[serde(rename = "version", default, deserialize_with = "lenient_u32")]
    pub service_version: u32,
    #[serde(default, deserialize_with = "nullable_string")]
    pub token: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub region: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub format: String,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub format_version: u32,
    #[serde(default, deserialize_with = "nullable_string")]
    pub response_condition: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub placement: String,
}

impl LoggingEndpoint for Datadog {
    const KIND: &'static str = "datadog";
    const DISPLAY: &'static str = "Datadog";

    fn name(&self) -> &str {
        &self.name
    }

    fn service_id(&self) -> &str {
        &self.service_id
    }

    fn service_version(&self) -> u32 {
        self.service_version
    }

    fn detail_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Token", self.token.clone()),
            ("Region", self.region.clone()),
            ("Format", self.format.clone()),
            ("Format version", self.format_version.to_string()),
            ("Response condition", self.response_condition.clone()),
            ("Placement", self.placement.clone()),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ftp {
    pub name: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub service_id: String,
    #[serde(rename = "version", default, deserialize_with = "lenient_u32")]
    pub service_version: u32,
    #[serde(default, deserialize_with = "nullable_string")]
    pub address: String,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub port: u32,
    #[serde(rename = "user", default, deserialize_with = "nullable_string")]
    pub username: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub password: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub public_key: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub path: String,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub period: u32,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub gzip_level: u32,
    #[serde(default, deserialize_with = "nullable_string")]
    pub format: String,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub format_version: u32,
    #[serde(default, deserialize_with = "nullable_string")]
    pub response_condition: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub timestamp_format: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub placement: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub compression_codec: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub message_type: String,
}

impl LoggingEndpoint for Ftp {
    const KIND: &'static str = "ftp";
    const DISPLAY: &'static str = "FTP";

    fn name(&self) -> &str {
        &self.name
    }

    fn service_id(&self) -> &str {
        &self.service_id
    }

    fn service_version(&self) -> u32 {
        self.service_version
    }

    fn detail_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Address", self.address.clone()),
            ("Port", self.port.to_string()),
            ("Username", self.username.clone()),
            ("Password", self.password.clone()),
            ("Public key", self.public_key.clone()),
            ("Path", self.path.clone()),
            ("Period", self.period.to_string()),
            ("GZip level", self.gzip_level.to_string()),
            ("Format", self.format.clone()),
            ("Format version", self.format_version.to_string()),
            ("Response condition", self.response_condition.clone()),
            ("Timestamp format", self.timestamp_format.clone()),
            ("Placement", self.placement.clone()),
            ("Compression codec", self.compression_codec.clone()),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loggly {
    pub name: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub service_id: String,
    #[serde(rename = "version", default, deserialize_with = "lenient_u32")]
    pub service_version: u32,
    #[serde(default, deserialize_with = "nullable_string")]
    pub token: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub format: String,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub format_version: u32,
    #[serde(default, deserialize_with = "nullable_string")]
    pub response_condition: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub placement: String,
}

impl LoggingEndpoint for Loggly {
    const KIND: &'static str = "loggly";
    const DISPLAY: &'static str = "Loggly";

    fn name(&self) -> &str {
        &self.name
    }

    fn service_id(&self) -> &str {
        &self.service_id
    }

    fn service_version(&self) -> u32 {
        self.service_version
    }

    fn detail_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Token", self.token.clone()),
            ("Format", self.format.clone()),
            ("Format version", self.format_version.to_string()),
            ("Response condition", self.response_condition.clone()),
            ("Placement", self.placement.clone()),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Splunk {
    pub name: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub service_id: String,
    #[serde(rename = "version", default, deserialize_with = "lenient_u32")]
    pub service_version: u32,
    #[serde(default, deserialize_with = "nullable_string")]
    pub url: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub token: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub tls_ca_cert: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub tls_hostname: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub tls_client_cert: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub tls_client_key: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub format: String,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub format_version: u32,
    #[serde(default, deserialize_with = "nullable_string")]
    pub response_condition: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub placement: String,
}

impl LoggingEndpoint for Splunk {
    const KIND: &'static str = "splunk";
    const DISPLAY: &'static str = "Splunk";

    fn name(&self) -> &str {
        &self.name
    }

    fn service_id(&self) -> &str {
        &self.service_id
    }

    fn service_version(&self) -> u32 {
        self.service_version
    }

    fn detail_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("URL", self.url.clone()),
            ("Token", self.token.clone()),
            ("TLS CA certificate", self.tls_ca_cert.clone()),
            ("TLS hostname", self.tls_hostname.clone()),
            ("TLS client certificate", self.tls_client_cert.clone()),
            ("TLS client key", self.tls_client_key.clone()),
            ("Format", self.format.clone()),
            ("Format version", self.format_version.to_string()),
            ("Response condition", self.response_condition.clone()),
            ("Placement", self.placement.clone()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ftp_decodes_api_shape() {
        let ftp: Ftp = serde_json::from_str(
            r#"{"name":"archive","service_id":"svc","version":"5","address":"ftp.example.com",
                "port":"21","user":"anon","password":"pw","public_key":null,"path":"/logs/",
                "period":"3600","gzip_level":"0","format":"%h","format_version":"2",
                "response_condition":"","timestamp_format":"%Y-%m-%dT%H:%M:%S.000",
                "placement":null,"compression_codec":"zstd","message_type":"classic"}"#,
        )
        .unwrap();

        assert_eq!(ftp.service_version(), 5);
        assert_eq!(ftp.port, 21);
        assert_eq!(ftp.username, "anon");
        assert_eq!(ftp.public_key, "");
        let fields = ftp.detail_fields();
        assert_eq!(fields[0], ("Address", "ftp.example.com".to_string()));
        assert_eq!(fields.last().unwrap().0, "Compression codec");
    }

    #[test]
    fn kinds_match_api_paths() {
        assert_eq!(Datadog::KIND, "datadog");
        assert_eq!(Ftp::KIND, "ftp");
        assert_eq!(Loggly::KIND, "loggly");
        assert_eq!(Splunk::KIND, "splunk");
    }
}
