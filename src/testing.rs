//! Helpers shared by unit tests

use std::time::Duration;

use crate::api::Client;
use crate::cli::ServiceArgs;
use crate::config::{Globals, ProjectConfig};

/// Context pointed at a mock API, with no manifest or env defaults.
pub fn globals(endpoint: &str) -> Globals {
    let client = Client::new(endpoint, Some("test-token".into()), Duration::from_secs(5))
        .expect("Failed to build test client");
    Globals::new(client, ProjectConfig::default(), false)
}

pub fn service(id: &str, version: &str) -> ServiceArgs {
    ServiceArgs {
        service_id: Some(id.into()),
        service_name: None,
        service_version: version.into(),
    }
}

pub fn text(buf: Vec<u8>) -> String {
    String::from_utf8(buf).expect("output is not UTF-8")
}
