//! Service and version resolution
//!
//! Every command that targets a service version goes through
//! [`service_details`]. It turns `--service-id` / `--service-name` /
//! `FASTLY_SERVICE_ID` / `fastly.toml` into one service ID, turns `--version`
//! into one concrete version, and makes sure mutating commands only ever get
//! an editable version (cloning it first when `--autoclone` was given).

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use anyhow::Result;

use crate::api::Version;
use crate::cli::ServiceArgs;
use crate::config::{Globals, ServiceIdSource};
use crate::error::FastlyError;

/// Parsed `--version` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionSelector {
    Number(u32),
    Latest,
    Active,
}

impl FromStr for VersionSelector {
    type Err = FastlyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(FastlyError::NoServiceVersion);
        }
        match s.to_ascii_lowercase().as_str() {
            "latest" => Ok(VersionSelector::Latest),
            "active" => Ok(VersionSelector::Active),
            _ => match s.parse::<u32>() {
                Ok(n) if n >= 1 => Ok(VersionSelector::Number(n)),
                _ => Err(FastlyError::InvalidVersion(s.to_string())),
            },
        }
    }
}

impl fmt::Display for VersionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionSelector::Number(n) => write!(f, "{}", n),
            VersionSelector::Latest => f.write_str("latest"),
            VersionSelector::Active => f.write_str("active"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ServiceDetailsOpts<'a> {
    pub service: &'a ServiceArgs,
    /// Read-only commands may look at active or locked versions.
    pub allow_active_locked: bool,
    pub autoclone: bool,
}

impl<'a> ServiceDetailsOpts<'a> {
    pub fn read_only(service: &'a ServiceArgs) -> Self {
        Self { service, allow_active_locked: true, autoclone: false }
    }

    pub fn mutating(service: &'a ServiceArgs, autoclone: bool) -> Self {
        Self { service, allow_active_locked: false, autoclone }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedService {
    pub service_id: String,
    pub version: Version,
    pub editable: bool,
}

impl ResolvedService {
    pub fn number(&self) -> u32 {
        self.version.number
    }

    /// Fields attached to errors logged after resolution.
    pub fn log_context(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Service ID", self.service_id.clone()),
            ("Service Version", self.version.number.to_string()),
        ]
    }
}

/// What was known when resolution stopped, for the error log.
#[derive(Debug, Default)]
struct Progress {
    service_id: Option<String>,
    version: Option<u32>,
}

impl Progress {
    fn context(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Service ID", self.service_id.clone().unwrap_or_default()),
            (
                "Service Version",
                self.version.map(|v| v.to_string()).unwrap_or_else(|| "unknown".into()),
            ),
        ]
    }
}

/// Resolve the service ID and version a command should operate on.
///
/// Failures are recorded in the error log with whatever service ID and
/// version had been determined before returning.
pub async fn service_details(
    globals: &Globals,
    opts: ServiceDetailsOpts<'_>,
    out: &mut dyn Write,
) -> Result<ResolvedService> {
    let mut progress = Progress::default();
    match resolve(globals, opts, out, &mut progress).await {
        Ok(resolved) => {
            tracing::debug!(
                service_id = %resolved.service_id,
                version = resolved.number(),
                editable = resolved.editable,
                "resolved service"
            );
            Ok(resolved)
        }
        Err(err) => Err(globals.errlog.record(err, progress.context())),
    }
}

async fn resolve(
    globals: &Globals,
    opts: ServiceDetailsOpts<'_>,
    out: &mut dyn Write,
    progress: &mut Progress,
) -> Result<ResolvedService> {
    let selector: VersionSelector = opts.service.service_version.parse()?;
    tracing::debug!(%selector, "resolving service version");

    let (service_id, source) = service_id(globals, opts.service).await?;
    progress.service_id = Some(service_id.clone());
    if globals.verbose {
        writeln!(out, "Service ID (via {}): {}", source, service_id)?;
        writeln!(out)?;
    }

    let version = select_version(globals, &service_id, selector).await?;
    progress.version = Some(version.number);
    tracing::debug!(service_id = %service_id, version = version.number, "selected service version");

    if version.is_editable() || opts.allow_active_locked {
        let editable = version.is_editable();
        return Ok(ResolvedService { service_id, version, editable });
    }

    if !opts.autoclone {
        return Err(FastlyError::ActiveLockedVersion(version.number).into());
    }

    let cloned = globals.client.clone_version(&service_id, version.number).await?;
    if globals.verbose {
        writeln!(
            out,
            "Service version {} is not editable, so it was automatically cloned because --autoclone is enabled. Now operating on version {}.",
            version.number, cloned.number
        )?;
        writeln!(out)?;
    }
    tracing::debug!(from = version.number, to = cloned.number, "cloned service version");
    progress.version = Some(cloned.number);

    Ok(ResolvedService { service_id, version: cloned, editable: true })
}

async fn service_id(globals: &Globals, service: &ServiceArgs) -> Result<(String, ServiceIdSource)> {
    let explicit_id = service.service_id.as_deref().filter(|s| !s.trim().is_empty());
    let name = service.service_name.as_deref().filter(|s| !s.trim().is_empty());

    match (explicit_id, name) {
        (Some(_), Some(_)) => Err(FastlyError::ServiceIdNameConflict.into()),
        (Some(id), None) => Ok((id.to_string(), ServiceIdSource::Flag)),
        (None, Some(name)) => {
            let found = globals.client.search_service(name).await?;
            Ok((found.id, ServiceIdSource::NameLookup))
        }
        (None, None) => globals
            .project
            .default_service_id()
            .map(|(id, source)| (id.to_string(), source))
            .ok_or_else(|| FastlyError::NoServiceId.into()),
    }
}

async fn select_version(
    globals: &Globals,
    service_id: &str,
    selector: VersionSelector,
) -> Result<Version, FastlyError> {
    match selector {
        VersionSelector::Number(n) => globals.client.get_version(service_id, n).await,
        VersionSelector::Latest => latest(globals.client.list_versions(service_id).await?),
        VersionSelector::Active => active(globals.client.list_versions(service_id).await?),
    }
}

fn latest(versions: Vec<Version>) -> Result<Version, FastlyError> {
    versions.into_iter().max_by_key(|v| v.number).ok_or(FastlyError::NoVersions)
}

fn active(versions: Vec<Version>) -> Result<Version, FastlyError> {
    if versions.is_empty() {
        return Err(FastlyError::NoVersions);
    }
    versions
        .into_iter()
        .filter(|v| v.active)
        .max_by_key(|v| v.number)
        .ok_or(FastlyError::NoActiveVersion)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Manifest, ProjectConfig};
    use crate::testing;

    const VERSIONS: &str = r#"[
        {"number":1,"active":false,"locked":true,"service_id":"SvcId"},
        {"number":3,"active":false,"locked":false,"service_id":"SvcId"},
        {"number":2,"active":true,"locked":true,"service_id":"SvcId"}
    ]"#;

    fn args(id: Option<&str>, name: Option<&str>, version: &str) -> ServiceArgs {
        ServiceArgs {
            service_id: id.map(Into::into),
            service_name: name.map(Into::into),
            service_version: version.into(),
        }
    }

    async fn run(globals: &Globals, opts: ServiceDetailsOpts<'_>) -> Result<ResolvedService> {
        let mut out = Vec::new();
        service_details(globals, opts, &mut out).await
    }

    #[test]
    fn selector_parsing() {
        assert_eq!("7".parse::<VersionSelector>().unwrap(), VersionSelector::Number(7));
        assert_eq!("LATEST".parse::<VersionSelector>().unwrap(), VersionSelector::Latest);
        assert_eq!(" active ".parse::<VersionSelector>().unwrap(), VersionSelector::Active);
        assert!(matches!("".parse::<VersionSelector>(), Err(FastlyError::NoServiceVersion)));
        assert!(matches!("0".parse::<VersionSelector>(), Err(FastlyError::InvalidVersion(_))));
        assert!(matches!("v2".parse::<VersionSelector>(), Err(FastlyError::InvalidVersion(_))));
    }

    #[test]
    fn latest_is_highest_number() {
        let versions: Vec<Version> = serde_json::from_str(VERSIONS).unwrap();
        assert_eq!(latest(versions.clone()).unwrap().number, 3);
        assert_eq!(active(versions).unwrap().number, 2);
        assert!(matches!(latest(Vec::new()), Err(FastlyError::NoVersions)));
    }

    #[tokio::test]
    async fn no_service_id_anywhere_fails() {
        let mut server = mockito::Server::new_async().await;
        let any = server.mock("GET", mockito::Matcher::Any).expect(0).create_async().await;
        let globals = testing::globals(&server.url());

        let service = args(None, None, "1");
        let err = run(&globals, ServiceDetailsOpts::read_only(&service)).await.unwrap_err();

        assert!(matches!(err.downcast_ref::<FastlyError>(), Some(FastlyError::NoServiceId)));
        any.assert_async().await;
        assert_eq!(globals.errlog.entries()[0].context[1], ("Service Version", "unknown".into()));
    }

    #[tokio::test]
    async fn literal_version_skips_version_list() {
        let mut server = mockito::Server::new_async().await;
        let list = server.mock("GET", "/service/SvcId/version").expect(0).create_async().await;
        let get = server
            .mock("GET", "/service/SvcId/version/5")
            .with_status(200)
            .with_body(r#"{"number":5,"active":false,"locked":false,"service_id":"SvcId"}"#)
            .create_async()
            .await;
        let globals = testing::globals(&server.url());

        let service = args(Some("SvcId"), None, "5");
        let resolved = run(&globals, ServiceDetailsOpts::mutating(&service, false)).await.unwrap();

        assert_eq!(resolved.service_id, "SvcId");
        assert_eq!(resolved.number(), 5);
        assert!(resolved.editable);
        list.assert_async().await;
        get.assert_async().await;
    }

    #[tokio::test]
    async fn active_locked_without_autoclone_fails() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/service/SvcId/version")
            .with_status(200)
            .with_body(VERSIONS)
            .create_async()
            .await;
        let clone = server.mock("PUT", mockito::Matcher::Any).expect(0).create_async().await;
        let globals = testing::globals(&server.url());

        let service = args(Some("SvcId"), None, "active");
        let err = run(&globals, ServiceDetailsOpts::mutating(&service, false)).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<FastlyError>(),
            Some(FastlyError::ActiveLockedVersion(2))
        ));
        clone.assert_async().await;

        let entry = &globals.errlog.entries()[0];
        assert_eq!(entry.context[0], ("Service ID", "SvcId".into()));
        assert_eq!(entry.context[1], ("Service Version", "2".into()));
    }

    #[tokio::test]
    async fn active_locked_with_autoclone_uses_clone() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/service/SvcId/version")
            .with_status(200)
            .with_body(VERSIONS)
            .create_async()
            .await;
        let clone = server
            .mock("PUT", "/service/SvcId/version/2/clone")
            .with_status(200)
            .with_body(r#"{"number":4,"active":false,"locked":false,"service_id":"SvcId"}"#)
            .create_async()
            .await;
        let mut globals = testing::globals(&server.url());
        globals.verbose = true;

        let service = args(Some("SvcId"), None, "active");
        let mut out = Vec::new();
        let resolved = service_details(&globals, ServiceDetailsOpts::mutating(&service, true), &mut out)
            .await
            .unwrap();

        clone.assert_async().await;
        assert_eq!(resolved.number(), 4);
        assert!(resolved.editable);
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Service ID (via --service-id): SvcId\n\n"));
        assert!(text.contains("Service version 2 is not editable"));
        assert!(text.contains("Now operating on version 4."));
    }

    #[tokio::test]
    async fn autoclone_is_noop_for_editable_version() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/service/SvcId/version")
            .with_status(200)
            .with_body(VERSIONS)
            .create_async()
            .await;
        let clone = server.mock("PUT", mockito::Matcher::Any).expect(0).create_async().await;
        let globals = testing::globals(&server.url());

        let service = args(Some("SvcId"), None, "latest");
        let resolved = run(&globals, ServiceDetailsOpts::mutating(&service, true)).await.unwrap();

        assert_eq!(resolved.number(), 3);
        clone.assert_async().await;
    }

    #[tokio::test]
    async fn read_only_accepts_active_version() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/service/SvcId/version")
            .with_status(200)
            .with_body(VERSIONS)
            .create_async()
            .await;
        let globals = testing::globals(&server.url());

        let service = args(Some("SvcId"), None, "active");
        let resolved = run(&globals, ServiceDetailsOpts::read_only(&service)).await.unwrap();

        assert_eq!(resolved.number(), 2);
        assert!(!resolved.editable);
    }

    #[tokio::test]
    async fn service_name_is_looked_up() {
        let mut server = mockito::Server::new_async().await;
        let search = server
            .mock("GET", "/service/search")
            .match_query(mockito::Matcher::UrlEncoded("name".into(), "www".into()))
            .with_status(200)
            .with_body(r#"{"id":"FoundId","name":"www"}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/service/FoundId/version/1")
            .with_status(200)
            .with_body(r#"{"number":1,"service_id":"FoundId"}"#)
            .create_async()
            .await;
        let globals = testing::globals(&server.url());

        let service = args(None, Some("www"), "1");
        let resolved = run(&globals, ServiceDetailsOpts::read_only(&service)).await.unwrap();

        search.assert_async().await;
        assert_eq!(resolved.service_id, "FoundId");
    }

    #[tokio::test]
    async fn id_and_name_together_is_rejected() {
        let globals = testing::globals("http://127.0.0.1:9");
        let service = args(Some("SvcId"), Some("www"), "1");
        let err = run(&globals, ServiceDetailsOpts::read_only(&service)).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<FastlyError>(),
            Some(FastlyError::ServiceIdNameConflict)
        ));
    }

    #[tokio::test]
    async fn manifest_service_id_is_the_fallback() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/service/FromManifest/version/2")
            .with_status(200)
            .with_body(r#"{"number":2,"service_id":"FromManifest"}"#)
            .create_async()
            .await;
        let mut globals = testing::globals(&server.url());
        globals.project = ProjectConfig {
            manifest: Manifest { service_id: Some("FromManifest".into()), ..Default::default() },
            env_service_id: None,
        };
        globals.verbose = true;

        let service = args(None, None, "2");
        let mut out = Vec::new();
        let resolved = service_details(&globals, ServiceDetailsOpts::read_only(&service), &mut out)
            .await
            .unwrap();

        assert_eq!(resolved.service_id, "FromManifest");
        assert!(String::from_utf8(out).unwrap().contains("(via fastly.toml)"));
    }

    #[tokio::test]
    async fn missing_active_version_is_reported() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/service/SvcId/version")
            .with_status(200)
            .with_body(r#"[{"number":1,"active":false,"service_id":"SvcId"}]"#)
            .create_async()
            .await;
        let globals = testing::globals(&server.url());

        let service = args(Some("SvcId"), None, "active");
        let err = run(&globals, ServiceDetailsOpts::read_only(&service)).await.unwrap_err();
        assert_eq!(err.to_string(), "no active service version found");
    }

    #[tokio::test]
    async fn api_failure_propagates_without_retry() {
        let mut server = mockito::Server::new_async().await;
        let get = server
            .mock("GET", "/service/SvcId/version/9")
            .with_status(500)
            .expect(1)
            .create_async()
            .await;
        let globals = testing::globals(&server.url());

        let service = args(Some("SvcId"), None, "9");
        let err = run(&globals, ServiceDetailsOpts::read_only(&service)).await.unwrap_err();

        get.assert_async().await;
        assert!(matches!(
            err.downcast_ref::<FastlyError>(),
            Some(FastlyError::Api { status: 500, .. })
        ));
        assert_eq!(globals.errlog.entries().len(), 1);
    }
}
