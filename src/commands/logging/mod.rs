//! Logging endpoint commands
//!
//! The verbs are generic over [`LoggingEndpoint`]; backend modules only map
//! their flags onto request forms.

mod datadog;
mod ftp;
mod loggly;
mod splunk;

use std::io::Write;

use anyhow::Result;

use crate::api::{Form, LoggingEndpoint};
use crate::cli::{CommonLoggingFields, LoggingBackend, LoggingCommand, ServiceArgs};
use crate::commands::check_output_flags;
use crate::config::Globals;
use crate::output::{self, Table};
use crate::resolve::{service_details, ServiceDetailsOpts};

pub async fn run(cmd: LoggingCommand, globals: &Globals, out: &mut dyn Write) -> Result<()> {
    match cmd.backend {
        LoggingBackend::Datadog(cmd) => datadog::run(cmd, globals, out).await,
        LoggingBackend::Ftp(cmd) => ftp::run(cmd, globals, out).await,
        LoggingBackend::Loggly(cmd) => loggly::run(cmd, globals, out).await,
        LoggingBackend::Splunk(cmd) => splunk::run(cmd, globals, out).await,
    }
}

// ============ Request forms ============

/// Flags that become a form-encoded request body.
pub(crate) trait FormFields {
    fn write_form(&self, form: &mut Form);

    fn form(&self) -> Form {
        let mut form = Form::new();
        self.write_form(&mut form);
        form
    }
}

/// Add a field only when the flag was given.
pub(crate) fn push<T: ToString>(form: &mut Form, key: &'static str, value: &Option<T>) {
    if let Some(v) = value {
        form.push((key, v.to_string()));
    }
}

impl FormFields for CommonLoggingFields {
    fn write_form(&self, form: &mut Form) {
        push(form, "format", &self.format);
        push(form, "format_version", &self.format_version);
        push(form, "response_condition", &self.response_condition);
        push(form, "placement", &self.placement);
    }
}

// ============ Verbs ============

pub async fn list<E: LoggingEndpoint>(
    globals: &Globals,
    service: &ServiceArgs,
    json: bool,
    out: &mut dyn Write,
) -> Result<()> {
    check_output_flags(globals, json)?;

    let svc = service_details(globals, ServiceDetailsOpts::read_only(service), out).await?;
    let endpoints: Vec<E> = globals
        .client
        .list_logging(&svc.service_id, svc.number())
        .await
        .map_err(|e| globals.errlog.record(e, svc.log_context()))?;

    if !globals.verbose {
        if json {
            return output::json(out, &endpoints);
        }

        let mut table = Table::new();
        table.add_header(["SERVICE", "VERSION", "NAME"]);
        for endpoint in &endpoints {
            table.add_line([
                endpoint.service_id().to_string(),
                endpoint.service_version().to_string(),
                endpoint.name().to_string(),
            ]);
        }
        table.print(out)?;
        return Ok(());
    }

    writeln!(out, "Version: {}", svc.number())?;
    for (i, endpoint) in endpoints.iter().enumerate() {
        writeln!(out, "\t{} {}/{}", E::DISPLAY, i + 1, endpoints.len())?;
        output::fields(out, "\t\t", &summary_fields(endpoint))?;
        output::fields(out, "\t\t", &endpoint.detail_fields())?;
    }
    writeln!(out)?;

    Ok(())
}

pub async fn describe<E: LoggingEndpoint>(
    globals: &Globals,
    service: &ServiceArgs,
    json: bool,
    name: &str,
    out: &mut dyn Write,
) -> Result<()> {
    check_output_flags(globals, json)?;

    let svc = service_details(globals, ServiceDetailsOpts::read_only(service), out).await?;
    let endpoint: E = globals
        .client
        .get_logging(&svc.service_id, svc.number(), name)
        .await
        .map_err(|e| globals.errlog.record(e, svc.log_context()))?;

    if json {
        return output::json(out, &endpoint);
    }

    if !globals.verbose {
        writeln!(out, "\nService ID: {}", endpoint.service_id())?;
    }
    let mut fields = summary_fields(&endpoint);
    fields.remove(0);
    output::fields(out, "", &fields)?;
    output::fields(out, "", &endpoint.detail_fields())?;

    Ok(())
}

pub async fn create<E: LoggingEndpoint>(
    globals: &Globals,
    service: &ServiceArgs,
    autoclone: bool,
    form: Form,
    out: &mut dyn Write,
) -> Result<()> {
    let svc = service_details(globals, ServiceDetailsOpts::mutating(service, autoclone), out).await?;
    let created: E = globals
        .client
        .create_logging(&svc.service_id, svc.number(), &form)
        .await
        .map_err(|e| globals.errlog.record(e, svc.log_context()))?;

    output::success(
        out,
        &format!(
            "Created {} logging endpoint {} (service {} version {})",
            E::DISPLAY,
            created.name(),
            svc.service_id,
            svc.number()
        ),
    )?;
    Ok(())
}

pub async fn update<E: LoggingEndpoint>(
    globals: &Globals,
    service: &ServiceArgs,
    autoclone: bool,
    name: &str,
    form: Form,
    out: &mut dyn Write,
) -> Result<()> {
    let svc = service_details(globals, ServiceDetailsOpts::mutating(service, autoclone), out).await?;
    let updated: E = globals
        .client
        .update_logging(&svc.service_id, svc.number(), name, &form)
        .await
        .map_err(|e| globals.errlog.record(e, svc.log_context()))?;

    output::success(
        out,
        &format!(
            "Updated {} logging endpoint {} (service {} version {})",
            E::DISPLAY,
            updated.name(),
            svc.service_id,
            svc.number()
        ),
    )?;
    Ok(())
}

pub async fn delete<E: LoggingEndpoint>(
    globals: &Globals,
    service: &ServiceArgs,
    autoclone: bool,
    name: &str,
    out: &mut dyn Write,
) -> Result<()> {
    let svc = service_details(globals, ServiceDetailsOpts::mutating(service, autoclone), out).await?;
    globals
        .client
        .delete_logging::<E>(&svc.service_id, svc.number(), name)
        .await
        .map_err(|e| globals.errlog.record(e, svc.log_context()))?;

    output::success(
        out,
        &format!(
            "Deleted {} logging endpoint {} (service {} version {})",
            E::DISPLAY,
            name,
            svc.service_id,
            svc.number()
        ),
    )?;
    Ok(())
}

fn summary_fields<E: LoggingEndpoint>(endpoint: &E) -> Vec<(&'static str, String)> {
    vec![
        ("Service ID", endpoint.service_id().to_string()),
        ("Version", endpoint.service_version().to_string()),
        ("Name", endpoint.name().to_string()),
    ]
}
