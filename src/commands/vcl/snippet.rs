//! VCL snippet commands
//!
//! Versioned snippets belong to a service version and are addressed by
//! name. Dynamic snippets are addressed by ID and their content can change
//! without activating a new version.

use std::io::Write;

use anyhow::Result;

use crate::api::{Form, SnippetType};
use crate::cli::{ServiceArgs, SnippetAction, SnippetCommand};
use crate::commands::{check_output_flags, content};
use crate::config::Globals;
use crate::error::FastlyError;
use crate::output::{self, Table};
use crate::resolve::{service_details, ServiceDetailsOpts};

pub async fn run(cmd: SnippetCommand, globals: &Globals, out: &mut dyn Write) -> Result<()> {
    match cmd.action {
        SnippetAction::Create { service, autoclone, name, content, location, priority, dynamic } => {
            let input = CreateInput { name, content, location, priority, dynamic };
            create(globals, &service, autoclone.autoclone, &input, out).await
        }
        SnippetAction::Delete { service, autoclone, name } => {
            delete(globals, &service, autoclone.autoclone, &name, out).await
        }
        SnippetAction::Describe { service, output, name, dynamic, snippet_id } => {
            let target = DescribeTarget::from_flags(dynamic, name, snippet_id)?;
            describe(globals, &service, output.json, target, out).await
        }
        SnippetAction::List { service, output } => list(globals, &service, output.json, out).await,
        SnippetAction::Update {
            service,
            autoclone,
            content,
            dynamic,
            name,
            new_name,
            priority,
            snippet_id,
            location,
        } => {
            let flags = UpdateFlags { content, dynamic, name, new_name, priority, snippet_id, location };
            update(globals, &service, autoclone.autoclone, &flags, out).await
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

// ============ create ============

struct CreateInput {
    name: String,
    content: String,
    location: SnippetType,
    priority: u32,
    dynamic: bool,
}

impl CreateInput {
    fn form(&self) -> Form {
        vec![
            ("name", self.name.clone()),
            ("content", content(&self.content)),
            ("type", self.location.to_string()),
            ("priority", self.priority.to_string()),
            ("dynamic", if self.dynamic { "1" } else { "0" }.to_string()),
        ]
    }
}

async fn create(
    globals: &Globals,
    service: &ServiceArgs,
    autoclone: bool,
    input: &CreateInput,
    out: &mut dyn Write,
) -> Result<()> {
    let svc = service_details(globals, ServiceDetailsOpts::mutating(service, autoclone), out).await?;
    let v = globals
        .client
        .create_snippet(&svc.service_id, svc.number(), &input.form())
        .await
        .map_err(|e| globals.errlog.record(e, svc.log_context()))?;

    output::success(
        out,
        &format!(
            "Created VCL snippet '{}' (service: {}, version: {}, dynamic: {}, snippet ID: {}, type: {}, priority: {})",
            v.name, v.service_id, v.service_version, v.dynamic, v.id, v.snippet_type, v.priority
        ),
    )?;
    Ok(())
}

// ============ delete ============

async fn delete(
    globals: &Globals,
    service: &ServiceArgs,
    autoclone: bool,
    name: &str,
    out: &mut dyn Write,
) -> Result<()> {
    let svc = service_details(globals, ServiceDetailsOpts::mutating(service, autoclone), out).await?;
    globals
        .client
        .delete_snippet(&svc.service_id, svc.number(), name)
        .await
        .map_err(|e| globals.errlog.record(e, svc.log_context()))?;

    output::success(
        out,
        &format!("Deleted VCL snippet '{}' (service: {}, version: {})", name, svc.service_id, svc.number()),
    )?;
    Ok(())
}

// ============ describe ============

#[derive(Debug, PartialEq, Eq)]
enum DescribeTarget {
    Dynamic(String),
    Versioned(String),
}

impl DescribeTarget {
    fn from_flags(dynamic: bool, name: Option<String>, snippet_id: Option<String>) -> Result<Self, FastlyError> {
        if dynamic {
            return non_empty(&snippet_id)
                .map(|id| DescribeTarget::Dynamic(id.to_string()))
                .ok_or_else(|| {
                    FastlyError::InvalidArguments("must provide --snippet-id when using --dynamic".into())
                });
        }
        non_empty(&name)
            .map(|n| DescribeTarget::Versioned(n.to_string()))
            .ok_or_else(|| {
                FastlyError::InvalidArguments("must provide --name with a versioned VCL snippet".into())
            })
    }
}

async fn describe(
    globals: &Globals,
    service: &ServiceArgs,
    json: bool,
    target: DescribeTarget,
    out: &mut dyn Write,
) -> Result<()> {
    check_output_flags(globals, json)?;

    let svc = service_details(globals, ServiceDetailsOpts::read_only(service), out).await?;

    match target {
        DescribeTarget::Dynamic(id) => {
            let v = globals
                .client
                .get_dynamic_snippet(&svc.service_id, &id)
                .await
                .map_err(|e| globals.errlog.record(e, svc.log_context()))?;
            if json {
                return output::json(out, &v);
            }
            if !globals.verbose {
                writeln!(out, "\nService ID: {}", v.service_id)?;
            }
            writeln!(out, "ID: {}", v.id)?;
            writeln!(out, "Content: \n{}", v.content)?;
        }
        DescribeTarget::Versioned(name) => {
            let v = globals
                .client
                .get_snippet(&svc.service_id, svc.number(), &name)
                .await
                .map_err(|e| globals.errlog.record(e, svc.log_context()))?;
            if json {
                return output::json(out, &v);
            }
            if !globals.verbose {
                writeln!(out, "\nService ID: {}", v.service_id)?;
            }
            writeln!(out, "Service Version: {}", v.service_version)?;
            writeln!(out, "Name: {}", v.name)?;
            writeln!(out, "ID: {}", v.id)?;
            writeln!(out, "Priority: {}", v.priority)?;
            writeln!(out, "Dynamic: {}", v.dynamic)?;
            writeln!(out, "Type: {}", v.snippet_type)?;
            writeln!(out, "Content: \n{}", v.content)?;
        }
    }
    Ok(())
}

// ============ list ============

async fn list(globals: &Globals, service: &ServiceArgs, json: bool, out: &mut dyn Write) -> Result<()> {
    check_output_flags(globals, json)?;

    let svc = service_details(globals, ServiceDetailsOpts::read_only(service), out).await?;
    let snippets = globals
        .client
        .list_snippets(&svc.service_id, svc.number())
        .await
        .map_err(|e| globals.errlog.record(e, svc.log_context()))?;

    if !globals.verbose {
        if json {
            return output::json(out, &snippets);
        }

        let mut table = Table::new();
        table.add_header(["SERVICE ID", "VERSION", "NAME", "DYNAMIC", "SNIPPET ID"]);
        for s in &snippets {
            table.add_line([
                s.service_id.clone(),
                s.service_version.to_string(),
                s.name.clone(),
                s.dynamic.to_string(),
                s.id.clone(),
            ]);
        }
        table.print(out)?;
        return Ok(());
    }

    writeln!(out, "Service Version: {}", svc.number())?;
    for (i, s) in snippets.iter().enumerate() {
        writeln!(out, "\tSnippet {}/{}", i + 1, snippets.len())?;
        writeln!(out, "\t\tName: {}", s.name)?;
        writeln!(out, "\t\tID: {}", s.id)?;
        writeln!(out, "\t\tPriority: {}", s.priority)?;
        writeln!(out, "\t\tDynamic: {}", s.dynamic)?;
        writeln!(out, "\t\tType: {}", s.snippet_type)?;
        writeln!(out, "\t\tContent: \n{}", s.content)?;
    }
    writeln!(out)?;

    Ok(())
}

// ============ update ============

/// Flags accepted by `vcl snippet update`.
#[derive(Debug, Default)]
struct UpdateFlags {
    content: Option<String>,
    dynamic: bool,
    name: Option<String>,
    new_name: Option<String>,
    priority: Option<u32>,
    snippet_id: Option<String>,
    location: Option<SnippetType>,
}

#[derive(Debug, PartialEq, Eq)]
enum UpdateInput {
    Dynamic { snippet_id: String, form: Form },
    Versioned { name: String, form: Form },
}

impl UpdateFlags {
    /// `--dynamic` selects the dynamic path; the two paths accept different flags.
    fn construct(&self) -> Result<UpdateInput, FastlyError> {
        if self.dynamic {
            if self.new_name.is_some() {
                return Err(FastlyError::InvalidArguments(
                    "--new-name is not supported when updating a dynamic VCL snippet".into(),
                ));
            }
            let Some(snippet_id) = non_empty(&self.snippet_id) else {
                return Err(FastlyError::InvalidArguments(
                    "must provide --snippet-id to update a dynamic VCL snippet".into(),
                ));
            };
            let mut form = Form::new();
            if let Some(c) = &self.content {
                form.push(("content", content(c)));
            }
            return Ok(UpdateInput::Dynamic { snippet_id: snippet_id.to_string(), form });
        }

        if non_empty(&self.snippet_id).is_some() {
            return Err(FastlyError::InvalidArguments(
                "--snippet-id is not supported when updating a versioned VCL snippet".into(),
            ));
        }
        let Some(name) = non_empty(&self.name) else {
            return Err(FastlyError::InvalidArguments(
                "must provide --name to update a versioned VCL snippet".into(),
            ));
        };

        let mut form = Form::new();
        if let Some(new_name) = &self.new_name {
            form.push(("name", new_name.clone()));
        }
        if let Some(priority) = self.priority {
            form.push(("priority", priority.to_string()));
        }
        if let Some(c) = &self.content {
            form.push(("content", content(c)));
        }
        if let Some(location) = self.location {
            form.push(("type", location.to_string()));
        }
        Ok(UpdateInput::Versioned { name: name.to_string(), form })
    }
}

async fn update(
    globals: &Globals,
    service: &ServiceArgs,
    autoclone: bool,
    flags: &UpdateFlags,
    out: &mut dyn Write,
) -> Result<()> {
    let input = flags.construct().map_err(|e| globals.errlog.record(e, Vec::new()))?;

    let svc = service_details(globals, ServiceDetailsOpts::mutating(service, autoclone), out).await?;

    match input {
        UpdateInput::Dynamic { snippet_id, form } => {
            let v = globals
                .client
                .update_dynamic_snippet(&svc.service_id, &snippet_id, &form)
                .await
                .map_err(|e| globals.errlog.record(e, svc.log_context()))?;
            output::success(
                out,
                &format!("Updated dynamic VCL snippet '{}' (service: {})", v.id, v.service_id),
            )?;
        }
        UpdateInput::Versioned { name, form } => {
            let v = globals
                .client
                .update_snippet(&svc.service_id, svc.number(), &name, &form)
                .await
                .map_err(|e| globals.errlog.record(e, svc.log_context()))?;
            output::success(
                out,
                &format!(
                    "Updated VCL snippet '{}' (previously: '{}', service: {}, version: {}, type: {}, priority: {})",
                    v.name, name, v.service_id, v.service_version, v.snippet_type, v.priority
                ),
            )?;
        }
    }
    Ok(())
}
