//! Output rendering
//!
//! - stdout = command results (table, JSON or verbose text)
//! - stderr = errors, remediation hints and tracing logs

use std::io::{self, Write};

use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::{Padding, Style};

use crate::error::{self, Category};

/// Write a value as compact JSON.
pub fn json<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> anyhow::Result<()> {
    let data = serde_json::to_string(value)?;
    writeln!(out, "{}", data)?;
    Ok(())
}

/// Write a success line for a mutating command.
pub fn success(out: &mut dyn Write, message: &str) -> io::Result<()> {
    writeln!(out, "SUCCESS: {}", message)
}

/// Write `label: value` lines with a fixed indent.
pub fn fields(out: &mut dyn Write, indent: &str, fields: &[(&str, String)]) -> io::Result<()> {
    for (label, value) in fields {
        writeln!(out, "{}{}: {}", indent, label, value)?;
    }
    Ok(())
}

/// Column-aligned table without borders.
#[derive(Debug, Default)]
pub struct Table {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_header<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.header = cells.into_iter().map(|c| c.into().to_uppercase()).collect();
    }

    pub fn add_line<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        self.rows.push(cells.into_iter().map(|c| c.to_string()).collect());
    }

    pub fn print(&self, out: &mut dyn Write) -> io::Result<()> {
        if self.header.is_empty() && self.rows.is_empty() {
            return Ok(());
        }

        let mut builder = Builder::default();
        if !self.header.is_empty() {
            builder.push_record(self.header.clone());
        }
        for row in &self.rows {
            builder.push_record(row.clone());
        }

        let mut table = builder.build();
        table.with(Style::empty()).with(Padding::new(0, 2, 0, 0));

        // the last column is padded too
        for line in table.to_string().lines() {
            writeln!(out, "{}", line.trim_end())?;
        }
        Ok(())
    }
}

/// What gets printed for a failed invocation.
#[derive(Debug)]
pub struct ErrorReport {
    pub cat: String,
    pub message: String,
    pub remediation: Option<String>,
    exit_code: i32,
}

impl ErrorReport {
    pub fn from_error(err: &anyhow::Error) -> Self {
        let (category, remediation) = match error::classify(err) {
            Some(e) => (e.category(), e.remediation()),
            None => (Category::System, None),
        };
        Self {
            cat: category.as_str().into(),
            message: format!("{:#}", err),
            remediation: remediation.map(Into::into),
            exit_code: category.exit_code(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }

    pub fn write(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "ERROR: {}.", self.message)?;
        if let Some(hint) = &self.remediation {
            writeln!(out)?;
            writeln!(out, "{}", hint)?;
        }
        Ok(())
    }
}
