//! VCL commands

mod snippet;

use std::io::Write;

use anyhow::Result;

use crate::cli::{VclCommand, VclResource};
use crate::config::Globals;

pub async fn run(cmd: VclCommand, globals: &Globals, out: &mut dyn Write) -> Result<()> {
    match cmd.resource {
        VclResource::Snippet(cmd) => snippet::run(cmd, globals, out).await,
    }
}
