//! Loggly logging endpoints

use std::io::Write;

use anyhow::Result;

use super::{push, FormFields};
use crate::api::{Form, Loggly};
use crate::cli::{LogglyAction, LogglyCommand, LogglyCreate, LogglyUpdate};
use crate::config::Globals;

pub async fn run(cmd: LogglyCommand, globals: &Globals, out: &mut dyn Write) -> Result<()> {
    match cmd.action {
        LogglyAction::List { service, output } => {
            super::list::<Loggly>(globals, &service, output.json, out).await
        }
        LogglyAction::Describe { service, output, name } => {
            super::describe::<Loggly>(globals, &service, output.json, &name, out).await
        }
        LogglyAction::Create { service, autoclone, fields } => {
            super::create::<Loggly>(globals, &service, autoclone.autoclone, fields.form(), out).await
        }
        LogglyAction::Update { service, autoclone, fields } => {
            let form = fields.form();
            super::update::<Loggly>(globals, &service, autoclone.autoclone, &fields.name, form, out)
                .await
        }
        LogglyAction::Delete { service, autoclone, name } => {
            super::delete::<Loggly>(globals, &service, autoclone.autoclone, &name, out).await
        }
    }
}

impl FormFields for LogglyCreate {
    fn write_form(&self, form: &mut Form) {
        form.push(("name", self.name.clone()));
        form.push(("token", self.token.clone()));
        self.common.write_form(form);
    }
}

impl FormFields for LogglyUpdate {
    fn write_form(&self, form: &mut Form) {
        push(form, "name", &self.new_name);
        push(form, "token", &self.token);
        self.common.write_form(form);
    }
}
