//! Splunk logging endpoints

use std::io::Write;

use anyhow::Result;

use super::{push, FormFields};
use crate::api::{Form, Splunk};
use crate::cli::{SplunkAction, SplunkCommand, SplunkCreate, SplunkUpdate};
use crate::config::Globals;

pub async fn run(cmd: SplunkCommand, globals: &Globals, out: &mut dyn Write) -> Result<()> {
    match cmd.action {
        SplunkAction::List { service, output } => {
            super::list::<Splunk>(globals, &service, output.json, out).await
        }
        SplunkAction::Describe { service, output, name } => {
            super::describe::<Splunk>(globals, &service, output.json, &name, out).await
        }
        SplunkAction::Create { service, autoclone, fields } => {
            super::create::<Splunk>(globals, &service, autoclone.autoclone, fields.form(), out).await
        }
        SplunkAction::Update { service, autoclone, fields } => {
            let form = fields.form();
            super::update::<Splunk>(globals, &service, autoclone.autoclone, &fields.name, form, out)
                .await
        }
        SplunkAction::Delete { service, autoclone, name } => {
            super::delete::<Splunk>(globals, &service, autoclone.autoclone, &name, out).await
        }
    }
}

impl FormFields for SplunkCreate {
    fn write_form(&self, form: &mut Form) {
        form.push(("name", self.name.clone()));
        form.push(("url", self.url.clone()));
        push(form, "token", &self.token);
        push(form, "tls_ca_cert", &self.tls_ca_cert);
        push(form, "tls_hostname", &self.tls_hostname);
        push(form, "tls_client_cert", &self.tls_client_cert);
        push(form, "tls_client_key", &self.tls_client_key);
        self.common.write_form(form);
    }
}

impl FormFields for SplunkUpdate {
    fn write_form(&self, form: &mut Form) {
        push(form, "name", &self.new_name);
        push(form, "url", &self.url);
        push(form, "token", &self.token);
        push(form, "tls_ca_cert", &self.tls_ca_cert);
        push(form, "tls_hostname", &self.tls_hostname);
        push(form, "tls_client_cert", &self.tls_client_cert);
        push(form, "tls_client_key", &self.tls_client_key);
        self.common.write_form(form);
    }
}
