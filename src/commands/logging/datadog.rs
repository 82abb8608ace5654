//! Datadog logging endpoints

use std::io::Write;

use anyhow::Result;

use super::{push, FormFields};
use crate::api::{Datadog, Form};
use crate::cli::{DatadogAction, DatadogCommand, DatadogCreate, DatadogUpdate};
use crate::config::Globals;

pub async fn run(cmd: DatadogCommand, globals: &Globals, out: &mut dyn Write) -> Result<()> {
    match cmd.action {
        DatadogAction::List { service, output } => {
            super::list::<Datadog>(globals, &service, output.json, out).await
        }
        DatadogAction::Describe { service, output, name } => {
            super::describe::<Datadog>(globals, &service, output.json, &name, out).await
        }
        DatadogAction::Create { service, autoclone, fields } => {
            super::create::<Datadog>(globals, &service, autoclone.autoclone, fields.form(), out).await
        }
        DatadogAction::Update { service, autoclone, fields } => {
            let form = fields.form();
            super::update::<Datadog>(globals, &service, autoclone.autoclone, &fields.name, form, out)
                .await
        }
        DatadogAction::Delete { service, autoclone, name } => {
            super::delete::<Datadog>(globals, &service, autoclone.autoclone, &name, out).await
        }
    }
}

impl FormFields for DatadogCreate {
    fn write_form(&self, form: &mut Form) {
        form.push(("name", self.name.clone()));
        form.push(("token", self.token.clone()));
        push(form, "region", &self.region);
        self.common.write_form(form);
    }
}

impl FormFields for DatadogUpdate {
    fn write_form(&self, form: &mut Form) {
        push(form, "name", &self.new_name);
        push(form, "token", &self.token);
        push(form, "region", &self.region);
        self.common.write_form(form);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::CommonLoggingFields;

    #[test]
    fn create_form_always_has_name_and_token() {
        let fields = DatadogCreate {
            name: "dd".into(),
            token: "secret".into(),
            region: None,
            common: CommonLoggingFields { format: Some("%h %t".into()), ..Default::default() },
        };
        assert_eq!(
            fields.form(),
            vec![
                ("name", "dd".to_string()),
                ("token", "secret".to_string()),
                ("format", "%h %t".to_string()),
            ]
        );
    }

    #[test]
    fn update_renames_through_name_field() {
        let fields = DatadogUpdate {
            name: "dd".into(),
            new_name: Some("dd-eu".into()),
            token: None,
            region: Some("EU".into()),
            common: CommonLoggingFields::default(),
        };
        assert_eq!(
            fields.form(),
            vec![("name", "dd-eu".to_string()), ("region", "EU".to_string())]
        );
    }
}
