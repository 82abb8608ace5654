//! FTP logging endpoints

use std::io::Write;

use anyhow::Result;

use super::{push, FormFields};
use crate::api::{Form, Ftp};
use crate::cli::{FtpAction, FtpCommand, FtpCreate, FtpUpdate};
use crate::config::Globals;

pub async fn run(cmd: FtpCommand, globals: &Globals, out: &mut dyn Write) -> Result<()> {
    match cmd.action {
        FtpAction::List { service, output } => {
            super::list::<Ftp>(globals, &service, output.json, out).await
        }
        FtpAction::Describe { service, output, name } => {
            super::describe::<Ftp>(globals, &service, output.json, &name, out).await
        }
        FtpAction::Create { service, autoclone, fields } => {
            super::create::<Ftp>(globals, &service, autoclone.autoclone, fields.form(), out).await
        }
        FtpAction::Update { service, autoclone, fields } => {
            let form = fields.form();
            super::update::<Ftp>(globals, &service, autoclone.autoclone, &fields.name, form, out)
                .await
        }
        FtpAction::Delete { service, autoclone, name } => {
            super::delete::<Ftp>(globals, &service, autoclone.autoclone, &name, out).await
        }
    }
}

impl FormFields for FtpCreate {
    fn write_form(&self, form: &mut Form) {
        form.push(("name", self.name.clone()));
        form.push(("address", self.address.clone()));
        form.push(("user", self.user.clone()));
        form.push(("password", self.password.clone()));
        form.push(("path", self.path.clone()));
        push(form, "port", &self.port);
        push(form, "public_key", &self.public_key);
        push(form, "period", &self.period);
        push(form, "gzip_level", &self.gzip_level);
        push(form, "compression_codec", &self.compression_codec);
        push(form, "timestamp_format", &self.timestamp_format);
        push(form, "message_type", &self.message_type);
        self.common.write_form(form);
    }
}

impl FormFields for FtpUpdate {
    fn write_form(&self, form: &mut Form) {
        push(form, "name", &self.new_name);
        push(form, "address", &self.address);
        push(form, "user", &self.user);
        push(form, "password", &self.password);
        push(form, "path", &self.path);
        push(form, "port", &self.port);
        push(form, "public_key", &self.public_key);
        push(form, "period", &self.period);
        push(form, "gzip_level", &self.gzip_level);
        push(form, "compression_codec", &self.compression_codec);
        push(form, "timestamp_format", &self.timestamp_format);
        push(form, "message_type", &self.message_type);
        self.common.write_form(form);
    }
}
