//! Parses a form body stored in a file and prints its fields.
//!
//! ```text
//! cargo run --example parse_form -- body.txt 'multipart/form-data; boundary=X'
//! ```

use micro_form::{FormConfig, FormValue, read_formdata_from_reader};
use std::env;
use std::process::ExitCode;
use tokio::fs::File;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> ExitCode {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::DEBUG).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let mut args = env::args().skip(1);
    let (Some(path), content_type) = (args.next(), args.next()) else {
        eprintln!("usage: parse_form <body file> [content type]");
        return ExitCode::FAILURE;
    };
    let content_type = content_type.unwrap_or_else(|| mime::APPLICATION_WWW_FORM_URLENCODED.to_string());

    let file = match File::open(&path).await {
        Ok(file) => file,
        Err(e) => {
            error!(cause = %e, path = %path, "failed to open body file");
            return ExitCode::FAILURE;
        }
    };

    let config = FormConfig::new().file_memory_limit(64 * 1024);
    let form = match read_formdata_from_reader(&content_type, file, &config).await {
        Ok(form) => form,
        Err(e) => {
            error!(cause = %e, "failed to parse form");
            return ExitCode::FAILURE;
        }
    };

    info!(fields = form.len(), "parsed form");
    for (name, value) in &form {
        match value {
            FormValue::Text(text) => println!("{name} = {text:?}"),
            FormValue::File(file) => {
                let size = file.size().unwrap_or_default();
                let location = if file.is_spilled() { "on disk" } else { "in memory" };
                println!("{name} = {} ({}, {size} bytes {location})", file.filename(), file.content_type());
            }
        }
    }

    ExitCode::SUCCESS
}
