use std::io::{self, BufRead, Write};

use serde::Serialize;
use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::error::AppError;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(object), Some(Value::Object(extra))) = (response.as_object_mut(), data) {
                object.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("{}", message);
        }
    }
    Ok(())
}

/// Output an error in the appropriate format
pub fn output_error(output_format: &OutputFormat, error: &AppError) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&error.to_json())?);
        }
        OutputFormat::Text => {
            eprintln!("❌ {}", error);
        }
    }
    Ok(())
}

/// Serialize the view model for `--json`, print the rendered text otherwise
pub fn output_view<T: Serialize>(
    output_format: &OutputFormat,
    view: &T,
    text: impl FnOnce(&T) -> String,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ "success": true, "data": view }))?);
        }
        OutputFormat::Text => {
            print!("{}", text(view));
            io::stdout().flush()?;
        }
    }
    Ok(())
}

/// Read one trimmed line from stdin after printing `label`
pub fn prompt(label: &str) -> anyhow::Result<String> {
    eprint!("{}", label);
    io::stderr().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
