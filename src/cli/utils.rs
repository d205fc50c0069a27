use serde_json::{json, Value};

use crate::cli::OutputFormat;

/// Output a result: the JSON envelope, or the text lines for humans
pub fn output_result(output_format: OutputFormat, data: Value, text_lines: &[String]) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ "success": true, "data": data }))?);
        }
        OutputFormat::Text => {
            for line in text_lines {
                println!("{}", line);
            }
        }
    }
    Ok(())
}

/// Output a failure that is an answer rather than an error (e.g. access denied)
pub fn output_failure(output_format: OutputFormat, message: &str, code: &str, data: Value) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "success": false,
                    "error": message,
                    "error_code": code,
                    "data": data,
                }))?
            );
        }
        OutputFormat::Text => {
            eprintln!("{}: {}", code, message);
        }
    }
    Ok(())
}

/// Output an empty collection in the appropriate format
pub fn output_empty_collection(output_format: OutputFormat, collection_name: &str, message: &str) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ collection_name: [] }))?);
        }
        OutputFormat::Text => {
            println!("{}", message);
        }
    }
    Ok(())
}
