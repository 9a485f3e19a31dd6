//! Display utilities for CLI output formatting

use anyhow::Result;
use colored::Colorize;
use serde_json::Value;

use cisapi_client::EndpointSpec;

/// Display one catalog entry: name, required and optional parameters
pub fn display_endpoint(spec: &EndpointSpec) {
    let mut line = spec.name.bright_cyan().bold().to_string();
    for name in spec.required {
        line.push(' ');
        line.push_str(name);
    }
    for name in spec.optional {
        line.push(' ');
        line.push_str(&format!("[{name}]").dimmed().to_string());
    }
    println!("{line}");
}

/// Print a response body
pub fn display_json(value: &Value, compact: bool) -> Result<()> {
    let rendered = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{rendered}");
    Ok(())
}
