use serde_json::json;

use crate::cli::OutputFormat;
use crate::routes::ROUTES;

pub fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({"routes": ROUTES}))?);
        }
        OutputFormat::Text => {
            println!("{:<32} {:<20} {}", "PATH", "NAME", "VIEW");
            println!("{}", "-".repeat(76));

            for route in ROUTES {
                println!("{:<32} {:<20} {}", route.path, route.name, route.view);
            }
        }
    }

    Ok(())
}
