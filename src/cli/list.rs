//! List command - feature names in registry order

use crate::config::ReadabilityConfig;
use crate::registry::feature_names;
use anyhow::Result;

pub fn run(config: &ReadabilityConfig, format: &str) -> Result<()> {
    let names = feature_names(config);
    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&names)?),
        _ => {
            for name in &names {
                println!("{name}");
            }
        }
    }
    Ok(())
}
