use anyhow::Result;
use apex_core::configs::Configuration;

pub fn execute() -> Result<()> {
    let schema = schemars::schema_for!(Configuration);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
