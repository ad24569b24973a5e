use schemars::schema_for;

use crate::model::Scenario;

/// CLI entry point for the `schema` subcommand: print the JSON schema
/// scenario files must conform to.
pub fn run() -> anyhow::Result<()> {
    let schema = schema_for!(Scenario);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
