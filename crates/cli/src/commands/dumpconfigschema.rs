use anyhow::Result;
use lightbus_core::ClientConfig;

/// `lightbus dumpconfigschema` — print the JSON schema of [`ClientConfig`]
/// so operators can validate a config file before handing it to `run`
///.
pub fn execute() -> Result<()> {
    let schema = schemars::schema_for!(ClientConfig);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
