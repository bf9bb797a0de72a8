use anyhow::Result;

use lightbus_core::ClientConfig;

/// `lightbus inspect` — print the APIs named in the loaded configuration
/// and the transport/validation options that apply to each. Per-API entries not present in `apis.*` fall back to the
/// documented defaults, which this prints explicitly rather than omitting.
pub fn execute(config: &ClientConfig) -> Result<()> {
    println!("bus:");
    println!("  rpc_transport:    {:?}", config.bus.rpc_transport);
    println!("  result_transport: {:?}", config.bus.result_transport);
    println!("  event_transport:  {:?}", config.bus.event_transport);
    println!("  schema_transport: {:?}", config.bus.schema_transport);

    if config.apis.is_empty() {
        println!("apis: (none configured; all APIs use documented defaults)");
        return Ok(());
    }

    println!("apis:");
    let mut names: Vec<&String> = config.apis.keys().collect();
    names.sort();
    for name in names {
        let options = &config.apis[name];
        println!(
            "  {name}: rpc_timeout={}s event_fire_timeout={}s validate={:?} cast_values={}",
            options.rpc_timeout_secs, options.event_fire_timeout_secs, options.validate, options.cast_values
        );
    }
    Ok(())
}
