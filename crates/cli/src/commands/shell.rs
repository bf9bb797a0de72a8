use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use lightbus_client::ClientBuilder;
use lightbus_core::ClientConfig;
use lightbus_message::Kwargs;

use crate::transports;

/// `lightbus shell` — an interactive client for ad hoc `call`/`fire`
/// against whatever bus `config` points at.
///
/// ```text
/// > call auth.login {"username": "alice"}
/// > fire auth.user_logged_in {"username": "alice"}
/// > quit
/// ```
pub async fn execute(config: ClientConfig) -> Result<()> {
    let handles = transports::build(&config.bus).await?;
    let client = Arc::new(
        ClientBuilder::new(config, handles.rpc, handles.result, handles.event, handles.schema).build(),
    );
    client.start().await?;

    println!("lightbus shell — `call <api.member> [json kwargs]` / `fire <api.member> [json kwargs]` / `quit`");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "quit" | "exit") {
            break;
        }
        if let Err(err) = dispatch(&client, line).await {
            eprintln!("error: {err}");
        }
    }

    client.stop().await?;
    Ok(())
}

async fn dispatch(client: &lightbus_client::Client, line: &str) -> Result<()> {
    let mut parts = line.splitn(3, ' ');
    let verb = parts.next().unwrap_or_default();
    let address = parts.next().unwrap_or_default();
    let kwargs_json = parts.next().unwrap_or("{}").trim();

    if address.is_empty() {
        anyhow::bail!("usage: {{call|fire}} <api.member> [json kwargs]");
    }

    let value: serde_json::Value = serde_json::from_str(kwargs_json)?;
    let kwargs: Kwargs = match value {
        serde_json::Value::Object(map) => map.into(),
        serde_json::Value::Null => Kwargs::new(),
        other => anyhow::bail!("kwargs must be a JSON object, got {other}"),
    };

    match verb {
        "call" => {
            let result = client.call(address, kwargs).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        "fire" => {
            client.fire(address, kwargs).await?;
            println!("fired");
        }
        other => anyhow::bail!("unknown command {other:?}; expected `call` or `fire`"),
    }
    Ok(())
}
