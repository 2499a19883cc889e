//! Reference responder (plays the opponent over TCP).
//!
//! Configuration comes from `C4_RESPONDER_*` environment variables.

use anyhow::{Context, Result};

use connect_four::protocol::{check_tcp_listen_available, run_responder, Greedy, ResponderConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ResponderConfig::from_env();

    check_tcp_listen_available(&config.host, config.port)
        .with_context(|| format!("cannot listen on {}", config.addr()))?;

    run_responder(config, || Greedy, None).await
}
