use std::env;

use soroban_message::config::key_from_env;
use soroban_message::{Client, Config, MessageContract};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

const NEW_MESSAGE: &str = "Hola desde Rust ✅";

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let filter = if env::var(EnvFilter::DEFAULT_ENV).is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::default().add_directive(LevelFilter::WARN.into())
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::from_env()?;
    let key = key_from_env()?;
    let rpc = Client::new(config.rpc_url.clone())?;
    rpc.verify_network(&config.network_passphrase).await?;

    println!("--- Message contract demo ---");
    println!("account:  {}", key.public_key());
    println!("contract: {}", config.contract_id);

    let contract = MessageContract::new(&rpc, &key, &config);

    println!("\nget_message()");
    let message = contract.get_message().await?;
    println!("current message: {message:?}");

    println!("\nset_message({NEW_MESSAGE:?})");
    let record = contract.set_message(NEW_MESSAGE).await?;
    println!("confirmed in ledger {:?}, hash {}", record.ledger, record.hash);

    println!("\nget_message()");
    let message = contract.get_message().await?;
    println!("current message: {message:?}");

    println!("\n--- Demo finished ---");
    Ok(())
}
