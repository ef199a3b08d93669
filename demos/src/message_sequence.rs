use std::env;

use soroban_message::config::key_from_env;
use soroban_message::{Client, Config, MessageContract};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

const MESSAGES: [&str; 3] = [
    "Primer mensaje desde Rust",
    "Segundo mensaje 🚀",
    "Tercer mensaje: ¡listo!",
];

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let filter = if env::var(EnvFilter::DEFAULT_ENV).is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::default().add_directive(LevelFilter::INFO.into())
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::from_env()?;
    let key = key_from_env()?;
    let rpc = Client::new(config.rpc_url.clone())?;
    rpc.wait_for_rpc().await?;
    rpc.verify_network(&config.network_passphrase).await?;

    let contract = MessageContract::new(&rpc, &key, &config);
    println!("initial message: {:?}", contract.get_message().await?);

    for (i, message) in MESSAGES.iter().enumerate() {
        let record = contract.set_message(message).await?;
        let stored = contract.get_message().await?;
        println!(
            "[{}/{}] {} -> {:?}",
            i + 1,
            MESSAGES.len(),
            record.hash.short(),
            stored
        );
        anyhow::ensure!(
            stored.as_deref() == Some(*message),
            "expected {message:?} after update, read {stored:?}"
        );
    }

    println!("all {} updates verified", MESSAGES.len());
    Ok(())
}
