use std::time::Instant;

use work_client::{
    client::{self, LoopMessage, WorkClient},
    config::{Config, CONFIG_PATH},
    log::init_log,
    record::{default_payload, WorkRecord},
    Error,
};

async fn run() -> Result<(), Error> {
    let config = Config::load(CONFIG_PATH)?;
    let record = WorkRecord::work(&default_payload());
    let start_time = Instant::now();

    let target = config.client.target();
    let client = WorkClient::connect(target.as_str()).await?;
    println!("connected");
    tracing::info!("connected to {target}");

    let (close_tx, mut close_rx) = tokio::sync::mpsc::unbounded_channel();
    ctrlc2::set_async_handler(async move {
        let _ = close_tx.send(LoopMessage::Close);
    })
    .await;

    let mut out = std::io::stdout();
    client::run(client, &record, &mut out, &mut close_rx, start_time).await
}

#[tokio::main]
async fn main() {
    let log_guard = init_log("work-client");
    if let Err(e) = run().await {
        tracing::error!("work client stopped: {e:?}");
        eprintln!("{e:?}");
        drop(log_guard);
        std::process::exit(1);
    }
}
