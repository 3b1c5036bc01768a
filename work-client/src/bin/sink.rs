use tokio::net::TcpListener;

use work_client::{
    config::{Config, CONFIG_PATH},
    log::init_log,
    sink, Error,
};

async fn run() -> Result<(), Error> {
    let config = Config::load(CONFIG_PATH)?;
    let listener = TcpListener::bind(&config.sink.bind)
        .await
        .map_err(Error::Network)?;
    println!("sink listening on {}", config.sink.bind);
    sink::serve(listener).await
}

#[tokio::main]
async fn main() {
    let log_guard = init_log("work-sink");
    if let Err(e) = run().await {
        tracing::error!("sink stopped: {e:?}");
        eprintln!("{e:?}");
        drop(log_guard);
        std::process::exit(1);
    }
}
