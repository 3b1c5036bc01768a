//! Local target for the client: decodes work records and acknowledges each one.

use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_util::codec::Framed;

use crate::codec::SinkCodec;
use crate::record::WorkRecord;
use crate::Error;

pub fn ack(record: &WorkRecord) -> Bytes {
    Bytes::from(format!("ok {} {}", record.command, record.payload.len()))
}

/// Accepts connections until the listener fails.
pub async fn serve(listener: TcpListener) -> Result<(), Error> {
    loop {
        let (stream, socket_addr) = listener.accept().await.map_err(Error::Network)?;
        tracing::info!("{socket_addr} connected");
        tokio::spawn(async move {
            match handle(stream).await {
                Ok(count) => tracing::info!("{socket_addr} closed after {count} records"),
                Err(e) => tracing::warn!("{socket_addr} dropped: {e:?}"),
            }
        });
    }
}

async fn handle(stream: TcpStream) -> Result<u64, Error> {
    let mut framed = Framed::new(stream, SinkCodec);
    let mut count = 0;
    while let Some(record) = framed.next().await {
        let record = record.map_err(Error::on_socket)?;
        tracing::debug!(
            "record #{count}: tag {:?}, cmd {}, len {}",
            String::from_utf8_lossy(&record.tag),
            record.command,
            record.payload.len()
        );
        framed.send(ack(&record)).await.map_err(Error::on_socket)?;
        count += 1;
    }
    Ok(count)
}
