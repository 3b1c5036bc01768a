use std::io::{Error as StdError, ErrorKind, Write};
use std::time::Instant;

use futures::{SinkExt, StreamExt};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio_util::codec::Framed;

use crate::codec::ClientCodec;
use crate::record::WorkRecord;
use crate::Error;

/// Outcome of one send/receive round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub sent: usize,
    pub reply: String,
    pub index: u64,
}

pub enum LoopMessage {
    Close,
}

pub struct WorkClient {
    framed: Framed<TcpStream, ClientCodec>,
    rounds: u64,
}

impl WorkClient {
    pub async fn connect<A: ToSocketAddrs>(addr: A) -> Result<WorkClient, Error> {
        let stream = TcpStream::connect(addr).await.map_err(Error::Network)?;
        Ok(WorkClient {
            framed: Framed::new(stream, ClientCodec),
            rounds: 0,
        })
    }

    /// Sends `record` and waits for one reply chunk of at most 1024 bytes.
    pub async fn exchange(&mut self, record: &WorkRecord) -> Result<Exchange, Error> {
        let sent = record.encoded_len();
        self.framed.send(record).await.map_err(Error::on_socket)?;
        let reply = match self.framed.next().await {
            Some(chunk) => chunk.map_err(Error::on_socket)?,
            None => {
                return Err(Error::Network(StdError::new(
                    ErrorKind::ConnectionAborted,
                    "peer closed before replying",
                )));
            }
        };
        let reply = String::from_utf8(reply.to_vec())?;
        let index = self.rounds;
        self.rounds += 1;
        Ok(Exchange { sent, reply, index })
    }

    pub fn rounds(&self) -> u64 {
        self.rounds
    }

    pub async fn close(mut self) -> Result<(), Error> {
        self.framed.close().await.map_err(Error::on_socket)
    }
}

/// Repeats `record` until `close_rx` delivers [`LoopMessage::Close`] or a round
/// fails, writing each round's diagnostics to `out`.
pub async fn run_rounds<W: Write>(
    client: &mut WorkClient,
    record: &WorkRecord,
    out: &mut W,
    close_rx: &mut UnboundedReceiver<LoopMessage>,
) -> Result<(), Error> {
    loop {
        tokio::select! {
            Some(LoopMessage::Close) = close_rx.recv() => {
                return Ok(());
            }
            r = client.exchange(record) => {
                let exchange = r?;
                writeln!(out, "send data len:")?;
                writeln!(out, "{}", exchange.sent)?;
                writeln!(out, "{}", exchange.reply)?;
                writeln!(out, "{}", exchange.index)?;
            }
        }
    }
}

/// Runs rounds until closed, then shuts the connection down and reports the
/// elapsed time since `start_time`.
pub async fn run<W: Write>(
    mut client: WorkClient,
    record: &WorkRecord,
    out: &mut W,
    close_rx: &mut UnboundedReceiver<LoopMessage>,
    start_time: Instant,
) -> Result<(), Error> {
    run_rounds(&mut client, record, out, close_rx).await?;
    tracing::info!("closing after {} rounds", client.rounds());
    client.close().await?;
    writeln!(out, "time count: ")?;
    writeln!(out, "{}", start_time.elapsed().as_secs_f64())?;
    Ok(())
}
