use std::io::{self, Write};
use std::time::Instant;

use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};

use work_client::{
    client::{self, LoopMessage, WorkClient},
    record::{default_payload, WorkRecord},
    sink, Error,
};

/// Collects console output and asks the loop to stop once the first round
/// has been printed.
struct StopAfterFirstRound {
    buf: Vec<u8>,
    close_tx: Option<UnboundedSender<LoopMessage>>,
}

impl Write for StopAfterFirstRound {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        if self.buf.iter().filter(|b| **b == b'\n').count() >= 4 {
            if let Some(tx) = self.close_tx.take() {
                let _ = tx.send(LoopMessage::Close);
            }
        }
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn client_rounds_against_sink() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(sink::serve(listener));

    let record = WorkRecord::work(&default_payload());
    let mut client = WorkClient::connect(addr).await.unwrap();
    for round in 0..5u64 {
        let exchange = client.exchange(&record).await.unwrap();
        assert_eq!(exchange.sent, 756);
        assert_eq!(exchange.reply, "ok 1 740");
        assert_eq!(exchange.index, round);
    }
    client.close().await.unwrap();
    server.abort();
}

#[tokio::test]
async fn run_prints_rounds_then_time_count() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(sink::serve(listener));

    let (close_tx, mut close_rx) = unbounded_channel();
    let mut out = StopAfterFirstRound {
        buf: Vec::new(),
        close_tx: Some(close_tx),
    };
    let record = WorkRecord::work(&default_payload());
    let client = WorkClient::connect(addr).await.unwrap();
    client::run(client, &record, &mut out, &mut close_rx, Instant::now())
        .await
        .unwrap();
    server.abort();

    let text = String::from_utf8(out.buf).unwrap();
    assert!(text.starts_with("send data len:\n756\nok 1 740\n0\n"), "{text}");
    let tail: Vec<&str> = text.lines().rev().take(2).collect();
    assert_eq!(tail[1], "time count: ");
    assert!(tail[0].parse::<f64>().unwrap() >= 0.0);
}

#[tokio::test]
async fn close_message_shuts_the_connection() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    // Never replies, so only the close message can end the loop.
    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut received = Vec::new();
        stream.read_to_end(&mut received).await.map(|_| received)
    });

    let (close_tx, mut close_rx) = unbounded_channel();
    close_tx.send(LoopMessage::Close).unwrap();
    let mut out = Vec::new();
    let client = WorkClient::connect(addr).await.unwrap();
    client::run(
        client,
        &WorkRecord::work(&default_payload()),
        &mut out,
        &mut close_rx,
        Instant::now(),
    )
    .await
    .unwrap();

    // EOF reached: the peer saw a clean shutdown.
    let received = server.await.unwrap().unwrap();
    assert_eq!(received.len() % 756, 0);
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("time count: \n"), "{text}");
    assert!(!text.contains("send data len:"));
}

#[tokio::test]
async fn peer_closing_without_reply_ends_run() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut buf = vec![0u8; 756];
        stream.read_exact(&mut buf).await.unwrap();
    });

    let (_close_tx, mut close_rx) = unbounded_channel();
    let mut out = Vec::new();
    let client = WorkClient::connect(addr).await.unwrap();
    let result = client::run(
        client,
        &WorkRecord::work(&default_payload()),
        &mut out,
        &mut close_rx,
        Instant::now(),
    )
    .await;
    server.await.unwrap();

    assert!(matches!(result, Err(Error::Network(_))), "{result:?}");
    assert!(out.is_empty());
}

#[tokio::test]
async fn connect_refused_is_reported() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let result = WorkClient::connect(addr).await;
    assert!(matches!(result, Err(Error::Network(_))));
}
