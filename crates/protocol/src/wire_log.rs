//! Wire log - append-only JSON-lines record of protocol traffic.
//!
//! Records are handed to a background task over an unbounded channel so the
//! game never waits on the file system. Write failures end the task silently.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc;

use crate::codec::Message;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WireDirection {
    Tx,
    Rx,
}

/// One logged frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WireRecord {
    pub ts: u64,
    pub dir: WireDirection,
    pub peer: Arc<str>,
    pub opcode: &'static str,
    pub bytes: Vec<u8>,
}

/// Cheap, cloneable handle feeding the log task
#[derive(Debug, Clone)]
pub struct WireLog {
    tx: mpsc::UnboundedSender<WireRecord>,
    peer: Arc<str>,
}

impl WireLog {
    /// Build a log handle plus the receiving end of its record stream.
    pub fn channel(peer: &str) -> (Self, mpsc::UnboundedReceiver<WireRecord>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                tx,
                peer: Arc::from(peer),
            },
            rx,
        )
    }

    /// Spawn a task appending records to `path`. Must be called inside a tokio runtime.
    pub fn spawn(path: impl Into<PathBuf>, peer: &str) -> Self {
        let path = path.into();
        let (log, mut rx) = Self::channel(peer);

        tokio::spawn(async move {
            use tokio::fs::OpenOptions;
            use tokio::io::AsyncWriteExt;

            let mut file = match OpenOptions::new().create(true).append(true).open(&path).await {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("[WireLog] cannot open {}: {}", path.display(), e);
                    return;
                }
            };

            let mut buf: Vec<u8> = Vec::with_capacity(256);
            while let Some(rec) = rx.recv().await {
                buf.clear();
                if serde_json::to_writer(&mut buf, &rec).is_err() {
                    continue;
                }
                buf.push(b'\n');
                if file.write_all(&buf).await.is_err() {
                    break;
                }
            }

            let _ = file.flush().await;
        });

        log
    }

    /// Same sink, different peer label
    pub fn for_peer(&self, peer: &str) -> Self {
        Self {
            tx: self.tx.clone(),
            peer: Arc::from(peer),
        }
    }

    pub fn record(&self, dir: WireDirection, msg: &Message) {
        let _ = self.tx.send(WireRecord {
            ts: now_ms(),
            dir,
            peer: Arc::clone(&self.peer),
            opcode: msg.opcode().as_str(),
            bytes: msg.encode().to_vec(),
        });
    }
}

pub fn now_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
