use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Child;
use tokio::sync::mpsc;

use crate::application::ports::RenderError;
use crate::domain::JobId;

/// Lines buffered between the stream readers and the logging consumer.
/// Readers block on a full channel, which in turn drains the child's pipe
/// no faster than the sink can take it.
const RELAY_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Stdout,
    Stderr,
}

impl StreamKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamKind::Stdout => "stdout",
            StreamKind::Stderr => "stderr",
        }
    }
}

/// One line read from a child process stream, tagged with its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayedLine {
    pub stream: StreamKind,
    pub line: String,
}

/// Start one reader task per output stream of `child`.
///
/// Each reader forwards lines to the returned channel until its stream
/// closes. Lines from one stream arrive in emission order; no ordering
/// holds across the two streams.
pub fn spawn_relays(child: &mut Child) -> Result<mpsc::Receiver<RelayedLine>, RenderError> {
    let stdout = child
        .stdout
        .take()
        .ok_or(RenderError::StreamUnavailable("stdout"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or(RenderError::StreamUnavailable("stderr"))?;

    let (tx, rx) = mpsc::channel(RELAY_CHANNEL_CAPACITY);

    tokio::spawn(relay_stream(stdout, StreamKind::Stdout, tx.clone()));
    tokio::spawn(relay_stream(stderr, StreamKind::Stderr, tx));

    Ok(rx)
}

/// Single consumer writing relayed lines to the tracing sink, serialized.
pub async fn log_lines(job_id: JobId, mut rx: mpsc::Receiver<RelayedLine>) {
    while let Some(entry) = rx.recv().await {
        match entry.stream {
            StreamKind::Stdout => {
                tracing::info!(job_id = %job_id, stream = "stdout", "{}", entry.line);
            }
            StreamKind::Stderr => {
                tracing::warn!(job_id = %job_id, stream = "stderr", "{}", entry.line);
            }
        }
    }
}

async fn relay_stream<R>(stream: R, kind: StreamKind, tx: mpsc::Sender<RelayedLine>)
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(stream).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if tx.send(RelayedLine { stream: kind, line }).await.is_err() {
                    break;
                }
            }
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(stream = kind.as_str(), error = %e, "Output relay read failed");
                break;
            }
        }
    }
}
