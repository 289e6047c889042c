// src/exec/task_runner.rs

//! Individual task process supervision.

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Child;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::engine::{RuntimeEvent, TaskName};
use crate::exec::decode::ChunkDecoder;
use crate::types::TaskExit;

const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Own a running child until it is gone.
///
/// - stdout and stderr are forwarded as `TaskOutput` chunks by one reader per
///   stream, in the order the OS delivers them;
/// - once the process has been reaped and both streams hit EOF, a single
///   `TaskExited` is sent, so every chunk precedes the exit event;
/// - firing `cancel_rx` kills the child (used where process groups cannot be
///   signalled). A dropped sender is not a cancellation.
pub async fn supervise(
    task: TaskName,
    mut child: Child,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
    mut cancel_rx: oneshot::Receiver<()>,
) {
    let stdout = child
        .stdout
        .take()
        .map(|stream| spawn_reader(task.clone(), "stdout", stream, runtime_tx.clone()));
    let stderr = child
        .stderr
        .take()
        .map(|stream| spawn_reader(task.clone(), "stderr", stream, runtime_tx.clone()));

    let status = tokio::select! {
        status = child.wait() => status,
        Ok(()) = &mut cancel_rx => {
            info!(task = %task, "kill requested for task process");
            if let Err(e) = child.start_kill() {
                warn!(task = %task, error = %e, "failed to kill task process");
            }
            child.wait().await
        }
    };

    let exit = match status {
        Ok(status) => TaskExit::from(status),
        Err(e) => {
            warn!(task = %task, error = %e, "waiting for task process failed");
            TaskExit::unknown()
        }
    };

    for reader in [stdout, stderr].into_iter().flatten() {
        if let Err(e) = reader.await {
            warn!(task = %task, error = %e, "output reader panicked");
        }
    }

    debug!(task = %task, exit = %exit, "task process finished");

    if runtime_tx
        .send(RuntimeEvent::TaskExited { task: task.clone(), exit })
        .await
        .is_err()
    {
        debug!(task = %task, "runtime gone; exit event dropped");
    }
}

fn spawn_reader<R>(
    task: TaskName,
    stream_name: &'static str,
    stream: R,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(forward_output(task, stream_name, stream, runtime_tx))
}

/// Forward one output stream as decoded `TaskOutput` chunks until EOF.
pub async fn forward_output<R>(
    task: TaskName,
    stream_name: &'static str,
    mut stream: R,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) where
    R: AsyncRead + Unpin,
{
    let mut decoder = ChunkDecoder::new();
    let mut buf = vec![0u8; READ_CHUNK_SIZE];

    loop {
        let n = match stream.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                warn!(task = %task, stream = stream_name, error = %e, "reading task output failed");
                break;
            }
        };

        let text = decoder.decode(&buf[..n]);
        if !send_output(&task, text, &runtime_tx).await {
            return;
        }
    }

    let rest = decoder.finish();
    send_output(&task, rest, &runtime_tx).await;
    debug!(task = %task, stream = stream_name, "output stream closed");
}

/// Returns `false` once the runtime has gone away.
async fn send_output(task: &str, text: String, runtime_tx: &mpsc::Sender<RuntimeEvent>) -> bool {
    if text.is_empty() {
        return true;
    }
    runtime_tx
        .send(RuntimeEvent::TaskOutput {
            task: task.to_string(),
            text,
        })
        .await
        .is_ok()
}
