//! Stdin/stdout JSON bridge for the host command channel.
//!
//! Reads newline-delimited JSON `CommandEnvelope` messages, routes them
//! through a [`HostSession`], and writes `ResponseEnvelope` and
//! `EventEnvelope` messages as newline-delimited JSON.
//!
//! Stdout is exclusively reserved for the JSON protocol; all diagnostic
//! output (tracing, logs) must be routed to stderr.

use std::sync::Arc;

use scout_search::{SearchExecutor, Transport};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};
use tokio::sync::{Mutex, mpsc};

use crate::config::ScoutConfig;
use crate::error::{Result, ScoutError};
use crate::host::contract::{CommandEnvelope, CommandName, EventEnvelope, ResponseEnvelope};
use crate::host::session::HostSession;
use crate::orchestrator::Orchestrator;

/// Run the JSON bridge on the process's stdin/stdout with an HTTP provider.
///
/// # Errors
///
/// Returns an error if the search pipeline cannot be built or stdio fails.
pub async fn run_stdio_bridge(config: &ScoutConfig) -> Result<()> {
    let executor = SearchExecutor::http(config.search_config())?;
    let reader = BufReader::new(tokio::io::stdin());
    let writer = BufWriter::new(tokio::io::stdout());
    run_bridge(executor, config, reader, writer).await?;
    Ok(())
}

/// Run the bridge until `reader` reaches EOF or `runtime.stop` is received.
///
/// Three tasks cooperate:
///
/// 1. **Reader** -- this task; parses each line, routes it, and writes the
///    response.
/// 2. **Delivery** -- drains the orchestrator's delivery context so
///    completion callbacks run.
/// 3. **Event writer** -- writes `search.completed` events as they arrive.
///
/// On shutdown the session is dropped first, so searches still in flight
/// are delivered and their events written before this returns `writer`.
///
/// # Errors
///
/// Returns an error if the orchestrator cannot start or I/O fails.
pub async fn run_bridge<T, R, W>(
    executor: SearchExecutor<T>,
    config: &ScoutConfig,
    reader: R,
    writer: W,
) -> Result<W>
where
    T: Transport + 'static,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (orchestrator, deliveries) = Orchestrator::new(executor, config.history.clone())?;
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<EventEnvelope>();
    let session = HostSession::new(orchestrator, config.host.output, event_tx);

    let writer = Arc::new(Mutex::new(writer));

    let delivery_handle = tokio::spawn(deliveries.run());

    let event_writer = Arc::clone(&writer);
    let event_handle = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            match serde_json::to_string(&event) {
                Ok(json) => {
                    let mut w = event_writer.lock().await;
                    if let Err(e) = write_line(&mut *w, &json).await {
                        tracing::warn!(
                            error = %e,
                            "failed to write event envelope; stopping event writer"
                        );
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "failed to serialize event envelope; skipping");
                }
            }
        }
    });

    let reader_result = run_reader(&session, reader, &writer).await;

    drop(session);
    if let Err(e) = delivery_handle.await {
        tracing::error!(error = %e, "delivery task failed");
    }
    if let Err(e) = event_handle.await {
        tracing::error!(error = %e, "event writer task failed");
    }

    reader_result?;

    let writer = Arc::try_unwrap(writer)
        .map_err(|_| ScoutError::Channel("bridge writer still shared after shutdown".into()))?;
    Ok(writer.into_inner())
}

/// Read line-by-line, route each command, and write responses.
async fn run_reader<T, R, W>(
    session: &HostSession<T>,
    mut reader: R,
    writer: &Mutex<W>,
) -> Result<()>
where
    T: Transport + 'static,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut line = String::new();

    loop {
        line.clear();
        let bytes_read = reader
            .read_line(&mut line)
            .await
            .map_err(|e| ScoutError::Channel(format!("failed to read command: {e}")))?;

        if bytes_read == 0 {
            tracing::info!("input closed (EOF); shutting down bridge");
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let envelope: CommandEnvelope = match serde_json::from_str(trimmed) {
            Ok(env) => env,
            Err(e) => {
                tracing::warn!(error = %e, raw_line = %trimmed, "failed to parse command envelope");
                let response = ResponseEnvelope::error(
                    "parse-error",
                    format!("failed to parse command envelope: {e}"),
                );
                write_response(writer, &response).await?;
                continue;
            }
        };

        let is_stop = envelope.command == CommandName::RuntimeStop;

        let response = match session.route(&envelope) {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    command = envelope.command.as_str(),
                    request_id = %envelope.request_id,
                    "host command rejected"
                );
                ResponseEnvelope::error(envelope.request_id.clone(), e.to_string())
            }
        };

        write_response(writer, &response).await?;

        if is_stop {
            tracing::info!("runtime.stop received; shutting down bridge");
            break;
        }
    }

    Ok(())
}

async fn write_response<W: AsyncWrite + Unpin>(
    writer: &Mutex<W>,
    response: &ResponseEnvelope,
) -> Result<()> {
    let json = serde_json::to_string(response)
        .map_err(|e| ScoutError::Channel(format!("failed to serialize response envelope: {e}")))?;
    let mut w = writer.lock().await;
    write_line(&mut *w, &json).await
}

/// Write a single JSON line and flush.
async fn write_line<W: AsyncWrite + Unpin>(writer: &mut W, json: &str) -> Result<()> {
    writer
        .write_all(json.as_bytes())
        .await
        .map_err(|e| ScoutError::Channel(format!("failed to write output: {e}")))?;
    writer
        .write_all(b"\n")
        .await
        .map_err(|e| ScoutError::Channel(format!("failed to write newline: {e}")))?;
    writer
        .flush()
        .await
        .map_err(|e| ScoutError::Channel(format!("failed to flush output: {e}")))?;
    Ok(())
}
