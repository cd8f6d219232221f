//! One agent invocation, end to end.
//!
//! A session spawns the agent, writes the NDJSON body to its stdin and closes
//! it, drains stderr in the background, and decodes stdout. With an
//! increment channel, stdout is decoded chunk by chunk and every new piece of
//! assistant text is forwarded as soon as it appears. Without one, the whole
//! output is decoded after the process exits.
//!
//! The run is bounded by the command's timeout. On expiry, or when the
//! increment consumer disconnects, the agent is terminated.

use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use agentgate_core::{AgentReply, AgentRequest, BridgeError, StreamDecoder};
use bytes::BytesMut;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::command::AgentCommand;
use crate::shutdown::{TERMINATE_GRACE, terminate_agent};

/// How long to wait for stderr to drain once the agent is gone.
const STDERR_DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Run the agent once for `request`.
///
/// Increments already sent on `increments` stay sent if the run fails later.
pub async fn run_session(
    command: &AgentCommand,
    request: AgentRequest,
    increments: Option<mpsc::Sender<String>>,
) -> Result<AgentReply, BridgeError> {
    let program = command.program_name();
    let session_id = request.session_id.clone();
    let args = command.build_args(&request);

    debug!(
        program = %program,
        session_id = %session_id,
        streaming = request.streaming,
        input_bytes = request.ndjson.len(),
        "Spawning agent"
    );

    let mut child = Command::new(&command.program)
        .args(&args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| BridgeError::Spawn {
            program: program.clone(),
            source,
        })?;

    let stdin = child.stdin.take().ok_or_else(|| missing_pipe("stdin"))?;
    let stdout = child.stdout.take().ok_or_else(|| missing_pipe("stdout"))?;
    let stderr = child.stderr.take().ok_or_else(|| missing_pipe("stderr"))?;

    tokio::spawn(write_input(stdin, request.ndjson));
    let stderr_task = tokio::spawn(collect_stderr(stderr, session_id.clone()));

    let driven = tokio::time::timeout(
        command.timeout,
        drive_output(&mut child, stdout, increments.as_ref()),
    )
    .await;

    let outcome = match driven {
        Ok(Ok(outcome)) => Ok(outcome),
        Ok(Err(e)) => {
            debug!(session_id = %session_id, error = %e, "Stopping agent early");
            stop(&mut child, &session_id).await;
            Err(e)
        }
        Err(_) => {
            warn!(
                session_id = %session_id,
                timeout_secs = command.timeout.as_secs(),
                "Agent timed out, terminating"
            );
            stop(&mut child, &session_id).await;
            Err(BridgeError::Timeout(command.timeout))
        }
    };

    let stderr = drain_stderr(stderr_task).await;
    if !stderr.trim().is_empty() {
        warn!(session_id = %session_id, stderr = %stderr.trim(), "Agent wrote to stderr");
    }

    let (decoder, status) = outcome?;
    if !status.success() {
        return Err(BridgeError::AgentExit {
            exit_code: status.code(),
            stderr,
        });
    }

    let stats = decoder.stats();
    info!(
        session_id = %session_id,
        decoded_lines = stats.decoded,
        skipped_lines = stats.skipped,
        "Agent finished"
    );

    Ok(AgentReply {
        text: decoder.into_text(),
        session_id,
        stats,
    })
}

/// Read stdout to EOF, then wait for the process to exit.
async fn drive_output(
    child: &mut Child,
    mut stdout: ChildStdout,
    increments: Option<&mpsc::Sender<String>>,
) -> Result<(StreamDecoder, ExitStatus), BridgeError> {
    let decoder = match increments {
        Some(tx) => stream_output(&mut stdout, tx).await?,
        None => {
            let mut output = Vec::new();
            stdout.read_to_end(&mut output).await?;
            StreamDecoder::decode_complete(&output)
        }
    };

    let status = child.wait().await?;
    Ok((decoder, status))
}

async fn stream_output(
    stdout: &mut ChildStdout,
    tx: &mpsc::Sender<String>,
) -> Result<StreamDecoder, BridgeError> {
    let mut decoder = StreamDecoder::new();
    let mut buf = BytesMut::with_capacity(READ_CHUNK_SIZE);

    loop {
        buf.clear();
        let read = tokio::select! {
            read = stdout.read_buf(&mut buf) => read?,
            () = tx.closed() => return Err(BridgeError::Cancelled),
        };
        if read == 0 {
            break;
        }

        for increment in decoder.push(&buf) {
            if tx.send(increment).await.is_err() {
                return Err(BridgeError::Cancelled);
            }
        }
    }

    decoder.finish();
    Ok(decoder)
}

async fn write_input(mut stdin: ChildStdin, body: String) {
    if let Err(e) = stdin.write_all(body.as_bytes()).await {
        debug!(error = %e, "Agent closed stdin before reading all input");
        return;
    }
    if let Err(e) = stdin.shutdown().await {
        debug!(error = %e, "Failed to close agent stdin");
    }
}

/// Collect stderr, tolerating non-UTF-8 output.
async fn collect_stderr(stream: impl AsyncRead + Unpin, session_id: String) -> String {
    let mut reader = BufReader::new(stream);
    let mut line = Vec::with_capacity(256);
    let mut collected = String::new();

    loop {
        line.clear();
        match reader.read_until(b'\n', &mut line).await {
            Ok(0) => break,
            Ok(_) => {
                let text = String::from_utf8_lossy(&line);
                debug!(session_id = %session_id, "agent stderr: {}", text.trim_end());
                collected.push_str(&text);
            }
            Err(e) => {
                debug!(session_id = %session_id, error = %e, "stderr reader exiting");
                break;
            }
        }
    }
    collected
}

async fn drain_stderr(task: JoinHandle<String>) -> String {
    match tokio::time::timeout(STDERR_DRAIN_TIMEOUT, task).await {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            debug!(error = %e, "stderr reader task failed");
            String::new()
        }
        Err(_) => {
            debug!("stderr still open after agent exit, giving up on it");
            String::new()
        }
    }
}

async fn stop(child: &mut Child, session_id: &str) {
    match terminate_agent(child, TERMINATE_GRACE).await {
        Ok(status) => debug!(session_id = %session_id, status = ?status, "Agent terminated"),
        Err(e) => warn!(session_id = %session_id, error = %e, "Failed to terminate agent"),
    }
}

fn missing_pipe(name: &str) -> BridgeError {
    BridgeError::Io(std::io::Error::other(format!("agent {name} is not piped")))
}
