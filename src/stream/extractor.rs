// Token extraction pump.
//
// Consumes the upstream byte stream, reassembles lines across chunk
// boundaries, decodes each line, and sends token fragments into a
// bounded channel consumed by the response body. Suspension happens at
// channel send/receive and at the upstream chunk await; a failed send
// means the client went away and the producer tears down.

use bytes::Bytes;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::{Stream, StreamExt};

use super::frame::{decode_frame, FrameOutcome};
use crate::upstream::UpstreamError;

/// Channel capacity between the extractor and the response body.
///
/// Capacity 1 keeps the producer at most one token ahead of the client
/// write, preserving the no-buffering-beyond-one-frame invariant.
const TOKEN_CHANNEL_CAPACITY: usize = 1;

/// Identity of the request a token stream belongs to, carried into the
/// producer task so mid-stream failures can be logged against it.
#[derive(Debug, Clone)]
pub struct StreamContext {
    pub request_id: String,
    pub patient_id: String,
}

/// Turn an upstream byte stream into an ordered stream of token fragments.
///
/// The returned stream is lazy, finite, and not restartable. It ends when
/// the upstream closes its connection; there is no end-of-stream sentinel
/// in the protocol. A mid-stream transport error truncates the stream and
/// is recorded only in logs: by the time it happens the response status
/// is already committed.
pub fn extract_tokens<S>(mut input: S, ctx: StreamContext) -> ReceiverStream<String>
where
    S: Stream<Item = Result<Bytes, UpstreamError>> + Send + Unpin + 'static,
{
    let (tx, rx) = mpsc::channel::<String>(TOKEN_CHANNEL_CAPACITY);

    tokio::spawn(async move {
        let mut line_buffer = String::new();

        while let Some(chunk) = input.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    tracing::error!(
                        request_id = %ctx.request_id,
                        patient_id = %ctx.patient_id,
                        error = %e,
                        "upstream stream failed mid-flight; response truncated"
                    );
                    return;
                }
            };

            line_buffer.push_str(&String::from_utf8_lossy(&chunk));

            if drain_lines(&mut line_buffer, &tx).await.is_err() {
                // Client disconnected. Dropping `input` here releases the
                // upstream connection.
                return;
            }
        }

        // A final line without a trailing newline still carries a frame.
        if !line_buffer.is_empty() {
            let line = std::mem::take(&mut line_buffer);
            if let FrameOutcome::Token(token) = decode_frame(line.trim_end_matches('\r')) {
                let _ = tx.send(token).await;
            }
        }

        tracing::debug!(
            request_id = %ctx.request_id,
            patient_id = %ctx.patient_id,
            "upstream stream closed"
        );
    });

    ReceiverStream::new(rx)
}

/// Drain all complete lines from the buffer, decoding and forwarding each.
///
/// Line boundary is `\n`; a preceding `\r` is stripped so CRLF streams
/// decode the same as LF streams. Returns `Err(())` when the receiver is
/// gone (client disconnect).
async fn drain_lines(line_buffer: &mut String, tx: &mpsc::Sender<String>) -> Result<(), ()> {
    loop {
        let Some(newline_pos) = line_buffer.find('\n') else {
            break;
        };
        let line = line_buffer[..newline_pos]
            .trim_end_matches('\r')
            .to_string();
        *line_buffer = line_buffer[newline_pos + 1..].to_string();

        if let FrameOutcome::Token(token) = decode_frame(&line) {
            if tx.send(token).await.is_err() {
                return Err(());
            }
        }
    }
    Ok(())
}
