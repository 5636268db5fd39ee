//! Write-through response observation.
//!
//! [`observe`] sits between the upstream byte stream and the client: every
//! chunk is forwarded downstream first, then a copy is enqueued for a
//! per-request parser task. Client backpressure applies only to the
//! downstream channel; the parser is never on the critical path, and nothing
//! it does can alter or fail the proxied response.

use std::borrow::Cow;
use std::io::Read;
use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::mpsc;
use tracing::warn;

use crate::parser::{FamilyParser, ParseContext};
use crate::sse::SseFraming;
use crate::tracker::UsageTracker;

const DOWNSTREAM_CHANNEL_CAPACITY: usize = 32;

/// Copies accumulated for end-of-stream parsing are dropped past this point.
const MAX_COPY_BYTES: usize = 50 * 1024 * 1024;

/// Response bodies with these content types are parsed as SSE streams.
const STREAMING_CONTENT_TYPES: &[&str] = &[
    "text/event-stream",
    "application/x-ndjson",
    "application/stream+json",
];

#[derive(Debug)]
enum TeeFrame {
    Chunk(Bytes),
    /// Clean end of the upstream stream. A closed channel without this frame
    /// means the request was cancelled and the parser exits silently.
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CopyEncoding {
    Identity,
    Gzip,
    Deflate,
    Brotli,
}

fn is_streaming_content_type(content_type: Option<&str>) -> bool {
    let Some(content_type) = content_type else {
        return false;
    };
    let content_type = content_type.to_ascii_lowercase();
    STREAMING_CONTENT_TYPES
        .iter()
        .any(|candidate| content_type.contains(candidate))
}

/// `None` means the encoding is not one we can decode; parsing is disabled
/// but the bytes still flow downstream untouched.
fn classify_encoding(content_encoding: Option<&str>) -> Option<CopyEncoding> {
    let Some(encoding) = content_encoding else {
        return Some(CopyEncoding::Identity);
    };
    // For multi-encoded bodies only the first token is considered.
    let first = encoding.split(',').next().unwrap_or("").trim().to_ascii_lowercase();
    match first.as_str() {
        "" | "identity" => Some(CopyEncoding::Identity),
        "gzip" | "x-gzip" => Some(CopyEncoding::Gzip),
        "deflate" => Some(CopyEncoding::Deflate),
        "br" => Some(CopyEncoding::Brotli),
        _ => None,
    }
}

/// Wraps the upstream byte stream so a copy feeds `tracker`'s parser family.
///
/// Returns the receiver to serve to the client. Downstream bytes and their
/// ordering are byte-exact with upstream regardless of what the parser does.
pub fn observe(
    mut upstream: mpsc::Receiver<Bytes>,
    content_type: Option<&str>,
    content_encoding: Option<&str>,
    tracker: Arc<dyn UsageTracker>,
    request_id: String,
    provider: String,
) -> mpsc::Receiver<Bytes> {
    let streaming = is_streaming_content_type(content_type);
    let encoding = classify_encoding(content_encoding);
    let (tx_out, rx_out) = mpsc::channel::<Bytes>(DOWNSTREAM_CHANNEL_CAPACITY);
    let (tx_copy, rx_copy) = mpsc::unbounded_channel::<TeeFrame>();

    let parser_task = match encoding {
        Some(encoding) => {
            let ctx = ParseContext {
                request_id,
                provider,
                streaming,
            };
            Some(tokio::spawn(parse_loop(rx_copy, tracker, ctx, encoding)))
        }
        None => {
            warn!(
                request_id = %request_id,
                provider = %provider,
                content_encoding = ?content_encoding,
                "unsupported content-encoding, usage observation disabled"
            );
            None
        }
    };

    tokio::spawn(async move {
        while let Some(chunk) = upstream.recv().await {
            // Client first; a failed send means the client went away.
            if tx_out.send(chunk.clone()).await.is_err() {
                drop(tx_copy);
                if let Some(task) = parser_task {
                    let _ = task.await;
                }
                return;
            }
            let _ = tx_copy.send(TeeFrame::Chunk(chunk));
        }
        let _ = tx_copy.send(TeeFrame::End);
        drop(tx_copy);
        if let Some(task) = parser_task {
            let _ = task.await;
        }
    });

    rx_out
}

async fn parse_loop(
    mut rx: mpsc::UnboundedReceiver<TeeFrame>,
    tracker: Arc<dyn UsageTracker>,
    ctx: ParseContext,
    encoding: CopyEncoding,
) {
    let streaming = ctx.streaming;
    let incremental = streaming && encoding == CopyEncoding::Identity;
    let mut parser = FamilyParser::new(tracker.family(), ctx);
    let mut framing = SseFraming::new();
    let mut buffered: Vec<u8> = Vec::new();
    let mut overflowed = false;
    let mut ended = false;

    while let Some(frame) = rx.recv().await {
        match frame {
            TeeFrame::Chunk(chunk) => {
                if incremental {
                    for payload in framing.push(&chunk) {
                        if let Some(event) = parser.on_data(&payload) {
                            tracker.consume(event).await;
                        }
                    }
                } else if !overflowed {
                    if buffered.len() + chunk.len() > MAX_COPY_BYTES {
                        warn!("response copy exceeds size limit, usage observation disabled");
                        overflowed = true;
                        buffered.clear();
                    } else {
                        buffered.extend_from_slice(&chunk);
                    }
                }
            }
            TeeFrame::End => {
                ended = true;
                break;
            }
        }
    }
    // Cancelled mid-stream: nothing more to emit.
    if !ended {
        return;
    }

    if incremental {
        if let Some(payload) = framing.finish()
            && let Some(event) = parser.on_data(&payload)
        {
            tracker.consume(event).await;
        }
        return;
    }
    if overflowed {
        return;
    }

    let body = match decompress_copy(encoding, &buffered) {
        Ok(body) => body,
        Err(err) => {
            warn!(error = %err, "failed to decompress response copy");
            return;
        }
    };

    if streaming {
        for payload in framing.push(&body) {
            if let Some(event) = parser.on_data(&payload) {
                tracker.consume(event).await;
            }
        }
        if let Some(payload) = framing.finish()
            && let Some(event) = parser.on_data(&payload)
        {
            tracker.consume(event).await;
        }
    } else if let Some(event) = parser.on_body(&body) {
        tracker.consume(event).await;
    }
}

/// Decompresses the observer's copy only; downstream bytes are never touched.
fn decompress_copy(encoding: CopyEncoding, input: &[u8]) -> std::io::Result<Cow<'_, [u8]>> {
    match encoding {
        CopyEncoding::Identity => Ok(Cow::Borrowed(input)),
        CopyEncoding::Gzip => {
            let mut out = Vec::new();
            flate2::read::GzDecoder::new(input).read_to_end(&mut out)?;
            Ok(Cow::Owned(out))
        }
        CopyEncoding::Deflate => {
            let mut out = Vec::new();
            flate2::read::ZlibDecoder::new(input).read_to_end(&mut out)?;
            Ok(Cow::Owned(out))
        }
        CopyEncoding::Brotli => {
            let mut out = Vec::new();
            brotli_decompressor::Decompressor::new(input, 4096).read_to_end(&mut out)?;
            Ok(Cow::Owned(out))
        }
    }
}
