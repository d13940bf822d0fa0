//! Incremental decoding of CRLF-delimited record streams.
//!
//! The live endpoints send one JSON object per line, terminated by `\r\n`
//! and only `\r\n`; a bare LF or CR inside a line is content. The server
//! also sends periodic empty keep-alive lines, which are absorbed here and
//! never surfaced as records.

use std::collections::VecDeque;
use std::marker::PhantomData;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::client::ByteStream;
use crate::error::{Error, ErrorKind, Result};
use crate::response::decode_stream_record;

/// What to do with a line that fails to decode as a record.
///
/// The upstream contract does not pin this down, so it is an explicit caller
/// choice rather than a hard-coded behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedRecordPolicy {
    /// Yield the decode error as one iteration step; the stream keeps
    /// running and the next poll resumes with the following record.
    #[default]
    Propagate,
    /// Log at warn level and drop the line.
    Skip,
}

/// Byte-level CRLF framing state machine.
///
/// Feed it chunks as they arrive; completed records come out as raw bytes.
/// Rules:
/// - `\r\n` terminates a record; an empty record is suppressed (keep-alive)
/// - a `\r` followed by anything else is content, along with the next byte
/// - a `\r` that ends the stream is content of the final record
/// - end of stream flushes a non-empty buffer as one final record
#[derive(Debug, Default)]
pub struct LineDecoder {
    buf: Vec<u8>,
    pending_cr: bool,
}

impl LineDecoder {
    /// Create an empty decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one chunk, pushing any completed records onto `out`.
    pub fn feed(&mut self, chunk: &[u8], out: &mut VecDeque<Vec<u8>>) {
        for &byte in chunk {
            if self.pending_cr {
                self.pending_cr = false;
                if byte == b'\n' {
                    if !self.buf.is_empty() {
                        out.push_back(std::mem::take(&mut self.buf));
                    }
                } else {
                    // Bare CR is not a terminator: both it and the byte we
                    // peeked at are ordinary content.
                    self.buf.push(b'\r');
                    self.buf.push(byte);
                }
            } else if byte == b'\r' {
                // Defer until the next byte (possibly in the next chunk)
                // tells us whether this is a terminator.
                self.pending_cr = true;
            } else {
                self.buf.push(byte);
            }
        }
    }

    /// Signal end of stream, returning the final record if one remains.
    /// A lone trailing CR belongs to that record; an empty buffer yields
    /// nothing; a trailing empty record is never synthesized.
    pub fn finish(&mut self) -> Option<Vec<u8>> {
        if self.pending_cr {
            self.pending_cr = false;
            self.buf.push(b'\r');
        }
        if self.buf.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.buf))
        }
    }
}

/// A lazy, potentially infinite sequence of typed records decoded from a
/// transport byte stream.
///
/// Each `next()` suspends until another record is assembled or the stream
/// ends or errors; backpressure is implicit since no bytes are requested
/// while the consumer is not polling. Dropping the stream drops the
/// underlying connection, so aborting consumption releases the socket
/// promptly. Not reusable after exhaustion.
pub struct RecordStream<T> {
    source: ByteStream,
    decoder: LineDecoder,
    ready: VecDeque<Vec<u8>>,
    policy: MalformedRecordPolicy,
    done: bool,
    _record: PhantomData<fn() -> T>,
}

impl<T> RecordStream<T> {
    /// Wrap a byte stream with the given malformed-record policy.
    pub fn new(source: ByteStream, policy: MalformedRecordPolicy) -> Self {
        Self {
            source,
            decoder: LineDecoder::new(),
            ready: VecDeque::new(),
            policy,
            done: false,
            _record: PhantomData,
        }
    }
}

impl<T> Unpin for RecordStream<T> {}

impl<T> std::fmt::Debug for RecordStream<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The source stream is an opaque boxed trait object.
        f.debug_struct("RecordStream")
            .field("decoder", &self.decoder)
            .field("buffered", &self.ready.len())
            .field("policy", &self.policy)
            .field("done", &self.done)
            .finish()
    }
}

impl<T: DeserializeOwned> Stream for RecordStream<T> {
    type Item = Result<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        loop {
            while let Some(line) = this.ready.pop_front() {
                match decode_stream_record::<T>(&line) {
                    Ok(record) => return Poll::Ready(Some(Ok(record))),
                    // A line that parses as the structured error shape is a
                    // server-sent stream error event, not a malformed line.
                    Err(err) if err.api_errors().is_some() => {
                        return Poll::Ready(Some(Err(err)));
                    }
                    Err(err) => match this.policy {
                        MalformedRecordPolicy::Propagate => {
                            let wrapped = Error::with_source(
                                ErrorKind::StreamRecord(err.kind.to_string()),
                                err,
                            );
                            return Poll::Ready(Some(Err(wrapped)));
                        }
                        MalformedRecordPolicy::Skip => {
                            warn!(error = %err, "skipping malformed stream record");
                        }
                    },
                }
            }

            if this.done {
                return Poll::Ready(None);
            }

            match Pin::new(&mut this.source).poll_next(cx) {
                Poll::Ready(Some(Ok(chunk))) => {
                    this.decoder.feed(&chunk, &mut this.ready);
                }
                Poll::Ready(Some(Err(err))) => {
                    // Transport failure ends the stream after surfacing it.
                    this.done = true;
                    return Poll::Ready(Some(Err(err)));
                }
                Poll::Ready(None) => {
                    this.done = true;
                    if let Some(last) = this.decoder.finish() {
                        this.ready.push_back(last);
                    }
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
