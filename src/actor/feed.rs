//! Feed Actor: Dedicated thread that decodes an event feed.
//!
//! The feed is newline-delimited JSON, one `{"event": ..., "data": ...}`
//! record per line. Decoded events are forwarded over a crossbeam channel so
//! the logger never blocks on I/O parsing.

use super::messages::{ChannelEvent, LogEntry, StateSnapshot};
use crate::error::{Error, Result};
use crossbeam_channel::Sender;
use serde::Deserialize;
use serde_json::Value;
use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Feed actor that reads event records from a reader.
pub struct FeedActor {
    /// Handle to the feed thread.
    handle: Option<JoinHandle<()>>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
}

/// Raw record as it appears on the wire.
#[derive(Deserialize)]
struct Record {
    event: String,
    #[serde(default)]
    data: Value,
}

/// Decode one feed line into a channel event.
pub fn decode_record(line: &str) -> Result<ChannelEvent> {
    let record: Record = serde_json::from_str(line)?;

    let event = match record.event.as_str() {
        "state" => ChannelEvent::State(StateSnapshot::deserialize(record.data)?),
        "logs" => ChannelEvent::Logs(LogEntry::deserialize(record.data)?),
        "backend" => ChannelEvent::Backend,
        "error" => ChannelEvent::TransportError(match record.data {
            Value::String(detail) => detail,
            Value::Null => String::new(),
            other => other.to_string(),
        }),
        _ => return Err(Error::UnknownEvent(record.event)),
    };

    Ok(event)
}

impl FeedActor {
    /// Spawn the feed actor thread.
    ///
    /// # Arguments
    ///
    /// * `reader` - Source of newline-delimited records.
    /// * `sender` - Channel to forward decoded events to.
    ///
    /// The sender is dropped when the reader is exhausted, which closes the
    /// channel for the receiving side.
    pub fn spawn<R>(reader: R, sender: Sender<ChannelEvent>) -> Result<Self>
    where
        R: BufRead + Send + 'static,
    {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        let handle = thread::Builder::new()
            .name("buildtail-feed".to_string())
            .spawn(move || {
                Self::run_loop(reader, &sender, &shutdown_clone);
            })
            .map_err(Error::Spawn)?;

        Ok(Self {
            handle: Some(handle),
            shutdown,
        })
    }

    /// Signal the feed thread to stop at the next record.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Wait for the feed thread to finish.
    ///
    /// A thread blocked on a read only exits once the read returns.
    pub fn join(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Main feed loop.
    fn run_loop<R: BufRead>(reader: R, sender: &Sender<ChannelEvent>, shutdown: &AtomicBool) {
        for (index, line) in reader.lines().enumerate() {
            if shutdown.load(Ordering::Relaxed) {
                break;
            }

            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    let _ = sender.send(ChannelEvent::TransportError(e.to_string()));
                    break;
                }
            };

            if line.trim().is_empty() {
                continue;
            }

            match decode_record(&line) {
                Ok(event) => {
                    if sender.send(event).is_err() {
                        // Receiver dropped, exit
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!(line = index + 1, error = %e, "skipping feed record");
                }
            }
        }

        tracing::debug!("feed reader finished");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;
    use std::io::{self, Cursor, Read};

    #[test]
    fn test_decode_state_record() {
        let event = decode_record(r#"{"event":"state","data":{"id":"dpl_1"}}"#).unwrap();
        assert_eq!(event, ChannelEvent::State(StateSnapshot::found("dpl_1")));
    }

    #[test]
    fn test_decode_logs_record() {
        let event =
            decode_record(r#"{"event":"logs","data":{"type":"stderr","data":"warn: x"}}"#).unwrap();
        assert_eq!(event, ChannelEvent::Logs(LogEntry::stderr("warn: x")));
    }

    #[test]
    fn test_decode_backend_without_data() {
        assert_eq!(decode_record(r#"{"event":"backend"}"#).unwrap(), ChannelEvent::Backend);
        assert_eq!(
            decode_record(r#"{"event":"backend","data":{"url":"x"}}"#).unwrap(),
            ChannelEvent::Backend
        );
    }

    #[test]
    fn test_decode_error_detail() {
        assert_eq!(
            decode_record(r#"{"event":"error","data":"xhr poll error"}"#).unwrap(),
            ChannelEvent::TransportError("xhr poll error".to_string())
        );
        assert_eq!(
            decode_record(r#"{"event":"error","data":{"code":1}}"#).unwrap(),
            ChannelEvent::TransportError(r#"{"code":1}"#.to_string())
        );
    }

    #[test]
    fn test_decode_unknown_event() {
        let err = decode_record(r#"{"event":"ping"}"#).unwrap_err();
        assert!(matches!(err, Error::UnknownEvent(name) if name == "ping"));
    }

    #[test]
    fn test_decode_malformed_json() {
        assert!(matches!(decode_record("{not json"), Err(Error::Decode(_))));
        assert!(matches!(
            decode_record(r#"{"event":"logs","data":{"data":"no type"}}"#),
            Err(Error::Decode(_))
        ));
    }

    #[test]
    fn test_feed_forwards_events_and_skips_bad_lines() {
        let input = concat!(
            "{\"event\":\"logs\",\"data\":{\"type\":\"stdout\",\"data\":\"a\"}}\n",
            "\n",
            "garbage\n",
            "{\"event\":\"backend\"}\n",
        );
        let (tx, rx) = unbounded();
        let _feed = FeedActor::spawn(Cursor::new(input), tx).unwrap();

        // The channel closes once the reader is exhausted.
        let events: Vec<_> = rx.iter().collect();
        assert_eq!(
            events,
            [ChannelEvent::Logs(LogEntry::stdout("a")), ChannelEvent::Backend]
        );
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "connection reset"))
        }
    }

    #[test]
    fn test_feed_read_error_becomes_transport_error() {
        let (tx, rx) = unbounded();
        let _feed = FeedActor::spawn(io::BufReader::new(FailingReader), tx).unwrap();

        let events: Vec<_> = rx.iter().collect();
        assert_eq!(
            events,
            [ChannelEvent::TransportError("connection reset".to_string())]
        );
    }
}
