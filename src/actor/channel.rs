//! Channel: the subscription a logger reads deployment events from.

use super::feed::FeedActor;
use super::messages::ChannelEvent;
use crate::error::Result;
use crossbeam_channel::{bounded, Receiver, Sender};
use std::io::BufRead;

/// A deployment event stream for one host.
pub trait Channel {
    /// Block until the next event. `None` means the stream ended.
    fn recv(&mut self) -> Option<ChannelEvent>;

    /// Release the subscription. Later `recv` calls return `None`.
    fn disconnect(&mut self);
}

/// Channel backed by a crossbeam receiver.
///
/// Events can come from any producer holding the matching [`Sender`], or
/// from a [`FeedActor`] reading records from a stream.
pub struct ChannelHandle {
    /// Inbound events.
    receiver: Receiver<ChannelEvent>,
    /// Reader thread feeding `receiver`, if any.
    feed: Option<FeedActor>,
    /// Cleared by `disconnect`.
    connected: bool,
}

impl ChannelHandle {
    /// Create a channel with a bounded queue, returning the producer side.
    pub fn bounded(capacity: usize) -> (Sender<ChannelEvent>, Self) {
        let (tx, rx) = bounded(capacity);
        (tx, Self::from_receiver(rx))
    }

    /// Wrap an existing receiver.
    pub const fn from_receiver(receiver: Receiver<ChannelEvent>) -> Self {
        Self {
            receiver,
            feed: None,
            connected: true,
        }
    }

    /// Spawn a feed actor over `reader` and subscribe to it.
    pub fn from_reader<R>(reader: R) -> Result<Self>
    where
        R: BufRead + Send + 'static,
    {
        let (tx, rx) = bounded(64);
        let feed = FeedActor::spawn(reader, tx)?;
        Ok(Self {
            receiver: rx,
            feed: Some(feed),
            connected: true,
        })
    }

    /// Check whether the subscription is still held.
    pub const fn is_connected(&self) -> bool {
        self.connected
    }
}

impl Channel for ChannelHandle {
    fn recv(&mut self) -> Option<ChannelEvent> {
        if !self.connected {
            return None;
        }
        self.receiver.recv().ok()
    }

    fn disconnect(&mut self) {
        self.connected = false;
        if let Some(feed) = &self.feed {
            feed.shutdown();
        }
    }
}

impl Drop for ChannelHandle {
    fn drop(&mut self) {
        // The feed thread may be parked in a blocking read; signal it and
        // let it exit on its own instead of joining.
        if let Some(feed) = &self.feed {
            feed.shutdown();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::messages::LogEntry;
    use std::io::Cursor;

    #[test]
    fn test_bounded_delivers_in_order() {
        let (tx, mut channel) = ChannelHandle::bounded(4);
        tx.send(ChannelEvent::Logs(LogEntry::stdout("one"))).unwrap();
        tx.send(ChannelEvent::Backend).unwrap();
        drop(tx);

        assert_eq!(channel.recv(), Some(ChannelEvent::Logs(LogEntry::stdout("one"))));
        assert_eq!(channel.recv(), Some(ChannelEvent::Backend));
        assert_eq!(channel.recv(), None);
    }

    #[test]
    fn test_disconnect_stops_delivery() {
        let (tx, mut channel) = ChannelHandle::bounded(4);
        tx.send(ChannelEvent::Backend).unwrap();

        channel.disconnect();
        assert!(!channel.is_connected());
        assert_eq!(channel.recv(), None);
    }

    #[test]
    fn test_from_reader_ends_with_input() {
        let input = "{\"event\":\"logs\",\"data\":{\"type\":\"command\",\"data\":\"npm i\"}}\n";
        let mut channel = ChannelHandle::from_reader(Cursor::new(input)).unwrap();

        assert_eq!(channel.recv(), Some(ChannelEvent::Logs(LogEntry::command("npm i"))));
        assert_eq!(channel.recv(), None);
    }
}
