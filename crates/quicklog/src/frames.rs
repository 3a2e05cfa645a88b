//! Frame streams
//!
//! Animated messages publish rendered frames over rendezvous channels: a
//! producer blocks until a consumer takes the frame, so at most one unread
//! frame is ever in flight. A stream ends once every sender is dropped.
//!
//! [`Frames`] is the consuming side. It can be cloned; clones share the
//! underlying receiver and each frame is delivered to exactly one of them.

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender, TryRecvError, TrySendError};
use std::time::Duration;

/// Create a rendezvous channel for frames.
pub fn channel<T>() -> (SyncSender<T>, Frames<T>) {
    let (sender, receiver) = mpsc::sync_channel(0);
    (sender, Frames::new(receiver))
}

/// A stream that is already finished.
pub fn finished<T>() -> Frames<T> {
    let (_, frames) = channel();
    frames
}

/// Consuming side of a frame channel.
pub struct Frames<T> {
    receiver: Arc<Mutex<Receiver<T>>>,
}

impl<T> Frames<T> {
    fn new(receiver: Receiver<T>) -> Self {
        Self {
            receiver: Arc::new(Mutex::new(receiver)),
        }
    }

    /// Block until the next frame. Returns `None` once the stream has ended.
    pub fn recv(&self) -> Option<T> {
        self.receiver.lock().recv().ok()
    }

    /// Wait at most `timeout` for the next frame.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<T, RecvTimeoutError> {
        self.receiver.lock().recv_timeout(timeout)
    }

    /// Take a frame only if a producer is already waiting to hand one over.
    pub fn try_recv(&self) -> Result<T, TryRecvError> {
        self.receiver.lock().try_recv()
    }
}

impl<T> Clone for Frames<T> {
    fn clone(&self) -> Self {
        Self {
            receiver: Arc::clone(&self.receiver),
        }
    }
}

impl<T> fmt::Debug for Frames<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frames").finish_non_exhaustive()
    }
}

impl<T> Iterator for Frames<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.recv()
    }
}

/// Hand `value` over without blocking indefinitely.
///
/// The frame is offered repeatedly; between attempts `wait` is called and
/// should pause briefly, returning `false` to give up. Returns whether the
/// frame was delivered.
pub(crate) fn offer<T>(sender: &SyncSender<T>, mut value: T, mut wait: impl FnMut() -> bool) -> bool {
    loop {
        match sender.try_send(value) {
            Ok(()) => return true,
            Err(TrySendError::Disconnected(_)) => return false,
            Err(TrySendError::Full(rejected)) => {
                if !wait() {
                    return false;
                }
                value = rejected;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_frames_in_order_then_end() {
        let (sender, frames) = channel();

        let producer = thread::spawn(move || {
            for i in 0..3 {
                sender.send(i).unwrap();
            }
        });

        let received: Vec<i32> = frames.collect();
        producer.join().unwrap();
        assert_eq!(received, vec![0, 1, 2]);
    }

    #[test]
    fn test_finished_stream() {
        let frames = finished::<String>();
        assert_eq!(frames.recv(), None);
    }

    #[test]
    fn test_clones_share_receiver() {
        let (sender, frames) = channel();
        let other = frames.clone();

        let producer = thread::spawn(move || {
            sender.send("a").unwrap();
            sender.send("b").unwrap();
        });

        assert_eq!(frames.recv(), Some("a"));
        assert_eq!(other.recv(), Some("b"));
        producer.join().unwrap();
        assert_eq!(other.recv(), None);
    }

    #[test]
    fn test_offer_gives_up_without_consumer() {
        let (sender, _frames) = channel();
        let mut attempts = 0;
        let delivered = offer(&sender, 1, || {
            attempts += 1;
            attempts < 3
        });
        assert!(!delivered);
        assert_eq!(attempts, 3);
    }

    #[test]
    fn test_offer_delivers_to_waiting_consumer() {
        let (sender, frames) = channel();
        let consumer = thread::spawn(move || frames.recv());

        let delivered = offer(&sender, 7, || {
            thread::sleep(Duration::from_millis(1));
            true
        });

        assert!(delivered);
        assert_eq!(consumer.join().unwrap(), Some(7));
    }

    #[test]
    fn test_offer_stops_on_disconnect() {
        let (sender, frames) = channel::<i32>();
        drop(frames);
        assert!(!offer(&sender, 1, || true));
    }
}
