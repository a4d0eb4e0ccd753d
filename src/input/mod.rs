//! Background keyboard/wheel reader.
//!
//! A dedicated thread polls the raw terminal, decodes scroll keys and sends
//! [`InputEvent`]s over a FIFO channel to the render loop. The thread only
//! holds a weak reference to the device: dropping the [`InputReader`] drops
//! the last strong reference, the thread notices on its next poll and exits,
//! and the device guard restores the terminal.

pub mod decode;
pub mod tty;

pub use decode::{decode, Decoded};
pub use tty::RawTty;

use crate::model::TtyError;
use crate::pager::{geometry, ScrollEvent};
use std::io;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Weak};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Bounded wait for input on each iteration.
pub const POLL_INTERVAL: Duration = Duration::from_millis(50);
/// Maximum bytes consumed per read.
pub const READ_CHUNK: usize = 256;

/// Event sent from the reader to the render loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Move the viewport.
    Scroll(ScrollEvent),
    /// Leave the pager.
    Quit,
}

/// A pollable byte source; [`RawTty`] in production.
pub trait InputDevice: Send + Sync + 'static {
    /// Wait up to `timeout` for input.
    fn poll_readable(&self, timeout: Duration) -> io::Result<bool>;
    /// Read available bytes; `Ok(0)` when none.
    fn read(&self, buf: &mut [u8]) -> io::Result<usize>;
}

impl InputDevice for RawTty {
    fn poll_readable(&self, timeout: Duration) -> io::Result<bool> {
        RawTty::poll_readable(self, timeout)
    }

    fn read(&self, buf: &mut [u8]) -> io::Result<usize> {
        RawTty::read(self, buf)
    }
}

/// Owner of the device and the reader thread.
pub struct InputReader {
    device: Option<Arc<dyn InputDevice>>,
    handle: Option<JoinHandle<()>>,
}

impl InputReader {
    /// Open the controlling terminal and start reading.
    pub fn spawn(sender: Sender<InputEvent>) -> Result<Self, TtyError> {
        Self::start(RawTty::open()?, sender)
    }

    /// Start reading from `device`.
    pub fn start<D: InputDevice>(device: D, sender: Sender<InputEvent>) -> Result<Self, TtyError> {
        let device: Arc<dyn InputDevice> = Arc::new(device);
        let weak = Arc::downgrade(&device);
        let handle = thread::Builder::new()
            .name("claude-pager-input".to_string())
            .spawn(move || read_loop(weak, sender))
            .map_err(TtyError::Spawn)?;
        tracing::info!("Input reader started");
        Ok(Self {
            device: Some(device),
            handle: Some(handle),
        })
    }

    /// Release the device and wait for the thread to finish.
    pub fn shutdown(&mut self) {
        self.device.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!("Input reader thread panicked");
            }
            tracing::info!("Input reader stopped");
        }
    }
}

impl Drop for InputReader {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn read_loop(device: Weak<dyn InputDevice>, sender: Sender<InputEvent>) {
    let mut pending: Vec<u8> = Vec::new();
    let mut buf = [0u8; READ_CHUNK];

    while let Some(device) = device.upgrade() {
        match device.poll_readable(POLL_INTERVAL) {
            Ok(true) => {}
            Ok(false) => continue,
            Err(e) => {
                tracing::warn!(error = %e, "Input device poll failed, stopping reader");
                return;
            }
        }

        let n = match device.read(&mut buf) {
            Ok(0) => continue,
            Ok(n) => n,
            Err(e) => {
                tracing::warn!(error = %e, "Input device read failed, stopping reader");
                return;
            }
        };

        pending.extend_from_slice(&buf[..n]);
        let decoded = decode(&pending, geometry().content_rows);
        pending = decoded.remainder;

        for event in decoded.events {
            if sender.send(event).is_err() {
                tracing::debug!("Event receiver gone, stopping reader");
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::mpsc;
    use std::sync::Mutex;

    /// Replays scripted chunks, then reports no input.
    struct ScriptedDevice {
        chunks: Mutex<VecDeque<Vec<u8>>>,
        dropped: Arc<AtomicBool>,
    }

    impl ScriptedDevice {
        fn new(chunks: &[&[u8]], dropped: Arc<AtomicBool>) -> Self {
            Self {
                chunks: Mutex::new(chunks.iter().map(|c| c.to_vec()).collect()),
                dropped,
            }
        }
    }

    impl InputDevice for ScriptedDevice {
        fn poll_readable(&self, timeout: Duration) -> io::Result<bool> {
            if self.chunks.lock().unwrap().is_empty() {
                thread::sleep(timeout.min(Duration::from_millis(5)));
                return Ok(false);
            }
            Ok(true)
        }

        fn read(&self, buf: &mut [u8]) -> io::Result<usize> {
            let Some(chunk) = self.chunks.lock().unwrap().pop_front() else {
                return Ok(0);
            };
            buf[..chunk.len()].copy_from_slice(&chunk);
            Ok(chunk.len())
        }
    }

    impl Drop for ScriptedDevice {
        fn drop(&mut self) {
            self.dropped.store(true, Ordering::SeqCst);
        }
    }

    struct FailingDevice;

    impl InputDevice for FailingDevice {
        fn poll_readable(&self, _timeout: Duration) -> io::Result<bool> {
            Err(io::Error::other("gone"))
        }

        fn read(&self, _buf: &mut [u8]) -> io::Result<usize> {
            Ok(0)
        }
    }

    fn recv(rx: &mpsc::Receiver<InputEvent>) -> InputEvent {
        rx.recv_timeout(Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn events_arrive_in_order() {
        let (tx, rx) = mpsc::channel();
        let dropped = Arc::new(AtomicBool::new(false));
        let device = ScriptedDevice::new(&[b"\x1b[A", b"\x1b[B\x1b[B", b"\x1b[H"], dropped);
        let _reader = InputReader::start(device, tx).unwrap();

        assert_eq!(recv(&rx), InputEvent::Scroll(ScrollEvent::Delta(-1)));
        assert_eq!(recv(&rx), InputEvent::Scroll(ScrollEvent::Delta(2)));
        assert_eq!(recv(&rx), InputEvent::Scroll(ScrollEvent::Top));
    }

    #[test]
    fn sequences_split_across_reads_are_reassembled() {
        let (tx, rx) = mpsc::channel();
        let dropped = Arc::new(AtomicBool::new(false));
        let device = ScriptedDevice::new(&[b"\x1b[", b"F"], dropped);
        let _reader = InputReader::start(device, tx).unwrap();

        assert_eq!(recv(&rx), InputEvent::Scroll(ScrollEvent::Bottom));
    }

    #[test]
    fn shutdown_releases_device_exactly_once() {
        let (tx, _rx) = mpsc::channel();
        let dropped = Arc::new(AtomicBool::new(false));
        let device = ScriptedDevice::new(&[], Arc::clone(&dropped));
        let mut reader = InputReader::start(device, tx).unwrap();

        reader.shutdown();
        assert!(dropped.load(Ordering::SeqCst));
        reader.shutdown();
    }

    #[test]
    fn device_error_stops_the_thread() {
        let (tx, rx) = mpsc::channel();
        let mut reader = InputReader::start(FailingDevice, tx).unwrap();
        // The sender is dropped when the thread exits.
        assert!(rx.recv_timeout(Duration::from_secs(5)).is_err());
        reader.shutdown();
    }
}
