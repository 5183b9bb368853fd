//! Shared handle and consumer read interface over the ring log.
//!
//! Exactly one lock protects the cursor and the contents; it is held only
//! for the copy itself, never across I/O. The writer (deferred worker) and
//! the reader (consumer interface) may run on different threads.

use std::sync::Arc;

use opentablet_device_types::OverflowPolicy;
use parking_lot::Mutex;

use crate::buffer::{AppendOutcome, RingLogBuffer, RingLogStats};

/// Cloneable handle to a lock-guarded [`RingLogBuffer`].
#[derive(Debug, Clone)]
pub struct SharedRingLog {
    inner: Arc<Mutex<RingLogBuffer>>,
}

impl SharedRingLog {
    /// Allocate the shared log. Called once at driver attach.
    pub fn with_capacity(capacity: usize, policy: OverflowPolicy) -> Self {
        Self {
            inner: Arc::new(Mutex::new(RingLogBuffer::with_capacity(capacity, policy))),
        }
    }

    /// Append one record under the lock.
    pub fn append(&self, bytes: &[u8]) -> AppendOutcome {
        self.inner.lock().append(bytes)
    }

    /// Drain up to `max` bytes under the lock.
    pub fn drain(&self, max: usize) -> Vec<u8> {
        self.inner.lock().drain(max)
    }

    /// Valid byte count at this instant.
    pub fn len(&self) -> usize {
        self.inner.lock().size()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> RingLogStats {
        self.inner.lock().stats()
    }

    /// Open a consumer read handle. Always succeeds and carries no state
    /// of its own; dropping the handle is the close operation.
    pub fn reader(&self) -> LogReader {
        LogReader { log: self.clone() }
    }
}

/// Sequential read handle for the single external consumer.
///
/// Reads drain the shared log: bytes handed out are gone. A zero-length
/// result signals "no data available right now", not end-of-stream and not
/// an error; the interface never blocks waiting for data.
#[derive(Debug, Clone)]
pub struct LogReader {
    log: SharedRingLog,
}

impl LogReader {
    /// Read and consume up to `max` bytes.
    pub fn read(&self, max: usize) -> Vec<u8> {
        self.log.drain(max)
    }

    /// Bytes currently available without consuming them.
    pub fn available(&self) -> usize {
        self.log.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reader_drains_the_shared_log() {
        let log = SharedRingLog::with_capacity(64, OverflowPolicy::ResetAll);
        log.append(b"X=120, Y=44, Pressure=30\n");

        let reader = log.reader();
        assert_eq!(reader.available(), 26);
        assert_eq!(reader.read(1024), b"X=120, Y=44, Pressure=30\n");
        assert_eq!(reader.read(1024), Vec::<u8>::new());
    }

    #[test]
    fn concurrent_append_and_drain_never_tear() {
        let log = SharedRingLog::with_capacity(4096, OverflowPolicy::DropNewest);
        let record = b"button 7 pressed\n";

        let writer = {
            let log = log.clone();
            std::thread::spawn(move || {
                for _ in 0..500 {
                    log.append(record);
                }
            })
        };

        let mut collected = Vec::new();
        let reader = log.reader();
        while !writer.is_finished() {
            collected.extend(reader.read(64));
        }
        writer.join().unwrap();
        collected.extend(reader.read(usize::MAX));

        // Every drained byte belongs to a whole-record stream: the
        // concatenation must consist of intact copies of the record.
        assert_eq!(collected.len() % record.len(), 0);
        for chunk in collected.chunks(record.len()) {
            assert_eq!(chunk, record);
        }
    }
}
