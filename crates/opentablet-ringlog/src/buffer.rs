//! The ring log buffer proper: fixed capacity, append at the tail,
//! drain from the head.

use opentablet_device_types::OverflowPolicy;

/// What happened to an appended record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// Record stored intact.
    Stored,
    /// All unread data was discarded first, then the record stored
    /// ([`OverflowPolicy::ResetAll`]).
    StoredAfterReset,
    /// Record dropped; prior data kept ([`OverflowPolicy::DropNewest`], or
    /// a record larger than the whole capacity).
    DroppedRecord,
    /// Leading bytes stored, the rest cut ([`OverflowPolicy::TruncateToFit`]).
    Truncated {
        /// Bytes actually stored
        stored: usize,
    },
}

/// Counters snapshot for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RingLogStats {
    pub size: usize,
    pub capacity: usize,
    pub overflow_resets: u64,
    pub dropped_records: u64,
    pub truncated_records: u64,
}

/// Fixed-capacity byte buffer holding not-yet-drained log records.
///
/// Invariant: `0 <= size <= capacity`; bytes `[0, size)` hold valid data in
/// append order, bytes `[size, capacity)` are undefined.
#[derive(Debug)]
pub struct RingLogBuffer {
    buf: Vec<u8>,
    size: usize,
    policy: OverflowPolicy,
    overflow_resets: u64,
    dropped_records: u64,
    truncated_records: u64,
}

impl RingLogBuffer {
    /// Allocate a buffer of `capacity` bytes with the given overflow policy.
    ///
    /// All allocation happens here; `append` and `drain` never grow the
    /// backing storage.
    pub fn with_capacity(capacity: usize, policy: OverflowPolicy) -> Self {
        Self {
            buf: vec![0; capacity],
            size: 0,
            policy,
            overflow_resets: 0,
            dropped_records: 0,
            truncated_records: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Valid (appended, not yet drained) byte count.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn policy(&self) -> OverflowPolicy {
        self.policy
    }

    pub fn stats(&self) -> RingLogStats {
        RingLogStats {
            size: self.size,
            capacity: self.capacity(),
            overflow_resets: self.overflow_resets,
            dropped_records: self.dropped_records,
            truncated_records: self.truncated_records,
        }
    }

    /// Append one record, applying the overflow policy when it does not fit.
    ///
    /// Overflow is never an error to the writer; the outcome reports which
    /// policy action was taken.
    pub fn append(&mut self, bytes: &[u8]) -> AppendOutcome {
        if bytes.is_empty() {
            return AppendOutcome::Stored;
        }
        if self.fits(bytes.len()) {
            self.copy_at_tail(bytes);
            return AppendOutcome::Stored;
        }

        match self.policy {
            OverflowPolicy::ResetAll => {
                self.size = 0;
                self.overflow_resets = self.overflow_resets.saturating_add(1);
                if bytes.len() > self.capacity() {
                    // Still cannot fit after discarding everything.
                    self.dropped_records = self.dropped_records.saturating_add(1);
                    AppendOutcome::DroppedRecord
                } else {
                    self.copy_at_tail(bytes);
                    AppendOutcome::StoredAfterReset
                }
            }
            OverflowPolicy::DropNewest => {
                self.dropped_records = self.dropped_records.saturating_add(1);
                AppendOutcome::DroppedRecord
            }
            OverflowPolicy::TruncateToFit => {
                let room = self.capacity() - self.size;
                let (head, _) = bytes.split_at(room);
                self.copy_at_tail(head);
                self.truncated_records = self.truncated_records.saturating_add(1);
                AppendOutcome::Truncated { stored: room }
            }
        }
    }

    /// Remove and return up to `max` bytes from the head of the buffer.
    ///
    /// Returns `min(max, size)` bytes; an empty result means no data is
    /// available, which is not an error.
    pub fn drain(&mut self, max: usize) -> Vec<u8> {
        let n = max.min(self.size);
        if n == 0 {
            return Vec::new();
        }
        let out = self.buf.get(..n).map(<[u8]>::to_vec).unwrap_or_default();
        self.buf.copy_within(n..self.size, 0);
        self.size -= n;
        out
    }

    fn fits(&self, len: usize) -> bool {
        len <= self.capacity() - self.size
    }

    /// Caller must have checked `fits(bytes.len())`.
    fn copy_at_tail(&mut self, bytes: &[u8]) {
        let end = self.size + bytes.len();
        if let Some(dst) = self.buf.get_mut(self.size..end) {
            dst.copy_from_slice(bytes);
            self.size = end;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORD: &[u8] = b"button 1 pressed\n";

    #[test]
    fn append_then_drain_round_trips() {
        let mut log = RingLogBuffer::with_capacity(64, OverflowPolicy::ResetAll);
        assert_eq!(log.append(RECORD), AppendOutcome::Stored);
        assert_eq!(log.drain(RECORD.len()), RECORD);
        assert!(log.is_empty());
    }

    #[test]
    fn sequential_appends_drain_in_order() {
        // Three 18-byte records, then a 20-byte drain spanning a record
        // boundary.
        let record = b"button 1 pressed!\n";
        assert_eq!(record.len(), 18);

        let mut log = RingLogBuffer::with_capacity(1024, OverflowPolicy::ResetAll);
        for _ in 0..3 {
            assert_eq!(log.append(record), AppendOutcome::Stored);
        }
        assert_eq!(log.size(), 54);

        let chunk = log.drain(20);
        assert_eq!(&chunk[..18], record);
        assert_eq!(&chunk[18..], &record[..2]);
        assert_eq!(log.size(), 34);
    }

    #[test]
    fn reset_policy_discards_prior_data() {
        let mut log = RingLogBuffer::with_capacity(20, OverflowPolicy::ResetAll);
        assert_eq!(log.append(&[0xAA; 15]), AppendOutcome::Stored);
        assert_eq!(log.size(), 15);

        assert_eq!(log.append(&[0xBB; 10]), AppendOutcome::StoredAfterReset);
        assert_eq!(log.size(), 10);
        assert_eq!(log.drain(20), vec![0xBB; 10]);
        assert_eq!(log.stats().overflow_resets, 1);
    }

    #[test]
    fn drop_newest_keeps_prior_data() {
        let mut log = RingLogBuffer::with_capacity(20, OverflowPolicy::DropNewest);
        log.append(&[0xAA; 15]);
        assert_eq!(log.append(&[0xBB; 10]), AppendOutcome::DroppedRecord);
        assert_eq!(log.size(), 15);
        assert_eq!(log.drain(20), vec![0xAA; 15]);
        assert_eq!(log.stats().dropped_records, 1);
    }

    #[test]
    fn truncate_policy_stores_what_fits() {
        let mut log = RingLogBuffer::with_capacity(20, OverflowPolicy::TruncateToFit);
        log.append(&[0xAA; 15]);
        assert_eq!(log.append(&[0xBB; 10]), AppendOutcome::Truncated { stored: 5 });
        assert_eq!(log.size(), 20);

        let drained = log.drain(20);
        assert_eq!(&drained[..15], &[0xAA; 15]);
        assert_eq!(&drained[15..], &[0xBB; 5]);
    }

    #[test]
    fn oversized_record_is_dropped_even_after_reset() {
        let mut log = RingLogBuffer::with_capacity(8, OverflowPolicy::ResetAll);
        log.append(&[0x01; 4]);
        assert_eq!(log.append(&[0x02; 9]), AppendOutcome::DroppedRecord);
        assert!(log.is_empty());
        let stats = log.stats();
        assert_eq!(stats.overflow_resets, 1);
        assert_eq!(stats.dropped_records, 1);
    }

    #[test]
    fn drain_on_empty_returns_nothing() {
        let mut log = RingLogBuffer::with_capacity(16, OverflowPolicy::ResetAll);
        assert!(log.drain(100).is_empty());
        assert!(log.drain(0).is_empty());
    }

    #[test]
    fn size_never_exceeds_capacity() {
        let mut log = RingLogBuffer::with_capacity(32, OverflowPolicy::ResetAll);
        for i in 0..100 {
            log.append(&[i as u8; 7]);
            assert!(log.size() <= log.capacity());
        }
    }
}
