//! Property-based tests for ring log invariants.

use opentablet_device_types::OverflowPolicy;
use opentablet_ringlog::{AppendOutcome, RingLogBuffer};
use proptest::prelude::*;

proptest! {
    // `reset_leaves_only_new_record` filters most generated inputs with
    // `prop_assume!`; the default global reject limit (1024) aborts the run
    // before enough cases pass.
    #![proptest_config(ProptestConfig {
        max_global_rejects: 65536,
        ..ProptestConfig::default()
    })]

    /// `size` never exceeds capacity, for any append sequence and policy.
    #[test]
    fn size_bounded_by_capacity(
        capacity in 1usize..256,
        records in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..64), 0..50),
        policy_idx in 0u8..3,
    ) {
        let policy = match policy_idx {
            0 => OverflowPolicy::ResetAll,
            1 => OverflowPolicy::DropNewest,
            _ => OverflowPolicy::TruncateToFit,
        };
        let mut log = RingLogBuffer::with_capacity(capacity, policy);
        for record in &records {
            log.append(record);
            prop_assert!(log.size() <= capacity);
        }
    }

    /// Without overflow, drains return disjoint, order-preserving slices of
    /// exactly what was written: no byte duplicated or skipped.
    #[test]
    fn drain_is_disjoint_and_lossless(
        records in prop::collection::vec(prop::collection::vec(any::<u8>(), 1..16), 1..20),
        drain_sizes in prop::collection::vec(0usize..32, 0..40),
    ) {
        let total: usize = records.iter().map(Vec::len).sum();
        let mut log = RingLogBuffer::with_capacity(total, OverflowPolicy::DropNewest);

        let mut written = Vec::new();
        for record in &records {
            prop_assert_eq!(log.append(record), AppendOutcome::Stored);
            written.extend_from_slice(record);
        }

        let mut drained = Vec::new();
        for n in drain_sizes {
            let chunk = log.drain(n);
            prop_assert!(chunk.len() <= n);
            drained.extend(chunk);
        }
        drained.extend(log.drain(total));

        prop_assert_eq!(drained, written);
        prop_assert_eq!(log.size(), 0);
    }

    /// Round trip: appending R then draining `len(R)` yields exactly R when
    /// no overflow occurs.
    #[test]
    fn append_drain_round_trip(record in prop::collection::vec(any::<u8>(), 1..128)) {
        let mut log = RingLogBuffer::with_capacity(record.len(), OverflowPolicy::ResetAll);
        prop_assert_eq!(log.append(&record), AppendOutcome::Stored);
        prop_assert_eq!(log.drain(record.len()), record);
    }

    /// ResetAll: an overflowing append of a record that fits in an empty
    /// buffer leaves exactly that record.
    #[test]
    fn reset_leaves_only_new_record(
        capacity in 1usize..64,
        fill in prop::collection::vec(any::<u8>(), 1..64),
        record in prop::collection::vec(any::<u8>(), 1..64),
    ) {
        prop_assume!(record.len() <= capacity);
        let mut log = RingLogBuffer::with_capacity(capacity, OverflowPolicy::ResetAll);
        log.append(&fill);
        prop_assume!(log.size() + record.len() > capacity);

        prop_assert_eq!(log.append(&record), AppendOutcome::StoredAfterReset);
        prop_assert_eq!(log.size(), record.len());
        prop_assert_eq!(log.drain(capacity), record);
    }
}
