//! Deferred batching: the mechanism that lets a connection coalesce many
//! entity updates produced within one `batch_delay` window into as few
//! outbound frames as possible, instead of one frame per update.
//!
//! A `Creator` is deliberately not `Box<dyn FnMut>`: entity info/state
//! messages are encoded once, eagerly, at push time (their snapshot is
//! already known then, so there's nothing to gain from deferring it) and
//! stored as plain bytes; log lines are the one case that benefits from
//! deferring encoding to flush time, and do so via a captured `String` plus
//! a plain function pointer rather than a boxed closure.

use std::ops::Sub;
use std::time::Duration;

use crate::entity::EntityId;

/// `MAX_PACKET_SIZE` stays below a typical 1420-byte IPv6 payload window so
/// a batched write never fragments at the IP layer.
pub const MAX_PACKET_SIZE: u16 = 1390;

/// Encodes one item into `buf` at its current tail, using at most
/// `remaining` bytes of frame budget. Returns the number of bytes written
/// (0 means "would not fit", and `buf` is left untouched).
#[derive(Clone, Debug)]
pub enum Creator {
    /// Already-encoded payload, built from the entity's snapshot at push
    /// time.
    Encoded(Vec<u8>),
    /// A captured line plus the function that renders it into `buf`,
    /// deferred to flush time.
    StringCapture(String, fn(&str, &mut Vec<u8>, u16) -> usize),
}

impl Creator {
    /// `remaining` is the raw frame budget; `header_padding`/`footer_size`
    /// are the framed overhead that must also fit inside it, matching the
    /// upstream `encode_message_to_buffer`'s
    /// `calculated_size + header_padding + footer_size > remaining_size`
    /// check. The returned count is the payload bytes written (excluding
    /// overhead), since `buf` holds only concatenated payloads.
    fn invoke(&self, buf: &mut Vec<u8>, remaining: u16, header_padding: usize, footer_size: usize) -> usize {
        let overhead = header_padding + footer_size;
        if overhead > remaining as usize {
            return 0;
        }
        let budget = remaining - overhead as u16;
        match self {
            Creator::Encoded(bytes) => {
                if bytes.len() > budget as usize {
                    return 0;
                }
                buf.extend_from_slice(bytes);
                bytes.len()
            }
            Creator::StringCapture(s, f) => f(s, buf, budget),
        }
    }
}

#[derive(Debug, Clone)]
struct DeferredBatchItem {
    entity: Option<EntityId>,
    msg_type: u16,
    estimated_size: u32,
    creator: Creator,
}

/// A batch of pending outbound messages for one connection. `I` is the
/// caller's `Environment::Instant` type; the batch only ever compares two
/// instants of the same type, so it stays generic over it rather than
/// depending on a wall clock directly.
#[derive(Debug)]
pub struct DeferredBatch<I> {
    items: Vec<DeferredBatchItem>,
    scheduled: bool,
    batch_start: Option<I>,
    batch_delay: Duration,
}

/// One queued frame's position inside the shared encode buffer, as
/// `write_protobuf_packets` expects: `(msg_type, offset, payload_len)`.
pub type PacketInfo = (u16, usize, usize);

impl<I: Copy + Sub<I, Output = Duration>> DeferredBatch<I> {
    pub fn new(batch_delay: Duration) -> Self {
        Self {
            items: Vec::new(),
            scheduled: false,
            batch_start: None,
            batch_delay,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True once `batch_delay` has elapsed since the first item was queued
    /// and not yet flushed.
    pub fn ready(&self, now: I) -> bool {
        match self.batch_start {
            Some(start) if self.scheduled => now - start >= self.batch_delay,
            _ => false,
        }
    }

    /// Queues an item, deduplicating on `(entity, msg_type)`: a later push
    /// for the same pair replaces the earlier creator in place rather than
    /// appending, preserving FIFO order by the first occurrence.
    pub fn push(
        &mut self,
        now: I,
        entity: Option<EntityId>,
        msg_type: u16,
        estimated_size: u32,
        creator: Creator,
    ) {
        if let Some(existing) = entity.and_then(|e| {
            self.items
                .iter_mut()
                .find(|it| it.entity == Some(e) && it.msg_type == msg_type)
        }) {
            existing.creator = creator;
            existing.estimated_size = estimated_size;
        } else {
            self.items.push(DeferredBatchItem {
                entity,
                msg_type,
                estimated_size,
                creator,
            });
        }
        if !self.scheduled {
            self.scheduled = true;
            self.batch_start = Some(now);
        }
    }

    /// Runs the flush algorithm. `header_padding`/`footer_size` come from
    /// the active frame helper. Returns the packet table to hand to
    /// `write_protobuf_packets`, with the encoded bytes appended to `buf`.
    /// Returns `None` when there was nothing to send this tick (TX
    /// unavailable, batch empty, or the sole item was oversize and
    /// dropped).
    pub fn flush(
        &mut self,
        now: I,
        can_write: bool,
        header_padding: usize,
        footer_size: usize,
        buf: &mut Vec<u8>,
    ) -> Option<Vec<PacketInfo>> {
        if self.items.is_empty() {
            self.scheduled = false;
            return None;
        }
        if !can_write {
            return None;
        }
        buf.clear();

        if self.items.len() == 1 {
            let item = self.items[0].clone();
            let start = buf.len();
            let written = item.creator.invoke(buf, u16::MAX, header_padding, footer_size);
            self.items.remove(0);
            self.scheduled = false;
            if written == 0 {
                tracing::debug!(msg_type = item.msg_type, "message too large to send");
                return None;
            }
            return Some(vec![(item.msg_type, start, written)]);
        }

        let total_estimate: u64 = self.items.iter().map(|i| u64::from(i.estimated_size)).sum();
        buf.reserve(
            total_estimate as usize + self.items.len() * (header_padding + footer_size),
        );

        let mut packet_infos = Vec::new();
        let mut remaining: u16 = u16::MAX;
        let mut processed = 0usize;
        for item in &self.items {
            let start = buf.len();
            let written = item.creator.invoke(buf, remaining, header_padding, footer_size);
            if written == 0 {
                break;
            }
            packet_infos.push((item.msg_type, start, written));
            processed += 1;
            let overhead = (header_padding + footer_size) as u16;
            remaining = if processed == 1 {
                MAX_PACKET_SIZE
            } else {
                remaining.saturating_sub(written as u16).saturating_sub(overhead)
            };
        }

        if processed == 0 {
            return None;
        }
        self.items.drain(..processed);
        self.scheduled = !self.items.is_empty();
        if self.scheduled {
            self.batch_start = Some(now);
        }
        Some(packet_infos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    struct TestInstant(u64);

    impl Sub for TestInstant {
        type Output = Duration;
        fn sub(self, rhs: Self) -> Duration {
            Duration::from_millis(self.0.saturating_sub(rhs.0))
        }
    }

    fn small_payload() -> Creator {
        Creator::Encoded(vec![1, 2, 3, 4])
    }

    fn oversize_payload() -> Creator {
        Creator::Encoded(vec![0u8; 70_000])
    }

    fn log_line(line: &str, buf: &mut Vec<u8>, remaining: u16) -> usize {
        if line.len() > remaining as usize {
            return 0;
        }
        buf.extend_from_slice(line.as_bytes());
        line.len()
    }

    #[test]
    fn single_item_flushes_immediately() {
        let mut batch = DeferredBatch::new(Duration::from_millis(100));
        batch.push(TestInstant(0), Some(1), 21, 16, small_payload());
        let mut buf = Vec::new();
        let packets = batch
            .flush(TestInstant(100), true, 6, 0, &mut buf)
            .unwrap();
        assert_eq!(packets, vec![(21, 0, 4)]);
        assert!(batch.is_empty());
    }

    #[test]
    fn dedup_replaces_creator_for_same_entity_and_type() {
        let mut batch = DeferredBatch::new(Duration::from_millis(100));
        batch.push(TestInstant(0), Some(1), 21, 16, oversize_payload());
        batch.push(TestInstant(0), Some(1), 21, 16, small_payload());
        let mut buf = Vec::new();
        let packets = batch
            .flush(TestInstant(100), true, 6, 0, &mut buf)
            .unwrap();
        assert_eq!(packets.len(), 1);
        assert_eq!(buf, vec![1, 2, 3, 4]);
    }

    #[test]
    fn oversize_single_item_is_dropped_without_sending() {
        let mut batch = DeferredBatch::new(Duration::from_millis(100));
        batch.push(TestInstant(0), Some(1), 16, 16, oversize_payload());
        let mut buf = Vec::new();
        let result = batch.flush(TestInstant(100), true, 6, 0, &mut buf);
        assert!(result.is_none());
        assert!(batch.is_empty());
    }

    /// A single-item payload sized to just exceed the budget once
    /// `header_padding`/`footer_size` are accounted for must be rejected,
    /// even though it fits under `u16::MAX` on its own. Regression test for
    /// the fit-check that used to compare raw payload length against
    /// `u16::MAX` without subtracting frame overhead.
    #[test]
    fn boundary_payload_just_over_budget_with_overhead_is_rejected() {
        let mut batch = DeferredBatch::new(Duration::from_millis(100));
        let payload = vec![0u8; 65530]; // budget is 65535 - 6 = 65529
        batch.push(TestInstant(0), Some(1), 16, 16, Creator::Encoded(payload));
        let mut buf = Vec::new();
        let result = batch.flush(TestInstant(100), true, 6, 0, &mut buf);
        assert!(result.is_none());
        assert!(batch.is_empty());
    }

    #[test]
    fn boundary_payload_at_exact_budget_with_overhead_is_accepted() {
        let mut batch = DeferredBatch::new(Duration::from_millis(100));
        let payload = vec![0u8; 65529]; // exactly fills the 65535 - 6 budget
        batch.push(TestInstant(0), Some(1), 16, 16, Creator::Encoded(payload));
        let mut buf = Vec::new();
        let packets = batch
            .flush(TestInstant(100), true, 6, 0, &mut buf)
            .unwrap();
        assert_eq!(packets, vec![(16, 0, 65529)]);
    }

    #[test]
    fn cannot_write_retries_next_tick_without_clearing() {
        let mut batch = DeferredBatch::new(Duration::from_millis(100));
        batch.push(TestInstant(0), Some(1), 21, 16, small_payload());
        let mut buf = Vec::new();
        assert!(batch
            .flush(TestInstant(100), false, 6, 0, &mut buf)
            .is_none());
        assert!(!batch.is_empty());
    }

    #[test]
    fn multi_item_batch_preserves_fifo_order() {
        let mut batch = DeferredBatch::new(Duration::from_millis(50));
        batch.push(TestInstant(0), Some(1), 21, 16, small_payload());
        batch.push(TestInstant(0), Some(2), 25, 16, small_payload());
        batch.push(
            TestInstant(0),
            None,
            29,
            64,
            Creator::StringCapture("hello".to_string(), log_line),
        );
        let mut buf = Vec::new();
        let packets = batch
            .flush(TestInstant(50), true, 6, 0, &mut buf)
            .unwrap();
        assert_eq!(packets.len(), 3);
        assert_eq!(packets[0].0, 21);
        assert_eq!(packets[1].0, 25);
        assert_eq!(packets[2].0, 29);
        assert!(batch.is_empty());
    }

    proptest::proptest! {
        /// However many times the same `(entity, msg_type)` pair is pushed
        /// before a flush, only the bytes from the last push survive.
        #[test]
        fn repeated_push_dedup_keeps_only_last_value(values in proptest::collection::vec(any::<u8>(), 1..8)) {
            let mut batch = DeferredBatch::new(Duration::from_millis(100));
            for &v in &values {
                batch.push(TestInstant(0), Some(1), 21, 1, Creator::Encoded(vec![v]));
            }
            let mut buf = Vec::new();
            let packets = batch.flush(TestInstant(100), true, 6, 0, &mut buf).unwrap();
            prop_assert_eq!(packets.len(), 1);
            prop_assert_eq!(buf, vec![*values.last().unwrap()]);
            prop_assert!(batch.is_empty());
        }

        /// Items for distinct entities never collapse into each other,
        /// regardless of push order or count.
        #[test]
        fn distinct_entities_never_dedup(count in 1u64..6) {
            let mut batch = DeferredBatch::new(Duration::from_millis(100));
            for i in 0..count {
                batch.push(TestInstant(0), Some(i as EntityId), 21, 1, Creator::Encoded(vec![i as u8]));
            }
            let mut buf = Vec::new();
            let packets = batch.flush(TestInstant(100), true, 6, 0, &mut buf).unwrap();
            prop_assert_eq!(packets.len(), count as usize);
        }
    }
}
