use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::{Duration, Instant};
use tracing::debug;

/// Sequence numbers seen per relay, bounded in size and age
#[derive(Debug)]
pub struct DedupTable {
    capacity: usize,
    ttl: Duration,
    seen: HashMap<SocketAddr, HashMap<u32, Instant>>,
}

impl DedupTable {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            capacity,
            ttl,
            seen: HashMap::new(),
        }
    }

    /// Record `seq` from `relay`. Returns false if it was already recorded.
    pub fn admit(&mut self, relay: SocketAddr, seq: u32) -> bool {
        let seen = self.seen.entry(relay).or_default();
        if seen.contains_key(&seq) {
            return false;
        }

        if seen.len() >= self.capacity {
            let oldest = seen.iter().min_by_key(|(_, at)| **at).map(|(s, _)| *s);
            if let Some(oldest) = oldest {
                seen.remove(&oldest);
                debug!(seq = oldest, "dedup table at capacity, evicted oldest");
            }
        }
        seen.insert(seq, Instant::now());
        true
    }

    /// Forget `seq` so a retransmission is admitted again
    pub fn release(&mut self, relay: SocketAddr, seq: u32) {
        if let Some(seen) = self.seen.get_mut(&relay) {
            seen.remove(&seq);
        }
    }

    /// Drop entries older than the TTL. Returns the number of relays still tracked.
    pub fn cleanup(&mut self) -> usize {
        let now = Instant::now();
        let ttl = self.ttl;
        for seen in self.seen.values_mut() {
            seen.retain(|_, at| now.duration_since(*at) < ttl);
        }
        self.seen.retain(|_, seen| !seen.is_empty());
        self.seen.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn relay(port: u16) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], port))
    }

    #[test]
    fn test_repeat_seq_rejected() {
        let mut table = DedupTable::new(8, Duration::from_secs(60));
        assert!(table.admit(relay(1), 7));
        assert!(!table.admit(relay(1), 7));
        // Sequences are tracked per relay
        assert!(table.admit(relay(2), 7));
    }

    #[test]
    fn test_released_seq_admitted_again() {
        let mut table = DedupTable::new(8, Duration::from_secs(60));
        assert!(table.admit(relay(1), 3));

        // Delivery failed after admission; the relay will retransmit
        table.release(relay(1), 3);
        assert!(table.admit(relay(1), 3));
        assert!(!table.admit(relay(1), 3));
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut table = DedupTable::new(2, Duration::from_secs(60));
        assert!(table.admit(relay(1), 1));
        std::thread::sleep(Duration::from_millis(2));
        assert!(table.admit(relay(1), 2));
        std::thread::sleep(Duration::from_millis(2));
        assert!(table.admit(relay(1), 3));

        assert!(table.admit(relay(1), 1));
        assert!(!table.admit(relay(1), 3));
    }

    #[test]
    fn test_cleanup_drops_expired() {
        let mut table = DedupTable::new(8, Duration::ZERO);
        assert!(table.admit(relay(1), 1));
        assert_eq!(table.cleanup(), 0);
        assert!(table.admit(relay(1), 1));
    }
}
