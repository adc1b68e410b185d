//! Redis Cluster hash slots
//!
//! Keys map to one of 16384 slots: CRC16 (XMODEM) of the key, or of its
//! hash tag when the key contains a non-empty `{...}` segment.

use crc16::{State, XMODEM};
use std::collections::BTreeMap;

/// Total number of hash slots in Redis Cluster
pub const CLUSTER_SLOTS: u16 = 16384;

/// Calculate the hash slot for a given key
///
/// - If the key contains `{...}` with at least one byte inside, only the part
///   between the first `{` and the first `}` after it is hashed
/// - Otherwise, the entire key is hashed
/// - The hash is CRC16 mod 16384
pub fn key_slot(key: impl AsRef<[u8]>) -> u16 {
    let hash_key = extract_hash_tag(key.as_ref());
    State::<XMODEM>::calculate(hash_key) % CLUSTER_SLOTS
}

/// Extract the hash tag from a key
///
/// `{user1000}.following` and `{user1000}.followers` share the tag
/// `user1000` and therefore the same slot.
fn extract_hash_tag(key: &[u8]) -> &[u8] {
    if let Some(start) = key.iter().position(|&b| b == b'{') {
        if let Some(end) = key[start + 1..].iter().position(|&b| b == b'}') {
            let end = start + 1 + end;
            if end > start + 1 {
                return &key[start + 1..end];
            }
        }
    }
    key
}

/// Group items by the slot of their key, keeping input order inside a group.
///
/// Returns the groups ordered by slot number together with each item's
/// original index, which callers use to scatter results back into place.
pub fn group_by_slot<T, K, F>(items: impl IntoIterator<Item = T>, key_of: F) -> Vec<SlotGroup<T>>
where
    K: AsRef<[u8]>,
    F: Fn(&T) -> K,
{
    let mut groups: BTreeMap<u16, SlotGroup<T>> = BTreeMap::new();
    for (index, item) in items.into_iter().enumerate() {
        let slot = key_slot(key_of(&item));
        let group = groups.entry(slot).or_insert_with(|| SlotGroup {
            slot,
            items: Vec::new(),
            indices: Vec::new(),
        });
        group.items.push(item);
        group.indices.push(index);
    }
    groups.into_values().collect()
}

/// Items sharing one hash slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotGroup<T> {
    /// The slot every item maps to
    pub slot: u16,
    /// The items, in input order
    pub items: Vec<T>,
    /// Position of each item in the original input
    pub indices: Vec<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_calculation() {
        assert_eq!(key_slot(b"123456789"), 12739);
        assert_eq!(key_slot("foo"), 12182);
        assert_eq!(key_slot("bar"), 5061);
        assert_eq!(key_slot(""), 0);
    }

    #[test]
    fn test_hash_tag_extraction() {
        assert_eq!(extract_hash_tag(b"{user1000}.following"), b"user1000");
        assert_eq!(extract_hash_tag(b"{user1000}.followers"), b"user1000");
        assert_eq!(extract_hash_tag(b"foo{}{bar}"), b"foo{}{bar}");
        assert_eq!(extract_hash_tag(b"foo{{bar}}zap"), b"{bar");
        assert_eq!(extract_hash_tag(b"foo{bar}{zap}"), b"bar");
        assert_eq!(extract_hash_tag(b"no_tag"), b"no_tag");
        assert_eq!(extract_hash_tag(b"lone}brace{"), b"lone}brace{");
    }

    #[test]
    fn test_hash_tag_slot_equality() {
        let slot1 = key_slot("{user1000}.following");
        let slot2 = key_slot("{user1000}.followers");
        assert_eq!(slot1, slot2);
        assert_eq!(key_slot("key1:{1}"), key_slot("key4:{1}"));
        assert_eq!(key_slot("key1:{1}"), key_slot("1"));
    }

    #[test]
    fn test_slot_range() {
        for i in 0..1000 {
            let key = format!("key:{i}");
            assert!(key_slot(&key) < CLUSTER_SLOTS);
        }
    }

    #[test]
    fn test_group_by_slot_keeps_indices() {
        let keys = vec!["a{x}", "b", "c{x}", "d"];
        let groups = group_by_slot(keys.clone(), |k| *k);

        let total: usize = groups.iter().map(|g| g.items.len()).sum();
        assert_eq!(total, keys.len());

        for group in &groups {
            for (item, index) in group.items.iter().zip(&group.indices) {
                assert_eq!(keys[*index], *item);
                assert_eq!(key_slot(item), group.slot);
            }
        }

        let tagged = groups
            .iter()
            .find(|g| g.items.contains(&"a{x}"))
            .unwrap();
        assert_eq!(tagged.items, vec!["a{x}", "c{x}"]);
        assert_eq!(tagged.indices, vec![0, 2]);
    }
}
