//! Run-scoped index of accepted content hashes.

use std::collections::HashSet;

use crate::decode::ContentHash;

/// Set of content hashes accepted so far in one run.
///
/// The index is owned by the run and passed by `&mut` into every gate
/// evaluation, so the check and the insert for a file always happen
/// together with no other evaluation in between.
#[derive(Clone, Debug, Default)]
pub struct DedupIndex {
    hashes: HashSet<ContentHash>,
}

impl DedupIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `hash` was already accepted.
    pub fn contains(&self, hash: &ContentHash) -> bool {
        self.hashes.contains(hash)
    }

    /// Records `hash`. Returns false if it was already present.
    pub fn insert(&mut self, hash: ContentHash) -> bool {
        self.hashes.insert(hash)
    }

    /// Number of distinct hashes recorded.
    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::{ColorMode, DecodedImage};

    fn hash_of(raw: Vec<u8>) -> ContentHash {
        DecodedImage::from_raw(ColorMode::Luma, raw.len(), 1, 1, raw)
            .expect("build image")
            .content_hash()
    }

    #[test]
    fn test_insert_then_contains() {
        let mut index = DedupIndex::new();
        let hash = hash_of(vec![1, 2, 3]);

        assert!(!index.contains(&hash));
        assert!(index.insert(hash));
        assert!(index.contains(&hash));
        assert!(!index.insert(hash));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_distinct_hashes_coexist() {
        let mut index = DedupIndex::new();
        assert!(index.insert(hash_of(vec![1])));
        assert!(index.insert(hash_of(vec![2])));
        assert_eq!(index.len(), 2);
    }
}
