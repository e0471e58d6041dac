//! Hash collections backed by AHash.

pub use ahash::{AHashMap as HashMap, AHashSet as HashSet, RandomState};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hashmap_ahash() {
        let mut map = HashMap::new();
        map.insert('A', 65u32);
        assert_eq!(map.get(&'A'), Some(&65));
    }

    #[test]
    fn test_hashset_ahash() {
        let mut set = HashSet::new();
        set.insert(0x4E2Du32);
        assert!(set.contains(&0x4E2D));
    }
}
