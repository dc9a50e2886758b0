//! Single-slot memo cache

/// Remembers the value produced for the most recent key only
pub(crate) struct SingleSlot<K, V> {
    entry: Option<(K, V)>,
}

impl<K, V> SingleSlot<K, V> {
    pub(crate) fn new() -> Self {
        Self { entry: None }
    }

    /// The cached value if `key` matches the stored key under `same`
    pub(crate) fn get(&self, key: &K, same: impl Fn(&K, &K) -> bool) -> Option<&V> {
        match &self.entry {
            Some((stored, value)) if same(stored, key) => Some(value),
            _ => None,
        }
    }

    pub(crate) fn put(&mut self, key: K, value: V) {
        self.entry = Some((key, value));
    }

    pub(crate) fn clear(&mut self) {
        self.entry = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_last_key_is_remembered() {
        let mut slot = SingleSlot::new();
        slot.put(1, "one");
        assert_eq!(slot.get(&1, |a, b| a == b), Some(&"one"));

        slot.put(2, "two");
        assert_eq!(slot.get(&1, |a, b| a == b), None);
        assert_eq!(slot.get(&2, |a, b| a == b), Some(&"two"));

        slot.clear();
        assert_eq!(slot.get(&2, |a, b| a == b), None);
    }
}
