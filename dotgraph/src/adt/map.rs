//! This module implements the insertion-ordered map.

use std::borrow::Borrow;
use std::cmp::Eq;
use std::collections::HashMap;
use std::hash::Hash;

/// A map that remembers the order in which keys were first inserted.
/// Replacing the value of an existing key keeps its original position.
#[derive(Debug, Clone)]
pub struct OrderedMap<K, V> {
    entries: Vec<(K, V)>,
    // Maps each key to its position in `entries`.
    index: HashMap<K, usize>,
}

impl<K: Clone + Hash + Eq, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for OrderedMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<K: Clone + Hash + Eq, V> OrderedMap<K, V> {
    pub fn new() -> Self {
        OrderedMap {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts \p val under \p key, and returns a reference to the stored
    /// value. An existing value is replaced in place.
    pub fn insert(&mut self, key: K, val: V) -> &mut V {
        let idx = match self.index.get(&key) {
            Option::Some(&idx) => {
                self.entries[idx].1 = val;
                idx
            }
            Option::None => self.push(key, val),
        };
        &mut self.entries[idx].1
    }

    /// \returns the value of \p key, inserting the value that \p make
    /// returns if the key is missing.
    pub fn get_or_insert_with<F: FnOnce() -> V>(
        &mut self,
        key: K,
        make: F,
    ) -> &mut V {
        let idx = match self.index.get(&key) {
            Option::Some(&idx) => idx,
            Option::None => {
                let val = make();
                self.push(key, val)
            }
        };
        &mut self.entries[idx].1
    }

    fn push(&mut self, key: K, val: V) -> usize {
        let idx = self.entries.len();
        self.index.insert(key.clone(), idx);
        self.entries.push((key, val));
        idx
    }

    // Rebuilds the index after entries were removed from the middle.
    fn reindex(&mut self) {
        self.index.clear();
        for (i, pair) in self.entries.iter().enumerate() {
            self.index.insert(pair.0.clone(), i);
        }
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = *self.index.get(key)?;
        Option::Some(&self.entries[idx].1)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = *self.index.get(key)?;
        Option::Some(&mut self.entries[idx].1)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    /// Removes \p key, and returns its value. Later entries keep their
    /// relative order.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = self.index.remove(key)?;
        let (_, val) = self.entries.remove(idx);
        self.reindex();
        Option::Some(val)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|pair| (&pair.0, &pair.1))
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|pair| &pair.1)
    }
}

#[test]
fn test_ordered_map() {
    let mut map: OrderedMap<String, usize> = OrderedMap::new();

    assert!(map.is_empty());

    map.insert("c".to_string(), 1);
    map.insert("a".to_string(), 2);
    map.insert("b".to_string(), 3);
    assert_eq!(map.len(), 3);

    assert_eq!(*map.get("a").unwrap(), 2);
    assert!(map.contains_key("b"));
    assert!(!map.contains_key("d"));

    // Replacing keeps the position.
    *map.insert("c".to_string(), 4) += 1;
    let keys: Vec<&str> = map.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, vec!["c", "a", "b"]);
    assert_eq!(*map.get("c").unwrap(), 5);

    assert_eq!(map.remove("a"), Option::Some(2));
    assert_eq!(map.remove("a"), Option::None);
    let values: Vec<usize> = map.values().copied().collect();
    assert_eq!(values, vec![5, 3]);
}

#[test]
fn test_ordered_map2() {
    let mut map: OrderedMap<usize, usize> = OrderedMap::new();
    for i in 0..10 {
        map.insert(i, i * i);
    }
    for i in (1..10).step_by(2) {
        assert_eq!(map.remove(&i), Option::Some(i * i));
    }
    assert_eq!(map.len(), 5);
    // The index follows the entries that moved.
    for i in (0..10).step_by(2) {
        *map.get_mut(&i).unwrap() += 1;
    }
    assert_eq!(map.get(&4), Option::Some(&17));
    if let Option::Some(v) = map.get_mut(&8) {
        *v = 0;
    }
    assert_eq!(map.iter().last(), Option::Some((&8, &0)));
    *map.get_or_insert_with(8, || 100) += 1;
    *map.get_or_insert_with(20, || 100) += 1;
    assert_eq!(map.get(&8), Option::Some(&1));
    assert_eq!(map.get(&20), Option::Some(&101));
    map.clear();
    assert!(map.is_empty());
    assert!(!map.contains_key(&20));
}
