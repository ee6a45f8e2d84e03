//! tagmap is the map of key, value pairs attached to every record read from
//! telegraf and, by reference, to every point expanded from that record. On
//! the wire a tagmap is a plain JSON object; SignalFx calls these pairs
//! 'dimensions'.

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{Serialize, Serializer};
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;
use std::mem;
use std::slice::Iter;

/// The tagmap key, value collection. Behaves similarly to
/// `std::collections::HashMap` but with a specialized implementation for fast
/// searching over a small collection. Pairs are kept sorted by key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TagMap<K, V>
where
    K: Hash,
    V: Hash,
{
    inner: Vec<(K, V)>,
}

impl<K, V> TagMap<K, V>
where
    K: Ord + Hash,
    V: Hash,
{
    /// Create a `tagmap::Iter`. Pairs are yielded in key order.
    pub fn iter(&self) -> Iter<(K, V)> {
        self.inner.iter()
    }

    /// Get a value from the tagmap, if it exists.
    pub fn get(&self, key: &K) -> Option<&V> {
        match self.inner.binary_search_by(|probe| probe.0.cmp(key)) {
            Ok(idx) => Some(&self.inner[idx].1),
            Err(_) => None,
        }
    }

    /// Insert a key / value into self
    ///
    /// This method will return the value previously stored under the given key,
    /// if there was such a value.
    pub fn insert(&mut self, key: K, val: V) -> Option<V> {
        match self.inner.binary_search_by(|probe| probe.0.cmp(&key)) {
            Ok(idx) => Some(mem::replace(&mut self.inner[idx].1, val)),
            Err(idx) => {
                self.inner.insert(idx, (key, val));
                None
            }
        }
    }

    /// Determine if the tagmap is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Return the length of the tagmap. This is the total number of key /
    /// values stored in the map.
    pub fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> Default for TagMap<K, V>
where
    K: Hash,
    V: Hash,
{
    fn default() -> TagMap<K, V> {
        TagMap { inner: Vec::new() }
    }
}

impl<K, V> Serialize for TagMap<K, V>
where
    K: Serialize + Hash,
    V: Serialize + Hash,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self.inner.iter().map(|&(ref k, ref v)| (k, v)))
    }
}

struct TagMapVisitor<K, V>
where
    K: Hash,
    V: Hash,
{
    marker: PhantomData<TagMap<K, V>>,
}

impl<'de, K, V> Visitor<'de> for TagMapVisitor<K, V>
where
    K: Deserialize<'de> + Ord + Hash,
    V: Deserialize<'de> + Hash,
{
    type Value = TagMap<K, V>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of tag keys to tag values")
    }

    fn visit_map<M>(self, mut access: M) -> Result<Self::Value, M::Error>
    where
        M: MapAccess<'de>,
    {
        let mut tags = TagMap {
            inner: Vec::with_capacity(access.size_hint().unwrap_or(0)),
        };
        while let Some((key, value)) = access.next_entry()? {
            tags.insert(key, value);
        }
        Ok(tags)
    }
}

impl<'de, K, V> Deserialize<'de> for TagMap<K, V>
where
    K: Deserialize<'de> + Ord + Hash,
    V: Deserialize<'de> + Hash,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(TagMapVisitor {
            marker: PhantomData,
        })
    }
}
