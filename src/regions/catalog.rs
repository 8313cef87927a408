use super::{Region, RegionError};
use std::collections::BTreeMap;
use std::fmt::Debug;

/// Ordered multi-map from an opaque region-type key to the regions of that
/// type, kept in insertion order.
#[derive(Clone, Debug)]
pub struct RegionCatalog<K> {
    entries: BTreeMap<K, Vec<Region>>,
}

impl<K> Default for RegionCatalog<K> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<K: Ord + Clone + Debug> RegionCatalog<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: K, region: Region) {
        self.entries.entry(key).or_default().push(region);
    }

    pub fn get(&self, key: &K) -> Result<&[Region], RegionError> {
        self.entries
            .get(key)
            .map(Vec::as_slice)
            .ok_or_else(|| RegionError::UnknownRegionType {
                key: format!("{key:?}"),
            })
    }

    /// Average temperature of every region of one type, in insertion order.
    pub fn temperatures(&self, key: &K) -> Result<Vec<f64>, RegionError> {
        Ok(self
            .get(key)?
            .iter()
            .map(Region::average_temperature)
            .collect())
    }

    pub fn types_present(&self) -> impl Iterator<Item = &K> + '_ {
        self.entries.keys()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Total number of regions over all types.
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &[Region])> + '_ {
        self.entries.iter().map(|(k, v)| (k, v.as_slice()))
    }
}
