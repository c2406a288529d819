use heapless::{FnvIndexMap, Vec};
use myrtio_mesh_lighting::{KeyValueStore, StoreError};

/// Largest value the store accepts
pub const VALUE_CAPACITY: usize = 32;

/// RAM-backed key/value store with room for `N` keys
///
/// `N` must be a power of two. Contents do not survive a restart, so this
/// suits hosts without flash and tests.
#[derive(Debug, Default)]
pub struct MemoryStore<const N: usize> {
    entries: FnvIndexMap<u16, Vec<u8, VALUE_CAPACITY>, N>,
}

impl<const N: usize> MemoryStore<N> {
    pub fn new() -> Self {
        Self {
            entries: FnvIndexMap::new(),
        }
    }

    pub fn contains(&self, key: u16) -> bool {
        self.entries.contains_key(&key)
    }

    /// Stored value of `key`
    pub fn get(&self, key: u16) -> Option<&[u8]> {
        self.entries.get(&key).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<const N: usize> KeyValueStore for MemoryStore<N> {
    fn load(&mut self, key: u16, buffer: &mut [u8]) -> Result<usize, StoreError> {
        let value = self.entries.get(&key).ok_or(StoreError::NotFound)?;
        let out = buffer
            .get_mut(..value.len())
            .ok_or(StoreError::BufferTooSmall)?;
        out.copy_from_slice(value);
        Ok(value.len())
    }

    fn save(&mut self, key: u16, data: &[u8]) -> Result<(), StoreError> {
        let value = Vec::from_slice(data).map_err(|()| StoreError::NoSpace)?;
        self.entries
            .insert(key, value)
            .map_err(|_| StoreError::NoSpace)?;
        Ok(())
    }

    fn erase(&mut self, key: u16) -> Result<(), StoreError> {
        self.entries.remove(&key);
        Ok(())
    }
}
