//! Option Cache
//!
//! LRU cache of preview responses shared by every filter editor of a
//! panel, so remounting an editor with the same key never re-issues the
//! request.

use hashlink::LruCache;

use super::filter_api::{PreviewKey, PreviewResponse};

pub struct OptionCache {
    entries: LruCache<PreviewKey, PreviewResponse>,
}

impl OptionCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: LruCache::new(capacity.max(1)),
        }
    }

    pub fn get(&mut self, key: &PreviewKey) -> Option<PreviewResponse> {
        self.entries.get(key).cloned()
    }

    pub fn insert(&mut self, key: PreviewKey, response: PreviewResponse) {
        self.entries.insert(key, response);
    }

    pub fn contains(&self, key: &PreviewKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for OptionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OptionCache")
            .field("len", &self.entries.len())
            .field("capacity", &self.entries.capacity())
            .finish()
    }
}
