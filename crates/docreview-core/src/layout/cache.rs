use super::PageLineIndex;
use crate::config::IndexConfig;
use crate::model::PageItems;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct CachedIndex {
    generation: u64,
    index: PageLineIndex,
}

/// Per-page line indices, invalidated by advancing a generation counter.
///
/// Entries are never patched: a stale entry is rebuilt from the page's
/// current items and replaced as a whole.
#[derive(Debug, Clone, Default)]
pub struct LineIndexCache {
    generation: u64,
    config: IndexConfig,
    entries: HashMap<u32, CachedIndex>,
}

impl LineIndexCache {
    pub fn new(config: IndexConfig) -> Self {
        Self {
            generation: 0,
            config,
            entries: HashMap::new(),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Mark every cached index stale (zoom, resize, re-render).
    pub fn invalidate(&mut self) {
        self.generation += 1;
        log::debug!("line index cache advanced to generation {}", self.generation);
    }

    pub fn set_config(&mut self, config: IndexConfig) {
        if config != self.config {
            self.config = config;
            self.invalidate();
        }
    }

    /// Cached index for `page` if it belongs to the current generation.
    pub fn get(&self, page: u32) -> Option<&PageLineIndex> {
        self.entries
            .get(&page)
            .filter(|e| e.generation == self.generation)
            .map(|e| &e.index)
    }

    pub fn get_or_build(&mut self, page: &PageItems) -> &PageLineIndex {
        let generation = self.generation;
        let config = &self.config;
        let build = || CachedIndex {
            generation,
            index: PageLineIndex::build(page.page, &page.items, config),
        };

        let entry = match self.entries.entry(page.page) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().generation != generation {
                    occupied.insert(build());
                }
                occupied.into_mut()
            }
            Entry::Vacant(vacant) => vacant.insert(build()),
        };
        &entry.index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
