//! Shared cache of compilations.
//!
//! Entries are keyed by the graph fingerprint, the time index and a hash of
//! the configuration, and stored as `Arc<Compilation>`. A published entry is
//! never replaced: when two threads compile the same key concurrently, the
//! first insert wins and both callers receive that entry.

use std::collections::hash_map::DefaultHasher;
use std::hash::Hasher;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;
use volta_core::NetworkGraph;

use crate::compile::{Compilation, compile};
use crate::config::{CompileConfig, CompileRequest};
use crate::error::Result;

/// Identity of one compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// [`NetworkGraph::fingerprint`] of the compiled graph.
    pub graph: u64,
    pub time_index: Option<usize>,
    /// Hash of the [`CompileConfig`].
    pub config: u64,
}

impl CacheKey {
    pub fn new(graph: &NetworkGraph, request: &CompileRequest) -> Self {
        Self::with_fingerprint(graph.fingerprint(), request)
    }

    /// Build a key from a precomputed graph fingerprint.
    pub fn with_fingerprint(fingerprint: u64, request: &CompileRequest) -> Self {
        Self {
            graph: fingerprint,
            time_index: request.time_index,
            config: config_hash(&request.config),
        }
    }
}

fn config_hash(config: &CompileConfig) -> u64 {
    let mut h = DefaultHasher::new();
    config.hash_into(&mut h);
    h.finish()
}

/// Concurrent compilation cache.
#[derive(Debug, Default)]
pub struct CompilationCache {
    entries: DashMap<CacheKey, Arc<Compilation>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl CompilationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached compilation for `request`, compiling it on a miss.
    ///
    /// Compilation runs without holding any lock on the map. Errors are not
    /// cached.
    pub fn get_or_compile(
        &self,
        graph: &NetworkGraph,
        request: &CompileRequest,
    ) -> Result<Arc<Compilation>> {
        let key = CacheKey::new(graph, request);
        if let Some(hit) = self.entries.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(Arc::clone(hit.value()));
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let fresh = Arc::new(compile(graph, request)?);
        let entry = self.entries.entry(key).or_insert(fresh);
        Ok(Arc::clone(entry.value()))
    }

    pub fn get(&self, key: &CacheKey) -> Option<Arc<Compilation>> {
        self.entries.get(key).map(|e| Arc::clone(e.value()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::Relaxed)
    }

    /// Drop every entry. Outstanding `Arc`s stay valid.
    pub fn clear(&self) {
        self.entries.clear();
    }
}
