// SPDX-FileCopyrightText: 2026 Waypoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded in-memory result cache with pluggable eviction.

use std::collections::{HashMap, VecDeque};

use waypoint_config::model::EvictionKind;

/// Decides which key leaves a full cache.
///
/// The cache reports every insert and read; the policy keeps whatever
/// ordering it needs and names the victim on demand.
pub trait EvictionPolicy: Send + 'static {
    /// A new key was inserted.
    fn on_insert(&mut self, key: &str);

    /// An existing key was read or overwritten.
    fn on_access(&mut self, key: &str);

    /// Remove and return the key to evict.
    fn evict(&mut self) -> Option<String>;
}

/// Evicts the oldest inserted key. Reads do not refresh a key.
#[derive(Debug, Default)]
pub struct Fifo {
    order: VecDeque<String>,
}

impl EvictionPolicy for Fifo {
    fn on_insert(&mut self, key: &str) {
        self.order.push_back(key.to_string());
    }

    fn on_access(&mut self, _key: &str) {}

    fn evict(&mut self) -> Option<String> {
        self.order.pop_front()
    }
}

/// Evicts the least recently inserted or read key.
#[derive(Debug, Default)]
pub struct Lru {
    order: VecDeque<String>,
}

impl EvictionPolicy for Lru {
    fn on_insert(&mut self, key: &str) {
        self.order.push_back(key.to_string());
    }

    fn on_access(&mut self, key: &str) {
        let found = self
            .order
            .iter()
            .position(|k| k == key)
            .and_then(|pos| self.order.remove(pos));
        if let Some(k) = found {
            self.order.push_back(k);
        }
    }

    fn evict(&mut self) -> Option<String> {
        self.order.pop_front()
    }
}

/// Build the policy named in configuration.
pub fn policy_for(kind: EvictionKind) -> Box<dyn EvictionPolicy> {
    match kind {
        EvictionKind::Fifo => Box::new(Fifo::default()),
        EvictionKind::Lru => Box::new(Lru::default()),
    }
}

/// Fixed-capacity map from cache key to value.
pub struct ResultCache<V> {
    capacity: usize,
    entries: HashMap<String, V>,
    policy: Box<dyn EvictionPolicy>,
}

impl<V: Clone> ResultCache<V> {
    /// A capacity of zero is treated as one.
    pub fn new(capacity: usize, policy: Box<dyn EvictionPolicy>) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity),
            policy,
        }
    }

    pub fn get(&mut self, key: &str) -> Option<V> {
        let value = self.entries.get(key).cloned()?;
        self.policy.on_access(key);
        Some(value)
    }

    /// Insert or overwrite `key`, evicting one entry if the cache is full.
    pub fn insert(&mut self, key: String, value: V) {
        if let Some(slot) = self.entries.get_mut(&key) {
            *slot = value;
            self.policy.on_access(&key);
            return;
        }

        if self.entries.len() >= self.capacity
            && let Some(victim) = self.policy.evict()
        {
            self.entries.remove(&victim);
            tracing::debug!(key = %victim, "cache entry evicted");
        }

        self.policy.on_insert(&key);
        self.entries.insert(key, value);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
