//! Power groups: reusable role templates.

use std::collections::BTreeMap;
use std::fmt;

use super::bitset::CapabilityBitset;
use super::power::{name_key, prefix_keys};

/// Which of a group's two bitsets an operation addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupList {
    /// Highest tier any member may reach.
    Ceiling,
    /// Tier granted automatically on assignment.
    Auto,
}

impl fmt::Display for GroupList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupList::Ceiling => write!(f, "max"),
            GroupList::Auto => write!(f, "auto"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowerGroup {
    pub name: String,
    pub ceiling: CapabilityBitset,
    pub auto: CapabilityBitset,
}

impl PowerGroup {
    pub fn new(name: &str, byte_len: usize) -> Self {
        Self {
            name: name.trim().to_string(),
            ceiling: CapabilityBitset::zeroed(byte_len),
            auto: CapabilityBitset::zeroed(byte_len),
        }
    }

    pub fn key(&self) -> String {
        name_key(&self.name)
    }

    pub fn list(&self, list: GroupList) -> &CapabilityBitset {
        match list {
            GroupList::Ceiling => &self.ceiling,
            GroupList::Auto => &self.auto,
        }
    }

    pub fn list_mut(&mut self, list: GroupList) -> &mut CapabilityBitset {
        match list {
            GroupList::Ceiling => &mut self.ceiling,
            GroupList::Auto => &mut self.auto,
        }
    }
}

#[derive(Debug, Default)]
pub struct GroupTable {
    groups: BTreeMap<String, PowerGroup>,
}

impl GroupTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn contains_exact(&self, name: &str) -> bool {
        self.groups.contains_key(&name_key(name))
    }

    /// Exact key, else a unique prefix.
    pub fn resolve_key(&self, name: &str) -> Option<String> {
        let key = name_key(name);
        if key.is_empty() {
            return None;
        }
        if self.groups.contains_key(&key) {
            return Some(key);
        }
        let mut matches = prefix_keys(&self.groups, &key);
        let first = matches.next().map(|(k, _)| k.clone());
        if matches.next().is_some() {
            return None;
        }
        first
    }

    pub fn get(&self, key: &str) -> Option<&PowerGroup> {
        self.groups.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut PowerGroup> {
        self.groups.get_mut(key)
    }

    pub fn insert(&mut self, group: PowerGroup) {
        self.groups.insert(group.key(), group);
    }

    pub fn remove(&mut self, key: &str) -> Option<PowerGroup> {
        self.groups.remove(key)
    }

    /// Groups in case-insensitive name order.
    pub fn iter(&self) -> impl Iterator<Item = &PowerGroup> {
        self.groups.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut PowerGroup> {
        self.groups.values_mut()
    }
}
