//! Per-entity scope records.

use std::collections::BTreeMap;

use divscope_domain::{Dbref, Rank};

use super::bitset::CapabilityBitset;

/// Authorization state carried by one game object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeRecord {
    /// Governing division, or none.
    pub division: Option<Dbref>,
    pub rank: Rank,
    /// Own capability bits; `None` reads as all `No`.
    pub powers: Option<CapabilityBitset>,
    /// Group keys, kept sorted.
    pub groups: Vec<String>,
}

impl ScopeRecord {
    pub fn new(division: Option<Dbref>, rank: Rank) -> Self {
        Self {
            division,
            rank,
            powers: None,
            groups: Vec::new(),
        }
    }

    pub fn has_group(&self, key: &str) -> bool {
        self.groups.binary_search_by(|g| g.as_str().cmp(key)).is_ok()
    }

    /// Insert in sorted position. Returns false if already present.
    pub fn add_group(&mut self, key: &str) -> bool {
        match self.groups.binary_search_by(|g| g.as_str().cmp(key)) {
            Ok(_) => false,
            Err(pos) => {
                self.groups.insert(pos, key.to_string());
                true
            }
        }
    }

    pub fn remove_group(&mut self, key: &str) -> bool {
        match self.groups.binary_search_by(|g| g.as_str().cmp(key)) {
            Ok(pos) => {
                self.groups.remove(pos);
                true
            }
            Err(_) => false,
        }
    }

    /// Drop an all-zero bitset.
    pub fn release_if_clear(&mut self) {
        if self.powers.as_ref().is_some_and(CapabilityBitset::is_clear) {
            self.powers = None;
        }
    }
}

#[derive(Debug, Default)]
pub struct ScopeTable {
    records: BTreeMap<Dbref, ScopeRecord>,
}

impl ScopeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, dbref: Dbref) -> Option<&ScopeRecord> {
        self.records.get(&dbref)
    }

    pub fn get_mut(&mut self, dbref: Dbref) -> Option<&mut ScopeRecord> {
        self.records.get_mut(&dbref)
    }

    /// Record for `dbref`, created with `default_rank` if missing.
    pub fn entry(&mut self, dbref: Dbref, default_rank: Rank) -> &mut ScopeRecord {
        self.records
            .entry(dbref)
            .or_insert_with(|| ScopeRecord::new(None, default_rank))
    }

    pub fn insert(&mut self, dbref: Dbref, record: ScopeRecord) {
        self.records.insert(dbref, record);
    }

    pub fn remove(&mut self, dbref: Dbref) -> Option<ScopeRecord> {
        self.records.remove(&dbref)
    }

    /// Entities whose division reference is `division`.
    pub fn members_of(&self, division: Dbref) -> Vec<Dbref> {
        self.records
            .iter()
            .filter(|(_, record)| record.division == Some(division))
            .map(|(dbref, _)| *dbref)
            .collect()
    }

    /// Entities holding the group `key`.
    pub fn holders_of(&self, key: &str) -> Vec<Dbref> {
        self.records
            .iter()
            .filter(|(_, record)| record.has_group(key))
            .map(|(dbref, _)| *dbref)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Dbref, &ScopeRecord)> {
        self.records.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&Dbref, &mut ScopeRecord)> {
        self.records.iter_mut()
    }
}
