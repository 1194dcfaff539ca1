//! Power table: named capabilities, their bit positions and aliases.

use std::collections::BTreeMap;
use std::ops::Bound;

use divscope_domain::{Comparator, Tier};

use super::bitset::CapabilityBitset;

/// Lookup key for case-insensitive names.
pub fn name_key(name: &str) -> String {
    name.trim().to_ascii_uppercase()
}

/// Keys of `map` beginning with `prefix`, in order.
pub(crate) fn prefix_keys<'a, V>(
    map: &'a BTreeMap<String, V>,
    prefix: &'a str,
) -> impl Iterator<Item = (&'a String, &'a V)> + 'a {
    map.range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
        .take_while(move |(key, _)| key.starts_with(prefix))
}

/// The three bit positions of a power.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerBits {
    pub yes: u32,
    pub lte: u32,
    pub lt: u32,
}

impl PowerBits {
    /// Number of distinct positions a power of this comparator needs.
    pub fn needed(comparator: Comparator) -> usize {
        if comparator.distinguishes_tiers() {
            3
        } else {
            1
        }
    }

    /// Lay out planned positions; non-graded comparators share one bit.
    pub fn from_plan(comparator: Comparator, planned: &[u32]) -> Option<Self> {
        match (comparator.distinguishes_tiers(), planned) {
            (true, [yes, lte, lt, ..]) => Some(Self {
                yes: *yes,
                lte: *lte,
                lt: *lt,
            }),
            (false, [bit, ..]) => Some(Self {
                yes: *bit,
                lte: *bit,
                lt: *bit,
            }),
            _ => None,
        }
    }

    /// Distinct positions, for release and reset.
    pub fn positions(&self) -> Vec<u32> {
        let mut bits = vec![self.yes, self.lte, self.lt];
        bits.sort_unstable();
        bits.dedup();
        bits
    }

    /// Highest tier whose bit is set; an absent bitset is all `No`.
    pub fn tier_in(&self, bitset: Option<&CapabilityBitset>) -> Tier {
        let Some(bits) = bitset else {
            return Tier::No;
        };
        if bits.get(self.yes) {
            Tier::Yes
        } else if bits.get(self.lte) {
            Tier::YesLte
        } else if bits.get(self.lt) {
            Tier::YesLt
        } else {
            Tier::No
        }
    }

    pub fn reset(&self, bitset: &mut CapabilityBitset) {
        for bit in self.positions() {
            bitset.clear(bit);
        }
    }

    /// Replace the stored tier. Higher tiers also set the lower bits.
    pub fn write(&self, bitset: &mut CapabilityBitset, tier: Tier) {
        self.reset(bitset);
        if tier >= Tier::Yes {
            bitset.set(self.yes);
        }
        if tier >= Tier::YesLte {
            bitset.set(self.lte);
        }
        if tier >= Tier::YesLt {
            bitset.set(self.lt);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Power {
    pub name: String,
    pub comparator: Comparator,
    pub bits: PowerBits,
}

impl Power {
    pub fn key(&self) -> String {
        name_key(&self.name)
    }
}

/// A second name for a power.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    pub name: String,
    /// Key of the canonical power.
    pub target: String,
}

#[derive(Debug, Default)]
pub struct PowerTable {
    powers: BTreeMap<String, Power>,
    aliases: BTreeMap<String, Alias>,
}

impl PowerTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.powers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.powers.is_empty()
    }

    pub fn alias_count(&self) -> usize {
        self.aliases.len()
    }

    /// Whether `name` is exactly a power name or alias.
    pub fn is_taken(&self, name: &str) -> bool {
        let key = name_key(name);
        self.powers.contains_key(&key) || self.aliases.contains_key(&key)
    }

    pub fn is_alias(&self, name: &str) -> bool {
        self.aliases.contains_key(&name_key(name))
    }

    /// Canonical power by exact canonical name.
    pub fn get_exact(&self, name: &str) -> Option<&Power> {
        self.powers.get(&name_key(name))
    }

    /// Resolve a name, alias or unique prefix. Ambiguous prefixes resolve
    /// to nothing.
    pub fn resolve(&self, name: &str) -> Option<&Power> {
        let key = name_key(name);
        if key.is_empty() {
            return None;
        }
        if let Some(power) = self.powers.get(&key) {
            return Some(power);
        }
        if let Some(alias) = self.aliases.get(&key) {
            return self.powers.get(&alias.target);
        }

        let mut found: Option<&str> = None;
        let candidates = prefix_keys(&self.powers, &key)
            .map(|(k, _)| k.as_str())
            .chain(prefix_keys(&self.aliases, &key).map(|(_, a)| a.target.as_str()));
        for candidate in candidates {
            match found {
                Some(existing) if existing != candidate => return None,
                _ => found = Some(candidate),
            }
        }
        found.and_then(|k| self.powers.get(k))
    }

    pub fn insert(&mut self, power: Power) {
        self.powers.insert(power.key(), power);
    }

    /// Remove a power by exact canonical name, along with its aliases.
    pub fn remove(&mut self, name: &str) -> Option<(Power, Vec<Alias>)> {
        let key = name_key(name);
        let power = self.powers.remove(&key)?;
        let alias_keys: Vec<String> = self
            .aliases
            .iter()
            .filter(|(_, alias)| alias.target == key)
            .map(|(k, _)| k.clone())
            .collect();
        let aliases = alias_keys
            .iter()
            .filter_map(|k| self.aliases.remove(k))
            .collect();
        Some((power, aliases))
    }

    pub fn insert_alias(&mut self, name: &str, target_key: String) {
        self.aliases.insert(
            name_key(name),
            Alias {
                name: name.trim().to_string(),
                target: target_key,
            },
        );
    }

    pub fn remove_alias(&mut self, name: &str) -> Option<Alias> {
        self.aliases.remove(&name_key(name))
    }

    pub fn aliases_of(&self, power: &Power) -> Vec<&str> {
        let key = power.key();
        self.aliases
            .values()
            .filter(|alias| alias.target == key)
            .map(|alias| alias.name.as_str())
            .collect()
    }

    /// Powers in case-insensitive name order.
    pub fn iter(&self) -> impl Iterator<Item = &Power> {
        self.powers.values()
    }

    pub fn aliases(&self) -> impl Iterator<Item = &Alias> {
        self.aliases.values()
    }
}
