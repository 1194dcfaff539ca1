//! The single owned registry of powers, groups and scope records.

use divscope_domain::{validate_name, Comparator, Dbref, PowerToken, Rank, Tier};

use super::allocator::BitAllocator;
use super::bitset::CapabilityBitset;
use super::power::{Power, PowerBits, PowerTable};
use super::power_group::{GroupList, GroupTable, PowerGroup};
use super::scope::{ScopeRecord, ScopeTable};
use super::RegistryError;
use crate::infrastructure::config::EngineConfig;

/// All authorization state of one game.
///
/// Every capability bitset reachable from here (entity bits, group ceilings
/// and group auto lists) has exactly `allocator.byte_len()` bytes once it
/// exists. Registering a power that needs more room grows all of them
/// before the power becomes visible.
#[derive(Debug)]
pub struct PowerSpace {
    config: EngineConfig,
    allocator: BitAllocator,
    powers: PowerTable,
    groups: GroupTable,
    scopes: ScopeTable,
}

impl PowerSpace {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            allocator: BitAllocator::new(),
            powers: PowerTable::new(),
            groups: GroupTable::new(),
            scopes: ScopeTable::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn root(&self) -> Dbref {
        self.config.root
    }

    pub fn is_root(&self, dbref: Dbref) -> bool {
        dbref == self.config.root
    }

    pub fn byte_len(&self) -> usize {
        self.allocator.byte_len()
    }

    pub fn allocator(&self) -> &BitAllocator {
        &self.allocator
    }

    pub fn powers(&self) -> &PowerTable {
        &self.powers
    }

    pub fn groups(&self) -> &GroupTable {
        &self.groups
    }

    pub fn scopes(&self) -> &ScopeTable {
        &self.scopes
    }

    // =========================================================================
    // Powers
    // =========================================================================

    /// Resolve a power by name, alias or unique prefix.
    pub fn power(&self, name: &str) -> Option<&Power> {
        self.powers.resolve(name)
    }

    pub fn register_power(
        &mut self,
        name: &str,
        comparator: Comparator,
    ) -> Result<Power, RegistryError> {
        let name = name.trim();
        validate_name(name, "power name")?;
        if self.powers.is_taken(name) {
            return Err(RegistryError::duplicate("power", name));
        }

        let planned = self.allocator.plan(PowerBits::needed(comparator));
        let bits = PowerBits::from_plan(comparator, &planned)
            .ok_or_else(|| RegistryError::Allocation { bytes: self.byte_len() })?;
        let positions = bits.positions();
        self.grow_to(self.allocator.required_len(&positions))?;
        self.allocator.claim(&positions);

        let power = Power {
            name: name.to_string(),
            comparator,
            bits,
        };
        self.powers.insert(power.clone());
        tracing::debug!(
            power = %power.name,
            comparator = %comparator,
            yes = bits.yes,
            lte = bits.lte,
            lt = bits.lt,
            "Registered power"
        );
        Ok(power)
    }

    /// Remove a power by exact canonical name, scrubbing its bits from every
    /// entity and group. Unknown names are a no-op.
    pub fn unregister_power(&mut self, name: &str) -> Option<Power> {
        let (power, aliases) = self.powers.remove(name)?;

        for (_, record) in self.scopes.iter_mut() {
            if let Some(bits) = record.powers.as_mut() {
                power.bits.reset(bits);
            }
            record.release_if_clear();
        }
        for group in self.groups.iter_mut() {
            power.bits.reset(&mut group.ceiling);
            power.bits.reset(&mut group.auto);
        }
        self.allocator.release(&power.bits.positions());

        tracing::info!(power = %power.name, aliases = aliases.len(), "Unregistered power");
        Some(power)
    }

    /// Add `alias` as another name of `power_name`.
    pub fn add_alias(&mut self, power_name: &str, alias: &str) -> Result<(), RegistryError> {
        let alias = alias.trim();
        validate_name(alias, "alias")?;
        let target = self
            .powers
            .resolve(power_name)
            .ok_or_else(|| RegistryError::not_found("power", power_name))?
            .key();

        if self.powers.is_taken(alias) {
            let existing = self.powers.resolve(alias).map(Power::key);
            if existing.as_deref() == Some(target.as_str()) {
                return Ok(());
            }
        }
        if let Some(existing) = self.powers.resolve(alias) {
            if existing.key() != target {
                return Err(RegistryError::AliasConflict {
                    alias: alias.to_string(),
                    existing: existing.name.clone(),
                });
            }
        }

        self.powers.insert_alias(alias, target);
        tracing::debug!(alias, power = power_name, "Added power alias");
        Ok(())
    }

    pub fn remove_alias(&mut self, alias: &str) -> Result<(), RegistryError> {
        if self.powers.get_exact(alias).is_some() {
            return Err(RegistryError::NotAnAlias(alias.trim().to_string()));
        }
        self.powers
            .remove_alias(alias)
            .map(|_| ())
            .ok_or_else(|| RegistryError::not_found("alias", alias))
    }

    /// Grow every bitset to `len` bytes, or change nothing.
    fn grow_to(&mut self, len: usize) -> Result<(), RegistryError> {
        let current = self.allocator.byte_len();
        if len <= current {
            return Ok(());
        }
        let failed = |_| RegistryError::Allocation { bytes: len };

        for group in self.groups.iter_mut() {
            group.ceiling.reserve_to(len).map_err(failed)?;
            group.auto.reserve_to(len).map_err(failed)?;
        }
        for (_, record) in self.scopes.iter_mut() {
            if let Some(bits) = record.powers.as_mut() {
                bits.reserve_to(len).map_err(failed)?;
            }
        }

        for group in self.groups.iter_mut() {
            group.ceiling.extend_to(len);
            group.auto.extend_to(len);
        }
        for (_, record) in self.scopes.iter_mut() {
            if let Some(bits) = record.powers.as_mut() {
                bits.extend_to(len);
            }
        }
        tracing::debug!(from = current, to = len, "Grew capability bitsets");
        Ok(())
    }

    /// Every power held above `No` in `bits`, in name order.
    pub fn tier_list(&self, bits: Option<&CapabilityBitset>) -> Vec<PowerToken> {
        let Some(bits) = bits else {
            return Vec::new();
        };
        self.powers
            .iter()
            .filter_map(|power| {
                let tier = power.bits.tier_in(Some(bits));
                tier.is_granted()
                    .then(|| PowerToken::new(power.name.clone(), tier))
            })
            .collect()
    }

    // =========================================================================
    // Groups
    // =========================================================================

    /// Create an empty group and return its key.
    pub fn create_group(&mut self, name: &str) -> Result<String, RegistryError> {
        let name = name.trim();
        validate_name(name, "power group name")?;
        if self.groups.contains_exact(name) {
            return Err(RegistryError::duplicate("power group", name));
        }
        let group = PowerGroup::new(name, self.byte_len());
        let key = group.key();
        self.groups.insert(group);
        tracing::debug!(group = name, "Created power group");
        Ok(key)
    }

    /// Exact key, else a unique prefix.
    pub fn resolve_group(&self, name: &str) -> Option<String> {
        self.groups.resolve_key(name)
    }

    pub fn group(&self, key: &str) -> Option<&PowerGroup> {
        self.groups.get(key)
    }

    /// Drop a group from the table. Holders must already have been stripped.
    pub fn remove_group_record(&mut self, key: &str) -> Option<PowerGroup> {
        self.groups.remove(key)
    }

    pub fn group_tier(&self, key: &str, power: &Power, list: GroupList) -> Tier {
        self.groups
            .get(key)
            .map_or(Tier::No, |group| power.bits.tier_in(Some(group.list(list))))
    }

    /// Store a tier on one of a group's lists without any policy checks.
    pub fn write_group_tier(&mut self, key: &str, power: &Power, list: GroupList, tier: Tier) {
        if let Some(group) = self.groups.get_mut(key) {
            power.bits.write(group.list_mut(list), tier);
        }
    }

    // =========================================================================
    // Scope records
    // =========================================================================

    pub fn record(&self, dbref: Dbref) -> Option<&ScopeRecord> {
        self.scopes.get(dbref)
    }

    /// Record for `dbref`, created at the default rank if missing.
    pub fn record_mut(&mut self, dbref: Dbref) -> &mut ScopeRecord {
        self.scopes.entry(dbref, self.config.default_rank)
    }

    pub fn insert_record(&mut self, dbref: Dbref, record: ScopeRecord) {
        self.scopes.insert(dbref, record);
    }

    pub fn drop_record(&mut self, dbref: Dbref) -> Option<ScopeRecord> {
        self.scopes.remove(dbref)
    }

    pub fn division_of(&self, dbref: Dbref) -> Option<Dbref> {
        self.scopes.get(dbref).and_then(|r| r.division)
    }

    pub fn set_division(&mut self, dbref: Dbref, division: Option<Dbref>) {
        self.record_mut(dbref).division = division;
    }

    /// Rank of `dbref`; root always holds the top rank.
    pub fn rank_of(&self, dbref: Dbref) -> Rank {
        if self.is_root(dbref) {
            return self.config.max_rank;
        }
        self.scopes
            .get(dbref)
            .map_or(self.config.default_rank, |r| r.rank)
    }

    pub fn set_rank(&mut self, dbref: Dbref, rank: Rank) {
        self.record_mut(dbref).rank = rank;
    }

    pub fn groups_of(&self, dbref: Dbref) -> &[String] {
        self.scopes
            .get(dbref)
            .map_or(&[][..], |r| r.groups.as_slice())
    }

    /// Tier stored in the entity's own bits.
    pub fn entity_tier(&self, dbref: Dbref, power: &Power) -> Tier {
        power
            .bits
            .tier_in(self.scopes.get(dbref).and_then(|r| r.powers.as_ref()))
    }

    pub fn set_entity_tier(&mut self, dbref: Dbref, power: &Power, tier: Tier) {
        let byte_len = self.byte_len();
        let record = self.record_mut(dbref);
        match record.powers.as_mut() {
            Some(bits) => power.bits.write(bits, tier),
            None if tier.is_granted() => {
                let mut bits = CapabilityBitset::zeroed(byte_len);
                power.bits.write(&mut bits, tier);
                record.powers = Some(bits);
            }
            None => {}
        }
        record.release_if_clear();
    }

    pub fn clear_entity_powers(&mut self, dbref: Dbref) {
        if let Some(record) = self.scopes.get_mut(dbref) {
            record.powers = None;
        }
    }

    /// Highest tier any of the entity's groups allows for `power`.
    pub fn effective_ceiling(&self, dbref: Dbref, power: &Power) -> Tier {
        if self.is_root(dbref) {
            return Tier::Yes;
        }
        self.groups_of(dbref)
            .iter()
            .map(|key| self.group_tier(key, power, GroupList::Ceiling))
            .max()
            .unwrap_or(Tier::No)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn space() -> PowerSpace {
        PowerSpace::new(EngineConfig::default())
    }

    #[test]
    fn graded_powers_take_three_bits_others_one() {
        let mut space = space();
        let boot = space.register_power("Boot", Comparator::LevelCheck).unwrap();
        let hide = space.register_power("Hide", Comparator::SelfOnly).unwrap();

        assert_eq!(boot.bits.positions(), vec![0, 1, 2]);
        assert_eq!(hide.bits.positions(), vec![3]);
        assert_eq!(space.byte_len(), 1);
    }

    #[test]
    fn duplicate_and_bad_names_are_rejected() {
        let mut space = space();
        space.register_power("Boot", Comparator::LevelCheck).unwrap();
        assert!(matches!(
            space.register_power("BOOT", Comparator::SelfOnly),
            Err(RegistryError::Duplicate { .. })
        ));
        assert!(matches!(
            space.register_power("B", Comparator::SelfOnly),
            Err(RegistryError::InvalidName(_))
        ));
        assert!(space.register_power("Two Words", Comparator::SelfOnly).is_err());
    }

    #[test]
    fn growth_preserves_existing_tiers() {
        let mut space = space();
        let boot = space.register_power("Boot", Comparator::LevelCheck).unwrap();
        let group = space.create_group("Staff").unwrap();
        let who = Dbref::new(7);
        space.set_entity_tier(who, &boot, Tier::YesLte);
        space.write_group_tier(&group, &boot, GroupList::Ceiling, Tier::Yes);

        for i in 0..10 {
            space
                .register_power(&format!("Extra{}", i), Comparator::LevelCheck)
                .unwrap();
        }

        assert!(space.byte_len() > 1);
        assert_eq!(space.entity_tier(who, &boot), Tier::YesLte);
        assert_eq!(space.group_tier(&group, &boot, GroupList::Ceiling), Tier::Yes);
        let len = space.byte_len();
        assert_eq!(space.group(&group).unwrap().ceiling.len(), len);
        assert_eq!(space.group(&group).unwrap().auto.len(), len);
        assert_eq!(space.record(who).unwrap().powers.as_ref().unwrap().len(), len);
    }

    #[test]
    fn unregister_scrubs_bits_and_frees_positions() {
        let mut space = space();
        let boot = space.register_power("Boot", Comparator::LevelCheck).unwrap();
        let group = space.create_group("Staff").unwrap();
        let who = Dbref::new(7);
        space.set_entity_tier(who, &boot, Tier::Yes);
        space.write_group_tier(&group, &boot, GroupList::Auto, Tier::YesLt);
        space.add_alias("Boot", "Kick").unwrap();

        assert!(space.unregister_power("Boot").is_some());
        assert!(space.power("Kick").is_none());
        assert!(space.record(who).unwrap().powers.is_none());
        assert!(space.group(&group).unwrap().auto.is_clear());

        let next = space.register_power("Hide", Comparator::SelfOnly).unwrap();
        assert_eq!(next.bits.yes, 0);
        assert!(space.unregister_power("Nothing").is_none());
    }

    #[test]
    fn alias_conflicts_are_detected() {
        let mut space = space();
        space.register_power("Boot", Comparator::LevelCheck).unwrap();
        space.register_power("Hide", Comparator::SelfOnly).unwrap();

        space.add_alias("Boot", "Kick").unwrap();
        space.add_alias("Boot", "kick").unwrap();
        assert!(matches!(
            space.add_alias("Hide", "Kick"),
            Err(RegistryError::AliasConflict { .. })
        ));
        assert!(matches!(
            space.add_alias("Hide", "Boot"),
            Err(RegistryError::AliasConflict { .. })
        ));
        assert!(matches!(
            space.add_alias("Nope", "Other"),
            Err(RegistryError::NotFound { .. })
        ));
    }

    #[test]
    fn alias_removal_refuses_canonical_names() {
        let mut space = space();
        space.register_power("Boot", Comparator::LevelCheck).unwrap();
        space.add_alias("Boot", "Kick").unwrap();

        assert!(matches!(
            space.remove_alias("Boot"),
            Err(RegistryError::NotAnAlias(_))
        ));
        space.remove_alias("kick").unwrap();
        assert!(space.power("Kick").is_none());
        assert!(space.remove_alias("Kick").is_err());
    }

    #[test]
    fn root_rank_and_ceiling() {
        let mut space = space();
        let boot = space.register_power("Boot", Comparator::LevelCheck).unwrap();
        assert_eq!(space.rank_of(space.root()), Rank::MAX_LEVEL);
        assert_eq!(space.rank_of(Dbref::new(40)), Rank::GUEST);
        assert_eq!(space.effective_ceiling(space.root(), &boot), Tier::Yes);
        assert_eq!(space.effective_ceiling(Dbref::new(40), &boot), Tier::No);
    }

    #[test]
    fn effective_ceiling_is_max_over_groups() {
        let mut space = space();
        let boot = space.register_power("Boot", Comparator::LevelCheck).unwrap();
        let low = space.create_group("Low").unwrap();
        let high = space.create_group("High").unwrap();
        space.write_group_tier(&low, &boot, GroupList::Ceiling, Tier::YesLt);
        space.write_group_tier(&high, &boot, GroupList::Ceiling, Tier::YesLte);

        let who = Dbref::new(9);
        space.record_mut(who).add_group(&low);
        assert_eq!(space.effective_ceiling(who, &boot), Tier::YesLt);
        space.record_mut(who).add_group(&high);
        assert_eq!(space.effective_ceiling(who, &boot), Tier::YesLte);
    }
}
