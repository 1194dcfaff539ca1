//! Authorization decisions.
//!
//! `authorize` is the single grant check used by every other operation:
//! the actor's tier for a power, whether the target sits under the actor's
//! division, and the power's comparator. When that fails and the actor
//! borrows its owner's powers, the owner's tier and scope are tried with
//! the comparator still judging the original actor and target.

use std::collections::BTreeSet;
use std::sync::Arc;

use divscope_domain::{Comparator, Dbref, EntityKind, Tier};

use crate::entities::{Power, PowerSpace};
use crate::infrastructure::ports::ObjectDirectory;

pub const ATTACH: &str = "Attach";
pub const BUILDER: &str = "Builder";
pub const DIVISION: &str = "Division";
pub const EMPOWER: &str = "Empower";
pub const LEVEL: &str = "Level";
pub const POWERGROUP: &str = "Powergroup";
pub const SITE: &str = "Site";

pub struct Authorizer {
    directory: Arc<dyn ObjectDirectory>,
}

impl Authorizer {
    pub fn new(directory: Arc<dyn ObjectDirectory>) -> Self {
        Self { directory }
    }

    pub fn directory(&self) -> &dyn ObjectDirectory {
        self.directory.as_ref()
    }

    pub fn is_division(&self, dbref: Dbref) -> bool {
        self.directory.kind(dbref).is_some_and(EntityKind::is_division)
    }

    pub fn is_player(&self, dbref: Dbref) -> bool {
        self.directory.kind(dbref).is_some_and(EntityKind::is_player)
    }

    /// Owner of `dbref`; objects without a recorded owner own themselves.
    pub fn owner_of(&self, dbref: Dbref) -> Dbref {
        self.directory.owner(dbref).unwrap_or(dbref)
    }

    pub fn same_owner(&self, a: Dbref, b: Dbref) -> bool {
        self.owner_of(a) == self.owner_of(b)
    }

    // =========================================================================
    // Scope containment
    // =========================================================================

    /// Division node standing for `dbref` in scope checks.
    fn scope_node(&self, space: &PowerSpace, dbref: Dbref) -> Option<Dbref> {
        if self.is_division(dbref) {
            Some(dbref)
        } else {
            space.division_of(dbref)
        }
    }

    /// Whether `scopee` sits in `scoper`'s part of the division tree.
    /// Invalid objects are in no one's scope, root's included.
    ///
    /// A parent link that loops back onto the walk is cut (set to none)
    /// and logged, and the walk ends there.
    pub fn scope_contains(&self, space: &mut PowerSpace, scoper: Dbref, scopee: Dbref) -> bool {
        if !self.directory.is_valid(scopee) {
            return false;
        }
        if space.is_root(scoper) || scoper == scopee {
            return true;
        }
        let Some(governing) = self.scope_node(space, scoper) else {
            return false;
        };
        // Entities outside the tree sit at its bottom.
        let Some(mut node) = self.scope_node(space, scopee) else {
            return true;
        };

        let mut visited = BTreeSet::new();
        loop {
            if node == governing {
                return true;
            }
            visited.insert(node);
            match space.division_of(node) {
                None => return false,
                Some(parent) if parent == node || visited.contains(&parent) => {
                    tracing::warn!(
                        scoper = %scoper,
                        scopee = %scopee,
                        division = %node,
                        parent = %parent,
                        "Bad parent division link, corrected"
                    );
                    space.set_division(node, None);
                    return false;
                }
                Some(parent) => node = parent,
            }
        }
    }

    // =========================================================================
    // Grant check
    // =========================================================================

    /// Can `actor` use `power_name` over `target`?
    pub fn authorize(
        &self,
        space: &mut PowerSpace,
        actor: Dbref,
        target: Dbref,
        power_name: &str,
    ) -> bool {
        if space.is_root(actor) {
            return true;
        }
        match space.power(power_name).cloned() {
            Some(power) => self.authorize_power(space, actor, target, &power),
            None => {
                tracing::debug!(power = power_name, "Authorization against unknown power");
                false
            }
        }
    }

    pub fn authorize_power(
        &self,
        space: &mut PowerSpace,
        actor: Dbref,
        target: Dbref,
        power: &Power,
    ) -> bool {
        if space.is_root(actor) {
            return true;
        }
        let mut holder = actor;
        for _ in 0..=space.config().max_inherit_depth {
            let tier = space.entity_tier(holder, power);
            if self.scope_contains(space, holder, target)
                && tier.is_granted()
                && self.judge(space, power.comparator, tier, actor, target)
            {
                return true;
            }
            match self.inherited_from(space, holder) {
                Some(owner) => holder = owner,
                None => return false,
            }
        }
        tracing::warn!(actor = %actor, power = %power.name, "Owner chain too deep, denying");
        false
    }

    /// Owner whose powers `holder` may borrow, if any. Root never lends.
    fn inherited_from(&self, space: &PowerSpace, holder: Dbref) -> Option<Dbref> {
        let owner = self.directory.owner(holder)?;
        if owner == holder || !self.directory.inherits_owner_powers(holder) {
            return None;
        }
        if space.is_root(owner) {
            return None;
        }
        Some(owner)
    }

    /// Highest tier `actor` can bring to bear on `power`, its own or one
    /// borrowed along the owner chain.
    pub fn effective_tier(&self, space: &PowerSpace, actor: Dbref, power: &Power) -> Tier {
        if space.is_root(actor) {
            return Tier::Yes;
        }
        let mut best = space.entity_tier(actor, power);
        let mut holder = actor;
        for _ in 0..space.config().max_inherit_depth {
            match self.inherited_from(space, holder) {
                Some(owner) => {
                    holder = owner;
                    best = best.max(space.entity_tier(holder, power));
                }
                None => break,
            }
        }
        best
    }

    /// Whether `dbref` holds `power_name` at all, ignoring targets.
    pub fn holds(&self, space: &PowerSpace, dbref: Dbref, power_name: &str) -> bool {
        if space.is_root(dbref) {
            return true;
        }
        space
            .power(power_name)
            .is_some_and(|power| space.entity_tier(dbref, power).is_granted())
    }

    /// Run `comparator` for `who` acting on `what` at `tier`.
    pub fn judge(
        &self,
        space: &mut PowerSpace,
        comparator: Comparator,
        tier: Tier,
        who: Dbref,
        what: Dbref,
    ) -> bool {
        match comparator {
            Comparator::SelfOnly => who == what,
            Comparator::LevelCheck => self.level_check(space, tier, who, what),
            Comparator::LevelCheckLte => {
                space.rank_of(who) >= space.rank_of(what) || (tier.is_granted() && who == what)
            }
            Comparator::LevelSet => {
                self.level_check(space, tier, who, what)
                    && (!self.is_division(what) || self.authorize(space, who, who, DIVISION))
            }
            Comparator::BuilderCreate => {
                self.authorize(space, who, who, BUILDER) && space.rank_of(who) >= space.rank_of(what)
            }
        }
    }

    fn level_check(&self, space: &PowerSpace, tier: Tier, who: Dbref, what: Dbref) -> bool {
        if tier.is_granted() && who == what {
            return true;
        }
        let (mine, theirs) = (space.rank_of(who), space.rank_of(what));
        match tier {
            Tier::Yes => true,
            Tier::YesLte => mine >= theirs,
            Tier::YesLt => mine > theirs || (mine == theirs && self.same_owner(who, what)),
            Tier::No => false,
        }
    }
}
