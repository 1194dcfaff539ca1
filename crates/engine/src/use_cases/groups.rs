//! Power group administration: create, delete, empower, assign, unassign.
//!
//! A group's auto list never exceeds its ceiling: writing an auto tier
//! above the ceiling raises the ceiling with it, and lowering a ceiling
//! caps the auto tier.

use std::sync::Arc;

use divscope_domain::{split_tokens, Dbref, PowerToken, Tier};

use super::authorize::{Authorizer, EMPOWER, POWERGROUP};
use super::error::{AdminError, Denial, TokenOutcome, TokenReport};
use super::AuditTrail;
use crate::entities::{name_key, GroupList, Power, PowerSpace};
use crate::infrastructure::ports::{Notice, NotifySink};

pub struct GroupAdmin {
    auth: Arc<Authorizer>,
    notify: Arc<dyn NotifySink>,
    audit: AuditTrail,
}

impl GroupAdmin {
    pub fn new(auth: Arc<Authorizer>, notify: Arc<dyn NotifySink>, audit: AuditTrail) -> Self {
        Self {
            auth,
            notify,
            audit,
        }
    }

    fn require_powergroup(&self, space: &PowerSpace, actor: Dbref) -> Result<(), AdminError> {
        if self.auth.holds(space, actor, POWERGROUP) {
            Ok(())
        } else {
            Err(AdminError::missing_power(POWERGROUP))
        }
    }

    fn resolve(&self, space: &PowerSpace, name: &str) -> Result<String, AdminError> {
        space
            .resolve_group(name)
            .ok_or_else(|| AdminError::not_found("power group", name))
    }

    fn display_name(space: &PowerSpace, key: &str) -> String {
        space
            .group(key)
            .map_or_else(|| key.to_string(), |g| g.name.clone())
    }

    /// Create an empty group and return its key.
    pub fn create(
        &self,
        space: &mut PowerSpace,
        actor: Dbref,
        name: &str,
    ) -> Result<String, AdminError> {
        self.require_powergroup(space, actor)?;
        let key = space.create_group(name)?;
        tracing::info!(actor = %actor, group = name.trim(), "Power group created");
        self.audit
            .record(actor, actor, format!("POWERGROUP CREATE: {}", name.trim()));
        Ok(key)
    }

    /// Delete a group by exact name, first removing it from every holder.
    pub fn delete(
        &self,
        space: &mut PowerSpace,
        actor: Dbref,
        name: &str,
    ) -> Result<(), AdminError> {
        if !space.is_root(actor) {
            return Err(Denial::RootOnly.into());
        }
        if !space.groups().contains_exact(name.trim()) {
            return Err(AdminError::not_found("power group", name));
        }
        let key = name_key(name.trim());
        let holders = space.scopes().holders_of(&key);
        for holder in &holders {
            strip_group(space, *holder, &key);
        }
        space.remove_group_record(&key);
        tracing::info!(
            actor = %actor,
            group = name.trim(),
            holders = holders.len(),
            "Power group deleted"
        );
        self.audit
            .record(actor, actor, format!("POWERGROUP DELETE: {}", name.trim()));
        Ok(())
    }

    /// Apply a token list to one of a group's lists.
    pub fn empower(
        &self,
        space: &mut PowerSpace,
        actor: Dbref,
        group_name: &str,
        tokens: &str,
        list: GroupList,
    ) -> Result<TokenReport, AdminError> {
        self.require_powergroup(space, actor)?;
        let key = self.resolve(space, group_name)?;
        let auth = &self.auth;
        let report = empower_group(space, &key, tokens, list, |space, power| {
            auth.effective_tier(space, actor, power)
        });
        let applied = report.applied();
        if !applied.is_empty() {
            let listed: Vec<String> = applied.iter().map(ToString::to_string).collect();
            self.audit.record(
                actor,
                actor,
                format!(
                    "POWERGROUP {} {}: {}",
                    list,
                    Self::display_name(space, &key),
                    listed.join(", ")
                ),
            );
        }
        Ok(report)
    }

    /// Give `target` a group. With `auto_grant`, the group's auto tiers are
    /// raised into the target's own bits where the actor may empower it.
    pub fn assign(
        &self,
        space: &mut PowerSpace,
        actor: Dbref,
        target: Dbref,
        group_name: &str,
        auto_grant: bool,
    ) -> Result<(), AdminError> {
        let key = self.resolve(space, group_name)?;
        let group = Self::display_name(space, &key);
        self.check_control(space, actor, target)?;

        if !space.is_root(actor) && !eligible(&self.auth, space, target, &key) {
            return Err(Denial::NotEligible { group }.into());
        }
        self.check_ceiling(space, actor, target, &key, &group)?;
        if !space.record_mut(target).add_group(&key) {
            return Err(Denial::AlreadyAssigned { group }.into());
        }

        let mut raised = Vec::new();
        if auto_grant && self.auth.authorize(space, actor, target, EMPOWER) {
            let powers: Vec<Power> = space.powers().iter().cloned().collect();
            for power in &powers {
                let auto = space.group_tier(&key, power, GroupList::Auto);
                if auto > space.entity_tier(target, power) {
                    space.set_entity_tier(target, power, auto);
                    raised.push(PowerToken::new(power.name.clone(), auto));
                }
            }
        }

        tracing::info!(
            actor = %actor,
            target = %target,
            group = %group,
            raised = raised.len(),
            "Power group assigned"
        );
        self.audit
            .record(actor, target, format!("POWERGROUP ADD: {}", group));
        self.notify.notify(
            target,
            Notice::GroupAdded { group, by: actor },
        );
        if !raised.is_empty() {
            self.notify.notify(
                target,
                Notice::Empowered {
                    by: actor,
                    powers: raised,
                },
            );
        }
        Ok(())
    }

    /// Take a group away from `target`, lowering its own tiers to what the
    /// remaining groups still allow.
    pub fn unassign(
        &self,
        space: &mut PowerSpace,
        actor: Dbref,
        target: Dbref,
        group_name: &str,
    ) -> Result<(), AdminError> {
        let key = self.resolve(space, group_name)?;
        let group = Self::display_name(space, &key);
        self.check_control(space, actor, target)?;
        self.check_ceiling(space, actor, target, &key, &group)?;
        if !strip_group(space, target, &key) {
            return Err(Denial::NotAssigned { group }.into());
        }

        tracing::info!(actor = %actor, target = %target, group = %group, "Power group removed");
        self.audit
            .record(actor, target, format!("POWERGROUP REMOVE: {}", group));
        self.notify
            .notify(target, Notice::GroupRemoved { group, by: actor });
        Ok(())
    }

    /// Whether `target` may hold the named group.
    pub fn eligible(
        &self,
        space: &PowerSpace,
        target: Dbref,
        group_name: &str,
    ) -> Result<bool, AdminError> {
        let key = self.resolve(space, group_name)?;
        Ok(eligible(&self.auth, space, target, &key))
    }

    fn check_control(
        &self,
        space: &mut PowerSpace,
        actor: Dbref,
        target: Dbref,
    ) -> Result<(), AdminError> {
        if self.auth.same_owner(actor, target)
            || self.auth.authorize(space, actor, target, POWERGROUP)
        {
            Ok(())
        } else {
            Err(AdminError::missing_power(POWERGROUP))
        }
    }

    /// The actor must reach every ceiling tier of the group, unless it owns
    /// the target and holds the group itself.
    fn check_ceiling(
        &self,
        space: &PowerSpace,
        actor: Dbref,
        target: Dbref,
        key: &str,
        group: &str,
    ) -> Result<(), AdminError> {
        let holds_group = space.record(actor).is_some_and(|r| r.has_group(key));
        if self.auth.same_owner(actor, target) && holds_group {
            return Ok(());
        }
        for power in space.powers().iter() {
            let ceiling = space.group_tier(key, power, GroupList::Ceiling);
            if self.auth.effective_tier(space, actor, power) < ceiling {
                return Err(Denial::LacksCeilingPower {
                    power: power.name.clone(),
                    group: group.to_string(),
                }
                .into());
            }
        }
        Ok(())
    }
}

/// Apply `tokens` to a group's `list`, judging each against the tier
/// `actor_tier` reports for the actor.
pub(crate) fn empower_group(
    space: &mut PowerSpace,
    key: &str,
    tokens: &str,
    list: GroupList,
    actor_tier: impl Fn(&PowerSpace, &Power) -> Tier,
) -> TokenReport {
    let mut report = TokenReport::default();
    for raw in split_tokens(tokens) {
        let requested = match PowerToken::parse(raw) {
            Ok(token) => token,
            Err(e) => {
                report.push(TokenOutcome::Malformed {
                    message: e.to_string(),
                });
                continue;
            }
        };
        let Some(power) = space.power(&requested.name).cloned() else {
            report.push(TokenOutcome::UnknownPower {
                name: requested.name,
            });
            continue;
        };
        let token = PowerToken::new(power.name.clone(), requested.tier);
        let current = space.group_tier(key, &power, list);
        if token.tier == current {
            report.push(TokenOutcome::Unchanged { token });
            continue;
        }
        // Grants are judged at the requested tier; removal at the tier removed.
        let needed = if token.tier == Tier::No {
            current
        } else {
            token.tier
        };
        if actor_tier(space, &power) < needed {
            report.push(TokenOutcome::NotHeld { token });
            continue;
        }

        space.write_group_tier(key, &power, list, token.tier);
        match list {
            GroupList::Auto => {
                if space.group_tier(key, &power, GroupList::Ceiling) < token.tier {
                    space.write_group_tier(key, &power, GroupList::Ceiling, token.tier);
                }
            }
            GroupList::Ceiling => {
                if space.group_tier(key, &power, GroupList::Auto) > token.tier {
                    space.write_group_tier(key, &power, GroupList::Auto, token.tier);
                }
            }
        }
        report.push(TokenOutcome::Applied { token });
    }
    report
}

/// Remove group `key` from `target` and lower the target's own tiers to the
/// best ceiling its remaining groups allow. Returns false if it was not held.
pub(crate) fn strip_group(space: &mut PowerSpace, target: Dbref, key: &str) -> bool {
    let removed = space
        .scopes()
        .get(target)
        .is_some_and(|r| r.has_group(key));
    if !removed {
        return false;
    }
    space.record_mut(target).remove_group(key);

    let powers: Vec<Power> = space.powers().iter().cloned().collect();
    for power in &powers {
        let ceiling = space.effective_ceiling(target, power);
        if space.entity_tier(target, power) > ceiling {
            space.set_entity_tier(target, power, ceiling);
        }
    }
    true
}

/// Whether `target` may hold group `key` under its current division.
pub(crate) fn eligible(auth: &Authorizer, space: &PowerSpace, target: Dbref, key: &str) -> bool {
    if auth.is_player(target) && key == name_key(&space.config().default_group) {
        return true;
    }
    let Some(division) = space.division_of(target) else {
        return false;
    };
    if space.record(division).is_some_and(|r| r.has_group(key)) {
        return true;
    }
    space.powers().iter().all(|power| {
        space.entity_tier(division, power) >= space.group_tier(key, power, GroupList::Ceiling)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::config::EngineConfig;
    use crate::test_fixtures::{FakeWorld, RecordingAudit, RecordingNotify};
    use chrono::Utc;
    use divscope_domain::Comparator;

    fn d(n: u32) -> Dbref {
        Dbref::new(n)
    }

    struct Fixture {
        space: PowerSpace,
        admin: GroupAdmin,
        notify: Arc<RecordingNotify>,
        audit: Arc<RecordingAudit>,
        boot: Power,
        hide: Power,
    }

    /// Root #1, players #2 and #3, division #10 owned by root.
    fn fixture() -> Fixture {
        let world = FakeWorld::new();
        world.player(d(1));
        world.player(d(2));
        world.player(d(3));
        world.division(d(10), d(1));
        let notify = Arc::new(RecordingNotify::default());
        let audit = Arc::new(RecordingAudit::default());
        let admin = GroupAdmin::new(
            Arc::new(Authorizer::new(Arc::new(world))),
            notify.clone(),
            AuditTrail::new(audit.clone(), Arc::new(FixedClock(Utc::now()))),
        );
        let mut space = PowerSpace::new(EngineConfig::default());
        let boot = space.register_power("Boot", Comparator::LevelCheck).unwrap();
        let hide = space.register_power("Hide", Comparator::SelfOnly).unwrap();
        space
            .register_power("Powergroup", Comparator::LevelCheck)
            .unwrap();
        space.register_power("Empower", Comparator::LevelCheck).unwrap();
        for who in [2, 3] {
            space.set_division(d(who), Some(d(10)));
        }
        Fixture {
            space,
            admin,
            notify,
            audit,
            boot,
            hide,
        }
    }

    #[test]
    fn create_requires_powergroup() {
        let mut f = fixture();
        let err = f.admin.create(&mut f.space, d(2), "Staff").unwrap_err();
        assert!(err.is_denied());

        let key = f.admin.create(&mut f.space, d(1), "Staff").unwrap();
        assert_eq!(key, "STAFF");
        assert_eq!(f.audit.actions(), vec!["POWERGROUP CREATE: Staff"]);
    }

    #[test]
    fn auto_tier_raises_ceiling() {
        let mut f = fixture();
        let key = f.space.create_group("Staff").unwrap();
        let report = f
            .admin
            .empower(&mut f.space, d(1), "staff", "Boot:LTE", GroupList::Auto)
            .unwrap();
        assert!(report.any_applied());
        assert_eq!(
            f.space.group_tier(&key, &f.boot, GroupList::Ceiling),
            Tier::YesLte
        );
        assert_eq!(f.space.group_tier(&key, &f.boot, GroupList::Auto), Tier::YesLte);
    }

    #[test]
    fn lowering_ceiling_caps_auto() {
        let mut f = fixture();
        let key = f.space.create_group("Staff").unwrap();
        f.admin
            .empower(&mut f.space, d(1), "Staff", "Boot Hide", GroupList::Auto)
            .unwrap();
        f.admin
            .empower(&mut f.space, d(1), "Staff", "Boot:LT !Hide", GroupList::Ceiling)
            .unwrap();

        assert_eq!(f.space.group_tier(&key, &f.boot, GroupList::Auto), Tier::YesLt);
        assert_eq!(f.space.group_tier(&key, &f.hide, GroupList::Auto), Tier::No);
        assert_eq!(f.space.group_tier(&key, &f.hide, GroupList::Ceiling), Tier::No);
    }

    #[test]
    fn token_outcomes_are_reported_in_order() {
        let mut f = fixture();
        let key = f.space.create_group("Staff").unwrap();
        f.space
            .write_group_tier(&key, &f.hide, GroupList::Ceiling, Tier::Yes);

        let report = empower_group(
            &mut f.space,
            &key,
            "Hide Nothing Boot:maybe Boot:LT",
            GroupList::Ceiling,
            |_, _| Tier::YesLt,
        );
        assert!(matches!(report.outcomes[0], TokenOutcome::Unchanged { .. }));
        assert!(matches!(report.outcomes[1], TokenOutcome::UnknownPower { .. }));
        assert!(matches!(report.outcomes[2], TokenOutcome::Malformed { .. }));
        assert!(report.outcomes[3].is_applied());

        let report = empower_group(&mut f.space, &key, "!Hide Boot", GroupList::Ceiling, |_, _| {
            Tier::YesLt
        });
        assert!(matches!(report.outcomes[0], TokenOutcome::NotHeld { .. }));
        assert!(matches!(report.outcomes[1], TokenOutcome::NotHeld { .. }));
    }

    #[test]
    fn lowering_to_the_actors_own_tier_is_allowed() {
        let mut f = fixture();
        let key = f.space.create_group("Staff").unwrap();
        f.space
            .write_group_tier(&key, &f.boot, GroupList::Ceiling, Tier::Yes);
        let pg = f.space.power("Powergroup").cloned().unwrap();
        f.space.set_entity_tier(d(2), &pg, Tier::Yes);
        f.space.set_entity_tier(d(2), &f.boot, Tier::YesLt);

        let report = f
            .admin
            .empower(&mut f.space, d(2), "Staff", "Boot:LT", GroupList::Ceiling)
            .unwrap();
        assert_eq!(
            report.outcomes,
            vec![TokenOutcome::Applied {
                token: PowerToken::new("Boot", Tier::YesLt)
            }]
        );
        assert_eq!(
            f.space.group_tier(&key, &f.boot, GroupList::Ceiling),
            Tier::YesLt
        );

        // Removing outright still needs the tier being removed.
        f.space
            .write_group_tier(&key, &f.boot, GroupList::Ceiling, Tier::Yes);
        let report = f
            .admin
            .empower(&mut f.space, d(2), "Staff", "!Boot", GroupList::Ceiling)
            .unwrap();
        assert!(matches!(report.outcomes[0], TokenOutcome::NotHeld { .. }));
        assert_eq!(f.space.group_tier(&key, &f.boot, GroupList::Ceiling), Tier::Yes);
    }

    #[test]
    fn root_assign_auto_grants() {
        let mut f = fixture();
        let key = f.space.create_group("Wizard").unwrap();
        f.admin
            .empower(&mut f.space, d(1), "Wizard", "Boot:LTE Hide", GroupList::Auto)
            .unwrap();

        f.admin
            .assign(&mut f.space, d(1), d(2), "Wizard", true)
            .unwrap();

        assert!(f.space.groups_of(d(2)).contains(&key));
        assert_eq!(f.space.entity_tier(d(2), &f.boot), Tier::YesLte);
        assert_eq!(f.space.entity_tier(d(2), &f.hide), Tier::Yes);
        let notices = f.notify.for_recipient(d(2));
        assert_eq!(notices.len(), 2);
        assert!(matches!(notices[1], Notice::Empowered { .. }));
    }

    #[test]
    fn assign_refuses_duplicates_and_ineligible_targets() {
        let mut f = fixture();
        f.space.create_group("Wizard").unwrap();
        f.admin
            .empower(&mut f.space, d(1), "Wizard", "Boot", GroupList::Ceiling)
            .unwrap();
        let pg = f.space.power("Powergroup").cloned().unwrap();
        f.space.set_entity_tier(d(2), &pg, Tier::Yes);

        // Division #10 does not cover Boot.
        let err = f
            .admin
            .assign(&mut f.space, d(2), d(3), "Wizard", false)
            .unwrap_err();
        assert!(matches!(
            err,
            AdminError::Denied(Denial::NotEligible { .. })
        ));

        f.admin
            .assign(&mut f.space, d(1), d(3), "Wizard", false)
            .unwrap();
        let err = f
            .admin
            .assign(&mut f.space, d(1), d(3), "Wizard", false)
            .unwrap_err();
        assert!(matches!(
            err,
            AdminError::Denied(Denial::AlreadyAssigned { .. })
        ));
    }

    #[test]
    fn assign_needs_ceiling_powers() {
        let mut f = fixture();
        f.space.create_group("Wizard").unwrap();
        f.admin
            .empower(&mut f.space, d(1), "Wizard", "Boot", GroupList::Ceiling)
            .unwrap();
        let boot = f.boot.clone();
        f.space.set_entity_tier(d(10), &boot, Tier::Yes);
        let pg = f.space.power("Powergroup").cloned().unwrap();
        f.space.set_entity_tier(d(2), &pg, Tier::Yes);

        let err = f
            .admin
            .assign(&mut f.space, d(2), d(3), "Wizard", false)
            .unwrap_err();
        assert!(matches!(
            err,
            AdminError::Denied(Denial::LacksCeilingPower { .. })
        ));

        f.space.set_entity_tier(d(2), &boot, Tier::Yes);
        assert!(f
            .admin
            .assign(&mut f.space, d(2), d(3), "Wizard", false)
            .is_ok());
    }

    #[test]
    fn default_group_is_always_eligible_for_players() {
        let mut f = fixture();
        f.space.create_group("Player").unwrap();
        f.admin
            .empower(&mut f.space, d(1), "Player", "Hide", GroupList::Ceiling)
            .unwrap();
        f.space.set_division(d(3), None);

        assert!(f.admin.eligible(&f.space, d(3), "Player").unwrap());
        assert!(!f.admin.eligible(&f.space, d(10), "Player").unwrap());
    }

    #[test]
    fn unassign_lowers_to_remaining_ceiling() {
        let mut f = fixture();
        f.space.create_group("Wizard").unwrap();
        f.space.create_group("Staff").unwrap();
        f.admin
            .empower(&mut f.space, d(1), "Wizard", "Boot Hide", GroupList::Auto)
            .unwrap();
        f.admin
            .empower(&mut f.space, d(1), "Staff", "Boot:LT", GroupList::Ceiling)
            .unwrap();
        f.admin
            .assign(&mut f.space, d(1), d(2), "Wizard", true)
            .unwrap();
        f.admin
            .assign(&mut f.space, d(1), d(2), "Staff", false)
            .unwrap();

        f.admin
            .unassign(&mut f.space, d(1), d(2), "Wizard")
            .unwrap();

        assert_eq!(f.space.entity_tier(d(2), &f.boot), Tier::YesLt);
        assert_eq!(f.space.entity_tier(d(2), &f.hide), Tier::No);
        let err = f
            .admin
            .unassign(&mut f.space, d(1), d(2), "Wizard")
            .unwrap_err();
        assert!(matches!(err, AdminError::Denied(Denial::NotAssigned { .. })));
    }

    #[test]
    fn delete_is_root_only_and_strips_holders() {
        let mut f = fixture();
        f.space.create_group("Wizard").unwrap();
        f.admin
            .empower(&mut f.space, d(1), "Wizard", "Hide", GroupList::Auto)
            .unwrap();
        f.admin
            .assign(&mut f.space, d(1), d(2), "Wizard", true)
            .unwrap();

        let err = f.admin.delete(&mut f.space, d(2), "Wizard").unwrap_err();
        assert!(matches!(err, AdminError::Denied(Denial::RootOnly)));
        assert!(f.admin.delete(&mut f.space, d(1), "Wiz").is_err());

        f.admin.delete(&mut f.space, d(1), "wizard").unwrap();
        assert!(f.space.groups_of(d(2)).is_empty());
        assert_eq!(f.space.entity_tier(d(2), &f.hide), Tier::No);
        assert!(f.space.resolve_group("Wizard").is_none());
    }
}
