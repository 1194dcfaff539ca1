//! Division tree operations: create, reparent, clear and delete, plus the
//! hooks the host calls when objects are created or destroyed.

use std::sync::Arc;

use divscope_domain::{Dbref, EntityKind};

use super::authorize::{Authorizer, ATTACH, DIVISION};
use super::error::{AdminError, Denial};
use super::groups::{eligible, strip_group};
use super::AuditTrail;
use crate::entities::{PowerSpace, ScopeRecord};
use crate::infrastructure::ports::{EconomyPort, Notice, NotifySink};

pub struct DivisionAdmin {
    auth: Arc<Authorizer>,
    economy: Arc<dyn EconomyPort>,
    notify: Arc<dyn NotifySink>,
    audit: AuditTrail,
}

impl DivisionAdmin {
    pub fn new(
        auth: Arc<Authorizer>,
        economy: Arc<dyn EconomyPort>,
        notify: Arc<dyn NotifySink>,
        audit: AuditTrail,
    ) -> Self {
        Self {
            auth,
            economy,
            notify,
            audit,
        }
    }

    /// Create a division owned by `owner`, placed under the owner's own
    /// division and at the owner's rank.
    pub fn create(
        &self,
        space: &mut PowerSpace,
        owner: Dbref,
        name: &str,
    ) -> Result<Dbref, AdminError> {
        if !self
            .economy
            .can_pay_fees(owner, space.config().division_cost)
        {
            return Err(Denial::InsufficientFees.into());
        }
        if !self.auth.authorize(space, owner, owner, DIVISION) {
            return Err(AdminError::missing_power(DIVISION));
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(AdminError::InvalidInput(
                "division name must not be empty".to_string(),
            ));
        }

        let division = self
            .auth
            .directory()
            .create_object(owner, name, EntityKind::Division)?;
        let parent = space.division_of(owner);
        space.insert_record(division, ScopeRecord::new(parent, space.rank_of(owner)));

        tracing::info!(owner = %owner, division = %division, name, "Division created");
        self.audit
            .record(owner, division, format!("DIVISION CREATE: {}", name));
        Ok(division)
    }

    /// Move `target` under `destination`, or out of every division.
    ///
    /// Moving a player moves every non-division object it owns that sat
    /// in the player's old division. Groups the moved entities are no
    /// longer eligible for are stripped.
    pub fn reparent(
        &self,
        space: &mut PowerSpace,
        actor: Dbref,
        target: Dbref,
        destination: Option<Dbref>,
    ) -> Result<(), AdminError> {
        if !self.auth.authorize(space, actor, target, ATTACH) {
            return Err(AdminError::missing_power(ATTACH));
        }
        let old = space.division_of(target);

        let Some(destination) = destination else {
            if self.auth.is_player(target) {
                self.adjust_divisions(space, target, old, None);
            } else {
                for key in space.groups_of(target).to_vec() {
                    strip_group(space, target, &key);
                }
                space.clear_entity_powers(target);
                space.set_division(target, None);
            }
            tracing::info!(actor = %actor, target = %target, "Division reset");
            self.audit.record(actor, target, "Division reset");
            self.notify.notify(target, Notice::DivisionReset { by: actor });
            return Ok(());
        };

        if !self.auth.directory().is_valid(destination) || !self.auth.is_division(destination) {
            return Err(Denial::NotADivision(destination).into());
        }
        if !self.auth.scope_contains(space, actor, destination) {
            return Err(Denial::OutOfScope.into());
        }
        if destination == target {
            return Err(Denial::SelfTarget.into());
        }
        if self.auth.is_division(target) && self.auth.scope_contains(space, target, destination) {
            return Err(Denial::WouldCreateCycle.into());
        }

        let count = if self.auth.is_player(target) {
            u32::try_from(self.moved_with(space, target, old).len()).unwrap_or(u32::MAX)
        } else {
            1
        };
        if !self.economy.pay_quota(destination, count) {
            return Err(Denial::QuotaExceeded.into());
        }
        if let Some(old) = old {
            self.economy.refund_quota(old, count);
        }

        if self.auth.is_player(target) {
            self.adjust_divisions(space, target, old, Some(destination));
        } else {
            space.set_division(target, Some(destination));
            self.revalidate_groups(space, target);
        }

        tracing::info!(
            actor = %actor,
            target = %target,
            division = %destination,
            "Division set"
        );
        self.audit
            .record(actor, target, format!("Division set to {}", destination));
        self.notify.notify(
            target,
            Notice::DivisionSet {
                division: destination,
                by: actor,
            },
        );
        Ok(())
    }

    /// Empty a division: child divisions and every other member move to its
    /// parent. Non-division members also fall to the rank floor and lose
    /// their groups and own powers.
    pub fn clear(
        &self,
        space: &mut PowerSpace,
        actor: Dbref,
        division: Dbref,
    ) -> Result<(), AdminError> {
        self.check_division_owner(space, actor, division)?;
        let members = self.splice_members(space, division);
        tracing::info!(actor = %actor, division = %division, members, "Division cleared");
        self.audit.record(actor, division, "DIVISION CLEAR");
        Ok(())
    }

    /// Clear a division and drop its record.
    pub fn delete(
        &self,
        space: &mut PowerSpace,
        actor: Dbref,
        division: Dbref,
    ) -> Result<(), AdminError> {
        self.check_division_owner(space, actor, division)?;
        self.splice_members(space, division);
        space.drop_record(division);
        tracing::info!(actor = %actor, division = %division, "Division deleted");
        self.audit.record(actor, division, "DIVISION DELETE");
        Ok(())
    }

    /// A new object starts in its creator's division at its creator's rank.
    pub fn on_entity_created(&self, space: &mut PowerSpace, created: Dbref, creator: Dbref) {
        let record = ScopeRecord::new(space.division_of(creator), space.rank_of(creator));
        space.insert_record(created, record);
    }

    /// Forget a destroyed object. Anything it still governed moves up.
    pub fn on_entity_destroyed(&self, space: &mut PowerSpace, destroyed: Dbref) {
        if !space.scopes().members_of(destroyed).is_empty() {
            self.splice_members(space, destroyed);
        }
        space.drop_record(destroyed);
    }

    fn check_division_owner(
        &self,
        space: &PowerSpace,
        actor: Dbref,
        division: Dbref,
    ) -> Result<(), AdminError> {
        if !self.auth.is_division(division) {
            return Err(Denial::NotADivision(division).into());
        }
        if space.is_root(actor) || self.auth.owner_of(division) == actor {
            Ok(())
        } else {
            Err(AdminError::missing_power(DIVISION))
        }
    }

    fn splice_members(&self, space: &mut PowerSpace, division: Dbref) -> usize {
        let parent = space.division_of(division);
        let floor = space.config().rank_floor;
        let members = space.scopes().members_of(division);
        for member in &members {
            space.set_division(*member, parent);
            if self.auth.is_division(*member) {
                continue;
            }
            if !space.is_root(*member) {
                space.set_rank(*member, floor);
            }
            for key in space.groups_of(*member).to_vec() {
                strip_group(space, *member, &key);
            }
            space.clear_entity_powers(*member);
            self.notify
                .notify(*member, Notice::DivisionCleared { division });
        }
        members.len()
    }

    /// Non-division objects owned by `player` that sit in `division`.
    fn moved_with(&self, space: &PowerSpace, player: Dbref, division: Option<Dbref>) -> Vec<Dbref> {
        self.auth
            .directory()
            .owned_by(player)
            .into_iter()
            .filter(|owned| {
                *owned != player
                    && !self.auth.is_division(*owned)
                    && !self.auth.is_player(*owned)
                    && space.division_of(*owned) == division
            })
            .collect()
    }

    fn adjust_divisions(
        &self,
        space: &mut PowerSpace,
        player: Dbref,
        old: Option<Dbref>,
        new: Option<Dbref>,
    ) {
        let moved = self.moved_with(space, player, old);
        space.set_division(player, new);
        self.revalidate_groups(space, player);
        for owned in moved {
            space.set_division(owned, new);
            self.revalidate_groups(space, owned);
        }
    }

    fn revalidate_groups(&self, space: &mut PowerSpace, who: Dbref) {
        for key in space.groups_of(who).to_vec() {
            if !eligible(&self.auth, space, who, &key) {
                strip_group(space, who, &key);
                tracing::debug!(entity = %who, group = %key, "Dropped ineligible power group");
            }
        }
    }
}
