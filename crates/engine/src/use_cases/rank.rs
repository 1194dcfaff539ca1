//! Setting an entity's rank.

use std::sync::Arc;

use divscope_domain::{Comparator, Dbref, Rank, Tier};

use super::authorize::{Authorizer, LEVEL};
use super::error::{AdminError, Denial};
use super::AuditTrail;
use crate::entities::PowerSpace;
use crate::infrastructure::ports::{Notice, NotifySink};

pub struct RankAdmin {
    auth: Arc<Authorizer>,
    notify: Arc<dyn NotifySink>,
    audit: AuditTrail,
}

impl RankAdmin {
    pub fn new(auth: Arc<Authorizer>, notify: Arc<dyn NotifySink>, audit: AuditTrail) -> Self {
        Self {
            auth,
            notify,
            audit,
        }
    }

    /// Set `target`'s rank to `level`, capped by the target's division.
    ///
    /// Returns the rank actually stored. Owners may re-rank their own
    /// objects as if holding "Level" at `YesLte`. Setting a player's rank
    /// also caps every non-division object it owns.
    pub fn set_rank(
        &self,
        space: &mut PowerSpace,
        actor: Dbref,
        target: Dbref,
        level: i64,
    ) -> Result<Rank, AdminError> {
        if level < 1 {
            return Err(AdminError::InvalidInput(format!(
                "rank must be at least 1, got {}",
                level
            )));
        }
        let owns_target = self.auth.owner_of(target) == actor;
        let permitted = self.auth.authorize(space, actor, target, LEVEL)
            || (owns_target
                && self
                    .auth
                    .judge(space, Comparator::LevelCheck, Tier::YesLte, actor, target));
        if !permitted {
            return Err(AdminError::missing_power(LEVEL));
        }

        let own_rank = space.rank_of(actor);
        if actor == target && level < i64::from(own_rank.value()) {
            return Err(Denial::SelfDemotion.into());
        }
        let mut tier = space
            .power(LEVEL)
            .map_or(Tier::No, |power| self.auth.effective_tier(space, actor, power));
        if space.is_root(actor) {
            tier = Tier::Yes;
        }
        if tier < Tier::YesLte && owns_target {
            tier = Tier::YesLte;
        }

        let max_rank = space.config().max_rank;
        let cap = if space.is_root(actor) {
            max_rank
        } else {
            match space.division_of(target) {
                Some(division) => space.rank_of(division),
                None => space.config().rank_floor,
            }
        };
        let rank = Rank::clamped(level.min(i64::from(cap.value())), max_rank);

        match tier {
            Tier::Yes => {}
            Tier::YesLte if rank <= own_rank => {}
            Tier::YesLt if rank < own_rank => {}
            Tier::No => return Err(AdminError::missing_power(LEVEL)),
            _ => return Err(Denial::RankAboveActor.into()),
        }

        space.set_rank(target, rank);
        if self.auth.is_player(target) {
            self.cap_owned(space, target, rank);
        }

        tracing::info!(actor = %actor, target = %target, rank = %rank, "Rank set");
        self.audit
            .record(actor, target, format!("Level set to '{}'", rank));
        self.notify.notify(
            target,
            Notice::RankSet {
                rank: rank.value(),
                by: actor,
            },
        );
        Ok(rank)
    }

    fn cap_owned(&self, space: &mut PowerSpace, player: Dbref, rank: Rank) {
        for owned in self.auth.directory().owned_by(player) {
            if owned == player || self.auth.is_division(owned) {
                continue;
            }
            if space.rank_of(owned) > rank {
                space.set_rank(owned, rank);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Power;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::config::EngineConfig;
    use crate::test_fixtures::{FakeWorld, RecordingAudit, RecordingNotify};
    use chrono::Utc;

    fn d(n: u32) -> Dbref {
        Dbref::new(n)
    }

    fn rank(n: u8) -> Rank {
        Rank::new(n, Rank::MAX_LEVEL).unwrap()
    }

    struct Fixture {
        space: PowerSpace,
        admin: RankAdmin,
        audit: Arc<RecordingAudit>,
        notify: Arc<RecordingNotify>,
        level: Power,
    }

    /// Players #2 and #3 in division #10 (rank 25); #2 owns thing #5 and
    /// division #11.
    fn fixture() -> Fixture {
        let world = FakeWorld::new();
        world.player(d(1));
        world.player(d(2));
        world.player(d(3));
        world.thing(d(5), d(2));
        world.division(d(10), d(1));
        world.division(d(11), d(2));
        let audit = Arc::new(RecordingAudit::default());
        let notify = Arc::new(RecordingNotify::default());
        let admin = RankAdmin::new(
            Arc::new(Authorizer::new(Arc::new(world))),
            notify.clone(),
            AuditTrail::new(audit.clone(), Arc::new(FixedClock(Utc::now()))),
        );

        let mut space = PowerSpace::new(EngineConfig::default());
        let level = space.register_power("Level", Comparator::LevelSet).unwrap();
        space.set_rank(d(10), rank(25));
        for who in [2, 3, 5, 11] {
            space.set_division(d(who), Some(d(10)));
        }
        space.set_rank(d(2), rank(20));
        space.set_rank(d(3), rank(5));
        Fixture {
            space,
            admin,
            audit,
            notify,
            level,
        }
    }

    #[test]
    fn rank_below_one_is_invalid() {
        let mut f = fixture();
        let err = f.admin.set_rank(&mut f.space, d(1), d(3), 0).unwrap_err();
        assert!(matches!(err, AdminError::InvalidInput(_)));
    }

    #[test]
    fn needs_level_power() {
        let mut f = fixture();
        let err = f.admin.set_rank(&mut f.space, d(3), d(2), 4).unwrap_err();
        assert!(err.is_denied());
    }

    #[test]
    fn yes_lte_cannot_exceed_own_rank() {
        let mut f = fixture();
        f.space.set_entity_tier(d(2), &f.level, Tier::YesLte);

        let err = f.admin.set_rank(&mut f.space, d(2), d(3), 21).unwrap_err();
        assert!(matches!(err, AdminError::Denied(Denial::RankAboveActor)));

        let set = f.admin.set_rank(&mut f.space, d(2), d(3), 20).unwrap();
        assert_eq!(set, rank(20));
        assert_eq!(f.audit.actions(), vec!["Level set to '20'"]);
        assert_eq!(
            f.notify.for_recipient(d(3)),
            vec![Notice::RankSet { rank: 20, by: d(2) }]
        );
    }

    #[test]
    fn yes_lt_must_stay_strictly_below() {
        let mut f = fixture();
        f.space.set_entity_tier(d(2), &f.level, Tier::YesLt);
        assert!(f.admin.set_rank(&mut f.space, d(2), d(3), 20).is_err());
        assert_eq!(f.admin.set_rank(&mut f.space, d(2), d(3), 19).unwrap(), rank(19));
    }

    #[test]
    fn division_rank_caps_the_request() {
        let mut f = fixture();
        f.space.set_entity_tier(d(2), &f.level, Tier::Yes);
        assert_eq!(f.admin.set_rank(&mut f.space, d(2), d(3), 29).unwrap(), rank(25));

        f.space.set_division(d(3), None);
        assert_eq!(f.admin.set_rank(&mut f.space, d(2), d(3), 29).unwrap(), rank(2));

        assert_eq!(f.admin.set_rank(&mut f.space, d(1), d(3), 99).unwrap(), rank(30));
    }

    #[test]
    fn cannot_lower_own_rank() {
        let mut f = fixture();
        f.space.set_entity_tier(d(2), &f.level, Tier::Yes);
        let err = f.admin.set_rank(&mut f.space, d(2), d(2), 10).unwrap_err();
        assert!(matches!(err, AdminError::Denied(Denial::SelfDemotion)));
    }

    #[test]
    fn player_rank_caps_owned_objects() {
        let mut f = fixture();
        f.space.set_rank(d(5), rank(18));
        f.space.set_rank(d(11), rank(18));

        f.admin.set_rank(&mut f.space, d(1), d(2), 12).unwrap();

        assert_eq!(f.space.rank_of(d(2)), rank(12));
        assert_eq!(f.space.rank_of(d(5)), rank(12));
        assert_eq!(f.space.rank_of(d(11)), rank(18));
    }

    #[test]
    fn owner_reranks_own_object() {
        let mut f = fixture();
        f.space.set_rank(d(5), rank(4));
        assert_eq!(f.admin.set_rank(&mut f.space, d(2), d(5), 15).unwrap(), rank(15));
        assert!(f.admin.set_rank(&mut f.space, d(2), d(5), 22).is_err());
    }
}
