//! Read-only views of the power space for display.

use std::collections::BTreeSet;
use std::sync::Arc;

use divscope_domain::{Dbref, PowerToken, Rank, Tier};
use regex_lite::Regex;
use serde::Serialize;

use super::authorize::Authorizer;
use super::error::AdminError;
use crate::entities::{GroupList, PowerSpace};

/// What an entity holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntitySummary {
    pub dbref: Dbref,
    pub division: Option<Dbref>,
    pub rank: Rank,
    pub groups: Vec<String>,
    pub powers: Vec<PowerToken>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupSummary {
    pub name: String,
    pub ceiling: Vec<PowerToken>,
    pub auto: Vec<PowerToken>,
    pub holders: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PowerInfo {
    pub name: String,
    pub comparator: String,
    pub aliases: Vec<String>,
}

pub struct Queries {
    auth: Arc<Authorizer>,
}

impl Queries {
    pub fn new(auth: Arc<Authorizer>) -> Self {
        Self { auth }
    }

    /// Powers held above `No`. Root reports every power at `Yes`.
    pub fn entity_powers(&self, space: &PowerSpace, dbref: Dbref) -> Vec<PowerToken> {
        if space.is_root(dbref) {
            return space
                .powers()
                .iter()
                .map(|power| PowerToken::new(power.name.clone(), Tier::Yes))
                .collect();
        }
        space.tier_list(space.record(dbref).and_then(|r| r.powers.as_ref()))
    }

    pub fn entity_summary(&self, space: &PowerSpace, dbref: Dbref) -> EntitySummary {
        let groups = space
            .groups_of(dbref)
            .iter()
            .map(|key| {
                space
                    .group(key)
                    .map_or_else(|| key.clone(), |g| g.name.clone())
            })
            .collect();
        EntitySummary {
            dbref,
            division: space.division_of(dbref),
            rank: space.rank_of(dbref),
            groups,
            powers: self.entity_powers(space, dbref),
        }
    }

    pub fn group_summary(
        &self,
        space: &PowerSpace,
        name: &str,
    ) -> Result<GroupSummary, AdminError> {
        let key = space
            .resolve_group(name)
            .ok_or_else(|| AdminError::not_found("power group", name))?;
        let group = space
            .group(&key)
            .ok_or_else(|| AdminError::not_found("power group", name))?;
        Ok(GroupSummary {
            name: group.name.clone(),
            ceiling: space.tier_list(Some(group.list(GroupList::Ceiling))),
            auto: space.tier_list(Some(group.list(GroupList::Auto))),
            holders: space.scopes().holders_of(&key).len(),
        })
    }

    pub fn group_names(&self, space: &PowerSpace) -> Vec<String> {
        space.groups().iter().map(|g| g.name.clone()).collect()
    }

    pub fn power_info(&self, space: &PowerSpace, name: &str) -> Result<PowerInfo, AdminError> {
        let power = space
            .power(name)
            .ok_or_else(|| AdminError::not_found("power", name))?;
        Ok(PowerInfo {
            name: power.name.clone(),
            comparator: power.comparator.type_name().to_string(),
            aliases: space
                .powers()
                .aliases_of(power)
                .into_iter()
                .map(str::to_string)
                .collect(),
        })
    }

    /// Power names matching a `*`/`?` wildcard, case-insensitively.
    pub fn list_powers(
        &self,
        space: &PowerSpace,
        pattern: &str,
    ) -> Result<Vec<String>, AdminError> {
        let matcher = wildcard(pattern)?;
        Ok(space
            .powers()
            .iter()
            .filter(|power| matcher.is_match(&power.name))
            .map(|power| power.name.clone())
            .collect())
    }

    /// Divisions above `dbref`, nearest first.
    pub fn updiv(&self, space: &PowerSpace, dbref: Dbref) -> Vec<Dbref> {
        let mut chain = Vec::new();
        let mut seen = BTreeSet::from([dbref]);
        let mut node = space.division_of(dbref);
        while let Some(division) = node {
            if !seen.insert(division) {
                tracing::warn!(entity = %dbref, division = %division, "Division loop in ancestry");
                break;
            }
            chain.push(division);
            node = space.division_of(division);
        }
        chain
    }

    /// Entities directly in `division`.
    pub fn members(&self, space: &PowerSpace, division: Dbref) -> Vec<Dbref> {
        space.scopes().members_of(division)
    }

    pub fn has_power(&self, space: &PowerSpace, dbref: Dbref, name: &str) -> bool {
        self.auth.holds(space, dbref, name)
    }
}

fn wildcard(pattern: &str) -> Result<Regex, AdminError> {
    let mut source = String::from("(?i)^");
    for ch in pattern.trim().chars() {
        match ch {
            '*' => source.push_str(".*"),
            '?' => source.push('.'),
            other => source.push_str(&regex_lite::escape(&other.to_string())),
        }
    }
    source.push('$');
    Regex::new(&source).map_err(|e| AdminError::InvalidInput(e.to_string()))
}
