//! Installing the built-in powers, aliases and groups.
//!
//! Runs on a fresh space and again after every load: only what is missing
//! gets added, so a database saved by an older build picks up new defaults
//! without touching anything an operator changed.

use std::sync::Arc;

use divscope_domain::Tier;
use serde::Serialize;

use super::error::TokenOutcome;
use super::groups::empower_group;
use super::powers::register_or_abort;
use crate::entities::{GroupList, PowerSpace};
use crate::infrastructure::defaults::{ALIASES, GROUPS, POWERS};
use crate::infrastructure::ports::FatalSink;

/// What `install_defaults` added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BootstrapReport {
    pub powers: Vec<String>,
    pub aliases: Vec<String>,
    pub groups: Vec<String>,
}

impl BootstrapReport {
    pub fn is_empty(&self) -> bool {
        self.powers.is_empty() && self.aliases.is_empty() && self.groups.is_empty()
    }
}

pub struct Bootstrap {
    fatal: Arc<dyn FatalSink>,
}

impl Bootstrap {
    pub fn new(fatal: Arc<dyn FatalSink>) -> Self {
        Self { fatal }
    }

    pub fn install_defaults(&self, space: &mut PowerSpace) -> BootstrapReport {
        let mut report = BootstrapReport::default();

        for default in POWERS {
            if space.powers().get_exact(default.name).is_some() {
                continue;
            }
            let registered =
                register_or_abort(space, self.fatal.as_ref(), default.name, default.comparator);
            match registered {
                Ok(power) => report.powers.push(power.name),
                Err(e) => {
                    tracing::warn!(power = default.name, error = %e, "Skipped built-in power")
                }
            }
        }

        for default in ALIASES {
            if space.powers().is_taken(default.alias) || space.power(default.power).is_none() {
                continue;
            }
            match space.add_alias(default.power, default.alias) {
                Ok(()) => report.aliases.push(default.alias.to_string()),
                Err(e) => {
                    tracing::warn!(alias = default.alias, error = %e, "Skipped built-in alias")
                }
            }
        }

        for default in GROUPS {
            if space.groups().contains_exact(default.name) {
                continue;
            }
            let key = match space.create_group(default.name) {
                Ok(key) => key,
                Err(e) => {
                    tracing::warn!(group = default.name, error = %e, "Skipped built-in group");
                    continue;
                }
            };
            for (tokens, list) in [
                (default.ceiling, GroupList::Ceiling),
                (default.auto, GroupList::Auto),
            ] {
                let outcome = empower_group(space, &key, tokens, list, |_, _| Tier::Yes);
                let skipped = outcome.outcomes.iter().filter(|o| {
                    matches!(
                        o,
                        TokenOutcome::UnknownPower { .. } | TokenOutcome::Malformed { .. }
                    )
                });
                for token in skipped {
                    tracing::debug!(
                        group = default.name,
                        list = %list,
                        ?token,
                        "Built-in token skipped"
                    );
                }
            }
            report.groups.push(default.name.to_string());
        }

        if !report.is_empty() {
            tracing::info!(
                powers = report.powers.len(),
                aliases = report.aliases.len(),
                groups = report.groups.len(),
                "Installed built-in defaults"
            );
        }
        report
    }
}
