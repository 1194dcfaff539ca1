//! Granting and revoking powers directly on an entity.

use std::sync::Arc;

use divscope_domain::{split_tokens, Dbref, PowerToken, Tier, NOT_TOKEN};

use super::authorize::{Authorizer, EMPOWER};
use super::error::{AdminError, TokenOutcome, TokenReport};
use super::AuditTrail;
use crate::entities::PowerSpace;
use crate::infrastructure::ports::{Notice, NotifySink};

pub struct Grants {
    auth: Arc<Authorizer>,
    notify: Arc<dyn NotifySink>,
    audit: AuditTrail,
}

impl Grants {
    pub fn new(auth: Arc<Authorizer>, notify: Arc<dyn NotifySink>, audit: AuditTrail) -> Self {
        Self {
            auth,
            notify,
            audit,
        }
    }

    /// Apply `Power[:Tier]` tokens to `target`'s own bits.
    ///
    /// Each token is judged on its own: the giver must hold the tier it
    /// hands out, the target's groups must allow it, and a target already
    /// above the giver cannot be lowered by it.
    pub fn grant(
        &self,
        space: &mut PowerSpace,
        actor: Dbref,
        target: Dbref,
        tokens: &str,
    ) -> Result<TokenReport, AdminError> {
        if !self.auth.authorize(space, actor, target, EMPOWER) {
            return Err(AdminError::missing_power(EMPOWER));
        }
        let trusted = space.is_root(actor);

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
            let stored = space.entity_tier(target, &power);

            if !trusted {
                let giver = self.auth.effective_tier(space, actor, &power);
                let current = if space.is_root(target) {
                    Tier::Yes
                } else {
                    stored
                };
                if giver < token.tier {
                    report.push(TokenOutcome::NotHeld { token });
                    continue;
                }
                if token.tier.is_granted() && space.effective_ceiling(target, &power) < token.tier
                {
                    report.push(TokenOutcome::CannotReceive { token });
                    continue;
                }
                if token.tier < current && giver < current {
                    report.push(TokenOutcome::Outranked { token });
                    continue;
                }
            }
            if stored == token.tier {
                report.push(TokenOutcome::Unchanged { token });
                continue;
            }

            space.set_entity_tier(target, &power, token.tier);
            report.push(TokenOutcome::Applied { token });
        }

        let applied = report.applied();
        if !applied.is_empty() {
            let listed: Vec<String> = applied
                .iter()
                .map(|t| format!("{}({})", t.name, t.tier))
                .collect();
            tracing::info!(
                actor = %actor,
                target = %target,
                powers = %listed.join(", "),
                "Powers set"
            );
            self.audit
                .record(actor, target, format!("POWER SET: {}", listed.join(", ")));
            self.notify.notify(
                target,
                Notice::Empowered {
                    by: actor,
                    powers: applied,
                },
            );
        }
        Ok(report)
    }

    /// Set each named power on `target` back to `No`.
    pub fn revoke(
        &self,
        space: &mut PowerSpace,
        actor: Dbref,
        target: Dbref,
        names: &str,
    ) -> Result<TokenReport, AdminError> {
        let tokens: Vec<String> = split_tokens(names)
            .map(|name| format!("{}{}", NOT_TOKEN, name.trim_start_matches(NOT_TOKEN)))
            .collect();
        self.grant(space, actor, target, &tokens.join(" "))
    }
}
