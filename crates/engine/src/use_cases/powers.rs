//! Power and alias administration.
//!
//! Gated on the "Site" power. Registering a power can grow every bitset in
//! the space; if that allocation fails the engine cannot continue and the
//! failure goes to the fatal sink.

use std::sync::Arc;

use divscope_domain::{Comparator, Dbref};

use super::authorize::{Authorizer, SITE};
use super::error::AdminError;
use super::AuditTrail;
use crate::entities::{Power, PowerSpace, RegistryError};
use crate::infrastructure::ports::FatalSink;

pub struct PowerAdmin {
    auth: Arc<Authorizer>,
    fatal: Arc<dyn FatalSink>,
    audit: AuditTrail,
}

impl PowerAdmin {
    pub fn new(auth: Arc<Authorizer>, fatal: Arc<dyn FatalSink>, audit: AuditTrail) -> Self {
        Self { auth, fatal, audit }
    }

    fn require_site(&self, space: &PowerSpace, actor: Dbref) -> Result<(), AdminError> {
        if self.auth.holds(space, actor, SITE) {
            Ok(())
        } else {
            Err(AdminError::missing_power(SITE))
        }
    }

    pub fn register(
        &self,
        space: &mut PowerSpace,
        actor: Dbref,
        name: &str,
        comparator: Comparator,
    ) -> Result<Power, AdminError> {
        self.require_site(space, actor)?;
        let power = register_or_abort(space, self.fatal.as_ref(), name, comparator)?;
        tracing::info!(
            actor = %actor,
            power = %power.name,
            comparator = %comparator,
            "Power added"
        );
        self.audit.record(
            actor,
            actor,
            format!("POWER ADD: {} ({})", power.name, comparator),
        );
        Ok(power)
    }

    pub fn alias(
        &self,
        space: &mut PowerSpace,
        actor: Dbref,
        power_name: &str,
        alias: &str,
    ) -> Result<(), AdminError> {
        self.require_site(space, actor)?;
        space.add_alias(power_name, alias)?;
        tracing::info!(actor = %actor, alias, power = power_name, "Power alias added");
        Ok(())
    }

    pub fn unalias(
        &self,
        space: &mut PowerSpace,
        actor: Dbref,
        alias: &str,
    ) -> Result<(), AdminError> {
        self.require_site(space, actor)?;
        space.remove_alias(alias)?;
        tracing::info!(actor = %actor, alias, "Power alias removed");
        Ok(())
    }

    /// Delete a power by its canonical name. Unknown names change nothing
    /// and return `None`.
    pub fn delete(
        &self,
        space: &mut PowerSpace,
        actor: Dbref,
        name: &str,
    ) -> Result<Option<Power>, AdminError> {
        self.require_site(space, actor)?;
        let removed = space.unregister_power(name);
        if let Some(power) = &removed {
            self.audit
                .record(actor, actor, format!("POWER DELETE: {}", power.name));
        }
        Ok(removed)
    }
}

/// Register a power, sending a failed bitset growth to the fatal sink.
pub(crate) fn register_or_abort(
    space: &mut PowerSpace,
    fatal: &dyn FatalSink,
    name: &str,
    comparator: Comparator,
) -> Result<Power, RegistryError> {
    match space.register_power(name, comparator) {
        Err(RegistryError::Allocation { bytes }) => fatal.fatal(&format!(
            "unable to grow capability bitsets to {} bytes while adding power '{}'",
            bytes, name
        )),
        other => other,
    }
}
