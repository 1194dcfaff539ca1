//! Power database adapter: powers, aliases, groups and scope records.
//!
//! Malformed records are skipped with a warning and listed in the
//! [`LoadReport`]; only I/O failures, a broken field sequence or failed
//! bitset growth abort a load.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use divscope_domain::{split_tokens, Comparator, PowerToken, Rank, Tier};
use serde::Serialize;

use super::{PersistenceError, TextLabeledReader, TextLabeledWriter};
use crate::entities::{name_key, GroupList, Power, PowerSpace, RegistryError, ScopeRecord};
use crate::infrastructure::ports::{LabeledReader, LabeledWriter};

/// What a load found.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// False when the input had no power section at all.
    pub had_power_section: bool,
    pub powers: usize,
    pub aliases: usize,
    pub groups: usize,
    pub records: usize,
    pub skipped: Vec<String>,
}

impl LoadReport {
    fn skip(&mut self, reason: String) {
        tracing::warn!(reason = %reason, "Skipping persisted record");
        self.skipped.push(reason);
    }
}

// =============================================================================
// Save
// =============================================================================

pub fn save(space: &PowerSpace, writer: &mut dyn LabeledWriter) -> Result<(), PersistenceError> {
    writer.write_number("powercount", space.powers().len() as i64)?;
    for power in space.powers().iter() {
        writer.write_string("powername", &power.name)?;
        writer.write_string("type", power.comparator.type_name())?;
    }

    writer.write_number("aliascount", space.powers().alias_count() as i64)?;
    for alias in space.powers().aliases() {
        let target = space
            .powers()
            .get_exact(&alias.target)
            .map_or(alias.target.as_str(), |p| p.name.as_str());
        writer.write_string("aliasname", &alias.name)?;
        writer.write_string("power", target)?;
    }

    writer.write_number("powergroupcount", space.groups().len() as i64)?;
    for group in space.groups().iter() {
        writer.write_string("powergroupname", &group.name)?;
        writer.write_string("maxpowers", &persisted_list(space.tier_list(Some(&group.ceiling))))?;
        writer.write_string("autopowers", &persisted_list(space.tier_list(Some(&group.auto))))?;
    }

    writer.write_number("scopecount", space.scopes().len() as i64)?;
    for (dbref, record) in space.scopes().iter() {
        let groups: Vec<&str> = record
            .groups
            .iter()
            .filter_map(|key| space.group(key).map(|g| g.name.as_str()))
            .collect();
        writer.write_dbref("dbref", Some(*dbref))?;
        writer.write_dbref("division", record.division)?;
        writer.write_number("level", i64::from(record.rank.value()))?;
        writer.write_string("powergroups", &groups.join(" "))?;
        writer.write_string("powers", &persisted_list(space.tier_list(record.powers.as_ref())))?;
    }
    Ok(())
}

fn persisted_list(tokens: Vec<PowerToken>) -> String {
    tokens
        .iter()
        .map(PowerToken::to_persisted)
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn save_file(space: &PowerSpace, path: &Path) -> Result<(), PersistenceError> {
    let tmp = path.with_extension("tmp");
    {
        let mut writer = TextLabeledWriter::new(BufWriter::new(File::create(&tmp)?));
        save(space, &mut writer)?;
        writer.flush()?;
    }
    std::fs::rename(&tmp, path)?;
    tracing::info!(path = %path.display(), "Saved power database");
    Ok(())
}

// =============================================================================
// Load
// =============================================================================

pub fn load(
    space: &mut PowerSpace,
    reader: &mut dyn LabeledReader,
) -> Result<LoadReport, PersistenceError> {
    let mut report = LoadReport::default();
    if reader.peek_label()?.as_deref() != Some("powercount") {
        tracing::warn!("No power section found");
        return Ok(report);
    }
    report.had_power_section = true;

    load_powers(space, reader, &mut report)?;
    load_aliases(space, reader, &mut report)?;
    load_groups(space, reader, &mut report)?;
    if reader.peek_label()?.as_deref() == Some("scopecount") {
        load_records(space, reader, &mut report)?;
    }

    tracing::info!(
        powers = report.powers,
        aliases = report.aliases,
        groups = report.groups,
        records = report.records,
        skipped = report.skipped.len(),
        "Loaded power database"
    );
    Ok(report)
}

pub fn load_file(space: &mut PowerSpace, path: &Path) -> Result<LoadReport, PersistenceError> {
    let mut reader = TextLabeledReader::new(BufReader::new(File::open(path)?));
    load(space, &mut reader)
}

fn count(reader: &mut dyn LabeledReader, label: &str) -> Result<usize, PersistenceError> {
    let n = reader.read_number(label)?;
    Ok(usize::try_from(n).unwrap_or(0))
}

fn load_powers(
    space: &mut PowerSpace,
    reader: &mut dyn LabeledReader,
    report: &mut LoadReport,
) -> Result<(), PersistenceError> {
    for _ in 0..count(reader, "powercount")? {
        let name = reader.read_string("powername")?;
        let kind = reader.read_string("type")?;
        let comparator: Comparator = match kind.parse() {
            Ok(c) => c,
            Err(_) => {
                report.skip(format!("power '{}' has unknown type '{}'", name, kind));
                continue;
            }
        };
        match space.register_power(&name, comparator) {
            Ok(_) => report.powers += 1,
            Err(e @ RegistryError::Allocation { .. }) => return Err(e.into()),
            Err(e) => report.skip(format!("power '{}': {}", name, e)),
        }
    }
    Ok(())
}

fn load_aliases(
    space: &mut PowerSpace,
    reader: &mut dyn LabeledReader,
    report: &mut LoadReport,
) -> Result<(), PersistenceError> {
    for _ in 0..count(reader, "aliascount")? {
        let alias = reader.read_string("aliasname")?;
        let target = reader.read_string("power")?;
        if space.powers().is_taken(&alias) {
            report.skip(format!("alias '{}' already names a power", alias));
            continue;
        }
        if space.powers().get_exact(&target).is_none() {
            report.skip(format!("alias '{}' refers to unknown power '{}'", alias, target));
            continue;
        }
        match space.add_alias(&target, &alias) {
            Ok(()) => report.aliases += 1,
            Err(e) => report.skip(format!("alias '{}': {}", alias, e)),
        }
    }
    Ok(())
}

fn load_groups(
    space: &mut PowerSpace,
    reader: &mut dyn LabeledReader,
    report: &mut LoadReport,
) -> Result<(), PersistenceError> {
    for _ in 0..count(reader, "powergroupcount")? {
        let name = reader.read_string("powergroupname")?;
        let ceiling = reader.read_string("maxpowers")?;
        let auto = reader.read_string("autopowers")?;

        let key = match space.create_group(&name) {
            Ok(key) => key,
            Err(e) => {
                report.skip(format!("power group '{}': {}", name, e));
                continue;
            }
        };
        apply_list(space, report, &name, &ceiling, |space, power, tier| {
            space.write_group_tier(&key, power, GroupList::Ceiling, tier)
        });
        apply_list(space, report, &name, &auto, |space, power, tier| {
            let tier = tier.min(space.group_tier(&key, power, GroupList::Ceiling));
            space.write_group_tier(&key, power, GroupList::Auto, tier)
        });
        report.groups += 1;
    }
    Ok(())
}

fn load_records(
    space: &mut PowerSpace,
    reader: &mut dyn LabeledReader,
    report: &mut LoadReport,
) -> Result<(), PersistenceError> {
    let max_rank = space.config().max_rank;
    for _ in 0..count(reader, "scopecount")? {
        let dbref = reader.read_dbref("dbref")?;
        let division = reader.read_dbref("division")?;
        let level = reader.read_number("level")?;
        let groups = reader.read_string("powergroups")?;
        let powers = reader.read_string("powers")?;

        let Some(dbref) = dbref else {
            report.skip("scope record without an object".to_string());
            continue;
        };
        if division == Some(dbref) {
            report.skip(format!("{} listed as its own division; cleared", dbref));
        }
        let division = division.filter(|d| *d != dbref);

        let mut record = ScopeRecord::new(division, Rank::clamped(level, max_rank));
        for name in split_tokens(&groups) {
            if space.groups().contains_exact(name) {
                record.add_group(&name_key(name));
            } else {
                report.skip(format!("{} holds unknown power group '{}'", dbref, name));
            }
        }
        space.insert_record(dbref, record);

        let label = dbref.to_string();
        apply_list(space, report, &label, &powers, |space, power, tier| {
            space.set_entity_tier(dbref, power, tier)
        });
        report.records += 1;
    }
    Ok(())
}

/// Apply a persisted `Name:<digit>` list through `write`. Names are saved in
/// full, so they must match exactly; prefixes and aliases are not followed.
fn apply_list(
    space: &mut PowerSpace,
    report: &mut LoadReport,
    owner: &str,
    list: &str,
    mut write: impl FnMut(&mut PowerSpace, &Power, Tier),
) {
    for raw in split_tokens(list) {
        let token = match PowerToken::parse_lenient(raw) {
            Ok(token) => token,
            Err(e) => {
                report.skip(format!("{}: bad power token '{}': {}", owner, raw, e));
                continue;
            }
        };
        match space.powers().get_exact(&token.name).cloned() {
            Some(power) => write(space, &power, token.tier),
            None => report.skip(format!("{}: unknown power '{}'", owner, token.name)),
        }
    }
}
