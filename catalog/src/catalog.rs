//! Fixture-definition discovery

use std::fs;
use std::path::Path;

use errors::CatalogError;
use fx_core::FixtureDefinition;

/// Family marker every definition file name must start with.
pub const FIXTURE_FAMILY: &str = "cassandra";

/// Editor backup suffix; files carrying it are never definitions.
const BACKUP_SUFFIX: &str = "~";

/// Scan the immediate contents of `dir` for fixture definitions.
///
/// A file is a definition iff its name starts with [`FIXTURE_FAMILY`] and
/// does not end with `~`. The scan is non-recursive and the returned order
/// is filesystem enumeration order (not sorted).
///
/// The version label is the file name with the family prefix stripped, then
/// one leading `-` or `_` separator stripped if present: `cassandra2.0.6`
/// and `cassandra-2.0.6` both carry version `2.0.6`. The historical helper
/// truncated at a fixed offset and disagreed with itself across revisions;
/// this rule is the single documented convention.
///
/// A missing or unreadable directory is `CatalogError::Unavailable`. A
/// readable directory with no matching entries is `Ok(vec![])`.
pub fn list_definitions(dir: &Path) -> Result<Vec<FixtureDefinition>, CatalogError> {
    let entries = fs::read_dir(dir).map_err(|e| CatalogError::Unavailable {
        path: dir.display().to_string(),
        reason: e.to_string(),
    })?;

    let mut definitions = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| CatalogError::Unavailable {
            path: dir.display().to_string(),
            reason: e.to_string(),
        })?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.starts_with(FIXTURE_FAMILY) || name.ends_with(BACKUP_SUFFIX) {
            continue;
        }
        definitions.push(FixtureDefinition {
            version: extract_version(&name).to_string(),
            source_path: entry.path(),
            name,
        });
    }

    tracing::debug!(
        directory = %dir.display(),
        count = definitions.len(),
        "Scanned fixture directory"
    );
    Ok(definitions)
}

/// Version label for a definition file name. Caller guarantees the family
/// prefix is present.
fn extract_version(name: &str) -> &str {
    let rest = &name[FIXTURE_FAMILY.len()..];
    rest.strip_prefix(['-', '_']).unwrap_or(rest)
}
