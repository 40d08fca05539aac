//! Version-selection resolution

use fx_core::VersionSelection;

/// Resolve the subset of discovered versions to exercise.
///
/// Precedence: the `EPHEMERA_FIXTURE_VERSIONS` environment override wins
/// over the programmatically supplied `explicit` list; neither set means
/// all discovered versions. The override is read fresh on every call, never
/// cached, so a per-process value always takes effect.
pub fn selected_versions(explicit: Option<&[String]>) -> VersionSelection {
    if let Some(versions) = config::version_override() {
        tracing::debug!(?versions, "Version selection from environment override");
        return VersionSelection::Explicit(versions);
    }
    match explicit {
        Some(versions) if !versions.is_empty() => {
            VersionSelection::Explicit(versions.to_vec())
        }
        _ => VersionSelection::All,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    #[test]
    #[serial]
    fn unset_selects_all() {
        unsafe {
            env::remove_var("EPHEMERA_FIXTURE_VERSIONS");
        }
        assert_eq!(selected_versions(None), VersionSelection::All);
    }

    #[test]
    #[serial]
    fn explicit_list_selects_those_versions() {
        unsafe {
            env::remove_var("EPHEMERA_FIXTURE_VERSIONS");
        }
        let explicit = vec!["2.0.6".to_string()];
        assert_eq!(
            selected_versions(Some(&explicit)),
            VersionSelection::Explicit(vec!["2.0.6".to_string()])
        );
    }

    #[test]
    #[serial]
    fn empty_explicit_list_selects_all() {
        unsafe {
            env::remove_var("EPHEMERA_FIXTURE_VERSIONS");
        }
        assert_eq!(selected_versions(Some(&[])), VersionSelection::All);
    }

    #[test]
    #[serial]
    fn environment_override_beats_explicit_list() {
        unsafe {
            env::set_var("EPHEMERA_FIXTURE_VERSIONS", "2.1.0,2.1.9");
        }
        let explicit = vec!["2.0.6".to_string()];
        assert_eq!(
            selected_versions(Some(&explicit)),
            VersionSelection::Explicit(vec!["2.1.0".to_string(), "2.1.9".to_string()])
        );
        unsafe {
            env::remove_var("EPHEMERA_FIXTURE_VERSIONS");
        }
    }
}
