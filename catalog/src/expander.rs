//! Parameterization fan-out

use fx_core::{FixtureDefinition, VersionSelection};

/// Cross-reference discovered definitions against the selection.
///
/// `All` returns `definitions` unchanged. An explicit selection returns the
/// subsequence whose versions are members, preserving relative order;
/// definitions with non-matching versions are silently dropped. A selection
/// naming a version absent from the catalog simply contributes nothing; an
/// empty result is valid and means zero test invocations.
pub fn expand(
    definitions: Vec<FixtureDefinition>,
    selection: &VersionSelection,
) -> Vec<FixtureDefinition> {
    match selection {
        VersionSelection::All => definitions,
        VersionSelection::Explicit(_) => {
            let expanded: Vec<FixtureDefinition> = definitions
                .into_iter()
                .filter(|d| selection.admits(&d.version))
                .collect();
            tracing::debug!(count = expanded.len(), "Expanded fixture parameters");
            expanded
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn def(name: &str, version: &str) -> FixtureDefinition {
        FixtureDefinition {
            name: name.to_string(),
            version: version.to_string(),
            source_path: PathBuf::from("tests/fixtures").join(name),
        }
    }

    fn catalog() -> Vec<FixtureDefinition> {
        vec![
            def("cassandra-2.0.6", "2.0.6"),
            def("cassandra-2.1.0", "2.1.0"),
            def("cassandra-2.1.9", "2.1.9"),
        ]
    }

    #[test]
    fn unset_selection_is_identity() {
        let defs = catalog();
        assert_eq!(expand(defs.clone(), &VersionSelection::All), defs);
    }

    #[test]
    fn explicit_selection_keeps_members_in_order() {
        let selection =
            VersionSelection::Explicit(vec!["2.1.9".to_string(), "2.0.6".to_string()]);
        let expanded = expand(catalog(), &selection);
        // Catalog order, not selection order.
        let versions: Vec<&str> = expanded.iter().map(|d| d.version.as_str()).collect();
        assert_eq!(versions, vec!["2.0.6", "2.1.9"]);
    }

    #[test]
    fn absent_versions_yield_zero_parameters() {
        let selection = VersionSelection::Explicit(vec!["9.9.9".to_string()]);
        assert!(expand(catalog(), &selection).is_empty());
    }

    #[test]
    fn result_is_a_subsequence_of_the_catalog() {
        let selection =
            VersionSelection::Explicit(vec!["2.0.6".to_string(), "2.1.9".to_string()]);
        let source = catalog();
        let expanded = expand(source.clone(), &selection);
        let mut cursor = source.iter();
        for picked in &expanded {
            assert!(cursor.any(|d| d == picked), "order not preserved");
        }
    }
}
