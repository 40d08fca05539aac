//! Test-parameter fan-out
//!
//! One parameter per discovered-and-selected fixture definition. Test code
//! iterates the returned sequence and constructs one
//! [`LifecycleScope`](crate::LifecycleScope) per definition; there is no
//! base-class machinery to inherit from, and version-selection
//! customization is the `explicit` argument rather than an overridable
//! hook.

use std::path::Path;

use errors::CatalogError;
use fx_core::FixtureDefinition;

/// Catalog → selector → expander in one call.
///
/// `explicit` is the programmatic version allow-list; the
/// `EPHEMERA_FIXTURE_VERSIONS` environment override still wins, and the
/// override is re-read on every call. An empty result is valid and means
/// zero test invocations.
pub fn fixture_parameters(
    dir: &Path,
    explicit: Option<&[String]>,
) -> Result<Vec<FixtureDefinition>, CatalogError> {
    let definitions = catalog::list_definitions(dir)?;
    let selection = catalog::selected_versions(explicit);
    let expanded = catalog::expand(definitions, &selection);
    if expanded.is_empty() {
        tracing::warn!(
            directory = %dir.display(),
            "Fixture expansion produced zero test parameters"
        );
    }
    Ok(expanded)
}

/// Like [`fixture_parameters`], but treats an empty expansion as
/// `CatalogError::NoDefinitions`, for suites where zero fixtures means the
/// run is misconfigured.
pub fn require_fixture_parameters(
    dir: &Path,
    explicit: Option<&[String]>,
) -> Result<Vec<FixtureDefinition>, CatalogError> {
    let parameters = fixture_parameters(dir, explicit)?;
    if parameters.is_empty() {
        return Err(CatalogError::NoDefinitions {
            path: dir.display().to_string(),
        });
    }
    Ok(parameters)
}
