use crate::{identifier, AciError};
use aciforge_schema::{Dependency, FullName};

/// Convert build-spec dependency references into manifest dependencies.
///
/// Order is preserved. The first invalid name fails the whole conversion and
/// no partial list is returned. A non-empty version becomes the dependency's
/// only label, `version`.
pub fn to_dependencies(dependencies: &[FullName]) -> Result<Vec<Dependency>, AciError> {
    dependencies.iter().map(to_dependency).collect()
}

fn to_dependency(reference: &FullName) -> Result<Dependency, AciError> {
    let mut dependency = Dependency::new(identifier(reference.name())?);
    if !reference.version().is_empty() {
        dependency
            .labels
            .set(identifier("version")?, reference.version());
    }
    Ok(dependency)
}
