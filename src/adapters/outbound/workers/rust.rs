use super::generic::{GenericWorker, LocationReader};
use crate::cataloging::domain::{
    CargoLockMetadata, Language, Package, PackageMetadata, PackageType, PackageUrl, Relationship,
    RelationshipType,
};
use crate::ports::outbound::{ContentResolver, Discovery, Environment};
use crate::shared::Result;
use serde::Deserialize;
use std::collections::HashMap;

pub const WORKER_NAME: &str = "rust-cargo-lock-cataloger";

pub fn cargo_lock_worker() -> GenericWorker {
    GenericWorker::new(WORKER_NAME).with_parser_by_globs(parse_cargo_lock, &["**/Cargo.lock"])
}

#[derive(Debug, Deserialize)]
struct CargoLock {
    #[serde(default)]
    package: Vec<CargoLockPackage>,
}

#[derive(Debug, Deserialize)]
struct CargoLockPackage {
    name: String,
    version: String,
    source: Option<String>,
    checksum: Option<String>,
    #[serde(default)]
    dependencies: Vec<String>,
}

/// Reads `[[package]]` tables and links each package to its dependents.
///
/// Dependency references are `name`, `name version` or
/// `name version (source)`; a bare name only resolves when the lock file
/// holds a single version of it.
fn parse_cargo_lock(
    _: &dyn ContentResolver,
    _: &Environment,
    reader: LocationReader,
) -> Result<Discovery> {
    let location = reader.location.clone().as_primary_evidence();
    let content = reader.read_to_string()?;
    let lock: CargoLock =
        toml::from_str(&content).map_err(|e| anyhow::anyhow!("failed to parse Cargo.lock: {}", e))?;

    let mut packages = Vec::with_capacity(lock.package.len());
    let mut by_name: HashMap<&str, Vec<usize>> = HashMap::new();
    for (i, entry) in lock.package.iter().enumerate() {
        let package = Package::builder(&entry.name, &entry.version, PackageType::RustCrate)
            .language(Language::Rust)
            .purl(PackageUrl::cargo(&entry.name, &entry.version).to_string())
            .metadata(PackageMetadata::CargoLock(CargoLockMetadata {
                name: entry.name.clone(),
                version: entry.version.clone(),
                source: entry.source.clone(),
                checksum: entry.checksum.clone(),
                dependencies: entry.dependencies.clone(),
            }))
            .locations([location.clone()].into_iter().collect())
            .build()?;
        packages.push(package);
        by_name.entry(entry.name.as_str()).or_default().push(i);
    }

    let resolve = |reference: &str| -> Option<usize> {
        let mut parts = reference.split_whitespace();
        let name = parts.next()?;
        let candidates = by_name.get(name)?;
        match parts.next() {
            Some(version) => candidates
                .iter()
                .copied()
                .find(|i| lock.package[*i].version == version),
            None if candidates.len() == 1 => Some(candidates[0]),
            None => None,
        }
    };

    let mut relationships = Vec::new();
    for (dependent, entry) in lock.package.iter().enumerate() {
        for reference in &entry.dependencies {
            match resolve(reference) {
                Some(dependency) => relationships.push(Relationship::new(
                    &packages[dependency],
                    &packages[dependent],
                    RelationshipType::DependencyOf,
                )),
                None => tracing::debug!(
                    path = %location.real_path(),
                    package = %entry.name,
                    dependency = %reference,
                    "unresolved Cargo.lock dependency"
                ),
            }
        }
    }

    Ok(Discovery::new(packages, relationships))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::outbound::resolvers::InMemoryResolver;
    use crate::cataloging::domain::{Endpoint, Identifiable};
    use crate::ports::outbound::Worker;

    const CARGO_LOCK: &str = r#"
version = 3

[[package]]
name = "app"
version = "0.1.0"
dependencies = [
 "serde",
 "syn 2.0.48",
 "missing",
]

[[package]]
name = "serde"
version = "1.0.196"
source = "registry+https://github.com/rust-lang/crates.io-index"
checksum = "870026e60fa08c69f064aa766c10f10b1d62db9ccd4d0abb206472bee0ce3b32"

[[package]]
name = "syn"
version = "1.0.109"
source = "registry+https://github.com/rust-lang/crates.io-index"

[[package]]
name = "syn"
version = "2.0.48"
source = "registry+https://github.com/rust-lang/crates.io-index"
"#;

    #[test]
    fn test_parse_cargo_lock_packages_and_dependencies() {
        let resolver = InMemoryResolver::new().with_file("/src/Cargo.lock", CARGO_LOCK);
        let discovery = cargo_lock_worker()
            .catalog(&resolver, &Environment::default())
            .unwrap();

        assert_eq!(discovery.packages.len(), 4);
        let find = |name: &str, version: &str| {
            discovery
                .packages
                .iter()
                .find(|p| p.name() == name && p.version() == version)
                .unwrap()
                .id()
        };
        let app = find("app", "0.1.0");

        let edges: Vec<(Endpoint, Endpoint)> = discovery
            .relationships
            .iter()
            .map(|r| {
                assert_eq!(r.kind, RelationshipType::DependencyOf);
                (r.from.clone(), r.to.clone())
            })
            .collect();
        assert_eq!(
            edges,
            vec![
                (Endpoint::Package(find("serde", "1.0.196")), Endpoint::Package(app.clone())),
                (Endpoint::Package(find("syn", "2.0.48")), Endpoint::Package(app)),
            ]
        );
    }

    #[test]
    fn test_invalid_toml_fails_location() {
        let resolver = InMemoryResolver::new().with_file("/Cargo.lock", "[[package]\nname =");
        let failure = cargo_lock_worker()
            .catalog(&resolver, &Environment::default())
            .unwrap_err();
        assert!(failure.error.to_string().contains("Cargo.lock"));
    }
}
