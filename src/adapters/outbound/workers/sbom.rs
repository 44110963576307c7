use super::generic::{GenericWorker, LocationReader};
use crate::adapters::outbound::formats::BomtraceJsonFormat;
use crate::cataloging::domain::{Endpoint, LocationSet, Package, Relationship};
use crate::ports::outbound::{ContentResolver, Discovery, Environment, InventoryFormat};
use crate::shared::Result;
use std::collections::HashSet;

pub const WORKER_NAME: &str = "sbom-cataloger";

const SBOM_GLOBS: [&str; 4] = [
    "**/*.bomtrace.json",
    "**/*.sbom.json",
    "**/sbom.json",
    "**/*.bom.json",
];

pub fn sbom_worker() -> GenericWorker {
    GenericWorker::new(WORKER_NAME).with_parser_by_globs(parse_sbom, &SBOM_GLOBS)
}

/// Re-homes the packages of a nested inventory document onto the file they
/// were found in. Documents of other formats are skipped.
fn parse_sbom(
    _: &dyn ContentResolver,
    _: &Environment,
    reader: LocationReader,
) -> Result<Discovery> {
    let location = reader.location.clone().as_primary_evidence();
    let content = reader
        .read_to_string()
        .map_err(|e| anyhow::anyhow!("failed to read {}: {}", location.real_path(), e))?;

    let format = BomtraceJsonFormat::new();
    if !format.validate(&content) {
        tracing::debug!(path = %location.real_path(), "not a bomtrace document, skipping");
        return Ok(Discovery::default());
    }
    let inventory = format.decode(&content)?;

    let locations: LocationSet = [location].into_iter().collect();
    let packages: Vec<Package> = inventory
        .packages
        .sorted()
        .into_iter()
        .map(|p| {
            p.with_locations(locations.clone())
                .with_found_by(WORKER_NAME)
        })
        .collect();

    // only edges between packages of this document carry over
    let ids: HashSet<_> = packages.iter().map(Endpoint::from).collect();
    let relationships: Vec<Relationship> = inventory
        .relationships
        .into_iter()
        .filter(|r| ids.contains(&r.from) && ids.contains(&r.to))
        .collect();

    Ok(Discovery::new(packages, relationships))
}
