use super::generic::{GenericWorker, LocationReader};
use crate::cataloging::domain::{
    Language, MixLockMetadata, Package, PackageMetadata, PackageType, PackageUrl,
};
use crate::ports::outbound::{ContentResolver, Discovery, Environment};
use crate::shared::Result;
use std::io::{BufRead, BufReader};

pub const WORKER_NAME: &str = "elixir-mix-lock-cataloger";

pub fn mix_lock_worker() -> GenericWorker {
    GenericWorker::new(WORKER_NAME).with_parser_by_globs(parse_mix_lock, &["**/mix.lock"])
}

fn is_delimiter(c: char) -> bool {
    matches!(c, '%' | '{' | '}' | '\n' | '"' | ' ' | ',' | ':')
}

/// Reads `"name": {:hex, :name, "version", "hash", ..., "hash_ext"},` entries.
fn parse_mix_lock(
    _: &dyn ContentResolver,
    _: &Environment,
    reader: LocationReader,
) -> Result<Discovery> {
    let location = reader.location.clone().as_primary_evidence();
    let mut packages = Vec::new();

    for line in BufReader::new(reader).lines() {
        let line = line.map_err(|e| anyhow::anyhow!("failed to read mix.lock: {}", e))?;
        let tokens: Vec<&str> = line.split(is_delimiter).filter(|t| !t.is_empty()).collect();
        if tokens.len() < 5 {
            continue;
        }
        if tokens[1] != "hex" {
            tracing::debug!(
                path = %location.real_path(),
                entry = tokens[0],
                "skipping non-hex mix.lock entry"
            );
            continue;
        }

        let (name, version, hash) = (tokens[0], tokens[3], tokens[4]);
        let hash_ext = tokens[tokens.len() - 1];

        let package = Package::builder(name, version, PackageType::Hex)
            .language(Language::Elixir)
            .purl(PackageUrl::hex(name, version).to_string())
            .metadata(PackageMetadata::MixLock(MixLockMetadata {
                name: name.to_string(),
                version: version.to_string(),
                pkg_hash: hash.to_string(),
                pkg_hash_ext: hash_ext.to_string(),
            }))
            .locations([location.clone()].into_iter().collect())
            .build()?;
        packages.push(package);
    }

    Ok(Discovery::new(packages, Vec::new()))
}
