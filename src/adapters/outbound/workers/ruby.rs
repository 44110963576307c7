use super::generic::{GenericWorker, LocationReader};
use crate::cataloging::domain::{Language, Package, PackageType, PackageUrl};
use crate::ports::outbound::{ContentResolver, Discovery, Environment};
use crate::shared::Result;
use std::io::{BufRead, BufReader};

pub const WORKER_NAME: &str = "ruby-gemfile-cataloger";

const SECTIONS_OF_INTEREST: [&str; 4] = ["GEM", "GIT", "PATH", "PLUGIN SOURCE"];

pub fn gemfile_lock_worker() -> GenericWorker {
    GenericWorker::new(WORKER_NAME).with_parser_by_globs(parse_gemfile_lock, &["**/Gemfile.lock"])
}

/// Gem entries are indented by exactly four spaces; their own dependencies
/// by six.
fn is_dependency_line(line: &str) -> bool {
    line.len() >= 5 && line.as_bytes()[..5].iter().filter(|b| **b == b' ').count() == 4
}

fn parse_gemfile_lock(
    _: &dyn ContentResolver,
    _: &Environment,
    reader: LocationReader,
) -> Result<Discovery> {
    let location = reader.location.clone().as_primary_evidence();
    let mut packages = Vec::new();
    let mut section = String::new();

    for line in BufReader::new(reader).lines() {
        let line = line.map_err(|e| anyhow::anyhow!("failed to read Gemfile.lock: {}", e))?;

        if line.len() > 1 && !line.starts_with(' ') {
            section = line.trim().to_string();
            continue;
        }
        if !SECTIONS_OF_INTEREST.contains(&section.as_str()) || !is_dependency_line(&line) {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        let [name, version] = fields[..] else {
            continue;
        };
        let version = version.trim_matches(|c| c == '(' || c == ')');

        packages.push(
            Package::builder(name, version, PackageType::Gem)
                .language(Language::Ruby)
                .purl(PackageUrl::gem(name, version).to_string())
                .locations([location.clone()].into_iter().collect())
                .build()?,
        );
    }

    Ok(Discovery::new(packages, Vec::new()))
}
