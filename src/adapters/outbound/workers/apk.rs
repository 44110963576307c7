use super::generic::{GenericWorker, LocationReader};
use crate::cataloging::domain::{
    ApkFileRecord, ApkMetadata, LinuxRelease, Package, PackageMetadata, PackageType, PackageUrl,
};
use crate::ports::outbound::{ContentResolver, Discovery, Environment};
use crate::shared::Result;

pub const WORKER_NAME: &str = "apkdb-cataloger";

pub fn apk_db_worker() -> GenericWorker {
    GenericWorker::new(WORKER_NAME).with_parser_by_globs(parse_apk_db, &["**/lib/apk/db/installed"])
}

/// Parses the installed database: blank-line separated records of
/// `K:value` lines. `F:` sets the directory for the following `R:` file
/// entries, and `Z:` is the checksum of the preceding file.
fn parse_apk_db(
    _: &dyn ContentResolver,
    env: &Environment,
    reader: LocationReader,
) -> Result<Discovery> {
    let location = reader.location.clone().as_primary_evidence();
    let content = reader.read_to_string()?.replace("\r\n", "\n");

    let mut packages = Vec::new();
    for record in content.split("\n\n") {
        let Some(metadata) = parse_record(record) else {
            continue;
        };

        let licenses: Vec<String> = metadata
            .license
            .split_whitespace()
            .map(str::to_string)
            .collect();
        let purl = package_url(&metadata, env.linux_release.as_ref());

        packages.push(
            Package::builder(metadata.package.clone(), metadata.version.clone(), PackageType::Apk)
                .licenses(licenses)
                .purl(purl)
                .metadata(PackageMetadata::Apk(metadata))
                .locations([location.clone()].into_iter().collect())
                .build()?,
        );
    }

    Ok(Discovery::new(packages, Vec::new()))
}

fn parse_record(record: &str) -> Option<ApkMetadata> {
    let mut metadata = ApkMetadata {
        package: String::new(),
        origin_package: String::new(),
        version: String::new(),
        architecture: String::new(),
        license: String::new(),
        url: String::new(),
        description: String::new(),
        files: Vec::new(),
    };
    let mut directory = String::new();

    for line in record.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        match key {
            "P" => metadata.package = value.to_string(),
            "o" => metadata.origin_package = value.to_string(),
            "V" => metadata.version = value.to_string(),
            "A" => metadata.architecture = value.to_string(),
            "L" => metadata.license = value.to_string(),
            "U" => metadata.url = value.to_string(),
            "T" => metadata.description = value.to_string(),
            "F" => directory = value.trim_matches('/').to_string(),
            "R" => {
                let path = if directory.is_empty() {
                    format!("/{}", value)
                } else {
                    format!("/{}/{}", directory, value)
                };
                metadata.files.push(ApkFileRecord { path, digest: None });
            }
            "Z" => {
                if let Some(file) = metadata.files.last_mut() {
                    file.digest = Some(value.to_string());
                }
            }
            _ => {}
        }
    }

    if metadata.package.is_empty() {
        return None;
    }
    if metadata.origin_package.is_empty() {
        metadata.origin_package = metadata.package.clone();
    }
    Some(metadata)
}

/// `pkg:apk/<distro>/<name>@<version>?arch=..&distro=..&upstream=..`, or
/// empty when the distribution is unknown.
fn package_url(metadata: &ApkMetadata, release: Option<&LinuxRelease>) -> String {
    let Some(release) = release.filter(|r| !r.id.is_empty()) else {
        return String::new();
    };

    let mut purl = PackageUrl::apk(&release.id, &metadata.package, &metadata.version)
        .with_qualifier("arch", metadata.architecture.clone());
    if metadata.origin_package != metadata.package {
        purl = purl.with_qualifier("upstream", metadata.origin_package.clone());
    }
    if !release.version_id.is_empty() {
        purl = purl.with_qualifier("distro", format!("{}-{}", release.id, release.version_id));
    }
    purl.to_string()
}
