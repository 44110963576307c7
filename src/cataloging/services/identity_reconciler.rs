use crate::cataloging::domain::document::{
    Document, DocumentLocation, DocumentPackage, DocumentRelationship, DocumentSource,
};
use crate::cataloging::domain::{
    ArtifactId, Collection, Coordinates, Endpoint, Identifiable, Inventory, Language, Location,
    LocationSet, MetadataType, Package, PackageMetadata, PackageType, Relationship,
    RelationshipType, SourceDescription, SourceScheme,
};
use crate::shared::Result;
use std::collections::{HashMap, HashSet};

/// IdentityReconciler rebuilds an inventory from a decoded document.
///
/// Package identifiers are kept verbatim from the document so references
/// held by other consumers stay valid. Every relationship is resolved
/// through an alias table and a one-shot lookup map; records that do not
/// resolve are dropped with a warning and never fail the decode.
#[derive(Debug, Default)]
pub struct IdentityReconciler {
    aliases: HashMap<String, ArtifactId>,
    lookup: HashMap<String, Endpoint>,
}

impl IdentityReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the inventory described by `document`
    ///
    /// # Arguments
    /// * `document` - A deserialized inventory document
    ///
    /// # Returns
    /// The inventory; problems with individual records are logged, not returned
    pub fn reconcile(mut self, document: Document) -> Inventory {
        let Document {
            artifacts,
            artifact_relationships,
            files,
            source,
            distro,
            descriptor,
            ..
        } = document;

        let document_ids: HashSet<&str> = artifacts
            .iter()
            .map(|a| a.id.as_str())
            .filter(|id| !id.is_empty())
            .collect();

        let collection = Collection::new();
        for artifact in &artifacts {
            let Some(package) = self.package(artifact, &document_ids) else {
                continue;
            };
            if let Err(e) = collection.add(package) {
                tracing::warn!(id = %artifact.id, error = %e, "skipping duplicate package record");
            }
        }

        for package in collection.sorted() {
            for location in package.locations() {
                self.lookup.insert(
                    location.coordinates.id().to_string(),
                    Endpoint::Coordinates(location.coordinates.clone()),
                );
            }
            self.lookup
                .insert(package.id().to_string(), Endpoint::Package(package.id()));
        }

        let source = Self::source(&source);
        if let Some(source) = source.as_ref().filter(|s| !s.id.is_empty()) {
            self.lookup
                .insert(source.id.to_string(), Endpoint::Source(source.id.clone()));
        }

        let mut coordinates = Vec::with_capacity(files.len());
        for file in &files {
            let c = Self::coordinates(&file.location);
            if !file.id.is_empty() {
                self.lookup
                    .insert(file.id.clone(), Endpoint::Coordinates(c.clone()));
            }
            coordinates.push(c);
        }

        let relationships: Vec<Relationship> = artifact_relationships
            .iter()
            .filter_map(|r| self.relationship(r))
            .collect();

        let mut inventory = Inventory::new(collection, relationships)
            .with_distro(distro.filter(|d| !d.is_empty()));
        if let Some(source) = source {
            inventory = inventory.with_source(source);
        }
        if let Some(descriptor) = descriptor {
            inventory = inventory.with_descriptor(descriptor);
        }
        inventory.files = coordinates;
        inventory
    }

    /// Converts one package record and records its aliases.
    ///
    /// The stored identifier is the document's. When the content-derived
    /// identifier differs, both the document identifier and (unless another
    /// record already uses it verbatim) the content-derived one resolve to
    /// the stored identifier.
    fn package(
        &mut self,
        record: &DocumentPackage,
        document_ids: &HashSet<&str>,
    ) -> Option<Package> {
        let package = match Self::build_package(record) {
            Ok(package) => package,
            Err(e) => {
                tracing::warn!(id = %record.id, error = %e, "skipping invalid package record");
                return None;
            }
        };

        if record.id.is_empty() {
            return Some(package);
        }

        let computed = package.id();
        let stored = ArtifactId::new(record.id.clone());
        if computed != stored {
            self.aliases.insert(record.id.clone(), stored.clone());
            if !document_ids.contains(computed.as_str()) {
                self.aliases.insert(computed.to_string(), stored.clone());
            }
        }
        Some(package.override_id(stored))
    }

    fn build_package(record: &DocumentPackage) -> Result<Package> {
        let locations: LocationSet = record.locations.iter().map(Self::location).collect();

        let mut builder = Package::builder(
            record.name.clone(),
            record.version.clone(),
            PackageType::parse(&record.package_type),
        )
        .found_by(record.found_by.clone())
        .language(Language::parse(&record.language))
        .licenses(record.licenses.iter().cloned())
        .purl(record.purl.clone())
        .locations(locations);

        if let Some(metadata) = Self::metadata(record) {
            builder = builder.metadata(metadata);
        }
        builder.build()
    }

    fn metadata(record: &DocumentPackage) -> Option<PackageMetadata> {
        if record.metadata_type.is_empty() {
            return None;
        }
        let Some(metadata_type) = MetadataType::parse(&record.metadata_type) else {
            tracing::warn!(
                id = %record.id,
                metadata_type = %record.metadata_type,
                "unknown metadata type, dropping metadata"
            );
            return None;
        };
        match PackageMetadata::from_value(metadata_type, record.metadata.clone()) {
            Ok(metadata) => Some(metadata),
            Err(e) => {
                tracing::warn!(
                    id = %record.id,
                    metadata_type = %metadata_type,
                    error = %e,
                    "malformed metadata, dropping metadata"
                );
                None
            }
        }
    }

    fn location(record: &DocumentLocation) -> Location {
        let mut location = Location::from_coordinates(Self::coordinates(record));
        location.annotations = record.annotations.clone();
        location
    }

    fn coordinates(record: &DocumentLocation) -> Coordinates {
        let coordinates = Coordinates::new(record.path.clone());
        match &record.virtual_path {
            Some(virtual_path) if !virtual_path.is_empty() => {
                coordinates.with_virtual_path(virtual_path.clone())
            }
            _ => coordinates,
        }
    }

    fn source(record: &DocumentSource) -> Option<SourceDescription> {
        if record.kind.is_empty() {
            return None;
        }
        let Some(scheme) = SourceScheme::from_target(&record.kind, &record.target) else {
            tracing::warn!(kind = %record.kind, "unable to parse source target");
            return None;
        };
        let description = SourceDescription {
            id: ArtifactId::new(record.id.clone()),
            scheme,
        };
        Some(description)
    }

    fn resolve(&self, id: &str) -> Option<&Endpoint> {
        let id = self.aliases.get(id).map(ArtifactId::as_str).unwrap_or(id);
        self.lookup.get(id)
    }

    fn relationship(&self, record: &DocumentRelationship) -> Option<Relationship> {
        let Some(from) = self.resolve(&record.parent) else {
            tracing::warn!(
                parent = %record.parent,
                "relationship parent does not resolve, dropping"
            );
            return None;
        };
        let Some(to) = self.resolve(&record.child) else {
            tracing::warn!(
                child = %record.child,
                "relationship child does not resolve, dropping"
            );
            return None;
        };
        if !from.is_identifiable() || !to.is_identifiable() {
            tracing::warn!(
                parent = %record.parent,
                child = %record.child,
                "relationship endpoint has no identifier, dropping"
            );
            return None;
        }

        let kind = match RelationshipType::normalize(&record.kind) {
            Some((kind, false)) => kind,
            Some((kind, true)) => {
                tracing::warn!(raw = %record.kind, assumed = %kind, "assuming relationship type");
                kind
            }
            None => {
                tracing::warn!(raw = %record.kind, "unknown relationship type, dropping");
                return None;
            }
        };

        let mut relationship = Relationship::new(from.clone(), to.clone(), kind);
        relationship.data = record.metadata.clone().filter(|m| !m.is_null());
        Some(relationship)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cataloging::domain::document::DocumentFile;
    use serde_json::json;

    fn record(id: &str, name: &str) -> DocumentPackage {
        DocumentPackage {
            id: id.to_string(),
            name: name.to_string(),
            version: "1.0.0".to_string(),
            package_type: "gem".to_string(),
            language: "ruby".to_string(),
            purl: format!("pkg:gem/{}@1.0.0", name),
            locations: vec![DocumentLocation {
                path: "/app/Gemfile.lock".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    fn edge(parent: &str, child: &str, kind: &str) -> DocumentRelationship {
        DocumentRelationship {
            parent: parent.to_string(),
            child: child.to_string(),
            kind: kind.to_string(),
            metadata: None,
        }
    }

    #[test]
    fn test_document_ids_are_kept_verbatim() {
        let document = Document {
            artifacts: vec![record("X", "rake"), record("Z", "rack")],
            artifact_relationships: vec![edge("X", "Z", "dependency-of")],
            ..Default::default()
        };

        let inventory = IdentityReconciler::new().reconcile(document);

        assert!(inventory.packages.contains(&ArtifactId::new("X")));
        assert_eq!(inventory.relationships.len(), 1);
        let r = &inventory.relationships[0];
        assert_eq!(r.from, Endpoint::Package(ArtifactId::new("X")));
        assert_eq!(r.to, Endpoint::Package(ArtifactId::new("Z")));
        assert_eq!(r.kind, RelationshipType::DependencyOf);
    }

    #[test]
    fn test_content_id_aliases_to_document_id() {
        let rake = record("X", "rake");
        let computed = IdentityReconciler::build_package(&rake).unwrap().id();
        assert_ne!(computed.as_str(), "X");

        let document = Document {
            artifacts: vec![rake, record("Z", "rack")],
            artifact_relationships: vec![edge(computed.as_str(), "Z", "contains")],
            ..Default::default()
        };

        let inventory = IdentityReconciler::new().reconcile(document);

        assert_eq!(inventory.relationships.len(), 1);
        assert_eq!(
            inventory.relationships[0].from,
            Endpoint::Package(ArtifactId::new("X"))
        );
    }

    #[test]
    fn test_empty_document_id_uses_content_id() {
        let document = Document {
            artifacts: vec![record("", "rake")],
            ..Default::default()
        };
        let inventory = IdentityReconciler::new().reconcile(document);
        let package = inventory.packages.sorted().remove(0);
        assert_eq!(package.id(), package.content_id());
    }

    #[test]
    fn test_unresolved_endpoints_are_dropped() {
        let document = Document {
            artifacts: vec![record("X", "rake")],
            artifact_relationships: vec![
                edge("X", "nowhere", "contains"),
                edge("ghost", "X", "contains"),
            ],
            ..Default::default()
        };
        let inventory = IdentityReconciler::new().reconcile(document);
        assert!(inventory.relationships.is_empty());
        assert_eq!(inventory.packages.len(), 1);
    }

    #[test]
    fn test_relationship_types_are_normalized_or_dropped() {
        let document = Document {
            artifacts: vec![record("X", "rake"), record("Z", "rack")],
            artifact_relationships: vec![
                edge("X", "Z", "dev-dependency-of"),
                edge("X", "Z", "described-by"),
            ],
            ..Default::default()
        };
        let inventory = IdentityReconciler::new().reconcile(document);
        assert_eq!(inventory.relationships.len(), 1);
        assert_eq!(inventory.relationships[0].kind, RelationshipType::DependencyOf);
    }

    #[test]
    fn test_location_source_and_file_ids_resolve() {
        let rake = record("X", "rake");
        let lockfile = Coordinates::new("/app/Gemfile.lock");
        let readme = Coordinates::new("/app/README.md");
        let document = Document {
            artifacts: vec![rake],
            artifact_relationships: vec![
                edge("X", lockfile.id().as_str(), "evident-by"),
                edge("src-1", "X", "contains"),
                edge("X", "file-1", "evident-by"),
            ],
            files: vec![DocumentFile {
                id: "file-1".to_string(),
                location: DocumentLocation {
                    path: "/app/README.md".to_string(),
                    ..Default::default()
                },
            }],
            source: DocumentSource {
                id: "src-1".to_string(),
                kind: "directory".to_string(),
                target: json!("/app"),
            },
            ..Default::default()
        };

        let inventory = IdentityReconciler::new().reconcile(document);

        assert_eq!(inventory.relationships.len(), 3);
        assert_eq!(
            inventory.relationships[0].to,
            Endpoint::Coordinates(lockfile)
        );
        assert_eq!(
            inventory.relationships[1].from,
            Endpoint::Source(ArtifactId::new("src-1"))
        );
        assert_eq!(inventory.relationships[2].to, Endpoint::Coordinates(readme));
        assert_eq!(inventory.source.unwrap().id.as_str(), "src-1");
        assert_eq!(inventory.files.len(), 1);
    }

    #[test]
    fn test_bad_source_target_is_ignored() {
        let document = Document {
            source: DocumentSource {
                id: "src-1".to_string(),
                kind: "directory".to_string(),
                target: json!({"unexpected": true}),
            },
            ..Default::default()
        };
        assert!(IdentityReconciler::new().reconcile(document).source.is_none());
    }

    #[test]
    fn test_source_without_id_is_not_an_endpoint() {
        let document = Document {
            artifacts: vec![record("X", "rake")],
            artifact_relationships: vec![edge("", "X", "contains")],
            source: DocumentSource {
                id: String::new(),
                kind: "directory".to_string(),
                target: json!("/app"),
            },
            ..Default::default()
        };

        let inventory = IdentityReconciler::new().reconcile(document);

        assert!(inventory.source.is_some());
        assert!(inventory.relationships.is_empty());
    }

    #[test]
    fn test_kept_relationships_have_identifiable_endpoints() {
        let lockfile = Coordinates::new("/app/Gemfile.lock");
        let document = Document {
            artifacts: vec![record("X", "rake"), record("Z", "rack")],
            artifact_relationships: vec![
                edge("X", "Z", "dependency-of"),
                edge("X", lockfile.id().as_str(), "evident-by"),
                edge("", "X", "contains"),
                edge("X", "", "contains"),
            ],
            files: vec![DocumentFile {
                id: String::new(),
                location: DocumentLocation::default(),
            }],
            source: DocumentSource {
                id: String::new(),
                kind: "directory".to_string(),
                target: json!("/app"),
            },
            ..Default::default()
        };

        let inventory = IdentityReconciler::new().reconcile(document);

        assert_eq!(inventory.relationships.len(), 2);
        assert!(inventory
            .relationships
            .iter()
            .all(|r| r.from.is_identifiable() && r.to.is_identifiable()));
    }

    #[test]
    fn test_conflicting_duplicate_id_keeps_first() {
        let mut second = record("X", "rack");
        second.version = "2.0.0".to_string();
        let document = Document {
            artifacts: vec![record("X", "rake"), second],
            ..Default::default()
        };
        let inventory = IdentityReconciler::new().reconcile(document);
        assert_eq!(inventory.packages.len(), 1);
        assert_eq!(
            inventory.packages.package(&ArtifactId::new("X")).unwrap().name(),
            "rake"
        );
    }

    #[test]
    fn test_unknown_metadata_type_is_dropped_not_fatal() {
        let mut rake = record("X", "rake");
        rake.metadata_type = "NpmPackageJsonMetadata".to_string();
        rake.metadata = json!({"name": "rake"});
        let document = Document {
            artifacts: vec![rake],
            ..Default::default()
        };
        let inventory = IdentityReconciler::new().reconcile(document);
        assert!(inventory.packages.sorted()[0].metadata().is_none());
    }
}
