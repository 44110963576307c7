use crate::cataloging::domain::document::{
    Document, DocumentFile, DocumentLocation, DocumentPackage, DocumentRelationship,
    DocumentSchema, DocumentSource,
};
use crate::cataloging::domain::{
    ArtifactId, Coordinates, Endpoint, Identifiable, Inventory, Location, Package,
};
use crate::cataloging::services::IdentityReconciler;
use crate::ports::outbound::InventoryFormat;
use crate::shared::error::CatalogError;
use crate::shared::Result;
use serde_json::Value;
use std::collections::BTreeMap;

/// BomtraceJsonFormat adapter for the native JSON inventory document
///
/// Encoding is deterministic: packages are written in identifier order and
/// relationships in canonical order with duplicates removed. Decoding goes
/// through [`IdentityReconciler`], so identifiers written by other tools
/// survive a round trip.
#[derive(Debug, Default, Clone, Copy)]
pub struct BomtraceJsonFormat;

impl BomtraceJsonFormat {
    pub const ID: &'static str = "json";

    pub fn new() -> Self {
        Self
    }

    fn to_document(inventory: &Inventory) -> Result<Document> {
        let artifacts = inventory
            .packages
            .sorted()
            .iter()
            .map(Self::package)
            .collect::<Result<Vec<_>>>()?;

        let relationships = inventory.sorted_relationships();

        // every coordinates endpoint gets a file entry so the edge resolves on decode
        let mut files: BTreeMap<ArtifactId, Coordinates> = inventory
            .files
            .iter()
            .map(|c| (c.id(), c.clone()))
            .collect();
        for relationship in &relationships {
            for endpoint in [&relationship.from, &relationship.to] {
                if let Endpoint::Coordinates(c) = endpoint {
                    files.insert(c.id(), c.clone());
                }
            }
        }

        let artifact_relationships = relationships
            .iter()
            .map(|r| DocumentRelationship {
                parent: r.from.id().to_string(),
                child: r.to.id().to_string(),
                kind: r.kind.as_str().to_string(),
                metadata: r.data.clone(),
            })
            .collect();

        let source = inventory
            .source
            .as_ref()
            .map(|s| DocumentSource {
                id: s.id.to_string(),
                kind: s.scheme.type_name().to_string(),
                target: s.scheme.target(),
            })
            .unwrap_or_default();

        Ok(Document {
            artifacts,
            artifact_relationships,
            files: files
                .into_iter()
                .map(|(id, c)| DocumentFile {
                    id: id.to_string(),
                    location: Self::coordinates(&c),
                })
                .collect(),
            source,
            distro: inventory.distro.clone(),
            descriptor: Some(inventory.descriptor.clone()),
            schema: DocumentSchema::default(),
        })
    }

    fn package(package: &Package) -> Result<DocumentPackage> {
        let (metadata_type, metadata) = match package.metadata() {
            Some(m) => (m.metadata_type().as_str().to_string(), m.to_value()?),
            None => (String::new(), Value::Null),
        };

        Ok(DocumentPackage {
            id: package.id().to_string(),
            name: package.name().to_string(),
            version: package.version().to_string(),
            package_type: package.package_type().as_str().to_string(),
            found_by: package.found_by().to_string(),
            locations: package.locations().iter().map(Self::location).collect(),
            licenses: package.licenses().iter().cloned().collect(),
            language: package.language().as_str().to_string(),
            purl: package.purl().to_string(),
            metadata_type,
            metadata,
        })
    }

    fn location(location: &Location) -> DocumentLocation {
        DocumentLocation {
            annotations: location.annotations.clone(),
            ..Self::coordinates(&location.coordinates)
        }
    }

    fn coordinates(coordinates: &Coordinates) -> DocumentLocation {
        DocumentLocation {
            path: coordinates.real_path.clone(),
            virtual_path: coordinates.virtual_path.clone(),
            annotations: BTreeMap::new(),
        }
    }

    fn decode_error(details: impl ToString) -> anyhow::Error {
        CatalogError::Decode {
            format: Self::ID.to_string(),
            details: details.to_string(),
        }
        .into()
    }
}

impl InventoryFormat for BomtraceJsonFormat {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn encode(&self, inventory: &Inventory) -> Result<String> {
        let document = Self::to_document(inventory)?;
        Ok(serde_json::to_string_pretty(&document)?)
    }

    fn decode(&self, content: &str) -> Result<Inventory> {
        let document: Document = serde_json::from_str(content).map_err(Self::decode_error)?;
        if document.schema.version.split('.').next() != Some("1") {
            return Err(Self::decode_error(format!(
                "unsupported schema version {}",
                document.schema.version
            )));
        }
        Ok(IdentityReconciler::new().reconcile(document))
    }

    fn validate(&self, content: &str) -> bool {
        match serde_json::from_str::<Value>(content) {
            Ok(Value::Object(map)) => {
                map.get("artifacts").is_some_and(Value::is_array)
                    && map.contains_key("artifactRelationships")
            }
            _ => false,
        }
    }
}
