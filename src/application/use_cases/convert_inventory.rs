use crate::application::factories::FormatFactory;
use crate::cataloging::domain::Inventory;
use crate::shared::error::CatalogError;
use crate::shared::Result;

/// ConvertInventoryUseCase - Re-encodes an inventory document
///
/// The input format is detected from the content, so identifiers and
/// relationships pass through identity reconciliation on the way in.
pub struct ConvertInventoryUseCase;

impl ConvertInventoryUseCase {
    pub fn new() -> Self {
        Self
    }

    /// Decodes `content` and encodes it as `target_format`
    ///
    /// # Errors
    /// - `Decode` if no supported format recognizes `content`
    /// - `UnknownFormat` if `target_format` is not supported
    pub fn execute(&self, content: &str, target_format: &str) -> Result<String> {
        let target = FormatFactory::create(target_format)?;
        let inventory = Self::decode(content)?;
        tracing::info!(
            packages = inventory.packages.len(),
            relationships = inventory.relationships.len(),
            target = target.id(),
            "converting inventory"
        );
        target.encode(&inventory)
    }

    /// Decodes `content` with the first format that recognizes it.
    pub fn decode(content: &str) -> Result<Inventory> {
        let format = FormatFactory::detect(content).ok_or_else(|| CatalogError::Decode {
            format: "unknown".to_string(),
            details: format!(
                "content is not a document of any supported format ({})",
                FormatFactory::supported().join(", ")
            ),
        })?;
        format.decode(content)
    }
}

impl Default for ConvertInventoryUseCase {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document() -> String {
        json!({
            "artifacts": [
                {"id": "pkg-1", "name": "rack", "version": "3.0.8", "type": "gem",
                 "locations": [{"path": "/app/Gemfile.lock"}]},
                {"id": "pkg-2", "name": "puma", "version": "6.4.0", "type": "gem",
                 "locations": [{"path": "/app/Gemfile.lock"}]}
            ],
            "artifactRelationships": [
                {"parent": "pkg-1", "child": "pkg-2", "type": "dependency-of"},
                {"parent": "pkg-1", "child": "missing", "type": "dependency-of"}
            ],
            "schema": {"version": "1.0.0"}
        })
        .to_string()
    }

    #[test]
    fn test_convert_to_table() {
        let output = ConvertInventoryUseCase::new()
            .execute(&document(), "table")
            .unwrap();
        assert!(output.starts_with("NAME"));
        assert!(output.contains("puma"));
        assert!(output.contains("rack"));
    }

    #[test]
    fn test_convert_to_json_keeps_ids_and_drops_dangling_edges() {
        let output = ConvertInventoryUseCase::new()
            .execute(&document(), "json")
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        let ids: Vec<&str> = value["artifacts"]
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["pkg-1", "pkg-2"]);

        let edges = value["artifactRelationships"].as_array().unwrap();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0]["parent"], json!("pkg-1"));
    }

    #[test]
    fn test_unrecognized_input() {
        let err = ConvertInventoryUseCase::new()
            .execute("<bom/>", "json")
            .err()
            .unwrap();
        assert!(matches!(
            err.downcast_ref::<CatalogError>(),
            Some(CatalogError::Decode { .. })
        ));
    }

    #[test]
    fn test_unknown_target_format() {
        let err = ConvertInventoryUseCase::new()
            .execute(&document(), "spdx")
            .err()
            .unwrap();
        assert!(matches!(
            err.downcast_ref::<CatalogError>(),
            Some(CatalogError::UnknownFormat { .. })
        ));
    }
}
