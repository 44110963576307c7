use crate::cataloging::domain::Inventory;
use crate::ports::outbound::InventoryFormat;
use crate::shared::error::CatalogError;
use crate::shared::Result;

const HEADERS: [&str; 3] = ["NAME", "VERSION", "TYPE"];

/// TableFormat adapter rendering packages as aligned text columns
///
/// Encode only; a table cannot be decoded back into an inventory.
#[derive(Debug, Default, Clone, Copy)]
pub struct TableFormat;

impl TableFormat {
    pub const ID: &'static str = "table";

    pub fn new() -> Self {
        Self
    }
}

impl InventoryFormat for TableFormat {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn encode(&self, inventory: &Inventory) -> Result<String> {
        let mut rows: Vec<[String; 3]> = inventory
            .packages
            .sorted()
            .iter()
            .map(|p| {
                [
                    p.name().to_string(),
                    p.version().to_string(),
                    p.package_type().as_str().to_string(),
                ]
            })
            .collect();

        if rows.is_empty() {
            return Ok("No packages discovered\n".to_string());
        }

        rows.sort();
        rows.dedup();

        let mut widths = HEADERS.map(str::len);
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut output = String::new();
        let header = HEADERS.map(str::to_string);
        for row in std::iter::once(&header).chain(rows.iter()) {
            let line = format!(
                "{:<w0$}  {:<w1$}  {}",
                row[0],
                row[1],
                row[2],
                w0 = widths[0],
                w1 = widths[1]
            );
            output.push_str(line.trim_end());
            output.push('\n');
        }
        Ok(output)
    }

    fn decode(&self, _content: &str) -> Result<Inventory> {
        Err(CatalogError::Decode {
            format: Self::ID.to_string(),
            details: "the table format is write-only".to_string(),
        }
        .into())
    }

    fn validate(&self, _content: &str) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cataloging::domain::{Collection, Package, PackageType};

    fn package(name: &str, version: &str, kind: PackageType) -> Package {
        Package::builder(name, version, kind).build().unwrap()
    }

    #[test]
    fn test_empty_inventory() {
        let output = TableFormat::new().encode(&Inventory::default()).unwrap();
        assert_eq!(output, "No packages discovered\n");
    }

    #[test]
    fn test_rows_sorted_and_aligned() {
        let packages: Collection = [
            package("rack", "3.0.8", PackageType::Gem),
            package("musl", "1.2.4-r2", PackageType::Apk),
        ]
        .into_iter()
        .collect();
        let output = TableFormat::new()
            .encode(&Inventory::new(packages, Vec::new()))
            .unwrap();

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "NAME  VERSION   TYPE");
        assert_eq!(lines[1], "musl  1.2.4-r2  apk");
        assert_eq!(lines[2], "rack  3.0.8     gem");
    }

    #[test]
    fn test_decode_is_unsupported() {
        assert!(TableFormat::new().decode("NAME VERSION TYPE").is_err());
        assert!(!TableFormat::new().validate("anything"));
    }
}
