use crate::adapters::outbound::formats::{BomtraceJsonFormat, TableFormat};
use crate::ports::outbound::InventoryFormat;
use crate::shared::error::CatalogError;
use crate::shared::Result;

/// Factory for inventory formats
///
/// Picks a format by identifier for encoding, or by content for decoding.
pub struct FormatFactory;

impl FormatFactory {
    /// Every supported format, in detection order.
    pub fn all() -> Vec<Box<dyn InventoryFormat>> {
        vec![Box::new(BomtraceJsonFormat::new()), Box::new(TableFormat::new())]
    }

    /// Identifiers of every supported format.
    pub fn supported() -> Vec<&'static str> {
        Self::all().iter().map(|f| f.id()).collect()
    }

    /// Creates the format registered as `id`
    ///
    /// # Errors
    /// `UnknownFormat` listing the supported identifiers
    pub fn create(id: &str) -> Result<Box<dyn InventoryFormat>> {
        Self::all()
            .into_iter()
            .find(|f| f.id().eq_ignore_ascii_case(id))
            .ok_or_else(|| {
                CatalogError::UnknownFormat {
                    name: id.to_string(),
                    supported: Self::supported().join(", "),
                }
                .into()
            })
    }

    /// First format whose `validate` accepts `content`.
    pub fn detect(content: &str) -> Option<Box<dyn InventoryFormat>> {
        Self::all().into_iter().find(|f| f.validate(content))
    }
}
