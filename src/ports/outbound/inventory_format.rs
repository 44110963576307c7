use crate::cataloging::domain::Inventory;
use crate::shared::Result;

/// InventoryFormat port for encoding and decoding inventory documents
///
/// Each implementation handles one wire format identified by [`id`](Self::id).
pub trait InventoryFormat: Send + Sync {
    /// Short identifier used on the command line (e.g. `json`)
    fn id(&self) -> &'static str;

    /// Serializes an inventory
    ///
    /// # Errors
    /// Returns an error if serialization fails
    fn encode(&self, inventory: &Inventory) -> Result<String>;

    /// Rebuilds an inventory from a document
    ///
    /// # Errors
    /// Returns a `Decode` error if the content is not a document of this
    /// format, or if the format cannot be decoded at all
    fn decode(&self, content: &str) -> Result<Inventory>;

    /// Cheap check whether `content` looks like a document of this format
    fn validate(&self, content: &str) -> bool;
}
