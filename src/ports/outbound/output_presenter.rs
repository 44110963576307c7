use crate::shared::Result;

/// OutputPresenter port for presenting final output
///
/// This port abstracts the output destination (stdout, file, etc.)
/// where the encoded inventory is presented.
pub trait OutputPresenter {
    /// Presents the encoded inventory to the output destination
    ///
    /// # Arguments
    /// * `content` - The encoded inventory document
    ///
    /// # Errors
    /// Returns an error if:
    /// - Writing to the output destination fails
    /// - The destination is a symlink or its directory does not exist
    fn present(&self, content: &str) -> Result<()>;
}
