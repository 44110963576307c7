mod cataloger_config;
mod ownership_tie;

pub use cataloger_config::CatalogerConfig;
pub use ownership_tie::{OwnershipConflict, OwnershipTiePolicy};
