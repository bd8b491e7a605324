//! Command implementations

mod audit;
mod common;
mod settings;
mod sync;

pub use audit::Audit;
pub use common::Workspace;
pub use settings::Settings;
pub use sync::Sync;
