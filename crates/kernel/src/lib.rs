pub mod module;
pub mod registry;
pub mod settings;

pub use module::{SeedCtx, SeedModule};
pub use registry::{ModuleRegistry, SeedReport, SeedStep};
