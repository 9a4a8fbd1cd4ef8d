//! Core traits, settings, and the module registry shared by every Folio crate.

pub mod module;
pub mod registry;
pub mod settings;

pub use module::{InitCtx, Module, SchemaStatement};
pub use registry::ModuleRegistry;
pub use settings::Settings;
