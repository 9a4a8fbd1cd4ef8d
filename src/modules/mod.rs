pub mod books;
pub mod users;

use std::sync::Arc;

use folio_authz::{PasswordHasher, TokenService};
use folio_kernel::{ModuleRegistry, SchemaStatement};
use sqlx::SqlitePool;

/// Collaborators the project modules are built from
pub struct ModuleDeps {
    pub db: SqlitePool,
    pub tokens: Arc<TokenService>,
    pub hasher: PasswordHasher,
}

/// Register all project-specific modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, deps: ModuleDeps) {
    registry.register(books::create_module());
    registry.register(users::create_module(deps.db, deps.tokens, deps.hasher));
}

/// Every module's schema statements, in registration order.
///
/// Matches what the registry collects, without building the modules and their
/// collaborators.
pub fn schema_statements() -> Vec<(&'static str, SchemaStatement)> {
    users::schema()
        .into_iter()
        .map(|statement| ("users", statement))
        .collect()
}
