//! Application bootstrap: database, modules, and HTTP server in startup order.

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use folio_authz::{PasswordHasher, TokenService};
use folio_kernel::{settings::Settings, InitCtx, ModuleRegistry};
use sqlx::SqlitePool;

use crate::modules::{self, ModuleDeps};

/// A fully initialized application, ready to serve
pub struct App {
    pub settings: Settings,
    pub db: SqlitePool,
    pub registry: ModuleRegistry,
    pub tokens: Arc<TokenService>,
    pub hasher: PasswordHasher,
}

impl App {
    /// Connect to the configured database and initialize every module
    pub async fn bootstrap(settings: Settings) -> anyhow::Result<Self> {
        let db = folio_db::connect(&settings.database).await?;
        Self::bootstrap_with_pool(settings, db).await
    }

    /// Initialize every module against an existing pool
    pub async fn bootstrap_with_pool(settings: Settings, db: SqlitePool) -> anyhow::Result<Self> {
        let tokens = Arc::new(
            TokenService::from_settings(&settings.auth)
                .context("failed to configure bearer token verification")?,
        );
        let hasher = PasswordHasher::new(settings.auth.bcrypt_cost)
            .context("failed to configure password hashing")?;

        let mut registry = ModuleRegistry::new();
        modules::register_all(
            &mut registry,
            ModuleDeps {
                db: db.clone(),
                tokens: tokens.clone(),
                hasher,
            },
        );

        folio_db::apply_schema(&db, &registry.collect_schema()).await?;

        let ctx = InitCtx {
            settings: &settings,
            db: &db,
        };
        registry.init_all(&ctx).await?;

        Ok(Self {
            settings,
            db,
            registry,
            tokens,
            hasher,
        })
    }

    /// Create missing tables and close the pool. Needs no signing secret.
    pub async fn apply_schema(settings: &Settings) -> anyhow::Result<()> {
        let db = folio_db::connect(&settings.database).await?;
        folio_db::apply_schema(&db, &modules::schema_statements()).await?;
        db.close().await;
        Ok(())
    }

    /// The complete HTTP router, without binding a socket
    pub fn router(&self) -> Router {
        folio_http::build_router(&self.registry, &self.settings)
    }

    /// Start modules, serve until shutdown, then stop modules and close the pool
    pub async fn serve(self) -> anyhow::Result<()> {
        let ctx = InitCtx {
            settings: &self.settings,
            db: &self.db,
        };
        self.registry.start_all(&ctx).await?;

        let served = folio_http::start_server(&self.registry, &self.settings).await;

        self.registry.stop_all().await?;
        self.db.close().await;
        served
    }
}
