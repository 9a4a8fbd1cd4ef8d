pub mod models;
pub mod routes;
pub mod store;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use folio_authz::{PasswordHasher, TokenService};
use folio_kernel::{InitCtx, Module, SchemaStatement};
use serde_json::json;
use sqlx::SqlitePool;

use routes::UsersState;
use store::UserStore;

/// Current-user and password-change endpoints backed by the `users` table
pub struct UsersModule {
    state: UsersState,
}

impl UsersModule {
    pub fn new(pool: SqlitePool, tokens: Arc<TokenService>, hasher: PasswordHasher) -> Self {
        Self {
            state: UsersState {
                store: UserStore::new(pool),
                tokens,
                hasher,
            },
        }
    }
}

#[async_trait]
impl Module for UsersModule {
    fn name(&self) -> &'static str {
        "users"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            algorithm = %ctx.settings.auth.algorithm,
            "users module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.state.clone())
    }

    fn schema(&self) -> Vec<SchemaStatement> {
        schema()
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let error = json!({
            "content": {
                "application/json": { "schema": { "$ref": "#/components/schemas/ErrorResponse" } }
            }
        });
        let with_description = |description: &str| {
            let mut response = error.clone();
            response["description"] = json!(description);
            response
        };

        Some(json!({
            "paths": {
                "/users/user": {
                    "get": {
                        "summary": "Current user's profile",
                        "tags": ["Users"],
                        "security": [{ "bearerAuth": [] }],
                        "responses": {
                            "200": {
                                "description": "Profile of the authenticated user",
                                "content": {
                                    "application/json": { "schema": { "$ref": "#/components/schemas/UserProfile" } }
                                }
                            },
                            "401": with_description("Missing or invalid bearer token"),
                            "404": with_description("User no longer exists")
                        }
                    }
                },
                "/users/change_password": {
                    "post": {
                        "summary": "Change the current user's password",
                        "tags": ["Users"],
                        "security": [{ "bearerAuth": [] }],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": { "schema": { "$ref": "#/components/schemas/ChangePasswordRequest" } }
                            }
                        },
                        "responses": {
                            "204": { "description": "Password changed" },
                            "401": with_description("Invalid token or old password"),
                            "422": with_description("Validation error")
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "UserProfile": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer" },
                            "email": { "type": "string" },
                            "username": { "type": "string" },
                            "first_name": { "type": "string" },
                            "last_name": { "type": "string" },
                            "is_active": { "type": "boolean" },
                            "role": { "type": "string" },
                            "phone_number": { "type": ["string", "null"] }
                        },
                        "required": ["id", "email", "username", "first_name", "last_name", "is_active", "role"]
                    },
                    "ChangePasswordRequest": {
                        "type": "object",
                        "properties": {
                            "old_password": { "type": "string" },
                            "new_password": { "type": "string", "minLength": 6 }
                        },
                        "required": ["old_password", "new_password"]
                    }
                }
            }
        }))
    }
}

/// Table DDL owned by the users module
pub fn schema() -> Vec<SchemaStatement> {
    vec![store::USERS_TABLE]
}

/// Create the users module from its collaborators
pub fn create_module(
    pool: SqlitePool,
    tokens: Arc<TokenService>,
    hasher: PasswordHasher,
) -> Arc<UsersModule> {
    Arc::new(UsersModule::new(pool, tokens, hasher))
}
