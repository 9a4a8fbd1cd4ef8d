pub mod catalog;
pub mod models;
pub mod routes;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use folio_kernel::{InitCtx, Module};
use serde_json::json;

use catalog::Catalog;

/// In-memory book catalog module
pub struct BooksModule {
    catalog: Arc<Catalog>,
}

impl BooksModule {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        if ctx.settings.books.seed_sample_catalog && self.catalog.seed(catalog::sample_books()) {
            tracing::info!(
                module = self.name(),
                books = self.catalog.len(),
                "sample catalog loaded"
            );
        }

        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.catalog.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let book_list = json!({
            "description": "List of books",
            "content": {
                "application/json": {
                    "schema": { "type": "array", "items": { "$ref": "#/components/schemas/Book" } }
                }
            }
        });
        let validation_error = json!({
            "description": "Validation error",
            "content": {
                "application/json": { "schema": { "$ref": "#/components/schemas/ErrorResponse" } }
            }
        });
        let not_found = json!({
            "description": "Book not found",
            "content": {
                "application/json": { "schema": { "$ref": "#/components/schemas/ErrorResponse" } }
            }
        });
        let book_request_body = json!({
            "required": true,
            "content": {
                "application/json": { "schema": { "$ref": "#/components/schemas/BookRequest" } }
            }
        });
        let book_id_param = json!({
            "name": "book_id",
            "in": "path",
            "required": true,
            "schema": { "type": "integer", "minimum": 1 }
        });

        Some(json!({
            "paths": {
                "/books": {
                    "get": {
                        "summary": "List books, optionally filtered by rating",
                        "tags": ["Books"],
                        "parameters": [{
                            "name": "book_rating",
                            "in": "query",
                            "required": false,
                            "schema": { "type": "integer", "minimum": 1, "maximum": 5 }
                        }],
                        "responses": { "200": book_list, "422": validation_error }
                    }
                },
                "/books/{book_id}": {
                    "get": {
                        "summary": "Get a book by id",
                        "tags": ["Books"],
                        "parameters": [book_id_param],
                        "responses": {
                            "200": {
                                "description": "The book",
                                "content": {
                                    "application/json": { "schema": { "$ref": "#/components/schemas/Book" } }
                                }
                            },
                            "404": not_found,
                            "422": validation_error
                        }
                    },
                    "delete": {
                        "summary": "Delete a book by id",
                        "tags": ["Books"],
                        "parameters": [book_id_param],
                        "responses": {
                            "204": { "description": "Deleted, or nothing to delete" },
                            "422": validation_error
                        }
                    }
                },
                "/books/filter_by_date/{start_date}/{end_date}": {
                    "get": {
                        "summary": "Books published strictly between two dates",
                        "tags": ["Books"],
                        "parameters": [
                            { "name": "start_date", "in": "path", "required": true, "schema": { "type": "string", "format": "date" } },
                            { "name": "end_date", "in": "path", "required": true, "schema": { "type": "string", "format": "date" } }
                        ],
                        "responses": { "200": book_list, "422": validation_error }
                    }
                },
                "/create-book": {
                    "post": {
                        "summary": "Create a book",
                        "tags": ["Books"],
                        "requestBody": book_request_body,
                        "responses": { "201": { "description": "Created" }, "422": validation_error }
                    }
                },
                "/books/update_book": {
                    "put": {
                        "summary": "Replace a book",
                        "tags": ["Books"],
                        "requestBody": book_request_body,
                        "responses": {
                            "204": { "description": "Updated" },
                            "404": not_found,
                            "422": validation_error
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer", "description": "Server-assigned identifier" },
                            "title": { "type": "string" },
                            "author": { "type": "string" },
                            "description": { "type": "string" },
                            "rating": { "type": "integer", "minimum": 1, "maximum": 5 },
                            "publish_date": { "type": "string", "format": "date" }
                        },
                        "required": ["id", "title", "author", "description", "rating", "publish_date"]
                    },
                    "BookRequest": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer", "description": "Ignored on create, required on update" },
                            "title": { "type": "string", "minLength": 3 },
                            "author": { "type": "string", "minLength": 3 },
                            "description": { "type": "string", "minLength": 1, "maxLength": 100 },
                            "rating": { "type": "integer", "minimum": 1, "maximum": 5 },
                            "publish_date": { "type": "string", "format": "date" }
                        },
                        "required": ["title", "author", "description", "rating", "publish_date"],
                        "example": {
                            "title": "A new book",
                            "author": "An author",
                            "description": "Some descriptions",
                            "rating": 3,
                            "publish_date": "1995-06-01"
                        }
                    }
                }
            }
        }))
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            books = self.catalog.len(),
            "books module stopped"
        );
        Ok(())
    }
}

/// Create a new instance of the books module with an empty catalog
pub fn create_module() -> Arc<BooksModule> {
    Arc::new(BooksModule::new(Arc::new(Catalog::new())))
}
