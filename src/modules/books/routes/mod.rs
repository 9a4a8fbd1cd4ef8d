use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use folio_http::{AppError, ValidJson, ValidPath, ValidQuery};

use super::catalog::{Catalog, CatalogError};
use super::models::{Book, BookIdPath, BookRequest, DateRangePath, RatingQuery};

/// HTTP routes for the books module
pub fn router(catalog: Arc<Catalog>) -> Router {
    tracing::debug!(target: "folio.routes", module = "books", "registering routes");

    Router::new()
        .route("/books", get(list_books))
        .route("/books/", get(list_books))
        .route("/books/{book_id}", get(get_book).delete(delete_book))
        .route(
            "/books/filter_by_date/{start_date}/{end_date}",
            get(books_by_date_range),
        )
        .route("/books/update_book", put(update_book))
        .route("/create-book", post(create_book))
        .with_state(catalog)
}

/// Every book, or only those with `book_rating` when the query is present
async fn list_books(
    State(catalog): State<Arc<Catalog>>,
    ValidQuery(query): ValidQuery<RatingQuery>,
) -> Json<Vec<Book>> {
    match query.book_rating {
        Some(rating) => Json(catalog.by_rating(rating)),
        None => Json(catalog.list()),
    }
}

async fn get_book(
    State(catalog): State<Arc<Catalog>>,
    ValidPath(path): ValidPath<BookIdPath>,
) -> Result<Json<Book>, AppError> {
    catalog
        .get(path.book_id)
        .map(Json)
        .map_err(|CatalogError::NotFound(_)| AppError::not_found("Item not found."))
}

async fn books_by_date_range(
    State(catalog): State<Arc<Catalog>>,
    ValidPath(range): ValidPath<DateRangePath>,
) -> Json<Vec<Book>> {
    Json(catalog.published_between(range.start_date, range.end_date))
}

async fn create_book(
    State(catalog): State<Arc<Catalog>>,
    ValidJson(request): ValidJson<BookRequest>,
) -> StatusCode {
    let book = catalog.create(request);
    tracing::info!(book_id = book.id, title = %book.title, "book created");
    StatusCode::CREATED
}

async fn update_book(
    State(catalog): State<Arc<Catalog>>,
    ValidJson(request): ValidJson<BookRequest>,
) -> Result<StatusCode, AppError> {
    let id = request.id.ok_or_else(|| {
        AppError::validation(
            vec![serde_json::json!({"field": "id", "error": "required"})],
            "id is required to update a book",
        )
    })?;

    catalog
        .update(request.into_book(id))
        .map_err(|CatalogError::NotFound(_)| AppError::not_found("No book found to update."))?;

    tracing::info!(book_id = id, "book updated");
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_book(
    State(catalog): State<Arc<Catalog>>,
    ValidPath(path): ValidPath<BookIdPath>,
) -> StatusCode {
    match catalog.delete(path.book_id) {
        Some(book) => tracing::info!(book_id = book.id, "book deleted"),
        None => tracing::debug!(book_id = path.book_id, "delete of absent book ignored"),
    }
    StatusCode::NO_CONTENT
}
