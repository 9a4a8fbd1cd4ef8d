//! In-memory book catalog.
//!
//! The catalog owns an ordered list of books behind a single lock. Every
//! operation takes the lock exactly once, so id assignment and list mutation
//! are atomic with respect to concurrent requests.

use chrono::NaiveDate;
use parking_lot::RwLock;
use thiserror::Error;

use super::models::{Book, BookRequest};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("book {0} not found")]
    NotFound(u64),
}

#[derive(Debug, Default)]
pub struct Catalog {
    books: RwLock<Vec<Book>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog pre-loaded with `books`, kept in the given order
    pub fn with_books(books: Vec<Book>) -> Self {
        Self {
            books: RwLock::new(books),
        }
    }

    /// Replace the contents with `books` if the catalog is still empty.
    /// Returns whether the books were loaded.
    pub fn seed(&self, books: Vec<Book>) -> bool {
        let mut guard = self.books.write();
        if !guard.is_empty() {
            return false;
        }
        *guard = books;
        true
    }

    pub fn len(&self) -> usize {
        self.books.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.read().is_empty()
    }

    /// Snapshot of every book in catalog order
    pub fn list(&self) -> Vec<Book> {
        self.books.read().clone()
    }

    pub fn get(&self, id: u64) -> Result<Book, CatalogError> {
        self.books
            .read()
            .iter()
            .find(|book| book.id == id)
            .cloned()
            .ok_or(CatalogError::NotFound(id))
    }

    pub fn by_rating(&self, rating: u8) -> Vec<Book> {
        self.matching(|book| book.rating == rating)
    }

    /// Books published strictly after `start` and strictly before `end`
    pub fn published_between(&self, start: NaiveDate, end: NaiveDate) -> Vec<Book> {
        self.matching(|book| start < book.publish_date && book.publish_date < end)
    }

    /// Append a new book and return it with its assigned id.
    ///
    /// The id is one past the last book's id, or 1 for an empty catalog. Any
    /// id on the request is ignored.
    pub fn create(&self, request: BookRequest) -> Book {
        let mut books = self.books.write();
        let id = books.last().map_or(1, |last| last.id + 1);
        let book = request.into_book(id);
        books.push(book.clone());
        book
    }

    /// Replace, in place, every book whose id matches `book.id`.
    pub fn update(&self, book: Book) -> Result<(), CatalogError> {
        let mut books = self.books.write();
        let mut replaced = 0usize;
        for slot in books.iter_mut().filter(|slot| slot.id == book.id) {
            *slot = book.clone();
            replaced += 1;
        }

        if replaced == 0 {
            return Err(CatalogError::NotFound(book.id));
        }
        debug_assert_eq!(replaced, 1, "book ids are unique");
        Ok(())
    }

    /// Remove the first book with `id`, if any.
    pub fn delete(&self, id: u64) -> Option<Book> {
        let mut books = self.books.write();
        let index = books.iter().position(|book| book.id == id)?;
        Some(books.remove(index))
    }

    fn matching(&self, predicate: impl Fn(&Book) -> bool) -> Vec<Book> {
        self.books
            .read()
            .iter()
            .filter(|book| predicate(book))
            .cloned()
            .collect()
    }
}

/// The six books the catalog ships with
pub fn sample_books() -> Vec<Book> {
    let entries: [(&str, &str, &str, u8, (i32, u32, u32)); 6] = [
        ("Computer Science Pro", "codingwithroby", "A very nice book!", 5, (2020, 1, 5)),
        ("Be Fast with FastAPI", "codingwithroby", "A great book!", 5, (2015, 1, 5)),
        ("Master Endpoints", "codingwithroby", "A awesome book!", 5, (2009, 1, 5)),
        ("HP1", "Author 1", "Book Description", 2, (1998, 1, 5)),
        ("HP2", "Author 2", "Book Description", 3, (1990, 1, 5)),
        ("HP3", "Author 3", "Book Description", 1, (1985, 1, 5)),
    ];

    entries
        .into_iter()
        .zip(1u64..)
        .filter_map(|((title, author, description, rating, (y, m, d)), id)| {
            Some(Book {
                id,
                title: title.to_string(),
                author: author.to_string(),
                description: description.to_string(),
                rating,
                publish_date: NaiveDate::from_ymd_opt(y, m, d)?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn request(title: &str, rating: u8, publish_date: NaiveDate) -> BookRequest {
        BookRequest {
            id: None,
            title: title.to_string(),
            author: "Someone".to_string(),
            description: "Plain description".to_string(),
            rating,
            publish_date,
        }
    }

    fn ids(books: &[Book]) -> Vec<u64> {
        books.iter().map(|book| book.id).collect()
    }

    #[test]
    fn sequential_creates_assign_one_through_n() {
        let catalog = Catalog::new();
        for n in 0..5 {
            let book = catalog.create(request(&format!("Book {n}"), 3, date(2000, 1, 1)));
            assert_eq!(book.id, n + 1);
        }
        assert_eq!(ids(&catalog.list()), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn create_ignores_client_id_and_follows_last_entry() {
        let catalog = Catalog::with_books(sample_books());
        let mut with_id = request("Client id", 4, date(2001, 1, 1));
        with_id.id = Some(99);

        let book = catalog.create(with_id);
        assert_eq!(book.id, 7);
        assert_eq!(catalog.list().last().unwrap().id, 7);
    }

    #[test]
    fn get_returns_not_found_for_absent_id() {
        let catalog = Catalog::with_books(sample_books());
        assert_eq!(catalog.get(3).unwrap().title, "Master Endpoints");
        assert_eq!(catalog.get(42), Err(CatalogError::NotFound(42)));
        assert_eq!(Catalog::new().get(1), Err(CatalogError::NotFound(1)));
    }

    #[test]
    fn rating_filter_keeps_catalog_order() {
        let catalog = Catalog::with_books(sample_books());
        assert_eq!(ids(&catalog.by_rating(5)), vec![1, 2, 3]);
        assert_eq!(ids(&catalog.by_rating(2)), vec![4]);
        assert!(catalog.by_rating(4).is_empty());
        assert!(Catalog::new().by_rating(5).is_empty());
    }

    #[test]
    fn date_filter_is_strict_on_both_sides() {
        let catalog = Catalog::with_books(sample_books());

        assert_eq!(
            ids(&catalog.published_between(date(1990, 1, 5), date(2015, 1, 5))),
            vec![3, 4]
        );
        assert_eq!(
            ids(&catalog.published_between(date(1985, 1, 4), date(2020, 1, 6))),
            vec![1, 2, 3, 4, 5, 6]
        );
    }

    #[test]
    fn reversed_date_range_is_empty() {
        let catalog = Catalog::with_books(sample_books());
        assert!(catalog
            .published_between(date(2020, 1, 1), date(1980, 1, 1))
            .is_empty());
    }

    #[test]
    fn update_replaces_in_place() {
        let catalog = Catalog::with_books(sample_books());
        let replacement = request("Rewritten", 1, date(1999, 9, 9)).into_book(5);

        catalog.update(replacement.clone()).unwrap();

        assert_eq!(catalog.get(5).unwrap(), replacement);
        assert_eq!(ids(&catalog.list()), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn update_of_absent_id_leaves_catalog_unchanged() {
        let catalog = Catalog::with_books(sample_books());
        let before = catalog.list();

        let result = catalog.update(request("Ghost", 3, date(2000, 1, 1)).into_book(77));

        assert_eq!(result, Err(CatalogError::NotFound(77)));
        assert_eq!(catalog.list(), before);
    }

    #[test]
    fn delete_removes_only_first_match_and_keeps_order() {
        let duplicate = request("Duplicate", 2, date(2001, 1, 1)).into_book(2);
        let mut books = sample_books();
        books.push(duplicate.clone());
        let catalog = Catalog::with_books(books);

        let removed = catalog.delete(2).unwrap();
        assert_eq!(removed.title, "Be Fast with FastAPI");
        assert_eq!(ids(&catalog.list()), vec![1, 3, 4, 5, 6, 2]);
        assert_eq!(catalog.get(2).unwrap(), duplicate);
    }

    #[test]
    fn delete_of_absent_id_is_a_no_op() {
        let catalog = Catalog::with_books(sample_books());
        assert!(catalog.delete(100).is_none());
        assert_eq!(catalog.len(), 6);
    }

    #[test]
    fn seed_only_fills_an_empty_catalog() {
        let catalog = Catalog::new();
        assert!(catalog.seed(sample_books()));
        assert!(!catalog.seed(Vec::new()));
        assert_eq!(catalog.len(), 6);
    }

    #[test]
    fn concurrent_creates_never_share_an_id() {
        let catalog = Arc::new(Catalog::new());
        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let catalog = Arc::clone(&catalog);
                std::thread::spawn(move || {
                    for n in 0..25 {
                        catalog.create(request(&format!("w{worker}-{n}"), 3, date(2000, 1, 1)));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let mut assigned = ids(&catalog.list());
        assigned.sort_unstable();
        assert_eq!(assigned, (1..=200).collect::<Vec<u64>>());
    }
}
