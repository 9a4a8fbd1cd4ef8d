use chrono::NaiveDate;
use folio_http::{Validate, Violations};
use serde::{Deserialize, Serialize};

/// Exclusive lower bound accepted by the publish-date range filter
pub fn earliest_filter_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Exclusive upper bound accepted by the publish-date range filter
pub fn latest_filter_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2500, 1, 1).unwrap_or(NaiveDate::MAX)
}

/// A book held in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Server-assigned identifier
    pub id: u64,
    pub title: String,
    pub author: String,
    pub description: String,
    /// Rating from 1 to 5
    pub rating: u8,
    pub publish_date: NaiveDate,
}

/// Payload for creating or replacing a book.
///
/// `id` is ignored on create and required on update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookRequest {
    #[serde(default)]
    pub id: Option<u64>,
    pub title: String,
    pub author: String,
    pub description: String,
    pub rating: u8,
    pub publish_date: NaiveDate,
}

impl BookRequest {
    /// Materialize the request as a book stored under `id`
    pub fn into_book(self, id: u64) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            description: self.description,
            rating: self.rating,
            publish_date: self.publish_date,
        }
    }
}

impl Validate for BookRequest {
    fn validate(&self, violations: &mut Violations) {
        violations.min_chars("title", &self.title, 3);
        violations.min_chars("author", &self.author, 3);
        violations.chars_between("description", &self.description, 1, 100);
        violations.in_range("rating", self.rating, 1, 5);
    }
}

/// `?book_rating=N` on the list endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct RatingQuery {
    pub book_rating: Option<u8>,
}

impl Validate for RatingQuery {
    fn validate(&self, violations: &mut Violations) {
        if let Some(rating) = self.book_rating {
            violations.in_range("book_rating", rating, 1, 5);
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookIdPath {
    pub book_id: u64,
}

impl Validate for BookIdPath {
    fn validate(&self, violations: &mut Violations) {
        if self.book_id == 0 {
            violations.push("book_id", "must be a positive integer");
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DateRangePath {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Validate for DateRangePath {
    fn validate(&self, violations: &mut Violations) {
        violations.strictly_between(
            "start_date",
            self.start_date,
            earliest_filter_date(),
            latest_filter_date(),
        );
        violations.strictly_between(
            "end_date",
            self.end_date,
            earliest_filter_date(),
            latest_filter_date(),
        );
    }
}
