//! ISBNdb API response types
//!
//! Field names follow the wire format. The API is loose with types in a few
//! places (`edition` and `msrp` can be a string or a number), so those fields
//! go through a lenient deserializer.

use serde::{Deserialize, Deserializer};
use shelf_protocol::{Book, OtherIsbn};

/// `GET /books/{query}` response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BookSearchResults {
    pub total: u64,
    pub books: Vec<IsbndbBook>,
}

/// `POST /books` (batched ISBN lookup) response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IsbnLookupResults {
    pub total: u64,
    pub requested: u64,
    pub data: Vec<IsbndbBook>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IsbndbBook {
    pub title: String,
    pub title_long: String,
    pub isbn: String,
    pub isbn13: String,
    pub dewey_decimal: String,
    pub binding: String,
    pub publisher: String,
    pub language: String,
    pub date_published: String,
    #[serde(deserialize_with = "string_or_number")]
    pub edition: String,
    pub pages: i64,
    pub dimensions: String,
    pub overview: String,
    pub image: String,
    #[serde(deserialize_with = "string_or_number")]
    pub msrp: String,
    pub excerpt: String,
    pub synopsis: String,
    pub authors: Vec<String>,
    pub subjects: Vec<String>,
    pub reviews: Vec<String>,
    pub related: Related,
    pub other_isbns: Vec<OtherIsbnEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Related {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OtherIsbnEntry {
    pub isbn: String,
    pub binding: String,
}

/// The API returns `edition` and `msrp` as either a string or a number.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

impl From<IsbndbBook> for Book {
    fn from(b: IsbndbBook) -> Self {
        Book {
            natural_key: b.isbn13.clone(),
            title: b.title,
            title_long: b.title_long,
            isbn10: Some(b.isbn),
            isbn13: Some(b.isbn13),
            dewey_decimal: b.dewey_decimal,
            binding: b.binding,
            publisher: b.publisher,
            language: b.language,
            date_published: b.date_published,
            edition: b.edition,
            pages: b.pages,
            dimensions: b.dimensions,
            overview: b.overview,
            image: b.image,
            msrp: b.msrp,
            excerpt: b.excerpt,
            synopsis: b.synopsis,
            related_type: b.related.kind,
            authors: b.authors,
            subjects: b.subjects,
            reviews: b.reviews,
            other_isbns: b
                .other_isbns
                .into_iter()
                .map(|o| OtherIsbn {
                    isbn: o.isbn,
                    binding: o.binding,
                })
                .collect(),
            industry_identifiers: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_search_results() {
        let json = r#"{
            "total": 2,
            "books": [
                {
                    "title": "The Rust Programming Language",
                    "isbn": "1593278284",
                    "isbn13": "9781593278281",
                    "publisher": "No Starch Press",
                    "language": "en",
                    "pages": 560,
                    "edition": 2,
                    "msrp": 39.95,
                    "authors": ["Steve Klabnik", "Carol Nichols"],
                    "subjects": ["Computers"],
                    "related": {"type": "print"},
                    "other_isbns": [{"isbn": "9781593278519", "binding": "ebook"}]
                }
            ]
        }"#;
        let results: BookSearchResults = serde_json::from_str(json).unwrap();
        assert_eq!(results.total, 2);
        let book = &results.books[0];
        assert_eq!(book.edition, "2");
        assert_eq!(book.msrp, "39.95");
        assert_eq!(book.authors.len(), 2);
        assert_eq!(book.related.kind, "print");
    }

    #[test]
    fn edition_accepts_string() {
        let json = r#"{"edition": "First", "msrp": "12.00"}"#;
        let book: IsbndbBook = serde_json::from_str(json).unwrap();
        assert_eq!(book.edition, "First");
        assert_eq!(book.msrp, "12.00");
    }

    #[test]
    fn missing_fields_default() {
        let book: IsbndbBook = serde_json::from_str(r#"{"isbn13": "9780000000002"}"#).unwrap();
        assert_eq!(book.isbn13, "9780000000002");
        assert!(book.title.is_empty());
        assert_eq!(book.pages, 0);
        assert!(book.other_isbns.is_empty());
    }

    #[test]
    fn converts_to_normalized_record() {
        let book = IsbndbBook {
            isbn: "1593278284".into(),
            isbn13: "9781593278281".into(),
            title: "TRPL".into(),
            ..Default::default()
        };
        let record: Book = book.into();
        assert_eq!(record.natural_key, "9781593278281");
        assert_eq!(record.isbn10.as_deref(), Some("1593278284"));
        assert_eq!(record.isbn13.as_deref(), Some("9781593278281"));
        assert!(record.industry_identifiers.is_empty());
    }

    #[test]
    fn deserializes_isbn_lookup_results() {
        let json = r#"{"total": 1, "requested": 3, "data": [{"isbn13": "9780000000001"}]}"#;
        let results: IsbnLookupResults = serde_json::from_str(json).unwrap();
        assert_eq!(results.requested, 3);
        assert_eq!(results.data.len(), 1);
    }
}
