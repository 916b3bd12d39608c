//! Google Books API response types
//!
//! Only the subset of the volumes payload this system persists. The wire
//! format is camelCase; everything defaults so sparse volumes deserialize.

use serde::Deserialize;
use shelf_protocol::{Book, IndustryIdentifier};

/// `GET /volumes` response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VolumeSearchResults {
    pub kind: String,
    pub total_items: u64,
    pub items: Vec<Volume>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Volume {
    pub id: String,
    pub volume_info: VolumeInfo,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VolumeInfo {
    pub title: String,
    pub subtitle: String,
    pub authors: Vec<String>,
    pub publisher: String,
    pub published_date: String,
    pub description: String,
    pub industry_identifiers: Vec<VolumeIdentifier>,
    pub page_count: i64,
    pub categories: Vec<String>,
    pub language: String,
    pub image_links: ImageLinks,
    pub dimensions: VolumeDimensions,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VolumeIdentifier {
    #[serde(rename = "type")]
    pub kind: String,
    pub identifier: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageLinks {
    pub thumbnail: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VolumeDimensions {
    pub height: f64,
    pub width: f64,
    pub thickness: f64,
}

impl VolumeDimensions {
    /// Printable `H x W x T` form, or empty when the volume reports nothing.
    fn format(&self) -> String {
        if self.height > 0.0 || self.width > 0.0 || self.thickness > 0.0 {
            format!("{} x {} x {}", self.height, self.width, self.thickness)
        } else {
            String::new()
        }
    }
}

impl From<Volume> for Book {
    fn from(v: Volume) -> Self {
        let info = v.volume_info;

        let mut isbn10 = None;
        let mut isbn13 = None;
        for id in &info.industry_identifiers {
            match id.kind.as_str() {
                "ISBN_10" => isbn10 = Some(id.identifier.clone()),
                "ISBN_13" => isbn13 = Some(id.identifier.clone()),
                _ => {}
            }
        }

        Book {
            natural_key: v.id,
            title: info.title,
            title_long: info.subtitle,
            isbn10,
            isbn13,
            publisher: info.publisher,
            language: info.language,
            date_published: info.published_date,
            pages: info.page_count,
            dimensions: info.dimensions.format(),
            image: info.image_links.thumbnail,
            synopsis: info.description,
            authors: info.authors,
            subjects: info.categories,
            industry_identifiers: info
                .industry_identifiers
                .into_iter()
                .map(|id| IndustryIdentifier {
                    kind: id.kind,
                    identifier: id.identifier,
                })
                .collect(),
            ..Book::default()
        }
    }
}
