//! Domain models for catalog entries.
//!
//! These are the immutable value objects the store holds and the view renders.
//! They are decoupled from the Jikan wire format, which lives in the
//! `jikan-client` crate and is converted into these types on arrival.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Genre or studio tag attached to an anime
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: u32,
    pub name: String,
}

/// Cover image URLs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUrls {
    pub image_url: Option<String>,
    pub small_image_url: Option<String>,
    pub large_image_url: Option<String>,
}

/// Anime as shown in a search results list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimeSummary {
    pub id: u32,

    // Titles
    pub title: String,
    pub title_english: Option<String>,

    pub kind: Option<String>, // TV, Movie, OVA, etc.
    pub images: ImageUrls,

    // Scores and counts
    pub score: Option<f64>,
    pub episodes: Option<u32>,
    pub year: Option<u32>,
    pub duration: Option<String>,
    pub rating: Option<String>,
    pub status: String,

    // Classifications, in catalog order
    pub genres: Vec<Tag>,
    pub studios: Vec<Tag>,

    // Dates
    pub aired_from: Option<DateTime<Utc>>,
    pub aired_to: Option<DateTime<Utc>>,
}

impl AnimeSummary {
    /// English title when the catalog has one, the default title otherwise
    pub fn display_title(&self) -> &str {
        self.title_english
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(&self.title)
    }

    /// Best image for a large view
    pub fn cover_url(&self) -> Option<&str> {
        self.images
            .large_image_url
            .as_deref()
            .or(self.images.image_url.as_deref())
    }

    /// Comma separated genre names
    pub fn genre_names(&self) -> String {
        join_names(&self.genres)
    }

    /// Comma separated studio names
    pub fn studio_names(&self) -> String {
        join_names(&self.studios)
    }

    /// Human readable airing period, e.g. `2009-04-05 to 2010-07-04`
    pub fn aired_range(&self) -> Option<String> {
        let from = self.aired_from?.format("%Y-%m-%d").to_string();
        match self.aired_to {
            Some(to) => Some(format!("{} to {}", from, to.format("%Y-%m-%d"))),
            None => Some(format!("{} to ?", from)),
        }
    }
}

/// Full record for the detail view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimeDetail {
    #[serde(flatten)]
    pub summary: AnimeSummary,
    pub synopsis: Option<String>,
}

impl AnimeDetail {
    pub fn id(&self) -> u32 {
        self.summary.id
    }
}

/// Pagination cursor of the search results view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub has_next_page: bool,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            has_next_page: false,
        }
    }
}

impl Pagination {
    pub fn has_previous_page(&self) -> bool {
        self.current_page > 1
    }
}

/// One page of search results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    pub results: Vec<AnimeSummary>,
    pub pagination: Pagination,
    /// Total number of matches across all pages, when the catalog reports it
    pub total_items: Option<u32>,
}

fn join_names(tags: &[Tag]) -> String {
    tags.iter()
        .map(|t| t.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn summary() -> AnimeSummary {
        AnimeSummary {
            id: 5114,
            title: "Hagane no Renkinjutsushi: Fullmetal Alchemist".to_string(),
            title_english: Some("Fullmetal Alchemist: Brotherhood".to_string()),
            kind: Some("TV".to_string()),
            images: ImageUrls {
                image_url: Some("https://cdn.example/5114.jpg".to_string()),
                small_image_url: None,
                large_image_url: None,
            },
            score: Some(9.1),
            episodes: Some(64),
            year: Some(2009),
            duration: Some("24 min per ep".to_string()),
            rating: Some("R - 17+".to_string()),
            status: "Finished Airing".to_string(),
            genres: vec![
                Tag { id: 1, name: "Action".to_string() },
                Tag { id: 2, name: "Adventure".to_string() },
            ],
            studios: vec![Tag { id: 4, name: "Bones".to_string() }],
            aired_from: Some(Utc.with_ymd_and_hms(2009, 4, 5, 0, 0, 0).unwrap()),
            aired_to: Some(Utc.with_ymd_and_hms(2010, 7, 4, 0, 0, 0).unwrap()),
        }
    }

    #[test]
    fn test_display_title_prefers_english() {
        let mut anime = summary();
        assert_eq!(anime.display_title(), "Fullmetal Alchemist: Brotherhood");

        anime.title_english = Some("  ".to_string());
        assert_eq!(anime.display_title(), anime.title);

        anime.title_english = None;
        assert_eq!(anime.display_title(), anime.title);
    }

    #[test]
    fn test_cover_url_falls_back_to_default_image() {
        let anime = summary();
        assert_eq!(anime.cover_url(), Some("https://cdn.example/5114.jpg"));
    }

    #[test]
    fn test_tag_names_keep_catalog_order() {
        let anime = summary();
        assert_eq!(anime.genre_names(), "Action, Adventure");
        assert_eq!(anime.studio_names(), "Bones");
    }

    #[test]
    fn test_aired_range() {
        let mut anime = summary();
        assert_eq!(anime.aired_range().as_deref(), Some("2009-04-05 to 2010-07-04"));

        anime.aired_to = None;
        assert_eq!(anime.aired_range().as_deref(), Some("2009-04-05 to ?"));

        anime.aired_from = None;
        assert_eq!(anime.aired_range(), None);
    }

    #[test]
    fn test_detail_serializes_flat() {
        let detail = AnimeDetail {
            summary: summary(),
            synopsis: Some("Two brothers".to_string()),
        };
        let value = serde_json::to_value(&detail).unwrap();
        assert_eq!(value["id"], 5114);
        assert_eq!(value["synopsis"], "Two brothers");
    }

    #[test]
    fn test_default_pagination() {
        let pagination = Pagination::default();
        assert_eq!(pagination.current_page, 1);
        assert_eq!(pagination.total_pages, 1);
        assert!(!pagination.has_next_page);
        assert!(!pagination.has_previous_page());
    }
}
