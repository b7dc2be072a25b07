//! Jikan API v4 response types.
//!
//! These types represent the JSON responses from the Jikan API and know how to
//! turn themselves into the domain models in `shared`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{AnimeDetail, AnimeSummary, ImageUrls, Pagination, SearchPage, Tag};

/// Paginated search response (`GET /anime?q=...`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub data: Vec<AnimeEntry>,
    pub pagination: PaginationInfo,
}

/// Single record response (`GET /anime/{id}`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimeResponse {
    pub data: AnimeEntry,
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationInfo {
    pub last_visible_page: u32,
    pub has_next_page: bool,
    pub current_page: u32,
    #[serde(default)]
    pub items: Option<PaginationItems>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationItems {
    pub count: u32,
    pub total: u32,
    pub per_page: u32,
}

/// Anime record as returned by both search and detail endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimeEntry {
    pub mal_id: u32,
    #[serde(default)]
    pub images: AnimeImages,

    // Titles
    pub title: String,
    pub title_english: Option<String>,

    // Type and status
    #[serde(rename = "type")]
    pub anime_type: Option<String>,
    pub episodes: Option<u32>,
    pub status: Option<String>,

    // Dates
    #[serde(default)]
    pub aired: Option<Aired>,
    pub duration: Option<String>,
    pub rating: Option<String>,
    pub year: Option<u32>,

    pub score: Option<f64>,
    pub synopsis: Option<String>,

    #[serde(default)]
    pub genres: Vec<MalEntity>,
    #[serde(default)]
    pub studios: Vec<MalEntity>,
}

/// Anime images
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnimeImages {
    #[serde(default)]
    pub jpg: ImageSet,
    #[serde(default)]
    pub webp: Option<ImageSet>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageSet {
    pub image_url: Option<String>,
    pub small_image_url: Option<String>,
    pub large_image_url: Option<String>,
}

/// Aired dates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Aired {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// MAL entity (genre, studio, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MalEntity {
    pub mal_id: u32,
    pub name: String,
}

impl SearchResponse {
    pub fn into_page(self) -> SearchPage {
        SearchPage {
            results: self.data.into_iter().map(AnimeEntry::into_summary).collect(),
            pagination: Pagination {
                current_page: self.pagination.current_page,
                total_pages: self.pagination.last_visible_page,
                has_next_page: self.pagination.has_next_page,
            },
            total_items: self.pagination.items.map(|items| items.total),
        }
    }
}

impl AnimeEntry {
    pub fn into_summary(self) -> AnimeSummary {
        self.into_detail().summary
    }

    pub fn into_detail(self) -> AnimeDetail {
        let (aired_from, aired_to) = match &self.aired {
            Some(aired) => (parse_timestamp(aired.from.as_deref()), parse_timestamp(aired.to.as_deref())),
            None => (None, None),
        };

        AnimeDetail {
            summary: AnimeSummary {
                id: self.mal_id,
                title: self.title,
                title_english: self.title_english,
                kind: self.anime_type,
                images: ImageUrls {
                    image_url: self.images.jpg.image_url,
                    small_image_url: self.images.jpg.small_image_url,
                    large_image_url: self.images.jpg.large_image_url,
                },
                score: self.score,
                episodes: self.episodes,
                year: self.year,
                duration: self.duration,
                rating: self.rating,
                status: self.status.unwrap_or_else(|| "Unknown".to_string()),
                genres: self.genres.into_iter().map(MalEntity::into_tag).collect(),
                studios: self.studios.into_iter().map(MalEntity::into_tag).collect(),
                aired_from,
                aired_to,
            },
            synopsis: self.synopsis,
        }
    }
}

impl MalEntity {
    fn into_tag(self) -> Tag {
        Tag {
            id: self.mal_id,
            name: self.name,
        }
    }
}

/// Jikan sends RFC 3339 timestamps such as `2009-04-05T00:00:00+00:00`
fn parse_timestamp(value: Option<&str>) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value?)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH_BODY: &str = r#"{
        "pagination": {
            "last_visible_page": 5,
            "has_next_page": true,
            "current_page": 3,
            "items": { "count": 20, "total": 97, "per_page": 20 }
        },
        "data": [
            {
                "mal_id": 20,
                "url": "https://myanimelist.net/anime/20/Naruto",
                "images": {
                    "jpg": {
                        "image_url": "https://cdn.myanimelist.net/images/anime/13/17405.jpg",
                        "small_image_url": null,
                        "large_image_url": "https://cdn.myanimelist.net/images/anime/13/17405l.jpg"
                    }
                },
                "title": "Naruto",
                "title_english": "Naruto",
                "type": "TV",
                "episodes": 220,
                "status": "Finished Airing",
                "aired": {
                    "from": "2002-10-03T00:00:00+00:00",
                    "to": "2007-02-08T00:00:00+00:00",
                    "string": "Oct 3, 2002 to Feb 8, 2007"
                },
                "duration": "23 min per ep",
                "rating": "PG-13 - Teens 13 or older",
                "score": 8.0,
                "synopsis": "Moments prior to Naruto Uzumaki's birth...",
                "year": 2002,
                "studios": [{ "mal_id": 1, "type": "anime", "name": "Studio Pierrot", "url": "" }],
                "genres": [
                    { "mal_id": 1, "type": "anime", "name": "Action", "url": "" },
                    { "mal_id": 2, "type": "anime", "name": "Adventure", "url": "" }
                ]
            },
            {
                "mal_id": 1735,
                "title": "Naruto: Shippuuden",
                "title_english": null,
                "type": null,
                "episodes": null,
                "status": null,
                "aired": { "from": null, "to": null },
                "duration": null,
                "rating": null,
                "score": null,
                "synopsis": null,
                "year": null
            }
        ]
    }"#;

    #[test]
    fn test_search_page_pagination() {
        let response: SearchResponse = serde_json::from_str(SEARCH_BODY).unwrap();
        let page = response.into_page();

        assert_eq!(
            page.pagination,
            Pagination {
                current_page: 3,
                total_pages: 5,
                has_next_page: true,
            }
        );
        assert_eq!(page.total_items, Some(97));
        assert_eq!(page.results.len(), 2);
    }

    #[test]
    fn test_entry_conversion() {
        let response: SearchResponse = serde_json::from_str(SEARCH_BODY).unwrap();
        let page = response.into_page();
        let naruto = &page.results[0];

        assert_eq!(naruto.id, 20);
        assert_eq!(naruto.kind.as_deref(), Some("TV"));
        assert_eq!(naruto.genre_names(), "Action, Adventure");
        assert_eq!(naruto.studio_names(), "Studio Pierrot");
        assert_eq!(naruto.aired_range().as_deref(), Some("2002-10-03 to 2007-02-08"));
        assert_eq!(
            naruto.cover_url(),
            Some("https://cdn.myanimelist.net/images/anime/13/17405l.jpg")
        );
    }

    #[test]
    fn test_sparse_entry_uses_defaults() {
        let response: SearchResponse = serde_json::from_str(SEARCH_BODY).unwrap();
        let page = response.into_page();
        let sparse = &page.results[1];

        assert_eq!(sparse.status, "Unknown");
        assert!(sparse.genres.is_empty());
        assert!(sparse.studios.is_empty());
        assert_eq!(sparse.aired_from, None);
        assert_eq!(sparse.cover_url(), None);
    }

    #[test]
    fn test_detail_keeps_synopsis() {
        let body = r#"{ "data": { "mal_id": 5114, "title": "Fullmetal Alchemist: Brotherhood",
            "title_english": null, "type": "TV", "episodes": 64, "status": "Finished Airing",
            "duration": null, "rating": null, "year": 2009, "score": 9.1,
            "synopsis": "After a horrific alchemy experiment goes wrong..." } }"#;
        let response: AnimeResponse = serde_json::from_str(body).unwrap();
        let detail = response.data.into_detail();

        assert_eq!(detail.id(), 5114);
        assert_eq!(detail.summary.score, Some(9.1));
        assert!(detail.synopsis.unwrap().starts_with("After a horrific"));
    }

    #[test]
    fn test_parse_timestamp() {
        assert!(parse_timestamp(Some("2009-04-05T00:00:00+00:00")).is_some());
        assert!(parse_timestamp(Some("April 2009")).is_none());
        assert!(parse_timestamp(None).is_none());
    }
}
