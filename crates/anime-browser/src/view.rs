//! Plain-text rendering of store snapshots.
//!
//! Rendering is a pure function of the state; nothing here talks to the store.

use crate::favorites::FavoritesSet;
use crate::store::{AppState, DetailState, SearchPhase, SearchState};
use shared::{AnimeSummary, Pagination};
use std::fmt::Write;

const RULE: &str = "------------------------------------------------------------";

/// Render whichever page is active: the detail page wins over search results
pub fn render(state: &AppState) -> String {
    if state.detail.is_active() {
        render_detail(&state.detail, &state.favorites)
    } else {
        render_search(&state.search, &state.favorites)
    }
}

/// Text for the global progress indicator
pub fn loading_bar(state: &AppState) -> &'static str {
    if state.is_loading() {
        "[loading...]"
    } else {
        ""
    }
}

pub fn render_search(search: &SearchState, favorites: &FavoritesSet) -> String {
    let mut out = String::new();

    match search.phase() {
        SearchPhase::Loading => {
            let _ = writeln!(out, "Searching for \"{}\"...", search.query.trim());
        }
        SearchPhase::Failure => {
            let _ = writeln!(out, "Something went wrong");
            let _ = writeln!(out, "{}", search.error.as_deref().unwrap_or_default());
        }
        SearchPhase::Idle => {
            let _ = writeln!(out, "Search for Anime");
            let _ = writeln!(out, "Start typing to discover your favorite anime");
        }
        SearchPhase::Success if search.results.is_empty() => {
            let _ = writeln!(out, "No Results Found");
            let _ = writeln!(
                out,
                "We couldn't find any anime matching \"{}\". Try different keywords.",
                search.query.trim()
            );
        }
        SearchPhase::Success => {
            let _ = writeln!(out, "Results for \"{}\"", search.query.trim());
            if let Some(total) = search.total_items {
                let _ = writeln!(out, "{} matches", total);
            }
            let _ = writeln!(out, "{}", RULE);
            for anime in &search.results {
                let _ = writeln!(out, "{}", card_line(anime, favorites.contains(anime.id)));
            }
            let _ = writeln!(out, "{}", RULE);
            let _ = writeln!(out, "{}", pagination_line(&search.pagination));
        }
    }

    out
}

pub fn render_detail(detail: &DetailState, favorites: &FavoritesSet) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "< Back to Search (:back)");

    if detail.loading {
        let _ = writeln!(out, "Loading anime #{}...", detail.requested_id.unwrap_or_default());
        return out;
    }
    if let Some(error) = &detail.error {
        let _ = writeln!(out, "Something went wrong");
        let _ = writeln!(out, "{}", error);
        return out;
    }
    let Some(anime) = &detail.selected else {
        return out;
    };
    let summary = &anime.summary;

    let marker = if favorites.contains(anime.id()) { " [fav]" } else { "" };
    let _ = writeln!(out, "{}{}", summary.title, marker);
    if let Some(english) = summary.title_english.as_deref().filter(|t| *t != summary.title) {
        let _ = writeln!(out, "{}", english);
    }
    let _ = writeln!(out, "{}", RULE);

    let mut facts = Vec::new();
    if let Some(score) = summary.score {
        facts.push(format!("Score: {:.2}", score));
    }
    if let Some(kind) = &summary.kind {
        facts.push(format!("Type: {}", kind));
    }
    facts.push(format!("Status: {}", summary.status));
    let _ = writeln!(out, "{}", facts.join(" | "));

    let fields = [
        ("Episodes", summary.episodes.map(|e| e.to_string())),
        ("Duration", summary.duration.clone()),
        ("Year", summary.year.map(|y| y.to_string())),
        ("Rating", summary.rating.clone()),
        ("Aired", summary.aired_range()),
        ("Genres", Some(summary.genre_names()).filter(|s| !s.is_empty())),
        ("Studios", Some(summary.studio_names()).filter(|s| !s.is_empty())),
        ("Image", summary.cover_url().map(str::to_string)),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            let _ = writeln!(out, "{:<9} {}", format!("{}:", label), value);
        }
    }

    if let Some(synopsis) = &anime.synopsis {
        let _ = writeln!(out, "{}", RULE);
        let _ = writeln!(out, "Synopsis");
        let _ = writeln!(out, "{}", synopsis);
    }

    out
}

pub fn render_favorites(favorites: &FavoritesSet) -> String {
    if favorites.is_empty() {
        return "No favorites yet".to_string();
    }
    let ids: Vec<String> = favorites.iter().map(|id| format!("#{}", id)).collect();
    format!("Favorites ({}): {}", favorites.len(), ids.join(", "))
}

fn card_line(anime: &AnimeSummary, is_favorite: bool) -> String {
    let star = if is_favorite { '*' } else { ' ' };
    let score = anime
        .score
        .map(|s| format!("{:.2}", s))
        .unwrap_or_else(|| "-".to_string());
    let kind = anime.kind.as_deref().unwrap_or("N/A");
    let episodes = anime
        .episodes
        .map(|e| format!(" {} eps", e))
        .unwrap_or_default();

    format!(
        "{} #{:<6} {:<5} {}  [{}{}]",
        star,
        anime.id,
        score,
        anime.display_title(),
        kind,
        episodes
    )
}

fn pagination_line(pagination: &Pagination) -> String {
    let mut line = format!("Page {} of {}", pagination.current_page, pagination.total_pages);
    if pagination.has_previous_page() {
        line.push_str("  :prev");
    }
    if pagination.has_next_page {
        line.push_str("  :next");
    }
    line
}
