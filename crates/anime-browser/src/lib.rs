//! Anime Browser - terminal anime search built on the Jikan catalog.
//!
//! This crate provides:
//! - An application store with a reducer and stale-response guards
//! - Debounced search input
//! - Favorites persisted to local storage
//! - Plain-text views of the store state

pub mod command;
pub mod debounce;
pub mod favorites;
pub mod storage;
pub mod store;
pub mod view;

pub use command::{Command, CommandError};
pub use favorites::{FavoritesSet, FavoritesStore};
pub use storage::LocalStorage;
pub use store::{AppState, Intent, QueryInput, Store, ViewSignal};
