pub mod bookmarks;
pub mod catalog;
pub mod details;
pub mod history;
pub mod home;
pub mod search;

pub use bookmarks::{BookmarkList, Favorites, Watchlist};
pub use catalog::{CatalogClient, SearchRequest, TmdbClient};
pub use details::{DetailsLoader, MovieDetailsView};
pub use history::RecentSearches;
pub use home::{HomeFeed, HomeSnapshot};
pub use search::{SearchEngine, SearchOutcome, SearchSnapshot};
