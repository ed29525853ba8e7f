use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;

use crate::{
    models::{LoadState, Movie, MovieList},
    services::catalog::CatalogClient,
};

#[derive(Debug, Clone, Default, Serialize)]
pub struct HomeSection {
    pub movies: Vec<Movie>,
    pub state: LoadState,
}

#[derive(Debug, Clone, Serialize)]
pub struct HomeSnapshot {
    pub now_playing: HomeSection,
    pub popular: HomeSection,
    pub top_rated: HomeSection,
}

/// First page of each curated list, loaded concurrently
///
/// Sections succeed or fail independently. A failed section keeps the movies from its last
/// successful load.
pub struct HomeFeed {
    catalog: Arc<dyn CatalogClient>,
    sections: Mutex<HashMap<MovieList, HomeSection>>,
}

impl HomeFeed {
    pub fn new(catalog: Arc<dyn CatalogClient>) -> Self {
        Self {
            catalog,
            sections: Mutex::new(HashMap::new()),
        }
    }

    fn sections(&self) -> MutexGuard<'_, HashMap<MovieList, HomeSection>> {
        self.sections
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Reloads every section and returns the resulting snapshot
    pub async fn load(&self) -> HomeSnapshot {
        tokio::join!(
            self.load_section(MovieList::NowPlaying),
            self.load_section(MovieList::Popular),
            self.load_section(MovieList::TopRated),
        );
        self.snapshot()
    }

    pub async fn load_section(&self, list: MovieList) -> LoadState {
        self.sections().entry(list).or_default().state = LoadState::Loading;

        let result = self.catalog.movie_list(list, 1).await;

        let mut sections = self.sections();
        let section = sections.entry(list).or_default();
        match result {
            Ok(page) => {
                tracing::debug!(
                    list = list.path_segment(),
                    count = page.results.len(),
                    "Home section loaded"
                );
                section.movies = page.results;
                section.state = LoadState::Success;
            }
            Err(e) => {
                tracing::warn!(error = %e, list = list.path_segment(), "Home section failed");
                section.state = LoadState::Failure(e.to_string());
            }
        }
        section.state.clone()
    }

    pub fn section(&self, list: MovieList) -> HomeSection {
        self.sections().get(&list).cloned().unwrap_or_default()
    }

    pub fn snapshot(&self) -> HomeSnapshot {
        HomeSnapshot {
            now_playing: self.section(MovieList::NowPlaying),
            popular: self.section(MovieList::Popular),
            top_rated: self.section(MovieList::TopRated),
        }
    }
}
