use std::sync::Arc;

use saferoute_core::{RoutingModel, model::Location};

/// Shared, read-only server state
#[derive(Debug, Clone)]
pub struct AppState {
    pub model: Arc<RoutingModel>,
    pub places: Arc<Vec<Location>>,
}

impl AppState {
    pub fn new(model: RoutingModel, places: Vec<Location>) -> Self {
        Self {
            model: Arc::new(model),
            places: Arc::new(places),
        }
    }

    /// Places whose label contains `query`, ignoring case. An empty query
    /// lists every place.
    pub fn search_places(&self, query: &str, limit: usize) -> Vec<Location> {
        let needle = query.trim().to_lowercase();
        self.places
            .iter()
            .filter(|place| {
                place
                    .label
                    .as_deref()
                    .is_some_and(|label| label.to_lowercase().contains(&needle))
            })
            .take(limit)
            .cloned()
            .collect()
    }
}
