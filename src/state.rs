// src/state.rs
use std::sync::Arc;

use crate::services::completion::CompletionClient;

pub type SharedState = Arc<AppState>;

/// Read-only after startup. `completion` is `None` when the provider client
/// could not be initialized; every chat call then reports unavailability.
#[derive(Clone)]
pub struct AppState {
    pub completion: Option<Arc<dyn CompletionClient>>,
}

impl AppState {
    pub fn new(completion: Option<Arc<dyn CompletionClient>>) -> Self {
        Self { completion }
    }

    pub fn model_configured(&self) -> bool {
        self.completion.is_some()
    }
}
