/// Shared application state
use crate::services::InstanceMetadataClient;
use roster_core::UserStore;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub metadata: Arc<InstanceMetadataClient>,
}

impl AppState {
    pub fn new(users: Arc<dyn UserStore>, metadata: Arc<InstanceMetadataClient>) -> Self {
        Self { users, metadata }
    }
}
