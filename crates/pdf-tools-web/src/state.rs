use pdf_artifacts::ArtifactStore;
use std::sync::Arc;

/// Shared handler state
#[derive(Clone, Default)]
pub struct AppState {
    pub artifacts: Arc<ArtifactStore>,
}

impl AppState {
    pub fn new(artifacts: ArtifactStore) -> Self {
        Self {
            artifacts: Arc::new(artifacts),
        }
    }
}
