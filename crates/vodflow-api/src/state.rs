use vodflow_core::Config;
use vodflow_pipeline::UploadPipeline;

/// Shared application state handed to every handler.
pub struct AppState {
    pub config: Config,
    pub pipeline: UploadPipeline,
}
