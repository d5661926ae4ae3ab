use std::sync::Arc;

use crate::embed::ParamPolicy;
use crate::relay::UploadRelay;

/// Shared application state passed to all handlers.
/// Built once at startup from `Config`; nothing in it is mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<dyn UploadRelay>,
    pub param_policy: ParamPolicy,
}
