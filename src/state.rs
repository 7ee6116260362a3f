//! Shared application state for all routes.

use crate::store::ToolStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ToolStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn ToolStore>) -> Self {
        AppState { store }
    }
}
