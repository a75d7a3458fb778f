// src/state.rs

use std::sync::Arc;

use axum::extract::FromRef;

use crate::{config::Config, news::NewsSource, resolver::Resolver};

#[derive(Clone)]
pub struct AppState {
    pub resolver: Resolver,
    pub news: Arc<dyn NewsSource>,
    pub config: Config,
}

impl FromRef<AppState> for Resolver {
    fn from_ref(state: &AppState) -> Self {
        state.resolver.clone()
    }
}

impl FromRef<AppState> for Arc<dyn NewsSource> {
    fn from_ref(state: &AppState) -> Self {
        state.news.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
