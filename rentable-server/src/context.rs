use std::sync::Arc;

use axum::extract::FromRef;
use rentable_market::{JsonStorage, Market};

/// The concrete market type served over HTTP
pub type ServerMarket = Market<JsonStorage>;

#[derive(Clone, FromRef)]
pub struct ServerContext {
    pub market: Arc<ServerMarket>,
}
