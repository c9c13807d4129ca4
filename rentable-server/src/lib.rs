use std::{
    env,
    net::{Ipv6Addr, SocketAddr},
    sync::Arc,
};

use log::info;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

mod auth;
mod cart;
mod catalog;
mod context;
mod errors;
mod messages;
mod rentals;
mod schemas;
mod serialized;

pub mod logging;

pub use context::{ServerContext, ServerMarket};

/// The default port the server will listen on.
pub const DEFAULT_PORT: u16 = 9070;

pub type Router = axum::Router<ServerContext>;

/// Starts the rentable server
pub async fn run_server(market: Arc<ServerMarket>) {
    let port = env::var("RENTABLE_SERVER_PORT")
        .map(|x| x.parse::<u16>().expect("Port must be a number"))
        .unwrap_or(DEFAULT_PORT);

    let addr: SocketAddr = (Ipv6Addr::UNSPECIFIED, port).into();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let version_one_router = Router::new()
        .nest("/auth", auth::router())
        .nest("/items", item_routes())
        .nest("/categories", catalog::category_router())
        .nest("/favorites", catalog::favorites_router())
        .nest("/cart", cart::router())
        .nest("/rentals", rentals::router());

    let root_router = Router::new().nest("/v1", version_one_router);

    let app = root_router
        .layer(cors)
        .with_state(ServerContext { market });

    let listener = TcpListener::bind(&addr).await.expect("listens on address");
    info!("Listening on port {}", port);

    axum::serve(listener, app.into_make_service())
        .await
        .expect("server runs");
}

/// Everything hanging off /items: the catalog itself, per-item message
/// threads, and the rent/return actions
fn item_routes() -> Router {
    catalog::item_router()
        .merge(messages::router())
        .merge(rentals::item_router())
}
