use std::{env, sync::Arc};

use log::info;
use rentable_market::{JsonStorage, Market};
use rentable_server::logging;

#[tokio::main]
async fn main() {
    logging::init_logger();

    let data_dir = env::var("RENTABLE_DATA_DIR").unwrap_or_else(|_| "data".to_string());
    info!("Persisting documents under {}/", data_dir);

    let storage = JsonStorage::new(data_dir);
    let market = Arc::new(Market::new(storage));

    rentable_server::run_server(market).await;
}
