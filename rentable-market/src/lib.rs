mod auth;
mod cart;
mod catalog;
mod category;
mod ledger;
mod messages;
mod sessions;
mod storage;
mod util;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

pub use auth::*;
pub use cart::*;
pub use catalog::*;
pub use category::*;
pub use ledger::*;
pub use messages::*;
pub use sessions::*;
pub use storage::*;

/// The rentable marketplace system, wiring accounts, the catalog, carts,
/// messaging, and the rental ledger over a single storage backend.
pub struct Market<S> {
    pub auth: Auth<S>,
    pub catalog: Catalog<S>,
    pub ledger: Ledger<S>,
    pub messaging: Messaging<S>,
    pub sessions: Arc<SessionRegistry>,
}

impl<S> Market<S>
where
    S: Storage,
{
    pub fn new(storage: S) -> Self {
        let storage = Arc::new(storage);
        let sessions = Arc::new(SessionRegistry::default());

        Self {
            auth: Auth::new(&storage, &sessions),
            catalog: Catalog::new(&storage),
            ledger: Ledger::new(&storage),
            messaging: Messaging::new(&storage),
            sessions,
        }
    }
}
