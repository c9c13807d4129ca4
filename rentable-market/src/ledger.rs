use std::sync::Arc;

use log::info;
use thiserror::Error;

use crate::{
    ItemData, NewRental, PrimaryKey, ReclaimItem, RentalData, Storage, StorageError,
};

/// The append-only rental ledger and the availability state machine it
/// drives. An item is either available or rented; renting flips it one way,
/// the two return paths flip it back.
pub struct Ledger<S> {
    storage: Arc<S>,
}

#[derive(Debug, Error)]
pub enum LedgerError {
    /// The item exists but is currently rented out
    #[error("item {0} is already rented")]
    AlreadyRented(PrimaryKey),
    /// Something else went wrong with the backing store
    #[error(transparent)]
    Storage(StorageError),
}

impl From<StorageError> for LedgerError {
    fn from(value: StorageError) -> Self {
        match value {
            StorageError::Unavailable { item_id } => Self::AlreadyRented(item_id),
            err => Self::Storage(err),
        }
    }
}

impl<S> Ledger<S>
where
    S: Storage,
{
    pub fn new(storage: &Arc<S>) -> Self {
        Self {
            storage: storage.clone(),
        }
    }

    /// Rents an available item, flipping it to rented and appending a ledger
    /// entry with name and description snapshots. Renting an item that is
    /// already rented is rejected without any state change.
    pub async fn rent(
        &self,
        item_id: PrimaryKey,
        renter: &str,
        days: u32,
    ) -> Result<RentalData, LedgerError> {
        let rental = self
            .storage
            .rent_item(NewRental {
                item_id,
                renter: renter.to_string(),
                days,
            })
            .await?;

        info!(
            "{} rented {} for {} day(s)",
            rental.renter, rental.item_name, rental.days
        );

        Ok(rental)
    }

    /// Marks the item available again, whatever its current state. There is
    /// no ownership check and no rented-state check on this path; any
    /// authenticated caller can force an item back to available.
    pub async fn return_by_owner(&self, item_id: PrimaryKey) -> Result<ItemData, LedgerError> {
        let item = self.storage.set_item_availability(item_id, true).await?;

        info!("{} was returned", item.name);
        Ok(item)
    }

    /// Confirms a return by descriptive match: the first rented item with
    /// the given name and description that does not belong to the confirming
    /// user is made available again. Not-found when nothing matches.
    pub async fn confirm_return(&self, reclaim: ReclaimItem) -> Result<ItemData, LedgerError> {
        let item = self.storage.reclaim_item(reclaim).await?;

        info!("return of {} was confirmed", item.name);
        Ok(item)
    }

    /// The whole ledger, oldest entry first
    pub async fn history(&self) -> Result<Vec<RentalData>, LedgerError> {
        Ok(self.storage.list_rentals().await?)
    }

    /// Ledger entries for one renter, oldest first
    pub async fn history_for(&self, renter: &str) -> Result<Vec<RentalData>, LedgerError> {
        Ok(self.storage.rentals_by_renter(renter).await?)
    }
}
