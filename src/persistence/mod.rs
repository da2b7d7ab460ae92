//! Persisted currency and high score
//!
//! Two counters survive between runs. Each is stored through the value codec
//! under its own key. Anything missing or unreadable loads as zero.

pub mod codec;
pub mod store;

pub use codec::{CodecError, decode, encode};
pub use store::{FileStore, MemoryStore, Store, StoreError};

/// Store key for the currency balance
pub const CURRENCY_KEY: &str = "lane_rush_currency";
/// Store key for the best score
pub const HIGH_SCORE_KEY: &str = "lane_rush_high_score";

/// The values carried from one run to the next
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SavedProgress {
    pub currency: u64,
    pub high_score: u64,
}

impl SavedProgress {
    /// Load both counters, falling back to zero on any failure
    pub fn load(store: &impl Store) -> Self {
        let progress = Self {
            currency: load_counter(store, CURRENCY_KEY),
            high_score: load_counter(store, HIGH_SCORE_KEY),
        };
        log::info!(
            "Loaded progress: {} coins, best {}",
            progress.currency,
            progress.high_score
        );
        progress
    }

    /// Write both counters
    pub fn save(&self, store: &mut impl Store) -> Result<(), StoreError> {
        store.set(CURRENCY_KEY, &encode(self.currency))?;
        store.set(HIGH_SCORE_KEY, &encode(self.high_score))?;
        log::info!(
            "Progress saved: {} coins, best {}",
            self.currency,
            self.high_score
        );
        Ok(())
    }
}

fn load_counter(store: &impl Store, key: &str) -> u64 {
    match store.get(key) {
        Ok(Some(raw)) => match decode(&raw) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Discarding stored {}: {}", key, e);
                0
            }
        },
        Ok(None) => 0,
        Err(e) => {
            log::warn!("Could not read {}: {}", key, e);
            0
        }
    }
}
