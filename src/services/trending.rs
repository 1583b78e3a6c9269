use rand::{
    rngs::StdRng,
    seq::{index, SliceRandom},
    Rng, SeedableRng,
};
use std::sync::{Arc, Mutex};
use tracing::instrument;

use crate::{
    db::{DocumentStore, Query},
    error::AppResult,
    models::{SearchCounter, COUNT_ATTR},
};

pub const DEFAULT_POOL_SIZE: usize = 20;
/// Hard cap on the shelf; larger configured sizes are clamped to it
pub const MAX_SHELF_SIZE: usize = 5;
pub const DEFAULT_SHELF_SIZE: usize = MAX_SHELF_SIZE;

/// Reduces a ranked candidate pool to at most `shelf_size` entries.
///
/// A pool that already fits is returned whole in a uniformly random order.
/// A larger pool yields exactly `shelf_size` distinct entries drawn uniformly
/// without replacement, in draw order.
pub fn sample_shelf<T, R: Rng + ?Sized>(mut pool: Vec<T>, shelf_size: usize, rng: &mut R) -> Vec<T> {
    if pool.len() <= shelf_size {
        pool.shuffle(rng);
        return pool;
    }

    let mut slots: Vec<Option<T>> = pool.into_iter().map(Some).collect();
    index::sample(rng, slots.len(), shelf_size)
        .into_iter()
        .filter_map(|i| slots[i].take())
        .collect()
}

/// Picks the trending shelf from the most searched terms.
///
/// Sampling from the top of the ranking instead of taking it verbatim keeps
/// the shelf from showing the same terms on every load while still favouring
/// popular ones.
pub struct TrendingSampler {
    store: Arc<dyn DocumentStore>,
    rng: Mutex<StdRng>,
    pool_size: usize,
    shelf_size: usize,
}

impl TrendingSampler {
    pub fn new(store: Arc<dyn DocumentStore>, pool_size: usize, shelf_size: usize) -> Self {
        Self::with_rng(store, pool_size, shelf_size, StdRng::from_os_rng())
    }

    /// Uses the given random source, e.g. a seeded one for reproducible shelves
    pub fn with_rng(
        store: Arc<dyn DocumentStore>,
        pool_size: usize,
        shelf_size: usize,
        rng: StdRng,
    ) -> Self {
        if shelf_size > MAX_SHELF_SIZE {
            tracing::warn!(shelf_size, max = MAX_SHELF_SIZE, "Clamping trending shelf size");
        }

        Self {
            store,
            rng: Mutex::new(rng),
            pool_size: pool_size.max(1),
            shelf_size: shelf_size.min(MAX_SHELF_SIZE),
        }
    }

    /// Fetches the candidate pool and samples the shelf. Store errors are returned as-is.
    #[instrument(skip(self), fields(pool_size = self.pool_size, shelf_size = self.shelf_size))]
    pub async fn get_trending(&self) -> AppResult<Vec<SearchCounter>> {
        let pool = self
            .store
            .list_documents(&[Query::limit(self.pool_size), Query::order_desc(COUNT_ATTR)])
            .await?;
        let pool_len = pool.len();

        let shelf = {
            let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            sample_shelf(pool, self.shelf_size, &mut *rng)
        };

        tracing::debug!(pool = pool_len, shelf = shelf.len(), "Sampled trending shelf");

        Ok(shelf)
    }
}
