//! Shuffled minibatch cursor over the dataset.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::error::EnvError;

/// Owns the shuffled item list and the position of the next minibatch.
///
/// # Invariants
///
/// * every epoch surfaces every item, in shuffled order
/// * when the list runs out mid-batch, the list is reshuffled and the batch is
///   completed from its head; the wrap batch therefore mixes the tail of one
///   epoch with the head of the next, and may repeat an item
#[derive(Debug, Clone)]
pub struct DatasetCursor<T> {
    items: Vec<T>,
    ix: usize,
    batch_size: usize,
    rng: StdRng,
}

impl<T: Clone> DatasetCursor<T> {
    /// Shuffles `items` with `seed`.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::EmptyBatch`] when `batch_size` is zero and
    /// [`EnvError::BatchTooLarge`] when it exceeds the number of items.
    pub fn new(mut items: Vec<T>, batch_size: usize, seed: u64) -> Result<Self, EnvError> {
        if batch_size == 0 {
            return Err(EnvError::EmptyBatch);
        }
        if batch_size > items.len() {
            return Err(EnvError::BatchTooLarge {
                batch_size,
                items: items.len(),
            });
        }
        let mut rng = StdRng::seed_from_u64(seed);
        items.shuffle(&mut rng);
        Ok(Self {
            items,
            ix: 0,
            batch_size,
            rng,
        })
    }

    /// Returns the next `batch_size` items, wrapping with a reshuffle.
    pub fn next_minibatch(&mut self) -> Vec<T> {
        let end = (self.ix + self.batch_size).min(self.items.len());
        let mut batch = self.items[self.ix..end].to_vec();
        if batch.len() < self.batch_size {
            self.items.shuffle(&mut self.rng);
            self.ix = self.batch_size - batch.len();
            batch.extend_from_slice(&self.items[..self.ix]);
        } else {
            self.ix += self.batch_size;
        }
        batch
    }

    /// Rewinds to the start of the current order without reshuffling.
    pub fn reset_epoch(&mut self) {
        self.ix = 0;
    }

    /// Items in their current order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn position(&self) -> usize {
        self.ix
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use proptest::prelude::*;

    use super::*;

    #[test]
    fn rejects_oversized_batches() {
        assert!(matches!(
            DatasetCursor::new(vec![1, 2, 3], 4, 0),
            Err(EnvError::BatchTooLarge { batch_size: 4, items: 3 })
        ));
        assert!(matches!(
            DatasetCursor::new(vec![1, 2, 3], 0, 0),
            Err(EnvError::EmptyBatch)
        ));
    }

    #[test]
    fn same_seed_same_order() {
        let a = DatasetCursor::new((0..20).collect(), 5, 3).unwrap();
        let b = DatasetCursor::new((0..20).collect(), 5, 3).unwrap();
        assert_eq!(a.items(), b.items());
    }

    #[test]
    fn wrap_batch_joins_tail_and_head() {
        let mut cursor = DatasetCursor::new((0..5).collect::<Vec<u32>>(), 2, 1).unwrap();
        let first_epoch = cursor.items().to_vec();
        assert_eq!(cursor.next_minibatch(), first_epoch[0..2]);
        assert_eq!(cursor.next_minibatch(), first_epoch[2..4]);

        let wrap = cursor.next_minibatch();
        assert_eq!(wrap[0], first_epoch[4]);
        assert_eq!(wrap[1], cursor.items()[0]);
        assert_eq!(cursor.position(), 1);

        let mut sorted = cursor.items().to_vec();
        sorted.sort();
        assert_eq!(sorted, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn reset_epoch_rewinds_without_reshuffle() {
        let mut cursor = DatasetCursor::new((0..6).collect::<Vec<u32>>(), 3, 2).unwrap();
        let first = cursor.next_minibatch();
        cursor.reset_epoch();
        assert_eq!(cursor.next_minibatch(), first);
    }

    proptest! {
        #[test]
        fn exact_epochs_cover_every_item_once(batches in 1usize..6, batch_size in 1usize..6, seed: u64) {
            let n = batches * batch_size;
            let mut cursor = DatasetCursor::new((0..n).collect::<Vec<_>>(), batch_size, seed).unwrap();
            for _ in 0..3 {
                let mut seen = Vec::new();
                for _ in 0..batches {
                    let batch = cursor.next_minibatch();
                    prop_assert_eq!(batch.len(), batch_size);
                    seen.extend(batch);
                }
                let unique: HashSet<_> = seen.iter().copied().collect();
                prop_assert_eq!(unique.len(), n);
                prop_assert_eq!(seen.len(), n);
            }
        }

        #[test]
        fn every_item_surfaces_each_epoch(n in 2usize..30, batch_size in 1usize..8, seed: u64) {
            prop_assume!(batch_size <= n);
            let mut cursor = DatasetCursor::new((0..n).collect::<Vec<_>>(), batch_size, seed).unwrap();
            let draws = n.div_ceil(batch_size);
            let mut seen = HashSet::new();
            for _ in 0..draws {
                let batch = cursor.next_minibatch();
                prop_assert_eq!(batch.len(), batch_size);
                seen.extend(batch);
            }
            prop_assert_eq!(seen.len(), n);
        }
    }
}
