use nanorand::{Rng, WyRand};

use crate::EncodingError;

/// One train / test split of the sample indices
#[derive(Debug, Clone, PartialEq)]
pub struct Fold {
    /// Samples to fit on
    pub train: Vec<usize>,
    /// Held out samples to score on
    pub test: Vec<usize>,
}

/// K-fold partition of `n_samples` indices.
///
/// The first `n_samples % n_folds` folds hold one sample more than the rest.
/// Without a seed the test sets are contiguous blocks in sample order,
/// with a seed the indices are shuffled once before being split.
#[derive(Debug, Clone)]
pub struct KFold {
    n_folds: usize,
    indices: Vec<usize>,
}

impl KFold {
    /// Create a new partition
    ///
    /// # Parameters
    /// n_samples: Number of samples to split
    /// n_folds: Number of folds, between 2 and `n_samples`
    /// seed: Shuffle the samples with this seed, keep their order if `None`
    pub fn new(n_samples: usize, n_folds: usize, seed: Option<u64>) -> Result<Self, EncodingError> {
        if n_folds < 2 || n_folds > n_samples {
            return Err(EncodingError::InvalidFolds { n_folds, n_samples });
        }

        let mut indices: Vec<usize> = (0..n_samples).collect();
        if let Some(seed) = seed {
            let mut rng = WyRand::new_seed(seed);
            rng.shuffle(&mut indices);
        }

        Ok(Self { n_folds, indices })
    }

    /// Number of folds
    #[inline(always)]
    pub fn n_folds(&self) -> usize {
        self.n_folds
    }

    /// Number of samples partitioned
    #[inline(always)]
    pub fn n_samples(&self) -> usize {
        self.indices.len()
    }

    /// The splits, in fold order
    pub fn folds(&self) -> Vec<Fold> {
        let n = self.indices.len();
        let base = n / self.n_folds;
        let extra = n % self.n_folds;

        let mut folds = Vec::with_capacity(self.n_folds);
        let mut start = 0;
        for k in 0..self.n_folds {
            let size = base + usize::from(k < extra);
            let stop = start + size;
            folds.push(Fold {
                train: self.indices[..start]
                    .iter()
                    .chain(&self.indices[stop..])
                    .copied()
                    .collect(),
                test: self.indices[start..stop].to_vec(),
            });
            start = stop;
        }

        folds
    }
}
