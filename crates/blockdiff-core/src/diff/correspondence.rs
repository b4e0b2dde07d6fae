//! Block correspondence between two datasets.
//!
//! Blocks may be stored in a different order in each file. The resolver maps
//! every block of A onto the block of B that covers the same region, once per
//! run; both comparators then borrow the result.

use crate::errors::DiffError;
use crate::model::dataset::{BlockMatcher, Dataset};
use ndarray::{ArrayBase, Axis, Data, RemoveAxis};

/// Permutation from A's block order to B's.
///
/// `mapping()[i] == j` means block `j` of B occupies the same region as
/// block `i` of A. Always a bijection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockCorrespondence {
    mapping: Vec<usize>,
}

impl BlockCorrespondence {
    /// Resolve the permutation for a pair of datasets.
    ///
    /// Every block of A is located in B with the same rule as
    /// [`Dataset::find_block_idx_in_other`].
    ///
    /// # Errors
    ///
    /// - `BlockCountMismatch`: the datasets hold different numbers of blocks
    /// - `UnmatchedBlock`: a block of A has no counterpart in B
    /// - `AmbiguousBlockMatch`: two blocks of A resolve to the same block of B
    pub fn resolve(a: &Dataset, b: &Dataset) -> Result<Self, DiffError> {
        if a.num_blocks != b.num_blocks {
            return Err(DiffError::BlockCountMismatch {
                a_blocks: a.num_blocks,
                b_blocks: b.num_blocks,
            });
        }

        let matcher = BlockMatcher::new(a, b);
        let mapping = (0..a.num_blocks)
            .map(|i| matcher.find(i).ok_or_else(|| unmatched(a, b, i)))
            .collect::<Result<Vec<_>, _>>()?;

        let mut claimed: Vec<Option<usize>> = vec![None; b.num_blocks];
        for (i, &j) in mapping.iter().enumerate() {
            if let Some(first) = claimed[j] {
                return Err(DiffError::AmbiguousBlockMatch {
                    first,
                    second: i,
                    target: j,
                    other: b.label.clone(),
                });
            }
            claimed[j] = Some(i);
        }

        Ok(Self { mapping })
    }

    /// Identity mapping over `n` blocks.
    pub fn identity(n: usize) -> Self {
        Self {
            mapping: (0..n).collect(),
        }
    }

    pub fn mapping(&self) -> &[usize] {
        &self.mapping
    }

    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }

    pub fn is_identity(&self) -> bool {
        self.mapping.iter().enumerate().all(|(i, &j)| i == j)
    }

    /// Reorder `b_array` along its leading (block) axis into A's block order.
    pub fn reorder<S, D>(&self, b_array: &ArrayBase<S, D>) -> ndarray::Array<S::Elem, D>
    where
        S: Data,
        S::Elem: Clone,
        D: RemoveAxis,
    {
        b_array.select(Axis(0), &self.mapping)
    }
}

fn unmatched(a: &Dataset, b: &Dataset, block: usize) -> DiffError {
    DiffError::UnmatchedBlock {
        block,
        dataset: a.label.clone(),
        other: b.label.clone(),
    }
}
