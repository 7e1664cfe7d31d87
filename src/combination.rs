//! Combinations with repetition.
//!
//! Selections are made over pool *slots*: the generator walks every
//! non-decreasing sequence of `k` slot indices and emits the values in those
//! slots. Two slots holding the same value are still distinct slots, so a
//! pool with duplicates yields value-identical combinations more than once.
//! For a pool of `n` slots there are `C(n + k - 1, k)` combinations.

/// Lazy iterator over all size-`k` multiset selections from `pool`.
///
/// Combinations come out in lexicographic order of their slot indices,
/// e.g. `[a, b]` with `k = 2` yields `[a, a]`, `[a, b]`, `[b, b]`.
#[derive(Debug, Clone)]
pub struct CombinationsWithRepetition<'a, T> {
    pool: &'a [T],
    indices: Vec<usize>,
    exhausted: bool,
}

impl<'a, T: Clone> CombinationsWithRepetition<'a, T> {
    /// An empty pool or `k == 0` yields nothing.
    pub fn new(pool: &'a [T], k: usize) -> Self {
        CombinationsWithRepetition {
            pool,
            indices: vec![0; k],
            exhausted: pool.is_empty() || k == 0,
        }
    }

    fn advance(&mut self) {
        let last_slot = self.pool.len() - 1;
        match self.indices.iter().rposition(|&i| i < last_slot) {
            Some(pos) => {
                let next = self.indices[pos] + 1;
                for index in &mut self.indices[pos..] {
                    *index = next;
                }
            }
            None => self.exhausted = true,
        }
    }
}

impl<'a, T: Clone> Iterator for CombinationsWithRepetition<'a, T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }

        let combination = self
            .indices
            .iter()
            .map(|&i| self.pool[i].clone())
            .collect();
        self.advance();
        Some(combination)
    }
}

/// Collect every size-`k` combination with repetition drawn from `pool`.
pub fn combinations_with_repetition<T: Clone>(pool: &[T], k: usize) -> Vec<Vec<T>> {
    CombinationsWithRepetition::new(pool, k).collect()
}

/// Number of size-`k` combinations with repetition over `n` slots, `C(n + k - 1, k)`.
///
/// Follows the generator's degenerate cases (`n == 0` or `k == 0` gives 0).
/// Returns `None` if the count overflows `usize`.
pub fn multiset_count(n: usize, k: usize) -> Option<usize> {
    if n == 0 || k == 0 {
        return Some(0);
    }

    // After step i, count == C(n - 1 + i, i), so each division is exact.
    // The product is widened so it cannot overflow before the division.
    let mut count: usize = 1;
    for i in 1..=k {
        let i = i as u128;
        let step = (count as u128).checked_mul(n as u128 - 1 + i)? / i;
        count = usize::try_from(step).ok()?;
    }
    Some(count)
}
