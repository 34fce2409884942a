//! Compressed sparse row (CSR) boolean patterns.
//!
//! Only the sparsity pattern is stored: `row_ptr[i]..row_ptr[i + 1]` is the
//! range of `col_idx` holding the columns of row `i`, sorted and without
//! duplicates. A symmetric pattern is its own CSC form, so the island search
//! walks the same arrays either way.

/// A boolean sparse matrix in CSR form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Csr {
    /// Row pointers (length `n_rows + 1`).
    row_ptr: Vec<usize>,
    /// Column index of each stored entry.
    col_idx: Vec<usize>,
    /// Number of columns.
    n_cols: usize,
}

impl Csr {
    /// An `n_rows × n_cols` pattern with no entries.
    pub fn empty(n_rows: usize, n_cols: usize) -> Self {
        Self {
            row_ptr: vec![0; n_rows + 1],
            col_idx: Vec::new(),
            n_cols,
        }
    }

    /// Build from per-row column lists. Each row is sorted and deduplicated.
    pub fn from_rows(rows: Vec<Vec<usize>>, n_cols: usize) -> Self {
        let mut row_ptr = Vec::with_capacity(rows.len() + 1);
        let mut col_idx = Vec::with_capacity(rows.iter().map(Vec::len).sum());
        row_ptr.push(0);
        for mut row in rows {
            row.sort_unstable();
            row.dedup();
            debug_assert!(row.last().is_none_or(|&c| c < n_cols));
            col_idx.extend_from_slice(&row);
            row_ptr.push(col_idx.len());
        }
        Self {
            row_ptr,
            col_idx,
            n_cols,
        }
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.row_ptr.len() - 1
    }

    /// Number of columns.
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// Number of stored entries.
    pub fn nnz(&self) -> usize {
        self.col_idx.len()
    }

    /// Row pointer array.
    pub fn row_ptr(&self) -> &[usize] {
        &self.row_ptr
    }

    /// Column index array.
    pub fn col_idx(&self) -> &[usize] {
        &self.col_idx
    }

    /// Columns of row `i`, ascending.
    pub fn row(&self, i: usize) -> &[usize] {
        &self.col_idx[self.row_ptr[i]..self.row_ptr[i + 1]]
    }

    /// Whether entry `(i, j)` is set.
    pub fn contains(&self, i: usize, j: usize) -> bool {
        i < self.n_rows() && self.row(i).binary_search(&j).is_ok()
    }

    /// Whether the pattern equals its transpose.
    pub fn is_symmetric(&self) -> bool {
        self.n_rows() == self.n_cols
            && (0..self.n_rows()).all(|i| self.row(i).iter().all(|&j| self.contains(j, i)))
    }

    /// The transposed pattern (CSR of the transpose, i.e. CSC of `self`).
    #[allow(clippy::needless_range_loop)]
    pub fn transpose(&self) -> Self {
        let n_rows = self.n_rows();
        let mut counts = vec![0usize; self.n_cols + 1];
        for &j in &self.col_idx {
            counts[j + 1] += 1;
        }
        for j in 0..self.n_cols {
            counts[j + 1] += counts[j];
        }
        let row_ptr = counts.clone();
        let mut next = counts;
        let mut col_idx = vec![0usize; self.nnz()];
        // Rows are visited in ascending order, so each transposed row comes out sorted.
        for i in 0..n_rows {
            for &j in self.row(i) {
                col_idx[next[j]] = i;
                next[j] += 1;
            }
        }
        Self {
            row_ptr,
            col_idx,
            n_cols: n_rows,
        }
    }

    /// Boolean `selfᵀ · self`: columns `i` and `j` are related iff some row
    /// holds both.
    pub fn gram(&self) -> Self {
        let t = self.transpose();
        let n = self.n_cols;
        let mut rows = Vec::with_capacity(n);
        let mut seen = vec![usize::MAX; n];
        for i in 0..n {
            let mut row = Vec::new();
            for &k in t.row(i) {
                for &j in self.row(k) {
                    if seen[j] != i {
                        seen[j] = i;
                        row.push(j);
                    }
                }
            }
            rows.push(row);
        }
        Self::from_rows(rows, n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_sorts_and_dedups() {
        let csr = Csr::from_rows(vec![vec![2, 0, 2], vec![], vec![1]], 3);
        assert_eq!(csr.row_ptr(), &[0, 2, 2, 3]);
        assert_eq!(csr.col_idx(), &[0, 2, 1]);
        assert_eq!(csr.nnz(), 3);
        assert!(csr.contains(0, 2));
        assert!(!csr.contains(1, 1));
        assert!(!csr.contains(7, 0));
    }

    #[test]
    fn test_transpose() {
        // 2x3:
        // [1 0 1]
        // [0 1 1]
        let csr = Csr::from_rows(vec![vec![0, 2], vec![1, 2]], 3);
        let t = csr.transpose();
        assert_eq!(t.n_rows(), 3);
        assert_eq!(t.n_cols(), 2);
        assert_eq!(t.row(0), &[0]);
        assert_eq!(t.row(1), &[1]);
        assert_eq!(t.row(2), &[0, 1]);
        assert_eq!(t.transpose(), csr);
    }

    #[test]
    fn test_gram_of_incidence() {
        // Two links: 0-1 and 1-2 over three buses.
        let incidence = Csr::from_rows(vec![vec![0, 1], vec![1, 2]], 3);
        let adj = incidence.gram();
        assert_eq!(adj.row(0), &[0, 1]);
        assert_eq!(adj.row(1), &[0, 1, 2]);
        assert_eq!(adj.row(2), &[1, 2]);
        assert!(adj.is_symmetric());
    }

    #[test]
    fn test_empty() {
        let csr = Csr::empty(4, 4);
        assert_eq!(csr.n_rows(), 4);
        assert_eq!(csr.nnz(), 0);
        assert!(csr.row(3).is_empty());
        assert!(csr.is_symmetric());
    }
}
