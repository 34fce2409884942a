//! Connected components of a connectivity pattern.
//!
//! The search is an explicit-stack depth-first traversal so that long
//! radial feeders cannot exhaust the call stack. Each component is sorted
//! before it is emitted and components come out in order of their lowest
//! member, so the result depends only on bus numbering.

use crate::csr::Csr;

/// Partition the active rows of `adj` into connected components.
///
/// `adj` must be symmetric (it is read as both CSR and CSC). Inactive buses
/// are never visited and appear in no component; an active bus without
/// neighbours forms a component of its own.
pub fn find_islands(adj: &Csr, active: &[bool]) -> Vec<Vec<usize>> {
    let n = adj.n_rows();
    debug_assert_eq!(active.len(), n);

    let mut visited = vec![false; n];
    let mut islands = Vec::new();
    let mut stack = Vec::new();
    let mut current = Vec::new();

    for start in 0..n {
        if visited[start] || !active[start] {
            continue;
        }

        stack.push(start);
        while let Some(v) = stack.pop() {
            if visited[v] {
                continue;
            }
            visited[v] = true;
            current.push(v);

            for &k in adj.row(v) {
                if !visited[k] && active[k] {
                    stack.push(k);
                }
            }
        }

        current.sort_unstable();
        islands.push(std::mem::take(&mut current));
    }

    islands
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(n: usize, edges: &[(usize, usize)]) -> Csr {
        let mut rows = vec![Vec::new(); n];
        for &(a, b) in edges {
            rows[a].extend([a, b]);
            rows[b].extend([a, b]);
        }
        Csr::from_rows(rows, n)
    }

    #[test]
    fn test_two_components() {
        let adj = pattern(6, &[(0, 1), (1, 2), (3, 4), (4, 5)]);
        let islands = find_islands(&adj, &[true; 6]);
        assert_eq!(islands, vec![vec![0, 1, 2], vec![3, 4, 5]]);
    }

    #[test]
    fn test_members_sorted_regardless_of_traversal() {
        // Star around bus 4 reached from bus 0 through bus 5.
        let adj = pattern(6, &[(0, 5), (5, 4), (4, 1), (4, 3), (4, 2)]);
        let islands = find_islands(&adj, &[true; 6]);
        assert_eq!(islands, vec![vec![0, 1, 2, 3, 4, 5]]);
    }

    #[test]
    fn test_inactive_bus_splits_component() {
        let adj = pattern(3, &[(0, 1), (1, 2)]);
        let islands = find_islands(&adj, &[true, false, true]);
        assert_eq!(islands, vec![vec![0], vec![2]]);
    }

    #[test]
    fn test_isolated_buses_form_singletons() {
        let adj = Csr::empty(3, 3);
        let islands = find_islands(&adj, &[true, false, true]);
        assert_eq!(islands, vec![vec![0], vec![2]]);
    }

    #[test]
    fn test_long_chain_does_not_recurse() {
        let n = 200_000;
        let edges: Vec<_> = (0..n - 1).map(|i| (i, i + 1)).collect();
        let adj = pattern(n, &edges);
        let islands = find_islands(&adj, &vec![true; n]);
        assert_eq!(islands.len(), 1);
        assert_eq!(islands[0].len(), n);
        assert_eq!(islands[0][n - 1], n - 1);
    }

    #[test]
    fn test_empty_pattern() {
        let adj = Csr::empty(0, 0);
        assert!(find_islands(&adj, &[]).is_empty());
    }
}
