//! Partition of the merged network into simulatable islands.

use crate::adjacency::{ImpedanceBearing, Link, build_adjacency};
use crate::config::CompileConfig;
use crate::islands::find_islands;
use crate::reduce::Reduction;

/// A maximal set of representative buses joined by impedance-bearing links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Island {
    /// Representative bus indices, ascending by bus id.
    buses: Vec<usize>,
    /// The subset of `buses` that are reference buses.
    reference_buses: Vec<usize>,
}

impl Island {
    pub fn buses(&self) -> &[usize] {
        &self.buses
    }

    pub fn reference_buses(&self) -> &[usize] {
        &self.reference_buses
    }

    /// An island needs at least one reference bus to be solved.
    pub fn is_solvable(&self) -> bool {
        !self.reference_buses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.buses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buses.is_empty()
    }
}

/// Find the islands of the active representative buses.
///
/// `links` must already be re-homed onto representatives. Unsolvable
/// islands are returned like any other; callers decide what to do with them.
pub fn resolve_islands(
    links: &[Link],
    reduction: &Reduction,
    config: &CompileConfig,
) -> Vec<Island> {
    let n = reduction.bus_count();
    let mask = reduction.active_mask();
    let filter = ImpedanceBearing {
        tol: config.zero_impedance_tol,
    };
    let adj = build_adjacency(n, links, mask, &filter, config.adjacency_strategy);
    log::debug!("island adjacency: {} buses, {} entries", n, adj.nnz());

    find_islands(&adj, mask)
        .into_iter()
        .map(|buses| {
            let reference_buses = buses
                .iter()
                .copied()
                .filter(|&b| reduction.is_reference(b))
                .collect();
            Island {
                buses,
                reference_buses,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reduce::reduce;
    use num_complex::Complex64 as C64;

    fn link(from: usize, to: usize, reducible: bool, x: f64) -> Link {
        Link {
            from,
            to,
            active: true,
            reducible,
            impedance: C64::new(0.0, x),
        }
    }

    #[test]
    fn test_islands_over_representatives() {
        // 0 =switch= 1 -- 2    3 -- 4
        let links = [
            link(0, 1, true, 0.0),
            link(1, 2, false, 0.1),
            link(3, 4, false, 0.1),
        ];
        let refs = [false, true, false, false, false];
        let config = CompileConfig::default();
        let reduction = reduce(&links, &[true; 5], &refs, &config);
        let rehomed: Vec<Link> = links.iter().map(|l| reduction.rehome(l)).collect();

        let islands = resolve_islands(&rehomed, &reduction, &config);
        assert_eq!(islands.len(), 2);
        assert_eq!(islands[0].buses(), &[0, 2]);
        assert_eq!(islands[0].reference_buses(), &[0]);
        assert!(islands[0].is_solvable());
        assert_eq!(islands[1].buses(), &[3, 4]);
        assert!(!islands[1].is_solvable());
    }

    #[test]
    fn test_degenerate_reducible_link_joins_island() {
        let links = [link(0, 1, true, 0.05)];
        let config = CompileConfig::default();
        let reduction = reduce(&links, &[true; 2], &[true, false], &config);
        let islands = resolve_islands(&links, &reduction, &config);
        assert_eq!(islands.len(), 1);
        assert_eq!(islands[0].buses(), &[0, 1]);
    }

    #[test]
    fn test_inactive_buses_excluded() {
        let links = [link(0, 1, false, 0.1), link(1, 2, false, 0.1)];
        let config = CompileConfig::default();
        let reduction = reduce(&links, &[true, false, true], &[true; 3], &config);
        let islands = resolve_islands(&links, &reduction, &config);
        let buses: Vec<&[usize]> = islands.iter().map(Island::buses).collect();
        assert_eq!(buses, vec![&[0][..], &[2][..]]);
    }
}
