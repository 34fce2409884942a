//! Bus connectivity from a filtered link list.
//!
//! Reduction and island finding differ only in which links they follow, so
//! the selection is injected as a [`LinkFilter`]. Two assembly strategies
//! produce the same pattern:
//!
//! ```text
//! Direct:            for each selected link (f, t): set (f,f) (f,t) (t,f) (t,t)
//! IncidenceProduct:  C = links × buses, two ones per selected row;  A = Cᵀ·C
//! ```

use num_complex::Complex64 as C64;

use crate::config::AdjacencyStrategy;
use crate::csr::Csr;

/// One edge candidate, addressed by bus index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    /// From-side bus index.
    pub from: usize,
    /// To-side bus index.
    pub to: usize,
    /// Active at the compiled time step.
    pub active: bool,
    /// Flagged as eligible for topological collapse.
    pub reducible: bool,
    /// Series impedance.
    pub impedance: C64,
}

impl Link {
    /// Active, reducible and with an impedance magnitude within `tol`.
    pub fn is_collapsible(&self, tol: f64) -> bool {
        self.active && self.reducible && self.impedance.norm() <= tol
    }
}

/// Selection predicate over links.
pub trait LinkFilter {
    fn select(&self, link: &Link) -> bool;
}

impl<F> LinkFilter for F
where
    F: Fn(&Link) -> bool,
{
    fn select(&self, link: &Link) -> bool {
        self(link)
    }
}

/// Links that collapse into a single bus: active, reducible, zero impedance.
#[derive(Debug, Clone, Copy)]
pub struct Collapsible {
    pub tol: f64,
}

impl LinkFilter for Collapsible {
    fn select(&self, link: &Link) -> bool {
        link.is_collapsible(self.tol)
    }
}

/// Active links that keep their buses electrically apart.
///
/// A reducible link whose impedance exceeds the tolerance is not
/// collapsible and therefore counts as impedance-bearing.
#[derive(Debug, Clone, Copy)]
pub struct ImpedanceBearing {
    pub tol: f64,
}

impl LinkFilter for ImpedanceBearing {
    fn select(&self, link: &Link) -> bool {
        link.active && !link.is_collapsible(self.tol)
    }
}

/// Build the symmetric `n × n` connectivity pattern of the links selected by
/// `filter` whose endpoints both pass `bus_mask`.
pub fn build_adjacency(
    n: usize,
    links: &[Link],
    bus_mask: &[bool],
    filter: &impl LinkFilter,
    strategy: AdjacencyStrategy,
) -> Csr {
    debug_assert_eq!(bus_mask.len(), n);
    let selected = links
        .iter()
        .filter(|l| bus_mask[l.from] && bus_mask[l.to] && filter.select(l));

    match strategy {
        AdjacencyStrategy::Direct => {
            let mut rows = vec![Vec::new(); n];
            for link in selected {
                let (f, t) = (link.from, link.to);
                rows[f].push(f);
                rows[f].push(t);
                rows[t].push(f);
                rows[t].push(t);
            }
            Csr::from_rows(rows, n)
        }
        AdjacencyStrategy::IncidenceProduct => {
            let incidence: Vec<Vec<usize>> = selected.map(|l| vec![l.from, l.to]).collect();
            if incidence.is_empty() {
                return Csr::empty(n, n);
            }
            Csr::from_rows(incidence, n).gram()
        }
    }
}
