//! The compilation entry point.
//!
//! ```text
//! NetworkGraph ─► Snapshot ─► reduce ─► resolve_islands ─► CircuitSlicer
//!                 (time t)    (merge)   (partition)        (per island)
//!                                                                │
//!                                                                ▼
//!                                                           Compilation
//! ```
//!
//! The graph is only ever borrowed immutably. Every buffer used along the
//! way belongs to one call, so concurrent compilations of the same graph
//! need no coordination.

use num_complex::Complex64 as C64;
use volta_core::{BusId, DeviceKind, NetworkGraph};

use crate::adjacency::Link;
use crate::circuit::NumericalCircuit;
use crate::config::{CompileConfig, CompileRequest, IslandLinks};
use crate::diagnostics::{Diagnostics, OrphanReason};
use crate::error::{Error, Result};
use crate::reduce::{Reduction, reduce};
use crate::resolve::resolve_islands;
use crate::slice::{BranchRow, CircuitSlicer, DeviceRow};
use crate::snapshot::Snapshot;

/// The result of compiling one network state.
#[derive(Debug, Clone, PartialEq)]
pub struct Compilation {
    time_index: Option<usize>,
    circuits: Vec<NumericalCircuit>,
    diagnostics: Diagnostics,
    bus_merge_map: Vec<usize>,
}

impl Compilation {
    /// Time step this compilation was made for; `None` for the snapshot.
    pub fn time_index(&self) -> Option<usize> {
        self.time_index
    }

    /// One circuit per island, in ascending order of lowest bus id.
    pub fn circuits(&self) -> &[NumericalCircuit] {
        &self.circuits
    }

    pub fn circuit(&self, island: usize) -> Option<&NumericalCircuit> {
        self.circuits.get(island)
    }

    pub fn island_count(&self) -> usize {
        self.circuits.len()
    }

    /// Circuits that have at least one reference bus.
    pub fn solvable_circuits(&self) -> impl Iterator<Item = &NumericalCircuit> + '_ {
        self.circuits.iter().filter(|c| c.is_solvable())
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Bus position → position of the representative it was merged into.
    /// Unmerged buses map to themselves.
    pub fn bus_merge_map(&self) -> &[usize] {
        &self.bus_merge_map
    }

    /// Island and local index holding the bus at graph position `pos`.
    pub fn locate_bus(&self, pos: usize) -> Option<(usize, usize)> {
        let rep = *self.bus_merge_map.get(pos)?;
        self.circuits.iter().enumerate().find_map(|(i, c)| {
            c.buses()
                .positions
                .iter()
                .position(|&p| p == rep)
                .map(|k| (i, k))
        })
    }
}

/// Compile a network state into per-island numerical circuits.
///
/// Fails only on a malformed request. Problems with the network data are
/// reported through [`Compilation::diagnostics`].
pub fn compile(graph: &NetworkGraph, request: &CompileRequest) -> Result<Compilation> {
    let config = &request.config;
    config.validate()?;
    check_time_index(graph, request.time_index)?;

    let mut diag = Diagnostics::new();
    let snapshot = Snapshot::new(graph, request.time_index, &mut diag);
    let links = snapshot.branch_links();

    let reduction = reduce(&links, &snapshot.bus_active, &snapshot.bus_reference, config);
    log::debug!(
        "reduction: {} buses, {} merge groups",
        snapshot.bus_count(),
        reduction.groups().len()
    );
    for group in reduction.groups() {
        let members = group.members.iter().map(|&m| snapshot.bus(m).id).collect();
        diag.merged(snapshot.bus(group.representative).id, members);
    }

    let rehomed = rehome_branches(&snapshot, &links, &reduction, config, &mut diag);

    let mut island_links = rehomed.clone();
    island_links.extend(device_links(&snapshot, &reduction, config.island_links));

    let mut islands = resolve_islands(&island_links, &reduction, config);
    if !reduction.active_mask().iter().any(|&a| a) {
        diag.empty();
    }
    if config.ignore_single_bus_islands {
        let before = islands.len();
        islands.retain(|island| island.len() > 1);
        diag.skipped_single_bus_islands = before - islands.len();
    }

    let mut island_of = vec![None; reduction.bus_count()];
    for (i, island) in islands.iter().enumerate() {
        for &b in island.buses() {
            island_of[b] = Some(i);
        }
        if !island.is_solvable() {
            let ids = island.buses().iter().map(|&b| snapshot.bus(b).id).collect();
            diag.unsolvable(i, ids);
        }
    }

    let mut slicer = CircuitSlicer::new(&snapshot, &reduction, islands.len());
    bucket_branches(&snapshot, &rehomed, &island_of, &mut slicer);
    bucket_devices(&snapshot, &reduction, &island_of, &mut slicer, &mut diag);

    let circuits: Vec<NumericalCircuit> = islands
        .iter()
        .enumerate()
        .map(|(i, island)| slicer.slice(i, island))
        .collect();

    log::debug!(
        "compiled {} islands ({} unsolvable) at {:?}",
        circuits.len(),
        diag.unsolvable_islands.len(),
        request.time_index
    );

    Ok(Compilation {
        time_index: request.time_index,
        circuits,
        diagnostics: diag,
        bus_merge_map: merge_map_by_position(&snapshot, &reduction),
    })
}

/// The merge map translated from bus ranks back to graph positions.
fn merge_map_by_position(snapshot: &Snapshot<'_>, reduction: &Reduction) -> Vec<usize> {
    (0..snapshot.bus_count())
        .map(|pos| snapshot.position(reduction.representative(snapshot.rank(pos))))
        .collect()
}

fn check_time_index(graph: &NetworkGraph, time_index: Option<usize>) -> Result<()> {
    let Some(index) = time_index else {
        return Ok(());
    };
    let steps = graph.time_steps();
    if steps == 0 {
        return Err(Error::NoTimeProfiles);
    }
    if index >= steps {
        return Err(Error::TimeIndexOutOfRange { index, steps });
    }
    Ok(())
}

/// Re-home branch links onto representatives, reporting degenerate
/// reductions and branches whose endpoints coincide.
fn rehome_branches(
    snapshot: &Snapshot<'_>,
    links: &[Link],
    reduction: &Reduction,
    config: &CompileConfig,
    diag: &mut Diagnostics,
) -> Vec<Link> {
    let tol = config.zero_impedance_tol;
    let records = snapshot.graph.branches();

    snapshot
        .branches
        .iter()
        .zip(links)
        .map(|(b, link)| {
            let id = records[b.index].id;
            let collapsible = link.is_collapsible(tol);
            if link.active && link.reducible && !collapsible {
                diag.degenerate(id, link.impedance.norm());
            }
            let moved = reduction.rehome(link);
            if moved.active && moved.from == moved.to {
                // A self-loop in the input was not shorted by the merge.
                let shorted = link.from != link.to && !collapsible;
                diag.dropped(id, snapshot.bus(moved.from).id, shorted);
            }
            moved
        })
        .collect()
}

/// Links contributed by two-terminal devices configured to join islands.
fn device_links<'a>(
    snapshot: &'a Snapshot<'_>,
    reduction: &'a Reduction,
    links: IslandLinks,
) -> impl Iterator<Item = Link> + 'a {
    let records = snapshot.graph.devices();
    snapshot.devices.iter().filter_map(move |d| {
        let joins = match records[d.index].kind {
            DeviceKind::Vsc => links.vsc,
            DeviceKind::Hvdc => links.hvdc,
            _ => false,
        };
        let to = d.to_bus?;
        (joins && d.active).then(|| Link {
            from: reduction.representative(d.bus),
            to: reduction.representative(to),
            active: true,
            reducible: false,
            impedance: C64::new(0.0, 0.0),
        })
    })
}

fn bucket_branches(
    snapshot: &Snapshot<'_>,
    rehomed: &[Link],
    island_of: &[Option<usize>],
    slicer: &mut CircuitSlicer<'_>,
) {
    for (b, link) in snapshot.branches.iter().zip(rehomed) {
        if !link.active || link.from == link.to {
            continue;
        }
        if let (Some(i), Some(j)) = (island_of[link.from], island_of[link.to]) {
            if i == j {
                slicer.push_branch(
                    i,
                    BranchRow {
                        index: b.index,
                        from: link.from,
                        to: link.to,
                    },
                );
            }
        }
    }
}

fn bucket_devices(
    snapshot: &Snapshot<'_>,
    reduction: &Reduction,
    island_of: &[Option<usize>],
    slicer: &mut CircuitSlicer<'_>,
    diag: &mut Diagnostics,
) {
    let records = snapshot.graph.devices();
    for d in snapshot.devices.iter().filter(|d| d.active) {
        let bus = reduction.representative(d.bus);
        let to_bus = d.to_bus.map(|t| reduction.representative(t));
        let row = DeviceRow {
            index: d.index,
            bus,
            to_bus,
        };
        let host = island_of[bus];
        let placed = match to_bus {
            None => host.ok_or(OrphanReason::HostBusInactive),
            Some(t) => match (host, island_of[t]) {
                (Some(i), Some(j)) if i == j => Ok(i),
                (Some(_), Some(_)) => Err(OrphanReason::SpansIslands),
                _ => Err(OrphanReason::HostBusInactive),
            },
        };
        match placed {
            Ok(island) => slicer.push_device(island, row),
            Err(reason) => diag.orphaned(records[d.index].id, reason),
        }
    }
}

/// Helper for callers that only need the island partition.
///
/// Returns the bus ids of every island's representatives, islands and ids
/// both in ascending id order, exactly as [`compile`] would lay them out.
pub fn partition(graph: &NetworkGraph, request: &CompileRequest) -> Result<Vec<Vec<BusId>>> {
    request.config.validate()?;
    check_time_index(graph, request.time_index)?;
    let mut diag = Diagnostics::new();
    let snapshot = Snapshot::new(graph, request.time_index, &mut diag);
    let links = snapshot.branch_links();
    let reduction = reduce(
        &links,
        &snapshot.bus_active,
        &snapshot.bus_reference,
        &request.config,
    );
    let mut rehomed: Vec<Link> = links.iter().map(|l| reduction.rehome(l)).collect();
    rehomed.extend(device_links(&snapshot, &reduction, request.config.island_links));
    let mut islands = resolve_islands(&rehomed, &reduction, &request.config);
    if request.config.ignore_single_bus_islands {
        islands.retain(|island| island.len() > 1);
    }
    Ok(islands
        .iter()
        .map(|island| island.buses().iter().map(|&b| snapshot.bus(b).id).collect())
        .collect())
}
