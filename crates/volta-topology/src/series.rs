//! Compilation over every time step of a network.
//!
//! Time steps whose activity vectors are identical share a topology, so
//! each distinct state is compiled once and the resulting
//! `Arc<Compilation>` is handed to every time step of its group. Distinct
//! states are compiled in parallel with rayon when there are enough of them.

use std::collections::HashMap;
use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use volta_core::{Element, NetworkGraph};

use crate::compile::{Compilation, compile};
use crate::config::{CompileConfig, CompileRequest};
use crate::error::{Error, Result};

/// Configuration for parallel time-series compilation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParallelConfig {
    /// Minimum distinct states to compile in parallel (below this,
    /// sequential is faster).
    pub min_steps_for_parallel: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            min_steps_for_parallel: 4,
        }
    }
}

impl ParallelConfig {
    pub fn with_min_parallel(mut self, min: usize) -> Self {
        self.min_steps_for_parallel = min;
        self
    }

    /// Never go parallel.
    pub fn sequential() -> Self {
        Self {
            min_steps_for_parallel: usize::MAX,
        }
    }
}

/// Time steps grouped by topology state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopologyStates {
    /// Time indices of each group, ascending; groups ordered by first index.
    groups: Vec<Vec<usize>>,
    /// Time index → group.
    group_of: Vec<usize>,
}

impl TopologyStates {
    /// Group the time steps of `graph` by the activity of every bus, branch
    /// and device.
    pub fn group(graph: &NetworkGraph) -> Self {
        let steps = graph.time_steps();
        let mut seen: HashMap<Vec<bool>, usize> = HashMap::new();
        let mut groups: Vec<Vec<usize>> = Vec::new();
        let mut group_of = Vec::with_capacity(steps);

        for t in 0..steps {
            let state = activity_vector(graph, t);
            let next = groups.len();
            let g = *seen.entry(state).or_insert(next);
            if g == next {
                groups.push(Vec::new());
            }
            groups[g].push(t);
            group_of.push(g);
        }

        Self { groups, group_of }
    }

    /// One group per time step, for callers that want every step compiled.
    pub fn force_all(steps: usize) -> Self {
        Self {
            groups: (0..steps).map(|t| vec![t]).collect(),
            group_of: (0..steps).collect(),
        }
    }

    pub fn groups(&self) -> &[Vec<usize>] {
        &self.groups
    }

    pub fn group_of(&self, t: usize) -> Option<usize> {
        self.group_of.get(t).copied()
    }

    /// Number of distinct states.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of time steps covered.
    pub fn time_steps(&self) -> usize {
        self.group_of.len()
    }
}

fn activity_vector(graph: &NetworkGraph, t: usize) -> Vec<bool> {
    let at = Some(t);
    let mut state =
        Vec::with_capacity(graph.bus_count() + graph.branch_count() + graph.device_count());
    state.extend(graph.buses().iter().map(|b| b.activity().at(at)));
    state.extend(graph.branches().iter().map(|b| b.activity().at(at)));
    state.extend(graph.devices().iter().map(|d| d.activity().at(at)));
    state
}

/// Compilations for every time step of a network.
#[derive(Debug, Clone)]
pub struct TimeSeriesCompilation {
    states: TopologyStates,
    compilations: Vec<Arc<Compilation>>,
}

impl TimeSeriesCompilation {
    /// Compilation for time step `t`. Its [`Compilation::time_index`] is the
    /// first time step of the group `t` belongs to.
    pub fn at(&self, t: usize) -> Option<&Arc<Compilation>> {
        let g = self.states.group_of(t)?;
        self.compilations.get(g)
    }

    /// One compilation per distinct state, in group order.
    pub fn distinct(&self) -> &[Arc<Compilation>] {
        &self.compilations
    }

    pub fn states(&self) -> &TopologyStates {
        &self.states
    }

    pub fn time_steps(&self) -> usize {
        self.states.time_steps()
    }
}

/// Compile every time step of `graph`, once per distinct topology state.
///
/// Falls back to sequential execution if:
/// - the number of distinct states is below `parallel.min_steps_for_parallel`
/// - only 1 rayon thread is available
pub fn compile_time_series(
    graph: &NetworkGraph,
    config: &CompileConfig,
    parallel: &ParallelConfig,
) -> Result<TimeSeriesCompilation> {
    if graph.time_steps() == 0 {
        return Err(Error::NoTimeProfiles);
    }
    config.validate()?;

    let states = TopologyStates::group(graph);
    compile_states(graph, config, parallel, states)
}

/// Compile one representative time step per group of `states`.
pub fn compile_states(
    graph: &NetworkGraph,
    config: &CompileConfig,
    parallel: &ParallelConfig,
    states: TopologyStates,
) -> Result<TimeSeriesCompilation> {
    let requests: Vec<CompileRequest> = states
        .groups()
        .iter()
        .map(|g| CompileRequest::at(g[0]).with_config(config.clone()))
        .collect();

    let use_parallel =
        requests.len() >= parallel.min_steps_for_parallel && rayon::current_num_threads() > 1;

    let compiled: Result<Vec<Compilation>> = if use_parallel {
        log::info!(
            "compiling {} topology states of {} time steps ({} threads)",
            requests.len(),
            states.time_steps(),
            rayon::current_num_threads()
        );
        requests.par_iter().map(|r| compile(graph, r)).collect()
    } else {
        log::debug!(
            "compiling {} topology states of {} time steps sequentially",
            requests.len(),
            states.time_steps()
        );
        requests.iter().map(|r| compile(graph, r)).collect()
    };

    Ok(TimeSeriesCompilation {
        states,
        compilations: compiled?.into_iter().map(Arc::new).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64 as C64;
    use volta_core::{Activity, Branch, Bus};

    fn switching_graph() -> NetworkGraph {
        // Branch 1 is out at steps 1 and 3.
        NetworkGraph::from_parts(
            4,
            [Bus::new(0).reference(), Bus::new(1), Bus::new(2)],
            [
                Branch::new(0, 0, 1, C64::new(0.0, 0.1)),
                Branch::new(1, 1, 2, C64::new(0.0, 0.1))
                    .with_activity(Activity::with_profile(true, vec![true, false, true, false])),
            ],
            [],
        )
        .unwrap()
    }

    #[test]
    fn test_grouping() {
        let states = TopologyStates::group(&switching_graph());
        assert_eq!(states.groups(), &[vec![0, 2], vec![1, 3]]);
        assert_eq!(states.group_of(3), Some(1));
        assert_eq!(states.group_of(4), None);
        assert_eq!(states.len(), 2);
    }

    #[test]
    fn test_force_all() {
        let states = TopologyStates::force_all(3);
        assert_eq!(states.len(), 3);
        assert_eq!(states.group_of(2), Some(2));
    }

    #[test]
    fn test_shared_compilations() {
        let g = switching_graph();
        let series =
            compile_time_series(&g, &CompileConfig::default(), &ParallelConfig::default()).unwrap();
        assert_eq!(series.distinct().len(), 2);
        assert!(Arc::ptr_eq(series.at(0).unwrap(), series.at(2).unwrap()));
        assert_eq!(series.at(0).unwrap().island_count(), 1);
        assert_eq!(series.at(3).unwrap().island_count(), 2);
        assert_eq!(series.at(3).unwrap().time_index(), Some(1));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let g = switching_graph();
        let config = CompileConfig::default();
        let seq = compile_time_series(&g, &config, &ParallelConfig::sequential()).unwrap();
        let par = compile_time_series(&g, &config, &ParallelConfig::default().with_min_parallel(0))
            .unwrap();
        for t in 0..4 {
            assert_eq!(seq.at(t).unwrap().as_ref(), par.at(t).unwrap().as_ref());
        }
    }

    #[test]
    fn test_requires_profiles() {
        let err = compile_time_series(
            &NetworkGraph::new(),
            &CompileConfig::default(),
            &ParallelConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err, Error::NoTimeProfiles);
    }
}
