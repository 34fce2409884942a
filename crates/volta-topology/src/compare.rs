//! Structural and numerical comparison of compiled circuits.
//!
//! Used to check that two compilations of the same state agree, for example
//! across adjacency strategies or before and after a cache round trip.

use std::fmt;

use num_complex::Complex64 as C64;
use serde::{Deserialize, Serialize};

use crate::circuit::NumericalCircuit;

/// Tolerances for value comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompareTolerances {
    /// Absolute tolerance.
    pub abs: f64,
    /// Relative tolerance, against the expected value.
    pub rel: f64,
}

impl Default for CompareTolerances {
    fn default() -> Self {
        Self {
            abs: 1e-9,
            rel: 1e-6,
        }
    }
}

impl CompareTolerances {
    /// Exact comparison.
    pub fn exact() -> Self {
        Self { abs: 0.0, rel: 0.0 }
    }

    pub fn with_abs(mut self, abs: f64) -> Self {
        self.abs = abs;
        self
    }

    pub fn with_rel(mut self, rel: f64) -> Self {
        self.rel = rel;
        self
    }
}

/// Check whether two values match within tolerance.
///
/// Returns true if either the absolute or the relative difference is within
/// its tolerance.
pub fn values_match(expected: f64, actual: f64, abs_tol: f64, rel_tol: f64) -> bool {
    let abs_diff = (expected - actual).abs();
    if abs_diff <= abs_tol {
        return true;
    }
    expected.abs() > 0.0 && abs_diff / expected.abs() <= rel_tol
}

fn complex_match(expected: C64, actual: C64, tol: &CompareTolerances) -> bool {
    let abs_diff = (expected - actual).norm();
    abs_diff <= tol.abs || (expected.norm() > 0.0 && abs_diff / expected.norm() <= tol.rel)
}

/// One difference between two circuits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mismatch {
    /// `"bus"`, `"branch"`, `"device"` or `"circuit"`.
    pub table: &'static str,
    pub field: &'static str,
    /// Row index, or `None` for a whole-table difference.
    pub row: Option<usize>,
    pub detail: String,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.row {
            Some(row) => write!(f, "{}[{}].{}: {}", self.table, row, self.field, self.detail),
            None => write!(f, "{}.{}: {}", self.table, self.field, self.detail),
        }
    }
}

struct Collector {
    out: Vec<Mismatch>,
    tol: CompareTolerances,
}

impl Collector {
    fn push(
        &mut self,
        table: &'static str,
        field: &'static str,
        row: Option<usize>,
        detail: String,
    ) {
        self.out.push(Mismatch {
            table,
            field,
            row,
            detail,
        });
    }

    /// Compare column lengths; returns false if they differ.
    fn lengths(&mut self, table: &'static str, expected: usize, actual: usize) -> bool {
        if expected != actual {
            self.push(table, "len", None, format!("{} != {}", expected, actual));
            return false;
        }
        true
    }

    fn exact<T: PartialEq + fmt::Debug>(
        &mut self,
        table: &'static str,
        field: &'static str,
        expected: &[T],
        actual: &[T],
    ) {
        for (row, (e, a)) in expected.iter().zip(actual).enumerate() {
            if e != a {
                self.push(table, field, Some(row), format!("{:?} != {:?}", e, a));
            }
        }
    }

    fn real(&mut self, table: &'static str, field: &'static str, expected: &[f64], actual: &[f64]) {
        for (row, (&e, &a)) in expected.iter().zip(actual).enumerate() {
            if !values_match(e, a, self.tol.abs, self.tol.rel) {
                self.push(table, field, Some(row), format!("{} != {}", e, a));
            }
        }
    }

    fn complex(
        &mut self,
        table: &'static str,
        field: &'static str,
        expected: &[C64],
        actual: &[C64],
    ) {
        for (row, (&e, &a)) in expected.iter().zip(actual).enumerate() {
            if !complex_match(e, a, &self.tol) {
                self.push(table, field, Some(row), format!("{} != {}", e, a));
            }
        }
    }
}

impl NumericalCircuit {
    /// List the differences between `self` (expected) and `other`.
    ///
    /// Index columns, ids and flags must match exactly; impedances, powers
    /// and other values within `tol`. An empty list means the circuits are
    /// equivalent.
    pub fn compare(&self, other: &NumericalCircuit, tol: &CompareTolerances) -> Vec<Mismatch> {
        let mut c = Collector {
            out: Vec::new(),
            tol: *tol,
        };

        if self.is_solvable() != other.is_solvable() {
            c.push(
                "circuit",
                "solvable",
                None,
                format!("{} != {}", self.is_solvable(), other.is_solvable()),
            );
        }

        let (eb, ab) = (self.buses(), other.buses());
        if c.lengths("bus", eb.len(), ab.len()) {
            c.exact("bus", "id", &eb.ids, &ab.ids);
            c.exact("bus", "active", &eb.active, &ab.active);
            c.exact("bus", "is_reference", &eb.is_reference, &ab.is_reference);
            c.exact("bus", "merged", &eb.merged, &ab.merged);
            c.real("bus", "nominal_kv", &eb.nominal_kv, &ab.nominal_kv);
        }

        let (er, ar) = (self.branches(), other.branches());
        if c.lengths("branch", er.len(), ar.len()) {
            c.exact("branch", "id", &er.ids, &ar.ids);
            c.exact("branch", "from", &er.from, &ar.from);
            c.exact("branch", "to", &er.to, &ar.to);
            c.complex("branch", "impedance", &er.impedance, &ar.impedance);
            c.complex(
                "branch",
                "shunt_admittance",
                &er.shunt_admittance,
                &ar.shunt_admittance,
            );
            c.real("branch", "rating", &er.rating, &ar.rating);
        }

        let (ed, ad) = (self.devices(), other.devices());
        if c.lengths("device", ed.len(), ad.len()) {
            c.exact("device", "id", &ed.ids, &ad.ids);
            c.exact("device", "kind", &ed.kind, &ad.kind);
            c.exact("device", "bus", &ed.bus, &ad.bus);
            c.exact("device", "to_bus", &ed.to_bus, &ad.to_bus);
            c.complex("device", "power", &ed.power, &ad.power);
            c.complex("device", "admittance", &ed.admittance, &ad.admittance);
            for (row, (e, a)) in ed.voltage_setpoint.iter().zip(&ad.voltage_setpoint).enumerate() {
                let same = match (e, a) {
                    (Some(e), Some(a)) => values_match(*e, *a, tol.abs, tol.rel),
                    (None, None) => true,
                    _ => false,
                };
                if !same {
                    c.push("device", "voltage_setpoint", Some(row), format!("{:?} != {:?}", e, a));
                }
            }
        }

        c.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{BranchTable, BusTable, DeviceTable};
    use volta_core::{BranchId, BusId};

    fn circuit(x: f64) -> NumericalCircuit {
        let buses = BusTable {
            ids: vec![BusId::new(0), BusId::new(1)],
            positions: vec![0, 1],
            active: vec![true; 2],
            is_reference: vec![true, false],
            nominal_kv: vec![20.0; 2],
            merged: vec![vec![BusId::new(0)], vec![BusId::new(1)]],
            merged_positions: vec![vec![0], vec![1]],
        };
        let branches = BranchTable {
            ids: vec![BranchId::new(0)],
            from: vec![0],
            to: vec![1],
            impedance: vec![C64::new(0.0, x)],
            shunt_admittance: vec![C64::new(0.0, 0.0)],
            rating: vec![10.0],
            reducible: vec![false],
        };
        NumericalCircuit::new(0, buses, branches, DeviceTable::default())
    }

    #[test]
    fn test_values_match() {
        assert!(values_match(1.0, 1.0 + 1e-10, 1e-9, 0.0));
        assert!(values_match(1000.0, 1000.0001, 0.0, 1e-6));
        assert!(!values_match(1.0, 1.1, 1e-3, 1e-3));
        assert!(!values_match(0.0, 1e-3, 1e-6, 1.0));
    }

    #[test]
    fn test_identical_circuits_match() {
        let a = circuit(0.1);
        assert!(a.compare(&a.clone(), &CompareTolerances::exact()).is_empty());
    }

    #[test]
    fn test_impedance_difference_reported() {
        let a = circuit(0.1);
        let b = circuit(0.2);
        let diffs = a.compare(&b, &CompareTolerances::default());
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].table, "branch");
        assert_eq!(diffs[0].field, "impedance");
        assert_eq!(diffs[0].row, Some(0));
        assert!(diffs[0].to_string().starts_with("branch[0].impedance"));

        let loose = CompareTolerances::default().with_abs(0.5);
        assert!(a.compare(&b, &loose).is_empty());
    }

    #[test]
    fn test_length_mismatch_short_circuits_table() {
        let a = circuit(0.1);
        let empty = NumericalCircuit::new(
            0,
            BusTable::default(),
            BranchTable::default(),
            DeviceTable::default(),
        );
        let diffs = a.compare(&empty, &CompareTolerances::default());
        let fields: Vec<(&str, &str)> = diffs.iter().map(|d| (d.table, d.field)).collect();
        assert_eq!(
            fields,
            vec![("circuit", "solvable"), ("bus", "len"), ("branch", "len")]
        );
    }
}
