use nalgebra::Vector3;
use serde::Deserialize;

use super::error::CoefficientError;

/// Scalar N-dimensional coefficient table as handed over by a file reader:
/// one breakpoint list per dimension and the grid values flattened in
/// row-major order (last dimension fastest).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScalarTable {
    pub breakpoints: Vec<Vec<f64>>,
    pub values: Vec<f64>,
}

impl ScalarTable {
    pub fn new(breakpoints: Vec<Vec<f64>>, values: Vec<f64>) -> Result<Self, CoefficientError> {
        let table = Self {
            breakpoints,
            values,
        };
        table.validate()?;
        Ok(table)
    }

    pub fn shape(&self) -> Vec<usize> {
        self.breakpoints.iter().map(Vec::len).collect()
    }

    pub fn dimensionality(&self) -> usize {
        self.breakpoints.len()
    }

    /// Eager consistency check, run once at ingestion time.
    pub fn validate(&self) -> Result<(), CoefficientError> {
        if self.breakpoints.is_empty() {
            return Err(CoefficientError::MalformedTable(
                "table declares no independent variables".to_string(),
            ));
        }
        for (dimension, axis) in self.breakpoints.iter().enumerate() {
            if axis.is_empty() {
                return Err(CoefficientError::MalformedTable(format!(
                    "dimension {} has an empty breakpoint list",
                    dimension
                )));
            }
            if !axis.windows(2).all(|pair| pair[0] < pair[1]) {
                return Err(CoefficientError::MalformedTable(format!(
                    "breakpoints for dimension {} are not strictly increasing",
                    dimension
                )));
            }
        }
        let expected: usize = self.shape().iter().product();
        if self.values.len() != expected {
            return Err(CoefficientError::MalformedTable(format!(
                "value count {} does not match grid size {}",
                self.values.len(),
                expected
            )));
        }
        Ok(())
    }
}

/// Three-vector coefficient grid over a shared breakpoint set, produced by
/// merging per-axis scalar tables.
#[derive(Debug, Clone)]
pub struct MergedTable {
    pub breakpoints: Vec<Vec<f64>>,
    pub values: Vec<Vector3<f64>>,
}

/// Merges the x-, y- and z-component tables of a coefficient set into a
/// single table of 3-vectors over their shared grid.
///
/// The three tables must agree exactly in shape and in every per-dimension
/// breakpoint list.
pub fn merge_axis_tables(
    x: &ScalarTable,
    y: &ScalarTable,
    z: &ScalarTable,
) -> Result<MergedTable, CoefficientError> {
    if x.shape() != y.shape() || x.shape() != z.shape() {
        return Err(CoefficientError::InconsistentIndependentVariables {
            detail: format!(
                "component table shapes differ: x {:?}, y {:?}, z {:?}",
                x.shape(),
                y.shape(),
                z.shape()
            ),
        });
    }
    if x.breakpoints != y.breakpoints || x.breakpoints != z.breakpoints {
        return Err(CoefficientError::InconsistentIndependentVariables {
            detail: "per-dimension breakpoint lists differ between component tables".to_string(),
        });
    }

    let values = x
        .values
        .iter()
        .zip(y.values.iter())
        .zip(z.values.iter())
        .map(|((&cx, &cy), &cz)| Vector3::new(cx, cy, cz))
        .collect();

    Ok(MergedTable {
        breakpoints: x.breakpoints.clone(),
        values,
    })
}
