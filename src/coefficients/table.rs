use nalgebra::Vector3;

use super::error::CoefficientError;
use super::merge::MergedTable;

/// N-dimensional grid of 3-vector coefficients with multilinear
/// interpolation over per-dimension breakpoints.
///
/// Values are stored flattened in row-major order, last dimension fastest.
/// Queries outside the breakpoint range are clamped to the table boundary.
#[derive(Debug, Clone)]
pub struct CoefficientTable<const N: usize> {
    breakpoints: [Vec<f64>; N],
    values: Vec<Vector3<f64>>,
    strides: [usize; N],
}

impl<const N: usize> CoefficientTable<N> {
    pub fn new(
        breakpoints: [Vec<f64>; N],
        values: Vec<Vector3<f64>>,
    ) -> Result<Self, CoefficientError> {
        for (dimension, axis) in breakpoints.iter().enumerate() {
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
        let expected: usize = breakpoints.iter().map(Vec::len).product();
        if values.len() != expected {
            return Err(CoefficientError::MalformedTable(format!(
                "value count {} does not match grid size {}",
                values.len(),
                expected
            )));
        }

        let mut strides = [1usize; N];
        for dimension in (0..N.saturating_sub(1)).rev() {
            strides[dimension] = strides[dimension + 1] * breakpoints[dimension + 1].len();
        }

        Ok(Self {
            breakpoints,
            values,
            strides,
        })
    }

    pub fn breakpoints(&self) -> &[Vec<f64>; N] {
        &self.breakpoints
    }

    /// Multilinear interpolation at `point`.
    pub fn value(&self, point: &[f64; N]) -> Vector3<f64> {
        let mut lower = [0usize; N];
        let mut weight = [0.0f64; N];

        for dimension in 0..N {
            let axis = &self.breakpoints[dimension];
            if axis.len() == 1 {
                continue;
            }
            let clamped = point[dimension].clamp(axis[0], axis[axis.len() - 1]);
            let upper = axis
                .partition_point(|breakpoint| *breakpoint < clamped)
                .clamp(1, axis.len() - 1);
            lower[dimension] = upper - 1;
            weight[dimension] =
                (clamped - axis[upper - 1]) / (axis[upper] - axis[upper - 1]);
        }

        // Accumulate the 2^N cell corners; corners with zero weight are
        // skipped, which also keeps single-breakpoint dimensions in bounds.
        let mut result = Vector3::zeros();
        for corner in 0..(1usize << N) {
            let mut corner_weight = 1.0;
            let mut index = 0usize;
            for dimension in 0..N {
                if corner & (1 << dimension) != 0 {
                    corner_weight *= weight[dimension];
                    index += (lower[dimension] + 1) * self.strides[dimension];
                } else {
                    corner_weight *= 1.0 - weight[dimension];
                    index += lower[dimension] * self.strides[dimension];
                }
            }
            if corner_weight != 0.0 {
                result += self.values[index] * corner_weight;
            }
        }
        result
    }
}

/// Tabulated coefficients, closed over the supported dimensionalities.
#[derive(Debug, Clone)]
pub enum TabulatedCoefficients {
    D1(CoefficientTable<1>),
    D2(CoefficientTable<2>),
    D3(CoefficientTable<3>),
    D4(CoefficientTable<4>),
    D5(CoefficientTable<5>),
    D6(CoefficientTable<6>),
}

impl TabulatedCoefficients {
    /// Builds the fixed-dimension table matching the merged table's
    /// dimensionality. Dimensionalities outside 1..=6 are unsupported.
    pub fn from_merged(merged: MergedTable) -> Result<Self, CoefficientError> {
        match merged.breakpoints.len() {
            1 => Ok(Self::D1(fixed_dimension_table(merged)?)),
            2 => Ok(Self::D2(fixed_dimension_table(merged)?)),
            3 => Ok(Self::D3(fixed_dimension_table(merged)?)),
            4 => Ok(Self::D4(fixed_dimension_table(merged)?)),
            5 => Ok(Self::D5(fixed_dimension_table(merged)?)),
            6 => Ok(Self::D6(fixed_dimension_table(merged)?)),
            found => Err(CoefficientError::UnsupportedDimensionality { found }),
        }
    }

    pub fn dimensionality(&self) -> usize {
        match self {
            Self::D1(_) => 1,
            Self::D2(_) => 2,
            Self::D3(_) => 3,
            Self::D4(_) => 4,
            Self::D5(_) => 5,
            Self::D6(_) => 6,
        }
    }

    pub fn value(&self, variables: &[f64]) -> Result<Vector3<f64>, CoefficientError> {
        if variables.len() != self.dimensionality() {
            return Err(CoefficientError::DimensionalityMismatch {
                expected: self.dimensionality(),
                found: variables.len(),
            });
        }
        Ok(match self {
            Self::D1(table) => table.value(&[variables[0]]),
            Self::D2(table) => table.value(&[variables[0], variables[1]]),
            Self::D3(table) => table.value(&[variables[0], variables[1], variables[2]]),
            Self::D4(table) => table.value(&[
                variables[0],
                variables[1],
                variables[2],
                variables[3],
            ]),
            Self::D5(table) => table.value(&[
                variables[0],
                variables[1],
                variables[2],
                variables[3],
                variables[4],
            ]),
            Self::D6(table) => table.value(&[
                variables[0],
                variables[1],
                variables[2],
                variables[3],
                variables[4],
                variables[5],
            ]),
        })
    }
}

fn fixed_dimension_table<const N: usize>(
    merged: MergedTable,
) -> Result<CoefficientTable<N>, CoefficientError> {
    let MergedTable {
        breakpoints,
        values,
    } = merged;
    let breakpoints: [Vec<f64>; N] = breakpoints.try_into().map_err(|actual: Vec<Vec<f64>>| {
        CoefficientError::MalformedTable(format!(
            "expected {} breakpoint lists, found {}",
            N,
            actual.len()
        ))
    })?;
    CoefficientTable::new(breakpoints, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn linear_1d() -> CoefficientTable<1> {
        // f(x) = (x, 2x, -x) on [0, 2]
        CoefficientTable::new(
            [vec![0.0, 1.0, 2.0]],
            vec![
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(1.0, 2.0, -1.0),
                Vector3::new(2.0, 4.0, -2.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_1d_interpolation_hits_nodes_and_midpoints() {
        let table = linear_1d();
        assert_relative_eq!(table.value(&[1.0]), Vector3::new(1.0, 2.0, -1.0));
        assert_relative_eq!(table.value(&[0.5]), Vector3::new(0.5, 1.0, -0.5));
        assert_relative_eq!(table.value(&[1.75]), Vector3::new(1.75, 3.5, -1.75));
    }

    #[test]
    fn test_out_of_range_queries_clamp() {
        let table = linear_1d();
        assert_relative_eq!(table.value(&[-5.0]), Vector3::new(0.0, 0.0, 0.0));
        assert_relative_eq!(table.value(&[9.0]), Vector3::new(2.0, 4.0, -2.0));
    }

    #[test]
    fn test_2d_bilinear_interpolation() {
        // f(x, y) = x + 10 y, sampled on a 2x2 grid.
        let table = CoefficientTable::new(
            [vec![0.0, 1.0], vec![0.0, 1.0]],
            vec![
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(10.0, 0.0, 0.0),
                Vector3::new(1.0, 0.0, 0.0),
                Vector3::new(11.0, 0.0, 0.0),
            ],
        )
        .unwrap();

        assert_relative_eq!(table.value(&[0.5, 0.5]).x, 5.5, epsilon = 1e-12);
        assert_relative_eq!(table.value(&[1.0, 0.25]).x, 3.5, epsilon = 1e-12);
    }

    #[test]
    fn test_single_breakpoint_dimension() {
        let table = CoefficientTable::new(
            [vec![4.0], vec![0.0, 1.0]],
            vec![Vector3::new(1.0, 0.0, 0.0), Vector3::new(3.0, 0.0, 0.0)],
        )
        .unwrap();
        assert_relative_eq!(table.value(&[99.0, 0.5]).x, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_from_merged_dispatches_by_dimensionality() {
        let merged = MergedTable {
            breakpoints: vec![vec![0.0, 1.0]; 3],
            values: vec![Vector3::zeros(); 8],
        };
        let tabulated = TabulatedCoefficients::from_merged(merged).unwrap();
        assert_eq!(tabulated.dimensionality(), 3);
    }

    #[test]
    fn test_from_merged_rejects_unsupported_dimensionality() {
        let merged = MergedTable {
            breakpoints: vec![vec![0.0, 1.0]; 7],
            values: vec![Vector3::zeros(); 128],
        };
        assert!(matches!(
            TabulatedCoefficients::from_merged(merged).unwrap_err(),
            CoefficientError::UnsupportedDimensionality { found: 7 }
        ));
    }

    #[test]
    fn test_value_checks_variable_count() {
        let tabulated = TabulatedCoefficients::D1(linear_1d());
        assert!(matches!(
            tabulated.value(&[0.0, 1.0]).unwrap_err(),
            CoefficientError::DimensionalityMismatch {
                expected: 1,
                found: 2
            }
        ));
    }
}
