use std::collections::BTreeMap;

use aeroframe::{AxisTables, CoefficientSettings, ScalarTable};

/// Scalar table over (Mach, angle of attack) holding `Cm = alpha - 0.1 * Mach`,
/// exact under bilinear interpolation.
pub fn pitch_moment_table() -> ScalarTable {
    ScalarTable::new(
        vec![vec![0.0, 2.0], vec![-1.0, 1.0]],
        vec![-1.0, 1.0, -1.2, 0.8],
    )
    .unwrap()
}

fn zero_table() -> ScalarTable {
    ScalarTable::new(vec![vec![0.0, 2.0], vec![-1.0, 1.0]], vec![0.0; 4]).unwrap()
}

/// Tabulated settings for a moment-coefficient model whose pitch component
/// is [`pitch_moment_table`] and whose roll/yaw components are zero.
pub fn pitch_moment_settings() -> CoefficientSettings {
    CoefficientSettings::Tabulated {
        axis_tables: AxisTables::Inline(Box::new([
            zero_table(),
            pitch_moment_table(),
            zero_table(),
        ])),
        control_surfaces: BTreeMap::new(),
    }
}
