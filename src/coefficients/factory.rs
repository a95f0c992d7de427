use std::collections::BTreeMap;
use std::path::Path;

use nalgebra::Vector3;

use super::error::CoefficientError;
use super::loader::load_scalar_table;
use super::merge::{merge_axis_tables, ScalarTable};
use super::settings::{AxisTables, CoefficientSettings};
use super::table::TabulatedCoefficients;
use super::{CoefficientModel, SharedCoefficientModel};

/// Builds a coefficient model from its tagged settings descriptor.
///
/// All file reads and consistency checks happen here, once; the returned
/// model never fails for construction reasons afterwards. Control-surface
/// increment models are built recursively from their own sub-descriptors.
pub fn create_coefficient_model(
    settings: &CoefficientSettings,
) -> Result<CoefficientModel, CoefficientError> {
    match settings {
        CoefficientSettings::Constant { coefficient } => Ok(CoefficientModel::constant(
            Vector3::new(coefficient[0], coefficient[1], coefficient[2]),
        )),
        CoefficientSettings::Tabulated {
            axis_tables,
            control_surfaces,
        } => {
            let tables = resolve_axis_tables(axis_tables)?;
            let tabulated = merge_and_dispatch(&tables)?;

            let mut increments = BTreeMap::new();
            for (name, sub_settings) in control_surfaces {
                increments.insert(name.clone(), create_coefficient_model(sub_settings)?);
            }
            Ok(CoefficientModel::tabulated(tabulated, increments))
        }
    }
}

/// As [`create_coefficient_model`], wrapped for shared read-only ownership.
pub fn create_shared_coefficient_model(
    settings: &CoefficientSettings,
) -> Result<SharedCoefficientModel, CoefficientError> {
    Ok(SharedCoefficientModel::new(create_coefficient_model(
        settings,
    )?))
}

/// Builds a constant model, failing when the descriptor declares another
/// variant.
pub fn create_constant_model(
    settings: &CoefficientSettings,
) -> Result<CoefficientModel, CoefficientError> {
    let coefficient = settings.as_constant()?;
    Ok(CoefficientModel::constant(Vector3::new(
        coefficient[0],
        coefficient[1],
        coefficient[2],
    )))
}

/// Builds a tabulated model, failing when the descriptor declares another
/// variant.
pub fn create_tabulated_model(
    settings: &CoefficientSettings,
) -> Result<CoefficientModel, CoefficientError> {
    let (axis_tables, control_surfaces) = settings.as_tabulated()?;
    let tables = resolve_axis_tables(axis_tables)?;
    let tabulated = merge_and_dispatch(&tables)?;
    let mut increments = BTreeMap::new();
    for (name, sub_settings) in control_surfaces {
        increments.insert(name.clone(), create_coefficient_model(sub_settings)?);
    }
    Ok(CoefficientModel::tabulated(tabulated, increments))
}

/// Reads the x-, y- and z-component table files of one coefficient set and
/// merges them into a tabulated model of the matching dimensionality.
pub fn read_tabulated_coefficients(
    axis_files: &[&Path; 3],
) -> Result<TabulatedCoefficients, CoefficientError> {
    let tables = [
        load_scalar_table(axis_files[0])?,
        load_scalar_table(axis_files[1])?,
        load_scalar_table(axis_files[2])?,
    ];
    merge_and_dispatch(&tables)
}

fn resolve_axis_tables(axis_tables: &AxisTables) -> Result<[ScalarTable; 3], CoefficientError> {
    match axis_tables {
        AxisTables::Files(paths) => Ok([
            load_scalar_table(&paths[0])?,
            load_scalar_table(&paths[1])?,
            load_scalar_table(&paths[2])?,
        ]),
        AxisTables::Inline(tables) => {
            for table in tables.iter() {
                table.validate()?;
            }
            Ok((**tables).clone())
        }
    }
}

fn merge_and_dispatch(
    tables: &[ScalarTable; 3],
) -> Result<TabulatedCoefficients, CoefficientError> {
    let merged = merge_axis_tables(&tables[0], &tables[1], &tables[2])?;
    TabulatedCoefficients::from_merged(merged)
}
