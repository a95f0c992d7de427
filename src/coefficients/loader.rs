use std::fs;
use std::path::Path;

use super::error::CoefficientError;
use super::merge::ScalarTable;

/// Reads one scalar coefficient table from a YAML file.
///
/// This runs during factory construction, strictly before the simulation
/// starts; the per-step evaluation path never touches the filesystem. Shape
/// problems are reported here, eagerly, rather than at first evaluation.
pub fn load_scalar_table(path: &Path) -> Result<ScalarTable, CoefficientError> {
    let contents = fs::read_to_string(path)?;
    let table: ScalarTable = serde_yaml::from_str(&contents)?;
    table.validate()?;
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_table(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_round_trip() {
        let file = write_table(
            "breakpoints:\n  - [0.0, 0.5, 1.0]\nvalues: [0.1, 0.2, 0.3]\n",
        );
        let table = load_scalar_table(file.path()).unwrap();
        assert_eq!(table.shape(), vec![3]);
        assert_eq!(table.values, vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_malformed_shape_rejected_eagerly() {
        let file = write_table("breakpoints:\n  - [0.0, 1.0]\nvalues: [0.1]\n");
        assert!(matches!(
            load_scalar_table(file.path()).unwrap_err(),
            CoefficientError::MalformedTable(_)
        ));
    }

    #[test]
    fn test_missing_file_reported() {
        let err = load_scalar_table(Path::new("/nonexistent/cd.yaml")).unwrap_err();
        assert!(matches!(err, CoefficientError::TableFile(_)));
    }

    #[test]
    fn test_unparseable_file_reported() {
        let file = write_table("breakpoints: 3\n");
        assert!(matches!(
            load_scalar_table(file.path()).unwrap_err(),
            CoefficientError::TableFormat(_)
        ));
    }
}
