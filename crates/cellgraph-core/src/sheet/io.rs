use super::Sheet;
use crate::error::{Result, SheetError};
use crate::storage::{CellRecord, SheetFile, parse_sheet, parse_sheet_content, write_sheet, write_sheet_content};
use cellgraph_engine::engine::normalize;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, warn};

impl Sheet {
    /// Rebuild a sheet by replaying every stored cell through
    /// [`Sheet::set_contents_of_cell`].
    fn from_sheet_file(file: SheetFile) -> Result<Sheet> {
        let mut seen: HashSet<String> = HashSet::with_capacity(file.cells.len());
        for name in file.cells.keys() {
            if !seen.insert(normalize(name)) {
                return Err(SheetError::read_write(format!(
                    "Duplicate cell {} (names are case-insensitive)",
                    normalize(name)
                )));
            }
        }

        let mut sheet = Sheet::new();
        for (name, record) in &file.cells {
            sheet
                .set_contents_of_cell(name, &record.string_form)
                .map_err(|e| SheetError::read_write(format!("Cannot load cell {}: {}", name, e)))?;
        }
        sheet.changed = false;
        Ok(sheet)
    }

    fn to_sheet_file(&self) -> SheetFile {
        let cells = self
            .cells
            .iter()
            .map(|(name, cell)| {
                (
                    name.to_string(),
                    CellRecord::new(cell.contents.to_input_string()),
                )
            })
            .collect();
        SheetFile { cells }
    }

    /// Serialize to the JSON sheet format.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        write_sheet_content(&self.to_sheet_file(), pretty)
    }

    /// Build a sheet from JSON text.
    pub fn from_json(content: &str) -> Result<Sheet> {
        let file = parse_sheet_content(content)?;
        Self::from_sheet_file(file)
    }

    /// Replace this sheet's contents with the sheet in `content`.
    /// On error the current contents are kept.
    pub fn load_json(&mut self, content: &str) -> Result<()> {
        // Build aside first so load is transactional.
        let loaded = Self::from_json(content).inspect_err(|e| warn!(error = %e, "load failed"))?;
        *self = loaded;
        Ok(())
    }

    /// Open a sheet file.
    pub fn open(path: &Path) -> Result<Sheet> {
        let file = parse_sheet(path)?;
        let sheet = Self::from_sheet_file(file)?;
        debug!(path = %path.display(), cells = sheet.len(), "sheet opened");
        Ok(sheet)
    }

    /// Replace this sheet's contents with the file at `path`.
    /// On error the current contents are kept.
    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        let loaded = Self::open(path).inspect_err(|e| warn!(error = %e, "load failed"))?;
        *self = loaded;
        Ok(())
    }

    /// Save to `path` and clear the changed flag.
    pub fn save(&mut self, path: &Path, pretty: bool) -> Result<()> {
        write_sheet(path, &self.to_sheet_file(), pretty)?;
        self.changed = false;
        debug!(path = %path.display(), cells = self.len(), "sheet saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::Sheet;
    use crate::error::SheetError;
    use cellgraph_engine::engine::{CellContents, CellValue};

    fn temp_path(tag: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!(
            "cellgraph_{}_{}_{}_{:?}.json",
            tag,
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos(),
            std::thread::current().id(),
        ))
    }

    struct Cleanup(std::path::PathBuf);
    impl Drop for Cleanup {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.0);
        }
    }

    #[test]
    fn test_json_round_trip() {
        let mut sheet = Sheet::new();
        sheet.set_contents_of_cell("A1", "5").unwrap();
        sheet.set_contents_of_cell("B1", "=a1 + 2.0").unwrap();
        sheet.set_contents_of_cell("C1", "hello").unwrap();

        let json = sheet.to_json(false).unwrap();
        assert_eq!(
            json,
            r#"{"Cells":{"A1":{"StringForm":"5"},"B1":{"StringForm":"=A1+2"},"C1":{"StringForm":"hello"}}}"#
        );

        let loaded = Sheet::from_json(&json).unwrap();
        assert!(!loaded.is_changed());
        for name in ["A1", "B1", "C1"] {
            assert_eq!(loaded.cell_value(name).unwrap(), sheet.cell_value(name).unwrap());
            assert_eq!(loaded.cell_contents(name).unwrap(), sheet.cell_contents(name).unwrap());
        }
        assert_eq!(loaded.direct_dependents("A1").unwrap(), sheet.direct_dependents("A1").unwrap());
    }

    #[test]
    fn test_load_is_order_independent() {
        // Z1 is replayed after A1 even though A1 reads it.
        let json = r#"{"Cells":{"A1":{"StringForm":"=Z1*2"},"Z1":{"StringForm":"21"}}}"#;
        let sheet = Sheet::from_json(json).unwrap();
        assert_eq!(sheet.cell_value("A1").unwrap(), CellValue::Number(42.0));
    }

    #[test]
    fn test_load_normalizes_names() {
        let json = r#"{"Cells":{"a1":{"StringForm":"1"},"b1":{"StringForm":"=a1"}}}"#;
        let sheet = Sheet::from_json(json).unwrap();
        assert_eq!(sheet.cell_value("B1").unwrap(), CellValue::Number(1.0));
    }

    #[test]
    fn test_load_rejects_bad_cells() {
        for json in [
            r#"{"Cells":{"1A":{"StringForm":"1"}}}"#,
            r#"{"Cells":{"A1":{"StringForm":"=1+"}}}"#,
            r#"{"Cells":{"A1":{"StringForm":"=B1"},"B1":{"StringForm":"=A1"}}}"#,
            "{not json",
        ] {
            let err = Sheet::from_json(json).unwrap_err();
            assert!(matches!(err, SheetError::ReadWrite { .. }), "{json}");
        }
    }

    #[test]
    fn test_load_rejects_names_differing_only_in_case() {
        let json = r#"{"Cells":{"A1":{"StringForm":"1"},"B1":{"StringForm":"=A1"},"a1":{"StringForm":"=B1"}}}"#;
        let err = Sheet::from_json(json).unwrap_err();
        match err {
            SheetError::ReadWrite { message } => {
                assert_eq!(message, "Duplicate cell A1 (names are case-insensitive)");
            }
            other => panic!("expected read/write error, got {other:?}"),
        }
    }

    #[test]
    fn test_overflow_survives_round_trip() {
        let mut sheet = Sheet::new();
        sheet.set_contents_of_cell("A1", "=1e308*10").unwrap();
        sheet.set_contents_of_cell("A2", "=1e308*10-1e308*10").unwrap();
        assert_eq!(sheet.cell_value("A1").unwrap().to_string(), "#ERR: Numeric overflow");

        let loaded = Sheet::from_json(&sheet.to_json(false).unwrap()).unwrap();
        for name in ["A1", "A2"] {
            assert_eq!(loaded.cell_value(name).unwrap(), sheet.cell_value(name).unwrap());
        }
    }

    #[test]
    fn test_load_json_failure_is_transactional() {
        let mut sheet = Sheet::new();
        sheet.set_contents_of_cell("C3", "42").unwrap();

        let result = sheet.load_json(r#"{"Cells":{"A1":{"StringForm":"=A1"}}}"#);
        assert!(result.is_err());
        assert_eq!(sheet.cell_contents("C3").unwrap(), CellContents::Number(42.0));
        assert_eq!(sheet.len(), 1);
        assert!(sheet.is_changed());

        sheet.load_json(r#"{"Cells":{"A1":{"StringForm":"7"}}}"#).unwrap();
        assert_eq!(sheet.len(), 1);
        assert_eq!(sheet.cell_value("A1").unwrap(), CellValue::Number(7.0));
        assert!(!sheet.is_changed());
    }

    #[test]
    fn test_save_and_open() {
        let path = temp_path("save_open");
        let _cleanup = Cleanup(path.clone());

        let mut sheet = Sheet::new();
        sheet.set_contents_of_cell("A1", "5").unwrap();
        sheet.set_contents_of_cell("B1", "=A1/2").unwrap();
        assert!(sheet.is_changed());
        sheet.save(&path, true).unwrap();
        assert!(!sheet.is_changed());

        let opened = Sheet::open(&path).unwrap();
        assert_eq!(opened.cell_value("B1").unwrap(), CellValue::Number(2.5));
        assert!(!opened.is_changed());
    }

    #[test]
    fn test_load_file_failure_is_transactional() {
        let path = temp_path("load_bad");
        let _cleanup = Cleanup(path.clone());
        std::fs::write(&path, "{\"Cells\": ").unwrap();

        let mut sheet = Sheet::new();
        sheet.set_contents_of_cell("A1", "1").unwrap();
        let err = sheet.load_file(&path).unwrap_err();
        assert!(matches!(err, SheetError::ReadWrite { .. }));
        assert_eq!(sheet.cell_value("A1").unwrap(), CellValue::Number(1.0));
    }

    #[test]
    fn test_save_to_missing_directory_fails() {
        let path = std::env::temp_dir()
            .join(format!("cellgraph_no_such_dir_{}", std::process::id()))
            .join("sheet.json");
        let mut sheet = Sheet::new();
        sheet.set_contents_of_cell("A1", "1").unwrap();
        let err = sheet.save(&path, false).unwrap_err();
        assert!(matches!(err, SheetError::ReadWrite { .. }));
        assert!(sheet.is_changed());
    }
}
