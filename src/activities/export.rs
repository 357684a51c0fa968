use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::Workbook;
use serde_json::Value;

use super::normalize::{ActivityRow, COLUMNS};

pub const SHEET_NAME: &str = "Activities";

/// Write the normalized rows to a single-sheet workbook. Headers and
/// cell order are the same fixed column set the table view uses, so
/// the two can never diverge.
pub fn write_workbook(activities: &[Value], path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(SHEET_NAME)
        .context("failed to name worksheet")?;

    for (col, name) in COLUMNS.iter().enumerate() {
        worksheet.write_string(0, col as u16, *name)?;
    }

    for (idx, record) in activities.iter().enumerate() {
        let row = ActivityRow::from_record(record);
        for (col, value) in row.values().iter().enumerate() {
            worksheet.write_string(idx as u32 + 1, col as u16, *value)?;
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn writes_a_workbook_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("activities.xlsx");
        let activities = vec![
            json!({ "id": 1, "subject": "First" }),
            json!({ "id": 2 }),
        ];

        write_workbook(&activities, &path).unwrap();

        let metadata = std::fs::metadata(&path).unwrap();
        assert!(metadata.len() > 0);
    }

    #[test]
    fn empty_aggregate_still_writes_headers() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.xlsx");
        write_workbook(&[], &path).unwrap();
        assert!(path.exists());
    }
}
