use crate::error::{FinanceBuddyError, Result};
use crate::schema::{Row, UploadedTable};
use csv::ReaderBuilder;
use log::{debug, info};
use std::io::Read;
use std::path::Path;

/// Accepts only names ending in `.csv` (case-sensitive, matching what the
/// upload widget offers).
pub fn ensure_csv_name(name: &str) -> Result<()> {
    if name.ends_with(".csv") {
        Ok(())
    } else {
        Err(FinanceBuddyError::InvalidFileType(name.to_string()))
    }
}

/// Reads a header-first CSV into a table. Blank lines are skipped, short rows
/// leave their trailing columns absent, surplus cells are ignored. A row of
/// empty cells is still a row; normalization drops it later.
pub fn read_table<R: Read>(reader: R, source_name: impl Into<String>) -> Result<UploadedTable> {
    let source_name = source_name.into();
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let row: Row = headers
            .iter()
            .cloned()
            .zip(record.iter().map(str::to_string))
            .collect();
        rows.push(row);
    }

    debug!(
        "Parsed {} rows with headers {:?} from {}",
        rows.len(),
        headers,
        source_name
    );

    Ok(UploadedTable::new(headers, rows, source_name))
}

pub fn read_table_from_str(content: &str, source_name: impl Into<String>) -> Result<UploadedTable> {
    read_table(content.as_bytes(), source_name)
}

/// Validates the extension, then parses the file. The table is named after
/// the file, not the full path.
pub fn load_table(path: &Path) -> Result<UploadedTable> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| FinanceBuddyError::InvalidFileType(path.display().to_string()))?;
    ensure_csv_name(file_name)?;

    let file = std::fs::File::open(path)?;
    let table = read_table(file, file_name)?;
    info!("Loaded {} rows from {}", table.len(), file_name);
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_rejects_non_csv_names() {
        assert!(ensure_csv_name("statement.csv").is_ok());
        assert!(matches!(
            ensure_csv_name("statement.xlsx"),
            Err(FinanceBuddyError::InvalidFileType(_))
        ));
        assert!(ensure_csv_name("statement.CSV").is_err());
    }

    #[test]
    fn test_reads_headers_and_rows_in_order() {
        let table = read_table_from_str(
            "Date,Description,Amount\n2024-12-01,Monthly Salary,75000\n2024-12-03,Big Bazaar,2450\n",
            "bank.csv",
        )
        .unwrap();

        assert_eq!(table.headers(), &["Date", "Description", "Amount"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[1]["Description"], "Big Bazaar");
        assert_eq!(table.source_name(), "bank.csv");
    }

    #[test]
    fn test_skips_blank_lines_keeps_empty_cell_rows() {
        let table = read_table_from_str(
            "Description,Amount,Notes\n\nZomato,890\n,,\nRent,25000,monthly,extra\n",
            "ragged.csv",
        )
        .unwrap();

        assert_eq!(table.len(), 3);
        assert!(!table.rows()[0].contains_key("Notes"));
        assert_eq!(table.rows()[1]["Amount"], "");
        assert_eq!(table.rows()[2]["Notes"], "monthly");
        assert_eq!(table.rows()[2].len(), 3);
    }

    #[test]
    fn test_quoted_fields_keep_commas() {
        let table = read_table_from_str(
            "Description,Amount\n\"Rent, December\",\"25,000\"\n",
            "quoted.csv",
        )
        .unwrap();
        assert_eq!(table.rows()[0]["Description"], "Rent, December");
        assert_eq!(table.rows()[0]["Amount"], "25,000");
    }

    #[test]
    fn test_load_table_from_disk_uses_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("december.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "Description,Amount").unwrap();
        writeln!(file, "Netflix,649").unwrap();

        let table = load_table(&path).unwrap();
        assert_eq!(table.source_name(), "december.csv");
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_load_table_rejects_wrong_extension_before_reading() {
        let err = load_table(Path::new("/definitely/missing/file.txt")).unwrap_err();
        assert!(matches!(err, FinanceBuddyError::InvalidFileType(_)));
    }

    #[test]
    fn test_invalid_utf8_is_a_parse_error() {
        let bytes: &[u8] = b"Description,Amount\n\xff\xfe,10\n";
        let err = read_table(bytes, "bad.csv").unwrap_err();
        assert!(matches!(err, FinanceBuddyError::CsvParse(_)));
    }
}
