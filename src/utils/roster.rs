// src/utils/roster.rs

use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};

use crate::{error::AppError, utils::validation::validate_nisn};

const NISN_HEADERS: &[&str] = &["nisn", "no. induk", "no induk"];
const NAME_HEADERS: &[&str] = &["nama", "nama siswa", "siswa", "name"];
const CLASS_HEADERS: &[&str] = &["kelas", "class"];

/// One usable roster line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    /// 1-based index among data rows (the header row is not counted).
    pub row: usize,
    pub nisn: String,
    pub name: String,
    pub class: String,
}

#[derive(Debug, Default)]
pub struct ParsedRoster {
    pub entries: Vec<RosterEntry>,
    /// Human-readable problems with individual rows; those rows are skipped.
    pub errors: Vec<String>,
}

/// Reads the first worksheet of an .xlsx upload into roster entries.
pub fn parse_roster(bytes: &[u8]) -> Result<ParsedRoster, AppError> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::BadRequest("Spreadsheet has no worksheets".to_string()))??;

    let rows: Vec<Vec<String>> = range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect();

    parse_rows(rows)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        // NISNs typed as numbers come back as floats.
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        other => other.to_string().trim().to_string(),
    }
}

fn find_column(headers: &[String], aliases: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| aliases.contains(&h.trim().to_lowercase().as_str()))
}

/// Maps header-first rows to roster entries.
///
/// Header names are matched case-insensitively against known aliases. Rows
/// that are entirely blank are skipped silently; rows with a missing field
/// or a malformed NISN are reported in `errors`.
pub fn parse_rows(rows: Vec<Vec<String>>) -> Result<ParsedRoster, AppError> {
    let mut rows = rows.into_iter();
    let headers = rows
        .next()
        .ok_or_else(|| AppError::BadRequest("Spreadsheet is empty".to_string()))?;

    let (Some(nisn_col), Some(name_col), Some(class_col)) = (
        find_column(&headers, NISN_HEADERS),
        find_column(&headers, NAME_HEADERS),
        find_column(&headers, CLASS_HEADERS),
    ) else {
        return Err(AppError::BadRequest(
            "Spreadsheet must have NISN, Nama and Kelas columns in the first row".to_string(),
        ));
    };

    let mut parsed = ParsedRoster::default();

    for (i, row) in rows.enumerate() {
        let row_number = i + 1;

        if row.iter().all(|c| c.is_empty()) {
            continue;
        }

        let field = |col: usize| row.get(col).map(|s| s.trim()).unwrap_or_default().to_string();
        let (nisn, name, class) = (field(nisn_col), field(name_col), field(class_col));

        if nisn.is_empty() || name.is_empty() || class.is_empty() {
            parsed.errors.push(format!(
                "Row {}: Missing required fields (NISN, Nama, Kelas)",
                row_number
            ));
            continue;
        }

        if validate_nisn(&nisn).is_err() {
            parsed
                .errors
                .push(format!("Row {}: Invalid NISN '{}'", row_number, nisn));
            continue;
        }

        parsed.entries.push(RosterEntry {
            row: row_number,
            nisn,
            name,
            class,
        });
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_parses_standard_headers() {
        let parsed = parse_rows(rows(&[
            &["NISN", "Nama", "Kelas"],
            &["0051234567", "Andi Saputra", "XII IPA 1"],
            &["0051234568", "Budi Santoso", "XII IPA 2"],
        ]))
        .unwrap();

        assert!(parsed.errors.is_empty());
        assert_eq!(parsed.entries.len(), 2);
        assert_eq!(
            parsed.entries[0],
            RosterEntry {
                row: 1,
                nisn: "0051234567".to_string(),
                name: "Andi Saputra".to_string(),
                class: "XII IPA 1".to_string(),
            }
        );
    }

    #[test]
    fn test_header_aliases_are_case_insensitive() {
        let parsed = parse_rows(rows(&[
            &["No", "NO INDUK", "Nama Siswa", "CLASS"],
            &["1", "1001", "Citra", "X-1"],
        ]))
        .unwrap();

        assert_eq!(parsed.entries.len(), 1);
        assert_eq!(parsed.entries[0].nisn, "1001");
        assert_eq!(parsed.entries[0].name, "Citra");
        assert_eq!(parsed.entries[0].class, "X-1");
    }

    #[test]
    fn test_rows_missing_fields_are_reported() {
        let parsed = parse_rows(rows(&[
            &["nisn", "nama", "kelas"],
            &["1001", "", "X-1"],
            &["1002", "Dewi", "X-2"],
            &["1003", "Eka"],
        ]))
        .unwrap();

        assert_eq!(parsed.entries.len(), 1);
        assert_eq!(
            parsed.errors,
            vec![
                "Row 1: Missing required fields (NISN, Nama, Kelas)".to_string(),
                "Row 3: Missing required fields (NISN, Nama, Kelas)".to_string(),
            ]
        );
    }

    #[test]
    fn test_blank_rows_are_skipped() {
        let parsed = parse_rows(rows(&[
            &["NISN", "Nama", "Kelas"],
            &["", "", ""],
            &["1001", "Fajar", "XI"],
        ]))
        .unwrap();

        assert!(parsed.errors.is_empty());
        assert_eq!(parsed.entries[0].row, 2);
    }

    #[test]
    fn test_invalid_nisn_is_reported() {
        let parsed = parse_rows(rows(&[
            &["NISN", "Nama", "Kelas"],
            &["10 01", "Gita", "XI"],
        ]))
        .unwrap();

        assert!(parsed.entries.is_empty());
        assert_eq!(parsed.errors, vec!["Row 1: Invalid NISN '10 01'".to_string()]);
    }

    #[test]
    fn test_missing_columns_is_bad_request() {
        let result = parse_rows(rows(&[&["Nama", "Kelas"], &["Hadi", "XI"]]));
        assert!(matches!(result, Err(AppError::BadRequest(_))));

        let empty = parse_rows(Vec::new());
        assert!(matches!(empty, Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_reads_xlsx_bytes() {
        use rust_xlsxwriter::Workbook;

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "NISN").unwrap();
        sheet.write_string(0, 1, "Nama").unwrap();
        sheet.write_string(0, 2, "Kelas").unwrap();
        // Numeric NISN, as spreadsheets usually store it.
        sheet.write_number(1, 0, 51234567).unwrap();
        sheet.write_string(1, 1, " Indah Permata ").unwrap();
        sheet.write_string(1, 2, "XII IPS 1").unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let parsed = parse_roster(&bytes).unwrap();
        assert!(parsed.errors.is_empty());
        assert_eq!(parsed.entries.len(), 1);
        assert_eq!(parsed.entries[0].nisn, "51234567");
        assert_eq!(parsed.entries[0].name, "Indah Permata");
        assert_eq!(parsed.entries[0].class, "XII IPS 1");
    }

    #[test]
    fn test_rejects_non_spreadsheet_bytes() {
        assert!(matches!(
            parse_roster(b"NISN,Nama,Kelas\n1,A,B"),
            Err(AppError::BadRequest(_))
        ));
    }
}
