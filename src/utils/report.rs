// src/utils/report.rs

use chrono::NaiveDate;
use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::{
    error::AppError,
    scoring::{RankedResult, ResultSummary},
};

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const SHEET_NAME: &str = "Exam Results";

const TABLE_HEADERS: [&str; 9] = [
    "No", "NISN", "Name", "Class", "Score", "Correct", "Wrong", "Grade", "Rank",
];
const COLUMN_WIDTHS: [f64; 9] = [5.0, 15.0, 25.0, 10.0, 8.0, 8.0, 8.0, 10.0, 8.0];

/// Row (0-based) of the results table header.
pub const TABLE_HEADER_ROW: u32 = 13;

/// Exam details printed above the results table.
#[derive(Debug)]
pub struct ReportHeader<'a> {
    pub code: &'a str,
    pub title: &'a str,
    pub teacher_name: &'a str,
    pub generated_on: NaiveDate,
}

pub fn export_file_name(code: &str, date: NaiveDate) -> String {
    format!("Exam_Results_{}_{}.xlsx", code, date.format("%Y-%m-%d"))
}

/// Renders an exam's ranked results into an in-memory .xlsx file.
///
/// Layout: report title, exam details, a statistics block, then one row per
/// result in ranking order.
pub fn build_results_workbook(
    header: &ReportHeader<'_>,
    summary: &ResultSummary,
    results: &[RankedResult],
) -> Result<Vec<u8>, AppError> {
    let bold = Format::new().set_bold();
    let mut sheet = Worksheet::new();
    sheet.set_name(SHEET_NAME)?;

    sheet.write_string_with_format(0, 0, "EXAM RESULTS REPORT", &bold)?;

    write_label(&mut sheet, 2, "Exam Code:", header.code)?;
    write_label(&mut sheet, 3, "Exam Title:", header.title)?;
    write_label(&mut sheet, 4, "Teacher:", header.teacher_name)?;
    let date = header.generated_on.format("%d/%m/%Y").to_string();
    write_label(&mut sheet, 5, "Date:", &date)?;

    sheet.write_string_with_format(7, 0, "STATISTICS", &bold)?;
    let stats = [
        ("Participants:", summary.participants as f64),
        ("Average:", summary.average_score as f64),
        ("Highest:", summary.highest_score as f64),
        ("Lowest:", summary.lowest_score as f64),
    ];
    for (offset, (label, value)) in stats.iter().enumerate() {
        let row = 8 + offset as u32;
        sheet.write_string(row, 0, *label)?;
        sheet.write_number(row, 1, *value)?;
    }

    for (col, title) in TABLE_HEADERS.iter().enumerate() {
        sheet.write_string_with_format(TABLE_HEADER_ROW, col as u16, *title, &bold)?;
    }

    for (i, ranked) in results.iter().enumerate() {
        let row = TABLE_HEADER_ROW + 1 + i as u32;
        let r = &ranked.result;

        sheet.write_number(row, 0, ranked.rank as f64)?;
        sheet.write_string(row, 1, &r.nisn)?;
        sheet.write_string(row, 2, &r.student_name)?;
        sheet.write_string(row, 3, &r.student_class)?;
        sheet.write_number(row, 4, r.score)?;
        sheet.write_number(row, 5, r.correct_answers)?;
        sheet.write_number(row, 6, ranked.wrong_answers)?;
        sheet.write_string(row, 7, ranked.grade.as_str())?;
        sheet.write_number(row, 8, ranked.rank as f64)?;
    }

    for (col, width) in COLUMN_WIDTHS.iter().enumerate() {
        sheet.set_column_width(col as u16, *width)?;
    }

    let mut workbook = Workbook::new();
    workbook.push_worksheet(sheet);

    Ok(workbook.save_to_buffer()?)
}

fn write_label(sheet: &mut Worksheet, row: u32, label: &str, value: &str) -> Result<(), AppError> {
    sheet.write_string(row, 0, label)?;
    sheet.write_string(row, 1, value)?;
    Ok(())
}
