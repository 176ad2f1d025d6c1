use std::path::{Path, PathBuf};

use timesheet_core::{FileCandidate, TimesheetEntry, TimesheetField};

pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const REPORT_BYTES: &[u8] = b"PK\x03\x04timesheet-report";
pub const PDF_BYTES: &[u8] = b"%PDF-1.7 invoice";

pub const MIB: usize = 1024 * 1024;

/// A fully filled-in entry for 09:00-17:30 (8.5 hours).
pub fn complete_entry() -> TimesheetEntry {
    let mut entry = TimesheetEntry::new();
    for (field, value) in [
        (TimesheetField::EmployeeId, "E-107"),
        (TimesheetField::Name, "Jordan Lee"),
        (TimesheetField::Date, "2024-03-15"),
        (TimesheetField::ClockIn, "09:00"),
        (TimesheetField::ClockOut, "17:30"),
        (TimesheetField::Project, "Harbor Renovation"),
        (TimesheetField::TaskDescription, "Site survey and measurements"),
    ] {
        entry.set(field, value).unwrap();
    }
    entry
}

pub fn spreadsheet(name: &str, size: usize) -> FileCandidate {
    FileCandidate::new(name, vec![7u8; size])
}

/// Write a file of `size` bytes into `dir` and return its path.
pub fn write_file(dir: &Path, name: &str, size: usize) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, vec![1u8; size]).unwrap();
    path
}
