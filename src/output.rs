//! Schedule output.
//!
//! Writes a finished [`Schedule`] as CSV (one row per assignment) or as JSON
//! (the whole run, including shortfalls and risk warnings). The format is
//! chosen by file extension.

use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate, NaiveDateTime, Weekday};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{SchedulerError, SchedulerResult};
use crate::models::{Period, Schedule, StaffId};

const CSV_HEADER: [&str; 7] = ["date", "weekday", "period", "staff_id", "name", "group", "busy"];

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// One row per assignment.
    Csv,
    /// The whole [`Schedule`] as pretty-printed JSON.
    Json,
}

impl OutputFormat {
    /// Picks the format from a path's extension; anything but `.json` is CSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => OutputFormat::Json,
            _ => OutputFormat::Csv,
        }
    }
}

#[derive(Serialize)]
struct CsvRow<'a> {
    date: NaiveDate,
    weekday: Weekday,
    period: Period,
    staff_id: StaffId,
    name: &'a str,
    group: &'a str,
    busy: bool,
}

/// Writes schedules to disk.
///
/// # Example
///
/// ```no_run
/// use front_desk_scheduler::output::ScheduleWriter;
/// # fn demo(schedule: &front_desk_scheduler::models::Schedule) {
/// let written = ScheduleWriter::write(schedule, "./output/schedule.csv").unwrap();
/// println!("Schedule written to {}", written.display());
/// # }
/// ```
pub struct ScheduleWriter;

impl ScheduleWriter {
    /// Writes a schedule and returns the path actually written.
    ///
    /// Parent directories are created as needed. If the target cannot be
    /// written because of permissions or a Windows sharing violation
    /// (typically a file held open by another program), a timestamped
    /// sibling is written instead.
    pub fn write<P: AsRef<Path>>(schedule: &Schedule, path: P) -> SchedulerResult<PathBuf> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| write_error(parent, e.to_string()))?;
        }

        let bytes = Self::render(schedule, OutputFormat::from_path(path))?;

        let written = match fs::write(path, &bytes) {
            Ok(()) => path.to_path_buf(),
            Err(e) if is_locked(&e) => {
                let fallback = fallback_path(path, Local::now().naive_local());
                warn!(
                    path = %path.display(),
                    fallback = %fallback.display(),
                    "Output file locked or not writable, writing to fallback path"
                );
                fs::write(&fallback, &bytes).map_err(|e| write_error(&fallback, e.to_string()))?;
                fallback
            }
            Err(e) => return Err(write_error(path, e.to_string())),
        };

        info!(
            path = %written.display(),
            assignments = schedule.assignments.len(),
            "Schedule written"
        );
        Ok(written)
    }

    /// Renders a schedule in the given format.
    pub fn render(schedule: &Schedule, format: OutputFormat) -> SchedulerResult<Vec<u8>> {
        match format {
            OutputFormat::Json => serde_json::to_vec_pretty(schedule)
                .map_err(|e| write_error(Path::new("<json>"), e.to_string())),
            OutputFormat::Csv => render_csv(schedule),
        }
    }
}

fn render_csv(schedule: &Schedule) -> SchedulerResult<Vec<u8>> {
    let csv_error = |message: String| write_error(Path::new("<csv>"), message);

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer
        .write_record(CSV_HEADER)
        .map_err(|e| csv_error(e.to_string()))?;
    for a in &schedule.assignments {
        writer
            .serialize(CsvRow {
                date: a.date,
                weekday: a.weekday,
                period: a.period,
                staff_id: a.staff_id,
                name: &a.name,
                group: &a.group,
                busy: a.busy,
            })
            .map_err(|e| csv_error(e.to_string()))?;
    }
    writer.into_inner().map_err(|e| csv_error(e.to_string()))
}

/// Windows `ERROR_SHARING_VIOLATION`, raised for a file open in another program.
const SHARING_VIOLATION: i32 = 32;

/// True when the target exists but another program holds it.
fn is_locked(err: &io::Error) -> bool {
    err.kind() == ErrorKind::PermissionDenied
        || (cfg!(windows) && err.raw_os_error() == Some(SHARING_VIOLATION))
}

/// Builds `<stem>_<YYYYMMDD_HHMMSS>.<ext>` next to `path`.
fn fallback_path(path: &Path, now: NaiveDateTime) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "schedule".to_string());
    let mut name = format!("{stem}_{}", now.format("%Y%m%d_%H%M%S"));
    if let Some(ext) = path.extension() {
        name.push('.');
        name.push_str(&ext.to_string_lossy());
    }
    path.with_file_name(name)
}

fn write_error(path: &Path, message: String) -> SchedulerError {
    SchedulerError::OutputWriteError {
        path: path.display().to_string(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Utc};
    use uuid::Uuid;

    use crate::models::{Assignment, Shortfall, SolveStatus};

    fn create_schedule(names: &[&str]) -> Schedule {
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        Schedule {
            run_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            status: SolveStatus::Optimal,
            objective_value: 1000.0,
            assignments: names
                .iter()
                .enumerate()
                .map(|(i, name)| Assignment {
                    date,
                    weekday: date.weekday(),
                    period: Period::Am,
                    staff_id: i as StaffId + 1,
                    name: name.to_string(),
                    group: "A".to_string(),
                    busy: true,
                })
                .collect(),
            shortfalls: vec![Shortfall {
                date,
                period: Period::Pm,
                missing: 1,
            }],
            risk_warnings: vec![],
            duration_ms: 5,
        }
    }

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("fds-output-{}", Uuid::new_v4()))
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(OutputFormat::from_path(Path::new("a/b.json")), OutputFormat::Json);
        assert_eq!(OutputFormat::from_path(Path::new("a/b.JSON")), OutputFormat::Json);
        assert_eq!(OutputFormat::from_path(Path::new("a/b.csv")), OutputFormat::Csv);
        assert_eq!(OutputFormat::from_path(Path::new("a/b")), OutputFormat::Csv);
    }

    #[test]
    fn test_csv_rows() {
        let bytes = ScheduleWriter::render(&create_schedule(&["Aoki"]), OutputFormat::Csv).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "date,weekday,period,staff_id,name,group,busy");
        assert_eq!(lines[1], "2026-01-05,Mon,AM,1,Aoki,A,true");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_csv_quotes_fields_when_needed() {
        let bytes = ScheduleWriter::render(
            &create_schedule(&["Aoki, Jr.", "say \"hi\""]),
            OutputFormat::Csv,
        )
        .unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.contains("\"Aoki, Jr.\""));
        assert!(text.contains("\"say \"\"hi\"\"\""));
    }

    #[test]
    fn test_csv_header_written_for_empty_schedule() {
        let bytes = ScheduleWriter::render(&create_schedule(&[]), OutputFormat::Csv).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "date,weekday,period,staff_id,name,group,busy\n"
        );
    }

    #[test]
    fn test_json_contains_whole_schedule() {
        let schedule = create_schedule(&["Aoki"]);
        let bytes = ScheduleWriter::render(&schedule, OutputFormat::Json).unwrap();

        let parsed: Schedule = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed.run_id, schedule.run_id);
        assert_eq!(parsed.shortfalls, schedule.shortfalls);
        assert_eq!(parsed.status, SolveStatus::Optimal);
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let dir = scratch_dir();
        let target = dir.join("nested").join("schedule.csv");

        let written = ScheduleWriter::write(&create_schedule(&["Aoki"]), &target).unwrap();

        assert_eq!(written, target);
        assert!(fs::read_to_string(&target).unwrap().starts_with("date,"));

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_fallback_path_naming() {
        let now = NaiveDate::from_ymd_opt(2026, 1, 5)
            .unwrap()
            .and_hms_opt(9, 3, 7)
            .unwrap();

        assert_eq!(
            fallback_path(Path::new("out/schedule.csv"), now),
            PathBuf::from("out/schedule_20260105_090307.csv")
        );
        assert_eq!(
            fallback_path(Path::new("schedule"), now),
            PathBuf::from("schedule_20260105_090307")
        );
    }

    #[test]
    fn test_permission_denied_triggers_fallback() {
        assert!(is_locked(&io::Error::from(ErrorKind::PermissionDenied)));
        assert!(!is_locked(&io::Error::from(ErrorKind::NotFound)));
    }

    #[test]
    #[cfg(windows)]
    fn test_sharing_violation_triggers_fallback() {
        assert!(is_locked(&io::Error::from_raw_os_error(SHARING_VIOLATION)));
    }

    #[test]
    #[cfg(not(windows))]
    fn test_os_error_32_is_not_a_lock_elsewhere() {
        // EPIPE on unix
        assert!(!is_locked(&io::Error::from_raw_os_error(SHARING_VIOLATION)));
    }

    #[test]
    fn test_write_error_when_target_is_a_directory() {
        let dir = scratch_dir();
        fs::create_dir_all(&dir).unwrap();

        let result = ScheduleWriter::write(&create_schedule(&["Aoki"]), &dir);
        assert!(matches!(result, Err(SchedulerError::OutputWriteError { .. })));

        fs::remove_dir_all(dir).ok();
    }
}
