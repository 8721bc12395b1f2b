//! Task list export to CSV and JSON.

use chrono::NaiveDate;
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{ConsoleError, ConsoleResult};
use crate::models::{Choice, Task};

/// First line of every CSV export
pub const CSV_HEADER: &str =
    "Task Name,Description,Efforts (Hours),Priority,Status,Assignee,Created Date";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    /// Renders the tasks in this format
    pub fn render(&self, tasks: &[&Task]) -> ConsoleResult<String> {
        match self {
            ExportFormat::Csv => Ok(tasks_csv(tasks)),
            ExportFormat::Json => tasks_json(tasks),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ConsoleError;

    fn from_str(s: &str) -> ConsoleResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(ConsoleError::invalid_value("export format", s)),
        }
    }
}

/// Wraps a cell in double quotes, doubling any quotes inside it
fn quote(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}

/// Renders tasks as CSV: the header, then one fully quoted row per task
pub fn tasks_csv(tasks: &[&Task]) -> String {
    let mut lines = Vec::with_capacity(tasks.len() + 1);
    lines.push(CSV_HEADER.to_string());
    for task in tasks {
        let cells = [
            task.name.clone(),
            task.description.clone(),
            task.efforts.to_string(),
            task.priority.as_str().to_string(),
            task.status.as_str().to_string(),
            task.assignee.clone(),
            task.created_at.format("%Y-%m-%d").to_string(),
        ];
        let row: Vec<String> = cells.iter().map(|c| quote(c)).collect();
        lines.push(row.join(","));
    }
    lines.join("\n")
}

/// Renders tasks as a pretty-printed JSON array
pub fn tasks_json(tasks: &[&Task]) -> ConsoleResult<String> {
    Ok(serde_json::to_string_pretty(tasks)?)
}

/// File name of an export made on `date`, e.g. `tasks-2024-01-15.csv`
pub fn export_file_name(date: NaiveDate, format: ExportFormat) -> String {
    format!("tasks-{}.{}", date.format("%Y-%m-%d"), format.extension())
}

/// Writes the export to `path` and returns the path written
pub fn write_tasks(tasks: &[&Task], format: ExportFormat, path: &Path) -> ConsoleResult<PathBuf> {
    let content = format.render(tasks)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    info!("Exported {} tasks to {}", tasks.len(), path.display());
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RecordId, TaskPriority, TaskStatus};
    use crate::seed;
    use tempfile::tempdir;

    /// Splits one CSV line of fully quoted cells
    fn parse_row(line: &str) -> Vec<String> {
        let mut cells = Vec::new();
        let mut cell = String::new();
        let mut in_quotes = false;
        let mut chars = line.chars().peekable();
        while let Some(c) = chars.next() {
            match (c, in_quotes) {
                ('"', true) if chars.peek() == Some(&'"') => {
                    cell.push('"');
                    chars.next();
                }
                ('"', _) => in_quotes = !in_quotes,
                (',', false) => cells.push(std::mem::take(&mut cell)),
                _ => cell.push(c),
            }
        }
        cells.push(cell);
        cells
    }

    #[test]
    fn test_csv_layout() {
        let tasks = seed::tasks();
        let view: Vec<&Task> = tasks.iter().take(1).collect();
        let csv = tasks_csv(&view);
        assert_eq!(
            csv,
            "Task Name,Description,Efforts (Hours),Priority,Status,Assignee,Created Date\n\
             \"Design User Login Page\",\"Create wireframes and mockups for the user login interface\",\
             \"8\",\"high\",\"completed\",\"Jane Smith\",\"2024-01-10\""
        );
    }

    #[test]
    fn test_csv_empty_view_is_header_only() {
        assert_eq!(tasks_csv(&[]), CSV_HEADER);
    }

    #[test]
    fn test_csv_round_trip() {
        let mut tasks = seed::tasks();
        tasks[1].description = "Say \"hello\", then leave".to_string();
        tasks[2].efforts = 2.5;
        let view: Vec<&Task> = tasks
            .iter()
            .filter(|t| t.status != TaskStatus::Completed)
            .collect();

        let csv = tasks_csv(&view);
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some(CSV_HEADER));

        let rows: Vec<Vec<String>> = lines.map(parse_row).collect();
        assert_eq!(rows.len(), view.len());
        for (row, task) in rows.iter().zip(&view) {
            assert_eq!(row[0], task.name);
            assert_eq!(row[1], task.description);
            assert_eq!(row[2].parse::<f64>().unwrap(), task.efforts);
            assert_eq!(row[3].parse::<TaskPriority>().unwrap(), task.priority);
            assert_eq!(row[4].parse::<TaskStatus>().unwrap(), task.status);
            assert_eq!(row[5], task.assignee);
            assert_eq!(row[6], task.created_at.to_string());
        }
    }

    #[test]
    fn test_json_export() {
        let tasks = seed::tasks();
        let view: Vec<&Task> = tasks.iter().collect();
        let json = tasks_json(&view).unwrap();
        let parsed: Vec<Task> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, tasks);
        assert!(json.contains("\"in-progress\""));
    }

    #[test]
    fn test_export_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(export_file_name(date, ExportFormat::Csv), "tasks-2024-01-15.csv");
        assert_eq!(export_file_name(date, ExportFormat::Json), "tasks-2024-01-15.json");
    }

    #[test]
    fn test_export_format_parse() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert!("xlsx".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_write_tasks() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out").join("tasks.csv");
        let tasks = seed::tasks();
        let view: Vec<&Task> = tasks.iter().filter(|t| t.id == RecordId(2)).collect();

        let written = write_tasks(&view, ExportFormat::Csv, &path).unwrap();
        assert_eq!(written, path);
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.contains("\"Implement Authentication API\""));
    }
}
