use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ConsoleError, ConsoleResult};

/// Identity of a record within its store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = ConsoleError;

    fn from_str(s: &str) -> ConsoleResult<Self> {
        s.trim()
            .parse::<u64>()
            .map(RecordId)
            .map_err(|_| ConsoleError::invalid_value("id", s))
    }
}

/// The kinds of records managed by the console
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    User,
    Role,
    Project,
    Sprint,
    Task,
}

impl EntityKind {
    /// Lowercase noun used in prompts and messages ("user", "task", ...)
    pub fn noun(&self) -> &'static str {
        match self {
            EntityKind::User => "user",
            EntityKind::Role => "role",
            EntityKind::Project => "project",
            EntityKind::Sprint => "sprint",
            EntityKind::Task => "task",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::User => write!(f, "User"),
            EntityKind::Role => write!(f, "Role"),
            EntityKind::Project => write!(f, "Project"),
            EntityKind::Sprint => write!(f, "Sprint"),
            EntityKind::Task => write!(f, "Task"),
        }
    }
}

/// A closed set of values offered as a select box.
///
/// `as_str` is the stable wire value (used in filters, exports and the
/// command line), `label` the human-facing text.
pub trait Choice: Copy + PartialEq + 'static {
    const WHAT: &'static str;
    const ALL: &'static [Self];

    fn as_str(&self) -> &'static str;
    fn label(&self) -> &'static str;
}

/// Parses a choice from its wire value or its label, ignoring case
pub fn parse_choice<T: Choice>(s: &str) -> ConsoleResult<T> {
    let needle = s.trim().to_lowercase();
    T::ALL
        .iter()
        .copied()
        .find(|c| c.as_str() == needle || c.label().to_lowercase() == needle)
        .ok_or_else(|| ConsoleError::invalid_value(T::WHAT, s))
}

/// Account status of a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
}

impl Choice for UserStatus {
    const WHAT: &'static str = "user status";
    const ALL: &'static [Self] = &[UserStatus::Active, UserStatus::Inactive];

    fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Inactive => "inactive",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            UserStatus::Active => "Active",
            UserStatus::Inactive => "Inactive",
        }
    }
}

/// Delivery status of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    #[default]
    Active,
    Completed,
    OnHold,
}

impl Choice for ProjectStatus {
    const WHAT: &'static str = "project status";
    const ALL: &'static [Self] = &[
        ProjectStatus::Active,
        ProjectStatus::Completed,
        ProjectStatus::OnHold,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Completed => "completed",
            ProjectStatus::OnHold => "on-hold",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "Active",
            ProjectStatus::Completed => "Completed",
            ProjectStatus::OnHold => "On Hold",
        }
    }
}

/// Billing/progress status of a sprint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SprintStatus {
    Active,
    OnHold,
    PendingApproval,
    #[default]
    InQueue,
    PendingDues,
    Invoiced,
}

impl Choice for SprintStatus {
    const WHAT: &'static str = "sprint status";
    const ALL: &'static [Self] = &[
        SprintStatus::Active,
        SprintStatus::OnHold,
        SprintStatus::PendingApproval,
        SprintStatus::InQueue,
        SprintStatus::PendingDues,
        SprintStatus::Invoiced,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            SprintStatus::Active => "active",
            SprintStatus::OnHold => "on-hold",
            SprintStatus::PendingApproval => "pending-approval",
            SprintStatus::InQueue => "in-queue",
            SprintStatus::PendingDues => "pending-dues",
            SprintStatus::Invoiced => "invoiced",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            SprintStatus::Active => "Active",
            SprintStatus::OnHold => "On Hold",
            SprintStatus::PendingApproval => "Pending Approval",
            SprintStatus::InQueue => "In Queue",
            SprintStatus::PendingDues => "Pending Dues",
            SprintStatus::Invoiced => "Invoiced",
        }
    }
}

/// Priority of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl Choice for TaskPriority {
    const WHAT: &'static str = "priority";
    const ALL: &'static [Self] = &[TaskPriority::Low, TaskPriority::Medium, TaskPriority::High];

    fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            TaskPriority::Low => "Low",
            TaskPriority::Medium => "Medium",
            TaskPriority::High => "High",
        }
    }
}

/// Workflow status of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Completed,
}

impl Choice for TaskStatus {
    const WHAT: &'static str = "task status";
    const ALL: &'static [Self] = &[TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Completed];

    fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
        }
    }
}

macro_rules! choice_display_and_parse {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self.label())
                }
            }

            impl FromStr for $ty {
                type Err = ConsoleError;

                fn from_str(s: &str) -> ConsoleResult<Self> {
                    parse_choice(s)
                }
            }
        )*
    };
}

choice_display_and_parse!(UserStatus, ProjectStatus, SprintStatus, TaskPriority, TaskStatus);

/// A console user account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub phone: String,
    /// One of [`crate::catalog::ROLE_OPTIONS`]
    pub role: String,
    pub status: UserStatus,
    /// Free-form last login stamp; "Never" for accounts created in this session
    pub last_login: String,
}

/// A named bundle of permissions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub id: RecordId,
    pub name: String,
    pub description: String,
    /// Permission ids in the order they were granted
    pub permissions: Vec<String>,
    pub user_count: u32,
}

/// A client project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: RecordId,
    pub name: String,
    pub client_name: String,
    pub contact_number: String,
    /// Emoji or short text shown next to the name
    pub logo: String,
    pub status: ProjectStatus,
    pub created_at: NaiveDate,
}

/// A time-boxed iteration of a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sprint {
    pub id: RecordId,
    pub name: String,
    pub project_id: RecordId,
    /// Snapshot of the project's name taken when the sprint was saved.
    /// Later project renames do not update it.
    pub project_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: SprintStatus,
    pub comments: String,
    /// Attachment labels; no file content is stored
    pub attachments: Vec<String>,
}

/// A unit of work with an effort estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: RecordId,
    pub name: String,
    pub description: String,
    /// Estimated effort in hours
    pub efforts: f64,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub assignee: String,
    pub created_at: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_choice_accepts_value_and_label() {
        assert_eq!(parse_choice::<SprintStatus>("on-hold").unwrap(), SprintStatus::OnHold);
        assert_eq!(
            parse_choice::<SprintStatus>("Pending Approval").unwrap(),
            SprintStatus::PendingApproval
        );
        assert_eq!("IN-PROGRESS".parse::<TaskStatus>().unwrap(), TaskStatus::InProgress);
        assert_eq!("to do".parse::<TaskStatus>().unwrap(), TaskStatus::Todo);
    }

    #[test]
    fn test_parse_choice_rejects_unknown() {
        let err = "urgent".parse::<TaskPriority>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid priority: urgent");
    }

    #[test]
    fn test_choice_defaults_match_blank_forms() {
        assert_eq!(UserStatus::default(), UserStatus::Active);
        assert_eq!(ProjectStatus::default(), ProjectStatus::Active);
        assert_eq!(SprintStatus::default(), SprintStatus::InQueue);
        assert_eq!(TaskPriority::default(), TaskPriority::Medium);
        assert_eq!(TaskStatus::default(), TaskStatus::Todo);
    }

    #[test]
    fn test_serde_uses_wire_values() {
        let json = serde_json::to_string(&SprintStatus::PendingDues).unwrap();
        assert_eq!(json, "\"pending-dues\"");
        let json = serde_json::to_string(&RecordId(42)).unwrap();
        assert_eq!(json, "42");
    }

    #[test]
    fn test_record_id_parse() {
        assert_eq!(" 7 ".parse::<RecordId>().unwrap(), RecordId(7));
        assert!("seven".parse::<RecordId>().is_err());
    }
}
