//! Typed form drafts for each entity and their validation rules.
//!
//! A form is what the editor holds between "open" and "submit". Every form
//! is validated before it reaches a store, so records in a store always
//! satisfy their schema.

use chrono::NaiveDate;
use std::fmt;

use crate::catalog::{ASSIGNEES, ROLE_OPTIONS};
use crate::error::{ConsoleError, ConsoleResult};
use crate::models::{
    EntityKind, ProjectStatus, RecordId, SprintStatus, TaskPriority, TaskStatus, UserStatus,
};

/// Smallest effort estimate a task accepts, also the estimate granularity
pub const EFFORT_STEP: f64 = 0.5;

/// Behaviour shared by every entity form
pub trait Form: Clone + Default + PartialEq + fmt::Debug {
    /// Checks required fields and value sets
    fn validate(&self) -> ConsoleResult<()>;
}

fn require(field: &'static str, value: &str) -> ConsoleResult<()> {
    if value.trim().is_empty() {
        return Err(ConsoleError::validation(field, "is required"));
    }
    Ok(())
}

fn require_option(field: &'static str, value: &str, options: &[&str]) -> ConsoleResult<()> {
    require(field, value)?;
    if !options.contains(&value) {
        return Err(ConsoleError::validation(
            field,
            format!("'{}' is not one of: {}", value, options.join(", ")),
        ));
    }
    Ok(())
}

fn looks_like_email(email: &str) -> bool {
    match email.trim().split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

/// Editable fields of a user
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: String,
    pub status: UserStatus,
}

impl Form for UserForm {
    fn validate(&self) -> ConsoleResult<()> {
        require("name", &self.name)?;
        require("email", &self.email)?;
        if !looks_like_email(&self.email) {
            return Err(ConsoleError::validation("email", "is not a valid email address"));
        }
        require("phone", &self.phone)?;
        require_option("role", &self.role, ROLE_OPTIONS)
    }
}

/// Editable fields of a role
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoleForm {
    pub name: String,
    pub description: String,
    pub permissions: Vec<String>,
}

impl RoleForm {
    /// Grants the permission if absent, otherwise revokes it.
    ///
    /// Ids are not checked against the catalog.
    pub fn toggle_permission(&mut self, id: &str) {
        if let Some(pos) = self.permissions.iter().position(|p| p == id) {
            self.permissions.remove(pos);
        } else {
            self.permissions.push(id.to_string());
        }
    }

    pub fn has_permission(&self, id: &str) -> bool {
        self.permissions.iter().any(|p| p == id)
    }
}

impl Form for RoleForm {
    fn validate(&self) -> ConsoleResult<()> {
        require("name", &self.name)?;
        require("description", &self.description)
    }
}

/// Editable fields of a project
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectForm {
    pub name: String,
    pub client_name: String,
    pub contact_number: String,
    pub logo: String,
    pub status: ProjectStatus,
}

impl Form for ProjectForm {
    fn validate(&self) -> ConsoleResult<()> {
        require("name", &self.name)?;
        require("client name", &self.client_name)?;
        require("contact number", &self.contact_number)
    }
}

/// Editable fields of a sprint
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SprintForm {
    pub name: String,
    pub project_id: Option<RecordId>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: SprintStatus,
    pub comments: String,
    pub attachments: Vec<String>,
}

impl SprintForm {
    /// Appends a trimmed attachment label. Blank labels are ignored.
    ///
    /// Returns whether the label was added.
    pub fn add_attachment(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        self.attachments.push(name.to_string());
        true
    }

    /// Removes the attachment at `index`; out of range is a no-op
    pub fn remove_attachment(&mut self, index: usize) -> Option<String> {
        if index < self.attachments.len() {
            Some(self.attachments.remove(index))
        } else {
            None
        }
    }

    /// The fields a saved sprint cannot do without
    pub(crate) fn required_fields(&self) -> ConsoleResult<(RecordId, NaiveDate, NaiveDate)> {
        let project_id = self
            .project_id
            .ok_or_else(|| ConsoleError::validation("project", "is required"))?;
        let start = self
            .start_date
            .ok_or_else(|| ConsoleError::validation("start date", "is required"))?;
        let end = self
            .end_date
            .ok_or_else(|| ConsoleError::validation("end date", "is required"))?;
        Ok((project_id, start, end))
    }
}

impl Form for SprintForm {
    fn validate(&self) -> ConsoleResult<()> {
        require("name", &self.name)?;
        let (_, start, end) = self.required_fields()?;
        if end < start {
            return Err(ConsoleError::validation(
                "end date",
                format!("{} is before the start date {}", end, start),
            ));
        }
        Ok(())
    }
}

/// Editable fields of a task
#[derive(Debug, Clone, PartialEq)]
pub struct TaskForm {
    pub name: String,
    pub description: String,
    pub efforts: f64,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub assignee: String,
}

impl Default for TaskForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            efforts: 1.0,
            priority: TaskPriority::Medium,
            status: TaskStatus::Todo,
            assignee: String::new(),
        }
    }
}

impl Form for TaskForm {
    fn validate(&self) -> ConsoleResult<()> {
        require("name", &self.name)?;
        require("description", &self.description)?;
        let steps = self.efforts / EFFORT_STEP;
        if !self.efforts.is_finite() || self.efforts < EFFORT_STEP || steps.fract() != 0.0 {
            return Err(ConsoleError::validation(
                "efforts",
                format!("must be at least {} hours in steps of {}", EFFORT_STEP, EFFORT_STEP),
            ));
        }
        require_option("assignee", &self.assignee, ASSIGNEES)
    }
}

/// A form of any entity kind, for front ends that pick the screen at runtime
#[derive(Debug, Clone, PartialEq)]
pub enum Draft {
    User(UserForm),
    Role(RoleForm),
    Project(ProjectForm),
    Sprint(SprintForm),
    Task(TaskForm),
}

impl Draft {
    /// A blank form for the given kind
    pub fn blank(kind: EntityKind) -> Self {
        match kind {
            EntityKind::User => Draft::User(UserForm::default()),
            EntityKind::Role => Draft::Role(RoleForm::default()),
            EntityKind::Project => Draft::Project(ProjectForm::default()),
            EntityKind::Sprint => Draft::Sprint(SprintForm::default()),
            EntityKind::Task => Draft::Task(TaskForm::default()),
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Draft::User(_) => EntityKind::User,
            Draft::Role(_) => EntityKind::Role,
            Draft::Project(_) => EntityKind::Project,
            Draft::Sprint(_) => EntityKind::Sprint,
            Draft::Task(_) => EntityKind::Task,
        }
    }

    pub fn validate(&self) -> ConsoleResult<()> {
        match self {
            Draft::User(form) => form.validate(),
            Draft::Role(form) => form.validate(),
            Draft::Project(form) => form.validate(),
            Draft::Sprint(form) => form.validate(),
            Draft::Task(form) => form.validate(),
        }
    }
}
