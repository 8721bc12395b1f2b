//! How each record type plugs into the shared list controller.

use chrono::NaiveDate;
use std::fmt;

use crate::error::ConsoleResult;
use crate::forms::{Form, ProjectForm, RoleForm, SprintForm, TaskForm, UserForm};
use crate::models::{
    EntityKind, Project, ProjectStatus, RecordId, Role, Sprint, SprintStatus, Task, TaskPriority,
    TaskStatus, User, UserStatus,
};
use crate::store::Filter;

/// Values a submit needs from outside the record being saved
#[derive(Debug, Clone)]
pub struct SubmitContext {
    /// Date stamped on newly created records
    pub today: NaiveDate,
    projects: Vec<(RecordId, String)>,
}

impl SubmitContext {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            projects: Vec::new(),
        }
    }

    /// Makes the given projects available for sprint name lookups
    pub fn with_projects(mut self, projects: &[Project]) -> Self {
        self.projects = projects.iter().map(|p| (p.id, p.name.clone())).collect();
        self
    }

    pub fn project_name(&self, id: RecordId) -> Option<&str> {
        self.projects
            .iter()
            .find(|(pid, _)| *pid == id)
            .map(|(_, name)| name.as_str())
    }
}

/// A record type managed by an [`crate::EntityList`]
pub trait Entity: Clone + fmt::Debug {
    const KIND: EntityKind;

    type Form: Form;
    type Filter: Clone + Default + fmt::Debug;

    fn id(&self) -> RecordId;

    /// Name used in messages and the activity log
    fn display_name(&self) -> &str;

    /// Text fields matched by free-text search
    fn search_fields(&self) -> Vec<&str>;

    /// Categorical filter check; a default filter matches everything
    fn matches_filter(&self, filter: &Self::Filter) -> bool;

    /// Copies the editable fields into a fresh form
    fn to_form(&self) -> Self::Form;

    /// Builds a new record from a validated form
    fn create(id: RecordId, form: Self::Form, ctx: &SubmitContext) -> ConsoleResult<Self>;

    /// Merges a validated form over this record, keeping fields the form lacks
    fn apply(&mut self, form: Self::Form, ctx: &SubmitContext) -> ConsoleResult<()>;
}

impl Entity for User {
    const KIND: EntityKind = EntityKind::User;

    type Form = UserForm;
    type Filter = UserFilter;

    fn id(&self) -> RecordId {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.email.as_str(), self.role.as_str()]
    }

    fn matches_filter(&self, filter: &UserFilter) -> bool {
        filter.status.matches(&self.status)
    }

    fn to_form(&self) -> UserForm {
        UserForm {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            role: self.role.clone(),
            status: self.status,
        }
    }

    fn create(id: RecordId, form: UserForm, _ctx: &SubmitContext) -> ConsoleResult<Self> {
        Ok(Self {
            id,
            name: form.name,
            email: form.email,
            phone: form.phone,
            role: form.role,
            status: form.status,
            last_login: "Never".to_string(),
        })
    }

    fn apply(&mut self, form: UserForm, _ctx: &SubmitContext) -> ConsoleResult<()> {
        self.name = form.name;
        self.email = form.email;
        self.phone = form.phone;
        self.role = form.role;
        self.status = form.status;
        Ok(())
    }
}

impl Entity for Role {
    const KIND: EntityKind = EntityKind::Role;

    type Form = RoleForm;
    type Filter = ();

    fn id(&self) -> RecordId {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.description.as_str()]
    }

    fn matches_filter(&self, _filter: &()) -> bool {
        true
    }

    fn to_form(&self) -> RoleForm {
        RoleForm {
            name: self.name.clone(),
            description: self.description.clone(),
            permissions: self.permissions.clone(),
        }
    }

    fn create(id: RecordId, form: RoleForm, _ctx: &SubmitContext) -> ConsoleResult<Self> {
        Ok(Self {
            id,
            name: form.name,
            description: form.description,
            permissions: form.permissions,
            user_count: 0,
        })
    }

    fn apply(&mut self, form: RoleForm, _ctx: &SubmitContext) -> ConsoleResult<()> {
        self.name = form.name;
        self.description = form.description;
        self.permissions = form.permissions;
        Ok(())
    }
}

impl Entity for Project {
    const KIND: EntityKind = EntityKind::Project;

    type Form = ProjectForm;
    type Filter = ProjectFilter;

    fn id(&self) -> RecordId {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.client_name.as_str()]
    }

    fn matches_filter(&self, filter: &ProjectFilter) -> bool {
        filter.status.matches(&self.status)
    }

    fn to_form(&self) -> ProjectForm {
        ProjectForm {
            name: self.name.clone(),
            client_name: self.client_name.clone(),
            contact_number: self.contact_number.clone(),
            logo: self.logo.clone(),
            status: self.status,
        }
    }

    fn create(id: RecordId, form: ProjectForm, ctx: &SubmitContext) -> ConsoleResult<Self> {
        Ok(Self {
            id,
            name: form.name,
            client_name: form.client_name,
            contact_number: form.contact_number,
            logo: form.logo,
            status: form.status,
            created_at: ctx.today,
        })
    }

    fn apply(&mut self, form: ProjectForm, _ctx: &SubmitContext) -> ConsoleResult<()> {
        self.name = form.name;
        self.client_name = form.client_name;
        self.contact_number = form.contact_number;
        self.logo = form.logo;
        self.status = form.status;
        Ok(())
    }
}

impl Entity for Sprint {
    const KIND: EntityKind = EntityKind::Sprint;

    type Form = SprintForm;
    type Filter = SprintFilter;

    fn id(&self) -> RecordId {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.project_name.as_str()]
    }

    fn matches_filter(&self, filter: &SprintFilter) -> bool {
        filter.status.matches(&self.status)
    }

    fn to_form(&self) -> SprintForm {
        SprintForm {
            name: self.name.clone(),
            project_id: Some(self.project_id),
            start_date: Some(self.start_date),
            end_date: Some(self.end_date),
            status: self.status,
            comments: self.comments.clone(),
            attachments: self.attachments.clone(),
        }
    }

    fn create(id: RecordId, form: SprintForm, ctx: &SubmitContext) -> ConsoleResult<Self> {
        let (project_id, start_date, end_date) = form.required_fields()?;
        Ok(Self {
            id,
            name: form.name,
            project_id,
            project_name: ctx.project_name(project_id).unwrap_or_default().to_string(),
            start_date,
            end_date,
            status: form.status,
            comments: form.comments,
            attachments: form.attachments,
        })
    }

    fn apply(&mut self, form: SprintForm, ctx: &SubmitContext) -> ConsoleResult<()> {
        let (project_id, start_date, end_date) = form.required_fields()?;
        // An unresolvable project keeps the previous snapshot
        if let Some(name) = ctx.project_name(project_id) {
            self.project_name = name.to_string();
        }
        self.name = form.name;
        self.project_id = project_id;
        self.start_date = start_date;
        self.end_date = end_date;
        self.status = form.status;
        self.comments = form.comments;
        self.attachments = form.attachments;
        Ok(())
    }
}

impl Entity for Task {
    const KIND: EntityKind = EntityKind::Task;

    type Form = TaskForm;
    type Filter = TaskFilter;

    fn id(&self) -> RecordId {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.description.as_str(), self.assignee.as_str()]
    }

    fn matches_filter(&self, filter: &TaskFilter) -> bool {
        filter.status.matches(&self.status) && filter.priority.matches(&self.priority)
    }

    fn to_form(&self) -> TaskForm {
        TaskForm {
            name: self.name.clone(),
            description: self.description.clone(),
            efforts: self.efforts,
            priority: self.priority,
            status: self.status,
            assignee: self.assignee.clone(),
        }
    }

    fn create(id: RecordId, form: TaskForm, ctx: &SubmitContext) -> ConsoleResult<Self> {
        Ok(Self {
            id,
            name: form.name,
            description: form.description,
            efforts: form.efforts,
            priority: form.priority,
            status: form.status,
            assignee: form.assignee,
            created_at: ctx.today,
        })
    }

    fn apply(&mut self, form: TaskForm, _ctx: &SubmitContext) -> ConsoleResult<()> {
        self.name = form.name;
        self.description = form.description;
        self.efforts = form.efforts;
        self.priority = form.priority;
        self.status = form.status;
        self.assignee = form.assignee;
        Ok(())
    }
}

/// Categorical filters of the users screen
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserFilter {
    pub status: Filter<UserStatus>,
}

/// Categorical filters of the projects screen
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectFilter {
    pub status: Filter<ProjectStatus>,
}

/// Categorical filters of the sprints screen
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SprintFilter {
    pub status: Filter<SprintStatus>,
}

/// Categorical filters of the tasks screen
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFilter {
    pub status: Filter<TaskStatus>,
    pub priority: Filter<TaskPriority>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[test]
    fn test_user_create_sets_never_logged_in() {
        let form = UserForm {
            name: "Tom Brown".to_string(),
            email: "tom.brown@company.com".to_string(),
            phone: "+1 234 567 8904".to_string(),
            role: "Developer".to_string(),
            status: UserStatus::Inactive,
        };
        let user = User::create(RecordId(9), form, &SubmitContext::new(today())).unwrap();
        assert_eq!(user.last_login, "Never");
        assert_eq!(user.status, UserStatus::Inactive);
    }

    #[test]
    fn test_user_apply_keeps_last_login() {
        let mut user = seed::users().remove(0);
        let mut form = user.to_form();
        form.name = "Johnny Doe".to_string();
        user.apply(form, &SubmitContext::new(today())).unwrap();
        assert_eq!(user.name, "Johnny Doe");
        assert_eq!(user.last_login, "2024-01-15 10:30 AM");
    }

    #[test]
    fn test_sprint_create_snapshots_project_name() {
        let ctx = SubmitContext::new(today()).with_projects(&seed::projects());
        let form = SprintForm {
            name: "Checkout".to_string(),
            project_id: Some(RecordId(2)),
            start_date: NaiveDate::from_ymd_opt(2024, 3, 4),
            end_date: NaiveDate::from_ymd_opt(2024, 3, 18),
            ..SprintForm::default()
        };
        let sprint = Sprint::create(RecordId(4), form, &ctx).unwrap();
        assert_eq!(sprint.project_name, "Mobile Banking App");
    }

    #[test]
    fn test_sprint_create_unknown_project_has_blank_name() {
        let ctx = SubmitContext::new(today()).with_projects(&seed::projects());
        let form = SprintForm {
            name: "Orphan".to_string(),
            project_id: Some(RecordId(77)),
            start_date: NaiveDate::from_ymd_opt(2024, 3, 4),
            end_date: NaiveDate::from_ymd_opt(2024, 3, 18),
            ..SprintForm::default()
        };
        let sprint = Sprint::create(RecordId(4), form, &ctx).unwrap();
        assert_eq!(sprint.project_name, "");
    }

    #[test]
    fn test_sprint_apply_unknown_project_keeps_snapshot() {
        let mut sprint = seed::sprints().remove(0);
        let mut form = sprint.to_form();
        form.project_id = Some(RecordId(77));
        sprint.apply(form, &SubmitContext::new(today())).unwrap();
        assert_eq!(sprint.project_id, RecordId(77));
        assert_eq!(sprint.project_name, "E-commerce Website");
    }

    #[test]
    fn test_to_form_copies_list_fields() {
        let sprint = seed::sprints().remove(0);
        let mut form = sprint.to_form();
        form.add_attachment("extra.txt");
        assert_eq!(sprint.attachments.len(), 2);
        assert_eq!(form.attachments.len(), 3);
    }

    #[test]
    fn test_task_filter_combines_status_and_priority() {
        let tasks = seed::tasks();
        let filter = TaskFilter {
            status: Filter::Only(TaskStatus::InProgress),
            priority: Filter::Only(TaskPriority::High),
        };
        let hits: Vec<&str> = tasks
            .iter()
            .filter(|t| t.matches_filter(&filter))
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(hits, vec!["Implement Authentication API"]);
    }
}
