//! The console aggregate: session, one list controller per entity screen,
//! the activity log and the user's preferences.

use chrono::{NaiveDate, Utc};
use log::info;
use std::path::{Path, PathBuf};

use crate::activity::{Action, ActivityLog};
use crate::auth::CurrentUser;
use crate::config::ConsoleConfig;
use crate::controller::{DeleteOutcome, EntityList, Submitted};
use crate::dashboard::{DashboardStats, TaskSummary};
use crate::entity::{Entity, SubmitContext};
use crate::error::{ConsoleError, ConsoleResult};
use crate::export::{self, ExportFormat};
use crate::forms::Draft;
use crate::models::{EntityKind, Project, RecordId, Role, Sprint, Task, User};
use crate::navigation::{Screen, Session};
use crate::seed;
use crate::store::EntityStore;

/// An entity with a screen in the console
pub trait ScreenEntity: Entity + 'static {
    const SCREEN: Screen;

    fn list(console: &Console) -> &EntityList<Self>;
    fn list_mut(console: &mut Console) -> &mut EntityList<Self>;
}

macro_rules! screen_entity {
    ($ty:ty, $screen:expr, $field:ident) => {
        impl ScreenEntity for $ty {
            const SCREEN: Screen = $screen;

            fn list(console: &Console) -> &EntityList<Self> {
                &console.$field
            }

            fn list_mut(console: &mut Console) -> &mut EntityList<Self> {
                &mut console.$field
            }
        }
    };
}

screen_entity!(User, Screen::Users, users);
screen_entity!(Role, Screen::Roles, roles);
screen_entity!(Project, Screen::Projects, projects);
screen_entity!(Sprint, Screen::Sprints, sprints);
screen_entity!(Task, Screen::Tasks, tasks);

/// Runs `$body` with `$E` bound to the entity type of `$kind`
macro_rules! with_entity {
    ($kind:expr, $E:ident => $body:expr) => {
        match $kind {
            EntityKind::User => {
                type $E = User;
                $body
            }
            EntityKind::Role => {
                type $E = Role;
                $body
            }
            EntityKind::Project => {
                type $E = Project;
                $body
            }
            EntityKind::Sprint => {
                type $E = Sprint;
                $body
            }
            EntityKind::Task => {
                type $E = Task;
                $body
            }
        }
    };
}

/// Everything one console window or shell works with
#[derive(Debug, Clone)]
pub struct Console {
    session: Session,
    users: EntityList<User>,
    roles: EntityList<Role>,
    projects: EntityList<Project>,
    sprints: EntityList<Sprint>,
    tasks: EntityList<Task>,
    activity: ActivityLog,
    config: ConsoleConfig,
}

impl Default for Console {
    fn default() -> Self {
        Self::new(ConsoleConfig::default())
    }
}

impl Console {
    /// A signed-out console with every store holding the sample records
    pub fn new(config: ConsoleConfig) -> Self {
        Self {
            session: Session::new(config.default_screen),
            users: EntityList::new(EntityStore::from_records(seed::users())),
            roles: EntityList::new(EntityStore::from_records(seed::roles())),
            projects: EntityList::new(EntityStore::from_records(seed::projects())),
            sprints: EntityList::new(EntityStore::from_records(seed::sprints())),
            tasks: EntityList::new(EntityStore::from_records(seed::tasks())),
            activity: ActivityLog::new(config.activity_limit),
            config,
        }
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub fn activity(&self) -> &ActivityLog {
        &self.activity
    }

    // =========================================================================
    // Session
    // =========================================================================

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn current_user(&self) -> Option<&CurrentUser> {
        self.session.user()
    }

    pub fn sign_in(&mut self, email: &str, password: &str) -> ConsoleResult<&CurrentUser> {
        self.session.sign_in(email, password)
    }

    pub fn sign_out(&mut self) {
        self.session.sign_out();
    }

    pub fn navigate(&mut self, screen: Screen) {
        self.session.navigate(screen);
    }

    pub fn toggle_mobile_menu(&mut self) {
        self.session.toggle_mobile_menu();
    }

    // =========================================================================
    // Entity screens
    // =========================================================================

    /// The list controller of an entity screen
    pub fn list<E: ScreenEntity>(&self) -> &EntityList<E> {
        E::list(self)
    }

    /// The list controller of an entity screen, for search and filter changes
    pub fn list_mut<E: ScreenEntity>(&mut self) -> &mut EntityList<E> {
        E::list_mut(self)
    }

    pub fn projects(&self) -> &[Project] {
        self.projects.store().records()
    }

    /// UTC date stamped on new records and export file names
    pub fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }

    /// Context for a submit made now, with the current project names
    pub fn submit_context(&self) -> SubmitContext {
        SubmitContext::new(self.today()).with_projects(self.projects())
    }

    pub fn open_create<E: ScreenEntity>(&mut self) -> ConsoleResult<&mut E::Form> {
        self.session.require_auth()?;
        Ok(E::list_mut(self).open_create())
    }

    pub fn open_edit<E: ScreenEntity>(&mut self, id: RecordId) -> ConsoleResult<&mut E::Form> {
        self.session.require_auth()?;
        E::list_mut(self).open_edit(id)
    }

    pub fn cancel<E: ScreenEntity>(&mut self) {
        E::list_mut(self).cancel();
    }

    /// Saves the screen's open form and records the change
    pub fn submit<E: ScreenEntity>(&mut self) -> ConsoleResult<Submitted> {
        self.session.require_auth()?;
        let ctx = self.submit_context();
        let list = E::list_mut(self);
        let submitted = list.submit(&ctx)?;
        let name = list
            .store()
            .get(submitted.id)
            .map(|r| r.display_name().to_string())
            .unwrap_or_default();
        let action = if submitted.created {
            Action::Created
        } else {
            Action::Updated
        };
        self.activity.record(E::KIND, action, &name);
        Ok(submitted)
    }

    /// Deletes a record once `confirm` agrees to the prompt
    pub fn delete<E, F>(&mut self, id: RecordId, confirm: F) -> ConsoleResult<DeleteOutcome<E>>
    where
        E: ScreenEntity,
        F: FnOnce(&str) -> bool,
    {
        self.session.require_auth()?;
        let outcome = E::list_mut(self).delete(id, confirm)?;
        if let DeleteOutcome::Deleted(record) = &outcome {
            self.activity
                .record(E::KIND, Action::Deleted, record.display_name());
        }
        Ok(outcome)
    }

    // =========================================================================
    // Runtime dispatch by kind
    // =========================================================================

    /// A blank form, or one prefilled from the record `id`
    pub fn draft(&self, kind: EntityKind, id: Option<RecordId>) -> ConsoleResult<Draft> {
        let Some(id) = id else {
            return Ok(Draft::blank(kind));
        };
        let missing = ConsoleError::NotFound { kind, id };
        let draft = match kind {
            EntityKind::User => self.users.store().get(id).map(|r| Draft::User(r.to_form())),
            EntityKind::Role => self.roles.store().get(id).map(|r| Draft::Role(r.to_form())),
            EntityKind::Project => self
                .projects
                .store()
                .get(id)
                .map(|r| Draft::Project(r.to_form())),
            EntityKind::Sprint => self
                .sprints
                .store()
                .get(id)
                .map(|r| Draft::Sprint(r.to_form())),
            EntityKind::Task => self.tasks.store().get(id).map(|r| Draft::Task(r.to_form())),
        };
        draft.ok_or(missing)
    }

    /// Creates (`id` of `None`) or updates a record from a draft
    pub fn save_draft(&mut self, draft: Draft, id: Option<RecordId>) -> ConsoleResult<Submitted> {
        match draft {
            Draft::User(form) => self.save_form::<User>(form, id),
            Draft::Role(form) => self.save_form::<Role>(form, id),
            Draft::Project(form) => self.save_form::<Project>(form, id),
            Draft::Sprint(form) => self.save_form::<Sprint>(form, id),
            Draft::Task(form) => self.save_form::<Task>(form, id),
        }
    }

    fn save_form<E: ScreenEntity>(&mut self, form: E::Form, id: Option<RecordId>) -> ConsoleResult<Submitted> {
        let slot = match id {
            Some(id) => self.open_edit::<E>(id)?,
            None => self.open_create::<E>()?,
        };
        *slot = form;
        let result = self.submit::<E>();
        // One-shot saves never leave a form open behind them
        self.cancel::<E>();
        result
    }

    /// Deletes a record of any kind; returns the deleted record's name, or
    /// `None` when `confirm` declined
    pub fn delete_kind<F>(&mut self, kind: EntityKind, id: RecordId, confirm: F) -> ConsoleResult<Option<String>>
    where
        F: FnOnce(&str) -> bool,
    {
        with_entity!(kind, E => {
            match self.delete::<E, F>(id, confirm)? {
                DeleteOutcome::Deleted(record) => Ok(Some(record.display_name().to_string())),
                DeleteOutcome::Declined => Ok(None),
            }
        })
    }

    /// Name of a record of any kind
    pub fn record_name(&self, kind: EntityKind, id: RecordId) -> Option<String> {
        with_entity!(kind, E => {
            self.list::<E>().store().get(id).map(|r| r.display_name().to_string())
        })
    }

    // =========================================================================
    // Dashboard and export
    // =========================================================================

    pub fn dashboard(&self) -> DashboardStats {
        DashboardStats::compute(
            self.users.store().records(),
            self.projects.store().records(),
            self.sprints.store().records(),
            self.tasks.store().records(),
        )
    }

    /// Task cards over the tasks screen's visible rows
    pub fn task_summary(&self) -> TaskSummary {
        TaskSummary::compute(&self.tasks.visible())
    }

    /// Default location of an export made today
    pub fn default_export_path(&self, format: ExportFormat) -> PathBuf {
        self.config
            .export_dir()
            .join(export::export_file_name(self.today(), format))
    }

    /// Writes the tasks screen's visible rows to `path`, or to the default location
    pub fn export_tasks(&self, format: ExportFormat, path: Option<&Path>) -> ConsoleResult<PathBuf> {
        self.session.require_auth()?;
        let target = match path {
            Some(p) => p.to_path_buf(),
            None => self.default_export_path(format),
        };
        let view = self.tasks.visible();
        let written = export::write_tasks(&view, format, &target)?;
        info!("Task export ({}) written by {:?}", format, self.current_user().map(|u| &u.email));
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RoleCard;
    use crate::entity::TaskFilter;
    use crate::forms::{ProjectForm, RoleForm, TaskForm};
    use crate::models::{TaskPriority, TaskStatus};
    use crate::store::Filter;
    use tempfile::tempdir;

    fn signed_in() -> Console {
        let mut console = Console::default();
        console.sign_in("admin@company.com", "admin123").unwrap();
        console
    }

    #[test]
    fn test_operations_require_sign_in() {
        let mut console = Console::default();
        assert!(matches!(
            console.open_create::<Task>(),
            Err(ConsoleError::NotAuthenticated)
        ));
        assert!(matches!(
            console.delete::<User, _>(RecordId(1), |_| true),
            Err(ConsoleError::NotAuthenticated)
        ));
        assert_eq!(console.list::<User>().store().len(), 3);
    }

    #[test]
    fn test_new_role_shows_zero_permissions() {
        let mut console = signed_in();
        let form = console.open_create::<Role>().unwrap();
        form.name = "Auditor".to_string();
        form.description = "Reads reports".to_string();
        let submitted = console.submit::<Role>().unwrap();

        let role = console.list::<Role>().store().get(submitted.id).unwrap();
        assert_eq!(role.user_count, 0);
        assert_eq!(RoleCard::new(role).heading, "Permissions (0)");
    }

    #[test]
    fn test_project_rename_does_not_touch_sprints() {
        let mut console = signed_in();
        console.open_edit::<Project>(RecordId(1)).unwrap().name = "Storefront".to_string();
        console.submit::<Project>().unwrap();

        let sprint = console.list::<Sprint>().store().get(RecordId(1)).unwrap();
        assert_eq!(sprint.project_name, "E-commerce Website");

        // Saving the sprint again picks up the new name
        console.open_edit::<Sprint>(RecordId(1)).unwrap();
        console.submit::<Sprint>().unwrap();
        let sprint = console.list::<Sprint>().store().get(RecordId(1)).unwrap();
        assert_eq!(sprint.project_name, "Storefront");
    }

    #[test]
    fn test_deleting_project_keeps_its_sprints() {
        let mut console = signed_in();
        console.delete::<Project, _>(RecordId(2), |_| true).unwrap();
        let sprint = console.list::<Sprint>().store().get(RecordId(2)).unwrap();
        assert_eq!(sprint.project_id, RecordId(2));
        assert_eq!(sprint.project_name, "Mobile Banking App");
    }

    #[test]
    fn test_changes_are_logged() {
        let mut console = signed_in();
        console
            .save_draft(
                Draft::Project(ProjectForm {
                    name: "Mobile App".to_string(),
                    client_name: "Acme".to_string(),
                    contact_number: "+1 555 0100".to_string(),
                    ..ProjectForm::default()
                }),
                None,
            )
            .unwrap();
        console.delete_kind(EntityKind::User, RecordId(3), |_| true).unwrap();
        console.delete_kind(EntityKind::User, RecordId(2), |_| false).unwrap();

        let messages: Vec<String> = console.activity().entries().map(|e| e.message()).collect();
        assert_eq!(
            messages,
            vec!["User \"Mike Johnson\" deleted", "New project \"Mobile App\" created"]
        );
    }

    #[test]
    fn test_save_draft_update_and_failure() {
        let mut console = signed_in();
        let Draft::Task(mut form) = console.draft(EntityKind::Task, Some(RecordId(3))).unwrap() else {
            panic!("expected a task draft");
        };
        form.status = TaskStatus::Completed;
        let submitted = console.save_draft(Draft::Task(form), Some(RecordId(3))).unwrap();
        assert!(!submitted.created);
        assert_eq!(
            console.list::<Task>().store().get(RecordId(3)).unwrap().status,
            TaskStatus::Completed
        );

        let err = console
            .save_draft(Draft::Task(TaskForm::default()), None)
            .unwrap_err();
        assert!(matches!(err, ConsoleError::Validation { field: "name", .. }));
        assert!(console.list::<Task>().editor().is_none());
        assert_eq!(console.list::<Task>().store().len(), 3);
    }

    #[test]
    fn test_draft_for_unknown_record() {
        let console = signed_in();
        assert!(matches!(
            console.draft(EntityKind::Role, Some(RecordId(9))),
            Err(ConsoleError::NotFound { kind: EntityKind::Role, .. })
        ));
        assert_eq!(
            console.draft(EntityKind::Role, None).unwrap(),
            Draft::Role(RoleForm::default())
        );
    }

    #[test]
    fn test_dashboard_tracks_stores() {
        let mut console = signed_in();
        assert_eq!(console.dashboard().total_users, 3);
        console.delete::<User, _>(RecordId(1), |_| true).unwrap();
        assert_eq!(console.dashboard().total_users, 2);
    }

    #[test]
    fn test_export_uses_visible_tasks() {
        let mut console = signed_in();
        console.list_mut::<Task>().set_filter(TaskFilter {
            status: Filter::Only(TaskStatus::Todo),
            ..TaskFilter::default()
        });

        let dir = tempdir().unwrap();
        let path = dir.path().join("tasks.csv");
        console.export_tasks(ExportFormat::Csv, Some(&path)).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("\"Write Unit Tests\""));
    }

    #[test]
    fn test_export_default_path_uses_config_dir() {
        let dir = tempdir().unwrap();
        let mut console = Console::new(ConsoleConfig {
            export_dir: Some(dir.path().to_path_buf()),
            ..ConsoleConfig::default()
        });
        console.sign_in("admin@company.com", "admin123").unwrap();

        let written = console.export_tasks(ExportFormat::Json, None).unwrap();
        assert_eq!(written.parent(), Some(dir.path()));
        let file_name = written.file_name().unwrap().to_string_lossy().to_string();
        assert!(file_name.starts_with("tasks-") && file_name.ends_with(".json"));
    }

    #[test]
    fn test_sign_out_resets_navigation() {
        let mut console = signed_in();
        console.navigate(Screen::Tasks);
        console.sign_out();
        assert!(console.current_user().is_none());
        assert_eq!(console.session().active_screen(), Screen::Dashboard);
    }

    #[test]
    fn test_today_is_utc_date() {
        let console = Console::default();
        let before = Utc::now().date_naive();
        let today = console.today();
        let after = Utc::now().date_naive();
        assert!(today == before || today == after);
    }

    #[test]
    fn test_huge_activity_limit_builds() {
        let mut console = Console::new(ConsoleConfig {
            activity_limit: usize::MAX,
            ..ConsoleConfig::default()
        });
        console.sign_in("admin@company.com", "admin123").unwrap();
        console.delete::<Task, _>(RecordId(3), |_| true).unwrap();
        assert_eq!(console.activity().len(), 1);
    }

    #[test]
    fn test_task_summary_follows_filtered_view() {
        let mut console = signed_in();
        assert_eq!(console.task_summary().total_efforts, 30.0);

        console.list_mut::<Task>().set_filter(TaskFilter {
            priority: Filter::Only(TaskPriority::High),
            ..TaskFilter::default()
        });
        let summary = console.task_summary();
        assert_eq!(summary.total_tasks, 2);
        assert_eq!(summary.total_efforts, 24.0);
        assert_eq!(summary.completed, 1);
        assert_eq!(summary.in_progress, 1);

        console.list_mut::<Task>().set_search("unit tests");
        assert_eq!(console.task_summary().total_tasks, 0);
    }

    #[test]
    fn test_record_name() {
        let console = signed_in();
        assert_eq!(
            console.record_name(EntityKind::Project, RecordId(2)).as_deref(),
            Some("Mobile Banking App")
        );
        assert!(console.record_name(EntityKind::Task, RecordId(99)).is_none());
    }
}
