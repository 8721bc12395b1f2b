pub mod activity;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod console;
pub mod controller;
pub mod dashboard;
pub mod entity;
pub mod error;
pub mod export;
pub mod forms;
pub mod models;
pub mod navigation;
pub mod seed;
pub mod store;

// Re-export commonly used types
pub use activity::{relative_time, Action, ActivityEntry, ActivityLog};
pub use auth::CurrentUser;
pub use catalog::{
    permissions_by_category, Permission, RoleCard, ASSIGNEES, PERMISSIONS, ROLE_OPTIONS,
};
pub use config::{config_path, ConsoleConfig};
pub use console::{Console, ScreenEntity};
pub use controller::{DeleteOutcome, Editor, EditorMode, EntityList, Submitted};
pub use dashboard::{DashboardStats, TaskSummary};
pub use entity::{Entity, ProjectFilter, SprintFilter, SubmitContext, TaskFilter, UserFilter};
pub use error::{ConsoleError, ConsoleResult};
pub use export::{export_file_name, tasks_csv, ExportFormat};
pub use forms::{Draft, Form, ProjectForm, RoleForm, SprintForm, TaskForm, UserForm};
pub use models::{
    Choice, EntityKind, Project, ProjectStatus, RecordId, Role, Sprint, SprintStatus, Task,
    TaskPriority, TaskStatus, User, UserStatus,
};
pub use navigation::{Screen, Session};
pub use store::{EntityStore, Filter, ListQuery};
