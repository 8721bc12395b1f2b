//! Summary figures for the dashboard screen.

use serde::Serialize;

use crate::models::{Project, ProjectStatus, Sprint, SprintStatus, Task, TaskStatus, User};

/// Counts and rates computed from the live stores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DashboardStats {
    pub total_users: usize,
    pub active_projects: usize,
    pub running_sprints: usize,
    pub pending_tasks: usize,
    /// Whole percentages
    pub project_completion_rate: u32,
    pub task_completion_rate: u32,
    pub sprint_success_rate: u32,
}

fn percent(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((part as f64 / total as f64) * 100.0).round() as u32
}

impl DashboardStats {
    pub fn compute(users: &[User], projects: &[Project], sprints: &[Sprint], tasks: &[Task]) -> Self {
        let count_projects = |s: ProjectStatus| projects.iter().filter(|p| p.status == s).count();
        let count_sprints = |s: SprintStatus| sprints.iter().filter(|p| p.status == s).count();
        let completed_tasks = tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Completed)
            .count();

        Self {
            total_users: users.len(),
            active_projects: count_projects(ProjectStatus::Active),
            running_sprints: count_sprints(SprintStatus::Active),
            pending_tasks: tasks.len() - completed_tasks,
            project_completion_rate: percent(count_projects(ProjectStatus::Completed), projects.len()),
            task_completion_rate: percent(completed_tasks, tasks.len()),
            sprint_success_rate: percent(count_sprints(SprintStatus::Invoiced), sprints.len()),
        }
    }

    /// Label/value pairs of the four stat cards
    pub fn cards(&self) -> [(&'static str, usize); 4] {
        [
            ("Total Users", self.total_users),
            ("Active Projects", self.active_projects),
            ("Running Sprints", self.running_sprints),
            ("Pending Tasks", self.pending_tasks),
        ]
    }

    /// Label/percentage pairs of the performance overview
    pub fn rates(&self) -> [(&'static str, u32); 3] {
        [
            ("Project Completion Rate", self.project_completion_rate),
            ("Task Completion Rate", self.task_completion_rate),
            ("Sprint Success Rate", self.sprint_success_rate),
        ]
    }
}

/// Figures shown above the task table, over the rows currently visible
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TaskSummary {
    pub total_tasks: usize,
    /// Hours
    pub total_efforts: f64,
    pub completed: usize,
    pub in_progress: usize,
}

impl TaskSummary {
    pub fn compute(tasks: &[&Task]) -> Self {
        let count = |s: TaskStatus| tasks.iter().filter(|t| t.status == s).count();
        Self {
            total_tasks: tasks.len(),
            total_efforts: tasks.iter().map(|t| t.efforts).sum(),
            completed: count(TaskStatus::Completed),
            in_progress: count(TaskStatus::InProgress),
        }
    }

    /// Label/text pairs of the four task cards
    pub fn cards(&self) -> [(&'static str, String); 4] {
        [
            ("Total Tasks", self.total_tasks.to_string()),
            ("Total Efforts", format!("{}h", self.total_efforts)),
            ("Completed", self.completed.to_string()),
            ("In Progress", self.in_progress.to_string()),
        ]
    }
}
