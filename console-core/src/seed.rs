//! Sample records every store starts with.

use chrono::NaiveDate;

use crate::models::{
    Project, ProjectStatus, RecordId, Role, Sprint, SprintStatus, Task, TaskPriority, TaskStatus,
    User, UserStatus,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN)
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn users() -> Vec<User> {
    let user = |id, name: &str, email: &str, phone: &str, role: &str, status, last_login: &str| User {
        id: RecordId(id),
        name: name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        role: role.to_string(),
        status,
        last_login: last_login.to_string(),
    };
    vec![
        user(
            1,
            "John Doe",
            "john.doe@company.com",
            "+1 234 567 8900",
            "Project Manager",
            UserStatus::Active,
            "2024-01-15 10:30 AM",
        ),
        user(
            2,
            "Jane Smith",
            "jane.smith@company.com",
            "+1 234 567 8901",
            "Developer",
            UserStatus::Active,
            "2024-01-15 09:15 AM",
        ),
        user(
            3,
            "Mike Johnson",
            "mike.johnson@company.com",
            "+1 234 567 8902",
            "Designer",
            UserStatus::Inactive,
            "2024-01-10 02:45 PM",
        ),
    ]
}

pub fn roles() -> Vec<Role> {
    vec![
        Role {
            id: RecordId(1),
            name: "Super Admin".to_string(),
            description: "Full system access with all permissions".to_string(),
            permissions: strings(&[
                "user.create",
                "user.read",
                "user.update",
                "user.delete",
                "project.create",
                "project.read",
                "project.update",
                "project.delete",
                "sprint.create",
                "sprint.read",
                "sprint.update",
                "sprint.delete",
            ]),
            user_count: 2,
        },
        Role {
            id: RecordId(2),
            name: "Project Manager".to_string(),
            description: "Can manage projects and sprints".to_string(),
            permissions: strings(&[
                "project.create",
                "project.read",
                "project.update",
                "sprint.create",
                "sprint.read",
                "sprint.update",
            ]),
            user_count: 5,
        },
        Role {
            id: RecordId(3),
            name: "Developer".to_string(),
            description: "Can view projects and manage tasks".to_string(),
            permissions: strings(&[
                "project.read",
                "sprint.read",
                "task.create",
                "task.read",
                "task.update",
            ]),
            user_count: 12,
        },
    ]
}

pub fn projects() -> Vec<Project> {
    let project = |id, name: &str, client: &str, contact: &str, logo: &str, status, created| Project {
        id: RecordId(id),
        name: name.to_string(),
        client_name: client.to_string(),
        contact_number: contact.to_string(),
        logo: logo.to_string(),
        status,
        created_at: created,
    };
    vec![
        project(
            1,
            "E-commerce Website",
            "ABC Corporation",
            "+1 234 567 8900",
            "🛒",
            ProjectStatus::Active,
            date(2024, 1, 10),
        ),
        project(
            2,
            "Mobile Banking App",
            "XYZ Bank",
            "+1 234 567 8901",
            "🏦",
            ProjectStatus::Active,
            date(2024, 1, 8),
        ),
        project(
            3,
            "Healthcare Portal",
            "MediCare Inc",
            "+1 234 567 8902",
            "🏥",
            ProjectStatus::Completed,
            date(2024, 1, 5),
        ),
    ]
}

pub fn sprints() -> Vec<Sprint> {
    vec![
        Sprint {
            id: RecordId(1),
            name: "User Authentication Sprint".to_string(),
            project_id: RecordId(1),
            project_name: "E-commerce Website".to_string(),
            start_date: date(2024, 1, 15),
            end_date: date(2024, 1, 29),
            status: SprintStatus::Active,
            comments: "Implementing login, signup, and password reset functionality".to_string(),
            attachments: strings(&["requirements.pdf", "wireframes.fig"]),
        },
        Sprint {
            id: RecordId(2),
            name: "Payment Integration".to_string(),
            project_id: RecordId(2),
            project_name: "Mobile Banking App".to_string(),
            start_date: date(2024, 1, 10),
            end_date: date(2024, 1, 24),
            status: SprintStatus::PendingApproval,
            comments: "Integrate payment gateway and transaction processing".to_string(),
            attachments: strings(&["payment-specs.pdf"]),
        },
        Sprint {
            id: RecordId(3),
            name: "Dashboard Development".to_string(),
            project_id: RecordId(3),
            project_name: "Healthcare Portal".to_string(),
            start_date: date(2024, 1, 5),
            end_date: date(2024, 1, 19),
            status: SprintStatus::Invoiced,
            comments: "Complete admin dashboard with analytics".to_string(),
            attachments: strings(&["dashboard-mockups.png", "analytics-requirements.docx"]),
        },
    ]
}

pub fn tasks() -> Vec<Task> {
    vec![
        Task {
            id: RecordId(1),
            name: "Design User Login Page".to_string(),
            description: "Create wireframes and mockups for the user login interface".to_string(),
            efforts: 8.0,
            priority: TaskPriority::High,
            status: TaskStatus::Completed,
            assignee: "Jane Smith".to_string(),
            created_at: date(2024, 1, 10),
        },
        Task {
            id: RecordId(2),
            name: "Implement Authentication API".to_string(),
            description: "Develop backend API endpoints for user authentication".to_string(),
            efforts: 16.0,
            priority: TaskPriority::High,
            status: TaskStatus::InProgress,
            assignee: "John Doe".to_string(),
            created_at: date(2024, 1, 12),
        },
        Task {
            id: RecordId(3),
            name: "Write Unit Tests".to_string(),
            description: "Create comprehensive unit tests for authentication module".to_string(),
            efforts: 6.0,
            priority: TaskPriority::Medium,
            status: TaskStatus::Todo,
            assignee: "Mike Johnson".to_string(),
            created_at: date(2024, 1, 14),
        },
    ]
}
