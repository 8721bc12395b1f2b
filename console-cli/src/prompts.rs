use anyhow::Result;
use chrono::NaiveDate;
use inquire::{Confirm, CustomType, MultiSelect, Password, Select, Text};
use std::fmt;

use console_core::catalog::PERMISSIONS;
use console_core::{
    Choice, Console, Draft, Filter, ProjectForm, RecordId, RoleForm, SprintForm, TaskForm,
    UserForm, ASSIGNEES, ROLE_OPTIONS,
};

/// Prompts for the sign-in email and password
pub fn prompt_credentials(email: Option<&str>) -> Result<(String, String)> {
    let email = match email {
        Some(e) => e.to_string(),
        None => Text::new("Email:").prompt()?,
    };
    let password = Password::new("Password:")
        .without_confirmation()
        .prompt()?;
    Ok((email, password))
}

/// Select over a closed value set, starting on `current`
fn select_choice<T: Choice + fmt::Display>(message: &str, current: T) -> Result<T> {
    let options = T::ALL.to_vec();
    let cursor = options.iter().position(|o| *o == current).unwrap_or(0);
    Ok(Select::new(message, options)
        .with_starting_cursor(cursor)
        .prompt()?)
}

/// Select over a fixed list of strings, starting on `current` when present
fn select_option(message: &str, options: &[&str], current: &str) -> Result<String> {
    let cursor = options.iter().position(|o| *o == current).unwrap_or(0);
    let selected = Select::new(message, options.to_vec())
        .with_starting_cursor(cursor)
        .prompt()?;
    Ok(selected.to_string())
}

/// Select over a categorical filter, "All" first
pub fn prompt_filter<T: Choice>(message: &str, current: Filter<T>) -> Result<Filter<T>> {
    let options = Filter::<T>::options();
    let labels: Vec<&str> = options.iter().map(|o| o.label()).collect();
    let cursor = options.iter().position(|o| *o == current).unwrap_or(0);
    let choice = Select::new(message, labels)
        .with_starting_cursor(cursor)
        .raw_prompt()?;
    Ok(options[choice.index])
}

/// Prompts the user to select a record from a list
pub fn prompt_select_record(message: &str, records: &[(RecordId, String)]) -> Result<RecordId> {
    if records.is_empty() {
        anyhow::bail!("Nothing to select");
    }
    let labels: Vec<String> = records
        .iter()
        .map(|(id, name)| format!("#{} {}", id, name))
        .collect();
    let choice = Select::new(message, labels).raw_prompt()?;
    Ok(records[choice.index].0)
}

/// Asks the delete question; a failed prompt counts as "no"
pub fn confirm_delete(question: &str) -> bool {
    Confirm::new(question)
        .with_default(false)
        .prompt()
        .unwrap_or(false)
}

fn text(message: &str, current: &str) -> Result<String> {
    Ok(Text::new(message).with_initial_value(current).prompt()?)
}

/// Fills in every field of a draft, starting from its current values
pub fn prompt_draft(console: &Console, draft: Draft) -> Result<Draft> {
    Ok(match draft {
        Draft::User(form) => Draft::User(prompt_user(form)?),
        Draft::Role(form) => Draft::Role(prompt_role(form)?),
        Draft::Project(form) => Draft::Project(prompt_project(form)?),
        Draft::Sprint(form) => Draft::Sprint(prompt_sprint(console, form)?),
        Draft::Task(form) => Draft::Task(prompt_task(form)?),
    })
}

fn prompt_user(form: UserForm) -> Result<UserForm> {
    Ok(UserForm {
        name: text("Full name:", &form.name)?,
        email: text("Email:", &form.email)?,
        phone: text("Phone:", &form.phone)?,
        role: select_option("Role:", ROLE_OPTIONS, &form.role)?,
        status: select_choice("Status:", form.status)?,
    })
}

fn prompt_role(mut form: RoleForm) -> Result<RoleForm> {
    form.name = text("Role name:", &form.name)?;
    form.description = text("Description:", &form.description)?;

    let labels: Vec<String> = PERMISSIONS
        .iter()
        .map(|p| format!("{}: {} ({})", p.category, p.label, p.id))
        .collect();
    let held: Vec<usize> = PERMISSIONS
        .iter()
        .enumerate()
        .filter(|(_, p)| form.has_permission(p.id))
        .map(|(i, _)| i)
        .collect();
    let selected: Vec<usize> = MultiSelect::new("Permissions:", labels)
        .with_default(&held)
        .raw_prompt()?
        .into_iter()
        .map(|o| o.index)
        .collect();

    // Toggle only the catalog entries that changed so ids outside the catalog survive
    for (i, permission) in PERMISSIONS.iter().enumerate() {
        if selected.contains(&i) != form.has_permission(permission.id) {
            form.toggle_permission(permission.id);
        }
    }
    Ok(form)
}

fn prompt_project(form: ProjectForm) -> Result<ProjectForm> {
    Ok(ProjectForm {
        name: text("Project name:", &form.name)?,
        client_name: text("Client name:", &form.client_name)?,
        contact_number: text("Contact number:", &form.contact_number)?,
        logo: text("Logo (emoji, optional):", &form.logo)?,
        status: select_choice("Status:", form.status)?,
    })
}

fn prompt_date(message: &str, current: Option<NaiveDate>) -> Result<NaiveDate> {
    let prompt = CustomType::<NaiveDate>::new(message)
        .with_help_message("YYYY-MM-DD")
        .with_error_message("Please enter a date as YYYY-MM-DD");
    let prompt = match current {
        Some(date) => prompt.with_default(date),
        None => prompt,
    };
    Ok(prompt.prompt()?)
}

fn prompt_sprint(console: &Console, mut form: SprintForm) -> Result<SprintForm> {
    form.name = text("Sprint name:", &form.name)?;

    let projects: Vec<(RecordId, String)> = console
        .projects()
        .iter()
        .map(|p| (p.id, p.name.clone()))
        .collect();
    form.project_id = Some(prompt_select_record("Project:", &projects)?);

    form.start_date = Some(prompt_date("Start date:", form.start_date)?);
    form.end_date = Some(prompt_date("End date:", form.end_date)?);
    form.status = select_choice("Status:", form.status)?;
    form.comments = text("Comments:", &form.comments)?;

    loop {
        println!("Attachments: {}", attachment_summary(&form.attachments));
        let action = Select::new("Attachments:", vec!["Done", "Add", "Remove"]).prompt()?;
        match action {
            "Add" => {
                let name = Text::new("File name:").prompt()?;
                form.add_attachment(&name);
            }
            "Remove" if !form.attachments.is_empty() => {
                let choice = Select::new("Remove which?", form.attachments.clone()).raw_prompt()?;
                form.remove_attachment(choice.index);
            }
            _ => break,
        }
    }
    Ok(form)
}

/// One-line attachment listing
pub fn attachment_summary(attachments: &[String]) -> String {
    if attachments.is_empty() {
        "(none)".to_string()
    } else {
        attachments.join(", ")
    }
}

fn prompt_task(form: TaskForm) -> Result<TaskForm> {
    let name = text("Task name:", &form.name)?;
    let description = inquire::Editor::new("Description:")
        .with_predefined_text(&form.description)
        .prompt()?;
    let efforts = CustomType::<f64>::new("Efforts (hours):")
        .with_default(form.efforts)
        .with_help_message("At least 0.5, in steps of 0.5")
        .prompt()?;

    Ok(TaskForm {
        name,
        description: description.trim().to_string(),
        efforts,
        priority: select_choice("Priority:", form.priority)?,
        status: select_choice("Status:", form.status)?,
        assignee: select_option("Assignee:", ASSIGNEES, &form.assignee)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attachment_summary() {
        assert_eq!(attachment_summary(&[]), "(none)");
        assert_eq!(
            attachment_summary(&["a.pdf".to_string(), "b.png".to_string()]),
            "a.pdf, b.png"
        );
    }
}
