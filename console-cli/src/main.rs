mod cli;
mod prompts;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use colored::{ColoredString, Colorize};
use inquire::{Select, Text};
use serde::Serialize;
use std::fmt;
use std::path::Path;

use console_core::{
    config_path, relative_time, Choice, Console, ConsoleConfig, EntityKind, ExportFormat, Filter,
    Project, ProjectFilter, ProjectStatus, RecordId, Role, RoleCard, Screen, ScreenEntity, Sprint,
    SprintFilter, SprintStatus, Task, TaskFilter, TaskPriority, TaskStatus, User, UserFilter,
    UserStatus,
};

use crate::cli::{Cli, Command};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    if let Some(Command::InitConfig { force }) = &cli.command {
        let path = match &cli.config {
            Some(p) => p.clone(),
            None => config_path()?,
        };
        init_config(&path, *force)?;
        println!("{}", format!("Wrote default config to {}", path.display()).green());
        return Ok(());
    }

    let config = ConsoleConfig::load(cli.config.as_deref())?;
    let mut console = Console::new(config);

    match &cli.command {
        None => {
            sign_in_interactive(&mut console, cli.email.as_deref(), cli.password.as_deref())?;
            run_shell(&mut console)?;
        }
        Some(command) => {
            sign_in_once(&mut console, cli.email.as_deref(), cli.password.as_deref())?;
            run_command(&mut console, command)?;
        }
    }

    Ok(())
}

fn run_command(console: &mut Console, command: &Command) -> Result<()> {
    match command {
        Command::List {
            screen,
            search,
            status,
            priority,
            format,
        } => {
            let screen = parse_screen(screen)?;
            apply_list_args(console, screen, search.as_deref(), status.as_deref(), priority.as_deref())?;
            match format.to_lowercase().as_str() {
                "table" => print_screen(console, screen),
                "json" => print_screen_json(console, screen)?,
                _ => anyhow::bail!("Unknown list format: {}. Supported formats: table, json", format),
            }
        }
        Command::ExportTasks {
            search,
            status,
            priority,
            format,
            output,
        } => {
            apply_list_args(
                console,
                Screen::Tasks,
                search.as_deref(),
                status.as_deref(),
                priority.as_deref(),
            )?;
            let format: ExportFormat = format.parse()?;
            export_tasks(console, format, output.as_deref())?;
        }
        Command::Dashboard => print_dashboard(console),
        Command::InitConfig { .. } => {}
    }
    Ok(())
}

/// Writes the default settings to `path`; an existing file is kept unless `force`
fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!("Config already exists at {} (use --force to overwrite)", path.display());
    }
    ConsoleConfig::default().save(path)
}

// =============================================================================
// Sign-in
// =============================================================================

/// Signs in with the given flags, prompting for whatever is missing
fn sign_in_once(console: &mut Console, email: Option<&str>, password: Option<&str>) -> Result<()> {
    let (email, password) = match (email, password) {
        (Some(e), Some(p)) => (e.to_string(), p.to_string()),
        (email, _) => prompts::prompt_credentials(email)?,
    };
    let user = console.sign_in(&email, &password)?;
    log::debug!("Running as {} ({})", user.name, user.role);
    Ok(())
}

/// Signs in, asking again after every rejected attempt
fn sign_in_interactive(console: &mut Console, email: Option<&str>, password: Option<&str>) -> Result<()> {
    let mut flags = Some((email, password));
    loop {
        let (email, password) = match flags.take() {
            Some((Some(e), Some(p))) => (e.to_string(), p.to_string()),
            Some((email, _)) => prompts::prompt_credentials(email)?,
            None => prompts::prompt_credentials(None)?,
        };
        match console.sign_in(&email, &password) {
            Ok(user) => {
                println!("{}", format!("Welcome, {} ({})", user.name, user.role).green());
                return Ok(());
            }
            Err(e) => println!("{}", e.to_string().red()),
        }
    }
}

// =============================================================================
// Interactive shell
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    List,
    Search,
    Filter,
    Add,
    Edit,
    Delete,
    Export,
    SwitchScreen,
    SignOut,
    Quit,
}

impl fmt::Display for MenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MenuAction::List => "List",
            MenuAction::Search => "Search",
            MenuAction::Filter => "Filter",
            MenuAction::Add => "Add",
            MenuAction::Edit => "Edit",
            MenuAction::Delete => "Delete",
            MenuAction::Export => "Export tasks",
            MenuAction::SwitchScreen => "Switch screen",
            MenuAction::SignOut => "Sign out",
            MenuAction::Quit => "Quit",
        };
        write!(f, "{}", label)
    }
}

/// Menu entries offered on a screen
fn menu_for(screen: Screen) -> Vec<MenuAction> {
    let mut actions = Vec::new();
    if screen.entity_kind().is_some() {
        actions.extend([MenuAction::List, MenuAction::Search]);
        if screen != Screen::Roles {
            actions.push(MenuAction::Filter);
        }
        actions.extend([MenuAction::Add, MenuAction::Edit, MenuAction::Delete]);
    }
    if screen == Screen::Tasks {
        actions.push(MenuAction::Export);
    }
    actions.extend([MenuAction::SwitchScreen, MenuAction::SignOut, MenuAction::Quit]);
    actions
}

fn run_shell(console: &mut Console) -> Result<()> {
    loop {
        let screen = console.session().active_screen();
        println!();
        println!("{}", format!("== {} ==", screen.label()).bold());
        if screen == Screen::Dashboard {
            print_dashboard(console);
        }

        let action = Select::new("Action:", menu_for(screen)).prompt()?;
        let result = match action {
            MenuAction::List => {
                print_screen(console, screen);
                Ok(())
            }
            MenuAction::Search => shell_search(console, screen),
            MenuAction::Filter => shell_filter(console, screen),
            MenuAction::Add => shell_save(console, screen, None),
            MenuAction::Edit => shell_edit(console, screen),
            MenuAction::Delete => shell_delete(console, screen),
            MenuAction::Export => {
                let format = Select::new("Format:", vec![ExportFormat::Csv, ExportFormat::Json])
                    .prompt()?;
                export_tasks(console, format, None)
            }
            MenuAction::SwitchScreen => {
                let labels: Vec<&str> = Screen::ALL.iter().map(|s| s.label()).collect();
                let choice = Select::new("Screen:", labels).raw_prompt()?;
                console.navigate(Screen::ALL[choice.index]);
                Ok(())
            }
            MenuAction::SignOut => {
                console.sign_out();
                println!("{}", "Signed out.".yellow());
                sign_in_interactive(console, None, None)?;
                Ok(())
            }
            MenuAction::Quit => return Ok(()),
        };

        if let Err(e) = result {
            println!("{}", format!("Error: {:#}", e).red());
        }
    }
}

fn shell_search(console: &mut Console, screen: Screen) -> Result<()> {
    let current = current_search(console, screen);
    let term = Text::new("Search:").with_initial_value(&current).prompt()?;
    apply_search(console, screen, &term);
    print_screen(console, screen);
    Ok(())
}

fn shell_filter(console: &mut Console, screen: Screen) -> Result<()> {
    match screen {
        Screen::Users => {
            let list = console.list_mut::<User>();
            let status = prompts::prompt_filter("Status:", list.query().filter.status)?;
            list.set_filter(UserFilter { status });
        }
        Screen::Projects => {
            let list = console.list_mut::<Project>();
            let status = prompts::prompt_filter("Status:", list.query().filter.status)?;
            list.set_filter(ProjectFilter { status });
        }
        Screen::Sprints => {
            let list = console.list_mut::<Sprint>();
            let status = prompts::prompt_filter("Status:", list.query().filter.status)?;
            list.set_filter(SprintFilter { status });
        }
        Screen::Tasks => {
            let list = console.list_mut::<Task>();
            let current = list.query().filter.clone();
            let status = prompts::prompt_filter("Status:", current.status)?;
            let priority = prompts::prompt_filter("Priority:", current.priority)?;
            list.set_filter(TaskFilter { status, priority });
        }
        Screen::Dashboard | Screen::Roles => {}
    }
    print_screen(console, screen);
    Ok(())
}

/// Ids and names of the records visible on a screen
fn visible_records(console: &Console, kind: EntityKind) -> Vec<(RecordId, String)> {
    fn collect<E: ScreenEntity>(console: &Console) -> Vec<(RecordId, String)> {
        console
            .list::<E>()
            .visible()
            .into_iter()
            .map(|r| (r.id(), r.display_name().to_string()))
            .collect()
    }
    match kind {
        EntityKind::User => collect::<User>(console),
        EntityKind::Role => collect::<Role>(console),
        EntityKind::Project => collect::<Project>(console),
        EntityKind::Sprint => collect::<Sprint>(console),
        EntityKind::Task => collect::<Task>(console),
    }
}

fn screen_kind(screen: Screen) -> Result<EntityKind> {
    screen
        .entity_kind()
        .with_context(|| format!("{} has no records", screen.label()))
}

fn shell_edit(console: &mut Console, screen: Screen) -> Result<()> {
    let kind = screen_kind(screen)?;
    let id = prompts::prompt_select_record(&format!("Edit which {}?", kind.noun()), &visible_records(console, kind))?;
    shell_save(console, screen, Some(id))
}

fn shell_save(console: &mut Console, screen: Screen, id: Option<RecordId>) -> Result<()> {
    let kind = screen_kind(screen)?;
    let title = match id {
        Some(_) => format!("Edit {}", kind),
        None => format!("Add New {}", kind),
    };
    println!("{}", title.bold());

    let draft = console.draft(kind, id)?;
    let draft = prompts::prompt_draft(console, draft)?;
    let submitted = console.save_draft(draft, id)?;

    let verb = if submitted.created { "created" } else { "updated" };
    println!("{}", format!("{} {} {} successfully!", kind, submitted.id, verb).green());
    Ok(())
}

fn shell_delete(console: &mut Console, screen: Screen) -> Result<()> {
    let kind = screen_kind(screen)?;
    let id = prompts::prompt_select_record(
        &format!("Delete which {}?", kind.noun()),
        &visible_records(console, kind),
    )?;

    let ask = console.config().confirm_deletes;
    let deleted = console.delete_kind(kind, id, |question| !ask || prompts::confirm_delete(question))?;

    match deleted {
        Some(name) => println!("{}", format!("{} \"{}\" deleted successfully!", kind, name).green()),
        None => println!("{}", "Deletion cancelled.".yellow()),
    }
    Ok(())
}

// =============================================================================
// Query arguments
// =============================================================================

fn parse_screen(name: &str) -> Result<Screen> {
    let screen = Screen::from_id(name);
    if screen.entity_kind().is_none() {
        anyhow::bail!(
            "Unknown screen: {}. Supported screens: users, roles, projects, sprints, tasks",
            name
        );
    }
    Ok(screen)
}

/// Parses an optional filter argument; absent means no constraint
fn parse_filter<T: Choice>(value: Option<&str>) -> Result<Filter<T>> {
    match value {
        Some(s) => Ok(Filter::parse(s)?),
        None => Ok(Filter::All),
    }
}

fn current_search(console: &Console, screen: Screen) -> String {
    match screen {
        Screen::Users => console.list::<User>().query().search.clone(),
        Screen::Roles => console.list::<Role>().query().search.clone(),
        Screen::Projects => console.list::<Project>().query().search.clone(),
        Screen::Sprints => console.list::<Sprint>().query().search.clone(),
        Screen::Tasks => console.list::<Task>().query().search.clone(),
        Screen::Dashboard => String::new(),
    }
}

fn apply_search(console: &mut Console, screen: Screen, term: &str) {
    match screen {
        Screen::Users => console.list_mut::<User>().set_search(term),
        Screen::Roles => console.list_mut::<Role>().set_search(term),
        Screen::Projects => console.list_mut::<Project>().set_search(term),
        Screen::Sprints => console.list_mut::<Sprint>().set_search(term),
        Screen::Tasks => console.list_mut::<Task>().set_search(term),
        Screen::Dashboard => {}
    }
}

/// Applies command-line search and filters to a screen
fn apply_list_args(
    console: &mut Console,
    screen: Screen,
    search: Option<&str>,
    status: Option<&str>,
    priority: Option<&str>,
) -> Result<()> {
    if priority.is_some() && screen != Screen::Tasks {
        anyhow::bail!("--priority only applies to tasks");
    }
    if status.is_some() && screen == Screen::Roles {
        anyhow::bail!("Roles have no status");
    }

    apply_search(console, screen, search.unwrap_or_default());
    match screen {
        Screen::Users => console.list_mut::<User>().set_filter(UserFilter {
            status: parse_filter::<UserStatus>(status)?,
        }),
        Screen::Projects => console.list_mut::<Project>().set_filter(ProjectFilter {
            status: parse_filter::<ProjectStatus>(status)?,
        }),
        Screen::Sprints => console.list_mut::<Sprint>().set_filter(SprintFilter {
            status: parse_filter::<SprintStatus>(status)?,
        }),
        Screen::Tasks => console.list_mut::<Task>().set_filter(TaskFilter {
            status: parse_filter::<TaskStatus>(status)?,
            priority: parse_filter::<TaskPriority>(priority)?,
        }),
        Screen::Roles | Screen::Dashboard => {}
    }
    Ok(())
}

// =============================================================================
// Output
// =============================================================================

/// Cuts `s` to at most `max` characters, marking the cut with "..."
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// A record printable as one table row
trait Tabular {
    const HEADER: &'static str;
    const WIDTH: usize;

    fn row(&self) -> String;
}

fn user_status(status: UserStatus) -> ColoredString {
    match status {
        UserStatus::Active => status.label().green(),
        UserStatus::Inactive => status.label().red(),
    }
}

fn project_status(status: ProjectStatus) -> ColoredString {
    match status {
        ProjectStatus::Active => status.label().green(),
        ProjectStatus::Completed => status.label().blue(),
        ProjectStatus::OnHold => status.label().yellow(),
    }
}

fn sprint_status(status: SprintStatus) -> ColoredString {
    match status {
        SprintStatus::Active => status.label().green(),
        SprintStatus::Invoiced => status.label().blue(),
        SprintStatus::OnHold | SprintStatus::PendingDues => status.label().red(),
        SprintStatus::PendingApproval | SprintStatus::InQueue => status.label().yellow(),
    }
}

fn task_priority(priority: TaskPriority) -> ColoredString {
    match priority {
        TaskPriority::High => priority.label().red(),
        TaskPriority::Medium => priority.label().yellow(),
        TaskPriority::Low => priority.label().green(),
    }
}

fn task_status(status: TaskStatus) -> ColoredString {
    match status {
        TaskStatus::Todo => status.label().yellow(),
        TaskStatus::InProgress => status.label().blue(),
        TaskStatus::Completed => status.label().green(),
    }
}

impl Tabular for User {
    const HEADER: &'static str = "ID   | Name                 | Email                        | Role             | Status   | Last Login";
    const WIDTH: usize = 110;

    fn row(&self) -> String {
        format!(
            "{:<4} | {:<20} | {:<28} | {:<16} | {:<8} | {}",
            self.id,
            truncate(&self.name, 20),
            truncate(&self.email, 28),
            self.role,
            user_status(self.status),
            self.last_login
        )
    }
}

impl Tabular for Role {
    const HEADER: &'static str = "ID   | Name             | Description                    | Permissions";
    const WIDTH: usize = 110;

    fn row(&self) -> String {
        let card = RoleCard::new(self);
        let mut badges = card.badges.join(", ");
        if let Some(more) = &card.more {
            badges = format!("{} {}", badges, more);
        }
        format!(
            "{:<4} | {:<16} | {:<30} | {} [{}] - {}",
            self.id,
            truncate(&self.name, 16),
            truncate(&self.description, 30),
            card.heading,
            badges,
            card.users
        )
    }
}

impl Tabular for Project {
    const HEADER: &'static str = "ID   | Name                     | Client               | Contact          | Status    | Created";
    const WIDTH: usize = 105;

    fn row(&self) -> String {
        let name = format!("{} {}", self.logo, self.name);
        format!(
            "{:<4} | {:<24} | {:<20} | {:<16} | {:<9} | {}",
            self.id,
            truncate(name.trim(), 24),
            truncate(&self.client_name, 20),
            self.contact_number,
            project_status(self.status),
            self.created_at
        )
    }
}

impl Tabular for Sprint {
    const HEADER: &'static str = "ID   | Name                       | Project              | Dates                   | Status           | Attachments";
    const WIDTH: usize = 120;

    fn row(&self) -> String {
        format!(
            "{:<4} | {:<26} | {:<20} | {} - {} | {:<16} | {}",
            self.id,
            truncate(&self.name, 26),
            truncate(&self.project_name, 20),
            self.start_date,
            self.end_date,
            sprint_status(self.status),
            self.attachments.len()
        )
    }
}

impl Tabular for Task {
    const HEADER: &'static str = "ID   | Name                         | Hours | Priority | Status      | Assignee     | Created";
    const WIDTH: usize = 105;

    fn row(&self) -> String {
        format!(
            "{:<4} | {:<28} | {:<5} | {:<8} | {:<11} | {:<12} | {}",
            self.id,
            truncate(&self.name, 28),
            self.efforts,
            task_priority(self.priority),
            task_status(self.status),
            self.assignee,
            self.created_at
        )
    }
}

fn print_table<E: ScreenEntity + Tabular>(console: &Console) {
    let rows = console.list::<E>().visible();
    if rows.is_empty() {
        println!("{}", format!("No {}s found.", E::KIND.noun()).yellow());
        return;
    }
    println!("{}", E::HEADER);
    println!("{}", "-".repeat(E::WIDTH));
    for record in rows {
        println!("{}", record.row());
    }
}

fn print_screen(console: &Console, screen: Screen) {
    match screen {
        Screen::Users => print_table::<User>(console),
        Screen::Roles => print_table::<Role>(console),
        Screen::Projects => print_table::<Project>(console),
        Screen::Sprints => print_table::<Sprint>(console),
        Screen::Tasks => {
            print_task_summary(console);
            print_table::<Task>(console);
        }
        Screen::Dashboard => print_dashboard(console),
    }
}

/// The task cards for the visible rows, on one line
fn task_summary_line(console: &Console) -> String {
    console
        .task_summary()
        .cards()
        .iter()
        .map(|(label, value)| format!("{}: {}", label, value))
        .collect::<Vec<_>>()
        .join("  |  ")
}

fn print_task_summary(console: &Console) {
    println!("{}", task_summary_line(console).bold());
    println!();
}

fn print_json<E: ScreenEntity + Serialize>(console: &Console) -> Result<()> {
    let rows = console.list::<E>().visible();
    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}

fn print_screen_json(console: &Console, screen: Screen) -> Result<()> {
    match screen {
        Screen::Users => print_json::<User>(console),
        Screen::Roles => print_json::<Role>(console),
        Screen::Projects => print_json::<Project>(console),
        Screen::Sprints => print_json::<Sprint>(console),
        Screen::Tasks => print_json::<Task>(console),
        Screen::Dashboard => {
            println!("{}", serde_json::to_string_pretty(&console.dashboard())?);
            Ok(())
        }
    }
}

fn print_dashboard(console: &Console) {
    let stats = console.dashboard();
    for (label, value) in stats.cards() {
        println!("{:<18} {}", label, value.to_string().bold());
    }
    println!();
    println!("{}", "Performance Overview".bold());
    for (label, rate) in stats.rates() {
        println!("{:<26} {:>3}%", label, rate);
    }
    println!();
    println!("{}", "Recent Activity".bold());
    if console.activity().is_empty() {
        println!("{}", "No activity yet.".yellow());
    }
    let now = Utc::now();
    for entry in console.activity().entries() {
        println!("  {} ({})", entry.message(), relative_time(entry.at, now).dimmed());
    }
}

fn export_tasks(console: &Console, format: ExportFormat, output: Option<&Path>) -> Result<()> {
    let path = console
        .export_tasks(format, output)
        .context("Task export failed")?;
    println!("{}", format!("Exported tasks to {}", path.display()).green());
    Ok(())
}
