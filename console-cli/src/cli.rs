use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Admin console for users, roles, projects, sprints and tasks")]
pub struct Cli {
    /// Sign-in email (prompted when omitted)
    #[clap(long, global = true)]
    pub email: Option<String>,

    /// Sign-in password (prompted when omitted)
    #[clap(long, global = true)]
    pub password: Option<String>,

    /// Path to the config file
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,

    /// Without a subcommand the interactive shell starts
    #[clap(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the records of a screen
    List {
        /// Screen to list: users, roles, projects, sprints or tasks
        screen: String,

        /// Free-text search
        #[clap(long)]
        search: Option<String>,

        /// Status filter ("all" for no constraint)
        #[clap(long)]
        status: Option<String>,

        /// Priority filter, tasks only
        #[clap(long)]
        priority: Option<String>,

        /// Output format: table or json
        #[clap(long, default_value = "table")]
        format: String,
    },

    /// Export the task list
    ExportTasks {
        /// Free-text search
        #[clap(long)]
        search: Option<String>,

        /// Status filter
        #[clap(long)]
        status: Option<String>,

        /// Priority filter
        #[clap(long)]
        priority: Option<String>,

        /// Export format: csv or json
        #[clap(long, default_value = "csv")]
        format: String,

        /// Output file (defaults to tasks-<date>.<ext> in the export directory)
        #[clap(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Show dashboard figures and recent activity
    Dashboard,

    /// Write a config file with the default settings
    InitConfig {
        /// Overwrite an existing file
        #[clap(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_starts_shell() {
        let cli = Cli::parse_from(["console"]);
        assert!(cli.command.is_none());
        assert!(cli.email.is_none());
    }

    #[test]
    fn test_list_arguments() {
        let cli = Cli::parse_from([
            "console",
            "--email",
            "admin@company.com",
            "list",
            "tasks",
            "--search",
            "auth",
            "--priority",
            "high",
        ]);
        assert_eq!(cli.email.as_deref(), Some("admin@company.com"));
        match cli.command {
            Some(Command::List {
                screen,
                search,
                priority,
                format,
                ..
            }) => {
                assert_eq!(screen, "tasks");
                assert_eq!(search.as_deref(), Some("auth"));
                assert_eq!(priority.as_deref(), Some("high"));
                assert_eq!(format, "table");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_export_defaults() {
        let cli = Cli::parse_from(["console", "export-tasks", "--password", "admin123"]);
        assert_eq!(cli.password.as_deref(), Some("admin123"));
        match cli.command {
            Some(Command::ExportTasks { format, output, .. }) => {
                assert_eq!(format, "csv");
                assert!(output.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_init_config_arguments() {
        let cli = Cli::parse_from(["console", "init-config", "--config", "/tmp/console.yaml", "--force"]);
        assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("/tmp/console.yaml")));
        assert!(matches!(cli.command, Some(Command::InitConfig { force: true })));
    }
}
