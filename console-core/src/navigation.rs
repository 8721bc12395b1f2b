//! Screens of the console and the per-session navigation state.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::auth::{self, CurrentUser};
use crate::error::{ConsoleError, ConsoleResult};
use crate::models::EntityKind;

/// A top-level screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    #[default]
    Dashboard,
    Users,
    Roles,
    Projects,
    Sprints,
    Tasks,
}

impl Screen {
    /// Every screen in menu order
    pub const ALL: [Screen; 6] = [
        Screen::Dashboard,
        Screen::Users,
        Screen::Roles,
        Screen::Projects,
        Screen::Sprints,
        Screen::Tasks,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Screen::Dashboard => "dashboard",
            Screen::Users => "users",
            Screen::Roles => "roles",
            Screen::Projects => "projects",
            Screen::Sprints => "sprints",
            Screen::Tasks => "tasks",
        }
    }

    /// Menu label
    pub fn label(&self) -> &'static str {
        match self {
            Screen::Dashboard => "Dashboard",
            Screen::Users => "User Management",
            Screen::Roles => "Roles & Rights",
            Screen::Projects => "Projects",
            Screen::Sprints => "Sprints",
            Screen::Tasks => "Task Management",
        }
    }

    /// The kind of record the screen manages; the dashboard has none
    pub fn entity_kind(&self) -> Option<EntityKind> {
        match self {
            Screen::Dashboard => None,
            Screen::Users => Some(EntityKind::User),
            Screen::Roles => Some(EntityKind::Role),
            Screen::Projects => Some(EntityKind::Project),
            Screen::Sprints => Some(EntityKind::Sprint),
            Screen::Tasks => Some(EntityKind::Task),
        }
    }

    /// Looks up a screen by id; unknown ids land on the dashboard
    pub fn from_id(id: &str) -> Screen {
        let id = id.trim();
        Screen::ALL
            .into_iter()
            .find(|s| s.id().eq_ignore_ascii_case(id))
            .unwrap_or(Screen::Dashboard)
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Who is signed in and what they are looking at
#[derive(Debug, Clone, Default)]
pub struct Session {
    user: Option<CurrentUser>,
    active_screen: Screen,
    mobile_menu_open: bool,
    home: Screen,
}

impl Session {
    /// A signed-out session that opens `home` after sign-in
    pub fn new(home: Screen) -> Self {
        Self {
            active_screen: home,
            home,
            ..Self::default()
        }
    }

    pub fn user(&self) -> Option<&CurrentUser> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn active_screen(&self) -> Screen {
        self.active_screen
    }

    pub fn mobile_menu_open(&self) -> bool {
        self.mobile_menu_open
    }

    /// Signs in and shows the home screen. A failed attempt leaves the session as it was.
    pub fn sign_in(&mut self, email: &str, password: &str) -> ConsoleResult<&CurrentUser> {
        let user = auth::sign_in(email, password)?;
        self.active_screen = self.home;
        Ok(self.user.insert(user))
    }

    /// Clears the user, returns to the dashboard and closes the menu
    pub fn sign_out(&mut self) {
        if let Some(user) = self.user.take() {
            info!("Signed out {}", user.email);
        }
        self.active_screen = Screen::Dashboard;
        self.mobile_menu_open = false;
    }

    /// Switches screens and closes the menu
    pub fn navigate(&mut self, screen: Screen) {
        debug!("Navigate {} -> {}", self.active_screen.id(), screen.id());
        self.active_screen = screen;
        self.mobile_menu_open = false;
    }

    pub fn toggle_mobile_menu(&mut self) {
        self.mobile_menu_open = !self.mobile_menu_open;
    }

    /// The signed-in user, or an error for anonymous callers
    pub fn require_auth(&self) -> ConsoleResult<&CurrentUser> {
        self.user.as_ref().ok_or(ConsoleError::NotAuthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_ids_and_labels() {
        assert_eq!(Screen::from_id("roles"), Screen::Roles);
        assert_eq!(Screen::from_id("TASKS"), Screen::Tasks);
        assert_eq!(Screen::Roles.label(), "Roles & Rights");
        assert_eq!(Screen::Tasks.to_string(), "Task Management");
        assert_eq!(Screen::Sprints.entity_kind(), Some(EntityKind::Sprint));
        assert_eq!(Screen::Dashboard.entity_kind(), None);
    }

    #[test]
    fn test_unknown_screen_falls_back_to_dashboard() {
        assert_eq!(Screen::from_id("reports"), Screen::Dashboard);
        assert_eq!(Screen::from_id(""), Screen::Dashboard);
    }

    #[test]
    fn test_sign_in_and_out() {
        let mut session = Session::new(Screen::Dashboard);
        assert!(!session.is_authenticated());
        assert!(matches!(session.require_auth(), Err(ConsoleError::NotAuthenticated)));

        let user = session.sign_in("admin@company.com", "admin123").unwrap();
        assert_eq!(user.role, "Super Admin");
        assert!(session.is_authenticated());

        session.navigate(Screen::Sprints);
        session.toggle_mobile_menu();
        assert!(session.mobile_menu_open());

        session.sign_out();
        assert!(!session.is_authenticated());
        assert_eq!(session.active_screen(), Screen::Dashboard);
        assert!(!session.mobile_menu_open());
    }

    #[test]
    fn test_failed_sign_in_keeps_session_anonymous() {
        let mut session = Session::new(Screen::Dashboard);
        let err = session.sign_in("admin@company.com", "nope").unwrap_err();
        assert_eq!(err.to_string(), "Invalid credentials");
        assert!(session.user().is_none());
    }

    #[test]
    fn test_navigate_closes_menu() {
        let mut session = Session::new(Screen::Dashboard);
        session.toggle_mobile_menu();
        session.navigate(Screen::Users);
        assert_eq!(session.active_screen(), Screen::Users);
        assert!(!session.mobile_menu_open());
    }

    #[test]
    fn test_sign_in_opens_home_screen() {
        let mut session = Session::new(Screen::Tasks);
        session.sign_in("admin@company.com", "admin123").unwrap();
        assert_eq!(session.active_screen(), Screen::Tasks);
    }
}
