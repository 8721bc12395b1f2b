//! Fixed option lists offered by the console forms.

use crate::models::Role;

/// Roles a user account can be assigned to
pub const ROLE_OPTIONS: &[&str] = &[
    "Super Admin",
    "Admin",
    "Project Manager",
    "Developer",
    "Designer",
    "Tester",
];

/// People tasks can be assigned to
pub const ASSIGNEES: &[&str] = &[
    "John Doe",
    "Jane Smith",
    "Mike Johnson",
    "Sarah Wilson",
    "Tom Brown",
];

/// A grantable permission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Permission {
    pub id: &'static str,
    pub label: &'static str,
    pub category: &'static str,
}

const fn perm(id: &'static str, label: &'static str, category: &'static str) -> Permission {
    Permission { id, label, category }
}

/// Every permission a role can hold, in display order
pub const PERMISSIONS: &[Permission] = &[
    perm("user.create", "Create Users", "User Management"),
    perm("user.read", "View Users", "User Management"),
    perm("user.update", "Edit Users", "User Management"),
    perm("user.delete", "Delete Users", "User Management"),
    perm("project.create", "Create Projects", "Project Management"),
    perm("project.read", "View Projects", "Project Management"),
    perm("project.update", "Edit Projects", "Project Management"),
    perm("project.delete", "Delete Projects", "Project Management"),
    perm("sprint.create", "Create Sprints", "Sprint Management"),
    perm("sprint.read", "View Sprints", "Sprint Management"),
    perm("sprint.update", "Edit Sprints", "Sprint Management"),
    perm("sprint.delete", "Delete Sprints", "Sprint Management"),
    perm("task.create", "Create Tasks", "Task Management"),
    perm("task.read", "View Tasks", "Task Management"),
    perm("task.update", "Edit Tasks", "Task Management"),
    perm("task.delete", "Delete Tasks", "Task Management"),
];

/// Groups the catalog by category, keeping first-seen category order
pub fn permissions_by_category() -> Vec<(&'static str, Vec<&'static Permission>)> {
    let mut groups: Vec<(&'static str, Vec<&'static Permission>)> = Vec::new();
    for permission in PERMISSIONS {
        match groups.iter_mut().find(|(cat, _)| *cat == permission.category) {
            Some((_, members)) => members.push(permission),
            None => groups.push((permission.category, vec![permission])),
        }
    }
    groups
}

/// Short badge text for a permission id: the action after the first '.'
///
/// Ids without a dot are shown whole.
pub fn permission_badge(id: &str) -> &str {
    id.split_once('.').map(|(_, action)| action).unwrap_or(id)
}

/// Badges a role card shows before collapsing the rest into "+n more"
pub const BADGE_LIMIT: usize = 3;

/// Display text of a role card
#[derive(Debug, Clone, PartialEq)]
pub struct RoleCard<'a> {
    /// `Permissions (<n>)`
    pub heading: String,
    pub badges: Vec<&'a str>,
    /// `+<n> more` when more than [`BADGE_LIMIT`] permissions are held
    pub more: Option<String>,
    /// `<n> users assigned`
    pub users: String,
}

impl<'a> RoleCard<'a> {
    pub fn new(role: &'a Role) -> Self {
        let held = role.permissions.len();
        Self {
            heading: format!("Permissions ({})", held),
            badges: role
                .permissions
                .iter()
                .take(BADGE_LIMIT)
                .map(|p| permission_badge(p))
                .collect(),
            more: (held > BADGE_LIMIT).then(|| format!("+{} more", held - BADGE_LIMIT)),
            users: format!("{} users assigned", role.user_count),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    #[test]
    fn test_permissions_grouped_in_catalog_order() {
        let groups = permissions_by_category();
        let categories: Vec<&str> = groups.iter().map(|(c, _)| *c).collect();
        assert_eq!(
            categories,
            vec![
                "User Management",
                "Project Management",
                "Sprint Management",
                "Task Management"
            ]
        );
        assert!(groups.iter().all(|(_, members)| members.len() == 4));
        assert_eq!(groups[2].1[0].id, "sprint.create");
    }

    #[test]
    fn test_permission_badge() {
        assert_eq!(permission_badge("project.update"), "update");
        assert_eq!(permission_badge("audit"), "audit");
    }

    #[test]
    fn test_role_card() {
        let roles = seed::roles();
        let card = RoleCard::new(&roles[2]);
        assert_eq!(card.heading, "Permissions (5)");
        assert_eq!(card.badges, vec!["read", "read", "create"]);
        assert_eq!(card.more.as_deref(), Some("+2 more"));
        assert_eq!(card.users, "12 users assigned");
    }

    #[test]
    fn test_role_card_without_permissions() {
        let mut role = seed::roles().remove(0);
        role.permissions.clear();
        role.user_count = 0;
        let card = RoleCard::new(&role);
        assert_eq!(card.heading, "Permissions (0)");
        assert!(card.badges.is_empty());
        assert_eq!(card.more, None);
        assert_eq!(card.users, "0 users assigned");
    }
}
