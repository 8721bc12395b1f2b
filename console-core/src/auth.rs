//! Sign-in against the console's single built-in account.

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{ConsoleError, ConsoleResult};

/// Email of the built-in administrator account
pub const ADMIN_EMAIL: &str = "admin@company.com";
/// Password of the built-in administrator account
pub const ADMIN_PASSWORD: &str = "admin123";

/// The signed-in user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
}

/// Checks an email/password pair against the built-in account.
///
/// The comparison is exact; nothing is trimmed or case-folded.
pub fn sign_in(email: &str, password: &str) -> ConsoleResult<CurrentUser> {
    if email != ADMIN_EMAIL || password != ADMIN_PASSWORD {
        warn!("Sign-in rejected for {:?}", email);
        return Err(ConsoleError::InvalidCredentials);
    }
    info!("Signed in as {}", email);
    Ok(CurrentUser {
        id: "1".to_string(),
        name: "Admin User".to_string(),
        email: email.to_string(),
        role: "Super Admin".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_in_success() {
        let user = sign_in("admin@company.com", "admin123").unwrap();
        assert_eq!(user.id, "1");
        assert_eq!(user.name, "Admin User");
        assert_eq!(user.role, "Super Admin");
        assert_eq!(user.email, "admin@company.com");
    }

    #[test]
    fn test_sign_in_rejects_other_pairs() {
        for (email, password) in [
            ("admin@company.com", "wrong"),
            ("someone@company.com", "admin123"),
            ("ADMIN@company.com", "admin123"),
            (" admin@company.com", "admin123"),
            ("", ""),
        ] {
            let err = sign_in(email, password).unwrap_err();
            assert_eq!(err.to_string(), "Invalid credentials");
        }
    }
}
