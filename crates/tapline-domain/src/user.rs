//! Session identity

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Engineer,
    Surveyor,
}

/// A logged-in user. There is no real authentication; the username is a
/// self-declared display identity used for audit entries and presence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub role: Role,
}

impl User {
    pub fn new(username: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_wire_strings() {
        let user = User::new("ramesh", Role::Surveyor);
        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("\"role\":\"Surveyor\""));
        let back: User = serde_json::from_str(&json).unwrap();
        assert_eq!(back, user);
    }
}
