use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::id::ObjectId;
use crate::error::FieldError;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    User,
    Editor,
    Admin,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct User {
    pub id: ObjectId,

    pub username: String,

    pub email: String,

    #[serde(default)]
    pub role: Role,

    pub joined: DateTime<Utc>,

    #[serde(default)]
    pub verified: bool,
}

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r".+@.+\..+").expect("static email pattern"))
}

impl User {
    pub fn validate(username: &str, email: &str, now: DateTime<Utc>) -> Result<User, Vec<FieldError>> {
        let username = username.trim();
        let email = email.trim();
        let mut errors = Vec::new();

        if username.is_empty() {
            errors.push(FieldError::new("username", "Username cannot be blank"));
        }
        if email.is_empty() {
            errors.push(FieldError::new("email", "Email cannot be blank"));
        } else if !email_re().is_match(email) {
            errors.push(FieldError::new("email", "Please enter a valid email address"));
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(User {
            id: ObjectId::new(),
            username: username.to_string(),
            email: email.to_string(),
            role: Role::default(),
            joined: now,
            verified: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_user() {
        let u = User::validate(" ana ", "ana@example.org", Utc::now()).unwrap();
        assert_eq!(u.username, "ana");
        assert_eq!(u.role, Role::User);
        assert!(!u.verified);
    }

    #[test]
    fn reports_each_bad_field() {
        let errors = User::validate("", "not-an-email", Utc::now()).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["username", "email"]);
    }
}
