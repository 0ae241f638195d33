//! User model for storage and API.

use crate::error::FieldError;
use crate::models::mutation::{set_bool, set_text, FieldValue};
use serde::{Deserialize, Serialize};

/// User profile stored in Firestore.
///
/// Credentials live with the auth provider and are never stored here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// User ID (also used as document ID)
    pub id: u64,
    /// Email address
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub user_site: String,
    /// Whether the user opted out of notification emails
    #[serde(default)]
    pub email_opt_out: bool,
}

impl User {
    pub fn new(id: u64, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            first_name: String::new(),
            last_name: String::new(),
            bio: String::new(),
            city: String::new(),
            phone: String::new(),
            user_site: String::new(),
            email_opt_out: false,
        }
    }

    /// Set one profile column from a sanitized update.
    pub fn apply(&mut self, name: &str, value: &FieldValue) -> Result<(), FieldError> {
        match name {
            "first_name" => self.first_name = set_text(name, value)?,
            "last_name" => self.last_name = set_text(name, value)?,
            "bio" => self.bio = set_text(name, value)?,
            "city" => self.city = set_text(name, value)?,
            "phone" => self.phone = set_text(name, value)?,
            "user_site" => self.user_site = set_text(name, value)?,
            "email_opt_out" => self.email_opt_out = set_bool(name, value)?,
            "id" | "email" | "password" => {
                return Err(FieldError::ImmutableField(name.to_string()))
            }
            _ => return Err(FieldError::UnknownField(name.to_string())),
        }
        Ok(())
    }
}
