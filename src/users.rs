//! User administration records.

use serde::{Deserialize, Serialize};

use crate::forms::{require_text, FormError};
use crate::session::UserType;

/// Public profile of a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Backend identity.
    #[serde(alias = "id")]
    pub user_id: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Login email.
    pub email: String,
    /// Contact phone number.
    #[serde(default)]
    pub phone_number: String,
    /// Role.
    #[serde(alias = "type")]
    pub user_type: UserType,
}

/// A validated payload for creating a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewUser {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Login email.
    pub email: String,
    /// Contact phone number.
    pub phone_number: String,
    /// Role.
    #[serde(rename = "type")]
    pub user_type: UserType,
}

impl NewUser {
    /// Validates the required fields.
    ///
    /// # Errors
    ///
    /// Returns an error if a name or the email is empty.
    pub fn new(
        first_name: &str,
        last_name: &str,
        email: &str,
        phone_number: &str,
        user_type: UserType,
    ) -> Result<Self, FormError> {
        Ok(Self {
            first_name: require_text("first name", first_name)?,
            last_name: require_text("last name", last_name)?,
            email: require_text("email", email)?,
            phone_number: phone_number.trim().to_string(),
            user_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_user_serializes_role_as_type() {
        let user =
            NewUser::new("Ada", "Lovelace", "ada@school.test", "", UserType::Teacher).unwrap();
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["type"], 1);
    }

    #[test]
    fn new_user_requires_email() {
        let err = NewUser::new("Ada", "Lovelace", "", "", UserType::Student).unwrap_err();
        assert_eq!(err, FormError::Empty("email"));
    }
}
