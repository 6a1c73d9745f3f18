//! Session user record.
//!
//! This is the record the client keeps in memory and in local storage for the
//! signed-in user. It serializes in camelCase so a record written by the
//! browser dashboard loads unchanged.

use serde::{Deserialize, Serialize};

use crate::medical::{USER_TYPE_DOCTOR, USER_TYPE_NONE, USER_TYPE_PATIENT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Doctor,
    Patient,
}

impl Role {
    /// Numeric user type used by the contract and the `UserInfo` record.
    #[must_use]
    pub fn user_type(self) -> u8 {
        match self {
            Self::Doctor => USER_TYPE_DOCTOR,
            Self::Patient => USER_TYPE_PATIENT,
        }
    }

    #[must_use]
    pub fn from_user_type(user_type: u8) -> Option<Self> {
        match user_type {
            USER_TYPE_DOCTOR => Some(Self::Doctor),
            USER_TYPE_PATIENT => Some(Self::Patient),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Doctor => "doctor",
            Self::Patient => "patient",
        }
    }
}

/// The signed-in user. `role` decides which dashboard renders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    #[serde(default)]
    pub is_registered: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub wallet_connected: bool,
}

impl User {
    /// `user_type` as reported by the contract, `0` when no role is chosen.
    #[must_use]
    pub fn user_type(&self) -> u8 {
        self.role.map_or(USER_TYPE_NONE, Role::user_type)
    }

    /// Merge a partial update. Fields absent from the patch keep their value.
    pub fn apply(&mut self, patch: UserPatch) {
        if let Some(role) = patch.role {
            self.role = Some(role);
        }
        if let Some(name) = patch.name {
            self.name = Some(name);
        }
        if let Some(specialization) = patch.specialization {
            self.specialization = Some(specialization);
        }
        if let Some(email) = patch.email {
            self.email = Some(email);
        }
        if let Some(is_registered) = patch.is_registered {
            self.is_registered = is_registered;
        }
    }
}

/// Partial profile update for [`User::apply`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub role: Option<Role>,
    pub name: Option<String>,
    pub specialization: Option<String>,
    pub email: Option<String>,
    pub is_registered: Option<bool>,
}

#[cfg(test)]
#[path = "user_test.rs"]
mod tests;
