#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use records::Role;

/// Login page input: role picker plus profile fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub role: Option<Role>,
    pub name: String,
    pub specialization: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Please select a role")]
    MissingRole,
    #[error("Name is required")]
    MissingName,
    #[error("Specialization is required")]
    MissingSpecialization,
}

/// Validated form contents. `specialization` is only set for doctors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    pub role: Role,
    pub name: String,
    pub specialization: Option<String>,
}

impl LoginForm {
    #[must_use]
    pub fn new(role: Role, name: &str, specialization: &str) -> Self {
        Self { role: Some(role), name: name.to_owned(), specialization: specialization.to_owned() }
    }

    /// # Errors
    ///
    /// Returns the first [`FormError`] that keeps the form from continuing.
    pub fn validate(&self) -> Result<Credentials, FormError> {
        let role = self.role.ok_or(FormError::MissingRole)?;
        let name = self.name.trim();
        if name.is_empty() {
            return Err(FormError::MissingName);
        }

        let specialization = match role {
            Role::Doctor => {
                let specialization = self.specialization.trim();
                if specialization.is_empty() {
                    return Err(FormError::MissingSpecialization);
                }
                Some(specialization.to_owned())
            }
            Role::Patient => None,
        };

        Ok(Credentials { role, name: name.to_owned(), specialization })
    }

    /// Whether the continue action is enabled.
    #[must_use]
    pub fn can_continue(&self) -> bool {
        self.validate().is_ok()
    }
}
