//! User registration and lookup.

use tracing::info;

use crate::catalog::CatalogProvider;
use crate::error::{AuditError, Result};
use crate::ids::IdGenerator;
use crate::types::{Role, User};

/// Input for [`register`].
#[derive(Debug, Clone)]
pub struct Registration {
    /// Display name.
    pub name: String,
    /// Contact email, used to select the acting user.
    pub email: String,
    /// Declared role.
    pub role: Role,
    /// Home area.
    pub area: String,
}

/// Register a new user and return it.
///
/// Name, email and area are trimmed before validation.
///
/// # Errors
///
/// [`AuditError::Validation`] when name or email is empty, or when the area
/// is not in the catalog.
pub fn register<'a>(
    users: &'a mut Vec<User>,
    provider: &CatalogProvider,
    input: Registration,
    ids: &mut dyn IdGenerator,
) -> Result<&'a User> {
    let name = input.name.trim();
    let email = input.email.trim();
    let area = input.area.trim();
    if name.is_empty() {
        return Err(AuditError::Validation("name is required".to_owned()));
    }
    if email.is_empty() {
        return Err(AuditError::Validation("email is required".to_owned()));
    }
    if !provider.has_area(area) {
        return Err(AuditError::Validation(format!("unknown area: {area}")));
    }

    let user = User {
        id: ids.next_id(),
        name: name.to_owned(),
        email: email.to_owned(),
        role: input.role,
        area: area.to_owned(),
    };
    info!(user_id = %user.id, role = %user.role, area = %user.area, "user registered");
    users.push(user);
    let last = users.len().saturating_sub(1);
    Ok(&users[last])
}

/// First user registered with `email`, compared case-insensitively.
pub fn find_user<'a>(users: &'a [User], email: &str) -> Option<&'a User> {
    let email = email.trim();
    users.iter().find(|u| u.email.eq_ignore_ascii_case(email))
}
