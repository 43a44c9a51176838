//! Role-based access decisions

use scribe_types::Role;

use crate::AuthError;

/// Set of roles permitted to reach a resource
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoleSet {
    user: bool,
    admin: bool,
}

impl RoleSet {
    pub const fn empty() -> Self {
        Self {
            user: false,
            admin: false,
        }
    }

    /// Every defined role
    pub const fn all() -> Self {
        Self {
            user: true,
            admin: true,
        }
    }

    pub fn only(role: Role) -> Self {
        Self::empty().with(role)
    }

    pub fn with(mut self, role: Role) -> Self {
        match role {
            Role::User => self.user = true,
            Role::Admin => self.admin = true,
        }
        self
    }

    pub fn contains(&self, role: Role) -> bool {
        match role {
            Role::User => self.user,
            Role::Admin => self.admin,
        }
    }

    pub fn is_empty(&self) -> bool {
        !Role::ALL.iter().any(|role| self.contains(*role))
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with)
    }
}

impl<const N: usize> From<[Role; N]> for RoleSet {
    fn from(roles: [Role; N]) -> Self {
        roles.into_iter().collect()
    }
}

/// Admit `role` only if it is in `allowed`
pub fn authorize(allowed: &RoleSet, role: Role) -> Result<(), AuthError> {
    if allowed.contains(role) {
        Ok(())
    } else {
        Err(AuthError::Forbidden(role))
    }
}
