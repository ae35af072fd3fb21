// src/services/scope.rs
//
// Quem está chamando e quais barbearias essa pessoa enxerga.

use crate::{common::error::AppError, models::auth::UserAccount};

/// Identidade recarregada do banco a cada requisição (ver middleware::auth).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub id: i64,
    pub username: String,
    pub is_master: bool,
    pub is_staff: bool,
}

impl From<&UserAccount> for UserIdentity {
    fn from(account: &UserAccount) -> Self {
        Self {
            id: account.user.id,
            username: account.user.username.clone(),
            is_master: account.profile.is_master,
            is_staff: account.user.is_staff,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Principal {
    #[default]
    Anonymous,
    User(UserIdentity),
}

impl Principal {
    pub fn user(&self) -> Option<&UserIdentity> {
        match self {
            Principal::Anonymous => None,
            Principal::User(identity) => Some(identity),
        }
    }

    /// Escritas exigem credencial.
    pub fn require_user(&self) -> Result<&UserIdentity, AppError> {
        self.user().ok_or(AppError::Unauthorized)
    }
}

/// Conjunto de barbearias visíveis para um principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Nenhuma (anônimo).
    None,
    /// Todas (master ou admin).
    All,
    /// Só as que pertencem a este usuário.
    OwnedBy(i64),
}

impl Scope {
    pub fn permits(&self, owner_id: i64) -> bool {
        match self {
            Scope::None => false,
            Scope::All => true,
            Scope::OwnedBy(user_id) => *user_id == owner_id,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Scope::None)
    }
}

pub fn resolve_scope(principal: &Principal) -> Scope {
    match principal {
        Principal::Anonymous => Scope::None,
        Principal::User(identity) if identity.is_master || identity.is_staff => Scope::All,
        Principal::User(identity) => Scope::OwnedBy(identity.id),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn user(id: i64, is_master: bool, is_staff: bool) -> Principal {
        Principal::User(UserIdentity {
            id,
            username: format!("user{id}"),
            is_master,
            is_staff,
        })
    }

    #[rstest]
    #[case(Principal::Anonymous, Scope::None)]
    #[case(user(7, false, false), Scope::OwnedBy(7))]
    #[case(user(7, true, false), Scope::All)]
    #[case(user(7, false, true), Scope::All)]
    fn scope_follows_principal_flags(#[case] principal: Principal, #[case] expected: Scope) {
        assert_eq!(resolve_scope(&principal), expected);
    }

    #[test]
    fn owned_scope_only_permits_its_owner() {
        let scope = Scope::OwnedBy(1);
        assert!(scope.permits(1));
        assert!(!scope.permits(2));
        assert!(!Scope::None.permits(1));
        assert!(Scope::All.permits(42));
    }

    #[test]
    fn anonymous_cannot_write() {
        assert!(matches!(
            Principal::Anonymous.require_user(),
            Err(AppError::Unauthorized)
        ));
        assert!(user(3, false, false).require_user().is_ok());
    }
}
