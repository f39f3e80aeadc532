//! The authenticated caller an operation runs on behalf of
use super::error::{EngineError, Result};
use super::model::Role;
use super::types::UserId;

/// Identity and role handed over by the authentication layer. The engine
/// trusts both and only checks them against each operation's guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: UserId,
    pub role: Role,
}

impl Actor {
    pub fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }
    pub fn admin(id: UserId) -> Self {
        Self::new(id, Role::Admin)
    }
    pub fn client(id: UserId) -> Self {
        Self::new(id, Role::Client)
    }
    pub fn customer(id: UserId) -> Self {
        Self::new(id, Role::User)
    }

    /// Fail with `Forbidden` unless the actor holds `role`
    pub fn require(&self, role: Role) -> Result<()> {
        if self.role != role {
            return Err(EngineError::Forbidden(format!(
                "{:?} role required, actor {} is {:?}",
                role, self.id, self.role
            )));
        }
        Ok(())
    }

    pub fn is(&self, user: &UserId) -> bool {
        self.id == *user
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_guard() {
        let actor = Actor::client(UserId::from("user_1"));

        assert!(actor.require(Role::Client).is_ok());
        assert!(actor.require(Role::Admin).unwrap_err().is_forbidden());
        assert!(actor.is(&UserId::from("user_1")));
    }
}
