use crate::{Operation, OperationKind, Role, User};

/// Decides whether a user may invoke an operation
pub trait Authorizer {
    fn can_invoke_operation(&self, operation: &Operation, user: &User) -> bool;
}

/// Role and ownership based authorization
///
/// Rules, in order:
/// 1. users with the administrative role may do anything
/// 2. anyone may pay into any account
/// 3. withdrawals are allowed only on behalf of oneself
/// 4. everything else is denied
///
/// No IO, no side effects.
#[derive(Clone, Debug)]
pub struct RoleAuthorizer {
    admin_role: Role,
}

impl RoleAuthorizer {
    pub fn new(admin_role: Role) -> Self {
        Self { admin_role }
    }
}

impl Default for RoleAuthorizer {
    fn default() -> Self {
        Self::new(Role::new(crate::config::DEFAULT_ADMIN_ROLE))
    }
}

impl Authorizer for RoleAuthorizer {
    fn can_invoke_operation(&self, operation: &Operation, user: &User) -> bool {
        if user.role() == &self.admin_role {
            return true;
        }

        match operation.kind() {
            OperationKind::PaymentIn => true,
            OperationKind::Withdraw => operation.owner() == Some(user.id()),
            _ => false,
        }
    }
}
