use clubhub_core::UserId;

/// Authenticated caller identity for a request.
///
/// Only the id travels with the request; memberships and roles are read
/// fresh from the store by each operation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CallerContext {
    user_id: UserId,
}

impl CallerContext {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }
}
