use uuid::Uuid;

/// The identity an action is attributed to.
///
/// Unauthenticated paths resolve to `Anonymous`, which the rate limiter
/// lets through without recording state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    User(Uuid),
    Anonymous,
}

impl Actor {
    /// Resolve an actor from an optional authenticated user id.
    pub fn from_user(user_id: Option<Uuid>) -> Self {
        match user_id {
            Some(id) => Actor::User(id),
            None => Actor::Anonymous,
        }
    }

    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            Actor::User(id) => Some(*id),
            Actor::Anonymous => None,
        }
    }
}
