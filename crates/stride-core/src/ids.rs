//! Actor identifiers.

use std::fmt;

/// Handle to an actor in the externally owned actor registry.
///
/// The engine never owns the actor behind an ID.  It stores the ID, passes it
/// to collaborators and logs it, nothing more.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorId(pub u32);

impl From<u32> for ActorId {
    #[inline]
    fn from(raw: u32) -> Self {
        ActorId(raw)
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "actor#{}", self.0)
    }
}
