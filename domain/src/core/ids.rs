//! Identifier value objects.
//!
//! Every entity in the governance model is addressed by a string newtype so
//! that a session id can never be passed where a workflow id is expected.
//!
//! - [`GroupId`] - the group that owns sessions and workflows
//! - [`MemberId`] - a group member (voter, admin or step assignee)
//! - [`SessionId`] / [`OptionId`] - voting sessions and their choices
//! - [`WorkflowId`] / [`StepId`] - workflows and their ordered steps

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates the id from an existing string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the id as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id!(
    /// Identifier of a group (the owner of sessions and workflows).
    GroupId
);

string_id!(
    /// Identifier of a group member.
    MemberId
);

string_id!(
    /// Identifier of a voting session.
    SessionId
);

string_id!(
    /// Identifier of a choice within a voting session.
    OptionId
);

string_id!(
    /// Identifier of a workflow.
    WorkflowId
);

string_id!(
    /// Identifier of a step, unique within its workflow.
    StepId
);

impl SessionId {
    /// Generates a fresh random session id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl WorkflowId {
    /// Generates a fresh random workflow id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}
