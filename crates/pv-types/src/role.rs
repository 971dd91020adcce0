use serde::{Deserialize, Serialize};
use std::fmt;

use crate::notes::NoteVisibility;

/// Dashboard audience. Authentication happens upstream; this only decides what
/// an already-authenticated viewer may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Mentor,
    Parent,
}

impl Role {
    pub fn can_see(&self, visibility: NoteVisibility) -> bool {
        match (self, visibility) {
            (Role::Mentor, _) => true,
            (Role::Student | Role::Parent, NoteVisibility::Shared) => true,
            (Role::Student | Role::Parent, NoteVisibility::Private) => false,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::Student => "student",
            Role::Mentor => "mentor",
            Role::Parent => "parent",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn private_notes_are_mentor_only() {
        assert!(Role::Mentor.can_see(NoteVisibility::Private));
        assert!(!Role::Parent.can_see(NoteVisibility::Private));
        assert!(!Role::Student.can_see(NoteVisibility::Private));
        assert!(Role::Parent.can_see(NoteVisibility::Shared));
    }

    #[test]
    fn role_wire_format() {
        let role: Role = serde_json::from_str("\"parent\"").unwrap();
        assert_eq!(role, Role::Parent);
        assert_eq!(role.to_string(), "parent");
    }
}
