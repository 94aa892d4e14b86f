// Team domain module
// Public staff directory: roles and the members holding them

#![allow(clippy::module_inception)]

pub mod team;

// Re-export main types for convenience
pub use team::{TeamMember, TeamMemberDraft, TeamRole};
