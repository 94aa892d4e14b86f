// HTTP handlers, one module per resource

pub mod auth;
pub mod categories;
pub mod jobs;
pub mod locations;
pub mod media;
pub mod optional_fields;
pub mod reviews;
pub mod social;
pub mod team;
