//! Job Board API Library
//!
//! Classified listings with administrator-defined optional fields, social
//! login, reviews and a team directory, exposed as a REST API.

pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod services;
