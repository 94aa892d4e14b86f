// Domain layer module exports
// Following Hexagonal Architecture and DDD principles
// Domain is independent of infrastructure concerns

pub mod ads;
pub mod errors;
pub mod pagination;
pub mod repositories;
pub mod review;
pub mod team;
pub mod user;
pub mod validation;
