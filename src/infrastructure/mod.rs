// Infrastructure layer module
// Contains database adapters and external service integrations
// Follows Hexagonal Architecture

pub mod db;
pub mod repositories;
pub mod storage;
