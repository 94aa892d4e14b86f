// Authentication primitives: tokens, password hashing, social login

pub mod jwt;
pub mod oauth;
pub mod password;
