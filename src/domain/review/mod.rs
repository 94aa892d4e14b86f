// Review domain module

#![allow(clippy::module_inception)]

pub mod review;
pub mod value_objects;

pub use review::{Review, ReviewDraft};
pub use value_objects::Rating;
