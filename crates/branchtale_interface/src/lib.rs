//! Trait definitions for the Branchtale story generator.
//!
//! This crate provides the seams between the generation pipeline and the
//! outside world: the language model backend and the persistence store.

mod driver;
mod repository;

pub use driver::StoryDriver;
pub use repository::StoryRepository;
