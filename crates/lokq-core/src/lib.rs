//! Core of the lokq interactive query builder: session data model, time
//! normalization, the prompt-driven state machine, and command rendering.
//! Terminal and subprocess concerns live in the CLI crate behind the
//! `Prompter` and `LabelSource` traits.

pub mod builder;
pub mod cache;
pub mod error;
pub mod query;
pub mod render;
pub mod time;
