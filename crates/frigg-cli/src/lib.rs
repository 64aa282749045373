//! Frigg CLI library components.
//!
//! The commands are plain async functions over an [`AppContext`], so they
//! can be driven from tests with an in-memory filesystem and a scripted
//! [`Chooser`]. The binary is in `main.rs`.

pub mod chooser;
pub mod commands;
pub mod context;
pub mod display;

pub use chooser::{Chooser, DefaultChooser, PromptChooser};
pub use context::AppContext;
