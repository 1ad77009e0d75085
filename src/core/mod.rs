//! This module constitutes the core, headless, and host-agnostic editing engine of scripter.
//! It manages the text buffer and its cursor, modal chord dispatch, the register,
//! incremental syntax highlighting, and goto-definition over the loaded script.

pub mod buffer;
pub mod command;
pub mod command_line;
pub mod commands;
pub mod cursor;
pub mod cursor_memory;
pub mod definition;
pub mod dispatcher;
pub mod editor;
pub mod error;
pub mod grammar;
pub mod input;
pub mod insert;
pub mod keymap;
pub mod mode;
pub mod motion;
pub mod register;
pub mod search;
pub mod syntax;
pub mod text;
pub mod undo_group;
pub mod window;
