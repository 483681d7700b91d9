mod macros;

pub mod config;
pub mod events;
pub mod gui;
pub mod resources;
pub mod sys;
