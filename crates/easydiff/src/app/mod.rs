//! Application layer orchestrating domain logic and infrastructure.

pub mod command;
pub mod compare;
pub mod menu;
pub mod pending;
pub mod selection;
