//! Core types and definitions for the Garden Defense simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! entity records, commands, state snapshots, events, balance data and
//! tuning rules. It has no dependency on the ECS or any runtime framework.

pub mod balance;
pub mod commands;
pub mod components;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod maps;
pub mod rules;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;
