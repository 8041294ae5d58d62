#![cfg_attr(not(test), forbid(clippy::unwrap_used))]

pub mod transposition_table;

/// Implementation for Monte-Carlo Tree Search
pub mod mcts;

/// Implementation for negamax search
pub mod negamax;

/// Random choice and random playouts
pub mod playout;

/// Flat Monte-Carlo agents: fixed simulation counts or time-limited rounds
pub mod simulation;

pub use connect_four_lab::prelude::*;

#[cfg(test)]
mod tests;
