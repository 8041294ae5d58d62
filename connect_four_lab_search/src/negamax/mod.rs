pub mod search;
pub mod transposition_table;

pub use crate::negamax::search::{NegamaxConfig, NegamaxSearch};
pub use crate::negamax::transposition_table::{Probe, TTEntry, TTKey, Value, TT};
