pub mod by_player;

pub mod player_id;

/// Board state, move application and win detection.
pub mod board;
