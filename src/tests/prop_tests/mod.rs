mod generator;
use generator::*;

use proptest::prelude::*;

use crate::prelude::*;

pub mod win_detection;

pub mod zobrist_hash;
