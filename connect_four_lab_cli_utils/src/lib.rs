#![cfg_attr(not(test), forbid(clippy::unwrap_used))]

pub mod cli_args;
