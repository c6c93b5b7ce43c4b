//! exit codes for acto commands
//!
//! these follow Unix conventions where 0 = success and non-zero = error
//! specific codes help scripts distinguish between failure types

#![allow(dead_code)]

/// command completed successfully
pub const SUCCESS: i32 = 0;

/// general or unknown error
pub const ERROR: i32 = 1;

/// report or export could not be written
pub const OUTPUT_ERROR: i32 = 2;

/// invalid command-line arguments
pub const INVALID_ARGS: i32 = 4;

/// configuration file error
pub const CONFIG_ERROR: i32 = 5;
