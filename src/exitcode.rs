//! Process exit codes

/// Successful termination
pub const OK: i32 = 0;

/// Any failure: bad arguments, missing directory, unknown command, help
/// request or a failed command
pub const FAILURE: i32 = 1;
