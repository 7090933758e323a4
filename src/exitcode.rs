//! Standard exit codes (BSD sysexits.h compatible)

/// Successful termination
pub const OK: i32 = 0;

/// Command line usage error
pub const USAGE: i32 = 64;

/// Data format error (corrupt department records)
pub const DATAERR: i32 = 65;

/// Cannot open input (department or tree not found)
pub const NOINPUT: i32 = 66;

/// Internal software error
pub const SOFTWARE: i32 = 70;

/// Input/output error
pub const IOERR: i32 = 74;

/// Permission denied (forbidden delete)
pub const NOPERM: i32 = 77;

/// Configuration error
pub const CONFIG: i32 = 78;
