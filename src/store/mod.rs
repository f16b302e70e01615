//! Storage of tracking periods.
//!  - [period::Period] is a single writing challenge, [period::Periods] is the history of them.
//!  - [codec] turns periods into the human-readable text format and back.
//!  - [file_store::FileStore] keeps the encoded periods in one file and rewrites it as a whole.

pub mod codec;
pub mod file_store;
pub mod period;
