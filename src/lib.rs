//! Word count tracker for writing challenges. Keeps the daily totals of a writing period in a
//! readable text file and shows the same statistics a writing challenge dashboard would: pace,
//! words left and the day you'll finish on.
//!

pub mod chart;
pub mod cli;
pub mod error;
pub mod stats;
pub mod store;
pub mod tracker;
pub mod utils;
