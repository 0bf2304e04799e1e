//! Container lookup and exec launching for nsjoin.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod exec;
pub mod state;
