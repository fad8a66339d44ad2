//! Application layer containing the request orchestration.
//!
//! This module defines the `SpendingService` which acts as the primary entry point
//! for lookups, statistics, rankings and high-spender registration. It reads
//! snapshots from the record store and hands them to the pure domain engines.

pub mod service;
