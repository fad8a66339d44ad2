//! Domain layer: spending records, the store port and the pure engines
//! (aggregation, ranking, bonus scoring) that operate on them.

pub mod aggregation;
pub mod bonus;
pub mod ports;
pub mod ranking;
pub mod record;
