//! Adapter contract suite against the memory backend.
//!
//! Sections mirror the adapter surface:
//! 1. Emitted INSERT statements per dialect
//! 2. Raw select/execute result shapes
//! 3. Structured reads: raw conditions, inclusion filters, query paths

pub mod create_statements;
pub mod helpers;
pub mod raw_operations;
pub mod structured_reads;
