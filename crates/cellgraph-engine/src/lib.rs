//! cellgraph_engine - Expression parsing, evaluation and dependency tracking.

pub mod engine;
