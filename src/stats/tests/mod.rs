//! Unit tests for statistics aggregation.
