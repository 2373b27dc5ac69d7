//! Unit tests for the advisory side-call.
