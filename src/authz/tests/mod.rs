//! Unit tests for the authorization guard.

mod guard_tests;
