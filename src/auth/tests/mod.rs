//! Unit tests for token handling and login.

mod authenticator_tests;
