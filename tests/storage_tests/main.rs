//! Storage layer tests
