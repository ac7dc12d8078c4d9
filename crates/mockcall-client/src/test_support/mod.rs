//! Test doubles shared by the coordinator tests.

pub mod mocks;
