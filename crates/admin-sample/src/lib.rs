//! # Admin Sample Library
//!
//! A concrete admin client for `User` and `Article` resources, built on
//! `admin-framework`. Exposed as a library for the integration tests.

pub mod articles;
pub mod clients;
pub mod lifecycle;
pub mod model;
pub mod users;
