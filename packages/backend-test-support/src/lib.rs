//! Helpers shared by the backend's integration tests.

pub mod logging;
pub mod problem_details;
pub mod unique_helpers;

pub use problem_details::assert_problem_details;
pub use unique_helpers::{unique_email, unique_str};
