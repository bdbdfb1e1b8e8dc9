// Library exports for integration tests and reusable components

#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod logging;
#[doc(hidden)]
pub mod ui;

pub use ui::AppContext;

pub mod channel;
pub mod duplicate;
pub mod file_drop;
pub mod gesture;

// Test support (unit tests, or integration tests with the test-utils feature)
#[cfg(any(test, feature = "test-utils"))]
pub mod test_support;
