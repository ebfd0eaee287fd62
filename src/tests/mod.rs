mod error_tests;
mod handler_tests;
mod relay_tests;
