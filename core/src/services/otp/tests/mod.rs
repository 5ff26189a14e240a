
mod cleanup_tests;
