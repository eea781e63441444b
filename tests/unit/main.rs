//! Unit test modules.

mod library_test;
mod progression_test;
mod rotation_test;
