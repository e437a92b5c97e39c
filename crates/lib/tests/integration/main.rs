mod common;

mod build_tests;
mod end_to_end_tests;
