//! Integration tests for conv2md.


mod cli_test;
mod converter_test;
mod filename_test;
