mod publish_tests;
mod utils;
