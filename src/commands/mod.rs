pub mod aslint;
pub mod focus_order;
pub mod hover;
pub mod utils;
pub mod version;
pub mod watch;
pub mod wave;

#[cfg(test)]
#[path = "../commands_test.rs"]
mod commands_test;
