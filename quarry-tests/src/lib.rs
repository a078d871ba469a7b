mod scripted;
mod simple;
mod users;

pub use scripted::*;

use crate::{simple::simple, users::users};
use log::LevelFilter;
use quarry_core::Connection;
use std::env;

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

/// Scenarios run against a live server, they create and drop their own tables.
pub fn execute_tests(connection: &mut Connection) {
    simple(connection);
    users(connection);
}

#[macro_export]
macro_rules! silent_logs {
    ($($code:tt)+) => {{
        let level = log::max_level();
        log::set_max_level(log::LevelFilter::Off);
        let result = { $($code)+ };
        log::set_max_level(level);
        result
    }};
}
