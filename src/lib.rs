pub mod agent;
pub mod commands;
pub mod context;
pub mod doctor;
pub mod error;
pub mod fs_utils;
pub mod git;
pub mod paths;
pub mod profiles;
pub mod resolver;
pub mod runner;
pub mod ssh;
pub mod store;
pub mod transfer;
pub mod ui;
pub mod validate;

#[cfg(test)]
pub mod test_utils;
