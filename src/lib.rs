pub mod catalog;
pub mod console;
pub mod error;
pub mod filters;
pub mod loader;
pub mod output;
pub mod pager;
pub mod session;
pub mod stats;
