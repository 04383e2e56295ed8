#![forbid(unsafe_code)]

pub mod deployment;
pub mod error;
pub mod header;
pub mod model;
pub mod steps;
pub mod subscription;
pub mod time;

pub use error::Error;
pub use time::Clock;
