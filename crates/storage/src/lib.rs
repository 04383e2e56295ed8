#![forbid(unsafe_code)]

pub mod flags;
pub mod repository;
pub mod sqlite;
