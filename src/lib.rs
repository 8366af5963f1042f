#![recursion_limit = "1024"]

pub mod data;
pub mod vouchers;
