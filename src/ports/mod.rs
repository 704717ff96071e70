//! Port traits at the I/O seams: data in, config in, reports out.

pub mod config_port;
pub mod data_port;
pub mod report_port;
