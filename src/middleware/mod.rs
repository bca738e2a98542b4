//! Request middleware: access-key extraction and upload form parsing.

pub mod auth;
pub mod uploads;
