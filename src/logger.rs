//! Request tracing hooks.
//!
//! The gateway reports what it does through a [`Logger`] handed to it at
//! construction. [`LogLogger`] forwards to the `log` facade so the usual
//! `RUST_LOG` filtering applies; [`NullLogger`] keeps quiet.

use crate::{Error, Method};

pub trait Logger: Send + Sync {
    fn request(&self, _method: Method, _url: &str, _query: &str) {}

    fn response(&self, _method: Method, _url: &str, _status: u16) {}

    fn failed(&self, _method: Method, _url: &str, _error: &Error) {}

    /// A header dropped because it was malformed under lenient validation.
    fn header_skipped(&self, _name: &str, _reason: &str) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LogLogger;

impl Logger for LogLogger {
    fn request(&self, method: Method, url: &str, query: &str) {
        log::debug!("Performing {} request to: {} with args: {}", method, url, query);
    }

    fn response(&self, method: Method, url: &str, status: u16) {
        log::debug!("{} {} answered with status code: {}", method, url, status);
    }

    fn failed(&self, method: Method, url: &str, error: &Error) {
        log::error!("{} {} failed: {}", method, url, error);
    }

    fn header_skipped(&self, name: &str, reason: &str) {
        log::warn!("Skipping header {}: {}", name, reason);
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullLogger;

impl Logger for NullLogger {}
