//! HTTP fetch module
//!
//! One anonymous GET per source. No custom headers, no timeout and no retry:
//! a bad status comes back as `ok: false` for the pipeline to degrade on,
//! while transport and parse failures are returned as errors.

mod client;

pub use client::{FetchResult, HttpClient};

#[cfg(test)]
mod tests;
