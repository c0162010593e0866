//! Storage key generation
//!
//! Keys follow `<prefix>/[<source>/]dt=<YYYY>/<MM>/<DD>/<HHMMSS>-<suffix>.<ext>.gz`.
//! The `dt=` segment lets the catalog prune by day, and the zero-padded
//! date and time keep lexical order close to chronological order.

use crate::types::BatchFormat;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Directory a batch lands in: `<prefix>/[<source>/]dt=<YYYY>/<MM>/<DD>`
///
/// Empty prefix segments are dropped, so `/raw//users/` and `raw/users`
/// give the same directory.
pub fn partition_dir(prefix: &str, source: Option<&str>, at: DateTime<Utc>) -> String {
    let mut dir = prefix
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/");
    if let Some(source) = source {
        push_segment(&mut dir, &source_segment(source));
    }
    push_segment(&mut dir, &format!("dt={}", at.format("%Y/%m/%d")));
    dir
}

/// One path segment for a source name
///
/// Anything outside `[A-Za-z0-9._-]` becomes `_`, so a source never adds a
/// partition level or a percent-encoded character.
fn source_segment(source: &str) -> String {
    source
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn push_segment(path: &mut String, segment: &str) {
    if !path.is_empty() {
        path.push('/');
    }
    path.push_str(segment);
}

/// Build a batch key from explicit parts
pub fn build_batch_key(
    prefix: &str,
    source: Option<&str>,
    format: BatchFormat,
    at: DateTime<Utc>,
    suffix: &str,
) -> String {
    format!(
        "{}/{}-{suffix}.{}.gz",
        partition_dir(prefix, source, at),
        at.format("%H%M%S"),
        format.extension()
    )
}

/// Fresh unique suffix: a v4 UUID as 32 lowercase hex characters
pub fn unique_suffix() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Build a batch key for the current UTC instant with a fresh suffix
pub fn generate_batch_key(prefix: &str, source: Option<&str>, format: BatchFormat) -> String {
    build_batch_key(prefix, source, format, Utc::now(), &unique_suffix())
}
