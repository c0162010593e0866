//! Output module
//!
//! Turns record lists into compressed batch objects.
//!
//! # Overview
//!
//! - `encode` - wrapped JSON or NDJSON, then gzip
//! - `key` - Hive-style `dt=YYYY/MM/DD` keys with a unique suffix
//! - `writer` - uploads a batch with content metadata

mod encode;
mod key;
mod writer;

pub use encode::{
    decode_batch, encode_batch, encode_ndjson, encode_wrapped, format_ingested_at, gunzip, gzip,
    DecodedBatch,
};
pub use key::{build_batch_key, generate_batch_key, partition_dir, unique_suffix};
pub use writer::{BatchWriter, WriteResult};
