//! Batch encoding and gzip compression

use crate::error::{Error, Result};
use crate::types::{BatchFormat, JsonValue};
use bytes::Bytes;
use chrono::{DateTime, SecondsFormat, Utc};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

#[derive(Serialize)]
struct WrappedBatch<'a, T> {
    ingested_at: String,
    records: &'a [T],
}

/// A batch read back from storage
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DecodedBatch {
    /// Present for wrapped JSON batches only
    #[serde(default)]
    pub ingested_at: Option<String>,
    pub records: Vec<JsonValue>,
}

/// `ingested_at` stamp: second precision, trailing `Z`
pub fn format_ingested_at(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Serialize records as one `{ingested_at, records}` document
pub fn encode_wrapped<T: Serialize>(records: &[T], ingested_at: DateTime<Utc>) -> Result<Vec<u8>> {
    let batch = WrappedBatch {
        ingested_at: format_ingested_at(ingested_at),
        records,
    };
    Ok(serde_json::to_vec(&batch)?)
}

/// Serialize records as newline-delimited compact JSON
///
/// No trailing newline. Non-ASCII text is written as UTF-8, not escaped.
pub fn encode_ndjson<T: Serialize>(records: &[T]) -> Result<Vec<u8>> {
    let lines = records
        .iter()
        .map(serde_json::to_string)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(lines.join("\n").into_bytes())
}

/// Gzip a buffer
pub fn gzip(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Gunzip a buffer, passing through data that is not gzip-framed
pub fn gunzip(data: &[u8]) -> Result<Vec<u8>> {
    if !data.starts_with(&GZIP_MAGIC) {
        return Ok(data.to_vec());
    }
    let mut decoder = GzDecoder::new(data);
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(|e| Error::decode(format!("Invalid gzip stream: {e}")))?;
    Ok(out)
}

/// Encode and compress a batch in the given format
pub fn encode_batch<T: Serialize>(
    records: &[T],
    format: BatchFormat,
    ingested_at: DateTime<Utc>,
) -> Result<Bytes> {
    let raw = match format {
        BatchFormat::WrappedJson => encode_wrapped(records, ingested_at)?,
        BatchFormat::Ndjson => encode_ndjson(records)?,
    };
    Ok(Bytes::from(gzip(&raw)?))
}

/// Decompress and parse a batch written by [`encode_batch`]
pub fn decode_batch(data: &[u8], format: BatchFormat) -> Result<DecodedBatch> {
    let raw = gunzip(data)?;
    match format {
        BatchFormat::WrappedJson => serde_json::from_slice(&raw)
            .map_err(|e| Error::decode(format!("Invalid wrapped JSON batch: {e}"))),
        BatchFormat::Ndjson => {
            let text = std::str::from_utf8(&raw)
                .map_err(|e| Error::decode(format!("NDJSON batch is not UTF-8: {e}")))?;
            let records = text
                .lines()
                .enumerate()
                .filter(|(_, line)| !line.trim().is_empty())
                .map(|(idx, line)| {
                    serde_json::from_str(line).map_err(|e| {
                        Error::decode(format!("Invalid NDJSON on line {}: {e}", idx + 1))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(DecodedBatch {
                ingested_at: None,
                records,
            })
        }
    }
}
