//! Record normalization module
//!
//! Maps each source's JSON shape onto one flat [`NormalizedRecord`].
//!
//! # Overview
//!
//! Every source has a typed input struct and a field-by-field mapping. A
//! missing nested object is read as empty and a missing leaf becomes `null`,
//! so sparse records normalize instead of failing. Raw sources skip the
//! mapping and pass their records through.

mod normalizers;
mod types;

pub use normalizers::{
    normalize_body, normalizer_for, to_list, JsonplaceholderNormalizer, RandomuserNormalizer,
};
pub use types::{NormalizedRecord, RecordNormalizer, Records};
