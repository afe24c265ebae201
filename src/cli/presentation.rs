//! CLI presentation: text and json formatters per command family.

mod allowlist;
mod registry;

pub use allowlist::{format_claim_bundle, format_published_root, format_root_output};
pub use registry::{format_registry_list_json, format_registry_list_text};

use crate::error::{ApiError, CodecError};

pub(crate) fn to_json(value: &serde_json::Value) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| ApiError::Codec(CodecError::Encoding(e.to_string())))
}
