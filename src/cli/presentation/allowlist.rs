//! Allowlist presentation: roots, proofs and published roots.

use super::to_json;
use crate::allowlist::{AllowlistSnapshot, ClaimBundle, PublishedRoot};
use crate::error::ApiError;
use crate::types::{format_digest, Address};

pub fn format_root_output(snapshot: &AllowlistSnapshot, format: &str) -> Result<String, ApiError> {
    let root = format_digest(&snapshot.root());
    if format == "json" {
        return to_json(&serde_json::json!({
            "root": root,
            "encoding": snapshot.encoding().to_string(),
            "leaves": snapshot.len(),
            "depth": snapshot.tree().depth(),
        }));
    }
    Ok(root)
}

pub fn format_claim_bundle(
    bundle: &ClaimBundle,
    claimant: &Address,
    abi: bool,
    format: &str,
) -> Result<String, ApiError> {
    let proof: Vec<String> = bundle.proof.iter().map(format_digest).collect();
    if format == "json" {
        let mut out = serde_json::json!({
            "claimant": claimant.to_string(),
            "root": format_digest(&bundle.root),
            "leaf": format_digest(&bundle.leaf),
            "proof": proof,
        });
        if abi {
            out["abi_proof"] = serde_json::Value::String(format!(
                "0x{}",
                hex::encode(bundle.abi_encoded_proof())
            ));
        }
        return to_json(&out);
    }

    if abi {
        return Ok(format!("0x{}", hex::encode(bundle.abi_encoded_proof())));
    }
    let mut lines = vec![
        format!("root:  {}", format_digest(&bundle.root)),
        format!("leaf:  {}", format_digest(&bundle.leaf)),
        "proof:".to_string(),
    ];
    lines.extend(proof.iter().map(|p| format!("  {}", p)));
    if bundle.occurrences > 1 {
        lines.push(format!(
            "note:  leaf appears {} times; proof covers the first",
            bundle.occurrences
        ));
    }
    Ok(lines.join("\n"))
}

pub fn format_published_root(name: &str, published: &PublishedRoot) -> String {
    format!(
        "Published {} root {} (version {}, {} encoding) by {} at {}",
        name,
        format_digest(&published.root),
        published.version,
        published.encoding,
        published.published_by,
        published.published_at.to_rfc3339()
    )
}
