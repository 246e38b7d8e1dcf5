//! The CIP-25 validation pipeline: decode, size guard, `721` tag, policy
//! cardinality, per-asset rules. Stages run in order and the first error is
//! the result; nothing after it runs.
use serde_json::error::Category;
use serde_json::{Map, Value};
use tracing::debug;
use url::Url;

use crate::cip25::core::{Asset, CnftData, FileMetadata, MediaSource, NftType};
use crate::cip25::errors::MetadataError;

/// Approximation of the on-chain transaction metadata limit.
pub const DEFAULT_MAX_METADATA_BYTES: usize = 16 * 1024;

const METADATUM_TAG: &str = "721";
const RESERVED_ASSET_KEYS: [&str; 5] = ["name", "image", "mediaType", "description", "files"];
const MAX_IMAGE_CHUNK_CHARS: usize = 64;
const IPFS_PREFIX: &str = "ipfs://";

/// Knobs for a validation call. The size ceiling is provisional (the true
/// protocol limit depends on the metadata encoding), so it stays
/// configurable; the error message text does not change with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub max_metadata_bytes: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_metadata_bytes: DEFAULT_MAX_METADATA_BYTES,
        }
    }
}

/// Validate a raw JSON string as CIP-25 metadata.
pub fn parse_cnft(raw: &str) -> Result<CnftData, MetadataError> {
    parse_cnft_with(raw, &ParseOptions::default())
}

/// Validate with explicit options.
pub fn parse_cnft_with(raw: &str, options: &ParseOptions) -> Result<CnftData, MetadataError> {
    let json = decode_json(raw)?;
    check_metadata_size(&json, options.max_metadata_bytes)?;
    let metadatum = metadatum_721(&json)?;
    let (policy_id, asset_entries) = resolve_policy(metadatum)?;
    debug!(policy_id, "resolved policy");
    let assets = collect_assets(asset_entries)?;
    debug!(asset_count = assets.len(), "validated CIP-25 metadata");
    Ok(CnftData {
        policy_id: policy_id.to_string(),
        assets,
    })
}

fn decode_json(raw: &str) -> Result<Value, MetadataError> {
    let json = match serde_json::from_str::<Value>(raw) {
        Ok(json) => json,
        Err(err) => match err.classify() {
            Category::Syntax | Category::Eof => return Err(MetadataError::json(err.to_string())),
            // Decoding a &str into a Value cannot produce I/O or data-shape
            // failures; such a fault is outside the error taxonomy and must
            // not be reported as a json-kind error.
            Category::Io | Category::Data => {
                panic!("unrecognized json decode failure: {err}")
            }
        },
    };
    // A null document can never be valid metadata, stricter than JSON itself.
    if json.is_null() {
        return Err(MetadataError::json("Empty json"));
    }
    Ok(json)
}

fn check_metadata_size(json: &Value, max_bytes: usize) -> Result<(), MetadataError> {
    // Measures the compact re-encoding, not the raw input.
    let encoded = serde_json::to_string(json)
        .unwrap_or_else(|err| panic!("re-encoding a decoded value failed: {err}"));
    debug!(bytes = encoded.len(), "measured metadata size");
    if encoded.len() > max_bytes {
        return Err(MetadataError::cip25("Metadata too large over 16kB"));
    }
    Ok(())
}

fn metadatum_721(json: &Value) -> Result<&Value, MetadataError> {
    json.as_object()
        .and_then(|root| root.get(METADATUM_TAG))
        .ok_or_else(|| MetadataError::cip25("Missing 721 metadatum tag"))
}

fn resolve_policy(metadatum: &Value) -> Result<(&str, &Value), MetadataError> {
    // A non-mapping defines no policies.
    let policies = metadatum
        .as_object()
        .ok_or_else(|| MetadataError::cip25("No policy defined"))?;
    if policies.len() > 1 {
        return Err(MetadataError::cip25("Multiple policies defined"));
    }
    let (policy_id, assets) = policies
        .iter()
        .next()
        .ok_or_else(|| MetadataError::cip25("No policy defined"))?;
    Ok((policy_id.as_str(), assets))
}

fn collect_assets(entries: &Value) -> Result<Vec<Asset>, MetadataError> {
    let entries = entries
        .as_object()
        .ok_or_else(|| MetadataError::cip25("No assets defined"))?;
    let mut assets = Vec::with_capacity(entries.len());
    // Document order; one bad asset discards the whole batch.
    for (asset_name, fields) in entries {
        assets.push(parse_asset(asset_name, fields)?);
    }
    if assets.is_empty() {
        return Err(MetadataError::cip25("No assets defined"));
    }
    Ok(assets)
}

fn parse_asset(asset_name: &str, fields: &Value) -> Result<Asset, MetadataError> {
    let fields = fields
        .as_object()
        .ok_or_else(|| MetadataError::cip25("CIP 25 requires an image tag"))?;

    // required tags
    let image_value = fields
        .get("image")
        .ok_or_else(|| MetadataError::cip25("CIP 25 requires an image tag"))?;
    let name = fields
        .get("name")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| MetadataError::cip25("CIP 25 requires a name tag"))?;

    let other: Map<String, Value> = fields
        .iter()
        .filter(|(key, _)| !RESERVED_ASSET_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    let (image, nft_type) = classify_image(image_value)?;

    let files = match fields.get("files") {
        Some(value) => Some(parse_files(value)?),
        None => None,
    };

    Ok(Asset {
        asset_name: asset_name.to_string(),
        name: name.to_string(),
        image,
        media_type: fields
            .get("mediaType")
            .and_then(Value::as_str)
            .map(str::to_string),
        description: fields.get("description").cloned(),
        files,
        other,
        nft_type,
    })
}

fn classify_image(value: &Value) -> Result<(MediaSource, NftType), MetadataError> {
    match value {
        Value::Array(chunks) => {
            let mut parts = Vec::with_capacity(chunks.len());
            for chunk in chunks {
                let chunk = chunk
                    .as_str()
                    .ok_or_else(|| MetadataError::cip25("Invalid image url or data"))?;
                if chunk.chars().count() > MAX_IMAGE_CHUNK_CHARS {
                    return Err(MetadataError::cip25(
                        "image array elements must be 64 characters or less",
                    ));
                }
                parts.push(chunk.to_string());
            }
            Ok((MediaSource::Chunks(parts), NftType::Onchain))
        }
        Value::String(url) => {
            if Url::parse(url).is_err() {
                return Err(MetadataError::cip25("Invalid image url or data"));
            }
            let nft_type = if url.starts_with(IPFS_PREFIX) {
                NftType::Ipfs
            } else {
                NftType::Offchain
            };
            Ok((MediaSource::Url(url.clone()), nft_type))
        }
        _ => Err(MetadataError::cip25("Invalid image url or data")),
    }
}

fn parse_files(value: &Value) -> Result<Vec<FileMetadata>, MetadataError> {
    let entries = value
        .as_array()
        .ok_or_else(|| MetadataError::cip25("Files must be an array"))?;
    entries.iter().map(parse_file).collect()
}

fn parse_file(value: &Value) -> Result<FileMetadata, MetadataError> {
    let fields = value
        .as_object()
        .ok_or_else(|| MetadataError::cip25("It's recommended to include a name tag"))?;
    // Worded as a recommendation upstream but enforced as fatal.
    let name = fields
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| MetadataError::cip25("It's recommended to include a name tag"))?;
    let src_value = fields
        .get("src")
        .ok_or_else(|| MetadataError::cip25("Files require a src tag"))?;
    let media_type = fields
        .get("mediaType")
        .and_then(Value::as_str)
        .map(str::to_string);

    let src = match src_value {
        Value::Array(chunks) => {
            if media_type.is_none() {
                return Err(MetadataError::cip25(
                    "Files require a mediaType (that define mime type)",
                ));
            }
            let parts = chunks
                .iter()
                .map(|chunk| {
                    chunk
                        .as_str()
                        .map(str::to_string)
                        .ok_or_else(|| MetadataError::cip25("Files src must be a valid url"))
                })
                .collect::<Result<Vec<_>, _>>()?;
            MediaSource::Chunks(parts)
        }
        Value::String(url) => {
            if Url::parse(url).is_err() {
                return Err(MetadataError::cip25("Files src must be a valid url"));
            }
            MediaSource::Url(url.clone())
        }
        _ => return Err(MetadataError::cip25("Files src must be a valid url")),
    };

    Ok(FileMetadata {
        name: name.to_string(),
        src,
        media_type,
    })
}
