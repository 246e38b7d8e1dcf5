use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Where an asset's image lives, derived from the shape of its `image` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NftType {
    Offchain,
    Onchain,
    Ipfs,
}

impl fmt::Display for NftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = match self {
            NftType::Offchain => "offchain",
            NftType::Onchain => "onchain",
            NftType::Ipfs => "ipfs",
        };
        write!(f, "{}", key)
    }
}

/// An `image` or `src` value: a single URI, or chunks of at most 64
/// characters for data stored directly in transaction metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MediaSource {
    Url(String),
    Chunks(Vec<String>),
}

impl MediaSource {
    pub fn as_url(&self) -> Option<&str> {
        match self {
            MediaSource::Url(url) => Some(url),
            MediaSource::Chunks(_) => None,
        }
    }
}

impl fmt::Display for MediaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaSource::Url(url) => write!(f, "{}", url),
            MediaSource::Chunks(chunks) => write!(f, "{}", chunks.concat()),
        }
    }
}

/// One entry of an asset's `files` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    pub name: String,
    pub src: MediaSource,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
}

impl FileMetadata {
    pub fn builder() -> FileMetadataBuilder {
        FileMetadataBuilder::default()
    }
}

/// A single validated NFT record under the policy.
///
/// `other` carries every asset-level key outside the reserved set
/// `{name, image, mediaType, description, files}`. Optional reserved fields
/// serialize as `null` when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub asset_name: String,
    pub name: String,
    pub image: MediaSource,
    #[builder(default)]
    pub media_type: Option<String>,
    #[builder(default)]
    pub description: Option<Value>,
    #[builder(default)]
    pub files: Option<Vec<FileMetadata>>,
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub other: Map<String, Value>,
    pub nft_type: NftType,
}

impl Asset {
    pub fn builder() -> AssetBuilder {
        AssetBuilder::default()
    }

    /// Rebuild the raw CIP-25 field mapping for this asset.
    pub fn to_json(&self) -> Value {
        let mut fields = Map::new();
        fields.insert("name".to_string(), Value::String(self.name.clone()));
        fields.insert("image".to_string(), media_source_json(&self.image));
        if let Some(media_type) = &self.media_type {
            fields.insert("mediaType".to_string(), Value::String(media_type.clone()));
        }
        if let Some(description) = &self.description {
            fields.insert("description".to_string(), description.clone());
        }
        if let Some(files) = &self.files {
            let entries = files
                .iter()
                .map(|file| {
                    let mut entry = Map::new();
                    entry.insert("name".to_string(), Value::String(file.name.clone()));
                    entry.insert("src".to_string(), media_source_json(&file.src));
                    if let Some(media_type) = &file.media_type {
                        entry.insert("mediaType".to_string(), Value::String(media_type.clone()));
                    }
                    Value::Object(entry)
                })
                .collect();
            fields.insert("files".to_string(), Value::Array(entries));
        }
        for (key, value) in &self.other {
            fields.insert(key.clone(), value.clone());
        }
        Value::Object(fields)
    }
}

/// The validated result: one policy identifier and its assets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[serde(rename_all = "camelCase")]
pub struct CnftData {
    pub policy_id: String,
    pub assets: Vec<Asset>,
}

impl CnftData {
    pub fn builder() -> CnftDataBuilder {
        CnftDataBuilder::default()
    }

    /// Reassemble the original CIP-25 document shape
    /// (`{"721": {<policy>: {<asset>: {...}}}}`).
    pub fn to_json(&self) -> Value {
        let mut assets = Map::new();
        for asset in &self.assets {
            assets.insert(asset.asset_name.clone(), asset.to_json());
        }
        let mut policy = Map::new();
        policy.insert(self.policy_id.clone(), Value::Object(assets));
        let mut root = Map::new();
        root.insert("721".to_string(), Value::Object(policy));
        Value::Object(root)
    }
}

fn media_source_json(source: &MediaSource) -> Value {
    match source {
        MediaSource::Url(url) => Value::String(url.clone()),
        MediaSource::Chunks(chunks) => Value::Array(
            chunks
                .iter()
                .map(|chunk| Value::String(chunk.clone()))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::{Asset, CnftData, MediaSource, NftType};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn asset_to_json_keeps_extension_fields() {
        let mut other = serde_json::Map::new();
        other.insert("twitter".to_string(), json!("@handle"));

        let asset = Asset::builder()
            .asset_name("Token1".to_string())
            .name("Token One".to_string())
            .image(MediaSource::Url("https://example.com/1.png".to_string()))
            .other(other)
            .nft_type(NftType::Offchain)
            .build()
            .expect("asset");

        assert_eq!(
            asset.to_json(),
            json!({
                "name": "Token One",
                "image": "https://example.com/1.png",
                "twitter": "@handle",
            })
        );
    }

    #[test]
    fn cnft_data_to_json_rebuilds_document_shape() {
        let asset = Asset::builder()
            .asset_name("Token1".to_string())
            .name("Token One".to_string())
            .image(MediaSource::Chunks(vec!["data:".to_string()]))
            .nft_type(NftType::Onchain)
            .build()
            .expect("asset");
        let data = CnftData::builder()
            .policy_id("policy0".to_string())
            .assets(vec![asset])
            .build()
            .expect("data");

        assert_eq!(
            data.to_json(),
            json!({
                "721": {
                    "policy0": {
                        "Token1": {
                            "name": "Token One",
                            "image": ["data:"],
                        }
                    }
                }
            })
        );
    }

    #[test]
    fn nft_type_serializes_lowercase() {
        assert_eq!(serde_json::to_value(NftType::Ipfs).expect("value"), json!("ipfs"));
        assert_eq!(NftType::Onchain.to_string(), "onchain");
    }
}
