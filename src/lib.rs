//! Validate and parse CIP-25 Cardano NFT metadata into typed records.
pub mod cip25;

pub use cip25::core::{Asset, CnftData, FileMetadata, MediaSource, NftType};
pub use cip25::errors::{Error, MetadataError, MetadataErrorKind};
pub use cip25::parse::{DEFAULT_MAX_METADATA_BYTES, ParseOptions, parse_cnft, parse_cnft_with};
pub use cip25::validate::validate_file;
