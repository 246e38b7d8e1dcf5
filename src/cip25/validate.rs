//! Validation logic for CIP-25 metadata files
use crate::cip25::core::CnftData;
use crate::cip25::errors::{Error, Result};
use crate::cip25::parse::parse_cnft;
use std::path::Path;
use tracing::debug;

/// Validate a CIP-25 metadata file
pub fn validate_file(file_path: &Path) -> Result<CnftData> {
    debug!(path = %file_path.display(), "validating metadata file");
    let content =
        std::fs::read_to_string(file_path).map_err(|_| Error::file_not_found(file_path))?;

    let data = parse_cnft(&content)?;
    Ok(data)
}
