//! Metadata snapshot files
//!
//! A snapshot is a JSON array of item infos, as persisted by whatever fetched
//! the metadata from the remote store.

use metaview_common::{ItemInfo, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;

/// Parse a snapshot from `reader`
pub fn read_item_infos(reader: impl Read) -> Result<Vec<ItemInfo>> {
    let infos: Vec<ItemInfo> = serde_json::from_reader(BufReader::new(reader))?;
    debug!("Read {} item infos from snapshot", infos.len());
    Ok(infos)
}

/// Load a snapshot file
pub fn load_item_infos(path: impl AsRef<Path>) -> Result<Vec<ItemInfo>> {
    let path = path.as_ref();
    debug!("Loading snapshot {}", path.display());
    read_item_infos(File::open(path)?)
}
