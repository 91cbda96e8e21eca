//! Persistence of the single best controller.
//!
//! The artifact is a small JSON document holding one [`FeedForward`]
//! network and a format version. Networks are re-validated on load, so a
//! hand-edited file with inconsistent shapes is rejected up front instead of
//! failing mid-episode.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ControllerError;
use crate::nn::FeedForward;

pub const ARTIFACT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct Artifact {
    version: u32,
    network: FeedForward,
}

/// Write `network` to `writer`.
///
/// # Errors
///
/// Fails if serialization or the underlying writer fails.
pub fn save<W: Write>(network: &FeedForward, writer: W) -> Result<(), ControllerError> {
    let artifact = Artifact {
        version: ARTIFACT_VERSION,
        network: network.clone(),
    };
    serde_json::to_writer_pretty(writer, &artifact)?;
    Ok(())
}

/// Read a network previously written by [`save`].
///
/// # Errors
///
/// Fails on malformed JSON, an unknown version, or inconsistent layer shapes.
pub fn load<R: Read>(reader: R) -> Result<FeedForward, ControllerError> {
    let artifact: Artifact = serde_json::from_reader(reader)?;
    if artifact.version != ARTIFACT_VERSION {
        return Err(ControllerError::UnsupportedVersion(artifact.version));
    }
    FeedForward::new(artifact.network.layers().to_vec())
}

/// # Errors
///
/// See [`save`]; also fails if the file cannot be created.
pub fn save_to_path(network: &FeedForward, path: impl AsRef<Path>) -> Result<(), ControllerError> {
    let mut writer = BufWriter::new(File::create(path)?);
    save(network, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// # Errors
///
/// See [`load`]; also fails if the file cannot be opened.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<FeedForward, ControllerError> {
    load(BufReader::new(File::open(path)?))
}
