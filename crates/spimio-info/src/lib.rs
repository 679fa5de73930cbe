//! spimio-info: metadata of SPIM chunks and slabs.
//!
//! Light-sheet datasets are stored as chunks: an HDF5 volume plus a JSON
//! sidecar, named with BIDS-like attributes (`sub-01_sample-3_chunk-2`).
//! Chunks of a slab live together in a `microscopy` directory.
//!
//! [`Inspector`] gathers chunk and slab metadata from any [`ChunkSource`]:
//! a local path or a [`DandiPath`](spimio_dandi::DandiPath). Volume
//! headers come from an injected [`VolumeReader`]; remote files are
//! fetched through a [`Transport`](spimio_dandi::Transport).

mod chunk;
mod error;
mod keys;
mod slab;
mod source;
mod stream;
mod volume;

pub use chunk::ChunkInfo;
pub use error::InfoError;
pub use keys::{FileKeys, SlabIndex, name_to_keys};
pub use slab::SlabInfo;
pub use source::ChunkSource;
pub use stream::{JsonSource, load_json};
pub use volume::{LevelInfo, ReaderError, VolumeLocation, VolumeReader};

use spimio_dandi::Transport;

/// Reads chunk and slab metadata.
#[derive(Clone, Copy)]
pub struct Inspector<'a> {
    reader: &'a dyn VolumeReader,
    transport: Option<&'a dyn Transport>,
}

impl<'a> Inspector<'a> {
    /// An inspector for local files.
    pub fn new(reader: &'a dyn VolumeReader) -> Self {
        Self {
            reader,
            transport: None,
        }
    }

    /// Fetch remote sidecars and resolve remote volumes through `transport`.
    pub fn with_transport(mut self, transport: &'a dyn Transport) -> Self {
        self.transport = Some(transport);
        self
    }
}
