//! Metadata of a single chunk.
//!
//! A chunk is a pair of files sharing a stem: the volume (`.h5`) and its
//! JSON sidecar. Chunks of one slab may also share a
//! `<prefix>_transforms.json` holding their offsets in the slab.

use serde::Deserialize;
use serde_json::Value;
use spimio_vfs::PurePath;
use tracing::debug;

use crate::Inspector;
use crate::error::InfoError;
use crate::keys::{FileKeys, SlabIndex, name_to_keys};
use crate::source::ChunkSource;
use crate::stream::load_json;

/// Everything known about one chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkInfo<P> {
    /// The volume file, whether or not it exists.
    pub path: P,
    pub subject: Option<String>,
    pub slab_index: Option<SlabIndex>,
    pub chunk: Option<String>,
    pub sample_staining: Option<String>,
    pub pixel_size: Option<Vec<f64>>,
    /// Shape of the finest level.
    pub shape: Option<Vec<u64>>,
    pub shapes: Vec<Vec<u64>>,
    pub data_type: Option<String>,
    pub data_types: Vec<String>,
    /// `[x, y, z]` offset in the slab.
    pub shift: Option<[f64; 3]>,
}

impl<P> ChunkInfo<P> {
    fn empty(path: P) -> Self {
        Self {
            path,
            subject: None,
            slab_index: None,
            chunk: None,
            sample_staining: None,
            pixel_size: None,
            shape: None,
            shapes: Vec::new(),
            data_type: None,
            data_types: Vec::new(),
            shift: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct Sidecar {
    #[serde(rename = "PixelSize", default)]
    pixel_size: Option<Vec<f64>>,
    #[serde(rename = "SampleStaining", default)]
    sample_staining: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct TransformEntry {
    #[serde(rename = "TransformationParameters", default)]
    parameters: Offsets,
}

#[derive(Debug, Default, Deserialize)]
struct Offsets {
    #[serde(rename = "XOffset", default)]
    x: f64,
    #[serde(rename = "YOffset", default)]
    y: f64,
    #[serde(rename = "ZOffset", default)]
    z: f64,
}

fn decode<T: for<'de> Deserialize<'de>>(value: Value, location: &str) -> Result<T, InfoError> {
    serde_json::from_value(value).map_err(|source| InfoError::Json {
        location: location.to_string(),
        source,
    })
}

fn required<'k>(keys: &'k FileKeys, key: &'static str, file: &str) -> Result<&'k str, InfoError> {
    keys.value(key).ok_or_else(|| InfoError::MissingKey {
        file: file.to_string(),
        key,
    })
}

impl Inspector<'_> {
    /// Gather what the sidecar, the filename, the volume and the slab
    /// transforms say about the chunk at `path`.
    ///
    /// `path` may name either file of the pair. Missing files contribute
    /// nothing; the result for a chunk with neither file is mostly empty.
    pub fn chunk_info<P: ChunkSource>(&self, path: &P) -> Result<ChunkInfo<P>, InfoError> {
        let name = PurePath::new(path.file_name());
        let (stem, suffix) = (name.stem(), name.suffix());
        let (h5path, jsonpath) = match suffix {
            ".h5" => (path.clone(), path.sibling(&format!("{stem}.json"))?),
            ".json" => (path.sibling(&format!("{stem}.h5"))?, path.clone()),
            _ => return Err(InfoError::UnexpectedExtension(path.describe())),
        };
        let prefix = match stem.rsplit_once('_') {
            Some((prefix, _)) => prefix,
            None => "",
        };
        let trfpath = path.sibling(&format!("{prefix}_transforms.json"))?;

        let keys = name_to_keys(jsonpath.file_name());
        let file = jsonpath.describe();
        let mut info = ChunkInfo::empty(h5path.clone());

        if jsonpath.exists()? {
            let location = jsonpath.describe();
            let sidecar: Sidecar = decode(load_json(jsonpath.json_source()?, self.transport)?, &location)?;
            info.pixel_size = sidecar.pixel_size;
            info.sample_staining = sidecar.sample_staining;
            info.subject = Some(required(&keys, "sub", &file)?.to_string());
            info.slab_index = Some(SlabIndex::parse(required(&keys, "sample", &file)?)?);
            info.chunk = Some(required(&keys, "chunk", &file)?.to_string());
        }

        if h5path.exists()? {
            let location = h5path.volume_location(self.transport)?;
            let levels = self
                .reader
                .levels(&location)
                .map_err(|source| InfoError::Volume {
                    location: location.to_string(),
                    source,
                })?;
            let Some(finest) = levels.first() else {
                return Err(InfoError::NoLevels(h5path.describe()));
            };
            info.shape = Some(finest.shape.clone());
            info.data_type = Some(finest.dtype.clone());
            info.shapes = levels.iter().map(|l| l.shape.clone()).collect();
            info.data_types = levels.iter().map(|l| l.dtype.clone()).collect();

            if info.subject.is_none() {
                info.subject = Some(required(&keys, "sub", &file)?.to_string());
            }
            if info.slab_index.is_none()
                && let Some(sample) = keys.value("sample")
            {
                info.slab_index = Some(SlabIndex::parse(sample)?);
            }
            if info.sample_staining.is_none() {
                info.sample_staining = keys.value("stain").map(str::to_string);
            }
            info.chunk = Some(required(&keys, "chunk", &file)?.to_string());
        }

        if trfpath.exists()? {
            let location = trfpath.describe();
            let entries: Vec<TransformEntry> =
                decode(load_json(trfpath.json_source()?, self.transport)?, &location)?;
            let Some(first) = entries.first() else {
                return Err(InfoError::EmptyTransforms(location));
            };
            let offsets = &first.parameters;
            info.shift = Some([offsets.x, offsets.y, offsets.z]);
        }

        debug!(
            chunk = %h5path.describe(),
            subject = ?info.subject,
            slab = ?info.slab_index,
            levels = info.shapes.len(),
            "chunk info"
        );
        Ok(info)
    }
}
