//! Metadata of a slab directory.
//!
//! Datasets follow a BIDS-like layout: each subject holds one
//! `<session>/microscopy` directory per slab, and each of those holds the
//! chunks of a single slab of a single subject.

use std::collections::BTreeSet;

use tracing::debug;

use crate::Inspector;
use crate::chunk::ChunkInfo;
use crate::error::InfoError;
use crate::keys::SlabIndex;
use crate::source::ChunkSource;

/// Aggregate of the chunks in one slab directory.
#[derive(Debug, Clone, PartialEq)]
pub struct SlabInfo<P> {
    pub subject: Option<String>,
    pub slab_index: Option<SlabIndex>,
    pub pixel_size: Option<Vec<f64>>,
    pub shape: Option<Vec<u64>>,
    /// Extent of the union of all chunk boxes, `None` without chunks.
    pub fov: Option<[f64; 3]>,
    pub stainings: BTreeSet<String>,
    pub chunks: BTreeSet<String>,
    pub meta_chunks: Vec<ChunkInfo<P>>,
}

impl<P> Default for SlabInfo<P> {
    fn default() -> Self {
        Self {
            subject: None,
            slab_index: None,
            pixel_size: None,
            shape: None,
            fov: None,
            stainings: BTreeSet::new(),
            chunks: BTreeSet::new(),
            meta_chunks: Vec::new(),
        }
    }
}

/// Running min/max of chunk boxes.
#[derive(Debug, Default)]
struct Extent {
    bounds: Option<([f64; 3], [f64; 3])>,
}

impl Extent {
    fn add(&mut self, lo: [f64; 3], hi: [f64; 3]) {
        self.bounds = Some(match self.bounds {
            None => (lo, hi),
            Some((mn, mx)) => (
                std::array::from_fn(|i| mn[i].min(lo[i])),
                std::array::from_fn(|i| mx[i].max(hi[i])),
            ),
        });
    }

    fn size(&self) -> Option<[f64; 3]> {
        self.bounds
            .map(|(mn, mx)| std::array::from_fn(|i| mx[i] - mn[i]))
    }
}

fn inconsistent(what: &'static str, first: impl std::fmt::Debug, other: impl std::fmt::Debug) -> InfoError {
    InfoError::Inconsistent {
        what,
        first: format!("{first:?}"),
        other: format!("{other:?}"),
    }
}

/// Box covered by a chunk: `[shift, shift + shape]` over the last 3 axes.
fn chunk_box<P: ChunkSource>(chunk: &ChunkInfo<P>) -> Result<([f64; 3], [f64; 3]), InfoError> {
    let shape = chunk
        .shape
        .as_ref()
        .ok_or_else(|| InfoError::MissingShape(chunk.path.describe()))?;
    if shape.len() < 3 {
        return Err(InfoError::ShapeRank {
            path: chunk.path.describe(),
            rank: shape.len(),
        });
    }
    let tail = &shape[shape.len() - 3..];
    let shift = chunk.shift.unwrap_or([0.0; 3]);
    let lo = shift;
    let hi = std::array::from_fn(|i| tail[i] as f64 + shift[i]);
    Ok((lo, hi))
}

impl Inspector<'_> {
    /// Aggregate every `*.h5` chunk directly in `dir`.
    ///
    /// Fails when chunks disagree on subject, slab, pixel size or shape.
    /// Chunks without a pixel size do not conflict with those that have one.
    pub fn slab_info<P: ChunkSource>(&self, dir: &P) -> Result<SlabInfo<P>, InfoError> {
        let mut info = SlabInfo::default();
        let mut extent = Extent::default();

        for h5file in dir.glob("*.h5")? {
            let chunk = self.chunk_info(&h5file)?;

            if let Some(subject) = &info.subject
                && chunk.subject.as_ref() != Some(subject)
            {
                return Err(inconsistent("subjects", subject, &chunk.subject));
            }
            info.subject = chunk.subject.clone();

            if let Some(slab) = info.slab_index
                && chunk.slab_index != Some(slab)
            {
                return Err(inconsistent("slabs", slab, chunk.slab_index));
            }
            info.slab_index = chunk.slab_index;

            if let (Some(ours), Some(theirs)) = (&info.pixel_size, &chunk.pixel_size)
                && ours != theirs
            {
                return Err(inconsistent("pixel sizes", ours, theirs));
            }
            if chunk.pixel_size.is_some() {
                info.pixel_size = chunk.pixel_size.clone();
            }

            if let Some(shape) = &info.shape
                && chunk.shape.as_ref() != Some(shape)
            {
                return Err(inconsistent("shapes", shape, &chunk.shape));
            }
            info.shape = chunk.shape.clone();

            let (lo, hi) = chunk_box(&chunk)?;
            extent.add(lo, hi);

            if let Some(staining) = &chunk.sample_staining {
                info.stainings.insert(staining.clone());
            }
            if let Some(name) = &chunk.chunk {
                info.chunks.insert(name.clone());
            }
            info.meta_chunks.push(chunk);
        }

        info.fov = extent.size();
        debug!(
            slab = %dir.describe(),
            chunks = info.meta_chunks.len(),
            fov = ?info.fov,
            "slab info"
        );
        Ok(info)
    }

    /// [`slab_info`](Self::slab_info) for each `*/microscopy` directory of a
    /// subject, in path order.
    pub fn all_slabs_info<P: ChunkSource>(&self, subject_dir: &P) -> Result<Vec<SlabInfo<P>>, InfoError> {
        let mut slab_dirs = Vec::new();
        for dir in subject_dir.glob("*/microscopy")? {
            if dir.is_dir()? {
                slab_dirs.push(dir);
            }
        }
        slab_dirs.sort_by_key(|d| d.describe());
        slab_dirs.iter().map(|d| self.slab_info(d)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extent_accumulates_over_all_boxes() {
        let mut extent = Extent::default();
        assert_eq!(extent.size(), None);
        extent.add([0.0, 0.0, 0.0], [10.0, 10.0, 10.0]);
        extent.add([5.0, -5.0, 0.0], [15.0, 5.0, 10.0]);
        extent.add([2.0, 2.0, 2.0], [3.0, 3.0, 3.0]);
        assert_eq!(extent.size(), Some([15.0, 15.0, 10.0]));
    }
}
