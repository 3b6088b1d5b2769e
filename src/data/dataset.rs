use std::io::Read;
use std::ops::Index;
use std::path::Path;

use crate::data::idx::{self, ImageHeader, LabelHeader};
use crate::data::sample::Sample;
use crate::error::Result;

/// Labeled images read from an IDX image/label file pair.
///
/// Immutable once loaded; owned by whoever loaded it.
#[derive(Debug, Clone)]
pub struct Dataset {
    samples: Vec<Sample>,
    height: usize,
    width: usize,
    image_magic: u32,
    label_magic: u32,
}

impl Dataset {
    pub(crate) fn new(samples: Vec<Sample>, images: ImageHeader, labels: LabelHeader) -> Dataset {
        Dataset {
            samples,
            height: images.height,
            width: images.width,
            image_magic: images.magic,
            label_magic: labels.magic,
        }
    }

    /// See [`idx::load`].
    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(image_path: P, label_path: Q) -> Result<Dataset> {
        idx::load(image_path, label_path)
    }

    /// Parses an image stream and its label stream. See [`idx::read_pair`].
    pub fn from_readers<I: Read, L: Read>(images: I, labels: L) -> Result<Dataset> {
        idx::read_pair(images, labels)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Sample> {
        self.samples.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Rows per image.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Columns per image.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn image_magic(&self) -> u32 {
        self.image_magic
    }

    pub fn label_magic(&self) -> u32 {
        self.label_magic
    }
}

impl Index<usize> for Dataset {
    type Output = Sample;

    fn index(&self, index: usize) -> &Sample {
        &self.samples[index]
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
