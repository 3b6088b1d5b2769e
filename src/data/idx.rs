//! Reader for paired IDX image/label files, the format MNIST ships in.
//!
//! # Image file layout
//! ```text
//! bytes  0-3:   magic       (big-endian u32, 0x00000803 for MNIST)
//! bytes  4-7:   N           (number of images, big-endian u32)
//! bytes  8-11:  height      (rows per image, big-endian u32)
//! bytes 12-15:  width       (columns per image, big-endian u32)
//! bytes 16..:   N * height * width bytes, row-major, one u8 per pixel
//! ```
//!
//! # Label file layout
//! ```text
//! bytes  0-3:   magic       (big-endian u32, 0x00000801 for MNIST)
//! bytes  4-7:   N           (number of labels, big-endian u32)
//! bytes  8..:   N bytes, one label per image
//! ```
//!
//! Magic numbers are recorded but not enforced. The two counts must agree,
//! and a non-empty file must declare images of at least one pixel.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use tracing::{info, warn};

use crate::data::dataset::Dataset;
use crate::data::sample::Sample;
use crate::error::Result;

pub const IMAGE_MAGIC: u32 = 0x0000_0803;
pub const LABEL_MAGIC: u32 = 0x0000_0801;

/// Header of the image file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageHeader {
    pub magic: u32,
    pub count: usize,
    pub height: usize,
    pub width: usize,
}

/// Header of the label file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelHeader {
    pub magic: u32,
    pub count: usize,
}

/// Opens and parses an image file and its label file.
pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(image_path: P, label_path: Q) -> Result<Dataset> {
    let image_path = image_path.as_ref();
    let label_path = label_path.as_ref();
    let images = BufReader::new(File::open(image_path)?);
    let labels = BufReader::new(File::open(label_path)?);

    let dataset = read_pair(images, labels)?;
    info!(
        images = %image_path.display(),
        labels = %label_path.display(),
        count = dataset.len(),
        height = dataset.height(),
        width = dataset.width(),
        "loaded IDX dataset"
    );
    Ok(dataset)
}

/// Parses an image stream and a label stream into a [`Dataset`].
///
/// Fails with an I/O error of kind `UnexpectedEof` when either stream ends
/// before its declared count is satisfied, and `InvalidData` when the two
/// counts differ.
pub fn read_pair<I: Read, L: Read>(mut images: I, mut labels: L) -> Result<Dataset> {
    let image_header = read_image_header(&mut images)?;
    let label_header = read_label_header(&mut labels)?;

    if image_header.magic != IMAGE_MAGIC {
        warn!(magic = image_header.magic, expected = IMAGE_MAGIC, "unexpected IDX image magic");
    }
    if label_header.magic != LABEL_MAGIC {
        warn!(magic = label_header.magic, expected = LABEL_MAGIC, "unexpected IDX label magic");
    }

    if image_header.count != label_header.count {
        return Err(invalid_data(format!(
            "IDX file mismatch: image file declares {} items but label file declares {}",
            image_header.count, label_header.count
        ))
        .into());
    }

    let ImageHeader { count, height, width, .. } = image_header;
    let n_pixels = height.checked_mul(width).ok_or_else(|| {
        invalid_data(format!("IDX image size overflows usize ({height}x{width})"))
    })?;
    if count > 0 && n_pixels == 0 {
        return Err(invalid_data(format!(
            "IDX images must have at least one pixel, got {height}x{width}"
        ))
        .into());
    }

    // A bogus count must not trigger a huge allocation before the data runs out.
    let mut samples = Vec::with_capacity(count.min(1 << 16));

    for _ in 0..count {
        let pixels = read_grid(&mut images, width, n_pixels)?;
        let label = read_u8(&mut labels)?;
        samples.push(Sample::new(height, width, pixels, label));
    }

    Ok(Dataset::new(samples, image_header, label_header))
}

pub fn read_image_header<R: Read>(reader: &mut R) -> io::Result<ImageHeader> {
    Ok(ImageHeader {
        magic: read_u32_be(reader)?,
        count: read_u32_be(reader)? as usize,
        height: read_u32_be(reader)? as usize,
        width: read_u32_be(reader)? as usize,
    })
}

pub fn read_label_header<R: Read>(reader: &mut R) -> io::Result<LabelHeader> {
    Ok(LabelHeader {
        magic: read_u32_be(reader)?,
        count: read_u32_be(reader)? as usize,
    })
}

fn read_u32_be<R: Read>(reader: &mut R) -> io::Result<u32> {
    let mut buf4 = [0u8; 4];
    reader.read_exact(&mut buf4)?;
    Ok(u32::from_be_bytes(buf4))
}

/// Reads one row-major image. The buffer only grows as bytes arrive, so a
/// header declaring huge dimensions fails with `UnexpectedEof` instead of
/// allocating up front.
fn read_grid<R: Read>(reader: &mut R, width: usize, n_pixels: usize) -> io::Result<Vec<Vec<u8>>> {
    let mut buf = Vec::new();
    (&mut *reader).take(n_pixels as u64).read_to_end(&mut buf)?;
    if buf.len() < n_pixels {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("IDX image data ended after {} of {} bytes", buf.len(), n_pixels),
        ));
    }
    Ok(buf.chunks(width).map(<[u8]>::to_vec).collect())
}

fn invalid_data(msg: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg)
}

fn read_u8<R: Read>(reader: &mut R) -> io::Result<u8> {
    let mut buf = [0u8; 1];
    reader.read_exact(&mut buf)?;
    Ok(buf[0])
}
