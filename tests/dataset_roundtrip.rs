use std::fs;
use std::io::{Cursor, ErrorKind};
use std::path::PathBuf;

use nnet::data::idx::{IMAGE_MAGIC, LABEL_MAGIC};
use nnet::{Dataset, NetError};

/// Writes an IDX image/label pair into a fresh temp directory.
struct IdxFiles {
    dir: PathBuf,
    images: PathBuf,
    labels: PathBuf,
}

impl IdxFiles {
    fn write(name: &str, image_bytes: &[u8], label_bytes: &[u8]) -> IdxFiles {
        let dir = std::env::temp_dir().join(format!("nnet-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let images = dir.join("images.idx3-ubyte");
        let labels = dir.join("labels.idx1-ubyte");
        fs::write(&images, image_bytes).unwrap();
        fs::write(&labels, label_bytes).unwrap();
        IdxFiles { dir, images, labels }
    }
}

impl Drop for IdxFiles {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.dir);
    }
}

fn encode(
    n: usize,
    h: usize,
    w: usize,
    pixel: impl Fn(usize, usize, usize) -> u8,
    label: impl Fn(usize) -> u8,
) -> (Vec<u8>, Vec<u8>) {
    let mut images = Vec::new();
    images.extend_from_slice(&IMAGE_MAGIC.to_be_bytes());
    for v in [n, h, w] {
        images.extend_from_slice(&(v as u32).to_be_bytes());
    }
    for i in 0..n {
        for r in 0..h {
            for c in 0..w {
                images.push(pixel(i, r, c));
            }
        }
    }

    let mut labels = Vec::new();
    labels.extend_from_slice(&LABEL_MAGIC.to_be_bytes());
    labels.extend_from_slice(&(n as u32).to_be_bytes());
    labels.extend((0..n).map(label));
    (images, labels)
}

fn pixel_value(i: usize, r: usize, c: usize) -> u8 {
    ((i * 31 + r * 7 + c * 3) % 256) as u8
}

#[test]
fn load_returns_every_sample_byte_for_byte() {
    let (n, h, w) = (7, 4, 5);
    let (images, labels) = encode(n, h, w, pixel_value, |i| (i % 10) as u8);
    let files = IdxFiles::write("roundtrip", &images, &labels);

    let ds = Dataset::load(&files.images, &files.labels).unwrap();
    assert_eq!(ds.len(), n);
    assert_eq!((ds.height(), ds.width()), (h, w));
    assert_eq!(ds.image_magic(), IMAGE_MAGIC);
    assert_eq!(ds.label_magic(), LABEL_MAGIC);

    for (i, sample) in ds.iter().enumerate() {
        assert_eq!(sample.label(), (i % 10) as u8);
        assert_eq!((sample.height(), sample.width()), (h, w));
        for r in 0..h {
            for c in 0..w {
                assert_eq!(sample.pixel(r, c), pixel_value(i, r, c), "sample {i} ({r}, {c})");
            }
        }
        let flat = sample.to_vector();
        assert_eq!(flat.shape(), (1, h * w));
        assert_eq!(flat.get(0, w + 2), pixel_value(i, 1, 2) as f64);
    }
}

#[test]
fn truncated_image_file_is_io_error() {
    let (mut images, labels) = encode(3, 2, 2, pixel_value, |_| 1);
    images.truncate(images.len() - 1);
    let files = IdxFiles::write("truncated", &images, &labels);

    match Dataset::load(&files.images, &files.labels) {
        Err(NetError::Io(e)) => assert_eq!(e.kind(), ErrorKind::UnexpectedEof),
        other => panic!("expected I/O error, got {other:?}"),
    }
}

#[test]
fn missing_label_file_is_io_error() {
    let (images, labels) = encode(1, 1, 1, pixel_value, |_| 0);
    let files = IdxFiles::write("missing", &images, &labels);
    fs::remove_file(&files.labels).unwrap();

    match Dataset::load(&files.images, &files.labels) {
        Err(NetError::Io(e)) => assert_eq!(e.kind(), ErrorKind::NotFound),
        other => panic!("expected I/O error, got {other:?}"),
    }
}

#[test]
fn mismatched_counts_fail_fast() {
    let (images, _) = encode(3, 2, 2, pixel_value, |_| 0);
    let (_, labels) = encode(2, 2, 2, pixel_value, |_| 0);
    let files = IdxFiles::write("mismatch", &images, &labels);

    match Dataset::load(&files.images, &files.labels) {
        Err(NetError::Io(e)) => assert_eq!(e.kind(), ErrorKind::InvalidData),
        other => panic!("expected I/O error, got {other:?}"),
    }
}

fn header(fields: &[u32]) -> Vec<u8> {
    fields.iter().flat_map(|v| v.to_be_bytes()).collect()
}

#[test]
fn header_with_huge_dimensions_is_an_io_error() {
    for (h, w) in [(u32::MAX, 1), (1, u32::MAX)] {
        let images = header(&[IMAGE_MAGIC, 1, h, w]);
        let labels = header(&[LABEL_MAGIC, 1]);
        match Dataset::from_readers(Cursor::new(images), Cursor::new(labels)) {
            Err(NetError::Io(e)) => assert_eq!(e.kind(), ErrorKind::UnexpectedEof, "{h}x{w}"),
            other => panic!("expected I/O error for {h}x{w}, got {other:?}"),
        }
    }
}

#[test]
fn from_readers_matches_load() {
    let (images, labels) = encode(3, 2, 3, pixel_value, |i| i as u8);
    let files = IdxFiles::write("readers", &images, &labels);

    let from_files = Dataset::load(&files.images, &files.labels).unwrap();
    let in_memory = Dataset::from_readers(Cursor::new(images), Cursor::new(labels)).unwrap();
    assert_eq!(from_files.samples(), in_memory.samples());
}
