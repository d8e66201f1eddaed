//! Fixtures shared by the unit tests: tiny JPEG files carrying only an EXIF
//! segment, and mtime control.

use chrono::{Local, NaiveDateTime, TimeZone};
use std::fs::File;
use std::path::Path;
use std::time::SystemTime;

#[derive(Debug, Clone, Copy)]
pub enum ExifDateTag {
    DateTime,
    DateTimeOriginal,
    DateTimeDigitized,
}

impl ExifDateTag {
    fn code(self) -> u16 {
        match self {
            ExifDateTag::DateTime => 0x0132,
            ExifDateTag::DateTimeOriginal => 0x9003,
            ExifDateTag::DateTimeDigitized => 0x9004,
        }
    }

    fn in_exif_ifd(self) -> bool {
        !matches!(self, ExifDateTag::DateTime)
    }
}

const EXIF_IFD_POINTER: u16 = 0x8769;
const TYPE_ASCII: u16 = 2;
const TYPE_LONG: u16 = 4;

/// Builds a big-endian TIFF structure wrapped in a JPEG APP1 segment.
pub fn jpeg_with_exif(tags: &[(ExifDateTag, &str)]) -> Vec<u8> {
    let ifd0: Vec<_> = tags.iter().filter(|(t, _)| !t.in_exif_ifd()).collect();
    let exif_ifd: Vec<_> = tags.iter().filter(|(t, _)| t.in_exif_ifd()).collect();

    let ifd0_count = ifd0.len() + usize::from(!exif_ifd.is_empty());
    let exif_offset = 8 + ifd_size(ifd0_count);
    let mut data_offset = if exif_ifd.is_empty() {
        exif_offset
    } else {
        exif_offset + ifd_size(exif_ifd.len())
    };

    let mut tiff = b"MM\x00\x2a\x00\x00\x00\x08".to_vec();
    let mut data = Vec::new();

    push_u16(&mut tiff, ifd0_count as u16);
    for (tag, value) in &ifd0 {
        push_ascii_entry(&mut tiff, &mut data, &mut data_offset, tag.code(), value);
    }
    if !exif_ifd.is_empty() {
        push_u16(&mut tiff, EXIF_IFD_POINTER);
        push_u16(&mut tiff, TYPE_LONG);
        push_u32(&mut tiff, 1);
        push_u32(&mut tiff, exif_offset as u32);
    }
    push_u32(&mut tiff, 0);

    if !exif_ifd.is_empty() {
        push_u16(&mut tiff, exif_ifd.len() as u16);
        for (tag, value) in &exif_ifd {
            push_ascii_entry(&mut tiff, &mut data, &mut data_offset, tag.code(), value);
        }
        push_u32(&mut tiff, 0);
    }
    tiff.extend(data);

    let segment_len = (2 + 6 + tiff.len()) as u16;
    let mut jpeg = vec![0xFF, 0xD8, 0xFF, 0xE1];
    jpeg.extend(segment_len.to_be_bytes());
    jpeg.extend(b"Exif\0\0");
    jpeg.extend(tiff);
    jpeg.extend([0xFF, 0xD9]);
    jpeg
}

pub fn set_mtime(path: &Path, at: NaiveDateTime) {
    let local = Local
        .from_local_datetime(&at)
        .single()
        .expect("unambiguous local time");
    let file = File::options()
        .write(true)
        .open(path)
        .expect("open for mtime");
    file.set_modified(SystemTime::from(local))
        .expect("set mtime");
}

fn ifd_size(entries: usize) -> usize {
    2 + 12 * entries + 4
}

fn push_ascii_entry(
    entries: &mut Vec<u8>,
    data: &mut Vec<u8>,
    data_offset: &mut usize,
    code: u16,
    value: &str,
) {
    let mut bytes = value.as_bytes().to_vec();
    bytes.push(0);
    push_u16(entries, code);
    push_u16(entries, TYPE_ASCII);
    push_u32(entries, bytes.len() as u32);
    push_u32(entries, *data_offset as u32);
    *data_offset += bytes.len();
    data.extend(bytes);
}

fn push_u16(buf: &mut Vec<u8>, value: u16) {
    buf.extend(value.to_be_bytes());
}

fn push_u32(buf: &mut Vec<u8>, value: u32) {
    buf.extend(value.to_be_bytes());
}
