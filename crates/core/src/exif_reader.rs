use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use exif::{In, Reader, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

const DATE_TAGS: [Tag; 3] = [Tag::DateTimeOriginal, Tag::DateTimeDigitized, Tag::DateTime];

/// Reads the capture timestamp of an image. Missing, unreadable or malformed
/// EXIF data yields `None`.
pub fn extract_timestamp(path: &Path) -> Option<NaiveDateTime> {
    match read_exif_timestamp(path) {
        Ok(Some(timestamp)) => Some(timestamp),
        Ok(None) => {
            log::debug!("{}: no usable EXIF date tag", path.display());
            None
        }
        Err(err) => {
            log::debug!("{}: {:#}", path.display(), err);
            None
        }
    }
}

fn read_exif_timestamp(path: &Path) -> Result<Option<NaiveDateTime>> {
    let file = File::open(path)
        .with_context(|| format!("failed to open for EXIF read: {}", path.display()))?;
    let mut buf = BufReader::new(file);
    let exif = Reader::new()
        .read_from_container(&mut buf)
        .with_context(|| format!("failed to parse EXIF: {}", path.display()))?;

    Ok(DATE_TAGS.iter().find_map(|tag| {
        let field = exif.get_field(*tag, In::PRIMARY)?;
        match &field.value {
            Value::Ascii(values) => values.iter().find_map(|raw| parse_date(raw)),
            _ => None,
        }
    }))
}

fn parse_date(raw: &[u8]) -> Option<NaiveDateTime> {
    let dt = exif::DateTime::from_ascii(raw).ok()?;
    NaiveDate::from_ymd_opt(dt.year.into(), dt.month.into(), dt.day.into())?.and_hms_opt(
        dt.hour.into(),
        dt.minute.into(),
        dt.second.into(),
    )
}
