use chrono::NaiveDateTime;
use std::collections::HashSet;

const STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Builds `<prefix>_<YYYYMMDD>_<HHMMSS>.<ext>`. When that name is taken the
/// first free of `_1`, `_2`, ... is appended before the extension.
pub fn generate_name(
    prefix: &str,
    timestamp: &NaiveDateTime,
    extension: &str,
    existing_names: &HashSet<String>,
) -> String {
    let base = format!("{}_{}", prefix, timestamp.format(STAMP_FORMAT));
    let extension = extension.to_ascii_lowercase();

    let canonical = format!("{}.{}", base, extension);
    if !existing_names.contains(&canonical) {
        return canonical;
    }

    let mut n = 1usize;
    loop {
        let candidate = format!("{}_{}.{}", base, n, extension);
        if !existing_names.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// True when the stem already reads `<prefix>_<8 digits>_<6 digits>`, with an
/// optional `_<digits>` collision counter.
pub fn is_canonical_name(file_name: &str, prefix: &str) -> bool {
    let stem = match file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => file_name,
    };
    let Some(rest) = stem
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('_'))
    else {
        return false;
    };

    let mut groups = rest.split('_');
    let date_ok = groups.next().is_some_and(|g| is_digits(g, Some(8)));
    let time_ok = groups.next().is_some_and(|g| is_digits(g, Some(6)));
    let counter_ok = groups.next().map_or(true, |g| is_digits(g, None));

    date_ok && time_ok && counter_ok && groups.next().is_none()
}

fn is_digits(value: &str, len: Option<usize>) -> bool {
    !value.is_empty()
        && value.bytes().all(|b| b.is_ascii_digit())
        && len.map_or(true, |len| value.len() == len)
}
