//! Parsers for the disk usage tables printed by `df -H` (macOS) and
//! `wmic logicaldisk get size,freespace,caption` (Windows).
//!
//! Both formats are whitespace-aligned text meant for humans, so parsing is
//! positional. Anything unexpected yields `None` rather than a guess.

use crate::domain::value_objects::platform::Platform;

/// Column holding the capacity percentage when the `df` header is not recognised.
const DF_CAPACITY_COLUMN: usize = 4;
const DF_CAPACITY_HEADERS: &[&str] = &["Capacity", "Use%"];
const ROOT_MOUNT: &str = "/";

/// Used-capacity percentage of the system volume in `raw`, or `None` if it cannot be read.
#[must_use]
pub fn parse_disk_usage(platform: Platform, raw: &str, system_drive: &str) -> Option<u8> {
    match platform {
        Platform::MacOs => parse_df_capacity(raw),
        Platform::Windows => parse_wmic_logicaldisk(raw, system_drive),
    }
}

/// Capacity of the volume mounted at `/` from `df -H` output.
#[must_use]
pub fn parse_df_capacity(raw: &str) -> Option<u8> {
    let mut lines = raw.lines().filter(|l| !l.trim().is_empty());
    let header = lines.next()?;
    let column = header
        .split_whitespace()
        .position(|h| DF_CAPACITY_HEADERS.contains(&h))
        .unwrap_or(DF_CAPACITY_COLUMN);

    lines
        .map(|l| l.split_whitespace().collect::<Vec<_>>())
        .find(|fields| fields.last() == Some(&ROOT_MOUNT))
        .and_then(|fields| fields.get(column).copied())
        .and_then(parse_percent_cell)
}

/// Used percentage of `system_drive` (e.g. `C:`) from `wmic logicaldisk` output.
#[must_use]
pub fn parse_wmic_logicaldisk(raw: &str, system_drive: &str) -> Option<u8> {
    let mut lines = raw
        .trim_start_matches('\u{feff}')
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty());
    let header: Vec<&str> = lines.next()?.split_whitespace().collect();
    let column = |name: &str| header.iter().position(|h| h.eq_ignore_ascii_case(name));
    let caption = column("Caption")?;
    let free = column("FreeSpace")?;
    let size = column("Size")?;

    let row = lines
        .map(|l| l.split_whitespace().collect::<Vec<_>>())
        .find(|fields| {
            fields
                .get(caption)
                .is_some_and(|c| c.eq_ignore_ascii_case(system_drive))
        })?;

    let free: u64 = row.get(free)?.parse().ok()?;
    let size: u64 = row.get(size)?.parse().ok()?;
    if size == 0 || free > size {
        return None;
    }
    let used = u128::from(size - free) * 100 / u128::from(size);
    u8::try_from(used).ok()
}

fn parse_percent_cell(cell: &str) -> Option<u8> {
    cell.strip_suffix('%')?
        .parse::<u8>()
        .ok()
        .filter(|v| *v <= 100)
}
