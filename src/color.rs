//! Mapping raw waypoint colors onto named palette colors

use crate::config::Palette;
use crate::nbt::Tag;

/// Name of the palette entry closest to `rgb` (squared Euclidean distance).
/// Ties go to the entry declared first.
pub fn nearest_named(palette: &Palette, rgb: u32) -> &str {
    let (r, g, b) = split_rgb(rgb);
    let mut best: Option<(&str, i64)> = None;

    for color in &palette.colors {
        let (cr, cg, cb) = split_rgb(color.rgb);
        let (dr, dg, db) = (r - cr, g - cg, b - cb);
        let dist = dr * dr + dg * dg + db * db;
        if best.map_or(true, |(_, d)| dist < d) {
            best = Some((color.name.as_str(), dist));
        }
    }

    best.map(|(name, _)| name).unwrap_or_else(|| palette.fallback())
}

/// Resolve a color string: palette name, `#RRGGBB`, or a decimal integer
pub fn map_color_str<'a>(palette: &'a Palette, s: &str) -> &'a str {
    let normalized = s.trim().to_lowercase().replace(' ', "_");
    if let Some(color) = palette.colors.iter().find(|c| c.name == normalized) {
        return &color.name;
    }

    if let Some(hex) = s.strip_prefix('#') {
        if s.len() == 7 {
            if let Ok(rgb) = u32::from_str_radix(hex, 16) {
                return nearest_named(palette, rgb & 0xFFFFFF);
            }
        }
        return palette.fallback();
    }

    match s.parse::<i32>() {
        Ok(value) => nearest_named(palette, value as u32 & 0xFFFFFF),
        Err(_) => palette.fallback(),
    }
}

/// Resolve the `color` tag of a waypoint. Missing or unusable values fall back
/// to the palette default.
pub fn map_color<'a>(palette: &'a Palette, tag: Option<&Tag>) -> &'a str {
    match tag {
        Some(Tag::String(s)) => map_color_str(palette, s),
        Some(tag) => match tag.as_i32() {
            Some(value) => nearest_named(palette, value as u32 & 0xFFFFFF),
            None => palette.fallback(),
        },
        None => palette.fallback(),
    }
}

fn split_rgb(rgb: u32) -> (i64, i64, i64) {
    (
        ((rgb >> 16) & 0xFF) as i64,
        ((rgb >> 8) & 0xFF) as i64,
        (rgb & 0xFF) as i64,
    )
}
