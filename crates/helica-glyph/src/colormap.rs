use glam::Vec3;

use crate::error::GlyphError;

/// Default ramp for time values, early to late.
pub const TIME_COLORS: [[u8; 3]; 5] = [
    [255, 255, 204],
    [161, 218, 180],
    [65, 182, 196],
    [44, 127, 184],
    [37, 52, 148],
];

/// Correlation colors tying an axis set to its objects, one per palette slot.
pub const CORR_COLORS: [[u8; 3]; 8] = [
    [27, 158, 119],
    [217, 95, 2],
    [117, 112, 179],
    [231, 41, 138],
    [102, 166, 30],
    [230, 171, 2],
    [166, 118, 29],
    [102, 102, 102],
];

/// Normalize an 8-bit RGB triple to `[0, 1]`.
pub fn rgb_to_unit(rgb: [u8; 3]) -> Vec3 {
    Vec3::new(rgb[0] as f32, rgb[1] as f32, rgb[2] as f32) / 255.0
}

/// Normalized correlation color of a palette slot, wrapping past the palette size.
pub fn correlation_color(slot: usize) -> Vec3 {
    rgb_to_unit(CORR_COLORS[slot % CORR_COLORS.len()])
}

/// Sample `count` colors from equidistant RGB stops by linear interpolation.
///
/// The first sample is the first stop and the last sample the last stop.
///
/// # Arguments
///
/// * `stops` - RGB stops in `[0, 255]`, equally spaced along the ramp.
/// * `count` - Number of colors to return.
///
/// # Returns
///
/// `count` colors in `[0, 1]`.
///
/// Example:
///
/// ```
/// use helica_glyph::colormap::colormap_rgb;
///
/// let ramp = colormap_rgb(&[[0, 0, 0], [255, 255, 255]], 3).unwrap();
/// assert_eq!(ramp.len(), 3);
/// assert!((ramp[1].x - 0.5).abs() < 1e-6);
/// ```
pub fn colormap_rgb(stops: &[[u8; 3]], count: usize) -> Result<Vec<Vec3>, GlyphError> {
    if stops.is_empty() {
        return Err(GlyphError::EmptyColorRamp);
    }

    let last = (stops.len() - 1) as f64;
    let step = if count > 1 {
        last / (count - 1) as f64
    } else {
        0.0
    };

    let colors = (0..count)
        .map(|i| {
            let x = (i as f64 * step).clamp(0.0, last);
            let lo = x.floor() as usize;
            let hi = (lo + 1).min(stops.len() - 1);
            let t = (x - lo as f64) as f32;
            rgb_to_unit(stops[lo]).lerp(rgb_to_unit(stops[hi]), t)
        })
        .collect();

    Ok(colors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_colormap_endpoints_hit_stops() -> Result<(), GlyphError> {
        let ramp = colormap_rgb(&TIME_COLORS, 9)?;
        assert_eq!(ramp.len(), 9);
        assert!(ramp[0].abs_diff_eq(rgb_to_unit(TIME_COLORS[0]), 1e-6));
        assert!(ramp[8].abs_diff_eq(rgb_to_unit(TIME_COLORS[4]), 1e-6));
        // every other sample lands exactly on a stop
        assert!(ramp[4].abs_diff_eq(rgb_to_unit(TIME_COLORS[2]), 1e-6));
        // halfway between the first two stops
        assert_relative_eq!(ramp[1].x, (255.0 + 161.0) / 2.0 / 255.0, epsilon = 1e-6);
        Ok(())
    }

    #[test]
    fn test_colormap_degenerate_counts() -> Result<(), GlyphError> {
        assert!(colormap_rgb(&TIME_COLORS, 0)?.is_empty());
        let single = colormap_rgb(&TIME_COLORS, 1)?;
        assert!(single[0].abs_diff_eq(rgb_to_unit(TIME_COLORS[0]), 1e-6));
        let flat = colormap_rgb(&[[10, 20, 30]], 4)?;
        assert!(flat.iter().all(|c| c.abs_diff_eq(flat[0], 0.0)));
        assert_eq!(colormap_rgb(&[], 3), Err(GlyphError::EmptyColorRamp));
        Ok(())
    }

    #[test]
    fn test_correlation_color_wraps() {
        assert_eq!(correlation_color(0), correlation_color(8));
        assert_relative_eq!(correlation_color(1).x, 217.0 / 255.0);
    }
}
