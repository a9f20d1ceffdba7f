//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Output dimensions when only a target width is given.
///
/// Height scales proportionally and never drops below one pixel. Enlarging
/// is allowed: a target wider than the source scales it up.
///
/// ```text
/// (4000, 1600) → width 2500 → (2500, 1000)
/// (800, 600)   → width 800  → (800, 600)
/// ```
pub fn calculate_width_fit(source: (u32, u32), target_width: u32) -> (u32, u32) {
    let (src_w, src_h) = source;
    let h = (src_h as f64 * target_width as f64 / src_w as f64).round() as u32;
    (target_width, h.max(1))
}

/// Calculate dimensions needed to fill a target area (resize before crop).
///
/// Returns dimensions that completely cover the target area while maintaining
/// the source aspect ratio. One dimension will match exactly, the other may exceed.
///
/// # Arguments
/// * `source` - Original image dimensions (width, height)
/// * `target` - Target area dimensions (width, height)
///
/// # Returns
/// * `(width, height)` - Fill dimensions (at least one matches target)
pub fn calculate_fill_dimensions(source: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (tgt_w, tgt_h) = target;

    let src_aspect = src_w as f64 / src_h as f64;
    let tgt_aspect = tgt_w as f64 / tgt_h as f64;

    if src_aspect > tgt_aspect {
        // Source is wider: height will match, width will exceed
        let h = tgt_h;
        let w = (h as f64 * src_aspect).round() as u32;
        (w, h)
    } else {
        // Source is taller: width will match, height will exceed
        let w = tgt_w;
        let h = (w as f64 / src_aspect).round() as u32;
        (w, h)
    }
}

/// Top-left corner of a centered `crop` inside `filled`.
pub fn calculate_center_crop_origin(filled: (u32, u32), crop: (u32, u32)) -> (u32, u32) {
    (
        filled.0.saturating_sub(crop.0) / 2,
        filled.1.saturating_sub(crop.1) / 2,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // calculate_width_fit tests
    // =========================================================================

    #[test]
    fn width_fit_downscales_proportionally() {
        assert_eq!(calculate_width_fit((4000, 1600), 2500), (2500, 1000));
        assert_eq!(calculate_width_fit((3000, 2000), 1500), (1500, 1000));
    }

    #[test]
    fn width_fit_same_width_is_identity() {
        assert_eq!(calculate_width_fit((800, 600), 800), (800, 600));
    }

    #[test]
    fn width_fit_upscales() {
        // Narrow panoramas are enlarged to the fixed panorama width
        assert_eq!(calculate_width_fit((2100, 1000), 2500), (2500, 1190));
    }

    #[test]
    fn width_fit_rounds_height() {
        // 1001x333 → 500 wide → 166.33 → 166
        assert_eq!(calculate_width_fit((1001, 333), 500), (500, 166));
    }

    #[test]
    fn width_fit_never_zero_height() {
        assert_eq!(calculate_width_fit((10000, 1), 100), (100, 1));
    }

    // =========================================================================
    // calculate_fill_dimensions tests
    // =========================================================================

    #[test]
    fn fill_wider_source_to_square_target() {
        // 1200x1000 → 900x900: height matches, width = 900 * 1.2 = 1080
        assert_eq!(calculate_fill_dimensions((1200, 1000), (900, 900)), (1080, 900));
    }

    #[test]
    fn fill_taller_source_to_square_target() {
        assert_eq!(calculate_fill_dimensions((1000, 1200), (900, 900)), (900, 1080));
    }

    #[test]
    fn fill_same_aspect_ratio() {
        assert_eq!(calculate_fill_dimensions((3000, 3000), (900, 900)), (900, 900));
    }

    // =========================================================================
    // calculate_center_crop_origin tests
    // =========================================================================

    #[test]
    fn center_crop_wide_fill() {
        assert_eq!(calculate_center_crop_origin((1080, 900), (900, 900)), (90, 0));
    }

    #[test]
    fn center_crop_exact_fill() {
        assert_eq!(calculate_center_crop_origin((900, 900), (900, 900)), (0, 0));
    }
}
