//! Display-size policy per aspect category.
//!
//! | Category | Target |
//! |---|---|
//! | Landscape | width capped at [`MAX_LANDSCAPE_WIDTH`] |
//! | Portrait | original width (see [`plan`]) |
//! | Panorama | width fixed at [`MAX_PANORAMA_WIDTH`] |
//! | Square | exact [`MAX_SQUARE_SIDE`] box |
//!
//! Only squares set a height. Everything else is width-driven and the image
//! engine derives the height from the aspect ratio.

use crate::classify::AspectCategory;

pub const MAX_LANDSCAPE_WIDTH: u32 = 1500;
pub const MAX_PANORAMA_WIDTH: u32 = 2500;
pub const MAX_PORTRAIT_HEIGHT: u32 = 1200;
pub const MAX_SQUARE_SIDE: u32 = 900;

/// Resize request handed to the image engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeSpec {
    pub target_width: u32,
    /// Set only when the output must fill an exact box.
    pub target_height: Option<u32>,
}

impl ResizeSpec {
    pub fn width(target_width: u32) -> Self {
        Self {
            target_width,
            target_height: None,
        }
    }

    pub fn exact(target_width: u32, target_height: u32) -> Self {
        Self {
            target_width,
            target_height: Some(target_height),
        }
    }
}

/// Map a category and corrected dimensions to a resize request.
///
/// Portraits compare their height against [`MAX_PORTRAIT_HEIGHT`] but keep
/// the corrected width in both outcomes.
pub fn plan(category: AspectCategory, corrected_width: u32, corrected_height: u32) -> ResizeSpec {
    match category {
        AspectCategory::Landscape => ResizeSpec::width(corrected_width.min(MAX_LANDSCAPE_WIDTH)),
        AspectCategory::Portrait => {
            #[allow(clippy::if_same_then_else)]
            let target_width = if corrected_height > MAX_PORTRAIT_HEIGHT {
                corrected_width
            } else {
                corrected_width
            };
            ResizeSpec::width(target_width)
        }
        AspectCategory::Panorama => ResizeSpec::width(MAX_PANORAMA_WIDTH),
        AspectCategory::Square => ResizeSpec::exact(MAX_SQUARE_SIDE, MAX_SQUARE_SIDE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landscape_wider_than_cap_is_clamped() {
        assert_eq!(
            plan(AspectCategory::Landscape, 3000, 2000),
            ResizeSpec::width(1500)
        );
    }

    #[test]
    fn landscape_narrower_than_cap_passes_through() {
        assert_eq!(
            plan(AspectCategory::Landscape, 800, 600),
            ResizeSpec::width(800)
        );
    }

    #[test]
    fn landscape_at_cap() {
        assert_eq!(
            plan(AspectCategory::Landscape, 1500, 1000),
            ResizeSpec::width(1500)
        );
    }

    #[test]
    fn portrait_width_passes_through_below_height_cap() {
        assert_eq!(
            plan(AspectCategory::Portrait, 600, 900),
            ResizeSpec::width(600)
        );
    }

    #[test]
    fn portrait_width_passes_through_above_height_cap() {
        assert_eq!(
            plan(AspectCategory::Portrait, 3000, 4000),
            ResizeSpec::width(3000)
        );
    }

    #[test]
    fn panorama_width_is_fixed() {
        for (w, h) in [(4000, 1600), (2100, 1000), (12000, 2000)] {
            assert_eq!(
                plan(AspectCategory::Panorama, w, h),
                ResizeSpec::width(2500),
                "{w}x{h}"
            );
        }
    }

    #[test]
    fn square_is_exact_box_regardless_of_input() {
        for (w, h) in [(100, 100), (900, 900), (6000, 6000)] {
            let spec = plan(AspectCategory::Square, w, h);
            assert_eq!(spec.target_width, 900);
            assert_eq!(spec.target_height, Some(900));
        }
    }

    #[test]
    fn only_square_sets_height() {
        assert!(plan(AspectCategory::Landscape, 2000, 1000).target_height.is_none());
        assert!(plan(AspectCategory::Portrait, 1000, 2000).target_height.is_none());
        assert!(plan(AspectCategory::Panorama, 5000, 1000).target_height.is_none());
    }
}
