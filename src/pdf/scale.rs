//! Width-fit and HiDPI scaling
//!
//! Pages are always fitted to the width of their container. On high-density
//! displays the page is rendered at `dpr` times the display size and shown
//! at the display size, which keeps text sharp.

use super::error::{RenderError, RenderResult};
use super::types::{PageSize, Viewport};

/// Upper bound for the device pixel ratio used when rendering
pub const MAX_DEVICE_PIXEL_RATIO: f32 = 3.0;
/// Container width assumed for thumbnails when the real one is unknown
pub const THUMBNAIL_FALLBACK_WIDTH: f32 = 300.0;
/// Container width assumed for the viewer stage when the real one is unknown
pub const VIEWER_FALLBACK_WIDTH: f32 = 900.0;

/// Scale that makes a page of `base_width` exactly `container_width` wide
pub fn fit_width_scale(container_width: f32, base_width: f32) -> RenderResult<f32> {
    if !container_width.is_finite() || container_width <= 0.0 {
        return Err(RenderError::geometry(format!(
            "container width {container_width}"
        )));
    }
    if !base_width.is_finite() || base_width <= 0.0 {
        return Err(RenderError::geometry(format!("page width {base_width}")));
    }
    Ok(container_width / base_width)
}

/// Clamp a reported device pixel ratio to `1.0..=MAX_DEVICE_PIXEL_RATIO`
#[must_use]
pub fn clamp_device_pixel_ratio(dpr: f32) -> f32 {
    if !dpr.is_finite() {
        return 1.0;
    }
    dpr.clamp(1.0, MAX_DEVICE_PIXEL_RATIO)
}

/// Replace an unknown (zero, negative, NaN) container width with `fallback`
#[must_use]
pub fn container_width_or(width: f32, fallback: f32) -> f32 {
    if width.is_finite() && width > 0.0 {
        width
    } else {
        fallback
    }
}

/// Display and device viewports for one page render
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HiDpiViewports {
    /// What the user sees; sets the canvas display size
    pub display: Viewport,
    /// What gets rasterized; sets the canvas pixel size
    pub device: Viewport,
}

impl HiDpiViewports {
    /// Fit `page` to `container_width`, rasterizing at the clamped `dpr`
    pub fn fit(page: PageSize, container_width: f32, dpr: f32) -> RenderResult<Self> {
        let display_scale = fit_width_scale(container_width, page.width)?;
        let device_scale = display_scale * clamp_device_pixel_ratio(dpr);
        Ok(Self {
            display: page.viewport(display_scale),
            device: page.viewport(device_scale),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LETTER: PageSize = PageSize::new(612.0, 792.0);

    #[test]
    fn fit_width_divides_container_by_page() {
        let scale = fit_width_scale(306.0, 612.0).unwrap();
        assert!((scale - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn fit_width_rejects_degenerate_input() {
        assert!(fit_width_scale(0.0, 612.0).is_err());
        assert!(fit_width_scale(300.0, 0.0).is_err());
        assert!(fit_width_scale(f32::NAN, 612.0).is_err());
        assert!(fit_width_scale(300.0, f32::INFINITY).is_err());
    }

    #[test]
    fn dpr_is_clamped_between_one_and_three() {
        assert_eq!(clamp_device_pixel_ratio(0.5), 1.0);
        assert_eq!(clamp_device_pixel_ratio(2.0), 2.0);
        assert_eq!(clamp_device_pixel_ratio(4.0), 3.0);
        assert_eq!(clamp_device_pixel_ratio(f32::NAN), 1.0);
    }

    #[test]
    fn unknown_container_width_falls_back() {
        assert_eq!(container_width_or(0.0, 900.0), 900.0);
        assert_eq!(container_width_or(-1.0, 900.0), 900.0);
        assert_eq!(container_width_or(640.0, 900.0), 640.0);
    }

    #[test]
    fn hidpi_device_viewport_is_dpr_times_display() {
        let vps = HiDpiViewports::fit(LETTER, 612.0, 2.0).unwrap();
        assert_eq!(vps.display.rounded(), (612, 792));
        assert_eq!(vps.device.rounded(), (1224, 1584));
    }

    #[test]
    fn hidpi_caps_device_scale_at_three() {
        let vps = HiDpiViewports::fit(LETTER, 306.0, 8.0).unwrap();
        assert!((vps.device.scale - 1.5).abs() < 1e-6);
    }
}
