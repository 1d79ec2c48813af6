//! Viewport context and device framing
//!
//! Renderers never measure anything themselves: the preview driver hands them
//! a [`ViewportContext`] and they derive the active [`Breakpoint`] from it.

use serde::{Deserialize, Serialize};

/// Widths below this are treated as phones
pub const MOBILE_MAX_WIDTH: f64 = 640.0;

/// Widths below this (and at least [`MOBILE_MAX_WIDTH`]) are treated as tablets
pub const TABLET_MAX_WIDTH: f64 = 1024.0;

/// Smallest scale a simulated device frame is shrunk to
pub const MIN_FRAME_SCALE: f64 = 0.2;

/// Layout breakpoint a renderer adapts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    Mobile,
    Tablet,
    Desktop,
}

impl Breakpoint {
    pub fn for_width(width: f64) -> Self {
        if width < MOBILE_MAX_WIDTH {
            Breakpoint::Mobile
        } else if width < TABLET_MAX_WIDTH {
            Breakpoint::Tablet
        } else {
            Breakpoint::Desktop
        }
    }

    /// Narrow screens cap the product grid
    pub fn cap_columns(self, columns: i64) -> i64 {
        match self {
            Breakpoint::Mobile => columns.min(2),
            Breakpoint::Tablet => columns.min(3),
            Breakpoint::Desktop => columns,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Breakpoint::Mobile => "mobile",
            Breakpoint::Tablet => "tablet",
            Breakpoint::Desktop => "desktop",
        }
    }
}

/// Viewport information injected into renderers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportContext {
    /// Width of the surface the tree is mounted in, in CSS pixels
    pub width: f64,
    /// Explicit override that wins over the measured width
    pub forced: Option<Breakpoint>,
}

impl ViewportContext {
    pub fn measured(width: f64) -> Self {
        Self {
            width,
            forced: None,
        }
    }

    pub fn forced(breakpoint: Breakpoint) -> Self {
        let width = match breakpoint {
            Breakpoint::Mobile => DevicePreset::mobile().width,
            Breakpoint::Tablet => DevicePreset::tablet().width,
            Breakpoint::Desktop => TABLET_MAX_WIDTH,
        };
        Self {
            width,
            forced: Some(breakpoint),
        }
    }

    pub fn breakpoint(&self) -> Breakpoint {
        self.forced
            .unwrap_or_else(|| Breakpoint::for_width(self.width))
    }
}

impl Default for ViewportContext {
    fn default() -> Self {
        Self::measured(TABLET_MAX_WIDTH)
    }
}

/// Device chosen in the editor toolbar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    #[default]
    Desktop,
    Mobile,
    Tablet,
}

/// Fixed logical size of a simulated device
#[derive(Debug, Clone, PartialEq)]
pub struct DevicePreset {
    pub device: Device,
    pub width: f64,
    pub height: f64,
    /// Upper bound for the frame scale
    pub max_scale: f64,
}

impl DevicePreset {
    pub fn mobile() -> Self {
        Self {
            device: Device::Mobile,
            width: 390.0,
            height: 844.0,
            max_scale: 1.0,
        }
    }

    pub fn tablet() -> Self {
        Self {
            device: Device::Tablet,
            width: 820.0,
            height: 1180.0,
            max_scale: 0.85,
        }
    }

    /// Scale the device frame into the space left for the preview
    pub fn fit(&self, available_width: f64, available_height: f64) -> FrameGeometry {
        let by_width = available_width / self.width;
        let by_height = available_height / self.height;
        let mut scale = by_width.min(by_height);
        if !scale.is_finite() {
            scale = MIN_FRAME_SCALE;
        }
        let scale = scale.min(self.max_scale).max(MIN_FRAME_SCALE);
        FrameGeometry {
            scale,
            width: self.width,
            height: self.height,
        }
    }
}

/// Computed framing for the active preview
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameGeometry {
    /// CSS transform scale applied to the device frame (1.0 on desktop)
    pub scale: f64,
    /// Logical width the tree lays out against
    pub width: f64,
    /// Logical height, or 0 for fluid desktop
    pub height: f64,
}

impl FrameGeometry {
    /// Fluid desktop framing: no scaling, width capped at `max_width`
    pub fn desktop(available_width: f64, max_width: f64) -> Self {
        Self {
            scale: 1.0,
            width: available_width.clamp(0.0, max_width),
            height: 0.0,
        }
    }

    pub fn scaled_width(&self) -> f64 {
        self.width * self.scale
    }

    pub fn scaled_height(&self) -> f64 {
        self.height * self.scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakpoint_thresholds() {
        assert_eq!(Breakpoint::for_width(390.0), Breakpoint::Mobile);
        assert_eq!(Breakpoint::for_width(639.9), Breakpoint::Mobile);
        assert_eq!(Breakpoint::for_width(640.0), Breakpoint::Tablet);
        assert_eq!(Breakpoint::for_width(1023.0), Breakpoint::Tablet);
        assert_eq!(Breakpoint::for_width(1024.0), Breakpoint::Desktop);
    }

    #[test]
    fn test_forced_breakpoint_wins() {
        let ctx = ViewportContext {
            width: 1600.0,
            forced: Some(Breakpoint::Mobile),
        };
        assert_eq!(ctx.breakpoint(), Breakpoint::Mobile);
    }

    #[test]
    fn test_cap_columns() {
        assert_eq!(Breakpoint::Mobile.cap_columns(5), 2);
        assert_eq!(Breakpoint::Tablet.cap_columns(5), 3);
        assert_eq!(Breakpoint::Desktop.cap_columns(5), 5);
        assert_eq!(Breakpoint::Mobile.cap_columns(1), 1);
    }

    #[test]
    fn test_fit_limited_by_height() {
        let frame = DevicePreset::mobile().fit(2000.0, 422.0);
        assert!((frame.scale - 0.5).abs() < 1e-9);
        assert!((frame.scaled_height() - 422.0).abs() < 1e-9);
    }

    #[test]
    fn test_fit_clamped_to_max_scale() {
        let frame = DevicePreset::tablet().fit(5000.0, 5000.0);
        assert_eq!(frame.scale, 0.85);
    }

    #[test]
    fn test_fit_never_collapses() {
        let frame = DevicePreset::mobile().fit(0.0, -20.0);
        assert_eq!(frame.scale, MIN_FRAME_SCALE);
    }

    #[test]
    fn test_desktop_is_fluid_up_to_max() {
        let frame = FrameGeometry::desktop(1900.0, 1280.0);
        assert_eq!(frame.scale, 1.0);
        assert_eq!(frame.width, 1280.0);
        assert_eq!(FrameGeometry::desktop(900.0, 1280.0).width, 900.0);
    }
}
