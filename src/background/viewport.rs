//! Viewport-dependent image choice.

use crate::background::types::ResolvedBackground;

/// Widths strictly below this are treated as mobile.
pub const MOBILE_BREAKPOINT_PX: u32 = 768;

/// Pick the single image URL to paint at `width` logical pixels.
///
/// Mobile viewports prefer the mobile image; everything else prefers desktop.
/// Either image stands in for the other when only one exists. Empty strings
/// count as missing.
pub fn pick_for_width<'a>(desktop_url: Option<&'a str>, mobile_url: Option<&'a str>, width: u32) -> Option<&'a str> {
    let desktop_url = desktop_url.filter(|u| !u.is_empty());
    let mobile_url = mobile_url.filter(|u| !u.is_empty());

    if width < MOBILE_BREAKPOINT_PX {
        if let Some(mobile) = mobile_url {
            return Some(mobile);
        }
    }
    desktop_url.or(mobile_url)
}

impl ResolvedBackground {
    /// The image to paint at `width`, see [`pick_for_width`].
    pub fn image_for_width(&self, width: u32) -> Option<&str> {
        pick_for_width(self.desktop_url.as_deref(), self.mobile_url.as_deref(), width)
    }
}
