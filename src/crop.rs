use serde::Serialize;

use crate::geometry::Region;

/// Integer pixel rectangle handed to the recognizer, `[x1, x2) × [y1, y2)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CropRect {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl CropRect {
    /// Truncate `region` to whole pixels, grow it by `padding` on every side
    /// and clamp it to an `image_width × image_height` page.
    pub fn padded(region: &Region, padding: u32, image_width: u32, image_height: u32) -> Self {
        let pad = i64::from(padding);
        let clamp = |v: i64, max: u32| v.clamp(0, i64::from(max)) as u32;

        Self {
            x1: clamp((region.xmin as i64).saturating_sub(pad), image_width),
            y1: clamp((region.ymin as i64).saturating_sub(pad), image_height),
            x2: clamp((region.xmax as i64).saturating_add(pad), image_width),
            y2: clamp((region.ymax as i64).saturating_add(pad), image_height),
        }
    }

    pub fn width(&self) -> u32 {
        self.x2.saturating_sub(self.x1)
    }

    pub fn height(&self) -> u32 {
        self.y2.saturating_sub(self.y1)
    }
}
