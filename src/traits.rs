use crate::crop::CropRect;
use crate::error::ServiceError;
use crate::geometry::Polygon;

/// Core trait that any element must implement to be placed in reading order
pub trait BoundingBox {
    /// Returns bounding box as (xmin, ymin, xmax, ymax)
    fn bounds(&self) -> (f32, f32, f32, f32);

    /// Returns center point (x, y)
    fn center(&self) -> (f32, f32) {
        let (x1, y1, x2, y2) = self.bounds();
        ((x1 + x2) / 2.0, (y1 + y2) / 2.0)
    }

    /// Calculate Intersection over Union with another box
    fn iou<B: BoundingBox + ?Sized>(&self, other: &B) -> f32 {
        crate::geometry::iou_bounds(self.bounds(), other.bounds())
    }
}

impl<T: BoundingBox + ?Sized> BoundingBox for &T {
    fn bounds(&self) -> (f32, f32, f32, f32) {
        (**self).bounds()
    }
}

/// A page image as far as the pipeline cares: its pixel size, used to clamp
/// crop rectangles.
pub trait PageImage {
    /// Returns (width, height) in pixels
    fn dimensions(&self) -> (u32, u32);
}

/// Text detection model producing raw quadrilaterals for a page.
pub trait TextDetector<P: ?Sized> {
    fn detect(&self, page: &P) -> Result<Vec<Polygon>, ServiceError>;
}

/// Per-region text recognition. Called once per ordered region with the
/// padded crop to read.
pub trait RegionRecognizer<P: ?Sized> {
    fn recognize(&self, page: &P, crop: CropRect) -> Result<String, ServiceError>;
}

/// Structured field extraction over a page and its recognized text.
/// Opaque to the pipeline; whatever it returns is passed through.
pub trait FieldExtractor<P: ?Sized> {
    fn extract(&self, page: &P, text: &str) -> Result<serde_json::Value, ServiceError>;
}
