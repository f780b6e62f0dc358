use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::crop::CropRect;
use crate::error::{RegionError, Result, ServiceError};
use crate::geometry::{polygon_to_region, Polygon, Region};
use crate::merge::merge_all_with_stats;
use crate::reading_order::sort_reading_order;
use crate::traits::{FieldExtractor, PageImage, RegionRecognizer, TextDetector};

/// Log recognition progress every this many regions
const PROGRESS_EVERY: usize = 10;

/// Configuration for the region pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Maximum gap between box edges for two boxes to merge (pixels)
    pub proximity_threshold: f32,

    /// Tolerance for considering boxes in the same row (pixels)
    pub row_tolerance: f32,

    /// Boxes narrower or shorter than this are dropped (pixels)
    pub min_box_size: f32,

    /// Padding added around each region before recognition (pixels)
    pub crop_padding: u32,

    /// Extra recognition attempts per region after the first failure
    pub recognition_retries: u32,

    /// Name of the field extraction model. Only feeds the cache key.
    pub extraction_model: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            proximity_threshold: 30.0,
            row_tolerance: 20.0,
            min_box_size: 10.0,
            crop_padding: 2,
            recognition_retries: 2,
            extraction_model: "gpt-4o-mini".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Reject negative or non-finite pixel thresholds.
    pub fn validate(&self) -> Result<()> {
        let thresholds = [
            ("proximity_threshold", self.proximity_threshold),
            ("row_tolerance", self.row_tolerance),
            ("min_box_size", self.min_box_size),
        ];

        for (field, value) in thresholds {
            if !value.is_finite() || value < 0.0 {
                return Err(RegionError::InvalidConfig {
                    field,
                    reason: format!("must be a finite, non-negative pixel value (got {value})"),
                });
            }
        }

        Ok(())
    }
}

/// Statistics describing how a page's regions were consolidated
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageMetadata {
    /// Polygons received from the detector
    pub regions_detected: usize,
    /// Regions left after filtering and merging
    pub regions_merged: usize,
    pub merge_passes: usize,
    /// False when merging stopped at the pass cap
    pub converged: bool,
    pub proximity_threshold: f32,
    pub row_tolerance: f32,
}

/// Merged regions of one page in reading order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageLayout {
    pub regions: Vec<Region>,
    pub metadata: PageMetadata,
}

/// Output of a full [`RegionPipeline::process`] run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageResult {
    pub layout: PageLayout,
    /// Recognized text of every region in reading order, one per line
    pub raw_text: String,
    /// Whatever the field extractor produced, if one ran and succeeded
    pub fields: Option<serde_json::Value>,
    pub extraction_error: Option<String>,
    pub processing_time_secs: f64,
}

/// Filter -> merge -> sort over detector polygons, with optional
/// recognition and extraction through injected collaborators.
///
/// Holds no per-page state, so one pipeline can serve many pages
/// concurrently.
#[derive(Debug, Clone)]
pub struct RegionPipeline {
    config: PipelineConfig,
}

impl RegionPipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Main entry point: turn raw detector polygons into merged regions in
    /// reading order.
    pub fn layout(&self, polygons: &[Polygon]) -> Result<PageLayout> {
        if polygons.is_empty() {
            return Err(RegionError::NoRegionsDetected);
        }

        let regions: Vec<Region> = polygons.iter().map(polygon_to_region).collect();
        debug!("Converted {} polygons to regions", regions.len());

        let outcome = merge_all_with_stats(
            &regions,
            self.config.proximity_threshold,
            self.config.min_box_size,
        );
        if !outcome.converged {
            warn!(
                "Returning under-merged layout after {} passes",
                outcome.passes
            );
        }

        let ordered = sort_reading_order(&outcome.regions, self.config.row_tolerance);
        debug!(
            "Ordered {} merged regions from {} detections",
            ordered.len(),
            polygons.len()
        );

        Ok(PageLayout {
            metadata: PageMetadata {
                regions_detected: polygons.len(),
                regions_merged: ordered.len(),
                merge_passes: outcome.passes,
                converged: outcome.converged,
                proximity_threshold: self.config.proximity_threshold,
                row_tolerance: self.config.row_tolerance,
            },
            regions: ordered,
        })
    }

    /// Lay out independent pages in parallel. Results line up with `pages`.
    pub fn layout_batch(&self, pages: &[Vec<Polygon>]) -> Vec<Result<PageLayout>> {
        pages
            .par_iter()
            .map(|polygons| self.layout(polygons))
            .collect()
    }

    /// Full page flow: detect, lay out, recognize every region in order,
    /// then hand the joined text to the field extractor if there is one.
    ///
    /// Recognition and extraction failures degrade the result instead of
    /// failing the page. Only detection failure or an empty detection is
    /// an error.
    pub fn process<P, D, R>(
        &self,
        page: &P,
        detector: &D,
        recognizer: &R,
        extractor: Option<&dyn FieldExtractor<P>>,
    ) -> Result<PageResult>
    where
        P: PageImage + ?Sized,
        D: TextDetector<P> + ?Sized,
        R: RegionRecognizer<P> + ?Sized,
    {
        let start = Instant::now();

        info!("Detecting text regions...");
        let polygons = detector.detect(page).map_err(RegionError::Detection)?;
        info!("Found {} text regions", polygons.len());

        let layout = self.layout(&polygons)?;
        info!(
            "Recognizing {} merged regions",
            layout.metadata.regions_merged
        );

        let (width, height) = page.dimensions();
        let mut raw_text = String::new();
        for (i, region) in layout.regions.iter().enumerate() {
            let crop = CropRect::padded(region, self.config.crop_padding, width, height);
            let text = self.recognize_with_retry(page, recognizer, crop);
            if !text.is_empty() {
                raw_text.push_str(&text);
                raw_text.push('\n');
            }

            if (i + 1) % PROGRESS_EVERY == 0 {
                info!("Processed {}/{} regions", i + 1, layout.regions.len());
            }
        }
        info!("Text recognition complete ({} characters)", raw_text.len());

        let (fields, extraction_error) = match extractor {
            Some(extractor) => match extractor.extract(page, &raw_text) {
                Ok(fields) => (Some(fields), None),
                Err(e) => {
                    warn!("Field extraction failed: {}", e);
                    (None, Some(e.to_string()))
                }
            },
            None => (None, None),
        };

        let processing_time_secs = start.elapsed().as_secs_f64();
        info!("Page processed in {:.2} seconds", processing_time_secs);

        Ok(PageResult {
            layout,
            raw_text: raw_text.trim().to_string(),
            fields,
            extraction_error,
            processing_time_secs,
        })
    }

    fn recognize_with_retry<P, R>(&self, page: &P, recognizer: &R, crop: CropRect) -> String
    where
        P: ?Sized,
        R: RegionRecognizer<P> + ?Sized,
    {
        let attempts = self.config.recognition_retries + 1;
        let mut last_err: Option<ServiceError> = None;

        for attempt in 1..=attempts {
            match recognizer.recognize(page, crop) {
                Ok(text) => return text.trim().to_string(),
                Err(e) => {
                    if attempt < attempts {
                        warn!("Recognition attempt {} failed, retrying...", attempt);
                    }
                    last_err = Some(e);
                }
            }
        }

        if let Some(e) = last_err {
            warn!("Failed to recognize region {:?}: {}", crop, e);
        }
        String::new()
    }
}
