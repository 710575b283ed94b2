use crate::LayoutError;
use serde::{Deserialize, Serialize};

/// Proportional slide geometry.
///
/// Every field except `max_grid_columns` is a fraction of the canvas width
/// (`*_x`, widths, gutters) or height (`*_y`, tops, heights), so the same
/// metrics work for any canvas size. The defaults reproduce a 16in x 9in deck
/// with half-inch margins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutMetrics {
    /// Horizontal margin on both sides.
    pub margin_x: f32,
    /// Distance from the top edge to the title box.
    pub margin_y: f32,
    pub title_height: f32,
    /// Where the body area (text, assets, grid) starts.
    pub body_top: f32,
    /// Where the body area ends.
    pub body_bottom: f32,
    /// Width of the text column on a text-with-asset slide.
    pub text_column_width: f32,
    /// Space between the text column and the asset column.
    pub column_gap: f32,
    /// Inset on both sides for text-only slides.
    pub text_only_inset_x: f32,
    /// Inset on both sides for asset-only slides.
    pub asset_only_inset_x: f32,
    /// Space between grid cells and between stacked assets, as a fraction of width.
    pub grid_gutter: f32,
    /// Height of the caption band under a grid.
    pub caption_height: f32,
    /// Upper bound on grid columns.
    ///
    /// Defaults to `3`.
    pub max_grid_columns: usize,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            margin_x: 0.5 / 16.0,
            margin_y: 0.5 / 9.0,
            title_height: 0.8 / 9.0,
            body_top: 2.0 / 9.0,
            body_bottom: 8.5 / 9.0,
            text_column_width: 7.0 / 16.0,
            column_gap: 1.0 / 16.0,
            text_only_inset_x: 1.5 / 16.0,
            asset_only_inset_x: 2.0 / 16.0,
            grid_gutter: 0.25 / 16.0,
            caption_height: 1.0 / 9.0,
            max_grid_columns: 3,
        }
    }
}

impl LayoutMetrics {
    /// Rejects metrics that would place anything off the canvas.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let fractions = [
            ("margin_x", self.margin_x),
            ("margin_y", self.margin_y),
            ("title_height", self.title_height),
            ("body_top", self.body_top),
            ("body_bottom", self.body_bottom),
            ("text_column_width", self.text_column_width),
            ("column_gap", self.column_gap),
            ("text_only_inset_x", self.text_only_inset_x),
            ("asset_only_inset_x", self.asset_only_inset_x),
            ("grid_gutter", self.grid_gutter),
            ("caption_height", self.caption_height),
        ];
        for (name, value) in fractions {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(LayoutError::InvalidMetrics(format!(
                    "{} must be a fraction in [0, 1], got {}",
                    name, value
                )));
            }
        }

        if self.max_grid_columns == 0 {
            return Err(LayoutError::InvalidMetrics(
                "max_grid_columns must be at least 1".to_string(),
            ));
        }
        if self.body_top >= self.body_bottom {
            return Err(LayoutError::InvalidMetrics(
                "body_top must be above body_bottom".to_string(),
            ));
        }
        if self.margin_y + self.title_height > self.body_top + f32::EPSILON {
            return Err(LayoutError::InvalidMetrics(
                "title box overlaps the body area".to_string(),
            ));
        }
        if 2.0 * self.margin_x + self.text_column_width + self.column_gap >= 1.0 {
            return Err(LayoutError::InvalidMetrics(
                "no room left for the asset column".to_string(),
            ));
        }
        if 2.0 * self.text_only_inset_x >= 1.0 || 2.0 * self.asset_only_inset_x >= 1.0 {
            return Err(LayoutError::InvalidMetrics(
                "insets leave no horizontal space".to_string(),
            ));
        }
        if self.caption_height >= self.body_bottom - self.body_top {
            return Err(LayoutError::InvalidMetrics(
                "caption band is taller than the body area".to_string(),
            ));
        }
        Ok(())
    }
}
