use crate::config::LayoutMetrics;
use crate::grid::{square_grid, vertical_stack};
use crate::variant::{ResolvedAsset, resolved_assets, select_variant};
use crate::LayoutError;
use deckforge_types::{
    Canvas, LayoutVariant, PlacedContent, PlacedSlide, Placement, Rect, Region, ResolutionMap,
    SlideSpec,
};

/// Turns a slide declaration plus its resolution outcomes into placed geometry.
///
/// Composition is a pure function of `(canvas, metrics, spec, resolutions)`:
/// no I/O, no shared state, so identical inputs give identical output.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutEngine {
    canvas: Canvas,
    metrics: LayoutMetrics,
}

impl LayoutEngine {
    pub fn new(canvas: Canvas, metrics: LayoutMetrics) -> Result<Self, LayoutError> {
        if !canvas.is_valid() {
            return Err(LayoutError::InvalidCanvas(canvas.width, canvas.height));
        }
        metrics.validate()?;
        Ok(Self { canvas, metrics })
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn metrics(&self) -> &LayoutMetrics {
        &self.metrics
    }

    pub fn compose(&self, spec: &SlideSpec, resolutions: &ResolutionMap) -> PlacedSlide {
        let assets = resolved_assets(spec, resolutions);
        let variant = select_variant(spec, &assets);

        let mut placements = Vec::new();
        if !spec.title.is_empty() {
            placements.push(Placement {
                region: Region::Title,
                bounds: self.title_box(),
                content: PlacedContent::Title {
                    text: spec.title.clone(),
                },
            });
        }

        match variant {
            LayoutVariant::TextOnly => {
                let inset = self.x(self.metrics.text_only_inset_x);
                let area = self.body_area(inset, self.canvas.width - 2.0 * inset);
                self.push_text(&mut placements, Region::Text, area, spec);
            }
            LayoutVariant::TextWithAsset => {
                let text_x = self.x(self.metrics.margin_x);
                let text_width = self.x(self.metrics.text_column_width);
                self.push_text(
                    &mut placements,
                    Region::Text,
                    self.body_area(text_x, text_width),
                    spec,
                );

                let asset_x = text_x + text_width + self.x(self.metrics.column_gap);
                let asset_width = self.canvas.width - self.x(self.metrics.margin_x) - asset_x;
                self.push_stacked(&mut placements, self.body_area(asset_x, asset_width), &assets);
            }
            LayoutVariant::AssetOnly => {
                let inset = self.x(self.metrics.asset_only_inset_x);
                let area = self.body_area(inset, self.canvas.width - 2.0 * inset);
                self.push_stacked(&mut placements, area, &assets);
            }
            LayoutVariant::Grid => self.push_grid(&mut placements, spec, &assets),
        }

        PlacedSlide {
            spec: spec.clone(),
            variant,
            placements,
            notes: None,
        }
    }

    fn x(&self, fraction: f32) -> f32 {
        fraction * self.canvas.width
    }

    fn y(&self, fraction: f32) -> f32 {
        fraction * self.canvas.height
    }

    fn title_box(&self) -> Rect {
        let margin = self.x(self.metrics.margin_x);
        Rect::new(
            margin,
            self.y(self.metrics.margin_y),
            self.canvas.width - 2.0 * margin,
            self.y(self.metrics.title_height),
        )
    }

    fn body_area(&self, x: f32, width: f32) -> Rect {
        let top = self.y(self.metrics.body_top);
        Rect::new(x, top, width, self.y(self.metrics.body_bottom) - top)
    }

    fn push_text(
        &self,
        placements: &mut Vec<Placement>,
        region: Region,
        bounds: Rect,
        spec: &SlideSpec,
    ) {
        if spec.content_blocks.is_empty() {
            return;
        }
        placements.push(Placement {
            region,
            bounds,
            content: PlacedContent::Text {
                lines: spec.content_blocks.clone(),
            },
        });
    }

    fn push_stacked(&self, placements: &mut Vec<Placement>, area: Rect, assets: &[ResolvedAsset]) {
        let gap = self.x(self.metrics.grid_gutter);
        for (index, (asset, bounds)) in assets
            .iter()
            .zip(vertical_stack(area, assets.len(), gap))
            .enumerate()
        {
            placements.push(Placement {
                region: Region::Asset { index },
                bounds,
                content: PlacedContent::Asset {
                    kind: asset.kind,
                    path: asset.path.clone(),
                },
            });
        }
    }

    fn push_grid(&self, placements: &mut Vec<Placement>, spec: &SlideSpec, assets: &[ResolvedAsset]) {
        let margin = self.x(self.metrics.margin_x);
        let width = self.canvas.width - 2.0 * margin;
        let gutter = self.x(self.metrics.grid_gutter);
        let body = self.body_area(margin, width);

        let has_caption = !spec.content_blocks.is_empty();
        let caption_height = self.y(self.metrics.caption_height);
        let grid_area = if has_caption {
            Rect::new(
                body.x,
                body.y,
                body.width,
                (body.height - caption_height - gutter).max(0.0),
            )
        } else {
            body
        };

        for (asset, cell) in assets.iter().zip(square_grid(
            grid_area,
            assets.len(),
            self.metrics.max_grid_columns,
            gutter,
        )) {
            placements.push(Placement {
                region: Region::Cell {
                    row: cell.row,
                    column: cell.column,
                },
                bounds: cell.bounds,
                content: PlacedContent::Asset {
                    kind: asset.kind,
                    path: asset.path.clone(),
                },
            });
        }

        if has_caption {
            let caption = Rect::new(
                body.x,
                body.bottom() - caption_height,
                body.width,
                caption_height,
            );
            self.push_text(placements, Region::Caption, caption, spec);
        }
    }
}
