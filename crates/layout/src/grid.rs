use deckforge_types::Rect;

/// One tile of a grid, addressed by row and column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridCell {
    pub row: usize,
    pub column: usize,
    pub bounds: Rect,
}

/// Tiles `count` square cells into `area`, row-major.
///
/// Column count is `min(count, max_columns)`. Cell side is the available width
/// split evenly after gutters, shrunk if the rows would not fit the height.
/// The grid is centered horizontally and aligned to the top of `area`.
pub fn square_grid(area: Rect, count: usize, max_columns: usize, gutter: f32) -> Vec<GridCell> {
    if count == 0 || max_columns == 0 {
        return Vec::new();
    }
    let columns = count.min(max_columns);
    let rows = count.div_ceil(columns);

    let width_per_cell = (area.width - gutter * (columns - 1) as f32) / columns as f32;
    let height_per_cell = (area.height - gutter * (rows - 1) as f32) / rows as f32;
    let side = width_per_cell.min(height_per_cell).max(0.0);

    let grid_width = side * columns as f32 + gutter * (columns - 1) as f32;
    let x_start = area.x + (area.width - grid_width) / 2.0;

    (0..count)
        .map(|i| {
            let row = i / columns;
            let column = i % columns;
            GridCell {
                row,
                column,
                bounds: Rect::new(
                    x_start + column as f32 * (side + gutter),
                    area.y + row as f32 * (side + gutter),
                    side,
                    side,
                ),
            }
        })
        .collect()
}

/// Splits `area` into `count` equal slots stacked top to bottom.
pub fn vertical_stack(area: Rect, count: usize, gap: f32) -> Vec<Rect> {
    if count == 0 {
        return Vec::new();
    }
    let height = ((area.height - gap * (count - 1) as f32) / count as f32).max(0.0);
    (0..count)
        .map(|i| Rect::new(area.x, area.y + i as f32 * (height + gap), area.width, height))
        .collect()
}
