//! Grid placement for album and photo tiles.
//!
//! Everything here is a pure function of its inputs. Density runs from 1
//! (smallest tiles, most columns) to 5 (largest tiles, fewest columns); values
//! outside that range fall back to [`DEFAULT_DENSITY`].

use crate::domain::Orientation;

pub const MIN_DENSITY: u8 = 1;
pub const MAX_DENSITY: u8 = 5;
pub const DEFAULT_DENSITY: u8 = 3;

pub const MAX_GAP: u8 = 5;
pub const DEFAULT_GAP: u8 = 2;

/// List rows show thumbnails at this height.
pub const LIST_THUMBNAIL_HEIGHT: u32 = 80;

/// Column counts per responsive breakpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Columns {
    pub base: u8,
    pub sm: u8,
    pub md: u8,
    pub lg: u8,
    pub xl: u8,
}

impl Columns {
    const fn new(base: u8, sm: u8, md: u8, lg: u8, xl: u8) -> Self {
        Self { base, sm, md, lg, xl }
    }
}

/// Width to height ratio of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AspectRatio {
    pub width: u32,
    pub height: u32,
}

impl AspectRatio {
    pub fn as_f32(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// How one photo tile is placed in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutDirective {
    pub columns: Columns,
    /// Grid cells the tile spans horizontally.
    pub span: u8,
    pub aspect_ratio: AspectRatio,
    /// Narrowest a grid cell may get, in CSS pixels.
    pub min_tile_px: u32,
    /// Later tiles may back-fill holes left by wide tiles.
    pub dense_flow: bool,
}

impl LayoutDirective {
    /// Span clamped to the columns actually available.
    pub fn span_within(&self, columns: u8) -> u8 {
        self.span.min(columns.max(1))
    }
}

const PHOTO_COLUMNS: [Columns; 5] = [
    Columns::new(3, 4, 5, 6, 8),
    Columns::new(2, 3, 4, 5, 6),
    Columns::new(1, 2, 3, 5, 5),
    Columns::new(1, 2, 3, 4, 4),
    Columns::new(1, 1, 2, 3, 3),
];

const ALBUM_COLUMNS: [Columns; 5] = [
    Columns::new(4, 5, 6, 8, 10),
    Columns::new(3, 5, 6, 7, 8),
    Columns::new(3, 4, 5, 6, 7),
    Columns::new(2, 3, 4, 5, 6),
    Columns::new(1, 2, 3, 4, 5),
];

const MIN_TILE_PX: [u32; 5] = [120, 150, 180, 220, 260];

/// Clamp a density setting to the supported scale.
pub fn normalize_density(density: u8) -> u8 {
    if (MIN_DENSITY..=MAX_DENSITY).contains(&density) {
        density
    } else {
        DEFAULT_DENSITY
    }
}

fn density_index(density: u8) -> usize {
    (normalize_density(density) - MIN_DENSITY) as usize
}

pub fn aspect_ratio(orientation: Orientation) -> AspectRatio {
    match orientation {
        Orientation::Portrait => AspectRatio { width: 2, height: 3 },
        Orientation::Landscape => AspectRatio { width: 3, height: 2 },
    }
}

pub fn layout_for(orientation: Orientation, density: u8) -> LayoutDirective {
    let idx = density_index(density);
    LayoutDirective {
        columns: PHOTO_COLUMNS[idx],
        span: match orientation {
            Orientation::Portrait => 1,
            Orientation::Landscape => 2,
        },
        aspect_ratio: aspect_ratio(orientation),
        min_tile_px: MIN_TILE_PX[idx],
        dense_flow: true,
    }
}

/// Columns for the album overview, where every tile is square.
pub fn album_grid(density: u8) -> Columns {
    ALBUM_COLUMNS[density_index(density)]
}

/// Grid gap in pixels for a gap level 0–5 (4 px per level).
pub fn gap_px(level: u8) -> u32 {
    let level = if level <= MAX_GAP { level } else { DEFAULT_GAP };
    level as u32 * 4
}

/// Thumbnail size `(width, height)` in list view.
pub fn list_thumbnail(orientation: Orientation) -> (u32, u32) {
    let ratio = aspect_ratio(orientation);
    let width = LIST_THUMBNAIL_HEIGHT * ratio.width / ratio.height;
    (width, LIST_THUMBNAIL_HEIGHT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landscape_spans_two_cells() {
        let d = layout_for(Orientation::Landscape, 3);
        assert_eq!(d.span, 2);
        assert_eq!(d.aspect_ratio, AspectRatio { width: 3, height: 2 });
        assert!(d.dense_flow);
    }

    #[test]
    fn test_portrait_spans_one_cell() {
        let d = layout_for(Orientation::Portrait, 3);
        assert_eq!(d.span, 1);
        assert_eq!(d.aspect_ratio, AspectRatio { width: 2, height: 3 });
    }

    #[test]
    fn test_default_density_matches_classic_photo_grid() {
        let d = layout_for(Orientation::Portrait, DEFAULT_DENSITY);
        assert_eq!(d.columns, Columns::new(1, 2, 3, 5, 5));
        assert_eq!(d.min_tile_px, 180);
    }

    #[test]
    fn test_out_of_range_density_falls_back_to_midpoint() {
        let mid = layout_for(Orientation::Landscape, DEFAULT_DENSITY);
        assert_eq!(layout_for(Orientation::Landscape, 0), mid);
        assert_eq!(layout_for(Orientation::Landscape, 6), mid);
        assert_eq!(layout_for(Orientation::Landscape, 255), mid);
        assert_eq!(album_grid(0), album_grid(DEFAULT_DENSITY));
    }

    #[test]
    fn test_columns_shrink_as_density_grows() {
        for d in MIN_DENSITY..MAX_DENSITY {
            let (a, b) = (layout_for(Orientation::Portrait, d), layout_for(Orientation::Portrait, d + 1));
            assert!(a.columns.base >= b.columns.base);
            assert!(a.columns.xl >= b.columns.xl);
            assert!(a.min_tile_px < b.min_tile_px);

            let (a, b) = (album_grid(d), album_grid(d + 1));
            assert!(a.sm >= b.sm);
            assert!(a.xl >= b.xl);
        }
    }

    #[test]
    fn test_layout_is_deterministic() {
        for d in 0..=10 {
            for o in [Orientation::Portrait, Orientation::Landscape] {
                assert_eq!(layout_for(o, d), layout_for(o, d));
            }
        }
    }

    #[test]
    fn test_album_grid_default() {
        assert_eq!(album_grid(3), Columns::new(3, 4, 5, 6, 7));
    }

    #[test]
    fn test_span_within_single_column() {
        let d = layout_for(Orientation::Landscape, 5);
        assert_eq!(d.span_within(d.columns.base), 1);
        assert_eq!(d.span_within(3), 2);
        assert_eq!(d.span_within(0), 1);
    }

    #[test]
    fn test_gap_px() {
        assert_eq!(gap_px(0), 0);
        assert_eq!(gap_px(2), 8);
        assert_eq!(gap_px(5), 20);
        assert_eq!(gap_px(9), 8);
    }

    #[test]
    fn test_list_thumbnail() {
        assert_eq!(list_thumbnail(Orientation::Landscape), (120, 80));
        assert_eq!(list_thumbnail(Orientation::Portrait), (53, 80));
        assert!((aspect_ratio(Orientation::Landscape).as_f32() - 1.5).abs() < f32::EPSILON);
    }
}
