//! Overlap tests: bounding boxes, cell masks and explosion radii.

use crate::entities::{EnemyKind, Rect};

/// Which cells of a sprite are solid. Hits are only counted where the
/// solid cells of two entities coincide.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl Mask {
    /// Build a mask from sprite rows; any non-space character is solid.
    /// Short rows are padded with empty cells.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Self {
        let width = rows
            .iter()
            .map(|r| r.as_ref().chars().count())
            .max()
            .unwrap_or(0);
        let height = rows.len();
        let mut cells = vec![false; width * height];
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.as_ref().chars().enumerate() {
                cells[y * width + x] = ch != ' ';
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Out-of-range cells are empty.
    pub fn is_set(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return false;
        }
        self.cells[y as usize * self.width + x as usize]
    }

    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }
}

/// Masks available for the current sprite set. A missing mask means
/// "use the bounding box".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MaskSet {
    pub player: Option<Mask>,
    pub weak: Option<Mask>,
    pub mid: Option<Mask>,
    pub strong: Option<Mask>,
}

impl MaskSet {
    pub fn enemy(&self, kind: EnemyKind) -> Option<&Mask> {
        match kind {
            EnemyKind::Weak => self.weak.as_ref(),
            EnemyKind::Mid => self.mid.as_ref(),
            EnemyKind::Strong => self.strong.as_ref(),
        }
    }
}

/// Cell-accurate overlap. Falls back to plain rect overlap when neither
/// side has a mask. Positions are rounded to the nearest cell, so results
/// can differ from the rect test by one cell at the edges.
pub fn masks_overlap(a: &Rect, a_mask: Option<&Mask>, b: &Rect, b_mask: Option<&Mask>) -> bool {
    if !a.overlaps(b) {
        return false;
    }
    if a_mask.is_none() && b_mask.is_none() {
        return true;
    }

    let (ax, ay, aw, ah) = cell_bounds(a, a_mask);
    let (bx, by, bw, bh) = cell_bounds(b, b_mask);

    let x0 = ax.max(bx);
    let x1 = (ax + aw).min(bx + bw);
    let y0 = ay.max(by);
    let y1 = (ay + ah).min(by + bh);

    for y in y0..y1 {
        for x in x0..x1 {
            if cell_set(a_mask, x - ax, y - ay) && cell_set(b_mask, x - bx, y - by) {
                return true;
            }
        }
    }
    false
}

/// Inclusive: a point exactly `radius` away is inside.
pub fn within_radius(center: (f32, f32), point: (f32, f32), radius: f32) -> bool {
    let dx = point.0 - center.0;
    let dy = point.1 - center.1;
    dx * dx + dy * dy <= radius * radius
}

fn cell_bounds(rect: &Rect, mask: Option<&Mask>) -> (i32, i32, i32, i32) {
    let x = rect.x.round() as i32;
    let y = rect.y.round() as i32;
    match mask {
        Some(m) => (x, y, m.width() as i32, m.height() as i32),
        None => (x, y, (rect.w.ceil() as i32).max(1), (rect.h.ceil() as i32).max(1)),
    }
}

fn cell_set(mask: Option<&Mask>, x: i32, y: i32) -> bool {
    mask.map_or(true, |m| m.is_set(x, y))
}
