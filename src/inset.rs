use std::ops::Range;

/// Fixed y-window of the zoomed inset, in ns.
pub const INSET_Y: YWindow = YWindow {
    lo: -0.05,
    hi: 0.2,
};

/// Inset size as a fraction of the main plotting area, per axis.
pub const INSET_FRACTION: f64 = 0.3;

/// Gap between the inset and the plotting area's lower-right corner, in px.
pub const INSET_PAD: i32 = 20;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YWindow {
    pub lo: f64,
    pub hi: f64,
}

impl YWindow {
    pub fn contains(&self, y: f64) -> bool {
        y >= self.lo && y <= self.hi
    }

    pub fn range(&self) -> Range<f64> {
        self.lo..self.hi
    }

    /// Portion of the segment `a -> b` inside the window, if any.
    fn clip_segment(&self, a: (f64, f64), b: (f64, f64)) -> Option<(f64, f64)> {
        let dy = b.1 - a.1;
        if dy == 0.0 {
            return self.contains(a.1).then_some((0.0, 1.0));
        }

        let t_lo = (self.lo - a.1) / dy;
        let t_hi = (self.hi - a.1) / dy;
        let enter = t_lo.min(t_hi).max(0.0);
        let exit = t_lo.max(t_hi).min(1.0);

        (enter <= exit).then_some((enter, exit))
    }

    /// Splits a polyline into the runs of it that fall inside the window.
    ///
    /// Segments crossing an edge are cut at the edge, so every returned point
    /// has its y inside the window and the x extent of the line is kept
    /// wherever the line is visible.
    pub fn clip_polyline(&self, points: &[(f64, f64)]) -> Vec<Vec<(f64, f64)>> {
        let mut pieces: Vec<Vec<(f64, f64)>> = Vec::new();

        if let [only] = points {
            if self.contains(only.1) {
                pieces.push(vec![*only]);
            }
            return pieces;
        }

        let mut open = false;
        for pair in points.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let Some((enter, exit)) = self.clip_segment(a, b) else {
                open = false;
                continue;
            };

            let at = |t: f64| {
                if t == 0.0 {
                    return a;
                }
                if t == 1.0 {
                    return b;
                }
                let y = a.1 + (b.1 - a.1) * t;
                (a.0 + (b.0 - a.0) * t, y.clamp(self.lo, self.hi))
            };

            if !(open && enter == 0.0) {
                pieces.push(vec![at(enter)]);
            }
            if let Some(piece) = pieces.last_mut() {
                piece.push(at(exit));
            }
            open = exit == 1.0;
        }

        pieces
    }

    pub fn visible_points(&self, points: &[(f64, f64)]) -> Vec<(f64, f64)> {
        points
            .iter()
            .copied()
            .filter(|p| self.contains(p.1))
            .collect()
    }
}

/// Pixel rectangle of the inset, relative to the drawing root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsetRect {
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
}

/// Places the inset in the lower-right corner of the main plotting area.
pub fn inset_rect(plot_x: Range<i32>, plot_y: Range<i32>) -> InsetRect {
    let plot_w = (plot_x.end - plot_x.start).max(0);
    let plot_h = (plot_y.end - plot_y.start).max(0);

    let width = (plot_w as f64 * INSET_FRACTION) as i32;
    let height = (plot_h as f64 * INSET_FRACTION) as i32;

    let left = (plot_x.end - INSET_PAD - width).max(plot_x.start);
    let top = (plot_y.end - INSET_PAD - height).max(plot_y.start);

    InsetRect {
        left,
        top,
        width: width.min(plot_x.end - left).max(0) as u32,
        height: height.min(plot_y.end - top).max(0) as u32,
    }
}
