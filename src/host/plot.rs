//! ASCII canvas for previewing a frame's points in a terminal.

/// A character grid that normalised coordinates are plotted onto.
///
/// `(-1, -1)` is the top-left corner and `(1, 1)` the bottom-right, matching
/// screen space. Points outside that square are dropped.
#[derive(Debug, Clone)]
pub struct AsciiCanvas {
    cols: usize,
    rows: usize,
    cells: Vec<u8>,
}

const EMPTY: u8 = b' ';
const DOT: u8 = b'*';

impl AsciiCanvas {
    pub fn new(cols: usize, rows: usize) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        Self {
            cols,
            rows,
            cells: vec![EMPTY; cols * rows],
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(EMPTY);
    }

    /// Plot one point. Returns whether it landed on the canvas.
    pub fn plot(&mut self, x: f64, y: f64) -> bool {
        match self.cell(x, y) {
            Some(idx) => {
                self.cells[idx] = DOT;
                true
            }
            None => false,
        }
    }

    pub fn plot_all(&mut self, points: &[(f64, f64)]) -> usize {
        points.iter().filter(|&&(x, y)| self.plot(x, y)).count()
    }

    pub fn is_set(&self, col: usize, row: usize) -> bool {
        col < self.cols && row < self.rows && self.cells[row * self.cols + col] == DOT
    }

    fn cell(&self, x: f64, y: f64) -> Option<usize> {
        if !(-1.0..=1.0).contains(&x) || !(-1.0..=1.0).contains(&y) {
            return None;
        }
        let col = (((x + 1.0) / 2.0) * (self.cols - 1) as f64).round() as usize;
        let row = (((y + 1.0) / 2.0) * (self.rows - 1) as f64).round() as usize;
        Some(row * self.cols + col)
    }

    pub fn render(&self) -> String {
        let mut out = String::with_capacity((self.cols + 1) * self.rows);
        for row in self.cells.chunks(self.cols) {
            out.extend(row.iter().map(|&b| b as char));
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_and_centre() {
        let mut canvas = AsciiCanvas::new(5, 3);
        assert!(canvas.plot(-1.0, -1.0));
        assert!(canvas.plot(1.0, 1.0));
        assert!(canvas.plot(0.0, 0.0));
        assert!(canvas.is_set(0, 0));
        assert!(canvas.is_set(4, 2));
        assert!(canvas.is_set(2, 1));
        assert_eq!(canvas.render(), "*    \n  *  \n    *\n");
    }

    #[test]
    fn out_of_range_is_dropped() {
        let mut canvas = AsciiCanvas::new(4, 4);
        assert!(!canvas.plot(1.5, 0.0));
        assert!(!canvas.plot(0.0, f64::NAN));
        assert_eq!(canvas.plot_all(&[(0.0, 0.0), (2.0, 2.0)]), 1);
    }

    #[test]
    fn clear_empties() {
        let mut canvas = AsciiCanvas::new(2, 2);
        canvas.plot(0.0, 0.0);
        canvas.clear();
        assert_eq!(canvas.render(), "  \n  \n");
    }
}
