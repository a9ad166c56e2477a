use ndarray::{Array2, Axis};

use crate::detection::domain::color_range::ColorRange;
use crate::shared::frame::Frame;

/// Binary image with the same dimensions as the frame it was built from.
#[derive(Clone, Debug, PartialEq)]
pub struct Mask {
    cells: Array2<bool>,
}

#[derive(Clone, Copy)]
enum Morph {
    Erode,
    Dilate,
}

impl Mask {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            cells: Array2::from_elem((height as usize, width as usize), false),
        }
    }

    /// Sets each pixel whose HSV value lies inside `range`.
    pub fn from_frame(frame: &Frame, range: &ColorRange) -> Self {
        let pixels = frame.as_ndarray();
        let cells = Array2::from_shape_fn(
            (frame.height() as usize, frame.width() as usize),
            |(y, x)| range.contains_rgb([pixels[[y, x, 0]], pixels[[y, x, 1]], pixels[[y, x, 2]]]),
        );
        Self { cells }
    }

    pub fn width(&self) -> u32 {
        self.cells.ncols() as u32
    }

    pub fn height(&self) -> u32 {
        self.cells.nrows() as u32
    }

    /// Out-of-bounds coordinates read as unset.
    pub fn get(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 {
            return false;
        }
        self.cells
            .get((y as usize, x as usize))
            .copied()
            .unwrap_or(false)
    }

    pub fn set(&mut self, x: u32, y: u32, value: bool) {
        self.cells[[y as usize, x as usize]] = value;
    }

    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.cells.iter().any(|&c| c)
    }

    /// Erosion with a `size` x `size` square element. Pixels outside the
    /// frame never clear a pixel.
    pub fn erode(&self, size: usize, iterations: usize) -> Mask {
        self.morph(size, iterations, Morph::Erode)
    }

    /// Dilation with a `size` x `size` square element. Pixels outside the
    /// frame never set a pixel.
    pub fn dilate(&self, size: usize, iterations: usize) -> Mask {
        self.morph(size, iterations, Morph::Dilate)
    }

    fn morph(&self, size: usize, iterations: usize, op: Morph) -> Mask {
        let radius = size / 2;
        let mut cells = self.cells.clone();
        for _ in 0..iterations {
            // A square element is separable: rows first, then columns.
            cells = pass(&cells, Axis(1), radius, op);
            cells = pass(&cells, Axis(0), radius, op);
        }
        Mask { cells }
    }
}

fn pass(src: &Array2<bool>, axis: Axis, radius: usize, op: Morph) -> Array2<bool> {
    let mut out = src.clone();
    for (src_lane, mut out_lane) in src.lanes(axis).into_iter().zip(out.lanes_mut(axis)) {
        let len = src_lane.len();
        for i in 0..len {
            let lo = i.saturating_sub(radius);
            let hi = (i + radius).min(len - 1);
            let window = (lo..=hi).map(|j| src_lane[j]);
            out_lane[i] = match op {
                Morph::Erode => window.into_iter().all(|c| c),
                Morph::Dilate => window.into_iter().any(|c| c),
            };
        }
    }
    out
}
