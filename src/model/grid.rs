//! Uniform spatial grid for fixed-radius neighbor queries.
//!
//! Items are binned into cubic cells and stored contiguously per cell, so a radius
//! query only touches the cells overlapping the query sphere's bounding box. Contact
//! detection uses it to enumerate atom pairs under a distance cutoff without scanning
//! every pair in a chain.

use super::types::Point;

/// A uniform spatial grid over `(position, item)` pairs.
///
/// # Performance
///
/// - Construction: **O(N)** (counting sort by cell).
/// - Radius query: proportional to the number of items in the overlapped cells.
#[derive(Debug, Clone)]
pub struct Grid<T> {
    cell_size: f64,
    origin: Point,
    dims: [usize; 3],
    /// Offsets into `items`; cell `c` owns `items[cell_start[c]..cell_start[c + 1]]`.
    cell_start: Vec<usize>,
    items: Vec<(Point, T)>,
}

impl<T> Grid<T> {
    /// Builds a grid enclosing all provided points.
    ///
    /// # Arguments
    ///
    /// * `items` - `(position, item)` pairs to index.
    /// * `cell_size` - Side length of each cubic cell.
    ///
    /// # Panics
    ///
    /// Panics if `cell_size` is not strictly positive, or if the points need more
    /// cells than [`cell_count`](Self::cell_count) can represent.
    pub fn new(items: impl IntoIterator<Item = (Point, T)>, cell_size: f64) -> Self {
        assert!(cell_size > 0.0, "Cell size must be positive");

        let input: Vec<(Point, T)> = items.into_iter().collect();
        let Some(dims) = Self::dimensions(input.iter().map(|(pos, _)| pos), cell_size) else {
            panic!("Grid points must be finite and span a representable cell count");
        };
        if input.is_empty() {
            return Self {
                cell_size,
                origin: Point::origin(),
                dims: [0; 3],
                cell_start: vec![0],
                items: Vec::new(),
            };
        }

        let min = input
            .iter()
            .fold(Point::new(f64::MAX, f64::MAX, f64::MAX), |acc, (pos, _)| acc.inf(pos));
        let total_cells = dims[0] * dims[1] * dims[2];

        let mut grid = Self {
            cell_size,
            origin: min,
            dims,
            cell_start: vec![0; total_cells + 1],
            items: Vec::with_capacity(input.len()),
        };

        let cells: Vec<usize> = input.iter().map(|(pos, _)| grid.cell_of(pos)).collect();
        for &cell in &cells {
            grid.cell_start[cell + 1] += 1;
        }
        for c in 0..total_cells {
            grid.cell_start[c + 1] += grid.cell_start[c];
        }

        let mut slots: Vec<Option<(Point, T)>> = (0..input.len()).map(|_| None).collect();
        let mut cursor = grid.cell_start.clone();
        for (entry, cell) in input.into_iter().zip(cells) {
            slots[cursor[cell]] = Some(entry);
            cursor[cell] += 1;
        }
        grid.items = slots.into_iter().flatten().collect();

        grid
    }

    /// Number of cells a grid over `positions` would allocate, or `None` when a
    /// coordinate is not finite or the count does not fit in `usize`.
    pub fn cell_count<'a>(
        positions: impl IntoIterator<Item = &'a Point>,
        cell_size: f64,
    ) -> Option<usize> {
        let dims = Self::dimensions(positions, cell_size)?;
        dims[0].checked_mul(dims[1])?.checked_mul(dims[2])
    }

    fn dimensions<'a>(
        positions: impl IntoIterator<Item = &'a Point>,
        cell_size: f64,
    ) -> Option<[usize; 3]> {
        let mut min = Point::new(f64::MAX, f64::MAX, f64::MAX);
        let mut max = Point::new(f64::MIN, f64::MIN, f64::MIN);
        let mut any = false;
        for pos in positions {
            if !pos.coords.iter().all(|v| v.is_finite()) {
                return None;
            }
            min = min.inf(pos);
            max = max.sup(pos);
            any = true;
        }
        if !any {
            return Some([0; 3]);
        }

        let axis_cells = |lo: f64, hi: f64| -> Option<usize> {
            let span = ((hi - lo) / cell_size).floor();
            if !span.is_finite() || span >= usize::MAX as f64 {
                return None;
            }
            (span as usize).checked_add(1)
        };
        let dims = [
            axis_cells(min.x, max.x)?,
            axis_cells(min.y, max.y)?,
            axis_cells(min.z, max.z)?,
        ];
        dims[0].checked_mul(dims[1])?.checked_mul(dims[2])?.checked_add(1)?;
        Some(dims)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates over every item whose position lies within `radius` of `center`
    /// (inclusive), together with that position.
    pub fn within<'a>(
        &'a self,
        center: &Point,
        radius: f64,
    ) -> impl Iterator<Item = (&'a Point, &'a T)> + 'a {
        let center = *center;
        let radius_sq = radius * radius;
        let (lo, hi) = self.cell_bounds(&center, radius);
        let dims = self.dims;

        (lo[2]..hi[2])
            .flat_map(move |z| (lo[1]..hi[1]).map(move |y| (y, z)))
            .flat_map(move |(y, z)| {
                (lo[0]..hi[0]).map(move |x| x + y * dims[0] + z * dims[0] * dims[1])
            })
            .flat_map(move |cell| {
                self.items[self.cell_start[cell]..self.cell_start[cell + 1]].iter()
            })
            .filter(move |(pos, _)| nalgebra::distance_squared(pos, &center) <= radius_sq)
            .map(|(pos, item)| (pos, item))
    }

    fn cell_of(&self, pos: &Point) -> usize {
        let offset = pos - self.origin;
        let clamp = |v: f64, n: usize| ((v / self.cell_size).floor().max(0.0) as usize).min(n - 1);
        let x = clamp(offset.x, self.dims[0]);
        let y = clamp(offset.y, self.dims[1]);
        let z = clamp(offset.z, self.dims[2]);
        x + y * self.dims[0] + z * self.dims[0] * self.dims[1]
    }

    /// Half-open cell ranges per axis covering the query sphere's bounding box.
    fn cell_bounds(&self, center: &Point, radius: f64) -> ([usize; 3], [usize; 3]) {
        if self.items.is_empty() {
            return ([0; 3], [0; 3]);
        }

        let mut lo = [0; 3];
        let mut hi = [0; 3];
        for axis in 0..3 {
            let n = self.dims[axis] as f64;
            let start = ((center[axis] - radius - self.origin[axis]) / self.cell_size).floor();
            let end = ((center[axis] + radius - self.origin[axis]) / self.cell_size).floor();
            if end < 0.0 || start >= n {
                return ([0; 3], [0; 3]);
            }
            lo[axis] = start.max(0.0) as usize;
            hi[axis] = (end.min(n - 1.0) as usize) + 1;
        }
        (lo, hi)
    }
}
