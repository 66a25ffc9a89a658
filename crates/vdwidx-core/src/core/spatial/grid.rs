use nalgebra::Point3;
use std::collections::HashMap;

/// Integer coordinate of a grid cell.
pub type CellKey = [i32; 3];

/// Uniform cell index over a set of atom positions.
///
/// Items are the indices of the positions handed to [`SpatialGrid::build`]. With a cell
/// edge at least as long as the interaction cutoff, the 3x3x3 block of cells around a
/// point holds every item within the cutoff of that point.
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f64,
    cells: HashMap<CellKey, Vec<u32>>,
    len: usize,
}

impl SpatialGrid {
    /// Buckets `positions` into cells of edge `cell_size`.
    ///
    /// `cell_size` must be finite and positive. Items keep their input order within a
    /// cell. An empty input yields an empty, valid grid.
    pub fn build(cell_size: f64, positions: &[Point3<f64>]) -> Self {
        debug_assert!(cell_size.is_finite() && cell_size > 0.0);

        let mut cells: HashMap<CellKey, Vec<u32>> = HashMap::new();
        for (idx, position) in positions.iter().enumerate() {
            cells
                .entry(Self::key_for(cell_size, position))
                .or_default()
                .push(idx as u32);
        }

        Self {
            cell_size,
            cells,
            len: positions.len(),
        }
    }

    /// Like [`SpatialGrid::build`] but indexes only the listed items.
    pub fn build_subset(cell_size: f64, positions: &[Point3<f64>], items: &[u32]) -> Self {
        debug_assert!(cell_size.is_finite() && cell_size > 0.0);

        let mut cells: HashMap<CellKey, Vec<u32>> = HashMap::new();
        for &idx in items {
            cells
                .entry(Self::key_for(cell_size, &positions[idx as usize]))
                .or_default()
                .push(idx);
        }

        Self {
            cell_size,
            cells,
            len: items.len(),
        }
    }

    /// Coordinates past the `i32` key range saturate into the outermost cells.
    #[inline]
    fn key_for(cell_size: f64, position: &Point3<f64>) -> CellKey {
        [
            (position.x / cell_size).floor() as i32,
            (position.y / cell_size).floor() as i32,
            (position.z / cell_size).floor() as i32,
        ]
    }

    #[inline]
    pub fn cell_key(&self, position: &Point3<f64>) -> CellKey {
        Self::key_for(self.cell_size, position)
    }

    #[inline]
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Number of indexed items.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of occupied cells.
    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn cell(&self, key: &CellKey) -> &[u32] {
        self.cells.get(key).map_or(&[], |items| items.as_slice())
    }

    /// Yields every item in the block of cells that can hold neighbors of `point`
    /// within `radius`.
    ///
    /// This is a superset of the true neighbors; callers filter by exact distance.
    /// The block is 3x3x3 whenever `radius <= cell_size`.
    pub fn query(&self, point: &Point3<f64>, radius: f64) -> impl Iterator<Item = u32> + '_ {
        let center = self.cell_key(point);
        let span = if radius <= self.cell_size {
            1
        } else {
            (radius / self.cell_size).ceil() as i32
        };
        let range = move || -span..=span;

        range()
            .flat_map(move |dx| range().flat_map(move |dy| range().map(move |dz| [dx, dy, dz])))
            .filter_map(move |[dx, dy, dz]| {
                Some([
                    center[0].checked_add(dx)?,
                    center[1].checked_add(dy)?,
                    center[2].checked_add(dz)?,
                ])
            })
            .flat_map(move |key| self.cell(&key).iter().copied())
    }
}
