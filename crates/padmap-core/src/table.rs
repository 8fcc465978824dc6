//! Padded 2-D value table backing the calibration grid.

/// Dense `(nx + 2) × (ny + 2)` table of `f32` values with a one-cell
/// boundary ring, stored flat in x-major order.
///
/// Indices are *padded*: `0` and `n + 1` on each axis address the ring
/// cells used for constant extrapolation; interior control point `(i, j)`
/// lives at `(i + 1, j + 1)`. Callers outside the crate never see padded
/// indices.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PaddedTable {
    nx: usize,
    ny: usize,
    data: Vec<f32>,
}

impl PaddedTable {
    /// Allocate a zeroed table for an `nx × ny` interior.
    pub(crate) fn new(nx: usize, ny: usize) -> Self {
        Self {
            nx,
            ny,
            data: vec![0.0; (nx + 2) * (ny + 2)],
        }
    }

    /// Padded width (`nx + 2`).
    pub(crate) fn padded_nx(&self) -> usize {
        self.nx + 2
    }

    /// Padded height (`ny + 2`).
    pub(crate) fn padded_ny(&self) -> usize {
        self.ny + 2
    }

    pub(crate) fn get(&self, px: usize, py: usize) -> f32 {
        assert!(px < self.nx + 2 && py < self.ny + 2, "padded index out of range");
        self.data[px * (self.ny + 2) + py]
    }

    pub(crate) fn set(&mut self, px: usize, py: usize, value: f32) {
        assert!(px < self.nx + 2 && py < self.ny + 2, "padded index out of range");
        self.data[px * (self.ny + 2) + py] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_table_is_zeroed() {
        let table = PaddedTable::new(3, 2);
        assert_eq!(table.padded_nx(), 5);
        assert_eq!(table.padded_ny(), 4);
        for px in 0..table.padded_nx() {
            for py in 0..table.padded_ny() {
                assert_eq!(table.get(px, py), 0.0);
            }
        }
    }

    #[test]
    fn test_set_then_get() {
        let mut table = PaddedTable::new(3, 2);
        table.set(4, 3, 0.75);
        assert_eq!(table.get(4, 3), 0.75);
        // Neighbors untouched.
        assert_eq!(table.get(3, 3), 0.0);
        assert_eq!(table.get(4, 2), 0.0);
    }

    #[test]
    #[should_panic(expected = "padded index out of range")]
    fn test_out_of_range_panics() {
        let table = PaddedTable::new(3, 2);
        let _ = table.get(5, 0);
    }
}
