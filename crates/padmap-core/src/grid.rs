//! Calibration grid construction and device-to-unit lookup.
//!
//! Maps raw integer device coordinates to normalized `[0,1]×[0,1]` unit
//! coordinates through a sparse grid of control points, compensating for
//! non-linear distortion across the sensing surface.
//!
//! # Algorithm
//! Lookup is a per-axis binary bin search over the device-space breakpoints
//! followed by a bilinear blend of the four surrounding control values. A
//! one-cell padding ring around the control table carries replicated edge
//! values, so input outside the covered device range degrades to constant
//! extrapolation rather than extending a slope.
//!
//! # Complexity
//! - Lookup: O(log n) bin search + O(1) blend
//! - Set point: O(1)

use crate::error::GridError;
use crate::format::GridData;
use crate::table::PaddedTable;

/// Grid axis selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub(crate) const fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
        }
    }
}

/// A device-to-unit calibration grid.
///
/// Owns two per-axis breakpoint arrays (device-space knots, non-decreasing)
/// and two padded unit-value tables, one per output axis. Built once —
/// `uniform` or `parse`, optionally followed by `set_point` calls — then
/// used read-only; `&self` lookups from multiple threads are safe.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationGrid {
    /// Device-space breakpoints per axis (`[x, y]`).
    breakpoints: [Vec<i32>; 2],
    /// Unit-space value tables per output axis, padded by one ring.
    values: [PaddedTable; 2],
}

impl CalibrationGrid {
    /// Build a uniform grid over `[0, extent_x] × [0, extent_y]`.
    ///
    /// Breakpoint `i` is placed at `extent * i / (n - 1)` (integer
    /// truncation) and control point `(i, j)` maps to
    /// `(i / (nx-1), j / (ny-1))`, so the grid starts out distortion-free.
    pub fn uniform(extent_x: i32, extent_y: i32, nx: usize, ny: usize) -> Result<Self, GridError> {
        let mut grid = Self::with_dims(extent_x, extent_y, nx, ny)?;
        for j in 0..ny {
            for i in 0..nx {
                grid.set_point(i, j, i as f32 / (nx - 1) as f32, j as f32 / (ny - 1) as f32)?;
            }
        }
        Ok(grid)
    }

    /// Build a grid from a parsed control-point list.
    ///
    /// The list's breakpoints replace the uniform placement; the device
    /// extents participate only in validation. Fails when the list holds
    /// fewer than `nx * ny` value pairs — a truncated calibration must not
    /// produce a partially initialized grid.
    pub fn from_data(extent_x: i32, extent_y: i32, data: &GridData) -> Result<Self, GridError> {
        let nx = data.breakpoints_x.len();
        let ny = data.breakpoints_y.len();
        if data.points.len() < nx * ny {
            return Err(GridError::Parse(format!(
                "expected {} control values, got {}",
                nx * ny,
                data.points.len()
            )));
        }
        let mut grid = Self::with_dims(extent_x, extent_y, nx, ny)?;
        grid.breakpoints[0].copy_from_slice(&data.breakpoints_x);
        grid.breakpoints[1].copy_from_slice(&data.breakpoints_y);
        for j in 0..ny {
            for i in 0..nx {
                let [x, y] = data.points[j * nx + i];
                grid.set_point(i, j, x, y)?;
            }
        }
        Ok(grid)
    }

    /// Extract the control-point list (interior values only, row-major with
    /// x fastest). Inverse of [`CalibrationGrid::from_data`].
    pub fn to_data(&self) -> GridData {
        let mut points = Vec::with_capacity(self.nx() * self.ny());
        for j in 0..self.ny() {
            for i in 0..self.nx() {
                points.push([
                    self.values[0].get(i + 1, j + 1),
                    self.values[1].get(i + 1, j + 1),
                ]);
            }
        }
        GridData {
            breakpoints_x: self.breakpoints[0].clone(),
            breakpoints_y: self.breakpoints[1].clone(),
            points,
        }
    }

    /// Allocate a grid with uniform breakpoints and zeroed value tables.
    fn with_dims(extent_x: i32, extent_y: i32, nx: usize, ny: usize) -> Result<Self, GridError> {
        if nx < 2 || ny < 2 {
            return Err(GridError::Config(
                "grid needs at least two control points per axis",
            ));
        }
        if extent_x < 0 || extent_y < 0 {
            return Err(GridError::Config("device extent must be non-negative"));
        }
        let spread = |extent: i32, n: usize| -> Vec<i32> {
            (0..n)
                .map(|i| (i64::from(extent) * i as i64 / (n as i64 - 1)) as i32)
                .collect()
        };
        tracing::debug!(nx, ny, extent_x, extent_y, "allocating calibration grid");
        Ok(Self {
            breakpoints: [spread(extent_x, nx), spread(extent_y, ny)],
            values: [PaddedTable::new(nx, ny), PaddedTable::new(nx, ny)],
        })
    }

    /// Number of control points along the device X axis.
    pub fn nx(&self) -> usize {
        self.breakpoints[0].len()
    }

    /// Number of control points along the device Y axis.
    pub fn ny(&self) -> usize {
        self.breakpoints[1].len()
    }

    /// Device-space breakpoints along `axis`.
    pub fn breakpoints(&self, axis: Axis) -> &[i32] {
        &self.breakpoints[axis.index()]
    }

    /// Unit-space value of control point `(i, j)`, or `None` out of range.
    pub fn point(&self, i: usize, j: usize) -> Option<[f32; 2]> {
        if i >= self.nx() || j >= self.ny() {
            return None;
        }
        Some([
            self.values[0].get(i + 1, j + 1),
            self.values[1].get(i + 1, j + 1),
        ])
    }

    /// Set the unit-space value of control point `(i, j)`.
    ///
    /// Edge points are replicated into the adjacent padding cell (corner
    /// points also into the diagonal ring cell), so lookups past the
    /// covered device range hold the edge value constant.
    pub fn set_point(&mut self, i: usize, j: usize, x: f32, y: f32) -> Result<(), GridError> {
        let (nx, ny) = (self.nx(), self.ny());
        if i >= nx || j >= ny {
            return Err(GridError::PointOutOfRange { i, j, nx, ny });
        }
        let (px, py) = (i + 1, j + 1);
        // Ring cells owned by this point: itself plus, on an edge or
        // corner, the neighboring padding cells.
        let lo_x = if i == 0 { px - 1 } else { px };
        let hi_x = if i == nx - 1 { px + 1 } else { px };
        let lo_y = if j == 0 { py - 1 } else { py };
        let hi_y = if j == ny - 1 { py + 1 } else { py };
        for cx in lo_x..=hi_x {
            for cy in lo_y..=hi_y {
                self.values[0].set(cx, cy, x);
                self.values[1].set(cx, cy, y);
            }
        }
        Ok(())
    }

    /// Map raw device coordinates to unit-square coordinates.
    ///
    /// In-range input interpolates bilinearly between the four surrounding
    /// control points; out-of-range input is held at the nearest edge
    /// value. The result is nominally in `[0, 1]` but not hard-clamped —
    /// consumers needing a strict guarantee must clamp.
    pub fn to_unit(&self, dev_x: i32, dev_y: i32) -> (f32, f32) {
        let (bx, ux, vx) = locate(&self.breakpoints[0], dev_x);
        let (by, uy, vy) = locate(&self.breakpoints[1], dev_y);

        let mut unit = [0.0_f32; 2];
        for (d, table) in self.values.iter().enumerate() {
            let f11 = table.get(bx, by);
            let f12 = table.get(bx, by + 1);
            let f21 = table.get(bx + 1, by);
            let f22 = table.get(bx + 1, by + 1);
            unit[d] = vx * vy * f11 + vy * ux * f21 + vx * uy * f12 + ux * uy * f22;
        }
        (unit[0], unit[1])
    }

    /// Render a deterministic multi-line dump of the grid: both breakpoint
    /// rows, then the full padded value table row by row. Diagnostic text,
    /// not a machine-parseable contract.
    pub fn describe(&self) -> String {
        use std::fmt::Write as _;

        let mut out = String::new();
        for (label, breaks) in [("x", &self.breakpoints[0]), ("y", &self.breakpoints[1])] {
            let row = breaks
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" ");
            let _ = writeln!(out, "breakpoints {label}: {row}");
        }
        for py in 0..self.values[0].padded_ny() {
            let mut row = String::new();
            for px in 0..self.values[0].padded_nx() {
                let _ = write!(
                    row,
                    "{:.2} {:.2}, ",
                    self.values[0].get(px, py),
                    self.values[1].get(px, py)
                );
            }
            let _ = writeln!(out, "values: {}", row.trim_end());
        }
        out
    }
}

/// Write a grid dump to the `tracing` log, one record per line.
///
/// `None` corresponds to a device with calibration disabled.
pub fn log_grid(grid: Option<&CalibrationGrid>) {
    let Some(grid) = grid else {
        tracing::info!("calibration grid is disabled");
        return;
    };
    for line in grid.describe().lines() {
        tracing::info!("{line}");
    }
}

/// Find the interpolation bin for `value` and its blend weights.
///
/// Returns the *padded-table* bin index together with `(u, v)`, the
/// fractional distances from the bin's low and high breakpoint. Below-range
/// values land in the low padding bin and values at or above the last
/// breakpoint in the final bin, both with `u = 1, v = 0` so the blend
/// collapses onto a single column/row of replicated edge values.
fn locate(breaks: &[i32], value: i32) -> (usize, f32, f32) {
    let n = breaks.len();
    if value < breaks[0] {
        return (0, 1.0, 0.0);
    }
    if value >= breaks[n - 1] {
        return (n, 1.0, 0.0);
    }

    // Largest b with breaks[b] <= value < breaks[b + 1].
    let mut lo = 0;
    let mut hi = n - 1;
    while hi - lo > 1 {
        let mid = lo + (hi - lo + 1) / 2;
        if value >= breaks[mid] {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    let width = breaks[lo + 1] - breaks[lo];
    if width == 0 {
        // Repeated breakpoint; collapse onto the high node.
        return (lo + 1, 1.0, 0.0);
    }
    let u = (value - breaks[lo]) as f32 / width as f32;
    (lo + 1, u, 1.0 - u)
}
