//! Geographic bounds and uniform grid subdivision.
//!
//! A search area resolves to one rectangular [`GeoBound`]; [`partition`] splits
//! it into N×N equal cells so each cell can be searched independently without
//! hitting the per-query result cap of the area search API.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GridError {
    #[error("invalid bound: north ({north}) must be greater than south ({south})")]
    InvalidLatitudeSpan { north: f64, south: f64 },

    #[error("invalid bound: east ({east}) must be greater than west ({west})")]
    InvalidLongitudeSpan { east: f64, west: f64 },

    #[error("grid granularity must be positive, got {n}")]
    InvalidGranularity { n: u32 },
}

/// A rectangular geographic bound in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBound {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl GeoBound {
    /// Build a validated bound.
    ///
    /// # Errors
    ///
    /// Returns `GridError` if `north <= south` or `east <= west`.
    pub fn new(north: f64, south: f64, east: f64, west: f64) -> Result<Self, GridError> {
        if north <= south {
            return Err(GridError::InvalidLatitudeSpan { north, south });
        }
        if east <= west {
            return Err(GridError::InvalidLongitudeSpan { east, west });
        }
        Ok(Self {
            north,
            south,
            east,
            west,
        })
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    /// Degree-space area. Only meaningful relative to other bounds of the
    /// same subdivision, not as a physical surface area.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.height() * self.width()
    }

    /// Midpoint as `(latitude, longitude)`.
    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        (
            (self.north + self.south) / 2.0,
            (self.east + self.west) / 2.0,
        )
    }
}

/// One rectangular sub-region of a larger search area, identified by its
/// `(row, col)` position in the subdivision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridCell {
    pub row: u32,
    pub col: u32,
    pub bound: GeoBound,
}

/// Split `bound` into `n` × `n` equal cells, row-major.
///
/// Row 0 is the northernmost band and column 0 the westernmost, so the first
/// cell sits at the bound's north-west corner. Edges are linearly
/// interpolated (`step = span / n`); adjacent cells share edge coordinates
/// exactly, so the cells tile the bound with no gaps or overlaps.
///
/// # Errors
///
/// Returns `GridError::InvalidGranularity` if `n` is zero.
pub fn partition(bound: &GeoBound, n: u32) -> Result<Vec<GridCell>, GridError> {
    if n == 0 {
        return Err(GridError::InvalidGranularity { n });
    }

    let lat_step = bound.height() / f64::from(n);
    let lng_step = bound.width() / f64::from(n);

    let mut cells = Vec::with_capacity((n * n) as usize);
    for row in 0..n {
        let north = bound.north - lat_step * f64::from(row);
        let south = bound.north - lat_step * f64::from(row + 1);
        for col in 0..n {
            let west = bound.west + lng_step * f64::from(col);
            let east = bound.west + lng_step * f64::from(col + 1);
            cells.push(GridCell {
                row,
                col,
                bound: GeoBound {
                    north,
                    south,
                    east,
                    west,
                },
            });
        }
    }
    Ok(cells)
}
