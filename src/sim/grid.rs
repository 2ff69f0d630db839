//! Brick grid layout
//!
//! Pure geometry: given a column count, the playfield width and a height
//! budget, derive cell sizes so the grid exactly spans the playfield:
//!
//! `columns * cell_width + (columns - 1) * padding + 2 * margin == playfield_width`

use glam::Vec2;

use crate::consts::*;
use crate::error::SetupError;

/// Derived brick grid geometry (render space)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub rows: usize,
    pub columns: usize,
    pub padding: f32,
    pub margin: f32,
    pub cell_width: f32,
    pub cell_height: f32,
}

impl GridLayout {
    /// Layout with the default row count, padding and margin
    pub fn new(columns: u16, playfield_width: f32, height_budget: f32) -> Result<Self, SetupError> {
        Self::with_spacing(
            BRICK_ROWS,
            columns,
            BRICK_PADDING,
            BRICK_MARGIN,
            playfield_width,
            height_budget,
        )
    }

    pub fn with_spacing(
        rows: usize,
        columns: u16,
        padding: f32,
        margin: f32,
        playfield_width: f32,
        height_budget: f32,
    ) -> Result<Self, SetupError> {
        if columns == 0 || rows == 0 {
            return Err(SetupError::NoColumns);
        }
        let cols = columns as f32;
        let cell_width = (playfield_width - 2.0 * margin - (cols - 1.0) * padding) / cols;
        let cell_height = (height_budget - (rows as f32 - 1.0) * padding) / rows as f32;

        if !(cell_width > 0.0 && cell_height > 0.0) {
            return Err(SetupError::DegenerateGrid {
                columns,
                width: cell_width,
                height: cell_height,
            });
        }

        Ok(Self {
            rows,
            columns: columns as usize,
            padding,
            margin,
            cell_width,
            cell_height,
        })
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.rows * self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Storage index of a cell (row-major)
    #[inline]
    pub fn index(&self, row: usize, column: usize) -> usize {
        column + row * self.columns
    }

    /// Row and column of a storage index
    #[inline]
    pub fn cell(&self, index: usize) -> (usize, usize) {
        (index / self.columns, index % self.columns)
    }

    /// Top-left corner of a cell
    pub fn cell_origin(&self, row: usize, column: usize) -> Vec2 {
        Vec2::new(
            self.margin + column as f32 * (self.cell_width + self.padding),
            self.margin + row as f32 * (self.cell_height + self.padding),
        )
    }

    /// Cell dimensions as a vector
    pub fn cell_size(&self) -> Vec2 {
        Vec2::new(self.cell_width, self.cell_height)
    }

    /// Storage indices in scan order: column by column, top row first
    pub fn scan_order(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.columns)
            .flat_map(move |column| (0..self.rows).map(move |row| self.index(row, column)))
    }
}
