// Wordsnap – A word fragment puzzle
// Copyright (C) 2024  Neil Roberts
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

use serde::Deserialize;

// Positions are snapped to multiples of this many pixels so that
// pieces dropped near each other line up exactly.
pub const GRID_SIZE: f32 = 10.0;

pub fn snap_to_grid(value: f32) -> f32 {
    // Halves round upwards so that eg -15 snaps to -10
    (value / GRID_SIZE + 0.5).floor() * GRID_SIZE
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn name(self) -> &'static str {
        match self {
            Orientation::Horizontal => "horizontal",
            Orientation::Vertical => "vertical",
        }
    }

    // Size of a piece that is n_cells letters long
    pub fn piece_size(self, n_cells: usize, cell_size: f32) -> (f32, f32) {
        let length = n_cells as f32 * cell_size;

        match self {
            Orientation::Horizontal => (length, cell_size),
            Orientation::Vertical => (cell_size, length),
        }
    }

    // The edge where reading starts, ie left or top
    pub fn start(self, rect: &Rect) -> f32 {
        match self {
            Orientation::Horizontal => rect.left,
            Orientation::Vertical => rect.top,
        }
    }

    pub fn end(self, rect: &Rect) -> f32 {
        match self {
            Orientation::Horizontal => rect.right(),
            Orientation::Vertical => rect.bottom(),
        }
    }

    // Position on the axis that the word doesn’t run along
    pub fn cross(self, rect: &Rect) -> f32 {
        match self {
            Orientation::Horizontal => rect.top,
            Orientation::Vertical => rect.left,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Rect {
        Rect { left, top, width, height }
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    // Rectangles that only share an edge don’t overlap
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left < other.right() &&
            self.right() > other.left &&
            self.top < other.bottom() &&
            self.bottom() > other.top
    }

    pub fn union(&self, other: &Rect) -> Rect {
        let left = self.left.min(other.left);
        let top = self.top.min(other.top);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());

        Rect::new(left, top, right - left, bottom - top)
    }
}
