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

use std::f32::consts::PI;
use super::geometry::Rect;
use super::piece::Piece;
use super::placement::Random;

// Durations are in milliseconds
pub const SNAPPING_CLASS_DURATION: u32 = 300;
pub const RIPPLE_SIZE: f32 = 100.0;
pub const RIPPLE_DURATION: u32 = 800;
pub const N_PARTICLES: usize = 12;
pub const PARTICLE_DURATION: u32 = 800;
pub const N_CONFETTI: usize = 8;
pub const CONFETTI_DURATION: u32 = 2500;

pub const PARTICLE_COLORS: [&'static str; 5] = [
    "#3b82f6", "#2563eb", "#1d4ed8", "#60a5fa", "#93c5fd",
];

pub const CONFETTI_COLORS: [&'static str; 6] = [
    "#f43f5e", "#ec4899", "#a855f7", "#3b82f6", "#10b981", "#f59e0b",
];

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    // How far the particle flies from its start
    pub tx: f32,
    pub ty: f32,
    pub color: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfettiShape {
    Circle,
    Square,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Confetti {
    pub x: f32,
    pub y: f32,
    pub color: &'static str,
    pub shape: ConfettiShape,
    // Both in seconds
    pub delay: f32,
    pub duration: f32,
}

// Background placement that makes a single gradient span all of the
// pieces of a completed word
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SharedBackground {
    pub width: f32,
    pub height: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

fn pick<R: Random, T: Copy>(random: &mut R, values: &[T]) -> T {
    let index = (random.next_unit() * values.len() as f32) as usize;
    values[index.min(values.len() - 1)]
}

// Square centred on the point where a piece snapped into place
pub fn ripple(center_x: f32, center_y: f32) -> Rect {
    Rect::new(
        center_x - RIPPLE_SIZE / 2.0,
        center_y - RIPPLE_SIZE / 2.0,
        RIPPLE_SIZE,
        RIPPLE_SIZE,
    )
}

pub fn word_bounds<'a, I>(pieces: I) -> Option<Rect>
    where I: IntoIterator<Item = &'a Piece>
{
    pieces.into_iter()
        .map(|piece| piece.rect())
        .reduce(|a, b| a.union(&b))
}

// Average of the centres of the pieces
pub fn centroid<'a, I>(pieces: I) -> Option<(f32, f32)>
    where I: IntoIterator<Item = &'a Piece>
{
    let (n_pieces, total_x, total_y) = pieces.into_iter()
        .map(|piece| piece.rect().center())
        .fold((0, 0.0, 0.0), |(n, total_x, total_y), (x, y)| {
            (n + 1, total_x + x, total_y + y)
        });

    (n_pieces > 0).then(|| {
        (total_x / n_pieces as f32, total_y / n_pieces as f32)
    })
}

pub fn shared_background(bounds: &Rect, piece: &Piece) -> SharedBackground {
    SharedBackground {
        width: bounds.width,
        height: bounds.height,
        offset_x: piece.x - bounds.left,
        offset_y: piece.y - bounds.top,
    }
}

// Particles spread evenly around a circle
pub fn particle_burst<R: Random>(
    x: f32,
    y: f32,
    count: usize,
    random: &mut R,
) -> Vec<Particle> {
    (0..count).map(|i| {
        let angle = PI * 2.0 * i as f32 / count as f32;
        let distance = 40.0 + random.next_unit() * 40.0;

        Particle {
            x,
            y,
            tx: angle.cos() * distance,
            ty: angle.sin() * distance,
            color: pick(random, &PARTICLE_COLORS),
        }
    }).collect()
}

pub fn confetti<R: Random>(
    x: f32,
    y: f32,
    count: usize,
    random: &mut R,
) -> Vec<Confetti> {
    (0..count).map(|_| {
        let offset_x = (random.next_unit() - 0.5) * 100.0;
        let color = pick(random, &CONFETTI_COLORS);
        let shape = if random.next_unit() > 0.5 {
            ConfettiShape::Circle
        } else {
            ConfettiShape::Square
        };

        Confetti {
            x: x + offset_x,
            y,
            color,
            shape,
            delay: random.next_unit() * 0.3,
            duration: 1.5 + random.next_unit() * 0.5,
        }
    }).collect()
}
