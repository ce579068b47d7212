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

use super::geometry::{snap_to_grid, Orientation, Rect};
use super::piece::Piece;

// Which side of the other piece the dropped piece attaches to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

impl Side {
    pub fn name(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
            Side::Top => "top",
            Side::Bottom => "bottom",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snap {
    // Grid-snapped position that the piece should move to
    pub x: f32,
    pub y: f32,
    pub side: Side,
    // Index of the piece that it attaches to
    pub other: usize,
    // Sum of the gap along the word and the misalignment across it
    pub distance: f32,
}

struct Candidate {
    gap: f32,
    cross: f32,
    x: f32,
    y: f32,
    side: Side,
}

fn candidates(
    orientation: Orientation,
    rect: &Rect,
    other: &Rect,
) -> [Candidate; 2] {
    match orientation {
        Orientation::Horizontal => {
            let cross = (rect.top - other.top).abs();

            [
                Candidate {
                    gap: (rect.left - other.right()).abs(),
                    cross,
                    x: other.right(),
                    y: other.top,
                    side: Side::Right,
                },
                Candidate {
                    gap: (rect.right() - other.left).abs(),
                    cross,
                    x: other.left - rect.width,
                    y: other.top,
                    side: Side::Left,
                },
            ]
        },
        Orientation::Vertical => {
            let cross = (rect.left - other.left).abs();

            [
                Candidate {
                    gap: (rect.top - other.bottom()).abs(),
                    cross,
                    x: other.left,
                    y: other.bottom(),
                    side: Side::Bottom,
                },
                Candidate {
                    gap: (rect.bottom() - other.top).abs(),
                    cross,
                    x: other.left,
                    y: other.top - rect.height,
                    side: Side::Top,
                },
            ]
        },
    }
}

// Looks for the closest place where the piece at `index`, if dropped
// at (x, y), could sit flush against another piece of the same word
// and orientation. Both the gap and the misalignment have to be less
// than snap_distance. The candidate with the smallest sum of the two
// wins.
pub fn find_snap(
    pieces: &[Piece],
    index: usize,
    x: f32,
    y: f32,
    snap_distance: f32,
) -> Option<Snap> {
    let piece = pieces.get(index)?;
    let rect = Rect::new(x, y, piece.width, piece.height);

    let mut best: Option<Snap> = None;

    for (other_index, other) in pieces.iter().enumerate() {
        if other_index == index ||
            other.word_index != piece.word_index ||
            other.orientation != piece.orientation
        {
            continue;
        }

        let other_rect = other.rect();

        for candidate in candidates(piece.orientation, &rect, &other_rect) {
            if candidate.gap >= snap_distance ||
                candidate.cross >= snap_distance
            {
                continue;
            }

            let distance = candidate.gap + candidate.cross;

            if best.map_or(true, |best| distance < best.distance) {
                best = Some(Snap {
                    x: candidate.x,
                    y: candidate.y,
                    side: candidate.side,
                    other: other_index,
                    distance,
                });
            }
        }
    }

    best.map(|snap| Snap {
        x: snap_to_grid(snap.x),
        y: snap_to_grid(snap.y),
        ..snap
    })
}

#[cfg(test)]
mod test {
    use super::*;

    fn piece_at(
        fragment: &str,
        word_index: usize,
        orientation: Orientation,
        x: f32,
        y: f32,
    ) -> Piece {
        let mut piece = Piece::new(fragment, word_index, 0, orientation, 50.0);
        piece.set_position(x, y);
        piece
    }

    fn horizontal(fragment: &str, x: f32, y: f32) -> Piece {
        piece_at(fragment, 0, Orientation::Horizontal, x, y)
    }

    fn vertical(fragment: &str, x: f32, y: f32) -> Piece {
        piece_at(fragment, 0, Orientation::Vertical, x, y)
    }

    #[test]
    fn snap_right() {
        let pieces = [
            horizontal("C", 100.0, 200.0),
            horizontal("A", 0.0, 0.0),
        ];

        let snap = find_snap(&pieces, 1, 160.0, 210.0, 150.0).unwrap();

        assert_eq!(snap.x, 150.0);
        assert_eq!(snap.y, 200.0);
        assert_eq!(snap.side, Side::Right);
        assert_eq!(snap.other, 0);
        assert_eq!(snap.distance, 20.0);
    }

    #[test]
    fn snap_left() {
        let pieces = [
            horizontal("AT", 300.0, 100.0),
            horizontal("C", 0.0, 0.0),
        ];

        let snap = find_snap(&pieces, 1, 240.0, 95.0, 150.0).unwrap();

        assert_eq!((snap.x, snap.y), (250.0, 100.0));
        assert_eq!(snap.side, Side::Left);
        assert_eq!(snap.distance, 15.0);
    }

    #[test]
    fn snap_vertical() {
        let pieces = [
            vertical("DO", 100.0, 100.0),
            vertical("G", 0.0, 0.0),
        ];

        let snap = find_snap(&pieces, 1, 120.0, 210.0, 150.0).unwrap();

        assert_eq!((snap.x, snap.y), (100.0, 200.0));
        assert_eq!(snap.side, Side::Bottom);
        assert_eq!(snap.distance, 30.0);

        let snap = find_snap(&pieces, 1, 90.0, 40.0, 150.0).unwrap();

        assert_eq!((snap.x, snap.y), (100.0, 50.0));
        assert_eq!(snap.side, Side::Top);
        assert_eq!(snap.distance, 20.0);
    }

    #[test]
    fn cross_axis_offset_still_snaps() {
        let pieces = [
            horizontal("C", 100.0, 200.0),
            horizontal("A", 150.0, 200.0),
            horizontal("T", 0.0, 0.0),
        ];

        let snap = find_snap(&pieces, 2, 200.0, 220.0, 150.0).unwrap();

        assert_eq!((snap.x, snap.y), (200.0, 200.0));
        assert_eq!(snap.other, 1);
        assert_eq!(snap.distance, 20.0);
    }

    #[test]
    fn smallest_sum_wins() {
        let first = horizontal("AB", 0.0, 100.0);
        let second = horizontal("CD", 250.0, 210.0);
        let dropped = horizontal("EF", 0.0, 0.0);

        // Right of the first piece: gap 5 + misalignment 100 = 105
        // Left of the second piece: gap 45 + misalignment 10 = 55
        let pieces = [first.clone(), second.clone(), dropped.clone()];
        let snap = find_snap(&pieces, 2, 105.0, 200.0, 150.0).unwrap();
        assert_eq!(snap.other, 1);
        assert_eq!(snap.side, Side::Left);
        assert_eq!((snap.x, snap.y), (150.0, 210.0));
        assert_eq!(snap.distance, 55.0);

        // The result doesn’t depend on the order of the pieces
        let pieces = [second, first, dropped];
        let snap = find_snap(&pieces, 2, 105.0, 200.0, 150.0).unwrap();
        assert_eq!(snap.other, 0);
        assert_eq!(snap.distance, 55.0);
    }

    #[test]
    fn threshold() {
        let pieces = [
            horizontal("C", 100.0, 100.0),
            horizontal("A", 0.0, 0.0),
        ];

        // Gap of exactly the snap distance doesn’t count
        assert!(find_snap(&pieces, 1, 300.0, 100.0, 150.0).is_none());
        assert!(find_snap(&pieces, 1, 299.0, 100.0, 150.0).is_some());
        // Neither does a misalignment of the snap distance
        assert!(find_snap(&pieces, 1, 150.0, 250.0, 150.0).is_none());
        assert!(find_snap(&pieces, 1, 150.0, 249.0, 150.0).is_some());
    }

    #[test]
    fn other_orientation() {
        let pieces = [
            vertical("C", 100.0, 100.0),
            horizontal("A", 0.0, 0.0),
        ];

        assert!(find_snap(&pieces, 1, 150.0, 100.0, 150.0).is_none());
    }

    #[test]
    fn other_word() {
        let pieces = [
            piece_at("C", 1, Orientation::Horizontal, 100.0, 100.0),
            horizontal("A", 0.0, 0.0),
        ];

        assert!(find_snap(&pieces, 1, 150.0, 100.0, 150.0).is_none());
    }

    #[test]
    fn no_siblings() {
        let pieces = [horizontal("CAT", 100.0, 100.0)];

        assert!(find_snap(&pieces, 0, 100.0, 100.0, 150.0).is_none());
        assert!(find_snap(&pieces, 1, 100.0, 100.0, 150.0).is_none());
    }

    #[test]
    fn grid_snapped() {
        // The other piece isn’t on the grid so the target is rounded
        let pieces = [
            horizontal("C", 103.0, 197.0),
            horizontal("A", 0.0, 0.0),
        ];

        let snap = find_snap(&pieces, 1, 150.0, 200.0, 150.0).unwrap();

        assert_eq!((snap.x, snap.y), (150.0, 200.0));
    }
}
