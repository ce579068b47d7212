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

use super::geometry::{Orientation, Rect};
use super::puzzle_data::PuzzleData;

#[derive(Debug, Clone)]
pub struct Piece {
    pub fragment: String,
    pub word_index: usize,
    pub fragment_index: usize,
    pub orientation: Orientation,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    // Set once the whole word is assembled. The piece can’t be
    // moved after that.
    pub completed: bool,
}

impl Piece {
    pub fn new(
        fragment: &str,
        word_index: usize,
        fragment_index: usize,
        orientation: Orientation,
        cell_size: f32,
    ) -> Piece {
        let (width, height) = orientation.piece_size(
            fragment.chars().count(),
            cell_size,
        );

        Piece {
            fragment: fragment.to_string(),
            word_index,
            fragment_index,
            orientation,
            x: 0.0,
            y: 0.0,
            width,
            height,
            completed: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn set_position(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }
}

// Creates one piece per fragment, word by word in the order of the
// puzzle. All of the pieces start at the origin.
pub fn pieces_for_puzzle(puzzle: &PuzzleData, cell_size: f32) -> Vec<Piece> {
    puzzle.words.iter().enumerate().flat_map(|(word_index, word)| {
        word.fragments.iter().enumerate().map(move |(fragment_index, fragment)| {
            Piece::new(
                fragment,
                word_index,
                fragment_index,
                word.orientation,
                cell_size,
            )
        })
    }).collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn pieces() {
        let puzzle = r#"{
            "words": [
                { "word": "CAT", "fragments": ["C", "AT"] },
                {
                    "word": "ĈEVALO",
                    "fragments": ["ĈEV", "ALO"],
                    "orientation": "vertical"
                }
            ]
        }"#.parse::<PuzzleData>().unwrap();

        let pieces = pieces_for_puzzle(&puzzle, 40.0);

        assert_eq!(pieces.len(), 4);

        assert_eq!(pieces[1].fragment, "AT");
        assert_eq!(pieces[1].word_index, 0);
        assert_eq!(pieces[1].fragment_index, 1);
        assert_eq!(pieces[1].rect(), Rect::new(0.0, 0.0, 80.0, 40.0));

        // Sizes count characters rather than bytes
        assert_eq!(pieces[2].orientation, Orientation::Vertical);
        assert_eq!(pieces[2].word_index, 1);
        assert_eq!(pieces[2].fragment_index, 0);
        assert_eq!(pieces[2].rect(), Rect::new(0.0, 0.0, 40.0, 120.0));

        assert!(pieces.iter().all(|piece| !piece.completed));
    }

    #[test]
    fn set_position() {
        let mut piece = Piece::new("AB", 0, 0, Orientation::Horizontal, 50.0);

        piece.set_position(30.0, 70.0);

        assert_eq!(piece.rect(), Rect::new(30.0, 70.0, 100.0, 50.0));
    }
}
