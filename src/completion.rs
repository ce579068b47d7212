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

use super::piece::Piece;
use super::puzzle_data::Word;

#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Complete,
    // The fragments, read in the order that they are laid out, don’t
    // spell the word
    WrongOrder(String),
    // Two neighbouring pieces aren’t touching or aren’t lined up
    Apart {
        gap: f32,
        offset: f32,
    },
}

// Checks whether the pieces of a word have been assembled. The pieces
// are sorted by their position along the word and their fragments
// are joined in that order, so it is the spelling that matters rather
// than which physical piece is where.
pub fn check_word<'a, I>(word: &Word, pieces: I, tolerance: f32) -> Verdict
    where I: IntoIterator<Item = &'a Piece>
{
    let orientation = word.orientation;

    let mut pieces = pieces.into_iter().collect::<Vec<_>>();

    pieces.sort_by(|a, b| {
        orientation.start(&a.rect()).total_cmp(&orientation.start(&b.rect()))
    });

    let formed_word = pieces.iter()
        .map(|piece| piece.fragment.as_str())
        .collect::<String>();

    if formed_word != word.word {
        return Verdict::WrongOrder(formed_word);
    }

    for pair in pieces.windows(2) {
        let current = pair[0].rect();
        let next = pair[1].rect();

        let gap = (orientation.start(&next) - orientation.end(&current)).abs();
        let offset = (orientation.cross(&current) - orientation.cross(&next))
            .abs();

        if gap > tolerance || offset > tolerance {
            return Verdict::Apart { gap, offset };
        }
    }

    Verdict::Complete
}
