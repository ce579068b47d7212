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

use std::collections::BTreeSet;
use super::completion::{self, Verdict};
use super::config::GameSettings;
use super::geometry::snap_to_grid;
use super::piece::{self, Piece};
use super::placement::{self, Random};
use super::puzzle_data::PuzzleData;
use super::snap::{self, Snap};

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("piece {0} does not exist")]
    NoSuchPiece(usize),
    #[error("piece {0} is locked")]
    Locked(usize),
}

// Where a released piece ended up
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Landing {
    Snapped(Snap),
    Free {
        x: f32,
        y: f32,
    },
}

impl Landing {
    pub fn position(&self) -> (f32, f32) {
        match self {
            Landing::Snapped(snap) => (snap.x, snap.y),
            Landing::Free { x, y } => (*x, *y),
        }
    }
}

// All of the state for one play-through of a puzzle
pub struct Session {
    puzzle: PuzzleData,
    snap_distance: f32,
    snap_tolerance: f32,
    cell_size: f32,
    area_width: f32,
    area_height: f32,
    pieces: Vec<Piece>,
    completed_words: BTreeSet<usize>,
    victory_reported: bool,

    pending_completed_words: Vec<usize>,
    pending_victory: bool,
}

impl Session {
    pub fn new<R: Random>(
        puzzle: PuzzleData,
        settings: &GameSettings,
        cell_size: f32,
        area_width: f32,
        area_height: f32,
        random: &mut R,
    ) -> Session {
        let pieces = piece::pieces_for_puzzle(&puzzle, cell_size);

        log::info!(
            "“{}”: {} words, {} pieces, cell size {}",
            puzzle.title,
            puzzle.words.len(),
            pieces.len(),
            cell_size,
        );

        let mut session = Session {
            puzzle,
            snap_distance: settings.snap_distance,
            snap_tolerance: settings.snap_tolerance,
            cell_size,
            area_width,
            area_height,
            pieces,
            completed_words: BTreeSet::new(),
            victory_reported: false,

            pending_completed_words: Vec::new(),
            pending_victory: false,
        };

        session.scatter_pieces(random);

        session
    }

    fn scatter_pieces<R: Random>(&mut self, random: &mut R) {
        let sizes = self.pieces.iter()
            .map(|piece| (piece.width, piece.height))
            .collect::<Vec<_>>();

        let positions = placement::place_pieces(
            self.area_width,
            self.area_height,
            &sizes,
            random,
        );

        for (piece, (x, y)) in self.pieces.iter_mut().zip(positions) {
            piece.set_position(x, y);
        }
    }

    fn movable_piece(&self, index: usize) -> Result<&Piece, MoveError> {
        let piece = self.pieces.get(index)
            .ok_or(MoveError::NoSuchPiece(index))?;

        if piece.completed {
            Err(MoveError::Locked(index))
        } else {
            Ok(piece)
        }
    }

    // Keeps a position for the piece inside the play area and on the
    // grid
    pub fn constrain_position(
        &self,
        index: usize,
        x: f32,
        y: f32,
    ) -> Result<(f32, f32), MoveError> {
        let piece = self.movable_piece(index)?;

        let x = x.min(self.area_width - piece.width).max(0.0);
        let y = y.min(self.area_height - piece.height).max(0.0);

        Ok((snap_to_grid(x), snap_to_grid(y)))
    }

    // Moves a piece to where it was dropped, or flush against a
    // neighbour from the same word if one is close enough
    pub fn drop_piece(
        &mut self,
        index: usize,
        x: f32,
        y: f32,
    ) -> Result<Landing, MoveError> {
        let (x, y) = self.constrain_position(index, x, y)?;

        let landing = match snap::find_snap(
            &self.pieces,
            index,
            x,
            y,
            self.snap_distance,
        ) {
            Some(snap) => {
                log::debug!(
                    "“{}” snapped to the {} of “{}” (distance {})",
                    self.pieces[index].fragment,
                    snap.side.name(),
                    self.pieces[snap.other].fragment,
                    snap.distance,
                );
                Landing::Snapped(snap)
            },
            None => {
                log::debug!(
                    "“{}” placed freely at ({}, {})",
                    self.pieces[index].fragment,
                    x,
                    y,
                );
                Landing::Free { x, y }
            },
        };

        let (x, y) = landing.position();
        self.pieces[index].set_position(x, y);

        Ok(landing)
    }

    // Checks every word that isn’t complete yet and locks the ones
    // that have been assembled. Returns the number of newly completed
    // words.
    pub fn check_completion(&mut self) -> usize {
        let mut n_completed = 0;

        for (word_index, word) in self.puzzle.words.iter().enumerate() {
            if self.completed_words.contains(&word_index) {
                continue;
            }

            let verdict = completion::check_word(
                word,
                self.pieces.iter().filter(|p| p.word_index == word_index),
                self.snap_tolerance,
            );

            match verdict {
                Verdict::Complete => (),
                Verdict::WrongOrder(formed) => {
                    log::debug!("“{}” reads as “{}”", word.word, formed);
                    continue;
                },
                Verdict::Apart { gap, offset } => {
                    log::debug!(
                        "“{}” is not aligned: gap={} offset={}",
                        word.word,
                        gap,
                        offset,
                    );
                    continue;
                },
            }

            log::info!("word completed: {}", word.word);

            for piece in self.pieces.iter_mut() {
                if piece.word_index == word_index {
                    piece.completed = true;
                }
            }

            self.completed_words.insert(word_index);
            self.pending_completed_words.push(word_index);
            n_completed += 1;
        }

        if !self.victory_reported &&
            self.completed_words.len() == self.puzzle.words.len()
        {
            log::info!("all words completed");
            self.victory_reported = true;
            self.pending_victory = true;
        }

        n_completed
    }

    // Called at the end of a drag. The completion check runs straight
    // away so that it always sees the final position of the piece.
    pub fn release_piece(
        &mut self,
        index: usize,
        x: f32,
        y: f32,
    ) -> Result<Landing, MoveError> {
        let landing = self.drop_piece(index, x, y)?;

        self.check_completion();

        Ok(landing)
    }

    pub fn changed_completed_words(&mut self) -> std::vec::IntoIter<usize> {
        std::mem::take(&mut self.pending_completed_words).into_iter()
    }

    pub fn pending_victory(&mut self) -> bool {
        std::mem::replace(&mut self.pending_victory, false)
    }

    pub fn is_word_completed(&self, word_index: usize) -> bool {
        self.completed_words.contains(&word_index)
    }

    pub fn n_completed_words(&self) -> usize {
        self.completed_words.len()
    }

    pub fn puzzle(&self) -> &PuzzleData {
        &self.puzzle
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn word_pieces(
        &self,
        word_index: usize,
    ) -> impl Iterator<Item = (usize, &Piece)> {
        self.pieces.iter()
            .enumerate()
            .filter(move |(_, piece)| piece.word_index == word_index)
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn area_width(&self) -> f32 {
        self.area_width
    }

    pub fn area_height(&self) -> f32 {
        self.area_height
    }

    // Each word along with its fun fact, for the victory screen
    pub fn summary(&self) -> impl Iterator<Item = (&str, &str)> {
        self.puzzle.words.iter()
            .map(|word| (word.word.as_str(), word.fact.as_str()))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use super::super::config::Config;
    use super::super::snap::Side;

    fn cat_and_dog() -> PuzzleData {
        r#"{
            "title": "Pets",
            "description": "Two animals",
            "words": [
                {
                    "word": "CAT",
                    "fragments": ["C", "A", "T"],
                    "fact": "Cats purr"
                },
                {
                    "word": "DOG",
                    "fragments": ["DO", "G"],
                    "orientation": "vertical",
                    "fact": "Dogs wag"
                }
            ]
        }"#.parse().unwrap()
    }

    // Every piece starts in the top left corner of the area
    fn session(puzzle: PuzzleData) -> Session {
        Session::new(
            puzzle,
            &Config::defaults().game_settings,
            50.0,
            800.0,
            600.0,
            &mut || 0.0f32,
        )
    }

    fn assemble_cat(session: &mut Session) {
        assert_eq!(
            session.release_piece(0, 100.0, 200.0).unwrap(),
            Landing::Free { x: 100.0, y: 200.0 },
        );
        session.release_piece(1, 160.0, 205.0).unwrap();
        session.release_piece(2, 210.0, 200.0).unwrap();
    }

    fn assemble_dog(session: &mut Session) {
        session.release_piece(3, 500.0, 300.0).unwrap();
        session.release_piece(4, 505.0, 410.0).unwrap();
    }

    #[test]
    fn scattered() {
        let session = Session::new(
            cat_and_dog(),
            &Config::defaults().game_settings,
            50.0,
            800.0,
            600.0,
            &mut placement::SplitMix::new(3),
        );

        assert_eq!(session.pieces().len(), 5);
        assert_eq!(session.cell_size(), 50.0);

        for piece in session.pieces() {
            assert!(piece.x >= placement::MARGIN);
            assert!(piece.y >= placement::MARGIN);
            assert!(piece.x + piece.width <= 800.0 - placement::MARGIN);
            assert!(piece.y + piece.height <= 600.0 - placement::MARGIN);
        }
    }

    #[test]
    fn assemble_word() {
        let mut session = session(cat_and_dog());

        assemble_cat(&mut session);

        let positions = session.word_pieces(0)
            .map(|(_, piece)| (piece.x, piece.y))
            .collect::<Vec<_>>();

        assert_eq!(
            &positions,
            &[(100.0, 200.0), (150.0, 200.0), (200.0, 200.0)],
        );

        assert!(session.is_word_completed(0));
        assert!(!session.is_word_completed(1));
        assert_eq!(session.n_completed_words(), 1);
        assert_eq!(&session.changed_completed_words().collect::<Vec<_>>(), &[0]);
        assert!(session.changed_completed_words().next().is_none());
        assert!(!session.pending_victory());

        assert!(session.word_pieces(0).all(|(_, piece)| piece.completed));
        assert!(session.word_pieces(1).all(|(_, piece)| !piece.completed));
    }

    #[test]
    fn snap_landing() {
        let mut session = session(cat_and_dog());

        session.release_piece(0, 100.0, 200.0).unwrap();

        let landing = session.release_piece(1, 160.0, 205.0).unwrap();

        let Landing::Snapped(snap) = landing
        else {
            unreachable!("piece didn’t snap");
        };

        assert_eq!(snap.side, Side::Right);
        assert_eq!(snap.other, 0);
        assert_eq!((snap.x, snap.y), (150.0, 200.0));
        assert_eq!(landing.position(), (150.0, 200.0));
    }

    #[test]
    fn locked_pieces() {
        let mut session = session(cat_and_dog());

        assemble_cat(&mut session);

        assert_eq!(
            session.release_piece(1, 400.0, 400.0).unwrap_err(),
            MoveError::Locked(1),
        );
        assert_eq!(
            session.release_piece(17, 400.0, 400.0).unwrap_err(),
            MoveError::NoSuchPiece(17),
        );
        assert_eq!(
            &session.release_piece(1, 0.0, 0.0).unwrap_err().to_string(),
            "piece 1 is locked",
        );

        assert_eq!((session.pieces()[1].x, session.pieces()[1].y), (150.0, 200.0));
    }

    #[test]
    fn idempotent() {
        let mut session = session(cat_and_dog());

        assemble_cat(&mut session);
        assert_eq!(session.changed_completed_words().count(), 1);

        for _ in 0..3 {
            assert_eq!(session.check_completion(), 0);
        }

        assert!(session.changed_completed_words().next().is_none());
        assert!(session.is_word_completed(0));
        assert!(session.word_pieces(0).all(|(_, piece)| piece.completed));
    }

    #[test]
    fn victory_once() {
        let mut session = session(cat_and_dog());

        assemble_cat(&mut session);
        assert!(!session.pending_victory());

        assemble_dog(&mut session);

        assert_eq!(
            &session.changed_completed_words().collect::<Vec<_>>(),
            &[0, 1],
        );
        assert_eq!(session.n_completed_words(), 2);
        assert!(session.pending_victory());
        assert!(!session.pending_victory());

        session.check_completion();
        session.check_completion();

        assert!(!session.pending_victory());
        assert_eq!(session.n_completed_words(), 2);
    }

    #[test]
    fn pieces_apart() {
        let mut session = session(cat_and_dog());

        session.release_piece(0, 100.0, 200.0).unwrap();
        // Far away from C so it stays where it is dropped
        assert_eq!(
            session.release_piece(1, 600.0, 500.0).unwrap(),
            Landing::Free { x: 600.0, y: 500.0 },
        );
        session.release_piece(2, 700.0, 500.0).unwrap();

        assert!(!session.is_word_completed(0));
        assert!(session.changed_completed_words().next().is_none());
    }

    #[test]
    fn dropped_outside() {
        let mut session = session(cat_and_dog());

        // Pieces are kept inside the area
        assert_eq!(
            session.release_piece(0, -40.0, 1000.0).unwrap(),
            Landing::Free { x: 0.0, y: 550.0 },
        );
        assert_eq!(
            session.constrain_position(4, 1000.0, 3.0).unwrap(),
            (750.0, 0.0),
        );
    }

    #[test]
    fn summary() {
        let session = session(cat_and_dog());

        assert_eq!(
            &session.summary().collect::<Vec<_>>(),
            &[("CAT", "Cats purr"), ("DOG", "Dogs wag")],
        );
        assert_eq!(session.puzzle().title, "Pets");
    }
}
