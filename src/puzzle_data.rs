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

use std::str::FromStr;
use serde::Deserialize;
use super::geometry::Orientation;

#[derive(Debug, Deserialize)]
pub struct Word {
    pub word: String,
    pub fragments: Vec<String>,
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default)]
    pub fact: String,
}

#[derive(Debug, Deserialize)]
pub struct PuzzleData {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub words: Vec<Word>,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    #[error("puzzle has no words")]
    NoWords,
    #[error("word {0} is empty")]
    EmptyWord(usize),
    #[error("“{0}” has no fragments")]
    NoFragments(String),
    #[error("“{0}” has an empty fragment")]
    EmptyFragment(String),
    #[error("fragments of “{word}” join to “{joined}”")]
    FragmentMismatch {
        word: String,
        joined: String,
    },
}

impl PuzzleData {
    // Every word must be rebuildable by joining its fragments in the
    // order they are listed
    pub fn validate(&self) -> Result<(), Error> {
        if self.words.is_empty() {
            return Err(Error::NoWords);
        }

        for (word_num, word) in self.words.iter().enumerate() {
            if word.word.is_empty() {
                return Err(Error::EmptyWord(word_num));
            }

            if word.fragments.is_empty() {
                return Err(Error::NoFragments(word.word.clone()));
            }

            if word.fragments.iter().any(|f| f.is_empty()) {
                return Err(Error::EmptyFragment(word.word.clone()));
            }

            let joined = word.fragments.concat();

            if joined != word.word {
                return Err(Error::FragmentMismatch {
                    word: word.word.clone(),
                    joined,
                });
            }
        }

        Ok(())
    }

    pub fn n_pieces(&self) -> usize {
        self.words.iter().map(|word| word.fragments.len()).sum()
    }
}

impl FromStr for PuzzleData {
    type Err = Error;

    fn from_str(s: &str) -> Result<PuzzleData, Error> {
        let puzzle = serde_json::from_str::<PuzzleData>(s)?;

        puzzle.validate()?;

        Ok(puzzle)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse() {
        let puzzle = r#"{
            "title": "Animals",
            "description": "Find the pets",
            "words": [
                {
                    "word": "CAT",
                    "fragments": ["C", "AT"],
                    "fact": "Cats sleep a lot"
                },
                {
                    "word": "DOG",
                    "fragments": ["D", "O", "G"],
                    "orientation": "vertical",
                    "fact": "Dogs bark"
                }
            ]
        }"#.parse::<PuzzleData>().unwrap();

        assert_eq!(puzzle.title, "Animals");
        assert_eq!(puzzle.description, "Find the pets");
        assert_eq!(puzzle.words.len(), 2);
        assert_eq!(puzzle.n_pieces(), 5);
        assert_eq!(puzzle.words[0].orientation, Orientation::Horizontal);
        assert_eq!(&puzzle.words[0].fragments, &["C", "AT"]);
        assert_eq!(puzzle.words[1].orientation, Orientation::Vertical);
        assert_eq!(puzzle.words[1].fact, "Dogs bark");
    }

    #[test]
    fn parse_error() {
        assert_eq!(
            &r#"{"words": []}"#.parse::<PuzzleData>().unwrap_err().to_string(),
            "puzzle has no words",
        );
        assert_eq!(
            &r#"{"words": [{"word": "", "fragments": []}]}"#
                .parse::<PuzzleData>().unwrap_err().to_string(),
            "word 0 is empty",
        );
        assert_eq!(
            &r#"{"words": [{"word": "CAT", "fragments": []}]}"#
                .parse::<PuzzleData>().unwrap_err().to_string(),
            "“CAT” has no fragments",
        );
        assert_eq!(
            &r#"{"words": [{"word": "CAT", "fragments": ["CAT", ""]}]}"#
                .parse::<PuzzleData>().unwrap_err().to_string(),
            "“CAT” has an empty fragment",
        );
        assert_eq!(
            &r#"{"words": [{"word": "CAT", "fragments": ["AT", "C"]}]}"#
                .parse::<PuzzleData>().unwrap_err().to_string(),
            "fragments of “CAT” join to “ATC”",
        );
        assert!(matches!(
            "{".parse::<PuzzleData>().unwrap_err(),
            Error::Json(_),
        ));
        assert!(matches!(
            r#"{"words": [{"word": "A", "fragments": ["A"],
                "orientation": "sideways"}]}"#.parse::<PuzzleData>(),
            Err(Error::Json(_)),
        ));
    }
}
