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

use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseMethod {
    Button,
    Backdrop,
}

impl CloseMethod {
    pub fn name(self) -> &'static str {
        match self {
            CloseMethod::Button => "button",
            CloseMethod::Backdrop => "backdrop",
        }
    }
}

// Events reported to the page’s analytics, if it has any
#[derive(Debug, Clone, PartialEq)]
pub enum Event<'a> {
    WordCompleted {
        word: &'a str,
        puzzle: &'a str,
    },
    PuzzleCompleted {
        puzzle: &'a str,
        total_words: usize,
    },
    HelpClicked {
        puzzle: &'a str,
    },
    VictoryModalClosed {
        puzzle: &'a str,
        method: CloseMethod,
    },
}

impl<'a> Event<'a> {
    pub fn name(&self) -> &'static str {
        match self {
            Event::WordCompleted { .. } => "word_completed",
            Event::PuzzleCompleted { .. } => "puzzle_completed",
            Event::HelpClicked { .. } => "help_clicked",
            Event::VictoryModalClosed { .. } => "victory_modal_closed",
        }
    }

    pub fn params(&self) -> Value {
        match *self {
            Event::WordCompleted { word, puzzle } => json!({
                "word_name": word,
                "puzzle_name": puzzle,
            }),
            Event::PuzzleCompleted { puzzle, total_words } => json!({
                "puzzle_name": puzzle,
                "total_words": total_words,
            }),
            Event::HelpClicked { puzzle } => json!({
                "puzzle_name": puzzle,
            }),
            Event::VictoryModalClosed { puzzle, method } => json!({
                "puzzle_name": puzzle,
                "close_method": method.name(),
            }),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn params() {
        let event = Event::WordCompleted { word: "CAT", puzzle: "Pets" };
        assert_eq!(event.name(), "word_completed");
        assert_eq!(
            event.params(),
            json!({ "word_name": "CAT", "puzzle_name": "Pets" }),
        );

        let event = Event::PuzzleCompleted { puzzle: "Pets", total_words: 4 };
        assert_eq!(event.name(), "puzzle_completed");
        assert_eq!(event.params()["total_words"], 4);

        let event = Event::HelpClicked { puzzle: "Pets" };
        assert_eq!(event.name(), "help_clicked");
        assert_eq!(event.params(), json!({ "puzzle_name": "Pets" }));

        let event = Event::VictoryModalClosed {
            puzzle: "Pets",
            method: CloseMethod::Backdrop,
        };
        assert_eq!(event.name(), "victory_modal_closed");
        assert_eq!(event.params()["close_method"], "backdrop");
    }
}
