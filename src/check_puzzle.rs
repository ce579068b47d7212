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

mod geometry;
mod puzzle_data;
mod config;
mod piece;
mod placement;
mod snap;
mod completion;
mod session;

use std::{fs, process::ExitCode, ffi::OsString};
use clap::Parser;
use config::Config;
use geometry::Orientation;
use puzzle_data::PuzzleData;
use session::{Landing, Session};

#[derive(Parser)]
#[command(name = "Check puzzle")]
struct Cli {
    #[arg(required = true, value_name = "PUZZLE")]
    puzzles: Vec<OsString>,
    #[arg(short, long, value_name = "FILE")]
    config: Option<OsString>,
    #[arg(short = 'W', long, value_name = "PIXELS", default_value_t = 800.0)]
    width: f32,
    #[arg(short = 'H', long, value_name = "PIXELS", default_value_t = 600.0)]
    height: f32,
    #[arg(short, long, value_name = "PIXELS", default_value_t = 1024.0)]
    viewport_width: f32,
    #[arg(short, long, default_value_t = 1)]
    seed: u32,
    #[arg(long)]
    solve: bool,
}

fn load_config(filename: Option<&OsString>) -> Result<Config, String> {
    let Some(filename) = filename
    else {
        return Ok(Config::defaults());
    };

    fs::read_to_string(filename)
        .map_err(|e| e.to_string())
        .and_then(|text| text.parse::<Config>().map_err(|e| e.to_string()))
        .map_err(|e| format!("{}: {}", filename.to_string_lossy(), e))
}

fn print_summary(puzzle: &PuzzleData, cell_size: f32) {
    println!("{}", puzzle.title);

    if !puzzle.description.is_empty() {
        println!("{}", puzzle.description);
    }

    println!(
        "\n{} words, {} pieces, cell size {}px\n",
        puzzle.words.len(),
        puzzle.n_pieces(),
        cell_size,
    );

    for word in puzzle.words.iter() {
        println!(
            "{:<12} {:<10} {}",
            word.word,
            word.orientation.name(),
            word.fragments.join(" | "),
        );

        if !word.fact.is_empty() {
            println!("{:12} {}", "", word.fact);
        }
    }
}

// Position for the first piece of a word so that the whole word fits
// inside the play area
fn word_start(session: &Session, word_index: usize, first: usize) -> (f32, f32) {
    let (length, thickness) = session.word_pieces(word_index)
        .fold((0.0, 0.0), |(length, thickness): (f32, f32), (_, piece)| {
            let rect = piece.rect();

            (
                length + piece.orientation.end(&rect)
                    - piece.orientation.start(&rect),
                thickness.max(match piece.orientation {
                    Orientation::Horizontal => piece.height,
                    Orientation::Vertical => piece.width,
                }),
            )
        });

    let piece = &session.pieces()[first];
    let (width, height) = match piece.orientation {
        Orientation::Horizontal => (length, thickness),
        Orientation::Vertical => (thickness, length),
    };

    (
        piece.x.min(session.area_width() - width).max(0.0),
        piece.y.min(session.area_height() - height).max(0.0),
    )
}

fn solve(session: &mut Session) -> Result<(), String> {
    for word_index in 0..session.puzzle().words.len() {
        let indices = session.word_pieces(word_index)
            .map(|(index, _)| index)
            .collect::<Vec<_>>();

        let Some(&first) = indices.first()
        else {
            continue;
        };

        let (x, y) = word_start(session, word_index, first);

        session.release_piece(first, x, y).map_err(|e| e.to_string())?;

        for pair in indices.windows(2) {
            let previous = &session.pieces()[pair[0]];

            let (x, y) = match previous.orientation {
                Orientation::Horizontal => {
                    (previous.x + previous.width, previous.y)
                },
                Orientation::Vertical => {
                    (previous.x, previous.y + previous.height)
                },
            };

            let landing = session.release_piece(pair[1], x, y)
                .map_err(|e| e.to_string())?;

            let piece = &session.pieces()[pair[1]];

            match landing {
                Landing::Snapped(snap) => println!(
                    "  “{}” snapped to the {} of “{}”",
                    piece.fragment,
                    snap.side.name(),
                    session.pieces()[snap.other].fragment,
                ),
                Landing::Free { x, y } => println!(
                    "  “{}” didn’t snap, left at ({}, {})",
                    piece.fragment,
                    x,
                    y,
                ),
            }
        }

        for word_index in session.changed_completed_words() {
            println!("{} completed", session.puzzle().words[word_index].word);
        }
    }

    if session.pending_victory() {
        println!("\nAll {} words completed!", session.n_completed_words());
        Ok(())
    } else {
        Err(format!(
            "only {} of {} words were completed",
            session.n_completed_words(),
            session.puzzle().words.len(),
        ))
    }
}

fn main() -> ExitCode {
    env_logger::builder().init();

    let cli = Cli::parse();

    let config = match load_config(cli.config.as_ref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        },
    };

    let cell_size = config.game_settings.cell_size.for_viewport(
        cli.viewport_width
    );

    for filename in cli.puzzles.iter() {
        let puzzle_string = match fs::read_to_string(filename) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("{}: {}", filename.to_string_lossy(), e);
                return ExitCode::FAILURE;
            },
        };

        let puzzle = match puzzle_string.parse::<PuzzleData>() {
            Ok(p) => p,
            Err(e) => {
                eprintln!("{}: {}", filename.to_string_lossy(), e);
                return ExitCode::FAILURE;
            },
        };

        print_summary(&puzzle, cell_size);

        if cli.solve {
            println!();

            let mut session = Session::new(
                puzzle,
                &config.game_settings,
                cell_size,
                cli.width,
                cli.height,
                &mut placement::SplitMix::new(cli.seed),
            );

            if let Err(e) = solve(&mut session) {
                eprintln!("{}: {}", filename.to_string_lossy(), e);
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
