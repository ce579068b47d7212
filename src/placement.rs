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

use super::geometry::{snap_to_grid, Rect};

// Distance to keep between the pieces and the edges of the play area
pub const MARGIN: f32 = 30.0;
pub const MAX_ATTEMPTS: u32 = 50;

// Source of uniformly distributed values in [0, 1)
pub trait Random {
    fn next_unit(&mut self) -> f32;
}

impl<F: FnMut() -> f32> Random for F {
    fn next_unit(&mut self) -> f32 {
        self()
    }
}

// Small seeded generator so that a layout can be reproduced
pub struct SplitMix {
    state: u32,
}

impl SplitMix {
    pub fn new(seed: u32) -> SplitMix {
        SplitMix { state: seed }
    }
}

impl Random for SplitMix {
    fn next_unit(&mut self) -> f32 {
        self.state = self.state.wrapping_add(0x9E37_79B9);

        let mut z = self.state;
        z = (z ^ (z >> 16)).wrapping_mul(0x85EB_CA6B);
        z = (z ^ (z >> 13)).wrapping_mul(0xC2B2_AE35);
        z ^= z >> 16;

        // Use the top 24 bits so that the value fits exactly in an f32
        (z >> 8) as f32 / (1u32 << 24) as f32
    }
}

fn random_coordinate<R: Random>(random: &mut R, min: f32, max: f32) -> f32 {
    let value = min + random.next_unit() * (max - min);

    // If the piece doesn’t fit then max will be less than min and
    // this will end up as min
    snap_to_grid(value.min(max).max(min))
}

// Picks a position for each of the sizes in turn, trying to avoid
// the pieces that have already been placed. If no free spot is found
// after MAX_ATTEMPTS then the last attempt is used anyway.
pub fn place_pieces<R: Random>(
    area_width: f32,
    area_height: f32,
    sizes: &[(f32, f32)],
    random: &mut R,
) -> Vec<(f32, f32)> {
    let mut placed = Vec::<Rect>::with_capacity(sizes.len());

    for (piece_num, &(width, height)) in sizes.iter().enumerate() {
        let min_x = MARGIN;
        let max_x = area_width - width - MARGIN;
        let min_y = MARGIN;
        let max_y = area_height - height - MARGIN;

        if max_x < min_x || max_y < min_y {
            log::warn!(
                "piece {} ({}x{}) is too large for the play area",
                piece_num,
                width,
                height,
            );
        }

        let mut rect = Rect::new(min_x, min_y, width, height);

        for attempt in 1..=MAX_ATTEMPTS {
            rect.left = random_coordinate(random, min_x, max_x);
            rect.top = random_coordinate(random, min_y, max_y);

            if !placed.iter().any(|other| other.overlaps(&rect)) {
                break;
            }

            if attempt == MAX_ATTEMPTS {
                log::warn!(
                    "no free spot for piece {} after {} attempts",
                    piece_num,
                    MAX_ATTEMPTS,
                );
            }
        }

        log::debug!(
            "piece {} ({}x{}) at ({}, {})",
            piece_num,
            width,
            height,
            rect.left,
            rect.top,
        );

        placed.push(rect);
    }

    placed.into_iter().map(|rect| (rect.left, rect.top)).collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::{Mutex, Once};

    // Keeps the warnings so that tests can check what was reported
    struct WarningLog {
        messages: Mutex<Vec<String>>,
    }

    impl log::Log for WarningLog {
        fn enabled(&self, metadata: &log::Metadata) -> bool {
            metadata.level() <= log::Level::Warn
        }

        fn log(&self, record: &log::Record) {
            if self.enabled(record.metadata()) {
                if let Ok(mut messages) = self.messages.lock() {
                    messages.push(record.args().to_string());
                }
            }
        }

        fn flush(&self) {
        }
    }

    static WARNINGS: WarningLog = WarningLog {
        messages: Mutex::new(Vec::new()),
    };

    fn warnings() -> &'static WarningLog {
        static INIT: Once = Once::new();

        INIT.call_once(|| {
            if log::set_logger(&WARNINGS).is_ok() {
                log::set_max_level(log::LevelFilter::Warn);
            }
        });

        &WARNINGS
    }

    // Returns the given values in a loop
    fn sequence(values: &[f32]) -> impl FnMut() -> f32 + '_ {
        let mut pos = 0;

        move || {
            let value = values[pos % values.len()];
            pos += 1;
            value
        }
    }

    #[test]
    fn split_mix() {
        let mut a = SplitMix::new(42);
        let mut b = SplitMix::new(42);

        for _ in 0..1000 {
            let value = a.next_unit();
            assert!(value >= 0.0 && value < 1.0);
            assert_eq!(value, b.next_unit());
        }

        assert_ne!(SplitMix::new(1).next_unit(), SplitMix::new(2).next_unit());
    }

    #[test]
    fn within_bounds() {
        let mut random = SplitMix::new(7);
        let sizes = [(150.0, 50.0), (50.0, 100.0), (100.0, 50.0), (50.0, 50.0)];

        let positions = place_pieces(800.0, 600.0, &sizes, &mut random);

        assert_eq!(positions.len(), sizes.len());

        for (&(x, y), &(width, height)) in positions.iter().zip(sizes.iter()) {
            assert!(x >= MARGIN && x + width <= 800.0 - MARGIN);
            assert!(y >= MARGIN && y + height <= 600.0 - MARGIN);
            assert_eq!(x % 10.0, 0.0);
            assert_eq!(y % 10.0, 0.0);
        }
    }

    #[test]
    fn avoid_overlap() {
        // The first attempt for the second piece lands on the first
        // piece so it should try again
        let mut random = sequence(&[0.0, 0.0, 0.0, 0.0, 1.0, 1.0]);

        let positions = place_pieces(
            400.0,
            300.0,
            &[(50.0, 50.0), (50.0, 50.0)],
            &mut random,
        );

        assert_eq!(&positions, &[(30.0, 30.0), (320.0, 220.0)]);
    }

    #[test]
    fn give_up_on_overlap() {
        let mut calls = 0;
        let mut random = || {
            calls += 1;
            0.5f32
        };

        let positions = place_pieces(
            400.0,
            300.0,
            &[(50.0, 50.0), (50.0, 50.0)],
            &mut random,
        );

        // Both pieces end up in the same place after using up all of
        // the attempts for the second piece
        assert_eq!(&positions, &[(180.0, 130.0), (180.0, 130.0)]);
        assert_eq!(calls, 2 + MAX_ATTEMPTS * 2);
    }

    #[test]
    fn overlap_warning() {
        let warnings = warnings();

        place_pieces(
            400.0,
            300.0,
            &[(50.0, 50.0), (50.0, 50.0), (50.0, 50.0)],
            &mut || 0.5f32,
        );

        let messages = warnings.messages.lock().unwrap();

        assert!(messages.iter().any(|message| {
            message == &format!(
                "no free spot for piece 2 after {} attempts",
                MAX_ATTEMPTS,
            )
        }));
    }

    #[test]
    fn too_large() {
        let mut random = sequence(&[0.7]);

        let positions = place_pieces(
            100.0,
            100.0,
            &[(300.0, 50.0), (50.0, 300.0)],
            &mut random,
        );

        assert_eq!(positions[0].0, MARGIN);
        assert_eq!(positions[1].1, MARGIN);
    }
}
