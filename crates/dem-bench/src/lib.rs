//! Benchmark captures for the demo codec.
//!
//! Provides synthetic captures shaped like real recordings:
//!
//! - [`reference_capture`]: 1,000 frames of a second-edition session
//! - [`stress_capture`]: 20,000 frames, roughly a 10-minute recording
//! - [`build_capture`]: the generator behind both, deterministic per seed

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use dem_codec::{DemoFile, Event, GameObject, Sound3D, WireLayout};
use dem_core::{GameDataTable, GameType};
use dem_test_utils::fixtures::{self, Profile, BOSS_ROBOT, GENERIC_MODEL, GRUNT_ROBOT};

/// Game data matching the ids the fixtures use.
pub fn reference_game_data() -> GameDataTable {
    GameDataTable::new()
        .with_robot_model(BOSS_ROBOT, 10)
        .with_submodels(10, 4)
        .with_boss(BOSS_ROBOT)
        .with_robot_model(GRUNT_ROBOT, 11)
        .with_submodels(11, 2)
        .with_submodels(GENERIC_MODEL, 3)
}

/// Reference capture: 1,000 frames, 8 objects per frame.
pub fn reference_capture(seed: u64) -> DemoFile {
    build_capture(1_000, 8, seed)
}

/// Stress capture: 20,000 frames, 12 objects per frame.
pub fn stress_capture(seed: u64) -> DemoFile {
    build_capture(20_000, 12, seed)
}

/// Build a canonical second-edition capture of `frames` frames, each
/// drawing `objects_per_frame` objects picked deterministically from
/// the fixture set.
pub fn build_capture(frames: usize, objects_per_frame: usize, seed: u64) -> DemoFile {
    let profile = Profile::new(GameType::SECOND_EDITION, WireLayout::Canonical);
    let data = reference_game_data();
    let pool: Vec<GameObject> = fixtures::sample_objects(profile, &data);

    let mut events = Vec::with_capacity(frames * (objects_per_frame + 4) + 3);
    events.push(fixtures::multiplayer_start(profile, 4, false, false));
    events.push(Event::NewLevel {
        new_level: 1,
        old_level: 0,
        walls: Some(Vec::new()),
    });

    let mut state = seed;
    for frame in 0..frames {
        events.push(Event::StartFrame {
            last_frame_length: 0x0888,
            frame_count: frame as i32,
            recorded_time: (frame as i32).wrapping_mul(0x0888),
        });
        events.push(Event::ViewerObject {
            window: Some(0),
            object: fixtures::player_ship(profile),
        });
        for _ in 0..objects_per_frame {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            let pick = (state >> 33) as usize % pool.len();
            events.push(Event::RenderObject {
                object: pool[pick].clone(),
            });
        }
        events.push(Event::Sound3D(Sound3D {
            sound: (state % 200) as i32,
            angle: 0,
            volume: 0x8000,
        }));
        events.push(Event::PlayerEnergy {
            old: Some(100),
            energy: 100 - (frame % 50) as u8,
        });
    }
    events.push(Event::Eof);

    DemoFile {
        edition: profile.edition(),
        game_type: profile.game_type,
        events,
        trailing_bytes: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_capture_encodes_and_decodes() {
        let data = reference_game_data();
        let file = reference_capture(42);
        assert_eq!(file.frame_count(), 1_000);
        let bytes = dem_codec::encode(&file, &data).unwrap();
        assert_eq!(dem_codec::decode(&bytes, &data), file);
    }

    #[test]
    fn build_capture_deterministic() {
        assert_eq!(build_capture(20, 5, 7), build_capture(20, 5, 7));
        assert_ne!(build_capture(20, 5, 7), build_capture(20, 5, 8));
    }
}
