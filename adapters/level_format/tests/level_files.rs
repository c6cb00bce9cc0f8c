use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use tilerun_core::{BlockMapping, CellCoord, TileId, TileKind, PLAYER_SPRITE_ID};
use tilerun_level_format::{decode, encode, load, save, LevelFile, LevelFormatError};
use tilerun_world::Grid;

const HAND_CRAFTED: &str = "\
!info
blocksize=32
jump=1
!blocks
PLAYER=-1
AIR=0
GROUND=1
ENEMY=2
COIN=3
SPAWN=4
GOAL=5
!blockgfx
-1=gfx/player/primitive.png
1=gfx/ground/stone.png
!world
0 0 0
4 0 5
1 1 1
";

struct ScratchDir(PathBuf);

impl ScratchDir {
    fn new(name: &str) -> Self {
        let path = std::env::temp_dir().join(format!(
            "tilerun-level-format-{}-{name}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&path);
        fs::create_dir_all(&path).expect("create scratch dir");
        Self(path)
    }

    fn file(&self, name: &str) -> PathBuf {
        self.0.join(name)
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

fn sample_level() -> LevelFile {
    let mut grid = Grid::new(4, 3);
    for column in 0..4 {
        let _ = grid.set(CellCoord::new(column, 2), TileKind::Ground);
    }
    let _ = grid.set(CellCoord::new(0, 1), TileKind::Spawn);
    let _ = grid.set(CellCoord::new(3, 1), TileKind::Goal);
    let _ = grid.set(CellCoord::new(2, 1), TileKind::Enemy);
    let _ = grid.set(CellCoord::new(1, 0), TileKind::Coin);

    let info = [("jump", "1"), ("jump_height", "3"), ("theme", "dusk")]
        .into_iter()
        .map(|(key, value)| (key.to_owned(), value.to_owned()))
        .collect();
    let mut level = LevelFile::new(info, grid);
    let _ = level
        .block_gfx
        .insert(TileKind::Enemy.reserved_id(), "gfx/enemy/spikes.png".to_owned());
    level
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).expect("read level file")
}

#[test]
fn saved_levels_load_back_unchanged() {
    let scratch = ScratchDir::new("round-trip");
    let path = scratch.file("level.txt");
    let level = sample_level();

    save(&level, &path, false).expect("save");
    let loaded = load(&path).expect("load");

    assert_eq!(loaded, level);
    assert_eq!(loaded.grid.find(TileKind::Spawn), Some(CellCoord::new(0, 1)));
    assert_eq!(loaded.grid.find(TileKind::Goal), Some(CellCoord::new(3, 1)));
    assert_eq!(loaded.graphic_path("enemy"), "gfx/enemy/spikes.png");
}

#[test]
fn second_save_without_overwrite_keeps_the_first_file() {
    let scratch = ScratchDir::new("no-overwrite");
    let path = scratch.file("level.txt");
    let first = sample_level();
    save(&first, &path, false).expect("first save");
    let before = read(&path);

    let mut second = sample_level();
    let _ = second.info.insert("theme".to_owned(), "noon".to_owned());
    let error = save(&second, &path, false).expect_err("second save is refused");

    assert!(matches!(error, LevelFormatError::FileExists { .. }));
    assert_eq!(read(&path), before);

    save(&second, &path, true).expect("overwrite");
    assert_eq!(load(&path).expect("load").info.get("theme").map(String::as_str), Some("noon"));
}

#[test]
fn save_leaves_no_staging_file_behind() {
    let scratch = ScratchDir::new("staging");
    let path = scratch.file("level.txt");
    save(&sample_level(), &path, false).expect("save");

    let entries: Vec<_> = fs::read_dir(&scratch.0)
        .expect("list scratch dir")
        .map(|entry| entry.expect("entry").file_name())
        .collect();
    assert_eq!(entries, vec![std::ffi::OsString::from("level.txt")]);
}

#[test]
fn hand_crafted_level_round_trips_byte_for_byte() {
    let scratch = ScratchDir::new("hand-crafted");
    let source = scratch.file("source.txt");
    let copy = scratch.file("copy.txt");
    fs::write(&source, HAND_CRAFTED).expect("write source");

    let level = load(&source).expect("load");
    assert_eq!(level.grid.columns(), 3);
    assert_eq!(level.grid.rows(), 3);
    assert_eq!(level.grid.count(TileKind::Ground), 3);
    assert_eq!(level.grid.count(TileKind::Spawn), 1);
    assert_eq!(level.grid.count(TileKind::Goal), 1);
    assert_eq!(level.blocks, BlockMapping::reserved());
    assert_eq!(
        level.block_gfx.get(&PLAYER_SPRITE_ID).map(String::as_str),
        Some("gfx/player/primitive.png")
    );

    save(&level, &copy, false).expect("save copy");
    assert_eq!(read(&copy), HAND_CRAFTED);
}

#[test]
fn block_names_are_upcased_on_load() {
    let text = "!blocks\nair=0\nGround=1\nspawn=4\ngoal=5\n!world\n4 5\n1 1\n";
    let level = decode(text).expect("decode");

    let names: Vec<_> = level.blocks.iter().map(|(name, _)| name.to_owned()).collect();
    assert_eq!(names, vec!["AIR", "GROUND", "SPAWN", "GOAL"]);
    assert_eq!(level.blocks.id_of("ground"), Some(TileId::new(1)));
    assert_eq!(
        encode(&level).expect("encode"),
        "!info\n!blocks\nAIR=0\nGROUND=1\nSPAWN=4\nGOAL=5\n!blockgfx\n!world\n4 5\n1 1\n"
    );
}

#[test]
fn loaded_levels_expose_typed_settings() {
    let level = decode(HAND_CRAFTED).expect("decode");
    let settings = level.settings().expect("settings");
    assert_eq!(settings.blocksize, 32);
    assert_eq!(settings.jump_width, 3);
    assert_eq!(settings.coin_worth, 5);
    assert!(settings.extra.is_empty());
}

#[test]
fn missing_files_report_the_path() {
    let scratch = ScratchDir::new("missing");
    let path = scratch.file("absent.txt");
    match load(&path) {
        Err(LevelFormatError::Io { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected an i/o error, got {other:?}"),
    }
}

#[test]
fn empty_info_map_still_writes_every_section() {
    let level = LevelFile::new(BTreeMap::new(), Grid::new(2, 1));
    assert_eq!(
        encode(&level).expect("encode"),
        "!info\n!blocks\nPLAYER=-1\nAIR=0\nGROUND=1\nENEMY=2\nCOIN=3\nSPAWN=4\nGOAL=5\n!blockgfx\n!world\n0 0\n"
    );
}
