//! Maze layouts: text format, directory loading, built-in mazes.
//!
//! ## Sources (priority order):
//!   1. An explicit file path
//!   2. `mazes/` directory (individual `.txt` files, matched by file stem)
//!   3. Built-in embedded layouts (matched by name)
//!
//! ## Layout format (`.txt`):
//!   Optional line 1: `# Maze Name`
//!   Then `2h+1` lines of `2w+1` characters, drawn on a lattice:
//!   ```text
//!   +-+-+-+
//!   |   |T|
//!   + + + +
//!   | |   |
//!   + + +-+
//!   |0|   |
//!   +-+-+-+
//!   ```
//!
//! ## Legend:
//!   cells (odd row, odd column):  ' ' = empty   '0'..'9' = avatar start   'T' = target
//!   between cells in a row:       '|' = wall    ' ' = passage
//!   between rows:                 '-' = wall    ' ' = passage
//!   '+' corners and the outer frame are decoration; borders are always walls.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::domain::heading::{Heading, Position};
use crate::domain::maze::{Maze, MazeError};
use crate::sim::oracle::GroundTruth;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("layout is empty")]
    Empty,
    #[error("layout needs an odd number of lines, at least 3 (got {0})")]
    BadLineCount(usize),
    #[error("layout lines need an odd width, at least 3 (got {0})")]
    BadWidth(usize),
    #[error("unexpected {ch:?} at line {line}, column {column}")]
    BadChar { ch: char, line: usize, column: usize },
    #[error("avatar {0} appears more than once")]
    DuplicateAvatar(usize),
    #[error("avatar ids must run 0..n without gaps (missing {0})")]
    MissingAvatar(usize),
    #[error("layout has no avatar start")]
    NoAvatar,
    #[error("layout has no target 'T'")]
    MissingTarget,
    #[error("layout has more than one target")]
    DuplicateTarget,
    #[error("no maze named {0:?}")]
    NotFound(String),
    #[error(transparent)]
    Maze(#[from] MazeError),
    #[error("could not read {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
}

/// A parsed maze: geometry, passages, starts and target.
#[derive(Clone, Debug)]
pub struct Layout {
    pub name: String,
    pub width: usize,
    pub height: usize,
    /// Every open boundary, as `(cell, East | South)`.
    pub passages: Vec<(Position, Heading)>,
    /// Start position per avatar id.
    pub starts: Vec<Position>,
    pub target: Position,
}

impl Layout {
    /// Build the hidden, fully resolved maze the oracle answers from.
    pub fn ground_truth(&self) -> Result<GroundTruth, LayoutError> {
        let maze = Maze::new(self.width, self.height, self.starts.len())?;
        let mut truth = GroundTruth::new(maze);
        for pos in truth.maze().positions().collect::<Vec<_>>() {
            for heading in [Heading::East, Heading::South] {
                if self.passages.contains(&(pos, heading)) {
                    truth.open(pos, heading)?;
                } else {
                    truth.wall(pos, heading)?;
                }
            }
        }
        Ok(truth)
    }
}

// ══════════════════════════════════════════════════════════════
// Public API
// ══════════════════════════════════════════════════════════════

/// Resolve a maze by path, `mazes/` file stem, or built-in name.
pub fn find_layout(query: &str, config: &AppConfig) -> Result<Layout, LayoutError> {
    let path = Path::new(query);
    if path.is_file() {
        return load_layout(path);
    }

    if config.mazes_dir.is_dir() {
        for (stem, layout) in load_from_directory(&config.mazes_dir) {
            if stem.eq_ignore_ascii_case(query) {
                return Ok(layout);
            }
        }
    }

    embedded_layouts()
        .into_iter()
        .find(|l| l.name.eq_ignore_ascii_case(query))
        .ok_or_else(|| LayoutError::NotFound(query.to_string()))
}

/// Names of every maze reachable through `find_layout`, directory first.
pub fn list_layouts(config: &AppConfig) -> Vec<String> {
    let mut names: Vec<String> = if config.mazes_dir.is_dir() {
        load_from_directory(&config.mazes_dir).into_iter().map(|(stem, _)| stem).collect()
    } else {
        vec![]
    };
    names.extend(embedded_layouts().into_iter().map(|l| l.name));
    names
}

pub fn load_layout(path: &Path) -> Result<Layout, LayoutError> {
    let content = std::fs::read_to_string(path)
        .map_err(|source| LayoutError::Io { path: path.to_path_buf(), source })?;
    let mut layout = parse_layout(&content)?;
    if layout.name.is_empty() {
        layout.name = path.file_stem().unwrap_or_default().to_string_lossy().to_string();
    }
    Ok(layout)
}

// ══════════════════════════════════════════════════════════════
// Parsing
// ══════════════════════════════════════════════════════════════

pub fn parse_layout(content: &str) -> Result<Layout, LayoutError> {
    let mut name = String::new();
    let mut rows: Vec<Vec<char>> = vec![];

    for line in content.lines() {
        let line = line.trim_end();
        if rows.is_empty() && name.is_empty() && line.starts_with('#') {
            name = line[1..].trim().to_string();
        } else if !(rows.is_empty() && line.is_empty()) {
            rows.push(line.chars().collect());
        }
    }

    while rows.last().is_some_and(|r| r.is_empty()) {
        rows.pop();
    }

    if rows.is_empty() {
        return Err(LayoutError::Empty);
    }
    if rows.len() < 3 || rows.len() % 2 == 0 {
        return Err(LayoutError::BadLineCount(rows.len()));
    }

    let line_width = rows.iter().map(|r| r.len()).max().unwrap_or(0);
    if line_width < 3 || line_width % 2 == 0 {
        return Err(LayoutError::BadWidth(line_width));
    }
    for row in &mut rows {
        row.resize(line_width, ' ');
    }

    // Lines are 1-based in errors, counted from the first lattice line.
    let at = |line: usize, column: usize| rows[line][column];
    let bad = |line: usize, column: usize| LayoutError::BadChar {
        ch: rows[line][column],
        line: line + 1,
        column: column + 1,
    };

    let width = (line_width - 1) / 2;
    let height = (rows.len() - 1) / 2;
    let mut passages = vec![];
    let mut starts: Vec<Option<Position>> = vec![];
    let mut target = None;

    for y in 0..height {
        for x in 0..width {
            let pos = Position::new(x as i32, y as i32);
            let (line, column) = (2 * y + 1, 2 * x + 1);

            match at(line, column) {
                ' ' | '.' => {}
                'T' => {
                    if target.replace(pos).is_some() {
                        return Err(LayoutError::DuplicateTarget);
                    }
                }
                c if c.is_ascii_digit() => {
                    let id = c as usize - '0' as usize;
                    if starts.len() <= id {
                        starts.resize(id + 1, None);
                    }
                    if starts[id].replace(pos).is_some() {
                        return Err(LayoutError::DuplicateAvatar(id));
                    }
                }
                _ => return Err(bad(line, column)),
            }

            if x + 1 < width {
                match at(line, column + 1) {
                    ' ' => passages.push((pos, Heading::East)),
                    '|' => {}
                    _ => return Err(bad(line, column + 1)),
                }
            }
            if y + 1 < height {
                match at(line + 1, column) {
                    ' ' => passages.push((pos, Heading::South)),
                    '-' => {}
                    _ => return Err(bad(line + 1, column)),
                }
            }
        }
    }

    if starts.is_empty() {
        return Err(LayoutError::NoAvatar);
    }
    let starts = starts
        .into_iter()
        .enumerate()
        .map(|(id, s)| s.ok_or(LayoutError::MissingAvatar(id)))
        .collect::<Result<Vec<_>, _>>()?;
    let target = target.ok_or(LayoutError::MissingTarget)?;

    Ok(Layout { name, width, height, passages, starts, target })
}

// ══════════════════════════════════════════════════════════════
// Directory loading (individual .txt files)
// ══════════════════════════════════════════════════════════════

/// Every parseable `.txt` layout in `dir`, keyed by file stem, sorted.
/// Files that fail to parse are skipped with a warning.
pub fn load_from_directory(dir: &Path) -> Vec<(String, Layout)> {
    let mut results = vec![];

    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) => {
            debug!(dir = %dir.display(), "cannot list maze directory: {e}");
            return results;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().map_or(false, |e| e == "txt") {
            match load_layout(&path) {
                Ok(layout) => {
                    let stem = path.file_stem()
                        .unwrap_or_default()
                        .to_string_lossy()
                        .to_string();
                    results.push((stem, layout));
                }
                Err(e) => warn!("skipping {}: {e}", path.display()),
            }
        }
    }

    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}

// ══════════════════════════════════════════════════════════════
// Embedded layouts
// ══════════════════════════════════════════════════════════════

pub fn embedded_layouts() -> Vec<Layout> {
    EMBEDDED
        .iter()
        .filter_map(|(name, rows)| match parse_layout(&rows.join("\n")) {
            Ok(mut layout) => {
                layout.name = name.to_string();
                Some(layout)
            }
            Err(e) => {
                warn!("built-in maze {name} is malformed: {e}");
                None
            }
        })
        .collect()
}

const EMBEDDED: &[(&str, &[&str])] = &[
    ("corner", &[
        "+-+-+-+",
        "|   |T|",
        "+ + + +",
        "| |   |",
        "+ + +-+",
        "|0|   |",
        "+-+-+-+",
    ]),
    ("gallery", &[
        "+-+-+-+-+-+-+",
        "| |        T|",
        "+ +-+ +-+-+ +",
        "|   | | |   |",
        "+-+ + + + + +",
        "| | |   | | |",
        "+ + +-+-+ + +",
        "|0        |1|",
        "+-+-+-+-+-+-+",
    ]),
];

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
