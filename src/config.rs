//! Declarative board configuration
//!
//! Boards are described by a small JSON document:
//!
//! ```json
//! { "type": "roller", "dimension": { "count": 25 },
//!   "border": { "top": 1, "left": 1, "width": 4, "height": 4 } }
//! ```
//!
//! The document is deserialized into a permissive raw form and then validated
//! into a [`BoardConfig`], so a missing or out-of-range field is reported by
//! name instead of producing broken geometry.

use serde::Deserialize;

use crate::consts::MAX_VERTICES;
use crate::error::ConfigError;
use crate::exact_sqrt;

/// Classic 15-puzzle
pub const SLIDER_SAMPLE: &str = r#"{
    "type": "slider",
    "dimension": { "count": 15 }
}"#;

/// 5x5 roller with a border around the inner 4x4
pub const ROLLER_SAMPLE: &str = r#"{
    "type": "roller",
    "dimension": { "count": 25 },
    "border": { "top": 1, "left": 1, "width": 4, "height": 4 }
}"#;

/// Two rows by two columns of hex groups
pub const HEX_SPINNER_SAMPLE: &str = r#"{
    "type": "HexSpinner",
    "dimension": { "rows": 2, "columns": 2 }
}"#;

/// Puzzle variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PuzzleKind {
    Slider,
    Roller,
    HexSpinner,
}

impl PuzzleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PuzzleKind::Slider => "slider",
            PuzzleKind::Roller => "roller",
            PuzzleKind::HexSpinner => "HexSpinner",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "slider" => Some(PuzzleKind::Slider),
            "roller" => Some(PuzzleKind::Roller),
            "hexspinner" | "hex_spinner" | "hex" => Some(PuzzleKind::HexSpinner),
            _ => None,
        }
    }

    /// Built-in sample configuration for this variant
    pub fn sample(&self) -> &'static str {
        match self {
            PuzzleKind::Slider => SLIDER_SAMPLE,
            PuzzleKind::Roller => ROLLER_SAMPLE,
            PuzzleKind::HexSpinner => HEX_SPINNER_SAMPLE,
        }
    }
}

/// Board size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    /// Number of tiles on a square grid (the slider counts tiles without the blank)
    Count(u32),
    /// Hex boards are sized in anchor groups
    Groups { rows: u32, columns: u32 },
}

/// Border decoration placement, in cell units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Border {
    pub top: u32,
    pub left: u32,
    pub width: u32,
    pub height: u32,
}

/// A validated board configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    pub kind: PuzzleKind,
    pub dimension: Dimension,
    pub border: Option<Border>,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(rename = "type")]
    kind: Option<String>,
    dimension: Option<RawDimension>,
    border: Option<RawBorder>,
}

#[derive(Debug, Deserialize)]
struct RawDimension {
    count: Option<i64>,
    rows: Option<i64>,
    columns: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RawBorder {
    top: Option<i64>,
    left: Option<i64>,
    width: Option<i64>,
    height: Option<i64>,
}

fn required(value: Option<i64>, field: &'static str, min: i64) -> Result<u32, ConfigError> {
    let value = value.ok_or(ConfigError::MissingField(field))?;
    if value < min || value > u16::MAX as i64 {
        return Err(ConfigError::invalid(
            field,
            format!("{value} is out of range (minimum {min})"),
        ));
    }
    Ok(value as u32)
}

impl BoardConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_str(json)?;

        let kind_str = raw.kind.ok_or(ConfigError::MissingField("type"))?;
        let kind = PuzzleKind::from_str(&kind_str)
            .ok_or_else(|| ConfigError::invalid("type", format!("unknown puzzle type '{kind_str}'")))?;

        let dim = raw.dimension.ok_or(ConfigError::MissingField("dimension"))?;
        let dimension = match kind {
            PuzzleKind::Slider => {
                let count = required(dim.count, "dimension.count", 3)?;
                if exact_sqrt(count + 1).is_none() {
                    return Err(ConfigError::invalid(
                        "dimension.count",
                        format!("{count} tiles plus the blank do not form a square grid"),
                    ));
                }
                Dimension::Count(count)
            }
            PuzzleKind::Roller => {
                let count = required(dim.count, "dimension.count", 4)?;
                if exact_sqrt(count).is_none() {
                    return Err(ConfigError::invalid(
                        "dimension.count",
                        format!("{count} tiles do not form a square grid"),
                    ));
                }
                Dimension::Count(count)
            }
            PuzzleKind::HexSpinner => Dimension::Groups {
                rows: required(dim.rows, "dimension.rows", 1)?,
                columns: required(dim.columns, "dimension.columns", 1)?,
            },
        };

        let border = match raw.border {
            Some(b) => Some(Border {
                top: required(b.top, "border.top", 0)?,
                left: required(b.left, "border.left", 0)?,
                width: required(b.width, "border.width", 1)?,
                height: required(b.height, "border.height", 1)?,
            }),
            None => None,
        };

        let config = Self {
            kind,
            dimension,
            border,
        };
        config.validate()?;
        log::debug!("Parsed {} config: {:?}", kind.as_str(), config);
        Ok(config)
    }

    /// Check that the board fits one vertex buffer with 16-bit indices
    pub fn validate(&self) -> Result<(), ConfigError> {
        let field = match self.dimension {
            Dimension::Count(_) => "dimension.count",
            Dimension::Groups { .. } => "dimension",
        };
        match self.vertex_count() {
            Some(n) if n <= MAX_VERTICES => Ok(()),
            Some(n) => Err(ConfigError::invalid(
                field,
                format!("{n} vertices exceed the limit of {MAX_VERTICES}"),
            )),
            None => Err(ConfigError::invalid(field, "board size overflows")),
        }
    }

    /// Vertices the tile buffer needs, `None` on overflow
    pub fn vertex_count(&self) -> Option<u64> {
        let per_tile = match self.dimension {
            Dimension::Count(_) => 4,
            Dimension::Groups { .. } => 3,
        };
        self.checked_tile_count()?.checked_mul(per_tile)
    }

    fn checked_tile_count(&self) -> Option<u64> {
        match (self.kind, self.dimension) {
            (PuzzleKind::Slider, Dimension::Count(count)) => u64::from(count).checked_add(1),
            (_, Dimension::Count(count)) => Some(u64::from(count)),
            (_, Dimension::Groups { rows, columns }) => u64::from(rows)
                .checked_mul(2)?
                .checked_mul(u64::from(columns))?
                .checked_mul(3),
        }
    }

    /// Built-in sample for a puzzle variant
    pub fn preset(kind: PuzzleKind) -> Self {
        match kind {
            PuzzleKind::Slider => Self {
                kind,
                dimension: Dimension::Count(15),
                border: None,
            },
            PuzzleKind::Roller => Self {
                kind,
                dimension: Dimension::Count(25),
                border: Some(Border {
                    top: 1,
                    left: 1,
                    width: 4,
                    height: 4,
                }),
            },
            PuzzleKind::HexSpinner => Self {
                kind,
                dimension: Dimension::Groups {
                    rows: 2,
                    columns: 2,
                },
                border: None,
            },
        }
    }

    /// Number of tiles the board allocates (including the slider's blank)
    ///
    /// Saturates for configurations that [`validate`](Self::validate) rejects.
    pub fn tile_count(&self) -> usize {
        self.checked_tile_count()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(usize::MAX)
    }

    /// Cells per side of the square cell grid used for borders and markers
    pub fn grid_side(&self) -> u32 {
        ((self.tile_count() as f64).sqrt().floor() as u32).max(1)
    }
}
