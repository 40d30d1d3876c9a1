//! Error types for catalog compilation and grid queries.

use std::fmt;

/// Errors arising while compiling a catalog or addressing the grid.
///
/// Everything except [`Error::OutOfBounds`] is a configuration problem and is
/// reported at build (or seed) time. Contradictions during solving are not
/// errors; see [`crate::Outcome`].
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A neighbor rule, subset or seed names a tile the catalog does not have.
    UnknownTile {
        /// The name as written.
        name: String,
    },
    /// The requested subset does not exist in the catalog.
    UnknownSubset {
        /// The subset name as written.
        name: String,
    },
    /// A tile's symmetry token is not one of `X`, `L`, `T`, `I`, `Slash`.
    BadSymmetry {
        /// The tile carrying the token.
        tile: String,
        /// The token as written.
        symmetry: String,
    },
    /// A neighbor rule rotates a tile past its symmetry cardinality.
    BadRotation {
        /// The rule side as written, e.g. `"corner 7"`.
        rule: String,
        /// Number of canonical forms the tile has.
        cardinality: usize,
    },
    /// A tile weight is negative or not finite.
    BadWeight {
        /// The tile carrying the weight.
        tile: String,
        /// The weight as written.
        weight: f64,
    },
    /// Grid dimensions must both be positive.
    EmptyGrid,
    /// A coordinate lies outside the grid.
    OutOfBounds {
        /// Offending x.
        x: usize,
        /// Offending y.
        y: usize,
        /// Grid width.
        width: usize,
        /// Grid height.
        height: usize,
    },
}

impl Error {
    /// True for the configuration family, false for index errors.
    pub fn is_configuration(&self) -> bool {
        !matches!(self, Self::OutOfBounds { .. })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownTile { name } => write!(f, "unknown tile {name:?}"),
            Self::UnknownSubset { name } => write!(f, "unknown subset {name:?}"),
            Self::BadSymmetry { tile, symmetry } => {
                write!(f, "tile {tile:?} has unrecognized symmetry {symmetry:?}")
            }
            Self::BadRotation { rule, cardinality } => write!(
                f,
                "rule {rule:?} uses a rotation outside 0..{cardinality}"
            ),
            Self::BadWeight { tile, weight } => {
                write!(f, "tile {tile:?} has invalid weight {weight}")
            }
            Self::EmptyGrid => write!(f, "grid must have at least one cell"),
            Self::OutOfBounds {
                x,
                y,
                width,
                height,
            } => write!(f, "coordinate ({x}, {y}) outside {width}x{height} grid"),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
