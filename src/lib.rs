mod bitset;
pub mod boundary;
pub mod catalog;
mod error;
mod model;
pub mod rules;
pub mod solver;
pub mod symmetry;
mod wave;

/// Grid steps per direction index: -X, +Y, +X, -Y.
pub(crate) const DIRECTIONS: [(isize, isize); 4] = [(-1, 0), (0, 1), (1, 0), (0, -1)];
pub(crate) const OPPOSITE: [usize; 4] = [2, 3, 0, 1];

pub use boundary::Boundary;
pub use catalog::rotation_degrees;
pub use catalog::split_label;
pub use catalog::Catalog;
pub use catalog::NeighborRule;
pub use catalog::SubsetSpec;
pub use catalog::TileCatalog;
pub use catalog::TileSpec;
pub use catalog::Variant;
pub use error::Error;
pub use error::Result;
pub use model::Model;
pub use rules::Rules;
pub use solver::Outcome;
pub use solver::Solver;
pub use symmetry::Symmetry;
pub use wave::Wave;
