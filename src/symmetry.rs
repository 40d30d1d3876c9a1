/// Dihedral subgroup a tile is invariant under, named after the letter shape
/// that has the same symmetry.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Symmetry {
    X,
    L,
    T,
    I,
    Slash,
}

/// One row per canonical form: the form reached by each of the 8 dihedral
/// operations. Columns 0..4 are rotations by 0, 1, 2, 3 quarter turns; 4..8
/// are the same rotations followed by a reflection.
pub type ActionRow = [usize; 8];

impl Symmetry {
    /// Parses the catalog token. A missing token means `X`.
    pub fn parse(token: Option<&str>) -> Option<Symmetry> {
        match token {
            None => Some(Symmetry::X),
            Some("X") => Some(Symmetry::X),
            Some("L") => Some(Symmetry::L),
            Some("T") => Some(Symmetry::T),
            Some("I") => Some(Symmetry::I),
            Some("Slash") => Some(Symmetry::Slash),
            Some(_) => None,
        }
    }

    /// Number of distinct canonical forms.
    pub fn cardinality(self) -> usize {
        match self {
            Symmetry::X => 1,
            Symmetry::L | Symmetry::T => 4,
            Symmetry::I | Symmetry::Slash => 2,
        }
    }

    /// Form reached by a quarter turn.
    pub fn rotate(self, i: usize) -> usize {
        match self {
            Symmetry::X => i,
            Symmetry::L | Symmetry::T => (i + 1) % 4,
            Symmetry::I | Symmetry::Slash => 1 - i,
        }
    }

    /// Form reached by a mirror.
    pub fn reflect(self, i: usize) -> usize {
        match self {
            Symmetry::X | Symmetry::I => i,
            Symmetry::L => {
                if i % 2 == 0 {
                    i + 1
                } else {
                    i - 1
                }
            }
            Symmetry::T => {
                if i % 2 == 0 {
                    i
                } else {
                    4 - i
                }
            }
            Symmetry::Slash => 1 - i,
        }
    }

    /// Action rows for every canonical form, offset by `first`, the id of the
    /// tile's first variant.
    pub fn actions(self, first: usize) -> Vec<ActionRow> {
        (0..self.cardinality())
            .map(|t| {
                let a = |i| self.rotate(i);
                let b = |i| self.reflect(i);

                let row = [
                    t,
                    a(t),
                    a(a(t)),
                    a(a(a(t))),
                    b(t),
                    b(a(t)),
                    b(a(a(t))),
                    b(a(a(a(t)))),
                ];

                row.map(|form| form + first)
            })
            .collect()
    }
}
