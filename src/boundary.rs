use crate::DIRECTIONS;

/// Grid topology at the edges.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum Boundary {
    /// Cells past the edge do not exist.
    #[default]
    Bounded,
    /// Edges wrap around, making the grid a torus.
    Periodic,
}

impl Boundary {
    pub fn new(periodic: bool) -> Boundary {
        if periodic {
            Boundary::Periodic
        } else {
            Boundary::Bounded
        }
    }

    /// Whether `(x, y)` falls off a bounded grid. Nothing is ever on the
    /// boundary of a periodic grid.
    pub fn on_boundary(self, x: isize, y: isize, width: isize, height: isize) -> bool {
        self == Boundary::Bounded && (x < 0 || y < 0 || x >= width || y >= height)
    }

    /// Index of the cell one step from `index` in `direction`, wrapping when
    /// periodic.
    pub fn neighbor(
        self,
        index: usize,
        direction: usize,
        width: isize,
        height: isize,
    ) -> Option<usize> {
        let (dx, dy) = DIRECTIONS[direction];
        let mut x = index as isize % width + dx;
        let mut y = index as isize / width + dy;

        if self.on_boundary(x, y, width, height) {
            return None;
        }

        if x < 0 {
            x += width;
        } else if x >= width {
            x -= width;
        }

        if y < 0 {
            y += height;
        } else if y >= height {
            y -= height;
        }

        Some((x + y * width) as usize)
    }
}
