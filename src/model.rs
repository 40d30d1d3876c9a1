use crate::boundary::Boundary;
use crate::catalog::{Catalog, TileCatalog, Variant};
use crate::error::{Error, Result};
use crate::rules::Rules;
use crate::solver::{Outcome, Solver};
use tracing::info;

/// A catalog compiled for one grid size, ready to be solved repeatedly.
#[derive(Debug, Clone)]
pub struct Model {
    tiles: TileCatalog,
    solver: Solver,
    width: usize,
    height: usize,
    /// Pinned `(cell, variant)` pairs, in scan order.
    pinned: Vec<(usize, usize)>,
}

impl Model {
    /// Expands and compiles `catalog`, keeping only the tiles of
    /// `subset_name` unless it is empty.
    pub fn build(
        catalog: &Catalog,
        subset_name: &str,
        width: usize,
        height: usize,
        periodic: bool,
    ) -> Result<Model> {
        let subset = catalog.subset(subset_name)?;
        let tiles = TileCatalog::new(catalog, &subset)?;
        let rules = Rules::new(&tiles, &catalog.neighbors)?;
        let mut solver = Solver::new(
            rules,
            &tiles.weights(),
            width,
            height,
            Boundary::new(periodic),
        )?;
        solver.clear(&[]);

        info!(
            "model: {width}x{height}, periodic: {periodic}, variants: {}, subset: {subset_name:?}",
            tiles.len()
        );

        Ok(Model {
            tiles,
            solver,
            width,
            height,
            pinned: Vec::new(),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tiles(&self) -> &TileCatalog {
        &self.tiles
    }

    pub fn rules(&self) -> &Rules {
        self.solver.rules()
    }

    pub fn solver(&self) -> &Solver {
        &self.solver
    }

    /// One full solve attempt with the pinned tiles re-applied. Returns false
    /// only on a contradiction; hitting `limit` first still returns true.
    pub fn run_wfc(&mut self, seed: u64, limit: usize) -> bool {
        self.run(seed, limit) != Outcome::Contradiction
    }

    pub fn run(&mut self, seed: u64, limit: usize) -> Outcome {
        self.solver.run(seed, limit, &self.pinned)
    }

    /// Pins tiles before solving. Every name is resolved before anything is
    /// applied; a later assignment to the same cell replaces an earlier one.
    /// The wave is reset with all pins applied in scan order, and every later
    /// [`Model::run_wfc`] applies them again after its own reset.
    pub fn apply_seed(&mut self, assignments: &[(usize, usize, &str)]) -> Result<()> {
        let mut resolved = Vec::with_capacity(assignments.len());

        for &(x, y, name) in assignments {
            let cell = self.index(x, y)?;
            let variant = self.tiles.find(name).ok_or_else(|| Error::UnknownTile {
                name: name.to_string(),
            })?;
            resolved.push((cell, variant));
        }

        for (cell, variant) in resolved {
            self.pinned.retain(|&(pinned, _)| pinned != cell);
            self.pinned.push((cell, variant));
        }
        self.pinned.sort_by_key(|&(cell, _)| cell);

        self.solver.clear(&self.pinned);

        Ok(())
    }

    pub fn clear_seed(&mut self) {
        self.pinned.clear();
        self.solver.clear(&self.pinned);
    }

    /// Label of the only variant left at `(x, y)`; `None` while undecided or
    /// after a contradiction there.
    pub fn get_sample(&self, x: usize, y: usize) -> Result<Option<&str>> {
        let cell = self.index(x, y)?;
        Ok(self
            .solver
            .wave()
            .single(cell)
            .map(|t| self.tiles.variant(t).label.as_str()))
    }

    /// Variants still possible at `(x, y)`.
    pub fn possible(&self, x: usize, y: usize) -> Result<Vec<&Variant>> {
        let cell = self.index(x, y)?;
        Ok(self
            .solver
            .wave()
            .possible(cell)
            .map(|t| self.tiles.variant(t))
            .collect())
    }

    /// Every cell's sample in row-major order.
    pub fn render(&self) -> Vec<Option<&str>> {
        let wave = self.solver.wave();
        (0..wave.len())
            .map(|cell| wave.single(cell).map(|t| self.tiles.variant(t).label.as_str()))
            .collect()
    }

    pub fn print_wave(&self) {
        self.solver.wave().print_wave();
    }

    fn index(&self, x: usize, y: usize) -> Result<usize> {
        if x >= self.width || y >= self.height {
            return Err(Error::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }

        Ok(x + y * self.width)
    }
}
