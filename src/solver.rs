//! Observe / propagate loop over a [`Wave`].
//!
//! Each step picks the undecided cell with the lowest entropy, collapses it
//! to one weighted-random variant and propagates the bans until no support
//! counter reaches zero any more. The only randomness comes from the seeded
//! generator, drawn in scan order (tie-break noise first, then the sample),
//! so a non-zero seed reproduces a run exactly.

use crate::boundary::Boundary;
use crate::error::{Error, Result};
use crate::rules::Rules;
use crate::wave::Wave;
use crate::OPPOSITE;
use instant::Instant;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

/// How a run ended.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// Every cell holds exactly one variant.
    Complete,
    /// Some cell ran out of variants.
    Contradiction,
    /// The iteration limit was reached first.
    InProgress,
}

/// Result of scanning for the next cell to collapse.
enum Selection {
    /// Lowest-entropy cell with more than one variant left.
    Cell(usize),
    /// Every cell is decided.
    Done,
    /// Some cell has nothing left.
    Contradiction,
}

#[derive(Debug, Clone)]
pub struct Solver {
    wave: Wave,
    rules: Rules,
    boundary: Boundary,
    observed: Vec<Option<usize>>,
}

impl Solver {
    pub fn new(
        rules: Rules,
        weights: &[f64],
        width: usize,
        height: usize,
        boundary: Boundary,
    ) -> Result<Solver> {
        if width == 0 || height == 0 {
            return Err(Error::EmptyGrid);
        }

        Ok(Solver {
            wave: Wave::new(width, height, weights, &rules),
            rules,
            boundary,
            observed: vec![None; width * height],
        })
    }

    pub fn wave(&self) -> &Wave {
        &self.wave
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn boundary(&self) -> Boundary {
        self.boundary
    }

    /// Variant chosen per cell by the last completed run.
    pub fn observed(&self) -> &[Option<usize>] {
        &self.observed
    }

    /// Resets the wave, removes variants that can never be supported, then
    /// pins each `(cell, variant)` in `fixed` in order, propagating after each.
    pub fn clear(&mut self, fixed: &[(usize, usize)]) {
        self.wave.reset();
        for observed in self.observed.iter_mut() {
            *observed = None;
        }

        self.prune();

        for &(cell, variant) in fixed {
            self.fix(cell, variant);
        }
    }

    /// Runs up to `limit` observe/propagate pairs (`0` means no limit) on a
    /// freshly cleared wave. A `seed` of `0` draws from system entropy.
    pub fn run(&mut self, seed: u64, limit: usize, fixed: &[(usize, usize)]) -> Outcome {
        let start = Instant::now();

        self.clear(fixed);

        let mut rng = if seed == 0 {
            StdRng::from_entropy()
        } else {
            StdRng::seed_from_u64(seed)
        };

        let mut iterations = 0;
        let outcome = loop {
            if limit != 0 && iterations >= limit {
                break Outcome::InProgress;
            }

            if let Some(outcome) = self.observe(&mut rng) {
                break outcome;
            }

            self.propagate();
            iterations += 1;
        };

        debug!(
            "seed: {seed}, iterations: {iterations}, outcome: {outcome:?}, elapsed: {}ms",
            Instant::now().duration_since(start).as_millis()
        );

        outcome
    }

    /// Bans every variant at `cell` except `variant` and propagates.
    pub fn fix(&mut self, cell: usize, variant: usize) {
        let others: Vec<usize> = self.wave.possible(cell).filter(|&t| t != variant).collect();
        for t in others {
            self.wave.ban(cell, t);
        }

        self.propagate();
    }

    /// Bans variants with no supporter on a side where a neighbor exists.
    fn prune(&mut self) {
        let (width, height) = (self.wave.width, self.wave.height);

        for cell in 0..self.wave.len() {
            let unsupported: Vec<usize> = self
                .wave
                .possible(cell)
                .filter(|&t| {
                    (0..4).any(|d| {
                        self.wave.support(cell, t, d) == 0
                            && self
                                .boundary
                                .neighbor(cell, OPPOSITE[d], width, height)
                                .is_some()
                    })
                })
                .collect();

            for t in unsupported {
                self.wave.ban(cell, t);
            }
        }

        self.propagate();
    }

    /// One observation. `None` means a cell was collapsed and the caller
    /// should propagate; otherwise the run is over.
    fn observe<R: Rng>(&mut self, rng: &mut R) -> Option<Outcome> {
        let cell = match self.next_unobserved_cell(rng) {
            Selection::Contradiction => return Some(Outcome::Contradiction),
            Selection::Done => {
                for (cell, observed) in self.observed.iter_mut().enumerate() {
                    *observed = self.wave.single(cell);
                }
                return Some(Outcome::Complete);
            }
            Selection::Cell(cell) => cell,
        };

        let candidates: Vec<usize> = self.wave.possible(cell).collect();
        let mut distribution: Vec<f64> = candidates.iter().map(|&t| self.wave.weight(t)).collect();

        let chosen = candidates[weighted_index(&mut distribution, rng.gen::<f64>())];
        trace!("observe cell: {cell}, variant: {chosen}, of {}", candidates.len());

        for t in candidates {
            if t != chosen {
                self.wave.ban(cell, t);
            }
        }

        None
    }

    fn next_unobserved_cell<R: Rng>(&self, rng: &mut R) -> Selection {
        let (width, height) = (self.wave.width, self.wave.height);
        let mut min = 1e3;
        let mut argmin = None;

        for cell in 0..self.wave.len() {
            let (x, y) = (cell as isize % width, cell as isize / width);
            if self.boundary.on_boundary(x, y, width, height) {
                continue;
            }

            let remaining = self.wave.remaining(cell);
            if remaining == 0 {
                return Selection::Contradiction;
            }

            let entropy = self.wave.entropy(cell);
            if remaining > 1 && entropy <= min {
                let noise = 1e-6 * rng.gen::<f64>();
                if entropy + noise < min {
                    min = entropy + noise;
                    argmin = Some(cell);
                }
            }
        }

        match argmin {
            Some(cell) => Selection::Cell(cell),
            None => Selection::Done,
        }
    }

    /// Drains the ban stack, banning every variant whose last supporter in
    /// some direction went away.
    pub fn propagate(&mut self) {
        let (width, height) = (self.wave.width, self.wave.height);

        while let Some((i1, t1)) = self.wave.pop() {
            for d in 0..4 {
                let i2 = match self.boundary.neighbor(i1, d, width, height) {
                    Some(i2) => i2,
                    None => continue,
                };

                for &t2 in self.rules.allowed(d, t1) {
                    if self.wave.decrement(i2, t2, d) {
                        self.wave.ban(i2, t2);
                    }
                }
            }
        }
    }
}

/// Index drawn from `distribution` by a uniform `r` in `[0, 1)`. The
/// distribution is normalized in place; an all-zero one is treated as
/// uniform.
pub(crate) fn weighted_index(distribution: &mut [f64], r: f64) -> usize {
    let mut sum: f64 = distribution.iter().sum();

    if sum == 0.0 {
        for weight in distribution.iter_mut() {
            *weight = 1.0;
        }
        sum = distribution.len() as f64;
    }

    for weight in distribution.iter_mut() {
        *weight /= sum;
    }

    let mut x = 0.0;
    for (i, weight) in distribution.iter().enumerate() {
        x += weight;
        if *weight > 0.0 && r <= x {
            return i;
        }
    }

    // rounding left the cumulative sum just short of r
    distribution
        .iter()
        .rposition(|&weight| weight > 0.0)
        .unwrap_or(0)
}
