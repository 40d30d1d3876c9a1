use crate::bitset::{BitSet, BitSetIterator};
use crate::rules::Rules;
use crate::OPPOSITE;
use tracing::info;

/// Solver state for one grid position.
#[derive(Debug, Clone, PartialEq)]
struct Cell {
    active: BitSet,
    /// `support[variant][direction]`: possible neighbors still supporting
    /// `variant`, counted on the side the propagator reaches it from.
    support: Vec<[i32; 4]>,
    remaining: usize,
    sum_of_weights: f64,
    sum_of_weight_log_weights: f64,
    entropy: f64,
}

/// Arena of per-cell possibility sets and their incrementally maintained
/// statistics. [`Wave::ban`] is the only writer of the statistics.
#[derive(Debug, Clone)]
pub struct Wave {
    pub width: isize,
    pub height: isize,
    cells: Vec<Cell>,
    weights: Vec<f64>,
    weight_log_weights: Vec<f64>,
    /// Every cell's state right after a reset.
    start: Cell,
    /// Bans whose consequences have not been propagated yet.
    stack: Vec<(usize, usize)>,
}

impl Wave {
    pub fn new(width: usize, height: usize, weights: &[f64], rules: &Rules) -> Wave {
        let count = weights.len();
        debug_assert_eq!(count, rules.variant_count());

        let weight_log_weights: Vec<f64> = weights
            .iter()
            .map(|&w| if w > 0.0 { w * w.ln() } else { 0.0 })
            .collect();

        let sum_of_weights: f64 = weights.iter().sum();
        let sum_of_weight_log_weights: f64 = weight_log_weights.iter().sum();
        let entropy = if sum_of_weights > 0.0 {
            sum_of_weights.ln() - sum_of_weight_log_weights / sum_of_weights
        } else {
            0.0
        };

        let support = (0..count)
            .map(|t| {
                let mut counts = [0; 4];
                for (d, count) in counts.iter_mut().enumerate() {
                    *count = rules.allowed(OPPOSITE[d], t).len() as i32;
                }
                counts
            })
            .collect();

        let start = Cell {
            active: BitSet::full(count),
            support,
            remaining: count,
            sum_of_weights,
            sum_of_weight_log_weights,
            entropy,
        };

        Wave {
            width: width as isize,
            height: height as isize,
            cells: vec![start.clone(); width * height],
            weights: weights.to_vec(),
            weight_log_weights,
            start,
            stack: Vec::with_capacity(width * height),
        }
    }

    /// Makes every variant possible everywhere again, reusing the buffers.
    pub fn reset(&mut self) {
        for cell in self.cells.iter_mut() {
            cell.clone_from(&self.start);
        }
        self.stack.clear();
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn variant_count(&self) -> usize {
        self.weights.len()
    }

    pub fn weight(&self, variant: usize) -> f64 {
        self.weights[variant]
    }

    pub fn remaining(&self, cell: usize) -> usize {
        self.cells[cell].remaining
    }

    pub fn entropy(&self, cell: usize) -> f64 {
        self.cells[cell].entropy
    }

    pub fn is_possible(&self, cell: usize, variant: usize) -> bool {
        self.cells[cell].active.get(variant)
    }

    pub(crate) fn possible(&self, cell: usize) -> BitSetIterator {
        self.cells[cell].active.iter()
    }

    #[cfg(test)]
    pub(crate) fn active(&self, cell: usize) -> &BitSet {
        &self.cells[cell].active
    }

    /// The only variant left at `cell`, if exactly one is.
    pub fn single(&self, cell: usize) -> Option<usize> {
        let cell = &self.cells[cell];
        if cell.remaining == 1 {
            cell.active.iter().next()
        } else {
            None
        }
    }

    pub fn support(&self, cell: usize, variant: usize, direction: usize) -> i32 {
        self.cells[cell].support[variant][direction]
    }

    /// Drops one supporter of `variant` at `cell`. Returns true exactly when
    /// the last supporter goes.
    pub fn decrement(&mut self, cell: usize, variant: usize, direction: usize) -> bool {
        let count = &mut self.cells[cell].support[variant][direction];
        *count -= 1;
        *count == 0
    }

    /// Rules `variant` out at `cell`, records the ban for propagation and
    /// updates the cell's statistics in place. Returns false if the variant
    /// was already gone.
    pub fn ban(&mut self, cell_index: usize, variant: usize) -> bool {
        let cell = &mut self.cells[cell_index];

        if !cell.active.remove(variant) {
            return false;
        }

        cell.support[variant] = [0; 4];
        self.stack.push((cell_index, variant));

        cell.remaining -= 1;
        debug_assert_eq!(cell.remaining, cell.active.pop_cnt());

        // take out the old sums' term before they change
        let sum = cell.sum_of_weights;
        if sum > 0.0 {
            cell.entropy += cell.sum_of_weight_log_weights / sum - sum.ln();
        }

        cell.sum_of_weights -= self.weights[variant];
        cell.sum_of_weight_log_weights -= self.weight_log_weights[variant];

        let sum = cell.sum_of_weights;
        if cell.remaining > 0 && sum > 0.0 {
            cell.entropy -= cell.sum_of_weight_log_weights / sum - sum.ln();
        } else {
            cell.entropy = 0.0;
        }

        true
    }

    pub(crate) fn pop(&mut self) -> Option<(usize, usize)> {
        self.stack.pop()
    }

    pub fn is_contradiction(&self) -> bool {
        self.cells.iter().any(|cell| cell.remaining == 0)
    }

    pub fn is_done(&self) -> bool {
        self.cells.iter().all(|cell| cell.remaining == 1)
    }

    /// One text row per grid row, each cell showing its remaining count.
    pub fn rows(&self) -> Vec<String> {
        self.cells
            .chunks(self.width.max(1) as usize)
            .map(|row| {
                row.iter()
                    .map(|cell| format!("{:4}", cell.remaining))
                    .collect::<String>()
            })
            .collect()
    }

    pub fn print_wave(&self) {
        info!("remaining variants per cell:");
        for row in self.rows() {
            info!("    {row}");
        }
    }

    /// Entropy of `cell` computed from its bitset alone.
    #[cfg(test)]
    pub(crate) fn entropy_from_scratch(&self, cell: usize) -> f64 {
        let (sum, sum_log) = self.cells[cell].active.iter().fold((0.0f64, 0.0f64), |(s, l), t| {
            (s + self.weights[t], l + self.weight_log_weights[t])
        });

        if sum > 0.0 {
            sum.ln() - sum_log / sum
        } else {
            0.0
        }
    }
}
