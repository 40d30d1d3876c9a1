use crate::catalog::{Lookup, NeighborRule, TileCatalog};
use crate::error::{Error, Result};
use crate::OPPOSITE;
use tracing::{debug, info};

/// Compiled propagator: `ruleset[direction][variant]` lists, in ascending
/// order, the variants allowed as that variant's neighbor in `direction`.
///
/// Directions follow [`crate::DIRECTIONS`]: -X, +Y, +X, -Y.
#[derive(Clone, Debug, PartialEq)]
pub struct Rules {
    pub(crate) ruleset: [Vec<Vec<usize>>; 4],
}

impl Rules {
    /// Compiles neighbor rules against an expanded catalog. Rules touching a
    /// tile the subset filtered out are skipped.
    pub fn new(tiles: &TileCatalog, neighbors: &[NeighborRule]) -> Result<Rules> {
        let count = tiles.len();
        let mut dense = [
            vec![vec![false; count]; count],
            vec![vec![false; count]; count],
            vec![vec![false; count]; count],
            vec![vec![false; count]; count],
        ];

        let mut skipped = 0;

        for rule in neighbors {
            let (left, right) = match (resolve(tiles, &rule.left)?, resolve(tiles, &rule.right)?) {
                (Some(left), Some(right)) => (left, right),
                _ => {
                    skipped += 1;
                    continue;
                }
            };

            let down = tiles.action(left, 1);
            let up = tiles.action(right, 1);
            let act = |t, op| tiles.action(t, op);

            // the rule, mirrored top-to-bottom, turned half way, and both
            dense[0][right][left] = true;
            dense[0][act(right, 6)][act(left, 6)] = true;
            dense[0][act(left, 4)][act(right, 4)] = true;
            dense[0][act(left, 2)][act(right, 2)] = true;

            dense[1][up][down] = true;
            dense[1][act(down, 6)][act(up, 6)] = true;
            dense[1][act(up, 4)][act(down, 4)] = true;
            dense[1][act(down, 2)][act(up, 2)] = true;
        }

        for t2 in 0..count {
            for t1 in 0..count {
                dense[2][t2][t1] = dense[0][t1][t2];
                dense[3][t2][t1] = dense[1][t1][t2];
            }
        }

        let ruleset: [Vec<Vec<usize>>; 4] = dense.map(|table| {
            table
                .iter()
                .map(|row| {
                    row.iter()
                        .enumerate()
                        .filter(|(_, allowed)| **allowed)
                        .map(|(t2, _)| t2)
                        .collect()
                })
                .collect()
        });

        let rules = Rules { ruleset };

        info!(
            "compiled {} rules over {count} variants ({skipped} skipped), {} adjacencies",
            neighbors.len() - skipped,
            rules.adjacency_count()
        );

        Ok(rules)
    }

    /// Variants allowed next to `variant` in `direction`.
    pub fn allowed(&self, direction: usize, variant: usize) -> &[usize] {
        &self.ruleset[direction][variant]
    }

    pub fn variant_count(&self) -> usize {
        self.ruleset[0].len()
    }

    pub fn adjacency_count(&self) -> usize {
        self.ruleset
            .iter()
            .flat_map(|table| table.iter())
            .map(|allowed| allowed.len())
            .sum()
    }

    /// Whether `t2 ∈ table[d][t1] ⇔ t1 ∈ table[opposite(d)][t2]` holds for
    /// every pair.
    pub fn is_symmetric(&self) -> bool {
        (0..4).all(|d| {
            self.ruleset[d].iter().enumerate().all(|(t1, allowed)| {
                allowed
                    .iter()
                    .all(|&t2| self.ruleset[OPPOSITE[d]][t2].binary_search(&t1).is_ok())
            })
        })
    }

    pub fn print_rules(&self) {
        for (ordinal, direction) in ["West", "North", "East", "South"].iter().enumerate() {
            let rule = &self.ruleset[ordinal];
            debug!("{direction:8} : {rule:?}");
        }
    }
}

/// Resolves one side of a neighbor rule, `"<tileName> [rotation]"`, to a
/// variant id. `None` means the tile was filtered out.
fn resolve(tiles: &TileCatalog, side: &str) -> Result<Option<usize>> {
    let tokens: Vec<&str> = side.split_whitespace().collect();

    let (name, rotation) = match tokens.split_last() {
        Some((last, rest)) if !rest.is_empty() => match last.parse::<usize>() {
            Ok(rotation) => (rest.join(" "), rotation),
            Err(_) => (tokens.join(" "), 0),
        },
        _ => (tokens.join(" "), 0),
    };

    match tiles.lookup(&name) {
        Lookup::Kept { first, cardinality } => {
            if rotation >= cardinality {
                return Err(Error::BadRotation {
                    rule: side.to_string(),
                    cardinality,
                });
            }
            Ok(Some(tiles.action(first, rotation)))
        }
        Lookup::Filtered => Ok(None),
        Lookup::Unknown => Err(Error::UnknownTile { name }),
    }
}
