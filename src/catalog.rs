//! Declarative tile catalog and its expansion into concrete variants.
//!
//! A [`Catalog`] is what a tool author writes: base tiles with a symmetry
//! class and weight, neighbor rules, and named subsets. [`TileCatalog`] expands
//! every retained base tile into one [`Variant`] per canonical form of its
//! symmetry class and keeps the action table the rule compiler resolves
//! rotations through.

use crate::error::{Error, Result};
use crate::symmetry::{ActionRow, Symmetry};
use hashbrown::{HashMap, HashSet};
use serde::Deserialize;
use serde::Serialize;

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Catalog {
    /// Treat every rotation as its own art asset; all labels use digit `0`.
    #[serde(default)]
    pub unique: bool,
    pub tiles: Vec<TileSpec>,
    #[serde(default)]
    pub neighbors: Vec<NeighborRule>,
    #[serde(default)]
    pub subsets: Vec<SubsetSpec>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct TileSpec {
    pub name: String,
    /// `X`, `L`, `T`, `I` or `Slash`; absent means `X`.
    #[serde(default)]
    pub symmetry: Option<String>,
    /// Zero means unspecified and is read as 1.0.
    #[serde(default)]
    pub weight: f64,
}

/// `left`'s +X edge matches `right`'s -X edge. Each side is
/// `"<tileName> [rotation]"`.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct NeighborRule {
    pub left: String,
    pub right: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SubsetSpec {
    pub name: String,
    pub tiles: Vec<String>,
}

impl Catalog {
    pub fn new(unique: bool) -> Catalog {
        Catalog {
            unique,
            ..Default::default()
        }
    }

    pub fn with_tile(mut self, name: &str, symmetry: Option<&str>, weight: f64) -> Catalog {
        self.tiles.push(TileSpec {
            name: name.to_string(),
            symmetry: symmetry.map(str::to_string),
            weight,
        });
        self
    }

    pub fn with_neighbor(mut self, left: &str, right: &str) -> Catalog {
        self.neighbors.push(NeighborRule {
            left: left.to_string(),
            right: right.to_string(),
        });
        self
    }

    pub fn with_subset(mut self, name: &str, tiles: &[&str]) -> Catalog {
        self.subsets.push(SubsetSpec {
            name: name.to_string(),
            tiles: tiles.iter().map(|x| x.to_string()).collect(),
        });
        self
    }

    /// Tile names kept by the named subset. An empty name keeps everything,
    /// which is signalled by an empty list.
    pub fn subset(&self, name: &str) -> Result<Vec<String>> {
        if name.is_empty() {
            return Ok(Vec::new());
        }

        self.subsets
            .iter()
            .find(|subset| subset.name == name)
            .map(|subset| subset.tiles.clone())
            .ok_or_else(|| Error::UnknownSubset {
                name: name.to_string(),
            })
    }
}

/// One concrete rotated or reflected instance of a base tile.
#[derive(Clone, Debug, PartialEq)]
pub struct Variant {
    pub id: usize,
    pub base: String,
    /// Canonical form index within the base tile's symmetry class.
    pub form: usize,
    pub weight: f64,
    /// `"<rotationDigit><base>"`.
    pub label: String,
}

/// How a base tile name resolved against a filtered catalog.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Lookup {
    Kept { first: usize, cardinality: usize },
    Filtered,
    Unknown,
}

#[derive(Clone, Debug)]
pub struct TileCatalog {
    variants: Vec<Variant>,
    actions: Vec<ActionRow>,
    kept: HashMap<String, (usize, usize)>,
    known: HashSet<String>,
}

impl TileCatalog {
    /// Expands `catalog`, keeping only the tiles in `subset` unless it is
    /// empty.
    pub fn new(catalog: &Catalog, subset: &[String]) -> Result<TileCatalog> {
        let known: HashSet<String> = catalog.tiles.iter().map(|x| x.name.clone()).collect();

        for name in subset {
            if !known.contains(name) {
                return Err(Error::UnknownTile { name: name.clone() });
            }
        }

        let mut variants = Vec::new();
        let mut actions = Vec::new();
        let mut kept = HashMap::new();

        for tile in &catalog.tiles {
            let symmetry =
                Symmetry::parse(tile.symmetry.as_deref()).ok_or_else(|| Error::BadSymmetry {
                    tile: tile.name.clone(),
                    symmetry: tile.symmetry.clone().unwrap_or_default(),
                })?;

            if !tile.weight.is_finite() || tile.weight < 0.0 {
                return Err(Error::BadWeight {
                    tile: tile.name.clone(),
                    weight: tile.weight,
                });
            }

            if !subset.is_empty() && !subset.contains(&tile.name) {
                continue;
            }

            let first = variants.len();
            let cardinality = symmetry.cardinality();
            let weight = if tile.weight != 0.0 { tile.weight } else { 1.0 };

            kept.insert(tile.name.clone(), (first, cardinality));
            actions.extend(symmetry.actions(first));

            for form in 0..cardinality {
                let rotation = if catalog.unique { 0 } else { form };
                variants.push(Variant {
                    id: first + form,
                    base: tile.name.clone(),
                    form,
                    weight,
                    label: format!("{rotation}{}", tile.name),
                });
            }
        }

        Ok(TileCatalog {
            variants,
            actions,
            kept,
            known,
        })
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    pub fn variant(&self, id: usize) -> &Variant {
        &self.variants[id]
    }

    pub fn weights(&self) -> Vec<f64> {
        self.variants.iter().map(|x| x.weight).collect()
    }

    /// Variant reached from `id` by dihedral operation `op` (see [`ActionRow`]).
    pub fn action(&self, id: usize, op: usize) -> usize {
        self.actions[id][op]
    }

    pub(crate) fn lookup(&self, name: &str) -> Lookup {
        match self.kept.get(name) {
            Some(&(first, cardinality)) => Lookup::Kept { first, cardinality },
            None if self.known.contains(name) => Lookup::Filtered,
            None => Lookup::Unknown,
        }
    }

    /// Resolves a seed name: an exact variant label first, then a base tile
    /// name, which picks the tile's first variant.
    pub fn find(&self, name: &str) -> Option<usize> {
        self.variants
            .iter()
            .find(|x| x.label == name)
            .map(|x| x.id)
            .or_else(|| self.kept.get(name).map(|&(first, _)| first))
    }
}

/// Splits a variant label into its rotation digit and base tile name.
pub fn split_label(label: &str) -> Option<(u8, &str)> {
    let mut chars = label.chars();
    let digit = chars.next()?.to_digit(10)?;
    Some((digit as u8, chars.as_str()))
}

/// Display rotation in degrees for a label's rotation digit.
pub fn rotation_degrees(rotation: u8) -> f32 {
    match rotation {
        1 => 270.0,
        2 => 180.0,
        3 => 90.0,
        _ => 0.0,
    }
}
