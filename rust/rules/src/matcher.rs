// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Plot matcher: assigns an object to its enclosing plot.
//!
//! An object is represented by a few plan sample points. A declared plot name
//! is honored when that plot contains at least one sample; otherwise the plot
//! containing the most samples wins, ties going to the smaller plot and then
//! to the earlier one in layer order.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use sitecheck_geometry::{point_in_polygon_tolerant, BoundingBox, Point2, GEOMETRY_EPSILON};

use crate::entities::Plot;
use crate::warnings::{WarningCode, Warnings};

/// Outcome of the declared-name lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum NameCheck {
    NotDeclared,
    Matched,
    /// No plot carries the declared name
    NotFound(String),
    /// The named plot does not contain the object
    Mismatch(String),
}

/// Result of matching one object.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotMatch {
    /// Index into the matcher's plots, `None` when no plot contains a sample
    pub index: Option<usize>,
    /// Number of samples inside the chosen plot
    pub score: usize,
    pub name_check: NameCheck,
}

impl PlotMatch {
    /// Records name problems as warnings, naming the matched object.
    pub fn report(&self, what: &str, object: &str, warnings: &mut Warnings) {
        match &self.name_check {
            NameCheck::NotFound(name) => warnings.push(
                WarningCode::PlotNameNotFound,
                format!("{} '{}' declares plot '{}', which does not exist", what, object, name),
            ),
            NameCheck::Mismatch(name) => warnings.push(
                WarningCode::PlotNameMismatch,
                format!("{} '{}' declares plot '{}' but lies outside it", what, object, name),
            ),
            NameCheck::NotDeclared | NameCheck::Matched => {}
        }
    }
}

/// Center plus the four plan corners of a bounding box.
pub fn building_samples(bbox: &BoundingBox) -> [Point2<f64>; 5] {
    let [a, b, c, d] = bbox.corners_2d();
    [bbox.center_2d(), a, b, c, d]
}

/// Matches objects against a fixed list of plots.
#[derive(Debug)]
pub struct PlotMatcher<'p> {
    plots: &'p [Plot],
    by_name: FxHashMap<&'p str, usize>,
    by_folded_name: FxHashMap<String, usize>,
}

impl<'p> PlotMatcher<'p> {
    pub fn new(plots: &'p [Plot]) -> Self {
        let mut by_name = FxHashMap::default();
        let mut by_folded_name = FxHashMap::default();
        // first plot wins on duplicate names
        for (i, plot) in plots.iter().enumerate() {
            by_name.entry(plot.name.as_str()).or_insert(i);
            by_folded_name.entry(plot.name.trim().to_lowercase()).or_insert(i);
        }
        Self {
            plots,
            by_name,
            by_folded_name,
        }
    }

    pub fn plots(&self) -> &'p [Plot] {
        self.plots
    }

    /// Plot index for a name, exact first, then case-folded.
    pub fn find_by_name(&self, name: &str) -> Option<usize> {
        self.by_name
            .get(name)
            .or_else(|| self.by_folded_name.get(&name.trim().to_lowercase()))
            .copied()
    }

    /// Number of samples inside a plot.
    pub fn score(&self, index: usize, samples: &[Point2<f64>]) -> usize {
        let plot = &self.plots[index];
        samples
            .iter()
            .filter(|p| plot.bbox.contains_2d(p, GEOMETRY_EPSILON))
            .filter(|p| point_in_polygon_tolerant(p, &plot.boundary, GEOMETRY_EPSILON))
            .count()
    }

    pub fn match_samples(&self, samples: &[Point2<f64>], declared_name: Option<&str>) -> PlotMatch {
        let declared = declared_name.map(str::trim).filter(|n| !n.is_empty());

        let name_check = match declared {
            None => NameCheck::NotDeclared,
            Some(name) => match self.find_by_name(name) {
                Some(index) => {
                    let score = self.score(index, samples);
                    if score > 0 {
                        return PlotMatch {
                            index: Some(index),
                            score,
                            name_check: NameCheck::Matched,
                        };
                    }
                    NameCheck::Mismatch(name.to_string())
                }
                None => NameCheck::NotFound(name.to_string()),
            },
        };

        let (index, score) = self.best_geometric(samples);
        PlotMatch {
            index,
            score,
            name_check,
        }
    }

    fn best_geometric(&self, samples: &[Point2<f64>]) -> (Option<usize>, usize) {
        let mut best: Option<(usize, usize)> = None;
        for index in 0..self.plots.len() {
            let score = self.score(index, samples);
            if score == 0 {
                continue;
            }
            let better = match best {
                None => true,
                Some((best_index, best_score)) => {
                    score > best_score
                        || (score == best_score
                            && self.plots[index].area < self.plots[best_index].area - GEOMETRY_EPSILON)
                }
            };
            if better {
                best = Some((index, score));
            }
        }
        match best {
            Some((index, score)) => (Some(index), score),
            None => (None, 0),
        }
    }
}
