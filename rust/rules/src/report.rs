// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Types shared by every report.

use serde::{Deserialize, Serialize};
use sitecheck_geometry::{Point2, Point3};

/// Outcome of a check, or of one record within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Pass,
    Fail,
    /// Not decidable from the model (e.g. no requirement given)
    Unknown,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pass => "pass",
            Status::Fail => "fail",
            Status::Unknown => "unknown",
        }
    }

    /// Fail beats Unknown beats Pass.
    pub fn combine(statuses: impl IntoIterator<Item = Status>) -> Status {
        statuses.into_iter().fold(Status::Pass, |acc, s| match (acc, s) {
            (Status::Fail, _) | (_, Status::Fail) => Status::Fail,
            (Status::Unknown, _) | (_, Status::Unknown) => Status::Unknown,
            _ => Status::Pass,
        })
    }
}

/// Plan-view point as written to reports
pub type XY = [f64; 2];

/// 3D point as written to reports
pub type XYZ = [f64; 3];

#[inline]
pub fn xy(p: &Point2<f64>) -> XY {
    [p.x, p.y]
}

#[inline]
pub fn xyz(p: &Point3<f64>) -> XYZ {
    [p.x, p.y, p.z]
}

pub fn ring_xy(points: &[Point2<f64>]) -> Vec<XY> {
    points.iter().map(xy).collect()
}

/// Plan outline lifted to a constant height
pub fn lift(points: &[Point2<f64>], z: f64) -> Vec<XYZ> {
    points.iter().map(|p| [p.x, p.y, z]).collect()
}

/// Prism between two heights over a plan outline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Volume {
    pub outline: Vec<XY>,
    pub bottom_z: f64,
    pub top_z: f64,
}
