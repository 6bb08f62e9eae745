// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end checks on small sites built in code.

use approx::assert_relative_eq;
use sitecheck_core::{Geometry, Model};
use sitecheck_geometry::{
    point_in_polygon, triangles_intersect, Point2, Point3, Triangle, GEOMETRY_EPSILON,
};
use sitecheck_rules::{
    run_check, CheckRequest, CheckResult, FireLadderParams, FireLadderReason, FrontageParams,
    HeightLimitParams, SightVisibilityParams, SkyBridgeParams, SkyBridgeReason, Status,
    WarningCode,
};

fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Geometry {
    Geometry::closed_curve(vec![
        [x0, y0, 0.0],
        [x1, y0, 0.0],
        [x1, y1, 0.0],
        [x0, y1, 0.0],
    ])
}

/// One 50 x 50 plot on a nested layer, limit given with a unit suffix.
fn plot_site() -> Model {
    let mut model = Model::new();
    model
        .add("Zoning::Parcels::PLOTS", "P1", rect(0.0, 0.0, 50.0, 50.0))
        .attributes
        .insert("Height_Limit", "30 m");
    model
}

#[test]
fn point_in_polygon_ignores_winding() {
    let ccw = vec![
        Point2::new(0.0, 0.0),
        Point2::new(4.0, 0.0),
        Point2::new(4.0, 4.0),
        Point2::new(0.0, 4.0),
    ];
    let cw: Vec<_> = ccw.iter().rev().copied().collect();
    for p in [Point2::new(1.0, 1.0), Point2::new(3.5, 2.0), Point2::new(5.0, 1.0)] {
        assert_eq!(point_in_polygon(&p, &ccw), point_in_polygon(&p, &cw));
    }
    assert!(point_in_polygon(&Point2::new(2.0, 2.0), &cw));
}

#[test]
fn triangle_test_is_strict() {
    let t = |a: [f64; 3], b: [f64; 3], c: [f64; 3]| {
        Triangle::new(
            Point3::new(a[0], a[1], a[2]),
            Point3::new(b[0], b[1], b[2]),
            Point3::new(c[0], c[1], c[2]),
        )
    };
    let base = t([0.0, 0.0, 0.0], [4.0, 0.0, 0.0], [0.0, 4.0, 0.0]);
    let piercing = t([1.0, 1.0, -1.0], [1.0, 1.0, 1.0], [1.5, 0.5, 1.0]);
    let neighbour = t([4.0, 0.0, 0.0], [4.0, 4.0, 0.0], [0.0, 4.0, 0.0]);
    assert!(triangles_intersect(&base, &piercing, GEOMETRY_EPSILON));
    assert!(triangles_intersect(&piercing, &base, GEOMETRY_EPSILON));
    assert!(!triangles_intersect(&base, &neighbour, GEOMETRY_EPSILON));
}

#[test]
fn height_limit_through_nested_layer_and_units() {
    let mut model = plot_site();
    model.add("Buildings", "tower", Geometry::block([10.0, 10.0, 0.0], [20.0, 20.0, 36.0]));
    model.add("Buildings", "annex", Geometry::block([30.0, 10.0, 0.0], [40.0, 20.0, 12.0]));

    let result = run_check(&model, &CheckRequest::HeightLimit(HeightLimitParams::default())).unwrap();
    let CheckResult::HeightLimit(report) = result else {
        panic!("wrong report kind");
    };
    assert_eq!(report.status, Status::Fail);
    assert_eq!(report.summary.exceeded, 1);
    assert_eq!(report.summary.compliant, 1);

    let tower = report
        .buildings
        .iter()
        .find(|b| b.building_id == "tower")
        .unwrap();
    assert_eq!(tower.height_limit, Some(30.0));
    assert_relative_eq!(tower.exceed_amount, 6.0);
    assert_eq!(tower.plot_name, "P1");
}

/// Setback along y = 2 from x = 5 to 45; a 20 m wide building 0.3 m behind it.
fn frontage_site() -> Model {
    let mut model = plot_site();
    model.add(
        "setbacks",
        "S1",
        Geometry::polyline(vec![[5.0, 2.0, 0.0], [45.0, 2.0, 0.0]]),
    );
    model.add("buildings", "B1", Geometry::block([5.0, 2.3, 0.0], [25.0, 20.0, 10.0]));
    model
}

#[test]
fn frontage_rate_is_a_fraction_and_percentages_are_normalized() {
    let model = frontage_site();

    let strict = FrontageParams {
        required_rate: Some(80.0),
        ..FrontageParams::default()
    };
    let result = run_check(&model, &CheckRequest::FrontageRate(strict)).unwrap();
    let CheckResult::FrontageRate(report) = result else {
        panic!("wrong report kind");
    };
    let setback = &report.setbacks[0];
    assert!((0.0..=1.0).contains(&setback.frontage_rate));
    assert_relative_eq!(setback.frontage_rate, 0.5, epsilon = 1e-9);
    assert_relative_eq!(setback.total_length, 40.0, epsilon = 1e-9);
    assert_eq!(setback.required_rate, Some(0.8));
    assert_eq!(setback.compliant, Some(false));
    assert_eq!(setback.plot_name.as_deref(), Some("P1"));

    let lenient = FrontageParams {
        required_rate: Some(0.5),
        ..FrontageParams::default()
    };
    let report = sitecheck_rules::check_frontage(&model, &lenient).unwrap();
    assert_eq!(report.status, Status::Pass);
}

#[test]
fn frontage_without_requirement_is_unknown() {
    let report = sitecheck_rules::check_frontage(&frontage_site(), &FrontageParams::default()).unwrap();
    assert_eq!(report.status, Status::Unknown);
    assert!(report
        .warnings
        .iter()
        .any(|w| w.code == WarningCode::MissingRequiredRate));
}

fn ladder_site() -> Model {
    let mut model = Model::new();
    model.add("redlines", "R1", rect(-50.0, -50.0, 90.0, 70.0));
    model.add("buildings", "B1", Geometry::block([0.0, 0.0, 0.0], [40.0, 20.0, 30.0]));
    model
}

#[test]
fn fire_ladder_missing_and_narrow() {
    let params = FireLadderParams::default();

    let report = sitecheck_rules::check_fire_ladders(&ladder_site(), &params).unwrap();
    assert_eq!(report.redlines[0].reasons, vec![FireLadderReason::MissingLadder]);

    let mut model = ladder_site();
    model.add("fire_ladders", "L1", rect(2.0, -15.0, 37.0, -7.0));
    let report = sitecheck_rules::check_fire_ladders(&model, &params).unwrap();
    assert_eq!(report.status, Status::Fail);
    assert_eq!(report.redlines[0].reasons, vec![FireLadderReason::WidthTooSmall]);
}

fn bridge_site() -> Model {
    let mut model = Model::new();
    model.add("plots", "West", rect(0.0, 0.0, 30.0, 30.0));
    model.add("plots", "East", rect(40.0, 0.0, 70.0, 30.0));
    model
}

#[test]
fn sky_bridge_pass_and_not_connecting() {
    let mut model = bridge_site();
    model.add("sky_bridges", "link", Geometry::block([25.0, 10.0, 12.0], [45.0, 14.0, 15.0]));
    model.add("sky_bridges", "stub", Geometry::block([5.0, 10.0, 12.0], [10.0, 14.0, 15.0]));

    let result = run_check(&model, &CheckRequest::SkyBridge(SkyBridgeParams::default())).unwrap();
    let CheckResult::SkyBridge(report) = result else {
        panic!("wrong report kind");
    };
    assert_eq!(report.corridors[0].status, Status::Pass);
    assert_eq!(report.corridors[1].reasons, vec![SkyBridgeReason::NotConnecting]);
    assert_eq!(report.status, Status::Fail);
}

#[test]
fn visibility_of_hidden_building() {
    let mut model = Model::new();
    model.add("observers", "eye", Geometry::block([-1.0, -1.0, 0.0], [1.0, 1.0, 2.0]));
    model.add("buildings", "screen", Geometry::block([10.0, -10.0, 0.0], [12.0, 10.0, 20.0]));
    model.add("buildings", "hidden", Geometry::block([20.0, -2.0, 0.0], [24.0, 2.0, 20.0]));
    model.add("buildings", "aside", Geometry::block([-2.0, 20.0, 0.0], [2.0, 24.0, 20.0]));

    let result = run_check(
        &model,
        &CheckRequest::SightVisibility(SightVisibilityParams::default()),
    )
    .unwrap();
    let CheckResult::SightVisibility(report) = result else {
        panic!("wrong report kind");
    };
    assert_eq!(report.observer, [0.0, 0.0]);
    assert_eq!(report.summary.visible, 2);
    assert_eq!(report.summary.hidden, 1);

    let hidden = report
        .buildings
        .iter()
        .find(|b| b.building_id == "hidden")
        .unwrap();
    assert!(!hidden.visible);
    assert_eq!(hidden.blocked_by, vec!["screen".to_string()]);
}

#[test]
fn missing_required_layer_is_an_error() {
    let err = run_check(&bridge_site(), &CheckRequest::FireLadder(FireLadderParams::default()))
        .unwrap_err();
    assert_eq!(err.code(), "missing_layer");
}
