mod common;

use common::{grid_network, line_network, location_at, unit_edge_time};
use e2sfca_core::prelude::*;
use geo::{Area, BooleanOps, Geometry, MultiPolygon, Rect};

fn line_config(thresholds: &[f64]) -> CatchmentConfig {
    let t = unit_edge_time();
    CatchmentConfig::new(
        thresholds,
        &[(2.5 * t, 1.0), (4.5 * t, 0.5)],
        CostAttribute::Time,
    )
    .unwrap()
}

#[test]
fn test_line_scenario_end_to_end() {
    let graph = line_network();
    let t = unit_edge_time();
    let config = line_config(&[2.5 * t, 4.5 * t]);

    let supply = LocationSet::new(vec![location_at(&graph, 0, "beds", 100.0)]);
    let demand = LocationSet::new(vec![location_at(&graph, 4, "pop", 50.0)]);

    let step1 = compute_step1(&supply, "beds", &demand, "pop", &graph, &config).unwrap();
    let ratio = step1.records()[0].attribute(RATIO_ATTRIBUTE).unwrap();
    // 100 beds over 50 people weighted by the outer band's 0.5
    assert!((ratio - 400_000.0).abs() < 1e-6);

    let step2 = compute_step2(&step1, &demand, &graph, &config).unwrap();
    let access = step2.records()[0].attribute(ACCESS_ATTRIBUTE).unwrap();
    assert!((access - 200_000.0).abs() < 1e-6);
}

#[test]
fn test_steps_do_not_modify_inputs() {
    let graph = line_network();
    let t = unit_edge_time();
    let config = line_config(&[2.5 * t, 4.5 * t]);

    let supply = LocationSet::new(vec![location_at(&graph, 0, "beds", 100.0)]);
    let demand = LocationSet::new(vec![location_at(&graph, 4, "pop", 50.0)]);

    let (step1, step2) = compute_e2sfca(&supply, "beds", &demand, "pop", &graph, &config).unwrap();

    assert!(step1.records()[0].attribute(RATIO_ATTRIBUTE).is_some());
    assert!(step2.records()[0].attribute(ACCESS_ATTRIBUTE).is_some());
    assert!(supply.records()[0].attribute(RATIO_ATTRIBUTE).is_none());
    assert!(demand.records()[0].attribute(ACCESS_ATTRIBUTE).is_none());
}

fn hull(band: &CatchmentBand) -> MultiPolygon<f64> {
    match &band.reach {
        Some(Geometry::Polygon(polygon)) => MultiPolygon::new(vec![polygon.clone()]),
        other => panic!("expected a polygonal reach, got {other:?}"),
    }
}

fn tract(min: (f64, f64), max: (f64, f64), population: f64) -> Location {
    Location::new(Rect::new(min, max).to_polygon()).with_attribute("pop", population)
}

#[test]
fn test_bands_are_disjoint_and_nested() {
    let graph = grid_network(7);
    let source = graph.node_index(24).unwrap();
    let bands =
        build_catchment(&graph, source, &[100.0, 200.0, 300.0], CostAttribute::Length).unwrap();

    for (i, a) in bands.iter().enumerate() {
        for b in &bands[i + 1..] {
            assert!(a.area.intersection(&b.area).unsigned_area() < 1e-9);
        }
    }
    for pair in bands.windows(2) {
        let (inner, outer) = (hull(&pair[0]), hull(&pair[1]));
        assert!(inner.difference(&outer).unsigned_area() < 1e-9);
        assert!(outer.unsigned_area() >= inner.unsigned_area());
    }

    // diamonds of "radius" 1, 2 and 3 around the centre
    let total: f64 = bands.iter().map(CatchmentBand::area).sum();
    assert!((total - 18.0).abs() < 1e-6);
}

#[test]
fn test_single_band_matches_two_step() {
    let graph = grid_network(6);
    let supply = LocationSet::new(vec![
        location_at(&graph, 0, "beds", 40.0),
        location_at(&graph, 14, "beds", 25.0),
        location_at(&graph, 35, "beds", 10.0),
    ]);
    let demand = LocationSet::new(
        (0..36)
            .step_by(5)
            .map(|id| location_at(&graph, id, "pop", 100.0 + id as f64))
            .collect(),
    );

    let banded = CatchmentConfig::new(&[250.0], &[(250.0, 1.0)], CostAttribute::Length).unwrap();
    let single = TwoStepConfig::new(250.0, CostAttribute::Length).unwrap();

    let e2 = compute_step1(&supply, "beds", &demand, "pop", &graph, &banded).unwrap();
    let two = compute_two_step_step1(&supply, "beds", &demand, "pop", &graph, &single).unwrap();

    let e2_ratios = e2.attribute_values(RATIO_ATTRIBUTE).unwrap();
    let two_ratios = two.attribute_values(RATIO_ATTRIBUTE).unwrap();
    assert_eq!(e2_ratios, two_ratios);
    assert!(e2_ratios.iter().any(|&r| r > 0.0));

    let e2_access = compute_step2(&e2, &demand, &graph, &banded).unwrap();
    let two_access = compute_two_step_step2(&two, &demand, &graph, &single).unwrap();
    assert_eq!(
        e2_access.attribute_values(ACCESS_ATTRIBUTE).unwrap(),
        two_access.attribute_values(ACCESS_ATTRIBUTE).unwrap()
    );
}

#[test]
fn test_supply_without_demand_gets_zero_ratio() {
    let graph = grid_network(5);
    let supply = LocationSet::new(vec![location_at(&graph, 0, "beds", 30.0)]);
    let demand = LocationSet::new(vec![location_at(&graph, 24, "pop", 500.0)]);
    let config = CatchmentConfig::new(&[100.0], &[(100.0, 1.0)], CostAttribute::Length).unwrap();

    let step1 = compute_step1(&supply, "beds", &demand, "pop", &graph, &config).unwrap();
    assert_eq!(step1.records()[0].attribute(RATIO_ATTRIBUTE), Some(0.0));

    let two = TwoStepConfig::new(100.0, CostAttribute::Length).unwrap();
    let step1 = compute_two_step_step1(&supply, "beds", &demand, "pop", &graph, &two).unwrap();
    assert_eq!(step1.records()[0].attribute(RATIO_ATTRIBUTE), Some(0.0));
}

#[test]
fn test_duplicate_threshold_contributes_nothing() {
    let graph = line_network();
    let t = unit_edge_time();
    let supply = LocationSet::new(vec![location_at(&graph, 0, "beds", 100.0)]);
    let demand = LocationSet::new(vec![
        location_at(&graph, 1, "pop", 20.0),
        location_at(&graph, 4, "pop", 50.0),
    ]);

    let plain = line_config(&[2.5 * t, 4.5 * t]);
    let repeated = line_config(&[2.5 * t, 2.5 * t, 4.5 * t]);

    let plain = compute_step1(&supply, "beds", &demand, "pop", &graph, &plain).unwrap();
    let repeated = compute_step1(&supply, "beds", &demand, "pop", &graph, &repeated).unwrap();

    let expected = 100.0 / (20.0 * 1.0 + 50.0 * 0.5) * 100_000.0;
    let ratio = plain.records()[0].attribute(RATIO_ATTRIBUTE).unwrap();
    assert!((ratio - expected).abs() < 1e-6);
    assert_eq!(repeated.records()[0].attribute(RATIO_ATTRIBUTE), Some(ratio));
}

#[test]
fn test_step1_is_idempotent() {
    let graph = grid_network(6);
    let supply = LocationSet::new(vec![
        location_at(&graph, 7, "beds", 12.0),
        location_at(&graph, 28, "beds", 8.0),
    ]);
    let demand = LocationSet::new((0..36).map(|id| location_at(&graph, id, "pop", 10.0)).collect());
    let config = CatchmentConfig::new(
        &[100.0, 200.0, 300.0],
        &[(100.0, 1.0), (200.0, 0.68), (300.0, 0.22)],
        CostAttribute::Length,
    )
    .unwrap();

    let first = compute_step1(&supply, "beds", &demand, "pop", &graph, &config).unwrap();
    let second = compute_step1(&supply, "beds", &demand, "pop", &graph, &config).unwrap();
    assert_eq!(
        first.attribute_values(RATIO_ATTRIBUTE).unwrap(),
        second.attribute_values(RATIO_ATTRIBUTE).unwrap()
    );
}

#[test]
fn test_unresolved_location_is_a_data_error() {
    let graph = line_network();
    let t = unit_edge_time();
    let config = line_config(&[2.5 * t, 4.5 * t]);

    let supply = LocationSet::new(vec![Location::new(geo::Point::new(0.0, 0.0))
        .with_attribute("beds", 10.0)]);
    let demand = LocationSet::new(vec![location_at(&graph, 4, "pop", 50.0)]);

    let result = compute_step1(&supply, "beds", &demand, "pop", &graph, &config);
    assert!(matches!(result, Err(Error::MissingNearestNode(0))));

    let result = compute_step1(&demand, "beds", &demand, "pop", &graph, &config);
    assert!(matches!(result, Err(Error::MissingAttribute { .. })));
}

#[test]
fn test_area_demand_is_placed_by_centroid() {
    let graph = grid_network(7);
    let supply = LocationSet::new(vec![location_at(&graph, 24, "beds", 60.0)]);
    let demand = LocationSet::new(vec![
        // centroid on the supply node, corners outside the inner band
        tract((2.2, 2.2), (3.8, 3.8), 100.0),
        // centroid (4.4, 3.0) in the outer band, east edge beyond it
        tract((3.9, 2.5), (4.9, 3.5), 40.0),
        // far corner, out of reach
        tract((0.0, 0.0), (0.8, 0.8), 1000.0),
    ])
    .resolve_nearest_nodes(&graph)
    .unwrap();

    let config = CatchmentConfig::new(
        &[100.0, 200.0],
        &[(100.0, 1.0), (200.0, 0.5)],
        CostAttribute::Length,
    )
    .unwrap();

    let (step1, step2) = compute_e2sfca(&supply, "beds", &demand, "pop", &graph, &config).unwrap();
    let ratio = step1.records()[0].attribute(RATIO_ATTRIBUTE).unwrap();
    assert!((ratio - 60.0 / (100.0 + 40.0 * 0.5) * 100_000.0).abs() < 1e-6);

    let access = step2.attribute_values(ACCESS_ATTRIBUTE).unwrap();
    assert!((access[0] - ratio).abs() < 1e-6);
    assert!((access[1] - ratio).abs() < 1e-6);
    assert_eq!(access[2], 0.0);

    let two = TwoStepConfig::new(200.0, CostAttribute::Length).unwrap();
    let step1 = compute_two_step_step1(&supply, "beds", &demand, "pop", &graph, &two).unwrap();
    let ratio = step1.records()[0].attribute(RATIO_ATTRIBUTE).unwrap();
    assert!((ratio - 60.0 / 140.0 * 100_000.0).abs() < 1e-6);
}
