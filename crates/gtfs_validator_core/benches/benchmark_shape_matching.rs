use criterion::{criterion_group, criterion_main, Criterion};

use gtfs_model::{Route, RouteType, Shape, Stop, StopTime, Trip};
use gtfs_validator_core::rules::shape_to_stop_matching::ShapeToStopMatchingValidator;
use gtfs_validator_core::{CsvTable, GtfsFeed, NoticeContainer, Validator};

fn generate_complex_feed(
    num_shapes: usize,
    points_per_shape: usize,
    trips_per_shape: usize,
) -> GtfsFeed {
    let mut shapes = Vec::new();
    let mut stops = Vec::new();
    let mut trips = Vec::new();
    let mut stop_times = Vec::new();
    let mut routes = Vec::new();

    routes.push(Route {
        route_id: "R1".to_string(),
        route_short_name: Some("R1".to_string()),
        route_type: RouteType::Bus,
        ..Default::default()
    });

    for shape_index in 0..num_shapes {
        let shape_id = format!("S{}", shape_index + 1);

        for i in 0..points_per_shape {
            let lat = (i as f64) * 0.001;
            let lon = if i % 2 == 0 { 0.0 } else { 0.001 };
            shapes.push(Shape {
                shape_id: shape_id.clone(),
                shape_pt_lat: lat,
                shape_pt_lon: lon,
                shape_pt_sequence: i as u32,
                shape_dist_traveled: Some(i as f64 * 100.0),
            });
        }

        // Every 10th shape point gets a stop placed slightly off the line.
        for i in (0..points_per_shape).step_by(10) {
            let stop_id = format!("STOP_{}_{}", shape_id, i);
            stops.push(Stop {
                stop_id: stop_id.clone(),
                stop_name: Some(stop_id.clone()),
                stop_lat: Some((i as f64) * 0.001),
                stop_lon: Some(if i % 2 == 0 { 0.0001 } else { 0.0009 }),
                ..Default::default()
            });
        }

        for t in 0..trips_per_shape {
            let trip_id = format!("T_{}_{}", shape_id, t);
            trips.push(Trip {
                route_id: "R1".to_string(),
                service_id: "SVC1".to_string(),
                trip_id: trip_id.clone(),
                shape_id: Some(shape_id.clone()),
                ..Default::default()
            });

            for i in (0..points_per_shape).step_by(10) {
                let stop_id = format!("STOP_{}_{}", shape_id, i);
                stop_times.push(StopTime {
                    trip_id: trip_id.clone(),
                    stop_id,
                    stop_sequence: (i / 10) as u32,
                    ..Default::default()
                });
            }
        }
    }

    GtfsFeed {
        stops: CsvTable {
            headers: vec![],
            rows: stops,
            row_numbers: vec![],
        },
        routes: CsvTable {
            headers: vec![],
            rows: routes,
            row_numbers: vec![],
        },
        trips: CsvTable {
            headers: vec![],
            rows: trips,
            row_numbers: vec![],
        },
        stop_times: CsvTable {
            headers: vec![],
            rows: stop_times,
            row_numbers: vec![],
        },
        shapes: Some(CsvTable {
            headers: vec![],
            rows: shapes,
            row_numbers: vec![],
        }),
        ..Default::default()
    }
}

fn benchmark_validation(c: &mut Criterion) {
    // 5 shapes, 1000 points each, 5 trips each
    let feed = generate_complex_feed(5, 1000, 5);
    let validator = ShapeToStopMatchingValidator;

    c.bench_function("shape_matching_5_shapes_1000_pts", |b| {
        b.iter(|| {
            let mut notices = NoticeContainer::new();
            validator.validate(&feed, &mut notices);
        })
    });
}

criterion_group!(benches, benchmark_validation);
criterion_main!(benches);
