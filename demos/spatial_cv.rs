extern crate log;
extern crate simple_logger;
extern crate spatialcv;

use std::cmp::Ordering;

use spatialcv::prelude::*;
use spatialcv::{
    cross_validate, AssignerConfig, Domain, Point, Polygon, RSquared, RootMeanSquaredError,
    SamplePoint, SpatialFoldAssigner,
};

/// richness rises towards the north-east
fn richness(p: &Point) -> f64 {
    20.0 + 0.3 * p.x + 0.1 * p.y
}

/// predict the richness of the closest training plot
fn nearest_neighbour(
    train: &mut dyn Iterator<Item = (&Point, &f64)>,
    test: &mut dyn Iterator<Item = &Point>,
) -> Box<dyn Iterator<Item = f64>> {
    let train: Vec<(Point, f64)> = train.map(|(p, &v)| (*p, v)).collect();
    let out: Vec<f64> = test
        .map(|p| {
            train
                .iter()
                .min_by(|a, b| {
                    p.distance(&a.0)
                        .partial_cmp(&p.distance(&b.0))
                        .unwrap_or(Ordering::Equal)
                })
                .map_or(0.0, |&(_, v)| v)
        })
        .collect();
    Box::new(out.into_iter())
}

fn main() {
    simple_logger::init_with_level(log::Level::Info).unwrap();

    // Survey plots clustered around five field stations in a 100 x 100 km study area
    let stations = [(15.0, 20.0), (30.0, 70.0), (55.0, 45.0), (80.0, 15.0), (85.0, 80.0)];
    let coords: Vec<(f64, f64)> = stations
        .iter()
        .flat_map(|&(sx, sy)| {
            (0..6).map(move |i| {
                let angle = i as f64;
                (sx + 2.0 * angle.cos(), sy + 2.0 * angle.sin())
            })
        })
        .collect();
    let samples = SamplePoint::from_coords(coords);
    let domain = Domain::polygon(Polygon::rectangle(
        Point::new(0.0, 0.0),
        Point::new(100.0, 100.0),
    ));

    let assigner = SpatialFoldAssigner::new(AssignerConfig::default()).unwrap();
    let folds = assigner.assign(&samples, &domain, 5).unwrap();

    println!(
        "{} folds from {} clusters, divergence {:.4}",
        folds.assignment.k(),
        folds.clusters,
        folds.divergence
    );
    if let Some(ref warning) = folds.warning {
        println!("warning: {}", warning);
    }

    let x: Vec<Point> = samples.iter().map(|s| s.location).collect();
    let y: Vec<f64> = x.iter().map(richness).collect();

    let rmse: RootMeanSquaredError<f64> = cross_validate(&folds, &x, &y, nearest_neighbour).unwrap();
    let r2: RSquared<f64> = cross_validate(&folds, &x, &y, nearest_neighbour).unwrap();

    println!("Root Mean Squared Error: {}", rmse.result());
    println!("R squared: {}", r2.result());

    for (f, fold) in folds.iter().enumerate() {
        println!("fold {}: {} held out", f, fold.testset.len());
    }
}
