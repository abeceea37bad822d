use std::collections::HashMap;

use boruvka_core::{build_forest, Coordinate, EngineConfig};
use rand::prelude::*;

/// Scatters `n` demand nodes over a small box around `(center_lon, center_lat)`
/// and gives each a generous-but-finite budget, mirroring the scale of
/// spec.md's literal scenarios rather than a real demand survey.
fn random_demand_nodes(n: u64, center_lon: f64, center_lat: f64, rng: &mut impl Rng) -> (Vec<u64>, HashMap<u64, Coordinate>, HashMap<u64, f64>) {
    let v: Vec<u64> = (1..=n).collect();
    let mut coords = HashMap::new();
    let mut budgets = HashMap::new();
    for &id in &v {
        let lon = center_lon + rng.gen_range(-0.05..0.05);
        let lat = center_lat + rng.gen_range(-0.05..0.05);
        coords.insert(id, Coordinate::new(lon, lat));
        budgets.insert(id, rng.gen_range(2_000.0..20_000.0));
    }
    (v, coords, budgets)
}

fn main() {
    env_logger::init();

    let mut rng = thread_rng();
    let (v, coords, budgets) = random_demand_nodes(25, 11.58, 48.14, &mut rng);

    let edges = build_forest(v, coords, budgets, None, None, &EngineConfig::default())
        .expect("synthetic demo input is always well-formed");

    println!("accepted {} edges", edges.len());
    for e in &edges {
        println!("  {} -- {} ({:.1}m)", e.u, e.v, e.length);
    }
}
