//! Group countries by the mix of farmed species they produce.
//!
//! ```sh
//! RUST_LOG=debug cargo run --example country_types
//! ```

use rand::prelude::*;
use typology::{Cut, LabeledMatrix, Typology};

const SPECIES: [&str; 6] = ["salmon", "trout", "carp", "tilapia", "shrimp", "mussel"];

/// Each profile is a weight per species; countries draw from one or two.
const PROFILES: [[f64; 6]; 3] = [
    [30.0, 12.0, 0.0, 0.0, 1.0, 8.0],
    [0.0, 2.0, 25.0, 18.0, 3.0, 0.0],
    [1.0, 0.0, 2.0, 10.0, 30.0, 4.0],
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut rng = StdRng::seed_from_u64(11);
    let countries: Vec<String> = (1..=12).map(|i| format!("Country {i:02}")).collect();

    let mut counts = Vec::with_capacity(countries.len());
    let mut gdp = Vec::with_capacity(countries.len());
    let mut latitude = Vec::with_capacity(countries.len());
    for i in 0..countries.len() {
        let primary = i % PROFILES.len();
        let side = (primary + 1) % PROFILES.len();
        let blend = rng.random::<f64>() * 0.3;
        let row: Vec<f64> = (0..SPECIES.len())
            .map(|j| {
                let mean = (1.0 - blend) * PROFILES[primary][j] + blend * PROFILES[side][j];
                (mean * (0.5 + rng.random::<f64>())).round()
            })
            .collect();
        counts.push(row);
        gdp.push(5_000.0 + 60_000.0 * rng.random::<f64>());
        latitude.push(-40.0 + 100.0 * rng.random::<f64>());
    }

    let counts = LabeledMatrix::from_rows(
        countries.clone(),
        SPECIES.iter().map(|s| s.to_string()).collect(),
        &counts,
    )?;
    let auxiliary = LabeledMatrix::from_column(countries.clone(), "gdp", &gdp)?
        .inner_join(&LabeledMatrix::from_column(countries, "latitude", &latitude)?)?;

    let report = Typology::new(3)
        .with_cut(Cut::Clusters(3))
        .run(&counts, Some(&auxiliary))?;

    println!(
        "NMF: {:?}, reconstruction error {:.3}",
        report.status, report.reconstruction_err
    );
    for profile in report.component_profiles(3)? {
        let top: Vec<String> = profile
            .features
            .iter()
            .map(|(name, w)| format!("{name} ({w:.2})"))
            .collect();
        println!("{}: {}", profile.component, top.join(", "));
    }

    println!("\nDendrogram order: {}", report.ordered_labels().join(", "));
    if let Some(groups) = report.cluster_members() {
        for (c, members) in groups.iter().enumerate() {
            println!("cluster {c}: {}", members.join(", "));
        }
    }

    Ok(())
}
