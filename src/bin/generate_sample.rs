use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;

const TIME_POINTS: [f64; 6] = [0.0, 5.0, 15.0, 30.0, 60.0, 120.0];

/// (name, baseline, response amplitude, response time constant in minutes,
/// drug effect on the amplitude)
const SPECIES: [(&str, f64, f64, f64, f64); 5] = [
    ("Erk", 120.0, 900.0, 20.0, 0.3),
    ("EGFR", 300.0, 600.0, 10.0, 0.5),
    ("mTor", 80.0, 250.0, 45.0, 1.4),
    ("Akt", 150.0, 700.0, 30.0, 1.2),
    ("IGFR", 200.0, 350.0, 15.0, 0.8),
];

/// Transient response peaking around `tau` minutes.
fn response(t: f64, baseline: f64, amplitude: f64, tau: f64) -> f64 {
    baseline + amplitude * (t / tau) * (1.0 - t / tau).exp()
}

/// Seeded xoshiro256** generator, so sample files are reproducible.
struct SampleRng {
    state: [u64; 4],
}

impl SampleRng {
    /// Expand `seed` into the four state words with SplitMix64.
    fn new(seed: u64) -> Self {
        let mut x = seed;
        let mut state = [0u64; 4];
        for word in &mut state {
            x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
            let mut z = x;
            z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
            z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
            *word = z ^ (z >> 31);
        }
        SampleRng { state }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Normal deviate via Box-Muller.
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// One replicate series: a row per time point, MFI values per species.
fn series(rng: &mut SampleRng, treated: bool) -> Vec<Vec<f64>> {
    TIME_POINTS
        .iter()
        .map(|&t| {
            SPECIES
                .iter()
                .map(|&(_, baseline, amplitude, tau, drug)| {
                    let amplitude = if treated { amplitude * drug } else { amplitude };
                    let mfi = response(t, baseline, amplitude, tau);
                    (mfi + rng.gauss(0.0, 0.05 * mfi)).max(1.0)
                })
                .collect()
        })
        .collect()
}

/// Write two replicate series back to back; the second one restarts the
/// time column and is ignored by the loader.
fn write_condition(path: &Path, rng: &mut SampleRng, treated: bool) -> Result<()> {
    let arm = if treated { "treated" } else { "untreated" };
    info!("Writing {arm} condition to {}", path.display());
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;

    let mut header = vec!["Time".to_string()];
    header.extend(SPECIES.iter().map(|s| s.0.to_string()));
    wtr.write_record(&header)?;

    for _replicate in 0..2 {
        for (t, row) in TIME_POINTS.iter().zip(series(rng, treated)) {
            let mut record = vec![format!("{t}")];
            record.extend(row.iter().map(|v| format!("{v:.1}")));
            wtr.write_record(&record)?;
        }
    }
    wtr.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SampleRng::new(42);
    let treated = out_dir.join("BpSampleSora.csv");
    let untreated = out_dir.join("BpSampleDMSO.csv");
    write_condition(&treated, &mut rng, true)?;
    write_condition(&untreated, &mut rng, false)?;

    println!(
        "Wrote {} species x {} time points to {} and {}",
        SPECIES.len(),
        TIME_POINTS.len(),
        treated.display(),
        untreated.display()
    );
    Ok(())
}
