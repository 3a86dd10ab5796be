//! Partitioning must never change the generated map.
//!
//! The initial noise draw for any global cell depends only on the global
//! seed and the cell's row-major index, so assembling the bands of a
//! k-worker run has to reproduce a single-worker run bit for bit.

use karst_core::{BandGenerator, Cell, MapConfig, MapSeed, Partition};

fn assembled_initial_cells(config: &MapConfig, seed: MapSeed, workers: usize) -> Vec<Cell> {
    let mut cells = Vec::with_capacity((config.width * config.height) as usize);
    for part in Partition::split(config.height as usize, workers) {
        let mut band = BandGenerator::new(config, part, seed);
        band.initialize(config.fill_probability);
        cells.extend_from_slice(band.grid().cells());
    }
    cells
}

#[test]
fn initial_noise_is_independent_of_worker_count() {
    let config = MapConfig { width: 40, height: 31, ..MapConfig::default() };
    let seed = MapSeed::new(0xB01D_FACE);

    let single = assembled_initial_cells(&config, seed, 1);
    for workers in [2, 3, 4, 7, 31, 40] {
        let split = assembled_initial_cells(&config, seed, workers);
        assert_eq!(
            single, split,
            "initial noise diverged between 1 and {workers} workers"
        );
    }
}

#[test]
fn randomized_dimension_sweep() {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..25 {
        let config = MapConfig {
            width: rng.gen_range(1..32),
            height: rng.gen_range(0..48),
            ..MapConfig::default()
        };
        let workers = rng.gen_range(1..9);
        let seed = MapSeed::new(rng.gen());

        let single = assembled_initial_cells(&config, seed, 1);
        let split = assembled_initial_cells(&config, seed, workers);
        assert_eq!(
            single, split,
            "diverged for {}x{} with {workers} workers",
            config.width, config.height
        );
    }
}

#[test]
fn smoothed_bands_match_single_worker_run() {
    // Feed each band its true neighbor rows (computed from the previous
    // iteration's full assembly) and compare against one whole-map band.
    let config = MapConfig { width: 24, height: 18, ..MapConfig::default() };
    let seed = MapSeed::new(2024);
    let workers = 3;

    let full_part = Partition::for_worker(config.height as usize, 1, 0);
    let mut reference = BandGenerator::new(&config, full_part, seed);
    reference.initialize(config.fill_probability);

    let mut bands: Vec<BandGenerator> = Partition::split(config.height as usize, workers)
        .into_iter()
        .map(|part| {
            let mut band = BandGenerator::new(&config, part, seed);
            band.initialize(config.fill_probability);
            band
        })
        .collect();

    for _ in 0..config.smoothing_iterations {
        reference.smooth_iteration(&karst_core::Halo::Absent, &karst_core::Halo::Absent);

        // Exchange boundary rows before anyone computes, as the halo
        // protocol requires.
        let firsts: Vec<Vec<Cell>> =
            bands.iter().map(|b| b.first_row().unwrap().to_vec()).collect();
        let lasts: Vec<Vec<Cell>> =
            bands.iter().map(|b| b.last_row().unwrap().to_vec()).collect();

        for (i, band) in bands.iter_mut().enumerate() {
            let top = if i == 0 {
                karst_core::Halo::Absent
            } else {
                karst_core::Halo::Row(lasts[i - 1].clone())
            };
            let bottom = if i == workers - 1 {
                karst_core::Halo::Absent
            } else {
                karst_core::Halo::Row(firsts[i + 1].clone())
            };
            band.smooth_iteration(&top, &bottom);
        }
    }

    let mut assembled = Vec::new();
    for band in &bands {
        assembled.extend_from_slice(band.grid().cells());
    }
    assert_eq!(assembled, reference.grid().cells());
}
