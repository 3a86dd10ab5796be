//! # KARST Core
//!
//! Deterministic cellular-automaton cave generation over partitioned grids.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Same seed always produces the same cave
//! 2. **Partition-independent**: A cell's initial draw depends only on its
//!    global index, never on which worker owns its row band
//! 3. **Double-buffered**: A smoothing pass never reads a cell it already
//!    rewrote in the same iteration
//! 4. **Explicit edges**: Absent neighbors are a first-class sentinel, not
//!    an ad hoc bounds check
//!
//! ## Core Components
//!
//! - `Cell`/`Grid`/`Halo`: binary map storage and borrowed boundary rows
//! - `Partition`: contiguous row-band plan for any worker count
//! - `MapSeed`/`NoiseStream`: offsettable deterministic draw streams
//! - `BandGenerator`: one worker's band through init and smoothing
//! - `MapConfig`: validated generation parameters
//!
//! ## Example
//!
//! ```rust,ignore
//! use karst_core::{BandGenerator, Halo, MapConfig, MapSeed, Partition};
//!
//! let config = MapConfig::default();
//! let part = Partition::for_worker(config.height as usize, 1, 0);
//! let mut band = BandGenerator::new(&config, part, MapSeed::new(42));
//! band.initialize(config.fill_probability);
//! for _ in 0..config.smoothing_iterations {
//!     band.smooth_iteration(&Halo::Absent, &Halo::Absent);
//! }
//! ```

pub mod band;
pub mod config;
pub mod error;
pub mod grid;
pub mod partition;
pub mod seed;

pub use band::{smooth_rows_into, BandGenerator};
pub use config::MapConfig;
pub use error::{CoreError, CoreResult};
pub use grid::{Cell, Grid, Halo};
pub use partition::Partition;
pub use seed::{MapSeed, NoiseStream};
