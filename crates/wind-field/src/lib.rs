//! Gridded Wind-Field Query Engine
//!
//! This crate answers a single question for trajectory validation: what wind
//! did the forecast model predict at a given time, latitude, longitude and
//! altitude? It draws from the two forecast datasets whose valid times bracket
//! the query and, inside each dataset, from the eight grid points surrounding
//! the query in latitude/longitude/pressure-level space.
//!
//! - **Explicit axes**: the latitude, longitude and pressure-level axes are
//!   built once from a reference dataset and shared by every dataset
//! - **Neighbourhood caching**: a single cache miss decodes a whole box of
//!   grid points for every level, so clustered trajectory queries become hits
//! - **Owned resources**: decode handles are opened once per dataset and
//!   released explicitly
//!
//! # Architecture
//!
//! ```text
//! query(t, lat, lon, alt)
//!      │
//!      ├─► DatasetCatalog::resolve ─► DatasetTimeIndex::bracket (t_lo, t_hi)
//!      │
//!      ├─► altitude_to_pressure(alt)
//!      │
//!      ├─► GridAxes::bracket_* (lat, lon + 180, pressure)
//!      │
//!      ├─► for each dataset: 8 corners × (u, v)
//!      │         │
//!      │         ├─► SampleCache hit: return cached value
//!      │         │
//!      │         └─► miss: fetch preload box for every level and field
//!      │
//!      └─► quadrilinear blend per dataset, then linear blend in time
//! ```
//!
//! # Example
//!
//! ```ignore
//! use wind_field::{InMemoryCatalog, WindFieldConfig, WindFieldEngine};
//!
//! let engine = WindFieldEngine::open(config, decoder, catalog, &reference).await?;
//!
//! let wind = engine.query(timestamp_ms, 37.4, -122.1, 15_000.0).await?;
//! println!("{:.1} m/s toward {:.0}°", wind.speed(), wind.bearing_deg());
//!
//! engine.release_all().await?;
//! ```

pub mod axes;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod decoder;
pub mod engine;
pub mod error;
pub mod memory;
pub mod pressure;
pub mod registry;
pub mod timeline;
pub mod types;

// Re-export commonly used types at crate root
pub use axes::{bracket, percent, GridAxes, LONGITUDE_OFFSET};
pub use cache::{DatasetCache, PreloadPolicy, SampleCache};
pub use catalog::{CatalogEntry, DatasetCatalog, InMemoryCatalog};
pub use config::WindFieldConfig;
pub use decoder::ScalarGridDecoder;
pub use engine::WindFieldEngine;
pub use error::{ErrorKind, Result, WindFieldError};
pub use memory::{DecoderCalls, InMemoryDecoder, MemoryHandle};
pub use pressure::{altitude_to_pressure, TROPOPAUSE_ALTITUDE_M};
pub use registry::DatasetRegistry;
pub use timeline::{DatasetBracket, DatasetRef, DatasetTimeIndex};
pub use types::{BoundingBox, Bracket, CacheStats, GridPoint, GridSample, WindVector};
