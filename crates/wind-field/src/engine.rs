//! Wind query engine.
//!
//! Combines the time index, the altitude transform, the grid axes and the
//! per-dataset sample caches into one interpolated wind vector:
//!
//! 1. bracket the query time between two datasets
//! 2. convert altitude to pressure
//! 3. bracket latitude, longitude and pressure on the grid axes
//! 4. read the 8 corners of both wind components from each dataset
//! 5. blend the corners per dataset (quadrilinear), then blend in time
//!
//! Every blend uses the inverted weight of [`crate::axes::percent`]: a weight
//! of 1 on an axis selects its lower bound.

use std::fmt;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, trace, warn};

use crate::axes::{GridAxes, LONGITUDE_OFFSET};
use crate::cache::PreloadPolicy;
use crate::catalog::{CatalogEntry, DatasetCatalog};
use crate::config::WindFieldConfig;
use crate::decoder::ScalarGridDecoder;
use crate::error::{Result, WindFieldError};
use crate::pressure::altitude_to_pressure;
use crate::registry::DatasetRegistry;
use crate::timeline::{DatasetBracket, DatasetRef, DatasetTimeIndex};
use crate::types::{Bracket, CacheStats, GridPoint, WindVector};

/// Spatial brackets and lower-bound weights for one query position.
#[derive(Debug, Clone, Copy)]
struct CellWeights {
    latitude: Bracket,
    longitude: Bracket,
    level: Bracket,
    lat_weight: f64,
    lon_weight: f64,
    level_weight: f64,
}

/// Time index built from the last catalog resolution.
struct ResolvedIndex {
    entries: Vec<CatalogEntry>,
    index: Arc<DatasetTimeIndex>,
}

/// Interpolating wind lookup over a catalog of forecast datasets.
pub struct WindFieldEngine<D: ScalarGridDecoder, C: DatasetCatalog> {
    config: WindFieldConfig,
    axes: GridAxes,
    policy: PreloadPolicy,
    catalog: C,
    registry: DatasetRegistry<D>,
    time_index: RwLock<Option<ResolvedIndex>>,
}

impl<D: ScalarGridDecoder, C: DatasetCatalog> WindFieldEngine<D, C> {
    /// Create an engine with axes built from a reference dataset.
    ///
    /// The reference dataset stays open afterwards, so querying it later
    /// does not open it a second time. If the axes cannot be built, the
    /// reference dataset is closed again before the error is returned.
    pub async fn open(
        config: WindFieldConfig,
        decoder: D,
        catalog: C,
        reference: &DatasetRef,
    ) -> Result<Self> {
        config.validate().map_err(WindFieldError::Configuration)?;

        let registry = DatasetRegistry::new(decoder);
        let axes = match reference_axes(&registry, &config, reference).await {
            Ok(axes) => axes,
            Err(e) => {
                if let Err(close_err) = registry.release(&reference.id).await {
                    warn!(
                        dataset = %reference.id,
                        error = %close_err,
                        "Failed to close reference dataset"
                    );
                }
                return Err(e);
            }
        };

        Ok(Self::from_parts(config, axes, catalog, registry))
    }

    /// Create an engine with pre-built axes.
    pub fn with_axes(
        config: WindFieldConfig,
        decoder: D,
        catalog: C,
        axes: GridAxes,
    ) -> Result<Self> {
        config.validate().map_err(WindFieldError::Configuration)?;
        Ok(Self::from_parts(config, axes, catalog, DatasetRegistry::new(decoder)))
    }

    fn from_parts(
        config: WindFieldConfig,
        axes: GridAxes,
        catalog: C,
        registry: DatasetRegistry<D>,
    ) -> Self {
        let policy = config.preload_policy();
        Self {
            config,
            axes,
            policy,
            catalog,
            registry,
            time_index: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &WindFieldConfig {
        &self.config
    }

    pub fn axes(&self) -> &GridAxes {
        &self.axes
    }

    pub fn decoder(&self) -> &D {
        self.registry.decoder()
    }

    /// Interpolated wind at a time (ms since epoch), position and altitude (m).
    ///
    /// Positions outside the grid and times outside the catalog clamp to the
    /// nearest edge.
    pub async fn query(
        &self,
        timestamp_ms: i64,
        latitude: f64,
        longitude: f64,
        altitude_m: f64,
    ) -> Result<WindVector> {
        let datasets = self.bracket_datasets(timestamp_ms).await?;
        let pressure = altitude_to_pressure(altitude_m);
        let cell = self.cell_weights(latitude, longitude, pressure);

        let earlier = self.interpolate_dataset(&datasets.earlier, &cell).await?;
        let later = self.interpolate_dataset(&datasets.later, &cell).await?;

        let time_weight = datasets.percent(timestamp_ms);
        let wind = WindVector::blend(earlier, later, time_weight);

        trace!(
            timestamp_ms,
            latitude,
            longitude,
            altitude_m,
            pressure,
            earlier = %datasets.earlier.id,
            later = %datasets.later.id,
            time_weight,
            eastward = wind.eastward,
            northward = wind.northward,
            "Wind query"
        );

        Ok(wind)
    }

    /// The two datasets whose valid times surround `timestamp_ms`.
    ///
    /// The catalog is resolved on every call. The time index is rebuilt only
    /// when the resolved entries differ from the previous call.
    pub async fn bracket_datasets(&self, timestamp_ms: i64) -> Result<DatasetBracket> {
        let entries = self.catalog.resolve(timestamp_ms).await?;
        let index = self.time_index_for(entries).await?;
        Ok(index.bracket(timestamp_ms))
    }

    async fn time_index_for(&self, entries: Vec<CatalogEntry>) -> Result<Arc<DatasetTimeIndex>> {
        if let Some(resolved) = self.time_index.read().await.as_ref() {
            if resolved.entries == entries {
                return Ok(resolved.index.clone());
            }
        }

        let index = Arc::new(DatasetTimeIndex::from_entries(
            entries.clone(),
            &self.config.usable_forecast_hours,
        )?);
        debug!(
            entries = entries.len(),
            datasets = index.datasets().len(),
            "Rebuilt dataset time index"
        );

        *self.time_index.write().await = Some(ResolvedIndex {
            entries,
            index: index.clone(),
        });
        Ok(index)
    }

    /// Read one decoded sample at an exact grid point.
    pub async fn sample(&self, dataset: &DatasetRef, point: GridPoint, field: &str) -> Result<f64> {
        let cache = self.registry.acquire(&dataset.id).await?;
        cache
            .sample(self.registry.decoder(), &self.axes, &self.policy, point, field)
            .await
    }

    /// Spatially interpolated wind inside one dataset.
    ///
    /// `longitude` is the query longitude before the +180 grid shift.
    pub async fn vector_at(
        &self,
        dataset: &DatasetRef,
        latitude: f64,
        longitude: f64,
        pressure_hpa: f64,
    ) -> Result<WindVector> {
        let cell = self.cell_weights(latitude, longitude, pressure_hpa);
        self.interpolate_dataset(dataset, &cell).await
    }

    fn cell_weights(&self, latitude: f64, longitude: f64, pressure: f64) -> CellWeights {
        let lat = self.axes.bracket_latitude(latitude);
        let lon = self.axes.bracket_longitude(longitude);
        let level = self.axes.bracket_level(pressure);
        CellWeights {
            latitude: lat,
            longitude: lon,
            level,
            lat_weight: lat.percent(latitude),
            lon_weight: lon.percent(longitude + LONGITUDE_OFFSET),
            level_weight: level.percent(pressure),
        }
    }

    async fn interpolate_dataset(
        &self,
        dataset: &DatasetRef,
        cell: &CellWeights,
    ) -> Result<WindVector> {
        let cache = self.registry.acquire(&dataset.id).await?;
        let decoder = self.registry.decoder();

        // corners[lat][lon][level], index 0 = lower bound
        let mut corners = [[[WindVector::default(); 2]; 2]; 2];
        for (i, latitude) in cell.latitude.bounds().into_iter().enumerate() {
            for (j, longitude) in cell.longitude.bounds().into_iter().enumerate() {
                for (k, level) in cell.level.bounds().into_iter().enumerate() {
                    let point = GridPoint::new(latitude, longitude, level);
                    let eastward = cache
                        .sample(decoder, &self.axes, &self.policy, point, self.eastward())
                        .await?;
                    let northward = cache
                        .sample(decoder, &self.axes, &self.policy, point, self.northward())
                        .await?;
                    corners[i][j][k] = WindVector::new(eastward, northward);
                }
            }
        }

        Ok(quadrilinear(&corners, cell))
    }

    fn eastward(&self) -> &str {
        &self.config.eastward_field
    }

    fn northward(&self) -> &str {
        &self.config.northward_field
    }

    /// Close one dataset and drop its cached samples.
    pub async fn release(&self, dataset_id: &str) -> Result<bool> {
        self.registry.release(dataset_id).await
    }

    /// Close every open dataset. Returns how many were closed.
    pub async fn release_all(&self) -> Result<usize> {
        self.registry.release_all().await
    }

    pub async fn open_datasets(&self) -> Vec<String> {
        self.registry.open_datasets().await
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.registry.cache_stats().await
    }
}

impl<D: ScalarGridDecoder, C: DatasetCatalog> fmt::Debug for WindFieldEngine<D, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindFieldEngine")
            .field("config", &self.config)
            .field("axes", &self.axes)
            .finish_non_exhaustive()
    }
}

/// Open the reference dataset and read the grid axes from it.
async fn reference_axes<D: ScalarGridDecoder>(
    registry: &DatasetRegistry<D>,
    config: &WindFieldConfig,
    reference: &DatasetRef,
) -> Result<GridAxes> {
    let dataset = registry.acquire(&reference.id).await?;
    GridAxes::from_reference(
        registry.decoder(),
        dataset.handle(),
        &config.eastward_field,
        config.min_altitude_m,
    )
    .await
}

/// Nested blend of the 8 corners: level first, then longitude, then latitude.
fn quadrilinear(corners: &[[[WindVector; 2]; 2]; 2], cell: &CellWeights) -> WindVector {
    let along_level = |i: usize, j: usize| {
        WindVector::blend(corners[i][j][0], corners[i][j][1], cell.level_weight)
    };
    let along_lon =
        |i: usize| WindVector::blend(along_level(i, 0), along_level(i, 1), cell.lon_weight);
    WindVector::blend(along_lon(0), along_lon(1), cell.lat_weight)
}
