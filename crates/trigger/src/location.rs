//! Single-shot device geolocation.
//!
//! [`PositionSource`] is the platform seam (permission dialog plus one fix
//! request). [`DeviceLocator`] turns a source into a [`GeolocationProvider`]
//! by asking for permission first and bounding the fix with the request
//! timeout. There is no retry here; callers treat a failure as "no location".

use async_trait::async_trait;
use pulseguard_core::{Coordinates, LocationError, LocationOptions};

/// Acquires the current position once.
#[async_trait]
pub trait GeolocationProvider: Send + Sync {
    async fn acquire(&self) -> Result<Coordinates, LocationError>;
}

/// Platform access to location permission and position fixes.
#[async_trait]
pub trait PositionSource: Send + Sync {
    /// Ask the user (or platform policy) for location access.
    async fn request_permission(&self) -> bool;

    /// Request one fix. Implementations may ignore options they cannot honour.
    async fn current_position(&self, options: &LocationOptions)
        -> Result<Coordinates, LocationError>;
}

/// [`GeolocationProvider`] over a [`PositionSource`].
pub struct DeviceLocator<S> {
    source: S,
    options: LocationOptions,
}

impl<S: PositionSource> DeviceLocator<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            options: LocationOptions::default(),
        }
    }

    pub fn with_options(mut self, options: LocationOptions) -> Self {
        self.options = options;
        self
    }
}

#[async_trait]
impl<S: PositionSource> GeolocationProvider for DeviceLocator<S> {
    async fn acquire(&self) -> Result<Coordinates, LocationError> {
        if !self.source.request_permission().await {
            tracing::info!("Location permission denied");
            return Err(LocationError::PermissionDenied);
        }

        let fix = tokio::time::timeout(
            self.options.timeout,
            self.source.current_position(&self.options),
        )
        .await;

        match fix {
            Ok(Ok(coords)) if coords.is_valid() => {
                tracing::debug!(
                    latitude = coords.latitude,
                    longitude = coords.longitude,
                    accuracy = ?coords.accuracy,
                    "Location acquired"
                );
                Ok(coords)
            }
            Ok(Ok(coords)) => {
                tracing::warn!(?coords, "Discarding out-of-range position fix");
                Err(LocationError::Unavailable)
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Position fix failed");
                Err(e)
            }
            Err(_) => {
                tracing::warn!(timeout_secs = self.options.timeout.as_secs(), "Position fix timed out");
                Err(LocationError::Unavailable)
            }
        }
    }
}

/// Always grants permission and reports the same coordinates.
#[derive(Debug, Clone, Copy)]
pub struct FixedPositionSource {
    coords: Coordinates,
}

impl FixedPositionSource {
    pub fn new(coords: Coordinates) -> Self {
        Self { coords }
    }
}

#[async_trait]
impl PositionSource for FixedPositionSource {
    async fn request_permission(&self) -> bool {
        true
    }

    async fn current_position(
        &self,
        _options: &LocationOptions,
    ) -> Result<Coordinates, LocationError> {
        Ok(self.coords)
    }
}

/// A device with location access refused.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPositionSource;

#[async_trait]
impl PositionSource for NoPositionSource {
    async fn request_permission(&self) -> bool {
        false
    }

    async fn current_position(
        &self,
        _options: &LocationOptions,
    ) -> Result<Coordinates, LocationError> {
        Err(LocationError::PermissionDenied)
    }
}
