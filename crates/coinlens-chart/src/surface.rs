//! Rendering-surface lifecycle.
//!
//! [`ChartSurface`] owns the single rendering resource bound to one chart
//! container and enforces its state machine:
//! `Uninitialized -> Created -> {resize/set_data self-loop} -> Destroyed`.
//! `Destroyed` is terminal; operations on a destroyed surface are rejected
//! with [`SurfaceError::Disposed`] so lifecycle bugs stay observable.

use coinlens_core::Candle;
use thiserror::Error;

/// Display configuration consumed at surface creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceConfig {
    /// Chart height in pixels.
    pub height: u32,
    /// Whether the time axis shows clock time or date-only granularity.
    pub show_intraday_time: bool,
}

/// Operation rejected because the surface was already torn down.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("surface has been disposed")]
    Disposed,
}

/// The concrete rendering capability behind the surface.
///
/// Implementations own pixel-level concerns (drawing, themes); the surface
/// only sequences their lifecycle. `apply_series` replaces the full visible
/// series and is expected to re-fit the visible time range to the new extent.
pub trait SurfaceBackend {
    fn init(&mut self, width: u32, config: &SurfaceConfig);
    fn apply_width(&mut self, width: u32);
    fn apply_series(&mut self, candles: &[Candle]);
    fn apply_time_axis(&mut self, show_intraday_time: bool);
    fn release(&mut self);
}

/// Owns one created rendering surface for the lifetime of a mounted chart.
pub struct ChartSurface {
    backend: Box<dyn SurfaceBackend>,
    width: u32,
    disposed: bool,
}

impl ChartSurface {
    /// Allocate the rendering resource, sized to the container's width.
    ///
    /// Call at most once per container without an intervening destroy; the
    /// controller guarantees this by holding at most one surface per session.
    pub fn create(mut backend: Box<dyn SurfaceBackend>, width: u32, config: &SurfaceConfig) -> Self {
        backend.init(width, config);
        Self {
            backend,
            width,
            disposed: false,
        }
    }

    /// Apply a new container width. Idempotent: the same width twice is a no-op.
    pub fn resize(&mut self, width: u32) -> Result<(), SurfaceError> {
        self.check_live()?;
        if width != self.width {
            self.width = width;
            self.backend.apply_width(width);
        }
        Ok(())
    }

    /// Replace the full visible series. An empty series renders an empty
    /// surface, not an error.
    pub fn set_data(&mut self, candles: &[Candle]) -> Result<(), SurfaceError> {
        self.check_live()?;
        self.backend.apply_series(candles);
        Ok(())
    }

    /// Update the time-axis display hint.
    pub fn set_time_axis(&mut self, show_intraday_time: bool) -> Result<(), SurfaceError> {
        self.check_live()?;
        self.backend.apply_time_axis(show_intraday_time);
        Ok(())
    }

    /// Release the rendering resource. Terminal; safe to call again during
    /// teardown (the second call is a no-op).
    pub fn destroy(&mut self) {
        if !self.disposed {
            self.disposed = true;
            self.backend.release();
        }
    }

    /// Current container width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn check_live(&self) -> Result<(), SurfaceError> {
        if self.disposed {
            Err(SurfaceError::Disposed)
        } else {
            Ok(())
        }
    }
}

impl Drop for ChartSurface {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::recording::{Call, RecordingBackend};

    fn surface(width: u32) -> (ChartSurface, RecordingBackend) {
        let backend = RecordingBackend::new();
        let config = SurfaceConfig {
            height: 360,
            show_intraday_time: true,
        };
        let surface = ChartSurface::create(Box::new(backend.clone()), width, &config);
        (surface, backend)
    }

    #[test]
    fn test_create_initializes_backend() {
        let (surface, backend) = surface(800);
        assert_eq!(surface.width(), 800);
        assert_eq!(backend.calls(), vec![Call::Init { width: 800 }]);
    }

    #[test]
    fn test_resize_same_width_is_noop() {
        let (mut surface, backend) = surface(800);
        surface.resize(800).unwrap();
        surface.resize(800).unwrap();
        surface.resize(640).unwrap();
        surface.resize(640).unwrap();
        assert_eq!(
            backend.calls(),
            vec![Call::Init { width: 800 }, Call::Width(640)]
        );
        assert_eq!(surface.width(), 640);
    }

    #[test]
    fn test_set_data_accepts_empty_series() {
        let (mut surface, backend) = surface(800);
        surface.set_data(&[]).unwrap();
        assert_eq!(
            backend.calls(),
            vec![Call::Init { width: 800 }, Call::Series(0)]
        );
    }

    #[test]
    fn test_destroyed_surface_rejects_operations() {
        let (mut surface, _backend) = surface(800);
        surface.destroy();
        assert_eq!(surface.resize(640), Err(SurfaceError::Disposed));
        assert_eq!(surface.set_data(&[]), Err(SurfaceError::Disposed));
        assert_eq!(surface.set_time_axis(false), Err(SurfaceError::Disposed));
    }

    #[test]
    fn test_destroy_releases_exactly_once() {
        let (mut surface, backend) = surface(800);
        surface.destroy();
        surface.destroy();
        drop(surface);
        let releases = backend
            .calls()
            .iter()
            .filter(|c| **c == Call::Release)
            .count();
        assert_eq!(releases, 1);
    }
}
