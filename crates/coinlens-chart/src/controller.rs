//! Chart data controller.
//!
//! Ties user intent and asynchronous data arrival to surface state. Fetch
//! results and live ticks arrive over a channel and are drained in
//! [`ChartController::update`], so every session mutation happens
//! synchronously on the consumer's thread. Each causal edge is an explicit
//! call: period changed -> refetch, tick arrived -> merge, container
//! resized -> resurface.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use coinlens_core::{convert_ohlc, Candle, Period, RawOhlc, TimestampUnit};
use coinlens_data::{CoinGeckoClient, DataError};

use crate::surface::{ChartSurface, SurfaceBackend, SurfaceConfig};

/// Messages delivered to the controller by fetch tasks and live feeds.
#[derive(Debug)]
pub enum ChartEvent {
    /// A historical fetch resolved, tagged with the period it was issued for.
    HistoryLoaded {
        period: Period,
        result: Result<Vec<RawOhlc>, DataError>,
    },
    /// A live tick for the most recent, possibly still-open, interval.
    LiveTick(Candle),
}

/// The live state of one mounted chart instance.
pub struct ChartController {
    coin_id: String,
    period: Period,
    series: Vec<Candle>,
    surface: Option<ChartSurface>,
    /// Backend held until the container becomes measurable.
    pending_backend: Option<Box<dyn SurfaceBackend>>,
    height: u32,
    container_width: u32,
    mounted: bool,
    /// Period of the latest issued fetch, if one is outstanding.
    in_flight: Option<Period>,
    dropped_candles: u64,
    event_tx: Sender<ChartEvent>,
    event_rx: Receiver<ChartEvent>,
}

impl ChartController {
    pub fn new(
        coin_id: &str,
        initial_period: Period,
        height: u32,
        backend: Box<dyn SurfaceBackend>,
    ) -> Self {
        let (event_tx, event_rx) = mpsc::channel();
        Self {
            coin_id: coin_id.to_string(),
            period: initial_period,
            series: Vec::new(),
            surface: None,
            pending_backend: Some(backend),
            height,
            container_width: 0,
            mounted: false,
            in_flight: None,
            dropped_candles: 0,
            event_tx,
            event_rx,
        }
    }

    /// Sender for fetch tasks and live feeds to deliver events into this session.
    pub fn event_sender(&self) -> Sender<ChartEvent> {
        self.event_tx.clone()
    }

    /// Establish the session with initial data.
    ///
    /// Converts the provided wire tuples and, if the container is already
    /// measurable (`container_width > 0`), creates the surface and pushes
    /// the series. At width 0 surface creation is deferred to the first
    /// resize callback.
    pub fn mount(&mut self, initial: &[RawOhlc], unit: TimestampUnit, container_width: u32) {
        self.mounted = true;
        self.container_width = container_width;

        let converted = convert_ohlc(initial, unit);
        if converted.dropped > 0 {
            log::warn!(
                "{}: dropped {} malformed candles from initial data",
                self.coin_id,
                converted.dropped
            );
            self.dropped_candles += converted.dropped as u64;
        }
        self.series = converted.candles;

        if container_width > 0 {
            self.create_surface();
        }
    }

    fn create_surface(&mut self) {
        let Some(backend) = self.pending_backend.take() else {
            return;
        };
        let config = SurfaceConfig {
            height: self.height,
            show_intraday_time: self.period.config().show_intraday_time,
        };
        let mut surface = ChartSurface::create(backend, self.container_width, &config);
        if let Err(e) = surface.set_data(&self.series) {
            log::error!("{}: initial set_data failed: {e}", self.coin_id);
        }
        self.surface = Some(surface);
    }

    /// React to a container width change from the external resize observer.
    ///
    /// Callbacks arriving after unmount are no-ops. Rapid successive widths
    /// may be coalesced by the observer; each delivered width is applied.
    pub fn on_resize(&mut self, width: u32) {
        if !self.mounted || width == 0 {
            return;
        }
        self.container_width = width;
        match &mut self.surface {
            Some(surface) => {
                if let Err(e) = surface.resize(width) {
                    log::error!("{}: resize on disposed surface: {e}", self.coin_id);
                }
            }
            None => self.create_surface(),
        }
    }

    /// Request a switch to a new period.
    ///
    /// Idempotent for the current period. Otherwise the period updates
    /// immediately (optimistic) and the period to fetch is returned; the
    /// caller issues the fetch and delivers the tagged result through the
    /// event channel. Stale results are discarded on arrival
    /// (last-request-wins).
    #[must_use]
    pub fn request_period_change(&mut self, new_period: Period) -> Option<Period> {
        if new_period == self.period {
            return None;
        }
        self.period = new_period;
        self.in_flight = Some(new_period);
        if let Some(surface) = &mut self.surface {
            if let Err(e) = surface.set_time_axis(new_period.config().show_intraday_time) {
                log::error!("{}: time axis update failed: {e}", self.coin_id);
            }
        }
        Some(new_period)
    }

    /// Merge a live tick into the series and refresh the surface.
    ///
    /// Equal timestamp replaces the still-accumulating last candle; strictly
    /// greater appends; strictly less is stale and ignored. The full series
    /// is pushed after merging: final displayed state is the contract, not
    /// update efficiency.
    pub fn on_live_tick(&mut self, tick: Candle) {
        if !self.mounted {
            return;
        }
        match self.series.last().map(|c| c.timestamp) {
            Some(last_ts) if tick.timestamp < last_ts => {
                log::debug!(
                    "{}: stale live tick {} < {}, ignored",
                    self.coin_id,
                    tick.timestamp,
                    last_ts
                );
                return;
            }
            Some(last_ts) if tick.timestamp == last_ts => {
                if let Some(last) = self.series.last_mut() {
                    *last = tick;
                }
            }
            _ => self.series.push(tick),
        }
        self.push_series();
    }

    /// Drain pending events and apply them to the session.
    pub fn update(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            if !self.mounted {
                continue;
            }
            match event {
                ChartEvent::HistoryLoaded { period, result } => {
                    self.apply_history(period, result)
                }
                ChartEvent::LiveTick(tick) => self.on_live_tick(tick),
            }
        }
    }

    fn apply_history(&mut self, period: Period, result: Result<Vec<RawOhlc>, DataError>) {
        if period != self.period {
            // Superseded by a newer request while in flight.
            log::debug!(
                "{}: discarding stale {} fetch (current period {})",
                self.coin_id,
                period.label(),
                self.period.label()
            );
            return;
        }
        if self.in_flight == Some(period) {
            self.in_flight = None;
        }
        match result {
            Ok(raw) => {
                let converted = convert_ohlc(&raw, TimestampUnit::Milliseconds);
                if converted.dropped > 0 {
                    log::warn!(
                        "{}: dropped {} malformed candles from {} fetch",
                        self.coin_id,
                        converted.dropped,
                        period.label()
                    );
                    self.dropped_candles += converted.dropped as u64;
                }
                self.series = converted.candles;
                self.push_series();
            }
            Err(e) => {
                // Keep showing the last-known-good series.
                log::error!("{}: {} fetch failed: {e}", self.coin_id, period.label());
            }
        }
    }

    fn push_series(&mut self) {
        if let Some(surface) = &mut self.surface {
            if let Err(e) = surface.set_data(&self.series) {
                log::error!("{}: set_data on disposed surface: {e}", self.coin_id);
            }
        }
    }

    /// Tear down the session. The surface is destroyed exactly once; events
    /// that resolve afterwards are drained and dropped.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.in_flight = None;
        if let Some(mut surface) = self.surface.take() {
            surface.destroy();
        }
        self.series.clear();
    }

    pub fn coin_id(&self) -> &str {
        &self.coin_id
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn series(&self) -> &[Candle] {
        &self.series
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Total malformed candles dropped over the session lifetime.
    pub fn dropped_candles(&self) -> u64 {
        self.dropped_candles
    }
}

/// Issue a historical fetch for `period` and deliver the tagged result to
/// the controller's event channel.
pub fn spawn_history_fetch(
    client: Arc<CoinGeckoClient>,
    coin_id: String,
    period: Period,
    tx: Sender<ChartEvent>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let result = client.ohlc(&coin_id, period).await;
        // Receiver gone means the session unmounted; nothing to do.
        let _ = tx.send(ChartEvent::HistoryLoaded { period, result });
    })
}
