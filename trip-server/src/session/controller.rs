//! The trip session: location, destination search, delivery of options and
//! the delay monitor, tied together.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{SessionConfig, TripSearchState, TripStore};
use crate::backend::TransportBackendClient;
use crate::debounce::Debouncer;
use crate::domain::{Coordinate, RouteId, RouteOption, Stop};
use crate::geocode::{Geocoder, place_label};
use crate::location::{
    DEFAULT_LOCATION, LocationFix, PENDING_LABEL, ResolvedLocation, UnknownOrigin,
};
use crate::notify::{Notification, NotificationDraft, NotificationId, NotificationQueue};
use crate::places::{Place, RecentDestinations, is_searchable, nearby_stops, search_destinations};
use crate::resolver::{RoutePath, resolve_options, route_path};
use crate::simulation::{
    DelayMonitor, MonitorContext, RandomDelaySource, SharedDelaySource, initial_alerts, shared,
};

/// Errors from session operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    UnknownOrigin(#[from] UnknownOrigin),

    #[error("unknown route option: {0}")]
    UnknownRoute(RouteId),

    #[error("no destination selected")]
    NoTrip,
}

/// What [`TripSession::select_destination`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStart {
    /// No origin is known, so no options will be delivered.
    Skipped { generation: u64 },
    /// Options will be delivered for this generation.
    Started { generation: u64 },
}

#[derive(Default)]
struct SessionTasks {
    delivery: Option<JoinHandle<()>>,
    monitor: Option<DelayMonitor>,
}

impl SessionTasks {
    fn stop(&mut self) {
        if let Some(delivery) = self.delivery.take() {
            delivery.abort();
        }
        if let Some(monitor) = self.monitor.take() {
            monitor.stop();
        }
    }
}

struct SessionInner<G> {
    geocoder: G,
    backend: Option<TransportBackendClient>,
    store: TripStore,
    queue: NotificationQueue,
    source: SharedDelaySource,
    recent: Option<RecentDestinations>,
    config: SessionConfig,
    debouncer: Debouncer,
    tasks: Mutex<SessionTasks>,
}

/// Builder for [`TripSession`].
pub struct TripSessionBuilder<G> {
    geocoder: G,
    backend: Option<TransportBackendClient>,
    source: Option<SharedDelaySource>,
    recent: Option<RecentDestinations>,
    config: SessionConfig,
}

impl<G: Geocoder + 'static> TripSessionBuilder<G> {
    pub fn with_backend(mut self, backend: TransportBackendClient) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn with_delay_source(mut self, source: SharedDelaySource) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_recent(mut self, recent: RecentDestinations) -> Self {
        self.recent = Some(recent);
        self
    }

    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> TripSession<G> {
        TripSession {
            inner: Arc::new(SessionInner {
                geocoder: self.geocoder,
                backend: self.backend,
                store: TripStore::new(),
                queue: NotificationQueue::new(),
                source: self
                    .source
                    .unwrap_or_else(|| shared(RandomDelaySource::new())),
                recent: self.recent,
                debouncer: Debouncer::new(self.config.debounce),
                config: self.config,
                tasks: Mutex::new(SessionTasks::default()),
            }),
        }
    }
}

/// One user's trip planning session.
///
/// Cloning is cheap; clones share the same state.
pub struct TripSession<G> {
    inner: Arc<SessionInner<G>>,
}

impl<G> Clone for TripSession<G> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<G: Geocoder + 'static> TripSession<G> {
    pub fn builder(geocoder: G) -> TripSessionBuilder<G> {
        TripSessionBuilder {
            geocoder,
            backend: None,
            source: None,
            recent: None,
            config: SessionConfig::default(),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    pub fn geocoder(&self) -> &G {
        &self.inner.geocoder
    }

    pub fn snapshot(&self) -> TripSearchState {
        self.inner.store.snapshot()
    }

    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<TripSearchState> {
        self.inner.store.subscribe()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.inner.queue.list()
    }

    pub fn dismiss(&self, id: NotificationId) -> bool {
        self.inner.queue.dismiss(id)
    }

    /// Recently selected destinations, most recent first.
    pub fn recent(&self) -> Vec<Place> {
        self.inner
            .recent
            .as_ref()
            .map(RecentDestinations::load)
            .unwrap_or_default()
    }

    /// Set the origin.
    ///
    /// A device fix is stored immediately with a placeholder label; the
    /// reverse-geocoded label is filled in later, unless the location has
    /// changed by then.
    pub fn update_location(&self, fix: LocationFix) -> Result<(), SessionError> {
        match fix.resolve()? {
            ResolvedLocation::Labelled(at, label) => {
                debug!(%at, label = %label, "Location set");
                self.set_location(at, label);
            }
            ResolvedLocation::NeedsLabel(at) => {
                self.set_location(at, PENDING_LABEL.to_string());
                let session = self.clone();
                tokio::spawn(async move { session.fill_label(at).await });
            }
        }
        Ok(())
    }

    fn set_location(&self, at: Coordinate, label: String) {
        self.inner.store.update_if(|state| {
            state.current_location = Some(at);
            state.current_location_label = Some(label);
            true
        });
    }

    async fn fill_label(&self, at: Coordinate) {
        let label = place_label(&self.inner.geocoder, at).await;
        let applied = self.inner.store.update_if(|state| {
            if state.current_location != Some(at) {
                return false;
            }
            state.current_location_label = Some(label);
            true
        });
        if !applied {
            debug!(%at, "Location changed during lookup, dropping label");
        }
    }

    /// Search-as-you-type. Suggestions appear after the debounce period,
    /// and only if the query has not changed since.
    pub fn type_query(&self, query: impl Into<String>) {
        let query = query.into();
        let searchable = is_searchable(&query);

        self.inner.store.update_if(|state| {
            state.query = query.clone();
            if !searchable {
                state.suggestions.clear();
            }
            true
        });

        if !searchable {
            self.inner.debouncer.cancel();
            return;
        }

        let session = self.clone();
        self.inner.debouncer.schedule(async move {
            let results = session.search(&query).await;
            session.inner.store.update_if(|state| {
                if state.query != query {
                    return false;
                }
                state.suggestions = results;
                true
            });
        });
    }

    /// Destination suggestions for `query`, without debouncing.
    pub async fn search(&self, query: &str) -> Vec<Place> {
        search_destinations(
            &self.inner.geocoder,
            query,
            self.inner.config.suggestion_limit,
        )
        .await
    }

    /// Choose a destination and start looking for options.
    ///
    /// Any earlier search, its pending results and its monitor are cancelled.
    pub fn select_destination(&self, place: Place) -> SearchStart {
        self.inner.debouncer.cancel();
        self.remember(&place);

        let mut tasks = self.tasks();
        tasks.stop();

        let generation = self.inner.store.begin_search(&place);
        let Some((origin, destination)) = self.inner.store.snapshot().endpoints() else {
            info!(destination = %place.name, "No origin yet, skipping search");
            return SearchStart::Skipped { generation };
        };

        info!(
            generation,
            %origin,
            destination = %place.name,
            "Searching for transport options"
        );
        let session = self.clone();
        tasks.delivery = Some(tokio::spawn(async move {
            session.deliver(generation, origin, destination).await;
        }));

        SearchStart::Started { generation }
    }

    /// Drop the destination and stop monitoring.
    pub fn clear_search(&self) {
        let mut tasks = self.tasks();
        tasks.stop();
        let generation = self.inner.store.clear();
        debug!(generation, "Search cleared");
    }

    async fn deliver(&self, generation: u64, origin: Coordinate, destination: Coordinate) {
        tokio::time::sleep(self.inner.config.result_latency).await;

        let options = self.fetch_options(origin, destination).await;
        if !self.inner.store.deliver(generation, options.clone()) {
            debug!(generation, "Search superseded, discarding options");
            return;
        }

        for alert in initial_alerts(&options, &self.inner.config.delays) {
            self.inner.queue.push(alert);
        }

        let mut tasks = self.tasks();
        if self.inner.store.generation() == generation {
            tasks.monitor = Some(DelayMonitor::spawn(self.monitor_context(), generation));
            tasks.delivery = None;
        }
    }

    async fn fetch_options(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Vec<RouteOption> {
        if let Some(backend) = &self.inner.backend {
            match backend.fetch_options(origin, destination).await {
                Ok(options) if !options.is_empty() => return options,
                Ok(_) => debug!("Backend returned no options, using built-in resolver"),
                Err(e) => {
                    warn!(error = %e, "Failed to fetch transport options");
                    self.inner
                        .queue
                        .push(NotificationDraft::error("Failed to fetch transport options"));
                }
            }
        }
        resolve_options(origin, destination)
    }

    fn monitor_context(&self) -> MonitorContext {
        MonitorContext {
            store: self.inner.store.clone(),
            queue: self.inner.queue.clone(),
            source: Arc::clone(&self.inner.source),
            backend: self.inner.backend.clone(),
            config: self.inner.config.delays.clone(),
        }
    }

    fn remember(&self, place: &Place) {
        if let Some(recent) = &self.inner.recent
            && let Err(e) = recent.record(place)
        {
            warn!(error = %e, "Failed to save recent destination");
        }
    }

    fn tasks(&self) -> MutexGuard<'_, SessionTasks> {
        self.inner
            .tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn find_option(
        &self,
        route_id: &RouteId,
    ) -> Result<(usize, RouteOption, TripSearchState), SessionError> {
        let state = self.snapshot();
        let (index, option) = state
            .active_options
            .iter()
            .enumerate()
            .find(|(_, option)| &option.id == route_id)
            .map(|(index, option)| (index, option.clone()))
            .ok_or_else(|| SessionError::UnknownRoute(route_id.clone()))?;
        Ok((index, option, state))
    }

    /// The map polyline for one of the active options.
    pub fn view_on_map(&self, route_id: &RouteId) -> Result<RoutePath, SessionError> {
        let (index, option, state) = self.find_option(route_id)?;
        let (origin, destination) = state.endpoints().ok_or(SessionError::NoTrip)?;

        self.inner.queue.push(NotificationDraft::info(format!(
            "Showing {} on map",
            option.route_name
        )));
        Ok(route_path(origin, destination, &option, index))
    }

    /// Confirm the choice of one of the active options.
    pub fn start_journey(&self, route_id: &RouteId) -> Result<RouteOption, SessionError> {
        let (_, option, _) = self.find_option(route_id)?;

        info!(route = %option.id, "Journey started");
        self.inner.queue.push(NotificationDraft::success(format!(
            "Journey started with {}!",
            option.route_name
        )));
        Ok(option)
    }

    /// Stops around `at`, or around the current origin.
    ///
    /// Uses the backend when configured, the built-in stop list otherwise or
    /// when the backend fails.
    pub async fn nearby_stops(
        &self,
        at: Option<Coordinate>,
        radius_m: Option<u32>,
    ) -> Vec<Stop> {
        let at = at
            .or(self.snapshot().current_location)
            .unwrap_or(DEFAULT_LOCATION);
        let radius_m = radius_m.unwrap_or(self.inner.config.stop_radius_m);

        if let Some(backend) = &self.inner.backend {
            match backend.nearby_stops(at, radius_m).await {
                Ok(stops) => return stops,
                Err(e) => warn!(error = %e, "Nearby stop lookup failed, using built-in stops"),
            }
        }
        nearby_stops(at, radius_m)
    }
}
