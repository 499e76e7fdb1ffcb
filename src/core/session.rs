use crate::core::proximity;
use crate::core::{Coordinates, ErrorKind, Facility, PermissionState, RouteResult, SessionState};
use crate::domain::ports::{FacilityDirectory, LocationProvider, RoutingProvider};
use crate::utils::error::NavError;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Everything that can change the session state. UI inputs and completed
/// async operations funnel through the same queue, so the state itself is
/// only ever touched from one task.
#[derive(Debug)]
enum SessionEvent {
    PermissionResolved(PermissionState),
    LocationResolved(Coordinates),
    LocationFailed(NavError),
    FacilitiesLoaded(Vec<Facility>),
    FacilitiesFailed(NavError),
    RouteResolved { seq: u64, route: RouteResult },
    RouteFailed { seq: u64, error: NavError },
    MarkerSelected(String),
    BackgroundTapped,
    SearchChanged(String),
    RefreshRequested,
    Shutdown,
}

/// Owns the collaborators for one map session. `mount` spawns the event loop
/// and hands back a [`SessionHandle`] for the presentation layer.
pub struct SessionCoordinator {
    directory: Arc<dyn FacilityDirectory>,
    location: Arc<dyn LocationProvider>,
    routing: Arc<dyn RoutingProvider>,
}

impl SessionCoordinator {
    pub fn new(
        directory: Arc<dyn FacilityDirectory>,
        location: Arc<dyn LocationProvider>,
        routing: Arc<dyn RoutingProvider>,
    ) -> Self {
        Self {
            directory,
            location,
            routing,
        }
    }

    /// Starts the session: spawns the coordinator task and kicks off the two
    /// startup operations (permission/position flow and facility fetch)
    /// concurrently.
    pub fn mount(self) -> SessionHandle {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(SessionState::new());

        let worker = SessionWorker {
            state: SessionState::new(),
            directory: self.directory,
            location: self.location,
            routing: self.routing,
            events_tx: events_tx.clone(),
            state_tx,
            route_seq: 0,
            routed_to: None,
            location_settled: false,
            facilities_settled: false,
        };
        let task = tokio::spawn(worker.run(events_rx));

        SessionHandle {
            events: events_tx,
            state_rx,
            task: Some(task),
        }
    }
}

/// Live connection to a mounted session. Input methods never block; state is
/// observed through cheap snapshot reads or a watch subscription.
pub struct SessionHandle {
    events: mpsc::UnboundedSender<SessionEvent>,
    state_rx: watch::Receiver<SessionState>,
    task: Option<JoinHandle<()>>,
}

impl SessionHandle {
    /// Latest published snapshot.
    pub fn state(&self) -> SessionState {
        self.state_rx.borrow().clone()
    }

    /// A watch subscription for callers that want to react to every change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_rx.clone()
    }

    pub fn on_marker_selected(&self, facility_id: &str) {
        self.send(SessionEvent::MarkerSelected(facility_id.to_string()));
    }

    pub fn on_map_background_tapped(&self) {
        self.send(SessionEvent::BackgroundTapped);
    }

    pub fn on_search_text_changed(&self, text: &str) {
        self.send(SessionEvent::SearchChanged(text.to_string()));
    }

    /// Re-runs the facility fetch, and the position query when access was
    /// already granted. The permission prompt is never repeated.
    pub fn refresh(&self) {
        self.send(SessionEvent::RefreshRequested);
    }

    /// Waits until both startup operations have settled and returns that
    /// snapshot. Also returns early if the session ends first.
    pub async fn settled(&self) -> SessionState {
        let mut rx = self.state_rx.clone();
        loop {
            let snapshot = rx.borrow_and_update().clone();
            if !snapshot.loading {
                return snapshot;
            }
            if rx.changed().await.is_err() {
                return snapshot;
            }
        }
    }

    /// Unmounts the session and waits for the coordinator task to finish.
    /// Results of operations still in flight are dropped, never applied.
    pub async fn shutdown(mut self) {
        let _ = self.events.send(SessionEvent::Shutdown);
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }

    fn send(&self, event: SessionEvent) {
        if self.events.send(event).is_err() {
            tracing::debug!("Session already shut down; input event dropped");
        }
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        let _ = self.events.send(SessionEvent::Shutdown);
    }
}

/// The coordinator task: single owner of the session state. Applies events
/// one at a time and publishes a snapshot after each.
struct SessionWorker {
    state: SessionState,
    directory: Arc<dyn FacilityDirectory>,
    location: Arc<dyn LocationProvider>,
    routing: Arc<dyn RoutingProvider>,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    state_tx: watch::Sender<SessionState>,
    /// Monotonic id of the newest route request; anything older is stale.
    route_seq: u64,
    /// Facility id the newest route request was issued for.
    routed_to: Option<String>,
    location_settled: bool,
    facilities_settled: bool,
}

impl SessionWorker {
    async fn run(mut self, mut events: mpsc::UnboundedReceiver<SessionEvent>) {
        tracing::info!("Session mounted; resolving permission and facility directory");
        self.spawn_facility_fetch();
        self.spawn_permission_flow();

        while let Some(event) = events.recv().await {
            if matches!(event, SessionEvent::Shutdown) {
                tracing::info!("Session unmounted; in-flight results will be dropped");
                break;
            }
            self.apply(event);
            if self.state_tx.send(self.state.clone()).is_err() {
                // Every observer is gone, nothing left to publish for.
                break;
            }
        }
    }

    fn apply(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::PermissionResolved(permission) => {
                tracing::info!("Location permission resolved: {:?}", permission);
                self.state.permission_state = permission;
                if permission == PermissionState::Denied {
                    self.state.last_error = Some(ErrorKind::PermissionDenied);
                    self.location_settled = true;
                }
            }
            SessionEvent::LocationResolved(position) => {
                self.location_settled = true;
                if position.is_valid() {
                    tracing::info!(
                        "📥 Position acquired: ({}, {})",
                        position.latitude,
                        position.longitude
                    );
                    self.state.current_location = Some(position);
                    self.recompute_nearest();
                } else {
                    tracing::error!(
                        "❌ Platform reported an out-of-range position: ({}, {})",
                        position.latitude,
                        position.longitude
                    );
                    self.state.last_error = Some(ErrorKind::InvalidCoordinate);
                }
            }
            SessionEvent::LocationFailed(error) => {
                self.location_settled = true;
                tracing::error!("❌ Position lookup failed: {}", error);
                self.state.last_error = Some(match error {
                    NavError::PermissionDenied => ErrorKind::PermissionDenied,
                    _ => ErrorKind::LocationUnavailable,
                });
            }
            SessionEvent::FacilitiesLoaded(facilities) => {
                self.facilities_settled = true;
                tracing::info!("📥 Facility directory loaded: {} entries", facilities.len());
                self.state.facilities = facilities;
                self.recompute_nearest();
            }
            SessionEvent::FacilitiesFailed(error) => {
                self.facilities_settled = true;
                tracing::error!("❌ Facility fetch failed: {}", error);
                // Whatever list was loaded before stays on screen.
                self.state.last_error = Some(ErrorKind::FetchFailed);
            }
            SessionEvent::RouteResolved { seq, route } => {
                if seq == self.route_seq {
                    tracing::info!(
                        "✅ Route resolved: {} min over {} waypoints",
                        route.duration_minutes,
                        route.path.len()
                    );
                    self.state.route = Some(route);
                } else {
                    tracing::debug!(
                        "⏭️ Dropping stale route response (seq {}, current {})",
                        seq,
                        self.route_seq
                    );
                }
            }
            SessionEvent::RouteFailed { seq, error } => {
                if seq == self.route_seq {
                    tracing::error!("❌ Route request failed: {}", error);
                    self.state.last_error = Some(ErrorKind::RouteUnavailable);
                } else {
                    tracing::debug!(
                        "⏭️ Dropping stale route failure (seq {}, current {})",
                        seq,
                        self.route_seq
                    );
                }
            }
            SessionEvent::MarkerSelected(facility_id) => {
                match self
                    .state
                    .facilities
                    .iter()
                    .find(|facility| facility.id == facility_id)
                {
                    Some(facility) => self.state.selected = Some(facility.clone()),
                    None => {
                        tracing::debug!("Ignoring selection of unknown facility: {}", facility_id)
                    }
                }
            }
            SessionEvent::BackgroundTapped => {
                self.state.selected = None;
            }
            SessionEvent::SearchChanged(query) => {
                self.state.search_query = query;
            }
            SessionEvent::RefreshRequested => {
                tracing::info!("🔄 Refresh requested");
                self.facilities_settled = false;
                self.spawn_facility_fetch();
                if self.state.permission_state == PermissionState::Granted {
                    self.location_settled = false;
                    self.spawn_position_query();
                }
            }
            // run() breaks on Shutdown before apply is reached.
            SessionEvent::Shutdown => {}
        }

        let settled = self.location_settled && self.facilities_settled;
        if self.state.loading && settled {
            tracing::info!(
                "✅ Startup settled: {} facilities, position {}",
                self.state.facilities.len(),
                if self.state.current_location.is_some() {
                    "available"
                } else {
                    "unavailable"
                }
            );
        }
        self.state.loading = !settled;
    }

    /// Re-resolves the nearest facility and issues a route request when the
    /// nearest changed identity. Position updates alone never re-route.
    fn recompute_nearest(&mut self) {
        let Some(origin) = self.state.current_location else {
            return;
        };
        self.state.nearest = proximity::nearest(origin, &self.state.facilities);

        let target = self.state.nearest.as_ref().and_then(|result| {
            result
                .facility
                .coordinates()
                .map(|destination| (result.facility.id.clone(), destination, result.distance_meters))
        });
        match target {
            Some((destination_id, destination, distance))
                if self.routed_to.as_deref() != Some(destination_id.as_str()) =>
            {
                tracing::info!(
                    "🔄 Nearest facility is now {} ({:.0} m away)",
                    destination_id,
                    distance
                );
                self.request_route(origin, destination, destination_id);
            }
            // Nearest unchanged; the current route (or pending request) stands.
            Some(_) => {}
            None => {
                // Nothing to route to anymore. Bump the sequence so a response
                // for the previous target cannot land later.
                self.route_seq += 1;
                self.routed_to = None;
                self.state.route = None;
            }
        }
    }

    fn request_route(
        &mut self,
        origin: Coordinates,
        destination: Coordinates,
        facility_id: String,
    ) {
        self.route_seq += 1;
        let seq = self.route_seq;
        self.routed_to = Some(facility_id.clone());
        // The displayed route belonged to the previous target.
        self.state.route = None;

        tracing::debug!("📡 Requesting route to {} (seq {})", facility_id, seq);
        let routing = Arc::clone(&self.routing);
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            let event = match routing.route(origin, destination).await {
                Ok(route) => SessionEvent::RouteResolved { seq, route },
                Err(error) => SessionEvent::RouteFailed { seq, error },
            };
            let _ = events.send(event);
        });
    }

    fn spawn_facility_fetch(&self) {
        let directory = Arc::clone(&self.directory);
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            tracing::debug!("📡 Fetching facility directory");
            let event = match directory.fetch_all().await {
                Ok(facilities) => SessionEvent::FacilitiesLoaded(facilities),
                Err(error) => SessionEvent::FacilitiesFailed(error),
            };
            let _ = events.send(event);
        });
    }

    fn spawn_permission_flow(&self) {
        let location = Arc::clone(&self.location);
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            let permission = location.request_access().await;
            let _ = events.send(SessionEvent::PermissionResolved(permission));
            if permission == PermissionState::Granted {
                let event = match location.current_position().await {
                    Ok(position) => SessionEvent::LocationResolved(position),
                    Err(error) => SessionEvent::LocationFailed(error),
                };
                let _ = events.send(event);
            }
        });
    }

    fn spawn_position_query(&self) {
        let location = Arc::clone(&self.location);
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            let event = match location.current_position().await {
                Ok(position) => SessionEvent::LocationResolved(position),
                Err(error) => SessionEvent::LocationFailed(error),
            };
            let _ = events.send(event);
        });
    }
}
