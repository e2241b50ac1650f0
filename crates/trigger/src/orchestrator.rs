//! The emergency trigger pipeline.
//!
//! [`EmergencyOrchestrator`] validates a pulse entry, persists it, compares
//! it with the high-pulse threshold and, on a breach, arms SOS mode and runs
//! the emergency sequence:
//!
//! 1. arm and announce,
//! 2. look up the contact, acquire a location and fetch advisory text
//!    concurrently,
//! 3. announce the contact and the location outcome,
//! 4. announce the advice,
//! 5. schedule the return to idle after the dwell.
//!
//! When both a contact and a location exist, the alert is forwarded on a
//! spawned task and the location notice waits for its result ("shared" on
//! success, "tracked" otherwise). A slow delivery channel therefore never
//! holds up the advice or the dwell. [`EmergencyOrchestrator::wait_for_deliveries`]
//! resolves once every forward has finished.
//!
//! Only a validation error stops the pipeline. Every later failure degrades
//! to a log line and a less informative notification.
//!
//! The dwell runs as a spawned task guarded by a [`CancellationToken`]. A
//! breach while armed cancels the pending token and starts a new dwell, so a
//! burst of breaches produces exactly one deactivation.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use pulseguard_advisor::{AdvisoryTextProvider, ChatContext};
use pulseguard_core::advisory::{truncate_for_notification, AdvisoryTemplate};
use pulseguard_core::messages::{
    self, MSG_HIGH_PULSE_LOCATION_SHARED, MSG_HIGH_PULSE_SOS, MSG_INVALID_PULSE,
    MSG_LOCATION_PERMISSION_REQUIRED, MSG_LOCATION_TRACKED, MSG_LOCATION_UNAVAILABLE,
    MSG_PROFILE_SAVED, MSG_PROFILE_SAVE_FAILED, MSG_PULSE_RECORDED, MSG_SOS_ACTIVATED,
    MSG_SOS_DEACTIVATED,
};
use pulseguard_core::sos::SOS_DWELL;
use pulseguard_core::types::Bpm;
use pulseguard_core::{
    validate, Coordinates, EmergencyContact, EmergencyEvent, EmergencyTrigger, LocationError,
    ReadingSummary, SosEvent, SosState, UserProfile, ValidationError, VitalReading,
};
use pulseguard_events::{ContactForwarder, EmergencyAlert, Notification, NotificationSink, Placement};
use pulseguard_store::repositories::ProfileRepo;
use pulseguard_store::{SharedStore, StoreError};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::location::GeolocationProvider;

/// The services the orchestrator drives.
#[derive(Clone)]
pub struct Collaborators {
    pub store: SharedStore,
    pub locator: Arc<dyn GeolocationProvider>,
    pub advisor: Arc<dyn AdvisoryTextProvider>,
    pub sink: Arc<dyn NotificationSink>,
    pub forwarder: Arc<dyn ContactForwarder>,
}

/// Result of one pulse submission.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The entry failed validation. Nothing was written.
    Rejected(ValidationError),
    /// The reading was at or below the threshold.
    Recorded { reading: VitalReading, persisted: bool },
    /// The reading breached the threshold and SOS mode was armed.
    Emergency(EmergencyEvent),
}

/// SOS state plus the token of the dwell currently counting down.
struct SosMachine {
    state: watch::Sender<SosState>,
    pending: Mutex<Option<CancellationToken>>,
}

impl SosMachine {
    fn new() -> Self {
        let (state, _) = watch::channel(SosState::Idle);
        Self {
            state,
            pending: Mutex::new(None),
        }
    }

    fn pending(&self) -> MutexGuard<'_, Option<CancellationToken>> {
        self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Arm, superseding any dwell in progress. Returns the token for the
    /// new dwell.
    fn arm(&self) -> CancellationToken {
        let mut pending = self.pending();
        if let Some(previous) = pending.take() {
            previous.cancel();
        }
        let token = CancellationToken::new();
        *pending = Some(token.clone());
        self.state.send_modify(|state| *state = state.apply(SosEvent::Breach));
        token
    }

    /// Disarm if `token` still belongs to the latest breach.
    fn expire(&self, token: &CancellationToken, sink: &dyn NotificationSink) -> bool {
        let mut pending = self.pending();
        if token.is_cancelled() {
            return false;
        }
        *pending = None;
        sink.notify(Notification::info(MSG_SOS_DEACTIVATED).short());
        self.state
            .send_modify(|state| *state = state.apply(SosEvent::DwellExpired));
        true
    }
}

/// Counts alert forwards still in flight. Decrements on drop.
struct DeliveryGuard(Arc<watch::Sender<usize>>);

impl DeliveryGuard {
    fn start(in_flight: &Arc<watch::Sender<usize>>) -> Self {
        in_flight.send_modify(|n| *n += 1);
        Self(Arc::clone(in_flight))
    }
}

impl Drop for DeliveryGuard {
    fn drop(&mut self) {
        self.0.send_modify(|n| *n = n.saturating_sub(1));
    }
}

/// Drives the validator, store, locator, advisor and notification sink
/// through the emergency pipeline.
///
/// Cheap to clone; clones share the SOS state.
#[derive(Clone)]
pub struct EmergencyOrchestrator {
    store: SharedStore,
    locator: Arc<dyn GeolocationProvider>,
    advisor: Arc<dyn AdvisoryTextProvider>,
    sink: Arc<dyn NotificationSink>,
    forwarder: Arc<dyn ContactForwarder>,
    threshold: Bpm,
    dwell: Duration,
    sos: Arc<SosMachine>,
    deliveries: Arc<watch::Sender<usize>>,
}

impl EmergencyOrchestrator {
    pub fn new(collaborators: Collaborators, threshold: Bpm) -> Self {
        Self {
            store: collaborators.store,
            locator: collaborators.locator,
            advisor: collaborators.advisor,
            sink: collaborators.sink,
            forwarder: collaborators.forwarder,
            threshold,
            dwell: SOS_DWELL,
            sos: Arc::new(SosMachine::new()),
            deliveries: Arc::new(watch::channel(0).0),
        }
    }

    /// Override how long SOS mode stays armed.
    pub fn with_dwell(mut self, dwell: Duration) -> Self {
        self.dwell = dwell;
        self
    }

    pub fn threshold(&self) -> Bpm {
        self.threshold
    }

    pub fn state(&self) -> SosState {
        *self.sos.state.borrow()
    }

    /// Observe every state transition from now on.
    pub fn state_changes(&self) -> watch::Receiver<SosState> {
        self.sos.state.subscribe()
    }

    /// Resolve once SOS mode is idle (immediately if it already is).
    pub async fn wait_until_idle(&self) {
        let mut rx = self.sos.state.subscribe();
        // The sender lives as long as `self`, so this cannot fail.
        let _ = rx.wait_for(|state| !state.is_armed()).await;
    }

    /// Resolve once no alert forward is in flight.
    pub async fn wait_for_deliveries(&self) {
        let mut rx = self.deliveries.subscribe();
        let _ = rx.wait_for(|in_flight| *in_flight == 0).await;
    }

    // -----------------------------------------------------------------------
    // Pulse submission
    // -----------------------------------------------------------------------

    /// Run a raw pulse entry through the pipeline.
    pub async fn submit_reading(&self, raw: &str) -> SubmitOutcome {
        let reading = match validate(raw) {
            Ok(reading) => reading,
            Err(e) => {
                tracing::info!(raw, error = %e, "Rejected pulse entry");
                self.sink.notify(Notification::info(MSG_INVALID_PULSE));
                return SubmitOutcome::Rejected(e);
            }
        };

        let persisted = match ProfileRepo::save_last_reading(self.store.as_ref(), &reading).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(error = %e, bpm = reading.value, "Failed to persist pulse reading");
                false
            }
        };

        if !reading.exceeds(self.threshold) {
            tracing::info!(bpm = reading.value, threshold = self.threshold, "Pulse recorded");
            self.sink.notify(Notification::info(MSG_PULSE_RECORDED));
            return SubmitOutcome::Recorded { reading, persisted };
        }

        tracing::warn!(bpm = reading.value, threshold = self.threshold, "High pulse detected");
        let event = self
            .run_emergency(EmergencyTrigger::HighPulse, Some(reading), persisted)
            .await;
        SubmitOutcome::Emergency(event)
    }

    /// Arm SOS mode from the SOS button. Same sequence as a breach, without
    /// a reading or advisory text.
    pub async fn trigger_manual_sos(&self) -> EmergencyEvent {
        tracing::warn!("Manual SOS requested");
        self.run_emergency(EmergencyTrigger::Manual, None, false).await
    }

    async fn run_emergency(
        &self,
        trigger: EmergencyTrigger,
        reading: Option<VitalReading>,
        reading_persisted: bool,
    ) -> EmergencyEvent {
        let token = self.sos.arm();
        let opening = match trigger {
            EmergencyTrigger::HighPulse => MSG_HIGH_PULSE_SOS,
            EmergencyTrigger::Manual => MSG_SOS_ACTIVATED,
        };
        self.sink.notify(Notification::alert(opening));

        let bpm = reading.map(|r| r.value);
        let (contact, location, advisory_text) =
            tokio::join!(self.lookup_contact(), self.locator.acquire(), self.fetch_advice(bpm));

        let label = contact.as_ref().map(EmergencyContact::label);
        if let Some(label) = &label {
            self.sink.notify(Notification::info(messages::contacting(label)));
        }

        match (&contact, &location) {
            (Some(contact), Ok(coords)) => self.spawn_forward(contact, trigger, bpm, *coords),
            _ => self.sink.notify(location_notice(&location)),
        }

        if !advisory_text.is_empty() {
            self.sink.notify(
                Notification::info(truncate_for_notification(&advisory_text)).at(Placement::Center),
            );
        }

        self.schedule_disarm(token);

        let (location, location_error) = match location {
            Ok(coords) => (Some(coords), None),
            Err(e) => (None, Some(e)),
        };
        EmergencyEvent {
            trigger,
            reading,
            location,
            location_error,
            advisory_text,
            contact_notified: label,
            reading_persisted,
        }
    }

    async fn lookup_contact(&self) -> Option<EmergencyContact> {
        match ProfileRepo::get_emergency_contact(self.store.as_ref()).await {
            Ok(contact) => contact,
            Err(e) => {
                tracing::error!(error = %e, "Emergency contact lookup failed");
                None
            }
        }
    }

    async fn fetch_advice(&self, bpm: Option<Bpm>) -> String {
        match bpm {
            Some(bpm) => self.advisor.advise(AdvisoryTemplate::HighPulse { bpm }).await,
            None => String::new(),
        }
    }

    /// Forward the alert in the background and announce the location
    /// outcome once delivery settles.
    fn spawn_forward(
        &self,
        contact: &EmergencyContact,
        trigger: EmergencyTrigger,
        bpm: Option<Bpm>,
        coords: Coordinates,
    ) {
        let alert = EmergencyAlert::new(contact, trigger, bpm, coords);
        let label = contact.label();
        let forwarder = Arc::clone(&self.forwarder);
        let sink = Arc::clone(&self.sink);
        let guard = DeliveryGuard::start(&self.deliveries);

        tokio::spawn(async move {
            let _guard = guard;
            let notification = match forwarder.forward(&alert).await {
                Ok(()) => {
                    tracing::info!(
                        contact = %alert.contact_number,
                        maps_url = %alert.maps_url,
                        "Emergency alert forwarded"
                    );
                    match trigger {
                        EmergencyTrigger::HighPulse => {
                            Notification::alert(MSG_HIGH_PULSE_LOCATION_SHARED)
                        }
                        EmergencyTrigger::Manual => {
                            Notification::info(messages::location_shared_with(&label))
                        }
                    }
                }
                Err(e) => {
                    tracing::error!(
                        contact = %alert.contact_number,
                        error = %e,
                        "Emergency alert forwarding failed"
                    );
                    Notification::info(MSG_LOCATION_TRACKED)
                }
            };
            sink.notify(notification);
        });
    }

    fn schedule_disarm(&self, token: CancellationToken) {
        let sos = Arc::clone(&self.sos);
        let sink = Arc::clone(&self.sink);
        let dwell = self.dwell;

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::debug!("Dwell superseded by a newer breach");
                }
                _ = tokio::time::sleep(dwell) => {
                    if sos.expire(&token, sink.as_ref()) {
                        tracing::info!(dwell_secs = dwell.as_secs(), "SOS mode deactivated");
                    }
                }
            }
        });
    }

    // -----------------------------------------------------------------------
    // Profile
    // -----------------------------------------------------------------------

    /// Persist the profile and announce the result.
    pub async fn save_profile(&self, profile: &UserProfile) -> Result<(), StoreError> {
        match ProfileRepo::save_profile(self.store.as_ref(), profile).await {
            Ok(()) => {
                tracing::info!("Profile saved");
                self.sink.notify(Notification::info(MSG_PROFILE_SAVED).short());
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to save profile");
                self.sink.notify(Notification::alert(MSG_PROFILE_SAVE_FAILED).short());
                Err(e)
            }
        }
    }

    pub async fn load_profile(&self) -> Result<UserProfile, StoreError> {
        ProfileRepo::get_profile(self.store.as_ref()).await
    }

    /// The last stored reading and whether it is above the threshold.
    pub async fn reading_summary(&self) -> Result<ReadingSummary, StoreError> {
        let reading = ProfileRepo::get_last_reading(self.store.as_ref()).await?;
        Ok(ReadingSummary::new(reading, self.threshold))
    }

    /// What the safety chat should know about the user. Store failures
    /// leave the corresponding facts out.
    pub async fn chat_context(&self) -> ChatContext {
        let profile = self.load_profile().await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Profile unavailable for chat context");
            UserProfile::default()
        });
        let last_pulse = match ProfileRepo::get_last_reading(self.store.as_ref()).await {
            Ok(reading) => reading.map(|r| r.value.to_string()),
            Err(e) => {
                tracing::warn!(error = %e, "Last reading unavailable for chat context");
                None
            }
        };

        ChatContext {
            emergency_contact: profile.contact_label(),
            user_name: profile.name,
            last_pulse,
        }
    }
}

/// Location notice when no alert is being forwarded.
fn location_notice(location: &Result<Coordinates, LocationError>) -> Notification {
    match location {
        Ok(_) => Notification::info(MSG_LOCATION_TRACKED),
        Err(LocationError::PermissionDenied) => {
            Notification::alert(MSG_LOCATION_PERMISSION_REQUIRED)
        }
        Err(LocationError::Unavailable) => Notification::alert(MSG_LOCATION_UNAVAILABLE),
    }
}
