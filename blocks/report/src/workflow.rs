use chrono::Local;
use civic_atoms::capability::{Capability, CapabilityGate, PermissionPlatform};
use civic_atoms::location::{AddressResolution, LocationResolver, PositionProvider, ReverseGeocoder};
use civic_atoms::media::{CameraCapture, GalleryPicker, ImageAcquirer, ImageAsset, ImageStore, MediaError};
use civic_atoms::reports::{Priority, ReportAssembler, ReportDraft, ReportPayload};
use std::fmt::Write;
use std::sync::{Arc, Weak};
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::error::WorkflowError;
use crate::signals::{SignalBus, WorkflowSignal};
use crate::submission::ReportSubmission;

pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Everything the workflow consumes from the host platform
#[derive(Clone)]
pub struct Collaborators {
    pub permissions: Arc<dyn PermissionPlatform>,
    pub camera: Arc<dyn CameraCapture>,
    pub gallery: Arc<dyn GalleryPicker>,
    pub store: Arc<dyn ImageStore>,
    pub position: Arc<dyn PositionProvider>,
    pub geocoder: Arc<dyn ReverseGeocoder>,
    pub submission: Arc<dyn ReportSubmission>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowOptions {
    pub signal_capacity: usize,
    pub geocode_max_results: usize,
    pub timestamp_format: String,
}

impl Default for WorkflowOptions {
    fn default() -> Self {
        Self {
            signal_capacity: 64,
            geocode_max_results: 1,
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    AwaitingImage,
    ReadyToSubmit,
}

struct Session {
    draft: ReportDraft,
    state: WorkflowState,
    /// Number of resolution attempts handed out so far
    issued_attempts: u64,
    /// Attempt number whose result (or a later manual edit) is on display
    address_version: u64,
    closed: bool,
}

struct Inner {
    id: Uuid,
    gate: CapabilityGate,
    acquirer: ImageAcquirer,
    resolver: LocationResolver,
    assembler: ReportAssembler,
    submission: Arc<dyn ReportSubmission>,
    signals: SignalBus,
    session: Mutex<Session>,
    /// Held for the whole assemble-and-deliver of one submit
    submit_lock: Mutex<()>,
}

impl Inner {
    async fn apply_address(&self, attempt: u64, outcome: AddressResolution) -> bool {
        let mut session = self.session.lock().await;
        if session.closed {
            tracing::debug!("workflow {} closed, dropping address attempt {}", self.id, attempt);
            return false;
        }
        if attempt <= session.address_version {
            tracing::info!(
                "Address attempt {} superseded (showing version {})",
                attempt,
                session.address_version
            );
            return false;
        }

        let text = outcome.address_text().to_string();
        session.address_version = attempt;
        session.draft.address = text.clone();
        self.signals.publish(WorkflowSignal::AddressUpdated { text });
        true
    }

    async fn install_image(&self, asset: ImageAsset) -> Result<(), WorkflowError> {
        let mut session = self.session.lock().await;
        if session.closed {
            return Err(WorkflowError::Closed);
        }

        tracing::info!("🖼️ workflow {} image set: {}", self.id, asset.reference());

        // Replaces, never merges: only one photo per report
        session.draft.image = Some(asset);
        let was_awaiting = session.state == WorkflowState::AwaitingImage;
        session.state = WorkflowState::ReadyToSubmit;

        self.signals.publish(WorkflowSignal::ImageReady);
        if was_awaiting {
            self.signals.publish(WorkflowSignal::SubmitEnabled { enabled: true });
        }
        Ok(())
    }

    async fn emit(&self, signal: WorkflowSignal) {
        let session = self.session.lock().await;
        if !session.closed {
            self.signals.publish(signal);
        }
    }
}

/// Handle on one in-flight address resolution attempt
pub struct AddressRefresh {
    attempt: u64,
    handle: JoinHandle<bool>,
}

impl AddressRefresh {
    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    /// Wait for the attempt. `true` when its result reached the draft.
    pub async fn finished(self) -> bool {
        match self.handle.await {
            Ok(applied) => applied,
            Err(e) => {
                tracing::warn!("⚠️ Address attempt {} did not finish: {}", self.attempt, e);
                false
            }
        }
    }
}

/// One complaint report in progress.
///
/// Owns the draft exclusively; every mutation goes through the methods below.
/// Address resolution runs in the background and never blocks photo
/// acquisition, edits or submission.
pub struct ReportWorkflow {
    inner: Arc<Inner>,
}

impl ReportWorkflow {
    pub fn new(collaborators: Collaborators, options: WorkflowOptions) -> Self {
        let gate = CapabilityGate::new(collaborators.permissions);
        let acquirer = ImageAcquirer::new(
            gate.clone(),
            collaborators.camera,
            collaborators.gallery,
            collaborators.store,
        );
        let resolver = LocationResolver::new(
            gate.clone(),
            collaborators.position,
            collaborators.geocoder,
            options.geocode_max_results,
        );
        let assembler = ReportAssembler::new(acquirer.clone());

        let id = Uuid::new_v4();
        let draft = ReportDraft::new(current_timestamp(&options.timestamp_format));
        tracing::info!("📝 Report workflow {} created, timestamp={}", id, draft.timestamp);

        Self {
            inner: Arc::new(Inner {
                id,
                gate,
                acquirer,
                resolver,
                assembler,
                submission: collaborators.submission,
                signals: SignalBus::new(options.signal_capacity),
                submit_lock: Mutex::new(()),
                session: Mutex::new(Session {
                    draft,
                    state: WorkflowState::AwaitingImage,
                    issued_attempts: 0,
                    address_version: 0,
                    closed: false,
                }),
            }),
        }
    }

    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WorkflowSignal> {
        self.inner.signals.subscribe()
    }

    /// Screen entry: announce submit availability and start locating
    pub async fn start(&self) -> Result<AddressRefresh, WorkflowError> {
        let enabled = self.state().await == WorkflowState::ReadyToSubmit;
        self.inner.emit(WorkflowSignal::SubmitEnabled { enabled }).await;
        self.refresh_address().await
    }

    /// Start a fresh resolution attempt. Later attempts win over earlier ones,
    /// whatever order they complete in.
    pub async fn refresh_address(&self) -> Result<AddressRefresh, WorkflowError> {
        let attempt = {
            let mut session = self.inner.session.lock().await;
            if session.closed {
                return Err(WorkflowError::Closed);
            }
            session.issued_attempts += 1;
            session.issued_attempts
        };

        tracing::info!("📍 workflow {} address attempt {} started", self.inner.id, attempt);

        let resolver = self.inner.resolver.clone();
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let handle = tokio::spawn(async move {
            let outcome = resolver.resolve().await;
            match weak.upgrade() {
                Some(inner) => inner.apply_address(attempt, outcome).await,
                None => false,
            }
        });

        Ok(AddressRefresh { attempt, handle })
    }

    /// Take a photo. `Ok(false)` when the user cancelled; the previous photo,
    /// if any, stays attached.
    pub async fn capture_photo(&self) -> Result<bool, WorkflowError> {
        self.ensure_open().await?;

        if !self.inner.gate.ensure(Capability::Camera).await {
            tracing::warn!("⚠️ Camera permission is required to take a picture");
            return Err(MediaError::PermissionRequired(Capability::Camera).into());
        }

        match self.inner.acquirer.capture_from_camera().await? {
            Some(asset) => self.inner.install_image(asset).await.map(|_| true),
            None => Ok(false),
        }
    }

    /// Pick a photo from the gallery. `Ok(false)` when the user backed out.
    pub async fn pick_photo(&self) -> Result<bool, WorkflowError> {
        self.ensure_open().await?;

        match self.inner.acquirer.pick_from_gallery().await {
            Some(asset) => self.inner.install_image(asset).await.map(|_| true),
            None => Ok(false),
        }
    }

    pub async fn set_title(&self, title: impl Into<String>) -> Result<(), WorkflowError> {
        let title = title.into();
        self.edit(|session| session.draft.title = title).await
    }

    pub async fn set_description(&self, description: impl Into<String>) -> Result<(), WorkflowError> {
        let description = description.into();
        self.edit(|session| session.draft.description = description).await
    }

    pub async fn set_priority(&self, priority: Priority) -> Result<(), WorkflowError> {
        self.edit(|session| session.draft.priority = priority).await
    }

    pub async fn set_timestamp(&self, timestamp: impl Into<String>) -> Result<(), WorkflowError> {
        let timestamp = timestamp.into();
        self.edit(|session| session.draft.timestamp = timestamp).await
    }

    /// Manual address override. Results of attempts already in flight are
    /// discarded; the next refresh replaces the text again.
    pub async fn set_address(&self, address: impl Into<String>) -> Result<(), WorkflowError> {
        let address = address.into();
        self.edit(|session| {
            session.draft.address = address;
            session.address_version = session.issued_attempts;
        })
        .await
    }

    /// One discrete submit attempt. The draft is left intact on failure.
    /// A submit issued while another is delivering is rejected.
    pub async fn submit(&self) -> Result<ReportPayload, WorkflowError> {
        let Ok(_submitting) = self.inner.submit_lock.try_lock() else {
            let err = WorkflowError::SubmitInProgress;
            tracing::warn!("⚠️ workflow {} submit rejected: {}", self.inner.id, err);
            self.inner
                .emit(WorkflowSignal::SubmitFailed { reason: err.to_string() })
                .await;
            return Err(err);
        };

        let draft = {
            let session = self.inner.session.lock().await;
            if session.closed {
                return Err(WorkflowError::Closed);
            }
            if session.state == WorkflowState::AwaitingImage {
                let err = WorkflowError::SubmitDisabled;
                self.inner.signals.publish(WorkflowSignal::SubmitFailed {
                    reason: err.to_string(),
                });
                return Err(err);
            }
            session.draft.clone()
        };

        let result = self.deliver(&draft).await;
        match &result {
            Ok(_) => {
                tracing::info!("✅ workflow {} report submitted", self.inner.id);
                self.inner.emit(WorkflowSignal::SubmitSucceeded).await;
            }
            Err(e) => {
                tracing::error!("❌ workflow {} submit failed: {}", self.inner.id, e);
                self.inner
                    .emit(WorkflowSignal::SubmitFailed { reason: e.to_string() })
                    .await;
            }
        }
        result
    }

    pub async fn state(&self) -> WorkflowState {
        self.inner.session.lock().await.state
    }

    /// Snapshot of the current draft
    pub async fn draft(&self) -> ReportDraft {
        self.inner.session.lock().await.draft.clone()
    }

    /// End this instance. Late results and signals become no-ops.
    pub async fn close(&self) {
        let mut session = self.inner.session.lock().await;
        if !session.closed {
            session.closed = true;
            tracing::info!("workflow {} closed", self.inner.id);
        }
    }

    async fn deliver(&self, draft: &ReportDraft) -> Result<ReportPayload, WorkflowError> {
        let payload = self.inner.assembler.assemble(draft).await?;
        self.inner.submission.submit(payload.clone()).await?;
        Ok(payload)
    }

    async fn edit(&self, apply: impl FnOnce(&mut Session)) -> Result<(), WorkflowError> {
        let mut session = self.inner.session.lock().await;
        if session.closed {
            return Err(WorkflowError::Closed);
        }
        apply(&mut session);
        Ok(())
    }

    async fn ensure_open(&self) -> Result<(), WorkflowError> {
        if self.inner.session.lock().await.closed {
            return Err(WorkflowError::Closed);
        }
        Ok(())
    }
}

fn current_timestamp(format: &str) -> String {
    let now = Local::now();
    let mut out = String::new();
    if write!(out, "{}", now.format(format)).is_err() {
        tracing::warn!("⚠️ Invalid timestamp format {:?}, using default", format);
        out = now.format(DEFAULT_TIMESTAMP_FORMAT).to_string();
    }
    out
}
