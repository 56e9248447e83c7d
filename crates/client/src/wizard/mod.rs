//! Multi-step profile wizards.
//!
//! A [`Wizard`] walks a [`Draft`] through its ordered [`Step`]s. Each step
//! validates only its own fields; moving forward is gated on that check,
//! moving back never is. Advancing from the last step runs the submit flow:
//!
//! 1. Upload the staged photo, if any, through the [`UploadPipeline`]
//! 2. Build the record payload from the draft and the hosted URL
//! 3. `create` (new profile) or `update` (edit mode) through a [`ProfileApi`]
//! 4. Mark the wizard completed and schedule one [`Redirect`]
//!
//! Any failure leaves the draft as it was, puts the message in
//! [`Wizard::error`] and allows another attempt.
//!
//! # State machine
//!
//! ```text
//! Editing(k) --advance--> Transitioning --> Editing(k+1)     k < N
//! Editing(k) --retreat--> Editing(k-1)                       k > 1
//! Editing(N) --advance--> Submitting --> Completed
//!                                    \-> Editing(N) + error
//! ```

mod hotel;
mod timer;
mod tour_guide;
mod travel_agency;
mod vehicle;

pub use hotel::HotelDraft;
pub use timer::{NoDelay, Timer, TokioTimer};
pub use tour_guide::TourGuideDraft;
pub use travel_agency::TravelAgencyDraft;
pub use vehicle::VehicleDraft;

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, instrument};
use tripnest_core::{Email, ImageFile, PhoneNumber, ProviderRecord, ServiceProviderId};

use crate::api::ProfileApi;
use crate::config::ClientConfig;
use crate::error::{ClientError, ValidationError};
use crate::session::Session;
use crate::upload::{ImageHost, UploadPipeline, validate_file};

/// Progress message while the photo is uploading.
pub const UPLOADING_MESSAGE: &str = "Uploading image...";

/// Progress message while the profile is being saved.
pub const SAVING_MESSAGE: &str = "Saving profile...";

/// Identifier type of the record a draft produces.
pub type RecordId<D> = <<D as Draft>::Record as ProviderRecord>::Id;

/// One page of a wizard.
pub struct Step<D> {
    /// Heading shown above the step.
    pub title: &'static str,
    /// Payload fields rendered on this step.
    pub fields: &'static [&'static str],
    /// Gate for leaving the step forwards.
    pub validate: fn(&D) -> Result<(), ValidationError>,
}

impl<D> std::fmt::Debug for Step<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Step")
            .field("title", &self.title)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

/// Photo state of a draft: a staged local file, or the URL it already has.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhotoSlot {
    /// Local preview reference of the staged file.
    pub preview: Option<String>,
    /// File to upload on submit.
    pub file: Option<ImageFile>,
    /// Hosted URL carried over from an existing record.
    pub existing_url: Option<String>,
}

impl PhotoSlot {
    /// Slot holding an already hosted image.
    #[must_use]
    pub fn hosted(url: Option<&str>) -> Self {
        Self {
            existing_url: url.map(str::to_string),
            ..Self::default()
        }
    }

    /// Stage `file` for upload after checking it against the pipeline rules.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] from [`validate_file`]; the slot keeps
    /// its previous file in that case.
    pub fn stage(&mut self, file: ImageFile) -> Result<(), ValidationError> {
        validate_file(&file)?;
        self.preview = Some(format!("local:{}", file.name));
        self.file = Some(file);
        Ok(())
    }

    /// Drop the staged file, keeping any hosted URL.
    pub fn unstage(&mut self) {
        self.preview = None;
        self.file = None;
    }

    /// Whether submitting would produce a photo URL.
    #[must_use]
    pub const fn is_present(&self) -> bool {
        self.file.is_some() || self.existing_url.is_some()
    }
}

/// In-progress form state for one kind of record.
pub trait Draft: Default + Send + Sync {
    /// Record the draft submits as.
    type Record: ProviderRecord;

    /// Where the wizard sends the user once the record is saved.
    const COMPLETED_ROUTE: &'static str;

    /// Ordered steps; never empty.
    fn steps() -> Vec<Step<Self>>;

    /// The draft's photo slot.
    fn photo(&self) -> &PhotoSlot;

    /// Assemble the outgoing payload.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if a field cannot be converted.
    fn build_payload(
        &self,
        owner: ServiceProviderId,
        photo_url: Option<String>,
    ) -> Result<Self::Record, ValidationError>;

    /// Seed a draft from a saved record for editing.
    fn from_record(record: &Self::Record) -> Self;
}

/// Whether the wizard creates a record or edits one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardMode<Id> {
    Create,
    Edit(Id),
}

/// Navigation scheduled after a successful submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redirect {
    /// Route to navigate to.
    pub target: &'static str,
    /// Delay before navigating.
    pub after: Duration,
}

/// Delays used by the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WizardOptions {
    pub transition_delay: Duration,
    pub redirect_delay: Duration,
}

impl Default for WizardOptions {
    fn default() -> Self {
        Self {
            transition_delay: Duration::from_millis(300),
            redirect_delay: Duration::from_millis(2000),
        }
    }
}

impl From<&ClientConfig> for WizardOptions {
    fn from(config: &ClientConfig) -> Self {
        Self {
            transition_delay: config.transition_delay,
            redirect_delay: config.redirect_delay,
        }
    }
}

/// Collaborators a wizard submits through.
#[derive(Debug)]
pub struct WizardContext<A, H, T> {
    pub api: A,
    pub uploads: Arc<UploadPipeline<H>>,
    pub session: Session,
    pub timer: T,
    pub options: WizardOptions,
}

/// Result of [`Wizard::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Ignored: transitioning, submitting or already completed.
    Blocked,
    /// The current step failed validation; see [`Wizard::error`].
    Invalid,
    /// Moved forward to this step.
    Advanced(usize),
    /// The record was saved.
    Completed,
    /// Submitting failed; see [`Wizard::error`].
    Failed,
}

/// Sets a flag for as long as it lives, clearing it on every exit path
/// including cancellation of the enclosing future.
struct FlagGuard<'a> {
    flag: &'a mut bool,
}

impl<'a> FlagGuard<'a> {
    fn raise(flag: &'a mut bool) -> Self {
        *flag = true;
        Self { flag }
    }
}

impl Drop for FlagGuard<'_> {
    fn drop(&mut self) {
        *self.flag = false;
    }
}

/// Linear multi-step form over a [`Draft`].
pub struct Wizard<D: Draft, A, H, T> {
    draft: D,
    steps: Vec<Step<D>>,
    mode: WizardMode<RecordId<D>>,
    current_step: usize,
    is_transitioning: bool,
    is_submitting: bool,
    is_completed: bool,
    error: Option<String>,
    progress: Option<String>,
    pending_redirect: Option<Redirect>,
    saved: Option<D::Record>,
    ctx: WizardContext<A, H, T>,
}

impl<D, A, H, T> std::fmt::Debug for Wizard<D, A, H, T>
where
    D: Draft + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wizard")
            .field("kind", &D::Record::KIND)
            .field("current_step", &self.current_step)
            .field("total_steps", &self.steps.len())
            .field("is_completed", &self.is_completed)
            .field("error", &self.error)
            .field("draft", &self.draft)
            .finish_non_exhaustive()
    }
}

impl<D, A, H, T> Wizard<D, A, H, T>
where
    D: Draft,
    A: ProfileApi<D::Record>,
    H: ImageHost,
    T: Timer,
{
    /// Start a wizard for a new record.
    #[must_use]
    pub fn new(ctx: WizardContext<A, H, T>) -> Self {
        Self::with_draft(ctx, D::default(), WizardMode::Create)
    }

    /// Start a wizard that edits `record`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Required`] if the record has no id.
    pub fn edit(ctx: WizardContext<A, H, T>, record: &D::Record) -> Result<Self, ClientError> {
        let id = record.id().ok_or(ValidationError::Required("Record id"))?;
        Ok(Self::with_draft(ctx, D::from_record(record), WizardMode::Edit(id)))
    }

    fn with_draft(ctx: WizardContext<A, H, T>, draft: D, mode: WizardMode<RecordId<D>>) -> Self {
        Self {
            draft,
            steps: D::steps(),
            mode,
            current_step: 1,
            is_transitioning: false,
            is_submitting: false,
            is_completed: false,
            error: None,
            progress: None,
            pending_redirect: None,
            saved: None,
            ctx,
        }
    }

    /// Pure check of one step (1-based). Steps outside the wizard pass.
    ///
    /// # Errors
    ///
    /// Returns the step's [`ValidationError`].
    pub fn check_step(&self, step: usize) -> Result<(), ValidationError> {
        match step.checked_sub(1).and_then(|i| self.steps.get(i)) {
            Some(s) => (s.validate)(&self.draft),
            None => Ok(()),
        }
    }

    /// Validate one step, recording the reason in [`Self::error`] on failure.
    pub fn validate_step(&mut self, step: usize) -> bool {
        match self.check_step(step) {
            Ok(()) => {
                self.error = None;
                true
            }
            Err(e) => {
                debug!(step, reason = %e, "Step validation failed");
                self.error = Some(e.to_string());
                false
            }
        }
    }

    /// Move forward one step, or submit from the last one.
    pub async fn advance(&mut self) -> StepOutcome {
        if self.is_transitioning || self.is_submitting || self.is_completed {
            return StepOutcome::Blocked;
        }
        if !self.validate_step(self.current_step) {
            return StepOutcome::Invalid;
        }

        if self.current_step < self.total_steps() {
            let guard = FlagGuard::raise(&mut self.is_transitioning);
            self.ctx.timer.sleep(self.ctx.options.transition_delay).await;
            self.current_step += 1;
            drop(guard);
            return StepOutcome::Advanced(self.current_step);
        }

        self.submit().await
    }

    /// Move back one step. Never validates.
    pub fn retreat(&mut self) -> bool {
        if self.current_step <= 1 || self.is_transitioning || self.is_submitting || self.is_completed
        {
            return false;
        }
        self.current_step -= 1;
        self.error = None;
        true
    }

    #[instrument(skip_all, fields(kind = %D::Record::KIND, edit = matches!(self.mode, WizardMode::Edit(_))))]
    async fn submit(&mut self) -> StepOutcome {
        self.error = None;
        let guard = FlagGuard::raise(&mut self.is_submitting);
        let result = Self::run_submit(&self.draft, self.mode, &self.ctx, &mut self.progress).await;
        drop(guard);
        self.progress = None;

        match result {
            Ok(record) => {
                info!(id = ?record.id().map(|id| id.to_string()), "Profile saved");
                self.draft = D::default();
                self.saved = Some(record);
                self.is_completed = true;
                self.pending_redirect = Some(Redirect {
                    target: D::COMPLETED_ROUTE,
                    after: self.ctx.options.redirect_delay,
                });
                StepOutcome::Completed
            }
            Err(e) => {
                error!(error = %e, "Profile submit failed");
                self.error = Some(e.to_string());
                StepOutcome::Failed
            }
        }
    }

    async fn run_submit(
        draft: &D,
        mode: WizardMode<RecordId<D>>,
        ctx: &WizardContext<A, H, T>,
        progress: &mut Option<String>,
    ) -> Result<D::Record, ClientError> {
        let owner = ctx.session.service_provider_id();
        let photo = draft.photo();

        let photo_url = match &photo.file {
            Some(file) => {
                *progress = Some(UPLOADING_MESSAGE.to_string());
                Some(ctx.uploads.run(D::Record::KIND, file, owner).await?)
            }
            None => photo.existing_url.clone(),
        };

        *progress = Some(SAVING_MESSAGE.to_string());
        let payload = draft.build_payload(owner, photo_url)?;

        match mode {
            WizardMode::Create => ctx.api.create(&payload).await,
            WizardMode::Edit(id) => ctx.api.update(id, &payload).await,
        }
    }

    /// Take the scheduled redirect. Returns it at most once per submit.
    pub const fn take_redirect(&mut self) -> Option<Redirect> {
        self.pending_redirect.take()
    }

    /// Wait out the scheduled redirect and return its target.
    pub async fn await_redirect(&mut self) -> Option<&'static str> {
        let redirect = self.pending_redirect.take()?;
        self.ctx.timer.sleep(redirect.after).await;
        Some(redirect.target)
    }

    /// The draft being edited.
    #[must_use]
    pub const fn draft(&self) -> &D {
        &self.draft
    }

    /// Mutable access for field input.
    pub const fn draft_mut(&mut self) -> &mut D {
        &mut self.draft
    }

    /// Current step, 1-based.
    #[must_use]
    pub const fn current_step(&self) -> usize {
        self.current_step
    }

    /// Number of steps.
    #[must_use]
    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    /// Definition of the current step.
    #[must_use]
    pub fn step(&self) -> Option<&Step<D>> {
        self.current_step
            .checked_sub(1)
            .and_then(|i| self.steps.get(i))
    }

    #[must_use]
    pub const fn is_transitioning(&self) -> bool {
        self.is_transitioning
    }

    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.is_completed
    }

    /// Message from the last failed validation or submit.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Message describing the submit phase in progress.
    #[must_use]
    pub fn progress(&self) -> Option<&str> {
        self.progress.as_deref()
    }

    #[must_use]
    pub const fn mode(&self) -> WizardMode<RecordId<D>> {
        self.mode
    }

    /// Redirect scheduled by a successful submit, not yet taken.
    #[must_use]
    pub const fn pending_redirect(&self) -> Option<&Redirect> {
        self.pending_redirect.as_ref()
    }

    /// Record returned by the server on success.
    #[must_use]
    pub const fn saved_record(&self) -> Option<&D::Record> {
        self.saved.as_ref()
    }

    /// Collaborators the wizard was built with.
    #[must_use]
    pub const fn context(&self) -> &WizardContext<A, H, T> {
        &self.ctx
    }
}

// =============================================================================
// Field checks shared by the drafts
// =============================================================================

/// Non-empty after trimming.
pub(crate) fn require_text(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(())
}

pub(crate) fn require_photo(
    photo: &PhotoSlot,
    field: &'static str,
) -> Result<(), ValidationError> {
    if photo.is_present() {
        Ok(())
    } else {
        Err(ValidationError::Required(field))
    }
}

pub(crate) fn parse_phone(value: &str, field: &'static str) -> Result<PhoneNumber, ValidationError> {
    require_text(value, field)?;
    PhoneNumber::parse(value).map_err(|e| ValidationError::Invalid {
        field,
        reason: e.to_string(),
    })
}

pub(crate) fn parse_email(value: &str, field: &'static str) -> Result<Email, ValidationError> {
    require_text(value, field)?;
    Email::parse(value).map_err(|e| ValidationError::Invalid {
        field,
        reason: e.to_string(),
    })
}

/// Parse an optional phone field; blank means absent.
pub(crate) fn parse_optional_phone(
    value: &str,
    field: &'static str,
) -> Result<Option<PhoneNumber>, ValidationError> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    parse_phone(value, field).map(Some)
}

/// Trimmed, non-empty entries.
pub(crate) fn clean_list(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}
