use crate::error::{MarketError, Result};
use crate::market::{Job, JobId, JobStatus, Profile, Proposal};
use crate::view::Perspective;

/// Creator tag a client-owned listing carries; clients may delete those.
pub const CLIENT_CREATOR: &str = "Client";

/// An action the view offers on a job row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobAction {
    /// Submit a proposal. Disabled while any submission is in flight.
    Apply { enabled: bool },
    /// This row's submission is in flight.
    Submitting,
    /// Cached proposals already hold one from this freelancer.
    ApplicationPending,
    ToggleProposals,
    Delete,
    /// Reset an In Progress job to Open.
    CancelJob,
}

impl JobAction {
    pub fn label(&self) -> &'static str {
        match self {
            JobAction::Apply { .. } => "Apply Now",
            JobAction::Submitting => "Submitting...",
            JobAction::ApplicationPending => "Application Pending...",
            JobAction::ToggleProposals => "Proposals",
            JobAction::Delete => "Delete",
            JobAction::CancelJob => "Cancel Job",
        }
    }

    pub fn is_enabled(&self) -> bool {
        match self {
            JobAction::Apply { enabled } => *enabled,
            JobAction::Submitting | JobAction::ApplicationPending => false,
            JobAction::ToggleProposals | JobAction::Delete | JobAction::CancelJob => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelState {
    Loading,
    Loaded(Vec<Proposal>),
}

/// The single expanded proposal list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposalPanel {
    pub job_id: JobId,
    pub state: PanelState,
}

/// Result of toggling a job's proposal list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    /// The list was open and is now closed.
    Closed,
    /// The list is opening and its proposals must be fetched.
    Load(JobId),
}

/// Client-side view state: the last fetched snapshot plus transient UI state
/// that never leaves this process.
#[derive(Debug, Clone, Default)]
pub struct Board {
    perspective: Perspective,
    freelancer_name: String,
    jobs: Vec<Job>,
    profiles: Vec<Profile>,
    panel: Option<ProposalPanel>,
    submitting: Option<JobId>,
}

impl Board {
    pub fn new(perspective: Perspective, freelancer_name: impl Into<String>) -> Self {
        Self {
            perspective,
            freelancer_name: freelancer_name.into(),
            ..Default::default()
        }
    }

    pub fn perspective(&self) -> Perspective {
        self.perspective
    }

    pub fn set_perspective(&mut self, perspective: Perspective) {
        self.perspective = perspective;
    }

    pub fn freelancer_name(&self) -> &str {
        &self.freelancer_name
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    pub fn job(&self, id: JobId) -> Option<&Job> {
        self.jobs.iter().find(|j| j.id == id)
    }

    /// Replace the cached snapshot wholesale.
    pub fn apply_snapshot(&mut self, jobs: Vec<Job>, profiles: Vec<Profile>) {
        self.jobs = jobs;
        self.profiles = profiles;
    }

    pub fn panel(&self) -> Option<&ProposalPanel> {
        self.panel.as_ref()
    }

    /// Panel contents for `job_id` if that job's list is the open one.
    pub fn panel_for(&self, job_id: JobId) -> Option<&PanelState> {
        self.panel
            .as_ref()
            .filter(|p| p.job_id == job_id)
            .map(|p| &p.state)
    }

    /// Toggling the open job closes it. Any other job replaces the open
    /// list and starts loading.
    pub fn toggle_proposals(&mut self, job_id: JobId) -> Toggle {
        if self.panel_for(job_id).is_some() {
            self.panel = None;
            return Toggle::Closed;
        }

        self.panel = Some(ProposalPanel {
            job_id,
            state: PanelState::Loading,
        });
        Toggle::Load(job_id)
    }

    /// Store fetched proposals, unless the list was closed or replaced meanwhile.
    pub fn proposals_loaded(&mut self, job_id: JobId, proposals: Vec<Proposal>) {
        if let Some(panel) = self.panel.as_mut().filter(|p| p.job_id == job_id) {
            panel.state = PanelState::Loaded(proposals);
        }
    }

    /// A failed fetch closes the list it was loading.
    pub fn proposals_failed(&mut self, job_id: JobId) {
        if self.panel_for(job_id).is_some() {
            self.panel = None;
        }
    }

    /// Empty the shown list for `job_id`, keeping it open.
    pub fn clear_proposals(&mut self, job_id: JobId) {
        if let Some(panel) = self.panel.as_mut().filter(|p| p.job_id == job_id) {
            panel.state = PanelState::Loaded(Vec::new());
        }
    }

    /// Drop the cached list for `job_id` so the next toggle fetches fresh data.
    pub fn forget_proposals(&mut self, job_id: JobId) {
        if self.panel_for(job_id).is_some() {
            self.panel = None;
        }
    }

    pub fn submitting(&self) -> Option<JobId> {
        self.submitting
    }

    /// Take the single-flight slot for a proposal submission.
    pub fn begin_submission(&mut self, job_id: JobId) -> Result<()> {
        if self.submitting.is_some() {
            return Err(MarketError::SubmissionInFlight);
        }
        self.submitting = Some(job_id);
        Ok(())
    }

    pub fn finish_submission(&mut self) {
        self.submitting = None;
    }

    /// Whether the cached proposals for `job_id` include one from this
    /// freelancer. Only data from the last fetch is consulted.
    pub fn application_pending(&self, job_id: JobId) -> bool {
        match self.panel_for(job_id) {
            Some(PanelState::Loaded(proposals)) => proposals
                .iter()
                .any(|p| p.freelancer_name == self.freelancer_name),
            _ => false,
        }
    }

    /// Actions offered on `job` under the current perspective.
    pub fn actions(&self, job: &Job) -> Vec<JobAction> {
        let mut actions = Vec::new();

        match self.perspective {
            Perspective::Freelancer => {
                if job.is_open() {
                    if self.application_pending(job.id) {
                        actions.push(JobAction::ApplicationPending);
                    } else if self.submitting == Some(job.id) {
                        actions.push(JobAction::Submitting);
                    } else {
                        actions.push(JobAction::Apply {
                            enabled: self.submitting.is_none(),
                        });
                    }
                }
            }
            Perspective::Client => {
                actions.push(JobAction::ToggleProposals);
                if job.created_by_is(CLIENT_CREATOR) {
                    actions.push(JobAction::Delete);
                }
            }
            Perspective::Admin => {
                if job.status == JobStatus::InProgress {
                    actions.push(JobAction::CancelJob);
                }
                actions.push(JobAction::Delete);
            }
        }

        actions
    }

    /// Rejecting on a job that is already In Progress means rejecting the
    /// accepted proposal, which the client view confirms first.
    pub fn reject_needs_confirmation(&self, job_id: JobId) -> bool {
        self.perspective == Perspective::Client
            && self
                .job(job_id)
                .is_some_and(|j| j.status == JobStatus::InProgress)
    }
}
