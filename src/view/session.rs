use crate::client::MarketplaceApi;
use crate::config::ClientConfig;
use crate::error::{MarketError, Result};
use crate::market::{Job, JobId, JobStatus, NewJob, NewProposal, Proposal, ProposalId};
use crate::view::board::{Board, JobAction, Toggle};
use crate::view::Perspective;

pub const REJECT_ACCEPTED_PROMPT: &str =
    "This proposal is already accepted. Are you sure you want to reject it?";

/// Raw input of the "post a job" form. Every field must be present; the
/// budget must also parse as a number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobForm {
    pub title: String,
    pub budget: String,
    pub description: String,
}

impl JobForm {
    pub fn new(
        title: impl Into<String>,
        budget: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            budget: budget.into(),
            description: description.into(),
        }
    }

    pub fn into_new_job(self, creator: &str) -> Result<NewJob> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(MarketError::Validation("title"));
        }
        let description = self.description.trim();
        if description.is_empty() {
            return Err(MarketError::Validation("description"));
        }
        let budget: f64 = self
            .budget
            .trim()
            .parse()
            .map_err(|_| MarketError::Validation("budget"))?;

        Ok(NewJob::new(title, description, budget).created_by(creator))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectOutcome {
    Rejected,
    /// The operator declined the confirmation; nothing was sent.
    Cancelled,
}

/// Drives the read-modify-display cycle: every mutation goes to the API and
/// is followed by a full re-fetch of jobs and profiles.
pub struct Session<A> {
    api: A,
    board: Board,
    cover_letter: String,
}

impl<A: MarketplaceApi> Session<A> {
    pub fn new(api: A, config: &ClientConfig, perspective: Perspective) -> Self {
        Self {
            api,
            board: Board::new(perspective, config.freelancer_name.clone()),
            cover_letter: config.cover_letter.clone(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn perspective(&self) -> Perspective {
        self.board.perspective()
    }

    pub fn set_perspective(&mut self, perspective: Perspective) {
        tracing::debug!(perspective = %perspective, "Switching perspective");
        self.board.set_perspective(perspective);
    }

    /// Fetch jobs and profiles and replace the cached snapshot. On failure
    /// the previous snapshot is kept.
    pub async fn refresh(&mut self) -> Result<()> {
        let jobs = self.api.list_jobs().await?;
        let profiles = self.api.list_profiles().await?;
        tracing::debug!(jobs = jobs.len(), profiles = profiles.len(), "Snapshot fetched");
        self.board.apply_snapshot(jobs, profiles);
        Ok(())
    }

    /// Re-fetch after a mutation that already succeeded. A failure here is
    /// only logged; the mutation itself stands.
    async fn reconcile(&mut self) {
        if let Err(e) = self.refresh().await {
            tracing::warn!(error = %e, "Failed to refresh after mutation");
        }
    }

    fn ensure(
        &self,
        job_id: JobId,
        action: &'static str,
        offered: impl Fn(&JobAction) -> bool,
    ) -> Result<&Job> {
        let job = self
            .board
            .job(job_id)
            .ok_or(MarketError::JobNotFound(job_id))?;
        if self.board.actions(job).iter().any(offered) {
            Ok(job)
        } else {
            Err(MarketError::Unavailable {
                action,
                perspective: self.board.perspective(),
            })
        }
    }

    /// Look up `proposal_id` and check that it was made on `job_id`.
    async fn proposal_on(&self, job_id: JobId, proposal_id: ProposalId) -> Result<Proposal> {
        let proposal = self.api.get_proposal(proposal_id).await?;
        if proposal.job_id != job_id {
            return Err(MarketError::ProposalMismatch {
                proposal: proposal_id,
                job: job_id,
                owner: proposal.job_id,
            });
        }
        Ok(proposal)
    }

    pub async fn post_job(&mut self, form: JobForm) -> Result<Job> {
        let perspective = self.board.perspective();
        if perspective != Perspective::Client {
            return Err(MarketError::Unavailable {
                action: "Posting a job",
                perspective,
            });
        }

        let fields = form.into_new_job(perspective.as_str())?;
        let job = self.api.create_job(fields).await?;
        tracing::info!(job_id = %job.id, title = %job.title, "Job posted");
        self.reconcile().await;
        Ok(job)
    }

    /// Submit a proposal under the configured freelancer name.
    pub async fn apply(&mut self, job_id: JobId) -> Result<Proposal> {
        let job = self
            .board
            .job(job_id)
            .ok_or(MarketError::JobNotFound(job_id))?;
        match self.board.actions(job).first() {
            Some(JobAction::Apply { enabled: true }) => {}
            Some(JobAction::Apply { enabled: false } | JobAction::Submitting) => {
                return Err(MarketError::SubmissionInFlight);
            }
            Some(JobAction::ApplicationPending) => {
                return Err(MarketError::AlreadyApplied(job_id));
            }
            _ => {
                return Err(MarketError::Unavailable {
                    action: "Apply",
                    perspective: self.board.perspective(),
                });
            }
        }

        self.board.begin_submission(job_id)?;
        let fields = NewProposal {
            job_id,
            freelancer_name: self.board.freelancer_name().to_string(),
            cover_letter: self.cover_letter.clone(),
        };

        let outcome = match self.api.create_proposal(fields).await {
            Ok(proposal) => {
                tracing::info!(job_id = %job_id, proposal_id = %proposal.id, "Application sent");
                self.reconcile().await;
                self.board.forget_proposals(job_id);
                Ok(proposal)
            }
            Err(e) => {
                tracing::warn!(job_id = %job_id, error = %e, "Failed to submit proposal");
                Err(e)
            }
        };

        self.board.finish_submission();
        outcome
    }

    /// Open or close `job_id`'s proposal list, fetching it when opening.
    pub async fn toggle_proposals(&mut self, job_id: JobId) -> Result<Toggle> {
        self.ensure(job_id, "Viewing proposals", |a| {
            *a == JobAction::ToggleProposals
        })?;

        match self.board.toggle_proposals(job_id) {
            Toggle::Closed => Ok(Toggle::Closed),
            Toggle::Load(id) => match self.api.list_proposals(id).await {
                Ok(proposals) => {
                    tracing::debug!(job_id = %id, found = proposals.len(), "Proposals loaded");
                    self.board.proposals_loaded(id, proposals);
                    Ok(Toggle::Load(id))
                }
                Err(e) => {
                    tracing::warn!(job_id = %id, error = %e, "Failed to load proposals");
                    self.board.proposals_failed(id);
                    Err(e)
                }
            },
        }
    }

    /// Accept a proposal made on `job_id`: the job moves to In Progress. The
    /// proposal stays in the store; only the locally shown list is cleared.
    pub async fn accept(&mut self, job_id: JobId, proposal_id: ProposalId) -> Result<Job> {
        self.ensure(job_id, "Accepting a proposal", |a| {
            *a == JobAction::ToggleProposals
        })?;
        self.proposal_on(job_id, proposal_id).await?;

        let job = self
            .api
            .update_job_status(job_id, JobStatus::InProgress)
            .await?;
        tracing::info!(job_id = %job_id, proposal_id = %proposal_id, "Proposal accepted");
        self.board.clear_proposals(job_id);
        self.reconcile().await;
        Ok(job)
    }

    /// Reject (delete) a proposal made on `job_id`. When that job is already
    /// In Progress, `confirm` is asked first and a `false` answer aborts
    /// before anything is deleted.
    pub async fn reject<F>(
        &mut self,
        job_id: JobId,
        proposal_id: ProposalId,
        confirm: F,
    ) -> Result<RejectOutcome>
    where
        F: FnOnce(&str) -> bool,
    {
        self.ensure(job_id, "Rejecting a proposal", |a| {
            *a == JobAction::ToggleProposals
        })?;
        self.proposal_on(job_id, proposal_id).await?;

        if self.board.reject_needs_confirmation(job_id) && !confirm(REJECT_ACCEPTED_PROMPT) {
            return Ok(RejectOutcome::Cancelled);
        }

        self.api.delete_proposal(proposal_id).await?;
        tracing::info!(job_id = %job_id, proposal_id = %proposal_id, "Proposal rejected");
        self.reconcile().await;
        self.board.clear_proposals(job_id);
        Ok(RejectOutcome::Rejected)
    }

    /// Admin: put an In Progress job back to Open.
    pub async fn reopen(&mut self, job_id: JobId) -> Result<Job> {
        self.ensure(job_id, "Cancelling a job", |a| *a == JobAction::CancelJob)?;

        let job = self.api.update_job_status(job_id, JobStatus::Open).await?;
        tracing::info!(job_id = %job_id, "Job reopened");
        self.reconcile().await;
        Ok(job)
    }

    pub async fn delete_job(&mut self, job_id: JobId) -> Result<()> {
        self.ensure(job_id, "Deleting a job", |a| *a == JobAction::Delete)?;

        self.api.delete_job(job_id).await?;
        tracing::info!(job_id = %job_id, "Job deleted");
        self.board.forget_proposals(job_id);
        self.reconcile().await;
        Ok(())
    }
}
