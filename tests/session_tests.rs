use std::cell::Cell;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use freelance_hub::client::{LocalApi, MarketplaceApi};
use freelance_hub::config::ClientConfig;
use freelance_hub::error::{MarketError, Result};
use freelance_hub::market::{
    Job, JobId, JobStatus, NewJob, NewProposal, Profile, Proposal, ProposalId, Store,
};
use freelance_hub::view::{
    JobAction, JobForm, PanelState, Perspective, RejectOutcome, Session, Toggle,
};

async fn session_as(perspective: Perspective) -> Session<LocalApi> {
    let api = LocalApi::new(Store::seeded().into_shared());
    let mut session = Session::new(api, &ClientConfig::default(), perspective);
    session.refresh().await.unwrap();
    session
}

async fn seed_proposal(session: &Session<LocalApi>, job_id: JobId, name: &str) -> Proposal {
    let fields = NewProposal {
        job_id,
        freelancer_name: name.to_string(),
        cover_letter: "Pick me".to_string(),
    };
    session.api().create_proposal(fields).await.unwrap()
}

/// Store-backed API whose proposal calls fail while `down` is set.
struct FlakyApi {
    inner: LocalApi,
    down: AtomicBool,
}

impl FlakyApi {
    fn new() -> Self {
        Self {
            inner: LocalApi::new(Store::seeded().into_shared()),
            down: AtomicBool::new(false),
        }
    }

    fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        if self.down.load(Ordering::SeqCst) {
            return Err(MarketError::Api {
                status: 503,
                message: "Service Unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl MarketplaceApi for FlakyApi {
    async fn list_jobs(&self) -> Result<Vec<Job>> {
        self.inner.list_jobs().await
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>> {
        self.inner.list_profiles().await
    }

    async fn create_job(&self, fields: NewJob) -> Result<Job> {
        self.inner.create_job(fields).await
    }

    async fn update_job_status(&self, id: JobId, status: JobStatus) -> Result<Job> {
        self.inner.update_job_status(id, status).await
    }

    async fn delete_job(&self, id: JobId) -> Result<()> {
        self.inner.delete_job(id).await
    }

    async fn create_proposal(&self, fields: NewProposal) -> Result<Proposal> {
        self.check()?;
        self.inner.create_proposal(fields).await
    }

    async fn list_proposals(&self, job_id: JobId) -> Result<Vec<Proposal>> {
        self.check()?;
        self.inner.list_proposals(job_id).await
    }

    async fn get_proposal(&self, id: ProposalId) -> Result<Proposal> {
        self.check()?;
        self.inner.get_proposal(id).await
    }

    async fn delete_proposal(&self, id: ProposalId) -> Result<()> {
        self.check()?;
        self.inner.delete_proposal(id).await
    }
}

async fn flaky_session_as(perspective: Perspective) -> Session<FlakyApi> {
    let mut session = Session::new(FlakyApi::new(), &ClientConfig::default(), perspective);
    session.refresh().await.unwrap();
    session
}

#[tokio::test]
async fn test_refresh_loads_snapshot() {
    let session = session_as(Perspective::Freelancer).await;
    assert_eq!(session.board().jobs().len(), 2);
    assert_eq!(session.board().profiles().len(), 2);
}

#[tokio::test]
async fn test_client_posts_job_tagged_with_perspective() {
    let mut session = session_as(Perspective::Client).await;

    let job = session
        .post_job(JobForm::new("Landing page", "120", "One pager"))
        .await
        .unwrap();
    assert_eq!(job.status, JobStatus::Open);
    assert_eq!(job.created_by.as_deref(), Some("Client"));

    // Re-fetched snapshot includes the new row, deletable by the client.
    let row = session.board().job(job.id).unwrap();
    assert_eq!(
        session.board().actions(row),
        vec![JobAction::ToggleProposals, JobAction::Delete]
    );
}

#[tokio::test]
async fn test_post_job_requires_every_field() {
    let mut session = session_as(Perspective::Client).await;

    let err = session
        .post_job(JobForm::new("  ", "10", "desc"))
        .await
        .unwrap_err();
    assert!(matches!(err, MarketError::Validation("title")));

    let err = session
        .post_job(JobForm::new("Title", "ten", "desc"))
        .await
        .unwrap_err();
    assert!(matches!(err, MarketError::Validation("budget")));

    let err = session
        .post_job(JobForm::new("Title", "10", ""))
        .await
        .unwrap_err();
    assert!(matches!(err, MarketError::Validation("description")));

    assert_eq!(session.api().list_jobs().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_only_client_view_posts_jobs() {
    let mut session = session_as(Perspective::Freelancer).await;
    let err = session
        .post_job(JobForm::new("Title", "10", "desc"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        MarketError::Unavailable {
            perspective: Perspective::Freelancer,
            ..
        }
    ));
}

#[tokio::test]
async fn test_freelancer_applies_and_flag_is_released() {
    let mut session = session_as(Perspective::Freelancer).await;

    let proposal = session.apply(JobId(1)).await.unwrap();
    assert_eq!(proposal.job_id, JobId(1));
    assert_eq!(proposal.freelancer_name, "Expert Dev");
    assert_eq!(proposal.cover_letter, "I'm the best fit!");
    assert!(session.board().submitting().is_none());

    let stored = session.api().list_proposals(JobId(1)).await.unwrap();
    assert_eq!(stored.len(), 1);
}

#[tokio::test]
async fn test_apply_blocked_when_cached_proposals_hold_ours() {
    let mut session = session_as(Perspective::Client).await;
    seed_proposal(&session, JobId(2), "Expert Dev").await;

    session.toggle_proposals(JobId(2)).await.unwrap();
    session.set_perspective(Perspective::Freelancer);

    let err = session.apply(JobId(2)).await.unwrap_err();
    assert!(matches!(err, MarketError::AlreadyApplied(JobId(2))));
    assert_eq!(session.api().list_proposals(JobId(2)).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_cannot_apply_to_in_progress_job() {
    let mut session = session_as(Perspective::Freelancer).await;
    session
        .api()
        .update_job_status(JobId(1), JobStatus::InProgress)
        .await
        .unwrap();
    session.refresh().await.unwrap();

    let err = session.apply(JobId(1)).await.unwrap_err();
    assert!(matches!(err, MarketError::Unavailable { .. }));
}

#[tokio::test]
async fn test_toggle_opens_one_list_at_a_time() {
    let mut session = session_as(Perspective::Client).await;
    seed_proposal(&session, JobId(1), "Ada").await;

    assert_eq!(
        session.toggle_proposals(JobId(1)).await.unwrap(),
        Toggle::Load(JobId(1))
    );
    match session.board().panel_for(JobId(1)) {
        Some(PanelState::Loaded(list)) => assert_eq!(list.len(), 1),
        other => panic!("expected loaded list, got {:?}", other),
    }

    session.toggle_proposals(JobId(2)).await.unwrap();
    assert!(session.board().panel_for(JobId(1)).is_none());
    assert_eq!(
        session.board().panel_for(JobId(2)),
        Some(&PanelState::Loaded(Vec::new()))
    );

    assert_eq!(
        session.toggle_proposals(JobId(2)).await.unwrap(),
        Toggle::Closed
    );
    assert!(session.board().panel().is_none());
}

#[tokio::test]
async fn test_accept_moves_job_in_progress_and_keeps_proposal() {
    let mut session = session_as(Perspective::Client).await;
    let proposal = seed_proposal(&session, JobId(1), "Ada").await;
    session.toggle_proposals(JobId(1)).await.unwrap();

    let job = session.accept(JobId(1), proposal.id).await.unwrap();
    assert_eq!(job.status, JobStatus::InProgress);
    assert_eq!(
        session.board().job(JobId(1)).unwrap().status,
        JobStatus::InProgress
    );

    // Cleared locally, still in the store.
    assert_eq!(
        session.board().panel_for(JobId(1)),
        Some(&PanelState::Loaded(Vec::new()))
    );
    assert_eq!(session.api().list_proposals(JobId(1)).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_reject_removes_proposal_from_store() {
    let mut session = session_as(Perspective::Client).await;
    seed_proposal(&session, JobId(1), "Ada").await;
    seed_proposal(&session, JobId(1), "Bob").await;
    session.toggle_proposals(JobId(1)).await.unwrap();

    let proposals = session.api().list_proposals(JobId(1)).await.unwrap();
    let rejected = proposals[0].id;

    let asked = Cell::new(false);
    let outcome = session
        .reject(JobId(1), rejected, |_| {
            asked.set(true);
            true
        })
        .await
        .unwrap();
    assert_eq!(outcome, RejectOutcome::Rejected);
    assert!(!asked.get(), "open job must not ask for confirmation");

    let remaining = session.api().list_proposals(JobId(1)).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert!(remaining.iter().all(|p| p.id != rejected));
}

#[tokio::test]
async fn test_reject_after_accept_asks_and_declining_changes_nothing() {
    let mut session = session_as(Perspective::Client).await;
    let proposal_id = seed_proposal(&session, JobId(1), "Ada").await.id;

    session.accept(JobId(1), proposal_id).await.unwrap();

    let mut prompt_seen = String::new();
    let outcome = session
        .reject(JobId(1), proposal_id, |prompt| {
            prompt_seen = prompt.to_string();
            false
        })
        .await
        .unwrap();
    assert_eq!(outcome, RejectOutcome::Cancelled);
    assert!(prompt_seen.contains("already accepted"));
    assert_eq!(session.api().list_proposals(JobId(1)).await.unwrap().len(), 1);

    let outcome = session
        .reject(JobId(1), proposal_id, |_| true)
        .await
        .unwrap();
    assert_eq!(outcome, RejectOutcome::Rejected);
    assert!(session.api().list_proposals(JobId(1)).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_admin_reopens_and_deletes() {
    let mut session = session_as(Perspective::Admin).await;

    // Open job offers no cancel action.
    let err = session.reopen(JobId(2)).await.unwrap_err();
    assert!(matches!(err, MarketError::Unavailable { .. }));

    session
        .api()
        .update_job_status(JobId(2), JobStatus::InProgress)
        .await
        .unwrap();
    session.refresh().await.unwrap();

    let job = session.reopen(JobId(2)).await.unwrap();
    assert_eq!(job.status, JobStatus::Open);

    session.delete_job(JobId(2)).await.unwrap();
    assert!(session.board().job(JobId(2)).is_none());
    assert_eq!(session.board().jobs().len(), 1);
}

#[tokio::test]
async fn test_client_cannot_delete_seed_listing() {
    let mut session = session_as(Perspective::Client).await;
    let err = session.delete_job(JobId(1)).await.unwrap_err();
    assert!(matches!(err, MarketError::Unavailable { .. }));
    assert_eq!(session.api().list_jobs().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_unknown_job_is_not_found_locally() {
    let mut session = session_as(Perspective::Admin).await;
    let err = session.delete_job(JobId(99)).await.unwrap_err();
    assert!(matches!(err, MarketError::JobNotFound(JobId(99))));
}

#[tokio::test]
async fn test_accept_needs_a_proposal_on_that_job() {
    let mut session = session_as(Perspective::Client).await;

    let err = session.accept(JobId(2), ProposalId(1)).await.unwrap_err();
    assert!(matches!(err, MarketError::ProposalNotFound(ProposalId(1))));

    let other = seed_proposal(&session, JobId(1), "Ada").await;
    let err = session.accept(JobId(2), other.id).await.unwrap_err();
    assert!(matches!(
        err,
        MarketError::ProposalMismatch {
            job: JobId(2),
            owner: JobId(1),
            ..
        }
    ));

    // Neither attempt moved the job.
    let jobs = session.api().list_jobs().await.unwrap();
    let job = jobs.iter().find(|j| j.id == JobId(2)).unwrap();
    assert_eq!(job.status, JobStatus::Open);
}

#[tokio::test]
async fn test_reject_under_wrong_job_keeps_accepted_proposal() {
    let mut session = session_as(Perspective::Client).await;
    let proposal = seed_proposal(&session, JobId(1), "Ada").await;
    session.accept(JobId(1), proposal.id).await.unwrap();

    let asked = Cell::new(false);
    let err = session
        .reject(JobId(2), proposal.id, |_| {
            asked.set(true);
            true
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        MarketError::ProposalMismatch {
            job: JobId(2),
            owner: JobId(1),
            ..
        }
    ));
    assert!(!asked.get());
    assert_eq!(session.api().list_proposals(JobId(1)).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_failed_apply_releases_submission_slot() {
    let mut session = flaky_session_as(Perspective::Freelancer).await;
    session.api().set_down(true);

    let err = session.apply(JobId(1)).await.unwrap_err();
    assert!(matches!(err, MarketError::Api { status: 503, .. }));
    assert!(session.board().submitting().is_none());
    assert!(session
        .api()
        .inner
        .list_proposals(JobId(1))
        .await
        .unwrap()
        .is_empty());

    session.api().set_down(false);
    let proposal = session.apply(JobId(1)).await.unwrap();
    assert_eq!(proposal.job_id, JobId(1));
}

#[tokio::test]
async fn test_failed_proposal_fetch_closes_list() {
    let mut session = flaky_session_as(Perspective::Client).await;
    session.api().set_down(true);

    let err = session.toggle_proposals(JobId(1)).await.unwrap_err();
    assert!(matches!(err, MarketError::Api { status: 503, .. }));
    assert!(session.board().panel().is_none());

    session.api().set_down(false);
    assert_eq!(
        session.toggle_proposals(JobId(1)).await.unwrap(),
        Toggle::Load(JobId(1))
    );
    assert_eq!(
        session.board().panel_for(JobId(1)),
        Some(&PanelState::Loaded(Vec::new()))
    );
}
