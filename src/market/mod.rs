pub mod job;
pub mod profile;
pub mod proposal;
pub mod store;

pub use job::{Job, JobId, JobStatus, NewJob, StatusUpdate};
pub use profile::{Profile, ProfileId, ProfileRole};
pub use proposal::{NewProposal, Proposal, ProposalId};
pub use store::{SharedStore, Store};
