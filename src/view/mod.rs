pub mod board;
pub mod perspective;
pub mod render;
pub mod session;

pub use board::{Board, JobAction, PanelState, ProposalPanel, Toggle};
pub use perspective::Perspective;
pub use session::{JobForm, RejectOutcome, Session};
