//! Plain-text rendering of the board and of API listings.

use std::fmt::Write;

use crate::market::{Job, Profile, Proposal};
use crate::view::board::{Board, PanelState};
use crate::view::Perspective;

pub fn format_budget(budget: f64) -> String {
    if budget.fract() == 0.0 {
        format!("${:.0}", budget)
    } else {
        format!("${:.2}", budget)
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let cut: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

fn perspective_blurb(perspective: Perspective) -> &'static str {
    match perspective {
        Perspective::Client => "Post a new job with `post <title> | <budget> | <description>`.",
        Perspective::Freelancer => "Browse and apply for the best projects.",
        Perspective::Admin => "Manage all listings and site health.",
    }
}

/// Render the whole board as the current perspective sees it.
pub fn render_board(board: &Board) -> String {
    let mut out = String::new();
    let perspective = board.perspective();

    let _ = writeln!(out, "Freelance Hub [MVP]  -  {} View", perspective);
    let _ = writeln!(out, "{}", perspective_blurb(perspective));
    let _ = writeln!(out);

    let profiles: Vec<String> = board
        .profiles()
        .iter()
        .map(|p| format!("{} ({}) {:.1}*", p.name, p.role, p.rating))
        .collect();
    let _ = writeln!(out, "User Profiles: {}", profiles.join(" | "));
    let _ = writeln!(out, "{}", "=".repeat(60));

    if board.jobs().is_empty() {
        let _ = writeln!(out, "No jobs posted.");
        return out;
    }

    for job in board.jobs() {
        let _ = writeln!(
            out,
            "#{:<5} {:<34} [{}] {}",
            job.id,
            truncate(&job.title, 34),
            job.status,
            format_budget(job.budget)
        );
        let _ = writeln!(out, "       {}", job.description);

        let actions: Vec<String> = board
            .actions(job)
            .iter()
            .map(|a| {
                if a.is_enabled() {
                    format!("[{}]", a.label())
                } else {
                    format!("({})", a.label())
                }
            })
            .collect();
        if !actions.is_empty() {
            let _ = writeln!(out, "       {}", actions.join(" "));
        }

        if perspective == Perspective::Client {
            match board.panel_for(job.id) {
                Some(PanelState::Loading) => {
                    let _ = writeln!(out, "         Loading proposals...");
                }
                Some(PanelState::Loaded(proposals)) if proposals.is_empty() => {
                    let _ = writeln!(out, "         No proposals yet.");
                }
                Some(PanelState::Loaded(proposals)) => {
                    for p in proposals {
                        let _ = writeln!(
                            out,
                            "         proposal #{:<5} {:<20} [Accept] [Reject]",
                            p.id,
                            truncate(&p.freelancer_name, 20)
                        );
                    }
                }
                None => {}
            }
        }
        let _ = writeln!(out, "{}", "-".repeat(60));
    }

    out
}

pub fn render_jobs_table(jobs: &[Job]) -> String {
    if jobs.is_empty() {
        return "No jobs found.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<8} {:<12} {:>10} {:<14} TITLE",
        "JOB ID", "STATUS", "BUDGET", "CREATED BY"
    );
    let _ = writeln!(out, "{}", "-".repeat(78));
    for job in jobs {
        let _ = writeln!(
            out,
            "{:<8} {:<12} {:>10} {:<14} {}",
            job.id,
            job.status.to_string(),
            format_budget(job.budget),
            truncate(job.created_by.as_deref().unwrap_or("-"), 14),
            truncate(&job.title, 30)
        );
    }
    out
}

pub fn render_proposals_table(proposals: &[Proposal]) -> String {
    if proposals.is_empty() {
        return "No proposals yet.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<12} {:<8} {:<20} COVER LETTER",
        "PROPOSAL ID", "JOB ID", "FREELANCER"
    );
    let _ = writeln!(out, "{}", "-".repeat(78));
    for p in proposals {
        let _ = writeln!(
            out,
            "{:<12} {:<8} {:<20} {}",
            p.id,
            p.job_id,
            truncate(&p.freelancer_name, 20),
            truncate(&p.cover_letter, 34)
        );
    }
    out
}

pub fn render_profiles_table(profiles: &[Profile]) -> String {
    if profiles.is_empty() {
        return "No profiles found.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out, "{:<6} {:<24} {:<12} RATING", "ID", "NAME", "ROLE");
    let _ = writeln!(out, "{}", "-".repeat(52));
    for p in profiles {
        let _ = writeln!(
            out,
            "{:<6} {:<24} {:<12} {:.1}",
            p.id.0,
            truncate(&p.name, 24),
            p.role.to_string(),
            p.rating
        );
    }
    out
}
