//! Interactive terminal front end: reads one command per line, applies it
//! through a [`Session`] and prints the refreshed board.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::client::MarketplaceApi;
use crate::error::Result;
use crate::market::{JobId, ProposalId};
use crate::view::render::render_board;
use crate::view::session::REJECT_ACCEPTED_PROMPT;
use crate::view::{JobForm, Perspective, RejectOutcome, Session};

const HELP: &str = "\
Commands:
  role <client|freelancer|admin>          switch the viewer perspective
  refresh                                 re-fetch jobs and profiles
  show                                    print the board without fetching
  post <title> | <budget> | <description> post a job (client)
  apply <job-id>                          submit a proposal (freelancer)
  proposals <job-id>                      toggle a job's proposals (client)
  accept <job-id> <proposal-id>           accept a proposal, job goes In Progress (client)
  reject <job-id> <proposal-id>           reject a proposal (client)
  cancel <job-id>                         reset an In Progress job to Open (admin)
  delete <job-id>                         delete a job (admin, or client on own listings)
  help                                    show this help
  quit                                    leave the shell
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Role(Perspective),
    Refresh,
    Show,
    Post(JobForm),
    Apply(JobId),
    Proposals(JobId),
    Accept(JobId, ProposalId),
    Reject(JobId, ProposalId),
    Cancel(JobId),
    Delete(JobId),
    Help,
    Quit,
}

fn job_arg(arg: Option<&str>) -> std::result::Result<JobId, String> {
    let raw = arg.ok_or("missing job id")?;
    raw.parse().map_err(|_| format!("invalid job id {:?}", raw))
}

fn proposal_arg(arg: Option<&str>) -> std::result::Result<ProposalId, String> {
    let raw = arg.ok_or("missing proposal id")?;
    raw.parse()
        .map_err(|_| format!("invalid proposal id {:?}", raw))
}

impl ShellCommand {
    pub fn parse(line: &str) -> std::result::Result<Self, String> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };
        let mut args = rest.split_whitespace();

        let command = match verb.to_ascii_lowercase().as_str() {
            "role" => ShellCommand::Role(args.next().ok_or("missing role")?.parse()?),
            "refresh" | "jobs" => ShellCommand::Refresh,
            "show" => ShellCommand::Show,
            "post" => {
                let parts: Vec<&str> = rest.splitn(3, '|').map(str::trim).collect();
                match parts.as_slice() {
                    [title, budget, description] => {
                        ShellCommand::Post(JobForm::new(*title, *budget, *description))
                    }
                    _ => return Err("usage: post <title> | <budget> | <description>".into()),
                }
            }
            "apply" => ShellCommand::Apply(job_arg(args.next())?),
            "proposals" => ShellCommand::Proposals(job_arg(args.next())?),
            "accept" => {
                let job_id = job_arg(args.next())?;
                ShellCommand::Accept(job_id, proposal_arg(args.next())?)
            }
            "reject" => {
                let job_id = job_arg(args.next())?;
                ShellCommand::Reject(job_id, proposal_arg(args.next())?)
            }
            "cancel" | "reopen" => ShellCommand::Cancel(job_arg(args.next())?),
            "delete" => ShellCommand::Delete(job_arg(args.next())?),
            "help" | "?" => ShellCommand::Help,
            "quit" | "exit" => ShellCommand::Quit,
            other => return Err(format!("unknown command {:?}, try `help`", other)),
        };
        Ok(command)
    }
}

async fn emit<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> Result<()> {
    output.write_all(text.as_bytes()).await?;
    output.flush().await?;
    Ok(())
}

/// Run the shell until `quit` or end of input.
///
/// Failed commands print an error and leave the session usable; only I/O
/// errors on `input`/`output` end the loop early.
pub async fn run_shell<A, R, W>(session: &mut Session<A>, input: R, output: &mut W) -> Result<()>
where
    A: MarketplaceApi,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();

    if let Err(e) = session.refresh().await {
        tracing::warn!(error = %e, "Initial fetch failed");
        emit(output, &format!("Error: {}\n", e)).await?;
    }
    emit(output, &render_board(session.board())).await?;

    loop {
        emit(output, &format!("[{}]> ", session.perspective())).await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match ShellCommand::parse(&line) {
            Ok(command) => command,
            Err(msg) => {
                emit(output, &format!("{}\n", msg)).await?;
                continue;
            }
        };

        let notice = match command {
            ShellCommand::Quit => break,
            ShellCommand::Help => {
                emit(output, HELP).await?;
                continue;
            }
            ShellCommand::Show => Ok(None),
            ShellCommand::Role(perspective) => {
                session.set_perspective(perspective);
                Ok(None)
            }
            ShellCommand::Refresh => session.refresh().await.map(|_| None),
            ShellCommand::Post(form) => session
                .post_job(form)
                .await
                .map(|job| Some(format!("Job #{} published.", job.id))),
            ShellCommand::Apply(job_id) => session
                .apply(job_id)
                .await
                .map(|_| Some("Application Sent!".to_string())),
            ShellCommand::Proposals(job_id) => {
                session.toggle_proposals(job_id).await.map(|_| None)
            }
            ShellCommand::Accept(job_id, proposal_id) => session
                .accept(job_id, proposal_id)
                .await
                .map(|job| Some(format!("Job #{} is now {}.", job.id, job.status))),
            ShellCommand::Reject(job_id, proposal_id) => {
                let mut answer = true;
                if session.board().reject_needs_confirmation(job_id) {
                    emit(output, &format!("{} [y/N] ", REJECT_ACCEPTED_PROMPT)).await?;
                    let reply = lines.next_line().await?.unwrap_or_default();
                    answer = matches!(reply.trim().to_ascii_lowercase().as_str(), "y" | "yes");
                }
                session
                    .reject(job_id, proposal_id, |_| answer)
                    .await
                    .map(|outcome| match outcome {
                        RejectOutcome::Rejected => {
                            Some(format!("Proposal #{} rejected.", proposal_id))
                        }
                        RejectOutcome::Cancelled => Some("Rejection cancelled.".to_string()),
                    })
            }
            ShellCommand::Cancel(job_id) => session
                .reopen(job_id)
                .await
                .map(|job| Some(format!("Job #{} is {} again.", job.id, job.status))),
            ShellCommand::Delete(job_id) => session
                .delete_job(job_id)
                .await
                .map(|_| Some(format!("Job #{} deleted.", job_id))),
        };

        match notice {
            Ok(Some(msg)) => emit(output, &format!("{}\n", msg)).await?,
            Ok(None) => {}
            Err(e) => {
                emit(output, &format!("Error: {}\n", e)).await?;
                continue;
            }
        }
        emit(output, &render_board(session.board())).await?;
    }

    emit(output, "Bye.\n").await?;
    Ok(())
}
