//! Implementation of the `statelock force-unlock` command.
//!
//! Releases a lock whose holder cannot release it itself (crashed process,
//! partition, operator intervention).
//!
//! # Steps
//!
//! 1. Validate the lock ID (missing/empty → usage error)
//! 2. Resolve the configuration directory, config and state handle
//! 3. Classify the handle: no locker → refused, local storage → refused
//! 4. Ask for confirmation unless `--force`
//! 5. Release the lock once through the backend
//! 6. Append a `force_unlock` event to the audit log
//!
//! `--force` only skips step 4. The local-storage refusal in step 3 applies
//! with or without it.

mod confirm;
mod executor;
#[cfg(test)]
mod tests;

pub use confirm::{Confirmation, Denial, confirm};
pub use executor::unlock;

use crate::backend::{BackendResolver, ConfigResolver};
use crate::cli::ForceUnlockArgs;
use crate::config::Config;
use crate::context::StateContext;
use crate::error::{Result, StateLockError};
use crate::events::{Event, EventAction, Outcome, append_event};
use crate::locks::{LockId, LockInfo};
use crate::state::{Capability, StateHandle, classify};
use serde_json::json;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{debug, info, info_span, warn};

/// Inputs of one force-unlock invocation.
#[derive(Debug, Clone, Default)]
pub struct ForceUnlockRequest {
    /// Lock ID as given on the command line.
    pub lock_id: Option<String>,

    /// Configuration directory; the current directory when `None`.
    pub dir: Option<PathBuf>,

    /// Skip the confirmation prompt.
    pub force: bool,
}

impl From<ForceUnlockArgs> for ForceUnlockRequest {
    fn from(args: ForceUnlockArgs) -> Self {
        Self {
            lock_id: args.lock_id,
            dir: args.dir,
            force: args.force,
        }
    }
}

/// What a successful force-unlock did.
#[derive(Debug, Clone)]
pub struct ForceUnlockReport {
    pub lock_id: LockId,
    pub backend: String,
    pub confirmation: Confirmation,
}

/// Run the `force-unlock` command against stdin/stdout.
pub fn cmd_force_unlock(args: ForceUnlockArgs) -> Result<()> {
    let request = ForceUnlockRequest::from(args);
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    let report = force_unlock(&request, &ConfigResolver, &mut input, &mut output)?;
    print!("{}", success_message(&report));

    Ok(())
}

fn success_message(report: &ForceUnlockReport) -> String {
    let mut text = format!(
        "\nLock {} on {} has been successfully released!\n",
        report.lock_id, report.backend
    );
    if report.confirmation == Confirmation::ForcedSkip {
        text.push_str("(confirmation skipped with --force)\n");
    }
    text.push_str(
        "\nThe state has been unlocked, and commands should now be able to\n\
         obtain a new lock on the shared state.\n",
    );
    text
}

/// Force-release a lock.
///
/// `input` and `output` are only used by the confirmation prompt; with
/// `request.force` set neither is touched.
///
/// # Returns
///
/// * `Ok(ForceUnlockReport)` - The backend released the lock
/// * `Err(StateLockError::Usage)` - Missing or empty lock ID; nothing else ran
/// * `Err(StateLockError::Backend)` - Directory, config or backend could not be resolved
/// * `Err(StateLockError::Unsupported)` - The backend cannot lock
/// * `Err(StateLockError::LocalOnly)` - The backend is local storage, even with `force`
/// * `Err(StateLockError::Cancelled)` - The operator did not answer `yes`
/// * `Err(StateLockError::Prompt)` - No answer could be read
/// * `Err(StateLockError::Unlock)` - The backend release call failed
pub fn force_unlock<R, W>(
    request: &ForceUnlockRequest,
    resolver: &dyn BackendResolver,
    input: &mut R,
    output: &mut W,
) -> Result<ForceUnlockReport>
where
    R: BufRead + ?Sized,
    W: Write + ?Sized,
{
    let lock_id = LockId::from_arg(request.lock_id.as_deref())?;

    let ctx = StateContext::resolve(request.dir.as_deref())?;
    let config = Config::load_or_default(ctx.config_path())?;
    let handle = resolver.resolve(&ctx, &config)?;
    let backend = handle.describe();

    let span = info_span!("force_unlock", lock_id = %lock_id, backend = %backend);
    let _enter = span.enter();

    let capability = classify(handle.as_ref());
    debug!(%capability, force = request.force, "classified backend");
    match capability {
        Capability::NotLockable => return Err(StateLockError::Unsupported(backend)),
        Capability::LocalOnly => return Err(StateLockError::LocalOnly(backend)),
        Capability::Shared => {}
    }

    let description = if request.force {
        String::new()
    } else {
        describe_unlock(handle.as_ref(), &lock_id, &config)
    };

    let confirmation = confirm(request.force, &description, input, output);
    let audit = AuditRecord {
        ctx: &ctx,
        lock_id: &lock_id,
        backend: &backend,
        force: request.force,
    };

    match &confirmation {
        Confirmation::Denied(Denial::Declined { answer }) => {
            info!(answer = %answer, "operator declined force-unlock");
            audit.append(Outcome::Cancelled, None);
            return Err(StateLockError::Cancelled);
        }
        Confirmation::Denied(Denial::InputFailed { message }) => {
            warn!(error = %message, "could not read confirmation");
            audit.append(Outcome::PromptFailed, Some(message.as_str()));
            return Err(StateLockError::Prompt(message.clone()));
        }
        Confirmation::ForcedSkip | Confirmation::Granted => {}
    }

    if let Err(e) = unlock(handle.as_ref(), &lock_id) {
        audit.append(Outcome::Failed, Some(&e.to_string()));
        return Err(e);
    }

    info!("lock released");
    audit.append(Outcome::Unlocked, None);

    Ok(ForceUnlockReport {
        lock_id,
        backend,
        confirmation,
    })
}

/// Prompt text: what will happen, plus what the backend says is currently held.
fn describe_unlock(handle: &dyn StateHandle, lock_id: &LockId, config: &Config) -> String {
    let mut text = format!(
        "statelock will remove the lock on {}.\n\
         This will allow other commands to modify this state, even though it\n\
         may still be in use. A process that still believes it holds the lock\n\
         may have its writes silently invalidated.",
        handle.describe()
    );

    let held = match handle.locker().map(|locker| locker.lock_info()) {
        Some(Ok(held)) => held,
        Some(Err(e)) => {
            warn!(error = %e, "could not read current lock info");
            text.push_str(&format!(
                "\n\nThe recorded lock holder is unreadable ({}).\n\
                 The lock cannot be matched against the given ID.",
                e
            ));
            return text;
        }
        None => return text,
    };

    match held {
        Some(held) => {
            text.push_str("\n\n");
            text.push_str(&describe_held_lock(&held, config));
            if &held.id != lock_id {
                text.push_str(&format!(
                    "\n\nWarning: lock ID {:?} does not match the lock currently held ({:?}).\n\
                     The backend decides whether a mismatched ID is refused.",
                    lock_id.as_str(),
                    held.id.as_str()
                ));
            }
        }
        None => {
            text.push_str("\n\nNo lock is currently recorded for this state.");
        }
    }

    text
}

fn describe_held_lock(held: &LockInfo, config: &Config) -> String {
    let mut text = format!(
        "Lock Info:\n  ID:        {}\n  Operation: {}\n  Who:       {}\n  Created:   {} ({} ago)",
        held.id,
        held.operation,
        held.who,
        held.created.format("%Y-%m-%d %H:%M:%S UTC"),
        held.age_string()
    );
    if let Some(pid) = held.pid {
        text.push_str(&format!("\n  PID:       {}", pid));
    }
    if !held.path.is_empty() {
        text.push_str(&format!("\n  Path:      {}", held.path));
    }
    if !held.info.is_empty() {
        text.push_str(&format!("\n  Info:      {}", held.info));
    }
    if held.is_stale(config.lock_stale_minutes) {
        text.push_str(&format!(
            "\n  Status:    STALE (exceeds {} min threshold)",
            config.lock_stale_minutes
        ));
    }
    text
}

struct AuditRecord<'a> {
    ctx: &'a StateContext,
    lock_id: &'a LockId,
    backend: &'a str,
    force: bool,
}

impl AuditRecord<'_> {
    fn append(&self, outcome: Outcome, error: Option<&str>) {
        let mut details = json!({
            "backend": self.backend,
            "force": self.force,
            "outcome": outcome,
        });
        if let Some(error) = error {
            details["error"] = json!(error);
        }

        let event = Event::new(EventAction::ForceUnlock)
            .with_lock_id(self.lock_id)
            .with_details(details);

        // The unlock outcome stands even if the audit trail cannot be written
        if let Err(e) = append_event(self.ctx, &event) {
            eprintln!("Warning: failed to log force_unlock event: {}", e);
        }
    }
}
