use chrono::{DateTime, Utc};
use engine::ErrorKind;
use serde::{Deserialize, Serialize};
use timeline::{Seconds, TimelineStore};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{Orchestrator, Plan, PlanCommand, Result, TransitionRequest};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CommandOutcome {
    Done { summary: String },
    Failed { kind: ErrorKind, error: String },
    /// Not attempted because an earlier failure left the device unusable.
    Skipped,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandReport {
    pub step: usize,
    pub command: PlanCommand,
    #[serde(flatten)]
    pub outcome: CommandOutcome,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub session_id: Option<Uuid>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub commands: Vec<CommandReport>,
    /// Clip durations after the run.
    pub durations: Vec<Seconds>,
}

impl RunReport {
    pub fn succeeded(&self) -> usize {
        self.count(|o| matches!(o, CommandOutcome::Done { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, CommandOutcome::Failed { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, CommandOutcome::Skipped))
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    fn count(&self, pred: impl Fn(&CommandOutcome) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(&c.outcome)).count()
    }
}

impl Orchestrator {
    /// Runs one plan command. Returns a one-line summary.
    pub async fn execute(&self, store: &mut TimelineStore, command: &PlanCommand) -> Result<String> {
        match command {
            PlanCommand::ChangeDuration {
                image_idx,
                duration,
            } => {
                let change = self.change_duration(store, *image_idx, *duration).await?;
                Ok(format!(
                    "clip {} duration {}s -> {}s",
                    change.clip, change.previous, change.duration
                ))
            }
            PlanCommand::AddTransition {
                image1_idx,
                image2_idx,
                transition_type,
                all_apply,
            } => {
                let request = TransitionRequest {
                    first: *image1_idx,
                    second: *image2_idx,
                    transition: transition_type.clone(),
                    all_apply: *all_apply,
                };
                let applied = self.add_transition(store, &request).await?;
                Ok(format!(
                    "'{}' on junction {}{}",
                    applied.transition,
                    applied.junction,
                    if applied.all_apply { " (applied to all)" } else { "" }
                ))
            }
            PlanCommand::ApplyEffect {
                image_idx,
                effects_list,
            } => {
                let applied = self.apply_effect(store, *image_idx, effects_list).await?;
                let names: Vec<&str> = applied.iter().map(|e| e.name.as_str()).collect();
                Ok(format!("clip {} effects [{}]", image_idx, names.join(", ")))
            }
        }
    }

    /// Executes `plan` in order. A failed command is recorded and the run
    /// moves on; prior model changes are kept. Once a failure leaves the
    /// device unusable the remaining commands are skipped.
    pub async fn run_plan(&self, store: &mut TimelineStore, plan: &Plan) -> RunReport {
        let started_at = Utc::now();
        let mut commands = Vec::with_capacity(plan.len());
        let mut halted = false;

        for (i, command) in plan.plan.iter().enumerate() {
            let step = i + 1;
            let step_started = Utc::now();
            let outcome = if halted {
                CommandOutcome::Skipped
            } else {
                info!("step {}/{}: {}", step, plan.len(), command);
                match self.execute(store, command).await {
                    Ok(summary) => CommandOutcome::Done { summary },
                    Err(e) => {
                        if e.is_recoverable() {
                            warn!("step {} failed: {}", step, e);
                        } else {
                            error!("step {} failed, stopping: {}", step, e);
                            halted = true;
                        }
                        CommandOutcome::Failed {
                            kind: e.kind(),
                            error: e.to_string(),
                        }
                    }
                }
            };
            commands.push(CommandReport {
                step,
                command: command.clone(),
                outcome,
                started_at: step_started,
                finished_at: Utc::now(),
            });
        }

        let (session_id, durations) = match store.session() {
            Ok(session) => (Some(session.id), session.model.durations().to_vec()),
            Err(_) => (None, Vec::new()),
        };
        RunReport {
            session_id,
            started_at,
            finished_at: Utc::now(),
            commands,
            durations,
        }
    }
}
