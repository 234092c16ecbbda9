//! Command dispatch boundary
//!
//! Routes each tagged command to the owning component and converts every
//! outcome into a typed, user-facing reply:
//!
//! - conflicts (denied claim, non-occupant transition) are expected values,
//!   logged at debug level, no alarm
//! - validation failures ask the submitter to retry
//! - persistence and timeout failures report that the operation did not
//!   count
//! - anything unexpected is logged and becomes a generic internal reply;
//!   a bad command never crashes the process
//!
//! Events are delivered to the sink only after the state mutation committed;
//! a failed delivery is logged and never rolls the mutation back.

use crate::{
    command::Command,
    config::Config,
    error::{Error, Result},
    events::{DeskEvent, EventEnvelope, EventSink},
    flow::ResultSubmissionFlow,
    metrics,
};
use room_control::{
    ClaimArbiter, ClaimOutcome, OperatorId, RoomRegistry, RoomStatus, TurnController,
};
use serde::Serialize;
use shift_ledger::LedgerStore;
use std::sync::Arc;
use std::time::Duration;

/// Typed reply rendered by the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Reply {
    /// Requester now holds the room
    Assigned {
        /// Room name
        room: String,
        /// True when the requester already held the room
        reaffirmed: bool,
    },

    /// Room is held by someone else
    Denied {
        /// Room name
        room: String,
        /// Current occupant
        held_by: OperatorId,
    },

    /// Turn started
    TurnStarted {
        /// Room name
        room: String,
    },

    /// Review request forwarded to the supervisory audience
    ReviewNoted {
        /// Room name
        room: String,
    },

    /// Problem report forwarded
    Reported {
        /// Room name
        room: String,
    },

    /// Turn ended, room released
    TurnEnded {
        /// Room name
        room: String,
    },

    /// Submission appended to the ledger
    Submitted {
        /// Daily total of this submission
        daily_total: u64,
        /// Weekly running total including this submission
        weekly_accumulated: u64,
    },

    /// Ownership-gated transition attempted by a non-occupant
    NotOwner {
        /// Room name
        room: String,
    },

    /// Request failed validation; safe to correct and retry
    Invalid {
        /// What was wrong
        reason: String,
    },

    /// Operation did not count; safe to retry
    Failed {
        /// What failed
        reason: String,
    },

    /// Unexpected internal error
    Internal,
}

impl Reply {
    /// Outcome label for metrics
    fn status(&self) -> &'static str {
        match self {
            Reply::Assigned { .. }
            | Reply::TurnStarted { .. }
            | Reply::ReviewNoted { .. }
            | Reply::Reported { .. }
            | Reply::TurnEnded { .. }
            | Reply::Submitted { .. } => "ok",
            Reply::Denied { .. } | Reply::NotOwner { .. } => "conflict",
            Reply::Invalid { .. } => "invalid",
            Reply::Failed { .. } => "failed",
            Reply::Internal => "internal",
        }
    }
}

/// Routes commands to room control and the ledger
pub struct Dispatcher {
    registry: Arc<RoomRegistry>,
    ledger: Arc<LedgerStore>,
    arbiter: ClaimArbiter,
    turns: TurnController,
    flow: ResultSubmissionFlow,
    sink: Arc<dyn EventSink>,
    audience: Option<String>,
    timeout: Duration,
}

impl Dispatcher {
    /// Open all components from configuration
    pub fn open(config: &Config, sink: Arc<dyn EventSink>) -> Result<Self> {
        let registry = Arc::new(RoomRegistry::open(&config.room_config())?);
        let ledger = Arc::new(LedgerStore::open(config.ledger_config())?);

        Ok(Self {
            arbiter: ClaimArbiter::new(registry.clone()),
            turns: TurnController::new(registry.clone()),
            flow: ResultSubmissionFlow::new(ledger.clone()),
            registry,
            ledger,
            sink,
            audience: config.monitor_audience.clone(),
            timeout: Duration::from_millis(config.request_timeout_ms),
        })
    }

    /// Room registry handle, for presentation-layer snapshots
    pub fn registry(&self) -> &Arc<RoomRegistry> {
        &self.registry
    }

    /// Ledger handle
    pub fn ledger(&self) -> &Arc<LedgerStore> {
        &self.ledger
    }

    /// Ordered room snapshot
    pub fn rooms(&self) -> Vec<RoomStatus> {
        self.registry.list_rooms()
    }

    /// Shutdown ledger writers
    pub async fn shutdown(&self) -> Result<()> {
        self.ledger.shutdown().await?;
        Ok(())
    }

    /// Handle one command to completion
    ///
    /// Never returns an error: every failure is folded into a reply.
    pub async fn handle(&self, command: Command) -> Reply {
        let kind = command.kind();

        let reply = match self.dispatch(command).await {
            Ok(reply) => reply,
            Err(err) => self.classify(err),
        };

        metrics::DESK_COMMANDS_TOTAL
            .with_label_values(&[kind, reply.status()])
            .inc();

        reply
    }

    async fn dispatch(&self, command: Command) -> Result<Reply> {
        match command {
            Command::Claim { room, operator } => {
                match self.arbiter.claim(&room, &operator).await? {
                    ClaimOutcome::Assigned {
                        room,
                        operator,
                        reaffirmed,
                    } => {
                        self.emit(DeskEvent::RoomClaimed {
                            room: room.clone(),
                            operator,
                        });
                        Ok(Reply::Assigned { room, reaffirmed })
                    }
                    ClaimOutcome::Rejected { room, held_by } => {
                        metrics::DESK_CLAIM_DENIALS_TOTAL.inc();
                        self.emit(DeskEvent::RoomDenied {
                            room: room.clone(),
                            held_by: held_by.clone(),
                        });
                        Ok(Reply::Denied { room, held_by })
                    }
                }
            }

            Command::Start { room, operator } => {
                let record = self.turns.start(&room, &operator).await?;
                self.emit(DeskEvent::TurnStarted {
                    room: record.room.clone(),
                    operator: record.operator,
                    at: record.at,
                });
                Ok(Reply::TurnStarted { room: record.room })
            }

            Command::Review { room, operator } => {
                let record = self.turns.review(&room, &operator).await?;
                self.emit(DeskEvent::ReviewRequested {
                    room: record.room.clone(),
                    operator: record.operator,
                    audience: self.audience.clone(),
                    at: record.at,
                });
                Ok(Reply::ReviewNoted { room: record.room })
            }

            Command::Report {
                room,
                operator,
                text,
            } => {
                let record = self.turns.report(&room, &operator)?;
                self.emit(DeskEvent::ProblemReported {
                    room: record.room.clone(),
                    operator: record.operator,
                    text,
                    at: record.at,
                });
                Ok(Reply::Reported { room: record.room })
            }

            Command::End { room, operator } => {
                let record = self.turns.end(&room, &operator).await?;
                self.emit(DeskEvent::TurnEnded {
                    room: record.room.clone(),
                    operator: record.operator,
                    at: record.at,
                });
                Ok(Reply::TurnEnded { room: record.room })
            }

            Command::Submit { operator, entries } => {
                let timer = metrics::DESK_APPEND_DURATION.start_timer();
                let result =
                    tokio::time::timeout(self.timeout, self.flow.submit(&operator, &entries))
                        .await
                        .map_err(|_| {
                            Error::Timeout(format!("Ledger append for {}", operator))
                        })?;
                timer.observe_duration();

                let row = result?;
                self.emit(DeskEvent::ResultSubmitted {
                    operator: shift_ledger::OperatorKey::new(operator.as_str()),
                    values: row.values.clone(),
                    daily_total: row.daily_total,
                    weekly_accumulated: row.weekly_accumulated,
                    at: chrono::Utc::now(),
                });
                Ok(Reply::Submitted {
                    daily_total: row.daily_total,
                    weekly_accumulated: row.weekly_accumulated,
                })
            }
        }
    }

    /// Deliver an event after the mutation committed
    fn emit(&self, event: DeskEvent) {
        let envelope = EventEnvelope::new(event);
        if let Err(err) = self.sink.deliver(&envelope) {
            tracing::warn!(
                kind = envelope.event.kind(),
                error = %err,
                "Event delivery failed; state mutation stands"
            );
        }
    }

    /// Fold an error into the user-facing taxonomy
    fn classify(&self, err: Error) -> Reply {
        match err {
            Error::Rooms(room_control::Error::NotOwner { room, .. }) => {
                tracing::debug!(room = %room, "Transition gated: requester is not the occupant");
                Reply::NotOwner { room }
            }
            Error::Rooms(room_control::Error::UnknownRoom(room)) => Reply::Invalid {
                reason: format!("Unknown room: {}", room),
            },
            Error::Ledger(shift_ledger::Error::UnknownCategory(category)) => Reply::Invalid {
                reason: format!("Unknown category: {}", category),
            },
            Error::Validation(reason) => Reply::Invalid { reason },
            Error::Timeout(what) => {
                tracing::error!(what = %what, "External call timed out");
                Reply::Failed {
                    reason: format!("Timed out: {}", what),
                }
            }
            Error::Rooms(room_control::Error::Storage(reason))
            | Error::Ledger(shift_ledger::Error::Sheet(reason)) => {
                tracing::error!(error = %reason, "Persistence failure");
                Reply::Failed { reason }
            }
            Error::Ledger(shift_ledger::Error::Io(err)) => {
                tracing::error!(error = %err, "Persistence failure");
                Reply::Failed {
                    reason: err.to_string(),
                }
            }
            other => {
                tracing::error!(error = %other, "Unexpected error at dispatch boundary");
                Reply::Internal
            }
        }
    }
}
