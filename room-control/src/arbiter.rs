//! Claim arbitration
//!
//! Translates the registry's `ClaimDecision` into the outcome shown to the
//! requester. A denial is a final answer for that request; there are no
//! retries, though a later manual re-claim may succeed once the room frees up.

use crate::{
    registry::RoomRegistry,
    types::{ClaimDecision, ClaimOutcome, OperatorId},
    Result,
};
use std::sync::Arc;

/// Arbitrates claims over the shared room pool
pub struct ClaimArbiter {
    registry: Arc<RoomRegistry>,
}

impl ClaimArbiter {
    /// Create new arbiter over a registry
    pub fn new(registry: Arc<RoomRegistry>) -> Self {
        Self { registry }
    }

    /// Claim a room on behalf of an operator
    ///
    /// `Granted` and `Reaffirmed` both yield an assignment; `Denied` yields a
    /// rejection naming the current occupant.
    pub async fn claim(&self, room: &str, operator: &OperatorId) -> Result<ClaimOutcome> {
        match self.registry.claim(room, operator).await? {
            ClaimDecision::Granted => Ok(ClaimOutcome::Assigned {
                room: room.to_string(),
                operator: operator.clone(),
                reaffirmed: false,
            }),
            ClaimDecision::Reaffirmed => Ok(ClaimOutcome::Assigned {
                room: room.to_string(),
                operator: operator.clone(),
                reaffirmed: true,
            }),
            ClaimDecision::Denied(held_by) => Ok(ClaimOutcome::Rejected {
                room: room.to_string(),
                held_by,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;
    use tempfile::TempDir;

    fn open_arbiter() -> (ClaimArbiter, Arc<RoomRegistry>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            data_dir: temp_dir.path().to_path_buf(),
            ..Default::default()
        };
        let registry = Arc::new(RoomRegistry::open(&config).unwrap());
        (ClaimArbiter::new(registry.clone()), registry, temp_dir)
    }

    #[tokio::test]
    async fn test_grant_and_reaffirm_both_assign() {
        let (arbiter, _registry, _temp) = open_arbiter();
        let op = OperatorId::new("op-1");

        let first = arbiter.claim("Room 1", &op).await.unwrap();
        assert_eq!(
            first,
            ClaimOutcome::Assigned {
                room: "Room 1".to_string(),
                operator: op.clone(),
                reaffirmed: false,
            }
        );

        let second = arbiter.claim("Room 1", &op).await.unwrap();
        assert_eq!(
            second,
            ClaimOutcome::Assigned {
                room: "Room 1".to_string(),
                operator: op,
                reaffirmed: true,
            }
        );
    }

    #[tokio::test]
    async fn test_denial_names_holder() {
        let (arbiter, registry, _temp) = open_arbiter();
        let holder = OperatorId::new("op-1");
        let intruder = OperatorId::new("op-2");

        arbiter.claim("Room 2", &holder).await.unwrap();
        let outcome = arbiter.claim("Room 2", &intruder).await.unwrap();

        assert_eq!(
            outcome,
            ClaimOutcome::Rejected {
                room: "Room 2".to_string(),
                held_by: holder.clone(),
            }
        );
        assert_eq!(registry.occupant("Room 2").unwrap(), Some(holder));
    }
}
