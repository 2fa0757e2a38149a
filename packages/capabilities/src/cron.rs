use std::str::FromStr;

use async_trait::async_trait;
use capability_types::{
    CapabilityId, CapabilityInfo, CapabilityKind, CronConfig, CronPayload, TriggerId,
};
use chrono::{DateTime, Utc};
use cron::Schedule;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::{
    capability::{Capability, TriggerCapability},
    error::CapabilityError,
    registry::{FireOutcome, TriggerReceiver, TriggerRegistry},
};

/// Cron trigger that only fires when told to
///
/// Schedules are validated on registration but never run on their own.
pub struct FakeCronTrigger {
    triggers: TriggerRegistry<Schedule, CronPayload>,
}

impl Default for FakeCronTrigger {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeCronTrigger {
    pub fn new() -> Self {
        Self {
            triggers: TriggerRegistry::new("cron-trigger"),
        }
    }

    #[instrument(skip(self, cancel), fields(subsys = "FakeCronTrigger"))]
    pub fn manual_trigger(
        &self,
        cancel: CancellationToken,
        id: &TriggerId,
    ) -> Result<JoinHandle<FireOutcome>, CapabilityError> {
        let payload = CronPayload {
            scheduled_execution_time: Utc::now(),
        };
        self.triggers.fire(cancel, id, payload)
    }

    /// When the registered schedule would next fire, if it ever does
    pub fn next_execution(&self, id: &TriggerId) -> Option<DateTime<Utc>> {
        self.triggers
            .config(id)
            .and_then(|schedule| schedule.upcoming(Utc).next())
    }
}

fn parse_schedule(expression: &str) -> Result<Schedule, CapabilityError> {
    Schedule::from_str(expression).map_err(|e| CapabilityError::InvalidSchedule {
        expression: expression.to_string(),
        reason: e.to_string(),
    })
}

impl Capability for FakeCronTrigger {
    fn info(&self) -> CapabilityInfo {
        let id = CapabilityId {
            name: "cron-trigger".to_string(),
            version: semver::Version::new(1, 0, 0),
        };
        CapabilityInfo::new(id, CapabilityKind::Trigger, "Fires on a cron schedule")
    }
}

#[async_trait]
impl TriggerCapability for FakeCronTrigger {
    type Config = CronConfig;
    type Payload = CronPayload;

    #[instrument(skip(self), fields(subsys = "FakeCronTrigger"))]
    async fn register_trigger(
        &self,
        id: TriggerId,
        config: CronConfig,
    ) -> Result<TriggerReceiver<CronPayload>, CapabilityError> {
        let schedule = parse_schedule(&config.schedule)?;
        self.triggers.register(id, schedule)
    }

    #[instrument(skip(self), fields(subsys = "FakeCronTrigger"))]
    async fn unregister_trigger(&self, id: &TriggerId) -> Result<(), CapabilityError> {
        self.triggers.unregister(id).map(|_| ())
    }
}
