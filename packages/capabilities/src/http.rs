use async_trait::async_trait;
use capability_types::{
    CapabilityId, CapabilityInfo, CapabilityKind, HttpPayload, HttpTriggerConfig, TriggerId,
};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::{
    capability::{Capability, TriggerCapability},
    error::CapabilityError,
    registry::{FireOutcome, TriggerReceiver, TriggerRegistry},
};

/// Http trigger without a server, payloads are handed in through [`Self::manual_trigger`]
pub struct FakeHttpTrigger {
    triggers: TriggerRegistry<HttpTriggerConfig, HttpPayload>,
}

impl Default for FakeHttpTrigger {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeHttpTrigger {
    pub fn new() -> Self {
        Self {
            triggers: TriggerRegistry::new("http-trigger"),
        }
    }

    #[instrument(skip(self, cancel, payload), fields(subsys = "FakeHttpTrigger"))]
    pub fn manual_trigger(
        &self,
        cancel: CancellationToken,
        id: &TriggerId,
        payload: HttpPayload,
    ) -> Result<JoinHandle<FireOutcome>, CapabilityError> {
        let config = self
            .triggers
            .config(id)
            .ok_or_else(|| CapabilityError::NotRegistered(id.clone()))?;

        if !config.is_authorized(payload.key.as_ref()) {
            tracing::warn!("Rejected payload for trigger {}", id);
            return Err(CapabilityError::Unauthorized(id.clone()));
        }

        self.triggers.fire(cancel, id, payload)
    }
}

impl Capability for FakeHttpTrigger {
    fn info(&self) -> CapabilityInfo {
        let id = CapabilityId {
            name: "http-trigger".to_string(),
            version: semver::Version::new(1, 0, 0),
        };
        CapabilityInfo::new(
            id,
            CapabilityKind::Trigger,
            "Fires when an authorized caller submits a payload",
        )
    }
}

#[async_trait]
impl TriggerCapability for FakeHttpTrigger {
    type Config = HttpTriggerConfig;
    type Payload = HttpPayload;

    #[instrument(skip(self, config), fields(subsys = "FakeHttpTrigger", keys = config.authorized_keys.len()))]
    async fn register_trigger(
        &self,
        id: TriggerId,
        config: HttpTriggerConfig,
    ) -> Result<TriggerReceiver<HttpPayload>, CapabilityError> {
        self.triggers.register(id, config)
    }

    #[instrument(skip(self), fields(subsys = "FakeHttpTrigger"))]
    async fn unregister_trigger(&self, id: &TriggerId) -> Result<(), CapabilityError> {
        self.triggers.unregister(id).map(|_| ())
    }
}
