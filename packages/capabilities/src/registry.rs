//! Trigger registrations shared by every trigger capability.
//!
//! Each registration owns one channel. A firing spawns exactly one task that offers one
//! event and waits for the consumer to claim it, racing the caller's cancellation token.
//! An offer that is cancelled before it is claimed is never seen by the consumer, so the
//! handoff behaves like an unbuffered channel even though tokio's smallest channel holds
//! one item.

use capability_types::{TriggerEvent, TriggerId};
use dashmap::{mapref::entry::Entry, DashMap};
use futures::Stream;
use tokio::{
    runtime::Handle,
    sync::{mpsc, oneshot},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;

use crate::error::CapabilityError;

/// How a single firing ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireOutcome {
    /// The consumer received the event
    Delivered,
    /// The caller's token was cancelled before the consumer received the event
    Cancelled,
    /// The receiver was dropped
    Closed,
}

struct Offer<T> {
    event: TriggerEvent<T>,
    claim: oneshot::Sender<()>,
}

/// The consuming end of a trigger registration
///
/// Yields `None` once the trigger is unregistered and no firing is in flight.
pub struct TriggerReceiver<T> {
    inner: mpsc::Receiver<Offer<T>>,
}

impl<T> TriggerReceiver<T> {
    pub async fn recv(&mut self) -> Option<TriggerEvent<T>> {
        while let Some(offer) = self.inner.recv().await {
            if let Some(event) = offer.claim() {
                return Some(event);
            }
        }
        None
    }

    /// Returns an event only if one is offered right now
    pub fn try_recv(&mut self) -> Option<TriggerEvent<T>> {
        while let Ok(offer) = self.inner.try_recv() {
            if let Some(event) = offer.claim() {
                return Some(event);
            }
        }
        None
    }

    pub fn into_stream(self) -> impl Stream<Item = TriggerEvent<T>> {
        futures::stream::unfold(self, |mut receiver| async move {
            receiver.recv().await.map(|event| (event, receiver))
        })
    }
}

impl<T> Offer<T> {
    fn claim(self) -> Option<TriggerEvent<T>> {
        match self.claim.send(()) {
            Ok(()) => Some(self.event),
            Err(()) => {
                // the firing task gave up before we got here
                tracing::debug!(
                    trigger_id = %self.event.trigger_id,
                    event_id = %self.event.event_id,
                    "Skipping abandoned trigger event"
                );
                None
            }
        }
    }
}

struct Registration<C, T> {
    config: C,
    sender: mpsc::Sender<Offer<T>>,
}

pub struct TriggerRegistry<C, T> {
    // for logging, e.g. "cron-trigger"
    name: &'static str,
    registrations: DashMap<TriggerId, Registration<C, T>>,
}

impl<C, T> TriggerRegistry<C, T>
where
    C: Clone,
    T: Send + 'static,
{
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            registrations: DashMap::new(),
        }
    }

    pub fn register(
        &self,
        id: TriggerId,
        config: C,
    ) -> Result<TriggerReceiver<T>, CapabilityError> {
        match self.registrations.entry(id) {
            Entry::Occupied(entry) => Err(CapabilityError::AlreadyRegistered(entry.key().clone())),
            Entry::Vacant(entry) => {
                let (sender, inner) = mpsc::channel(1);
                tracing::debug!(registry = self.name, trigger_id = %entry.key(), "Registered trigger");
                entry.insert(Registration { config, sender });
                Ok(TriggerReceiver { inner })
            }
        }
    }

    /// Drops the registration, the receiver ends once in-flight firings finish
    pub fn unregister(&self, id: &TriggerId) -> Result<C, CapabilityError> {
        let (_, registration) = self
            .registrations
            .remove(id)
            .ok_or_else(|| CapabilityError::NotRegistered(id.clone()))?;

        tracing::debug!(registry = self.name, trigger_id = %id, "Unregistered trigger");
        Ok(registration.config)
    }

    pub fn config(&self, id: &TriggerId) -> Option<C> {
        self.registrations.get(id).map(|r| r.config.clone())
    }

    pub fn is_registered(&self, id: &TriggerId) -> bool {
        self.registrations.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Spawns the one task that offers `payload` to the registered consumer
    ///
    /// Fails right away if `id` is not registered, nothing is kept for a later registration.
    /// The task runs on the current tokio runtime, calling this outside one is `NoRuntime`.
    pub fn fire(
        &self,
        cancel: CancellationToken,
        id: &TriggerId,
        payload: T,
    ) -> Result<JoinHandle<FireOutcome>, CapabilityError> {
        let sender = self
            .registrations
            .get(id)
            .map(|r| r.sender.clone())
            .ok_or_else(|| CapabilityError::NotRegistered(id.clone()))?;

        let runtime = Handle::try_current().map_err(|_| CapabilityError::NoRuntime)?;

        let event = TriggerEvent::new(id.clone(), payload);
        let name = self.name;
        let trigger_id = id.clone();
        let event_id = event.event_id.clone();

        Ok(runtime.spawn(async move {
            let outcome = offer(sender, event, cancel).await;
            tracing::debug!(
                registry = name,
                trigger_id = %trigger_id,
                event_id = %event_id,
                ?outcome,
                "Trigger fired"
            );
            outcome
        }))
    }
}

async fn offer<T>(
    sender: mpsc::Sender<Offer<T>>,
    event: TriggerEvent<T>,
    cancel: CancellationToken,
) -> FireOutcome {
    let (claim, mut claimed) = oneshot::channel();

    tokio::select! {
        biased;
        _ = cancel.cancelled() => return FireOutcome::Cancelled,
        sent = sender.send(Offer { event, claim }) => {
            if sent.is_err() {
                return FireOutcome::Closed;
            }
        }
    }

    tokio::select! {
        biased;
        result = &mut claimed => match result {
            Ok(()) => FireOutcome::Delivered,
            // the offer was dropped unclaimed along with the receiver
            Err(_) => FireOutcome::Closed,
        },
        _ = cancel.cancelled() => {
            // after close, a claim either already landed or never will
            claimed.close();
            match claimed.try_recv() {
                Ok(()) => FireOutcome::Delivered,
                Err(_) => FireOutcome::Cancelled,
            }
        }
    }
}
