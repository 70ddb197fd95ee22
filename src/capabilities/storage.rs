//! Durable key-value capability for the UI-state snapshot. The shell backs
//! it with whatever store it has (local storage on the web, a file on
//! desktop); the core reads once at startup and writes fire-and-forget.

use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum StorageOperation {
    Read { key: String },
    Write { key: String, value: Vec<u8> },
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum StorageOutput {
    /// `None` when the key has never been written.
    Value(Option<Vec<u8>>),
    Written,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage write failed: {0}")]
    WriteFailed(String),
}

pub type StorageResult = Result<StorageOutput, StorageError>;

impl Operation for StorageOperation {
    type Output = StorageResult;
}

pub struct Storage<Ev> {
    context: CapabilityContext<StorageOperation, Ev>,
}

impl<Ev> std::fmt::Debug for Storage<Ev> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage").finish_non_exhaustive()
    }
}

impl<Ev> Capability<Ev> for Storage<Ev> {
    type Operation = StorageOperation;
    type MappedSelf<MappedEv> = Storage<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static,
    {
        Storage::new(self.context.map_event(f))
    }
}

impl<Ev> Storage<Ev> {
    pub fn new(context: CapabilityContext<StorageOperation, Ev>) -> Self {
        Self { context }
    }
}

impl<Ev> Storage<Ev>
where
    Ev: Send + 'static,
{
    pub fn read<F>(&self, key: impl Into<String>, make_event: F)
    where
        F: FnOnce(StorageResult) -> Ev + Send + 'static,
    {
        let key = key.into();
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let result = ctx.request_from_shell(StorageOperation::Read { key }).await;
            ctx.update_app(make_event(result));
        });
    }

    /// Fire-and-forget write; a failed save costs a little convenience on
    /// the next launch, nothing more.
    pub fn write(&self, key: impl Into<String>, value: Vec<u8>) {
        let key = key.into();
        let ctx = self.context.clone();
        self.context.spawn(async move {
            ctx.notify_shell(StorageOperation::Write { key, value }).await;
        });
    }
}
