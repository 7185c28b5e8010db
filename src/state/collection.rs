//! Device collection store.
//!
//! DESIGN
//! ======
//! Every collection run is logged into a newest-first result list, success or
//! not, so the console can show what was gathered and what failed. Busy flags
//! are counted per task and released by a drop guard, which keeps them
//! accurate when runs overlap or a caller drops the future. The MAC table
//! holds whichever load was started last; older loads finishing late are
//! discarded through a generation ticket, the same way the device list is
//! guarded.

#[cfg(test)]
#[path = "collection_test.rs"]
mod tests;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use serde_json::Value;

use crate::net::api::collection::{self, CollectKind, MacQuery};
use crate::net::client::ApiClient;
use crate::net::error::ApiError;
use crate::net::transport::ApiRequest;
use crate::net::types::{MacAddressEntry, OperationResult};

/// Sequence used by [`CollectionStore::collect_all`].
pub const COLLECT_ALL_ORDER: [CollectKind; 4] =
    [CollectKind::Version, CollectKind::Serial, CollectKind::Interfaces, CollectKind::MacTable];

/// Units of work that carry their own busy flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectTask {
    Version,
    Serial,
    Interfaces,
    MacTable,
    Batch,
    MacAddresses,
}

impl From<CollectKind> for CollectTask {
    fn from(kind: CollectKind) -> Self {
        match kind {
            CollectKind::Version => Self::Version,
            CollectKind::Serial => Self::Serial,
            CollectKind::Interfaces => Self::Interfaces,
            CollectKind::MacTable => Self::MacTable,
        }
    }
}

impl CollectTask {
    const ALL: [Self; 6] =
        [Self::Version, Self::Serial, Self::Interfaces, Self::MacTable, Self::Batch, Self::MacAddresses];

    fn slot(self) -> usize {
        match self {
            Self::Version => 0,
            Self::Serial => 1,
            Self::Interfaces => 2,
            Self::MacTable => 3,
            Self::Batch => 4,
            Self::MacAddresses => 5,
        }
    }

    /// Title used for entries in the result log.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Version => "version collection",
            Self::Serial => "serial number collection",
            Self::Interfaces => "interface collection",
            Self::MacTable => "MAC table collection",
            Self::Batch => "batch collection",
            Self::MacAddresses => "MAC address lookup",
        }
    }
}

/// In-flight counts per task.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CollectionLoading {
    running: [u32; 6],
}

impl CollectionLoading {
    #[must_use]
    pub fn is(&self, task: CollectTask) -> bool {
        self.running[task.slot()] > 0
    }

    #[must_use]
    pub fn any(&self) -> bool {
        CollectTask::ALL.iter().any(|task| self.is(*task))
    }

    fn enter(&mut self, task: CollectTask) {
        self.running[task.slot()] += 1;
    }

    fn leave(&mut self, task: CollectTask) {
        let slot = &mut self.running[task.slot()];
        *slot = slot.saturating_sub(1);
    }
}

/// One line of the result log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionEntry {
    pub title: String,
    pub success: bool,
    pub message: String,
    pub data: Option<Value>,
    pub timestamp_ms: i64,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct CollectionState {
    pub loading: CollectionLoading,
    /// Newest first.
    pub results: Vec<CollectionEntry>,
    pub mac_table: Vec<MacAddressEntry>,
    /// Device whose MAC table was loaded last; `None` after a search or a
    /// global listing.
    pub current_device_id: Option<i64>,
}

impl CollectionState {
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading.any()
    }

    #[must_use]
    pub fn has_results(&self) -> bool {
        !self.results.is_empty()
    }

    #[must_use]
    pub fn has_mac_data(&self) -> bool {
        !self.mac_table.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectStep {
    pub kind: CollectKind,
    pub result: OperationResult,
}

/// Aggregate of a [`CollectionStore::collect_all`] run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectAllOutcome {
    pub success: bool,
    /// Steps that completed before any failure.
    pub results: Vec<CollectStep>,
    pub message: String,
}

pub struct CollectionStore {
    client: Arc<ApiClient>,
    state: Mutex<CollectionState>,
    mac_generation: AtomicU64,
}

struct Busy<'a> {
    store: &'a CollectionStore,
    task: CollectTask,
}

impl Drop for Busy<'_> {
    fn drop(&mut self) {
        self.store.lock().loading.leave(self.task);
    }
}

impl CollectionStore {
    #[must_use]
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client, state: Mutex::new(CollectionState::default()), mac_generation: AtomicU64::new(0) }
    }

    fn lock(&self) -> MutexGuard<'_, CollectionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn busy(&self, task: CollectTask) -> Busy<'_> {
        self.lock().loading.enter(task);
        Busy { store: self, task }
    }

    #[must_use]
    pub fn snapshot(&self) -> CollectionState {
        self.lock().clone()
    }

    #[must_use]
    pub fn results(&self) -> Vec<CollectionEntry> {
        self.lock().results.clone()
    }

    #[must_use]
    pub fn mac_table(&self) -> Vec<MacAddressEntry> {
        self.lock().mac_table.clone()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.lock().loading.any()
    }

    /// Prepend an entry to the result log.
    pub fn record(&self, title: &str, success: bool, message: &str, data: Option<Value>) {
        let entry =
            CollectionEntry { title: title.to_owned(), success, message: message.to_owned(), data, timestamp_ms: now_ms() };
        self.lock().results.insert(0, entry);
    }

    pub fn clear_results(&self) {
        self.lock().results.clear();
    }

    pub fn clear_mac_data(&self) {
        self.lock().mac_table.clear();
    }

    async fn run_logged(&self, task: CollectTask, request: ApiRequest) -> Result<OperationResult, ApiError> {
        match self.client.send_json::<OperationResult>(request).await {
            Ok(result) => {
                self.record(task.title(), result.success, &result.message, result.data.clone());
                tracing::debug!(task = task.title(), success = result.success, "collection finished");
                Ok(result)
            }
            Err(e) => {
                self.record(task.title(), false, &e.user_message(), None);
                Err(e)
            }
        }
    }

    /// Run one collection kind against a device. A successful MAC table run
    /// also reloads that device's MAC table.
    ///
    /// # Errors
    ///
    /// Returns the pipeline error; a failure entry is logged first.
    pub async fn collect(&self, device_id: i64, kind: CollectKind) -> Result<OperationResult, ApiError> {
        let task = CollectTask::from(kind);
        let _busy = self.busy(task);
        let result = self.run_logged(task, collection::collect(device_id, kind)).await?;

        if kind == CollectKind::MacTable && result.success {
            if let Err(e) = self.load_device_mac_table(device_id, None, None).await {
                self.record(task.title(), false, &e.user_message(), None);
                return Err(e);
            }
        }
        Ok(result)
    }

    /// # Errors
    ///
    /// Returns the pipeline error; a failure entry is logged first.
    pub async fn batch_collect(&self, device_ids: &[i64], kinds: &[CollectKind]) -> Result<OperationResult, ApiError> {
        let _busy = self.busy(CollectTask::Batch);
        self.run_logged(CollectTask::Batch, collection::batch_collect(device_ids, kinds)).await
    }

    /// Run every kind in [`COLLECT_ALL_ORDER`], one after another, stopping
    /// at the first request that fails outright. A step the device reports
    /// as unsuccessful does not stop the run but makes the aggregate fail.
    pub async fn collect_all(&self, device_id: i64) -> CollectAllOutcome {
        let mut results = Vec::with_capacity(COLLECT_ALL_ORDER.len());
        for kind in COLLECT_ALL_ORDER {
            match self.collect(device_id, kind).await {
                Ok(result) => results.push(CollectStep { kind, result }),
                Err(e) => {
                    tracing::info!(device_id, ?kind, error = %e, "collect-all stopped");
                    return CollectAllOutcome { success: false, results, message: e.user_message() };
                }
            }
        }
        let success = results.iter().all(|step| step.result.success);
        CollectAllOutcome { success, results, message: "collection complete".to_owned() }
    }

    /// Load one device's MAC table and remember the device.
    ///
    /// # Errors
    ///
    /// Returns the pipeline error.
    pub async fn load_device_mac_table(
        &self,
        device_id: i64,
        skip: Option<u64>,
        limit: Option<u64>,
    ) -> Result<Vec<MacAddressEntry>, ApiError> {
        self.load_mac_table(collection::device_mac_addresses(device_id, skip, limit), Some(device_id))
            .await
    }

    /// Replace the MAC table with the entries matching `mac_address`.
    ///
    /// # Errors
    ///
    /// Returns the pipeline error.
    pub async fn search_mac_addresses(&self, mac_address: &str) -> Result<Vec<MacAddressEntry>, ApiError> {
        self.load_mac_table(collection::search_mac(mac_address), None).await
    }

    /// Replace the MAC table with a filtered listing across devices.
    ///
    /// # Errors
    ///
    /// Returns the pipeline error.
    pub async fn all_mac_addresses(&self, query: &MacQuery) -> Result<Vec<MacAddressEntry>, ApiError> {
        self.load_mac_table(collection::mac_addresses(query), None).await
    }

    async fn load_mac_table(
        &self,
        request: ApiRequest,
        device_id: Option<i64>,
    ) -> Result<Vec<MacAddressEntry>, ApiError> {
        let _busy = self.busy(CollectTask::MacAddresses);
        let ticket = self.mac_generation.fetch_add(1, Ordering::SeqCst) + 1;
        let entries = self.client.send_json::<Vec<MacAddressEntry>>(request).await?;

        if self.mac_generation.load(Ordering::SeqCst) == ticket {
            let mut state = self.lock();
            state.mac_table = entries.clone();
            state.current_device_id = device_id;
        } else {
            tracing::debug!(ticket, "discarding stale MAC table");
        }
        Ok(entries)
    }
}

fn now_ms() -> i64 {
    let Ok(elapsed) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(elapsed.as_millis()).unwrap_or(0)
}
