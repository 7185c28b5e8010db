//! Device list store.
//!
//! Caches the inventory list with loading/error flags and keeps it in step
//! with create/update/delete calls. Every operation takes a generation
//! ticket. A superseded fetch is dropped so an old list can never overwrite
//! newer state; a superseded mutation still applies its idempotent edit but
//! leaves `loading` and `error` to the newer operation.

#[cfg(test)]
#[path = "devices_test.rs"]
mod tests;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;

use crate::net::api::devices;
use crate::net::client::ApiClient;
use crate::net::error::ApiError;
use crate::net::types::{BatchOperationResult, Device, ListQuery};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct DeviceState {
    pub devices: Vec<Device>,
    pub loading: bool,
    pub error: Option<String>,
    pub current: Option<Device>,
}

pub struct DeviceStore {
    client: Arc<ApiClient>,
    state: Mutex<DeviceState>,
    generation: AtomicU64,
}

impl DeviceStore {
    #[must_use]
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client, state: Mutex::new(DeviceState::default()), generation: AtomicU64::new(0) }
    }

    fn lock(&self) -> MutexGuard<'_, DeviceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn start(&self) -> u64 {
        let mut state = self.lock();
        state.loading = true;
        state.error = None;
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket
    }

    /// Apply a completed mutation. Edits must be idempotent: a newer fetch
    /// may already hold the server's view of the same change. Only the
    /// latest operation clears `loading`.
    fn settle(&self, ticket: u64, edit: impl FnOnce(&mut DeviceState)) {
        let mut state = self.lock();
        edit(&mut state);
        if self.is_current(ticket) {
            state.loading = false;
        }
    }

    fn fail(&self, ticket: u64, error: ApiError) -> ApiError {
        if self.is_current(ticket) {
            let mut state = self.lock();
            state.loading = false;
            state.error = Some(error.to_string());
        } else {
            tracing::debug!(ticket, error = %error, "device operation failed after being superseded");
        }
        error
    }

    #[must_use]
    pub fn snapshot(&self) -> DeviceState {
        self.lock().clone()
    }

    #[must_use]
    pub fn devices(&self) -> Vec<Device> {
        self.lock().devices.clone()
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.lock().devices.len()
    }

    #[must_use]
    pub fn active(&self) -> Vec<Device> {
        self.lock().devices.iter().filter(|d| d.is_active()).cloned().collect()
    }

    #[must_use]
    pub fn inactive(&self) -> Vec<Device> {
        self.lock().devices.iter().filter(|d| !d.is_active()).cloned().collect()
    }

    /// Load the device list. A result arriving after a newer fetch or a
    /// mutation started is dropped.
    ///
    /// # Errors
    ///
    /// Returns the pipeline error; the message is also kept in `error`.
    pub async fn fetch(&self, query: &ListQuery) -> Result<(), ApiError> {
        let ticket = self.start();
        let result = self.client.send_json::<Vec<Device>>(devices::list(query)).await;

        if !self.is_current(ticket) {
            tracing::debug!(ticket, "discarding stale device list");
            return result.map(|_| ());
        }
        match result {
            Ok(list) => {
                self.settle(ticket, |state| state.devices = list);
                Ok(())
            }
            Err(e) => Err(self.fail(ticket, e)),
        }
    }

    /// Load one device into `current`. A superseded result is returned but
    /// not stored.
    ///
    /// # Errors
    ///
    /// Returns the pipeline error.
    pub async fn fetch_one(&self, id: i64) -> Result<Device, ApiError> {
        let ticket = self.start();
        let device = self
            .client
            .send_json::<Device>(devices::get(id))
            .await
            .map_err(|e| self.fail(ticket, e))?;
        if self.is_current(ticket) {
            self.settle(ticket, |state| state.current = Some(device.clone()));
        }
        Ok(device)
    }

    /// Create a device and insert it into the list, replacing any entry a
    /// newer fetch already brought in.
    ///
    /// # Errors
    ///
    /// Returns the pipeline error.
    pub async fn create(&self, data: Value) -> Result<Device, ApiError> {
        let ticket = self.start();
        let device = self
            .client
            .send_json::<Device>(devices::create(data))
            .await
            .map_err(|e| self.fail(ticket, e))?;
        self.settle(ticket, |state| upsert(&mut state.devices, device.clone()));
        Ok(device)
    }

    /// # Errors
    ///
    /// Returns the pipeline error.
    pub async fn update(&self, id: i64, data: Value) -> Result<Device, ApiError> {
        let ticket = self.start();
        let device = self
            .client
            .send_json::<Device>(devices::update(id, data))
            .await
            .map_err(|e| self.fail(ticket, e))?;
        self.settle(ticket, |state| {
            if let Some(slot) = state.devices.iter_mut().find(|d| d.id == id) {
                *slot = device.clone();
            }
        });
        Ok(device)
    }

    /// # Errors
    ///
    /// Returns the pipeline error.
    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        let ticket = self.start();
        self.client.send(devices::delete(id)).await.map_err(|e| self.fail(ticket, e))?;
        self.settle(ticket, |state| state.devices.retain(|d| d.id != id));
        Ok(())
    }

    /// Delete several devices; the local list only changes if the backend
    /// reports success.
    ///
    /// # Errors
    ///
    /// Returns the pipeline error.
    pub async fn batch_delete(&self, ids: &[i64]) -> Result<BatchOperationResult, ApiError> {
        let ticket = self.start();
        let result = self
            .client
            .send_json::<BatchOperationResult>(devices::batch_delete(ids))
            .await
            .map_err(|e| self.fail(ticket, e))?;
        self.settle(ticket, |state| {
            if result.success {
                state.devices.retain(|d| !ids.contains(&d.id));
            }
        });
        Ok(result)
    }

    /// Set `status` on several devices in one request; the local list only
    /// changes if the backend reports success.
    ///
    /// # Errors
    ///
    /// Returns the pipeline error.
    pub async fn batch_update_status(&self, ids: &[i64], status: &str) -> Result<BatchOperationResult, ApiError> {
        let ticket = self.start();
        let result = self
            .client
            .send_json::<BatchOperationResult>(devices::batch_update_status(ids, status))
            .await
            .map_err(|e| self.fail(ticket, e))?;
        self.settle(ticket, |state| {
            if result.success {
                for device in state.devices.iter_mut().filter(|d| ids.contains(&d.id)) {
                    device.status = status.to_owned();
                }
            }
        });
        Ok(result)
    }
}

fn upsert(devices: &mut Vec<Device>, device: Device) {
    match devices.iter_mut().find(|d| d.id == device.id) {
        Some(slot) => *slot = device,
        None => devices.push(device),
    }
}
