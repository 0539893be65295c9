//! Async driver that runs [`Store`] operations over a [`Transport`].
//!
//! Each call performs the round trip(s) for one user action and only then
//! reconciles the store. Failures are logged here, at the call site, and
//! returned; nothing is retried.

use std::future::Future;

use futures::future::join_all;
use uuid::Uuid;

use crate::client::TodoClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::store::{Filter, Pending, Store};

/// Executes one HTTP request. A non-2xx status is a successful response
/// here; only a request that produced no response is an error.
pub trait Transport {
    fn execute(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, ApiError>>;
}

/// A [`Store`] wired to a transport.
#[derive(Debug)]
pub struct StoreClient<T> {
    store: Store,
    transport: T,
}

impl<T: Transport> StoreClient<T> {
    pub fn new(client: TodoClient, transport: T) -> Self {
        Self {
            store: Store::new(client),
            transport,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn refresh(&mut self) -> Result<(), ApiError> {
        let pending = self.store.begin_refresh();
        self.drive("refresh", Ok(Some(pending))).await
    }

    pub async fn add(&mut self, text: &str) -> Result<(), ApiError> {
        let pending = self.store.begin_add(text);
        self.drive("add", pending).await
    }

    /// Add whatever is in the input buffer; it is cleared on success.
    pub async fn add_input(&mut self) -> Result<(), ApiError> {
        let text = self.store.input().to_string();
        self.add(&text).await
    }

    pub async fn toggle(&mut self, id: Uuid) -> Result<(), ApiError> {
        let pending = self.store.begin_toggle(id);
        self.drive("toggle", pending).await
    }

    pub fn start_edit(&mut self, id: Uuid, text: impl Into<String>) {
        self.store.start_edit(id, text);
    }

    pub async fn save_edit(&mut self) -> Result<(), ApiError> {
        let pending = self.store.begin_save_edit();
        self.drive("save edit", pending).await
    }

    pub fn cancel_edit(&mut self) {
        self.store.cancel_edit();
    }

    pub async fn remove(&mut self, id: Uuid) -> Result<(), ApiError> {
        let pending = self.store.begin_remove(id);
        self.drive("remove", Ok(Some(pending))).await
    }

    /// Deletes every completed todo concurrently and waits for all of them.
    pub async fn clear_completed(&mut self) -> Result<(), ApiError> {
        let pending = self.store.begin_clear_completed();
        self.drive("clear completed", Ok(pending)).await
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.store.set_filter(filter);
    }

    async fn drive(
        &mut self,
        op: &'static str,
        pending: Result<Option<Pending>, ApiError>,
    ) -> Result<(), ApiError> {
        let result = match pending {
            Ok(None) => return Ok(()),
            Ok(Some(pending)) => {
                let responses = self.execute_all(pending.requests()).await;
                self.store.complete(pending, responses)
            }
            Err(err) => Err(err),
        };
        if let Err(err) = &result {
            tracing::warn!(op, "{err}");
        }
        result
    }

    async fn execute_all(&self, requests: &[HttpRequest]) -> Vec<Result<HttpResponse, ApiError>> {
        join_all(
            requests
                .iter()
                .cloned()
                .map(|request| self.transport.execute(request)),
        )
        .await
    }
}
