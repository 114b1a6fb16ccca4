//! Generic resource controller: binds one view to one REST collection.
//!
//! The controller owns the view state (list, form, flags, title) and exposes
//! load, create, update, remove and search. Reads are tagged with a request
//! token so a response that arrives after a newer read started is dropped
//! instead of overwriting fresher state.

pub mod form;
pub mod query;
pub mod shell;

use std::sync::atomic::{AtomicU64, Ordering};

use reqwest::Method;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::client::{ApiClient, ClientError};
use crate::model::{Entity, ResourceId};

pub use form::FieldError;
pub use query::{mode_from_query, query_value, Mode};
pub use shell::{Notice, NoticeKind, Shell};

pub const MSG_SAVED: &str = "Registro grabado!";
pub const MSG_SAVE_ERROR: &str = "Error al Grabar.";
pub const MSG_UPDATED: &str = "Registro actualizado!";
pub const MSG_UPDATE_ERROR: &str = "Error al actualizar.";
pub const MSG_DELETE_ERROR: &str = "Error al eliminar.";

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Field(#[from] FieldError),

    #[error("no record identifier: the controller is not in edit mode")]
    NotEditing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready,
    Error,
    Submitting,
    Navigating,
    Reloading,
}

/// Everything a view renders from.
#[derive(Clone, Debug)]
pub struct ViewState<E> {
    pub items: Vec<E>,
    pub form: E,
    pub loading: bool,
    pub error: bool,
    pub title: String,
    pub phase: Phase,
}

impl<E: Entity> ViewState<E> {
    fn new() -> Self {
        Self {
            items: Vec::new(),
            form: E::default(),
            loading: true,
            error: false,
            title: E::DESCRIPTOR.default_title.to_string(),
            phase: Phase::Loading,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetKind {
    Collection,
    Single,
}

/// A GET the controller knows how to store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadTarget {
    pub url: String,
    pub kind: TargetKind,
}

/// Whether a read's response was stored or dropped as stale.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadOutcome {
    Applied,
    Discarded,
}

pub struct Controller<E: Entity, S: Shell> {
    base_url: String,
    mode: Mode,
    client: ApiClient,
    shell: S,
    state: Mutex<ViewState<E>>,
    latest_read: AtomicU64,
}

impl<E: Entity, S: Shell> Controller<E, S> {
    /// `api_base` is the service root; the entity's collection is appended.
    pub fn new(api_base: &str, mode: Mode, client: ApiClient, shell: S) -> Self {
        let base_url = format!(
            "{}/{}",
            api_base.trim_end_matches('/'),
            E::DESCRIPTOR.collection
        );
        Self {
            base_url,
            mode,
            client,
            shell,
            state: Mutex::new(ViewState::new()),
            latest_read: AtomicU64::new(0),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub async fn snapshot(&self) -> ViewState<E> {
        self.state.lock().await.clone()
    }

    pub fn collection_target(&self) -> LoadTarget {
        LoadTarget {
            url: self.base_url.clone(),
            kind: TargetKind::Collection,
        }
    }

    pub fn record_url(&self, id: &ResourceId) -> String {
        format!("{}/{}", self.base_url, id)
    }

    /// Target of the list this view shows when no search is active.
    pub fn list_target(&self) -> LoadTarget {
        match &self.mode {
            Mode::Scoped { param, value } => LoadTarget {
                url: format!("{}/filter?{}={}", self.base_url, param, value),
                kind: TargetKind::Collection,
            },
            Mode::List | Mode::Edit(_) => self.collection_target(),
        }
    }

    pub fn mount_target(&self) -> LoadTarget {
        match &self.mode {
            Mode::Edit(id) => LoadTarget {
                url: self.record_url(id),
                kind: TargetKind::Single,
            },
            Mode::List | Mode::Scoped { .. } => self.list_target(),
        }
    }

    pub async fn mount(&self) -> Result<ReadOutcome, ControllerError> {
        self.load(self.mount_target()).await
    }

    pub async fn load(&self, target: LoadTarget) -> Result<ReadOutcome, ControllerError> {
        let token = self.begin_read().await;
        let result = self.client.get_json(&target.url, &[]).await;

        let mut state = self.state.lock().await;
        if !self.is_latest(token) {
            debug!(url = %target.url, token, "discarding stale response");
            return Ok(ReadOutcome::Discarded);
        }
        state.loading = false;

        let stored = result.map_err(ControllerError::from).and_then(|data| {
            match target.kind {
                TargetKind::Collection => state.items = parse_list(&target.url, data)?,
                TargetKind::Single => form::merge_into(&mut state.form, data)?,
            }
            Ok(())
        });
        match stored {
            Ok(()) => {
                state.phase = Phase::Ready;
                Ok(ReadOutcome::Applied)
            }
            Err(e) => {
                error!(entity = E::DESCRIPTOR.name, url = %target.url, "load failed: {e}");
                state.error = true;
                state.phase = Phase::Error;
                Err(e)
            }
        }
    }

    /// Filters the list by `term`. An empty term restores the default title
    /// and reloads the unfiltered list.
    pub async fn search(&self, term: &str) -> Result<ReadOutcome, ControllerError> {
        let term = term.trim();
        if term.is_empty() {
            self.state.lock().await.title = E::DESCRIPTOR.default_title.to_string();
            return self.load(self.list_target()).await;
        }

        let token = self.begin_read().await;
        let url = format!("{}/filter", self.base_url);
        let result = self.client.get_json(&url, &[("term", term)]).await;

        let mut state = self.state.lock().await;
        if !self.is_latest(token) {
            debug!(url = %url, token, "discarding stale search response");
            return Ok(ReadOutcome::Discarded);
        }
        state.loading = false;

        match result
            .map_err(ControllerError::from)
            .and_then(|data| parse_list(&url, data))
        {
            Ok(items) => {
                state.items = items;
                state.title = format!("{}{}", E::DESCRIPTOR.search_title, term);
                state.phase = Phase::Ready;
                Ok(ReadOutcome::Applied)
            }
            Err(e) => {
                error!(entity = E::DESCRIPTOR.name, term, "search failed: {e}");
                state.error = true;
                state.phase = Phase::Error;
                drop(state);
                self.shell
                    .notify(&Notice::failure(E::DESCRIPTOR.search_error, error_detail(&e)));
                Err(e)
            }
        }
    }

    pub async fn set_field(&self, path: &str, raw: &str) -> Result<(), FieldError> {
        let mut state = self.state.lock().await;
        form::set_field(&mut state.form, path, raw)
    }

    /// POSTs the create fields of the form. On success the shell navigates to
    /// the list page.
    pub async fn create(&self) -> Result<(), ControllerError> {
        let body = self
            .begin_submit(E::DESCRIPTOR.create_fields)
            .await?;
        let result = self
            .client
            .send_json(Method::POST, &self.base_url, &body)
            .await;
        self.finish_write(result, MSG_SAVED, MSG_SAVE_ERROR).await
    }

    /// PUTs the update fields of the form to the record being edited.
    pub async fn update(&self) -> Result<(), ControllerError> {
        let Mode::Edit(id) = &self.mode else {
            return Err(ControllerError::NotEditing);
        };
        let url = self.record_url(id);
        let body = self
            .begin_submit(E::DESCRIPTOR.update_fields)
            .await?;
        let result = self.client.send_json(Method::PUT, &url, &body).await;
        self.finish_write(result, MSG_UPDATED, MSG_UPDATE_ERROR).await
    }

    /// DELETEs a record, then asks the shell to reload the view.
    pub async fn remove(&self, id: &ResourceId) -> Result<(), ControllerError> {
        let url = self.record_url(id);
        match self.client.delete(&url).await {
            Ok(()) => {
                info!(entity = E::DESCRIPTOR.name, %id, "record removed");
                self.state.lock().await.phase = Phase::Reloading;
                self.shell.reload();
                Ok(())
            }
            Err(e) => {
                error!(entity = E::DESCRIPTOR.name, %id, "remove failed: {e}");
                self.state.lock().await.error = true;
                let e = ControllerError::from(e);
                self.shell
                    .notify(&Notice::failure(MSG_DELETE_ERROR, error_detail(&e)));
                Err(e)
            }
        }
    }

    async fn begin_read(&self) -> u64 {
        let mut state = self.state.lock().await;
        let token = self.latest_read.fetch_add(1, Ordering::SeqCst) + 1;
        state.error = false;
        state.loading = true;
        state.phase = Phase::Loading;
        token
    }

    fn is_latest(&self, token: u64) -> bool {
        self.latest_read.load(Ordering::SeqCst) == token
    }

    async fn begin_submit(&self, fields: &[&str]) -> Result<Value, ControllerError> {
        let mut state = self.state.lock().await;
        let body = form::project(&state.form, fields)?;
        state.phase = Phase::Submitting;
        Ok(body)
    }

    async fn finish_write(
        &self,
        result: Result<(), ClientError>,
        ok_message: &str,
        err_message: &str,
    ) -> Result<(), ControllerError> {
        match result {
            Ok(()) => {
                info!(entity = E::DESCRIPTOR.name, "{ok_message}");
                self.state.lock().await.phase = Phase::Navigating;
                self.shell.notify(&Notice::success(ok_message));
                self.shell.navigate(E::DESCRIPTOR.list_page);
                Ok(())
            }
            Err(e) => {
                error!(entity = E::DESCRIPTOR.name, "write failed: {e}");
                self.state.lock().await.phase = Phase::Ready;
                let e = ControllerError::from(e);
                self.shell.notify(&Notice::failure(err_message, error_detail(&e)));
                Err(e)
            }
        }
    }
}

fn parse_list<E: Entity>(url: &str, data: Value) -> Result<Vec<E>, ControllerError> {
    serde_json::from_value(data).map_err(|e| {
        ControllerError::Client(ClientError::Parse {
            url: url.to_string(),
            source: e,
        })
    })
}

fn error_detail(e: &ControllerError) -> Option<String> {
    match e {
        ControllerError::Client(client) => Some(client.detail()),
        other => Some(other.to_string()),
    }
}
