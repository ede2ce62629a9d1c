//! Paginated, searchable view over the remote vehicle collection.
//!
//! The controller owns the current query and the records of the displayed
//! page. Intents go to the repository; results are reconciled into local
//! state and every change is published as a fresh [`ViewState`] snapshot.
//!
//! Each list call is tagged with a generation number. Only the response to the
//! most recently issued call may touch state; anything older is discarded.
//! Edits and removals that finish while that call is still outstanding are
//! journaled and replayed onto its result, so an older server snapshot never
//! undoes them.

use std::sync::{Mutex, PoisonError};

use tokio::sync::watch;

use crate::aggregates::Projections;
use crate::domain::auth::Credential;
use crate::domain::types::VehicleId;
use crate::domain::vehicle::{Vehicle, VehicleFields, VehiclePage};
use crate::dto::view_state::{Phase, ViewState};
use crate::pagination::{PageWindow, page_count};
use crate::repository::errors::RepositoryResult;
use crate::repository::{VehicleListQuery, VehicleReader, VehicleWriter};
use crate::services::{ServiceError, ServiceResult};

pub(crate) const LOAD: &str = "load vehicles";
const ADD: &str = "add vehicle";
const UPDATE: &str = "update vehicle";
const DELETE: &str = "delete vehicle";

/// What happened to a list request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response became the displayed page.
    Applied,
    /// A newer request was issued before this one settled; its result was dropped.
    Superseded,
    /// The requested page lies outside `1..=page_count`; nothing was sent.
    OutOfRange,
}

/// Local change made while a list call was outstanding.
#[derive(Debug)]
enum Reconciliation {
    Replaced(Vehicle),
    Removed(VehicleId),
}

#[derive(Debug)]
struct Ticket {
    generation: u64,
    query: VehicleListQuery,
}

#[derive(Debug, Default)]
struct ListState {
    /// Latest issued query.
    query: VehicleListQuery,
    /// Query the resident records belong to.
    committed: VehicleListQuery,
    records: Vec<Vehicle>,
    total_count: usize,
    page_size: usize,
    phase: Phase,
    error: Option<(ServiceError, String)>,
    generation: u64,
    in_flight: bool,
    journal: Vec<Reconciliation>,
}

impl ListState {
    fn page_count(&self) -> usize {
        page_count(self.total_count, self.page_size)
    }

    fn issue(&mut self, query: VehicleListQuery) -> Ticket {
        self.generation += 1;
        self.query = query.clone();
        self.phase = Phase::Loading;
        self.in_flight = true;
        self.journal.clear();
        Ticket {
            generation: self.generation,
            query,
        }
    }

    fn is_latest(&self, ticket: &Ticket) -> bool {
        self.in_flight && self.generation == ticket.generation && self.query == ticket.query
    }

    /// Makes `page` the resident page, replaying the journal onto it.
    ///
    /// Returns the previous page's query when the replay leaves a page past
    /// the first without records.
    fn apply_page(
        &mut self,
        query: VehicleListQuery,
        page: VehiclePage,
    ) -> Option<VehicleListQuery> {
        let mut records = page.results;
        let mut total = page.count;

        for entry in self.journal.drain(..) {
            match entry {
                Reconciliation::Replaced(vehicle) => {
                    if let Some(slot) = records.iter_mut().find(|v| v.id == vehicle.id) {
                        *slot = vehicle;
                    }
                }
                Reconciliation::Removed(id) => {
                    let before = records.len();
                    records.retain(|v| v.id != id);
                    if records.len() < before {
                        total = total.saturating_sub(1);
                    }
                }
            }
        }

        self.records = records;
        self.total_count = total;
        self.page_size = page.page_size;
        self.committed = query.clone();
        self.query = query;
        self.in_flight = false;
        self.phase = Phase::Ready;
        self.error = None;

        let current = self.committed.page;
        (self.records.is_empty() && current > 1)
            .then(|| self.committed.clone().page(current - 1))
    }

    /// Drops the outstanding call and returns to the query of the resident records.
    fn abandon_fetch(&mut self) {
        self.generation += 1;
        self.in_flight = false;
        self.journal.clear();
        self.query = self.committed.clone();
    }

    fn record_failure(&mut self, err: &ServiceError, operation: &str) {
        self.phase = Phase::Error;
        self.error = Some((err.clone(), err.user_message(operation)));
    }

    /// Settles the phase after a successful local reconciliation.
    fn settle_after_mutation(&mut self) {
        if !self.in_flight {
            self.phase = Phase::Ready;
            self.error = None;
        }
    }

    fn snapshot(&self) -> ViewState {
        let page_count = self.page_count();
        let (error_message, retryable, auth_required) = match &self.error {
            Some((err, message)) => (
                Some(message.clone()),
                err.is_retryable(),
                err.requires_login(),
            ),
            None => (None, false, false),
        };

        ViewState {
            phase: self.phase,
            records: self.records.clone(),
            search: self.query.search.clone(),
            page: self.query.page,
            page_count,
            total_count: self.total_count,
            pages: PageWindow::new(self.query.page, page_count),
            error_message,
            retryable,
            auth_required,
            projections: Projections::compute(&self.records),
        }
    }
}

pub struct VehicleListController<R> {
    repo: R,
    credential: Mutex<Option<Credential>>,
    state: Mutex<ListState>,
    view: watch::Sender<ViewState>,
}

impl<R> VehicleListController<R>
where
    R: VehicleReader + VehicleWriter,
{
    pub fn new(repo: R) -> Self {
        let (view, _) = watch::channel(ViewState::default());
        Self {
            repo,
            credential: Mutex::new(None),
            state: Mutex::new(ListState::default()),
            view,
        }
    }

    #[must_use]
    pub fn with_credential(self, credential: Credential) -> Self {
        self.set_credential(credential);
        self
    }

    pub fn set_credential(&self, credential: Credential) {
        *self
            .credential
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(credential);
    }

    /// Forgets the credential, e.g. on logout; further intents fail as unauthorized.
    pub fn clear_credential(&self) {
        *self
            .credential
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Receives a new snapshot after every state change.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.view.subscribe()
    }

    /// Latest snapshot.
    pub fn view(&self) -> ViewState {
        self.view.borrow().clone()
    }

    pub fn query(&self) -> VehicleListQuery {
        self.read(|state| state.query.clone())
    }

    pub fn page_count(&self) -> usize {
        self.read(ListState::page_count)
    }

    fn read<T>(&self, f: impl FnOnce(&ListState) -> T) -> T {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&*state)
    }

    /// Runs `f` under the state lock and publishes the resulting snapshot.
    ///
    /// The guard never outlives `f`, so no lock is held across an await point.
    fn with_state<T>(&self, f: impl FnOnce(&mut ListState) -> T) -> T {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let result = f(&mut *state);
        self.view.send_replace(state.snapshot());
        result
    }

    fn fail(&self, err: ServiceError, operation: &str) -> ServiceError {
        log::error!("Failed to {operation}: {err}");
        self.with_state(|state| state.record_failure(&err, operation));
        err
    }

    fn credential(&self, operation: &str) -> ServiceResult<Credential> {
        let credential = self
            .credential
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        credential.ok_or_else(|| {
            self.fail(
                ServiceError::Unauthorized("no credential".to_string()),
                operation,
            )
        })
    }

    /// Searches from the first page.
    pub async fn search(&self, term: &str) -> ServiceResult<FetchOutcome> {
        self.load(VehicleListQuery::new().search(term)).await
    }

    /// Moves to page `n` of the current search.
    ///
    /// Pages outside `1..=page_count` are ignored without a request.
    pub async fn go_to_page(&self, n: usize) -> ServiceResult<FetchOutcome> {
        let query = self.read(|state| {
            let pages = state.page_count();
            (n >= 1 && n <= pages).then(|| state.query.clone().page(n))
        });

        match query {
            Some(query) => self.load(query).await,
            None => {
                log::debug!("Ignoring page {n} outside the current page range");
                Ok(FetchOutcome::OutOfRange)
            }
        }
    }

    pub async fn next_page(&self) -> ServiceResult<FetchOutcome> {
        let page = self.read(|state| state.query.page);
        self.go_to_page(page + 1).await
    }

    pub async fn prev_page(&self) -> ServiceResult<FetchOutcome> {
        let page = self.read(|state| state.query.page);
        self.go_to_page(page.saturating_sub(1)).await
    }

    /// Reissues the current query.
    pub async fn refresh(&self) -> ServiceResult<FetchOutcome> {
        let query = self.query();
        self.load(query).await
    }

    /// Abandons the outstanding list call, if any.
    ///
    /// Its response will be discarded when it arrives. Resident records stay.
    pub fn cancel(&self) {
        self.with_state(|state| {
            if state.in_flight {
                log::info!("Cancelled vehicle request for page {}", state.query.page);
                state.abandon_fetch();
                state.record_failure(&ServiceError::Cancelled, LOAD);
            }
        });
    }

    /// Fetches `query` and applies it if no newer call was issued meanwhile.
    ///
    /// A page past the first that ends up empty is followed by a fetch of the
    /// page before it.
    async fn load(&self, mut query: VehicleListQuery) -> ServiceResult<FetchOutcome> {
        let credential = self.credential(LOAD)?;

        loop {
            let ticket = self.with_state(|state| state.issue(query));

            let result: RepositoryResult<VehiclePage> =
                self.repo.list_vehicles(&credential, &ticket.query).await;

            let step_back = {
                let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
                if !state.is_latest(&ticket) {
                    log::warn!(
                        "Discarding stale response for page {} search {:?}",
                        ticket.query.page,
                        ticket.query.search
                    );
                    return Ok(FetchOutcome::Superseded);
                }

                match result {
                    Ok(page) => {
                        log::info!(
                            "Loaded page {} of {} ({} vehicles)",
                            ticket.query.page,
                            page.page_count(),
                            page.results.len()
                        );
                        let step_back = state.apply_page(ticket.query, page);
                        self.view.send_replace(state.snapshot());
                        step_back
                    }
                    Err(err) => {
                        let err = ServiceError::from(err);
                        log::error!("Failed to {LOAD}: {err}");
                        state.abandon_fetch();
                        state.record_failure(&err, LOAD);
                        self.view.send_replace(state.snapshot());
                        return Err(err);
                    }
                }
            };

            match step_back {
                Some(previous) => {
                    log::info!("Page emptied, moving to page {}", previous.page);
                    query = previous;
                }
                None => return Ok(FetchOutcome::Applied),
            }
        }
    }

    /// Creates a vehicle and reloads the first page of the current search.
    ///
    /// The new record's position is decided by the server. A failed reload is
    /// reported through the view; the created record is still returned.
    pub async fn create(&self, fields: &VehicleFields) -> ServiceResult<Vehicle> {
        let credential = self.credential(ADD)?;

        let vehicle = self
            .repo
            .create_vehicle(&credential, fields)
            .await
            .map_err(|err| self.fail(err.into(), ADD))?;
        log::info!("Created vehicle {}", vehicle.id);

        let query = self.query().page(1);
        if let Err(err) = self.load(query).await {
            log::warn!("Vehicle {} created but reload failed: {err}", vehicle.id);
        }

        Ok(vehicle)
    }

    /// Replaces a record and updates it in place without refetching.
    pub async fn edit(&self, id: VehicleId, fields: &VehicleFields) -> ServiceResult<Vehicle> {
        let credential = self.credential(UPDATE)?;

        let vehicle = self
            .repo
            .update_vehicle(&credential, id, fields)
            .await
            .map_err(|err| self.fail(err.into(), UPDATE))?;
        log::info!("Updated vehicle {id}");

        self.with_state(|state| {
            match state.records.iter_mut().find(|v| v.id == id) {
                Some(slot) => *slot = vehicle.clone(),
                None => log::debug!("Updated vehicle {id} is not on the current page"),
            }
            if state.in_flight {
                state.journal.push(Reconciliation::Replaced(vehicle.clone()));
            }
            state.settle_after_mutation();
        });

        Ok(vehicle)
    }

    /// Deletes a record and drops it locally without refetching.
    ///
    /// When that empties a page past the first, the previous page is loaded.
    pub async fn remove(&self, id: VehicleId) -> ServiceResult<()> {
        let credential = self.credential(DELETE)?;

        self.repo
            .delete_vehicle(&credential, id)
            .await
            .map_err(|err| self.fail(err.into(), DELETE))?;
        log::info!("Deleted vehicle {id}");

        let step_back = self.with_state(|state| {
            let before = state.records.len();
            state.records.retain(|v| v.id != id);
            if state.records.len() < before {
                state.total_count = state.total_count.saturating_sub(1);
            }
            if state.in_flight {
                state.journal.push(Reconciliation::Removed(id));
            }
            state.settle_after_mutation();

            let page = state.committed.page;
            (!state.in_flight && state.records.is_empty() && page > 1)
                .then(|| state.committed.clone().page(page - 1))
        });

        if let Some(query) = step_back {
            if let Err(err) = self.load(query).await {
                log::warn!("Vehicle {id} deleted but loading the previous page failed: {err}");
            }
        }

        Ok(())
    }
}
