//! Owned state shared by both fetch services.
//!
//! Pairs the observable value with its status channel and orders
//! overlapping operations: the most recently issued operation that succeeds
//! wins, and a slower, older response never overwrites a newer one.

use std::collections::BTreeSet;
use std::sync::Mutex;

use crate::api::FetchError;
use crate::observable::{Observable, StateHandle};
use crate::status::FetchStatus;

#[derive(Default)]
struct Tickets {
    issued: u64,
    applied: u64,
    in_flight: BTreeSet<u64>,
}

impl Tickets {
    fn later_in_flight(&self, ticket: u64) -> bool {
        self.in_flight.range(ticket + 1..).next().is_some()
    }
}

pub(crate) struct ServiceState<T> {
    value: Observable<T>,
    status: Observable<FetchStatus>,
    tickets: Mutex<Tickets>,
}

impl<T> ServiceState<T> {
    pub fn new(initial: T) -> Self {
        Self {
            value: Observable::new(initial),
            status: Observable::default(),
            tickets: Mutex::new(Tickets::default()),
        }
    }

    pub fn value(&self) -> StateHandle<T> {
        self.value.handle()
    }

    pub fn status(&self) -> StateHandle<FetchStatus> {
        self.status.handle()
    }

    /// Issue a ticket for a new operation and mark the service as loading.
    pub fn begin(&self) -> u64 {
        let mut tickets = self.lock();
        tickets.issued += 1;
        let ticket = tickets.issued;
        tickets.in_flight.insert(ticket);
        self.status.set(FetchStatus::Loading);
        ticket
    }

    /// Store a successful result unless a later operation already stored
    /// one. Returns whether the value was applied.
    ///
    /// Status becomes `Ready` once the value is applied and nothing issued
    /// later is still running, even if a later operation already failed.
    pub fn succeed(&self, ticket: u64, value: T) -> bool {
        let mut tickets = self.lock();
        tickets.in_flight.remove(&ticket);
        if ticket <= tickets.applied {
            return false;
        }
        tickets.applied = ticket;
        self.value.set(value);
        if !tickets.later_in_flight(ticket) {
            self.status.set(FetchStatus::ready_now());
        }
        true
    }

    /// Record a failure. The value is never touched. The status changes
    /// only when nothing issued later is running or has been applied.
    pub fn fail(&self, ticket: u64, err: &FetchError) {
        let mut tickets = self.lock();
        tickets.in_flight.remove(&ticket);
        if ticket > tickets.applied && !tickets.later_in_flight(ticket) {
            self.status.set(FetchStatus::failed_now(err.kind()));
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Tickets> {
        self.tickets.lock().unwrap_or_else(|e| e.into_inner())
    }
}
