//! # pinfall-api
//!
//! Tournament records on top of [`pinfall_core`]: tournaments, registrations, the bowler
//! directory, schedules with lane assignments, prize pools and sponsors. Everything is persisted
//! through a [`Storage`] backend.
//!
//! All access goes through a [`League`] and its sub-clients:
//!
//! ```
//! # use pinfall_api::{League, MemoryStorage};
//! let league = League::new(MemoryStorage::new());
//! assert!(league.tournaments().list().unwrap().is_empty());
//! ```
pub mod bowler;
pub mod bracket;
pub mod id;
pub mod prize;
pub mod registration;
pub mod schedule;
pub mod sponsor;
pub mod storage;
pub mod tournament;

pub use id::{BowlerId, RegistrationId, SponsorId, TournamentId};
pub use storage::{FileStorage, MemoryStorage, Storage};

use std::io;

use chrono::NaiveDate;
use parking_lot::{Mutex, MutexGuard};
use thiserror::Error;

use self::bowler::BowlersClient;
use self::bracket::BracketClient;
use self::prize::PrizesClient;
use self::registration::RegistrationsClient;
use self::schedule::ScheduleClient;
use self::sponsor::SponsorsClient;
use self::tournament::TournamentsClient;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Bracket(#[from] pinfall_core::Error),
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Io(#[from] io::Error),
    #[error("not found")]
    NotFound,
    #[error("the registration deadline has passed")]
    RegistrationClosed,
    #[error("a bowler with this email is already registered")]
    AlreadyRegistered,
    #[error("the tournament is full")]
    TournamentFull,
    #[error("no bracket has been generated for this tournament")]
    NoBracket,
    #[error("invalid number of lanes: {0}")]
    InvalidLanes(u32),
    #[error("invalid prize distribution: percentages must add up to 100, found {0}")]
    InvalidDistribution(u64),
    #[error("the end date {end} is before the start date {start}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
}

/// The entry point to all league records.
///
/// Every operation loads the records it needs, modifies them and writes them back while holding
/// the lock on the storage. A failed operation never writes anything.
#[derive(Debug)]
pub struct League<S> {
    storage: Mutex<S>,
}

impl<S> League<S>
where
    S: Storage,
{
    pub fn new(storage: S) -> Self {
        Self {
            storage: Mutex::new(storage),
        }
    }

    /// Consumes the `League`, returning the underlying storage.
    pub fn into_storage(self) -> S {
        self.storage.into_inner()
    }

    #[inline]
    pub fn tournaments(&self) -> TournamentsClient<'_, S> {
        TournamentsClient::new(self)
    }

    #[inline]
    pub fn registrations(&self, tournament_id: TournamentId) -> RegistrationsClient<'_, S> {
        RegistrationsClient::new(self, tournament_id)
    }

    #[inline]
    pub fn bracket(&self, tournament_id: TournamentId) -> BracketClient<'_, S> {
        BracketClient::new(self, tournament_id)
    }

    #[inline]
    pub fn bowlers(&self) -> BowlersClient<'_, S> {
        BowlersClient::new(self)
    }

    #[inline]
    pub fn schedule(&self, tournament_id: TournamentId) -> ScheduleClient<'_, S> {
        ScheduleClient::new(self, tournament_id)
    }

    #[inline]
    pub fn prizes(&self, tournament_id: TournamentId) -> PrizesClient<'_, S> {
        PrizesClient::new(self, tournament_id)
    }

    #[inline]
    pub fn sponsors(&self) -> SponsorsClient<'_, S> {
        SponsorsClient::new(self)
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, S> {
        self.storage.lock()
    }
}
