//! # Advent Backend
//!
//! Daily check-ins, riddles and the milestone voucher lottery of an advent
//! calendar. The domain services sit on a pluggable [`storage::AdventStore`];
//! [`Backend`] opens the store named in the configuration and hands out
//! services that all share it.

use log::info;
use std::sync::Arc;

pub mod config;
pub mod domain;
pub mod storage;

use chrono::NaiveDate;
pub use config::{AdventConfig, StorageConfig};
use domain::{
    AdventResult, CalendarService, CheckInService, Clock, MessageService, PromptService, RewardService, SystemClock,
};
use storage::{AdventStore, CsvStore, MemoryStore};

/// Main backend struct that wires every service to one store
#[derive(Clone)]
pub struct Backend {
    store: Arc<dyn AdventStore>,
    clock: Arc<dyn Clock>,
    calendar: CalendarService,
    voucher_milestones: Vec<u32>,
}

impl Backend {
    /// Open the configured store with the system clock
    pub fn from_config(config: &AdventConfig) -> AdventResult<Self> {
        config.validate()?;
        let store: Arc<dyn AdventStore> = match &config.storage {
            StorageConfig::Memory => {
                info!("Using in-memory advent store");
                Arc::new(MemoryStore::new())
            }
            StorageConfig::Csv { data_directory } => Arc::new(CsvStore::open(data_directory)?),
        };
        Ok(Self::with_store(store, Arc::new(SystemClock), config))
    }

    /// Wire services around an existing store and clock
    pub fn with_store(store: Arc<dyn AdventStore>, clock: Arc<dyn Clock>, config: &AdventConfig) -> Self {
        Self {
            store,
            clock,
            calendar: CalendarService::new(config.season_end),
            voucher_milestones: config.voucher_milestones.clone(),
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn store(&self) -> Arc<dyn AdventStore> {
        Arc::clone(&self.store)
    }

    pub fn calendar(&self) -> &CalendarService {
        &self.calendar
    }

    pub fn check_in(&self, day: NaiveDate) -> AdventResult<CheckInService> {
        CheckInService::for_day(self.store(), Arc::clone(&self.clock), day)
    }

    pub fn prompt(&self, day: NaiveDate) -> AdventResult<PromptService> {
        PromptService::for_day(self.store.as_ref(), day)
    }

    pub fn reward(&self) -> RewardService {
        RewardService::new(self.store(), Arc::clone(&self.clock), self.voucher_milestones.clone())
    }

    pub fn messages(&self) -> MessageService {
        MessageService::new(self.store(), Arc::clone(&self.clock))
    }
}
