//! Reward service domain logic for the advent calendar.
//!
//! Stars earned through check-ins unlock lottery draws at fixed milestones.
//! Each draw awards one voucher from a weighted catalog; a voucher may stay
//! locked until its redeemable date and can be redeemed exactly once.
//!
//! ## Business Rules
//!
//! - `draws_unlocked` counts milestones at or below the total star count
//! - `draws_available` is unlocked minus claimed, never below zero
//! - a draw pool must be non-empty with chances summing to 100
//! - the slot check and the voucher append are one atomic store call
//! - `redeemed_at` is set once and never changed afterwards

use log::{info, warn};
use shared::{RewardProgress, VoucherSummary};
use std::sync::Arc;

use super::clock::Clock;
use super::errors::{AdventError, AdventResult};
use super::models::{VoucherDraft, VoucherOption, VoucherRecord};
use super::weighted_draw::{draw_from, TicketSource};
use crate::storage::AdventStore;

/// Star thresholds used when none are configured
pub const DEFAULT_VOUCHER_MILESTONES: [u32; 10] = [3, 13, 23, 33, 43, 53, 63, 73, 83, 94];

#[derive(Clone)]
pub struct RewardService {
    store: Arc<dyn AdventStore>,
    clock: Arc<dyn Clock>,
    milestones: Vec<u32>,
}

impl RewardService {
    /// `milestones` must be ascending.
    pub fn new(store: Arc<dyn AdventStore>, clock: Arc<dyn Clock>, milestones: Vec<u32>) -> Self {
        Self {
            store,
            clock,
            milestones,
        }
    }

    pub fn voucher_milestones(&self) -> &[u32] {
        &self.milestones
    }

    pub fn total_stars(&self) -> AdventResult<u32> {
        Ok(self.store.total_stars()?)
    }

    pub fn draws_unlocked(&self) -> AdventResult<u32> {
        let total = self.total_stars()?;
        Ok(self.unlocked_at(total))
    }

    pub fn draws_claimed(&self) -> AdventResult<u32> {
        Ok(self.store.all_vouchers()?.len() as u32)
    }

    pub fn draws_available(&self) -> AdventResult<u32> {
        Ok(self.draws_unlocked()?.saturating_sub(self.draws_claimed()?))
    }

    pub fn can_draw(&self) -> AdventResult<bool> {
        Ok(self.draws_available()? > 0)
    }

    /// Smallest milestone strictly above the current star total
    pub fn next_milestone(&self) -> AdventResult<Option<u32>> {
        let total = self.total_stars()?;
        Ok(self.milestone_after(total))
    }

    pub fn stars_until_next_milestone(&self) -> AdventResult<Option<u32>> {
        let total = self.total_stars()?;
        Ok(self
            .milestone_after(total)
            .map(|milestone| milestone.saturating_sub(total)))
    }

    /// The store's configured catalog
    pub fn voucher_catalog(&self) -> AdventResult<Vec<VoucherOption>> {
        Ok(self.store.voucher_options()?)
    }

    /// Draw one voucher.
    ///
    /// Uses `catalog` when given, otherwise the store's options. A broken
    /// pool fails before anything is written.
    pub fn draw<T: TicketSource + ?Sized>(
        &self,
        tickets: &mut T,
        catalog: Option<&[VoucherOption]>,
    ) -> AdventResult<VoucherRecord> {
        let unlocked = self.draws_unlocked()?;
        if unlocked <= self.draws_claimed()? {
            return Err(AdventError::NoEligibleDraws);
        }

        let configured;
        let pool = match catalog {
            Some(pool) => pool,
            None => {
                configured = self.store.voucher_options()?;
                configured.as_slice()
            }
        };
        let choice = draw_from(pool, tickets)?;

        let draft = VoucherDraft::from_option(choice, self.clock.now());
        match self.store.append_voucher_within(&draft, unlocked as usize)? {
            Some(record) => {
                info!("Drew voucher {} ({})", record.id, record.title);
                Ok(record)
            }
            None => {
                warn!("Draw slot was claimed concurrently, nothing awarded");
                Err(AdventError::NoEligibleDraws)
            }
        }
    }

    /// Redeem a voucher by id. A bare number such as `"3"` is accepted.
    pub fn redeem(&self, voucher_id: &str) -> AdventResult<VoucherRecord> {
        let id = VoucherRecord::normalize_id(voucher_id);
        let voucher = self
            .store
            .find_voucher(&id)?
            .ok_or_else(|| AdventError::VoucherNotFound { id: id.clone() })?;

        if voucher.is_redeemed() {
            return Err(AdventError::VoucherAlreadyRedeemed { id });
        }
        let today = self.clock.today();
        if let Some(redeemable_at) = voucher.redeemable_at.filter(|date| *date > today) {
            return Err(AdventError::VoucherNotRedeemable { id, redeemable_at });
        }

        let now = self.clock.now();
        let updated = self
            .store
            .update_voucher(&id, now)?
            .ok_or_else(|| AdventError::VoucherNotFound { id: id.clone() })?;

        // The store keeps an earlier timestamp if another redeem got there first.
        if updated.redeemed_at != Some(now) {
            warn!("Voucher {} was redeemed concurrently", id);
            return Err(AdventError::VoucherAlreadyRedeemed { id });
        }

        info!("Redeemed voucher {} ({})", updated.id, updated.title);
        Ok(updated)
    }

    /// All awarded vouchers in store order with display flags
    pub fn vouchers(&self) -> AdventResult<Vec<VoucherSummary>> {
        let today = self.clock.today();
        Ok(self
            .store
            .all_vouchers()?
            .iter()
            .map(|voucher| voucher.to_summary(today))
            .collect())
    }

    pub fn progress(&self) -> AdventResult<RewardProgress> {
        let total_stars = self.total_stars()?;
        let draws_unlocked = self.unlocked_at(total_stars);
        let draws_claimed = self.draws_claimed()?;
        let next_milestone = self.milestone_after(total_stars);

        Ok(RewardProgress {
            total_stars,
            draws_unlocked,
            draws_claimed,
            draws_available: draws_unlocked.saturating_sub(draws_claimed),
            next_milestone,
            stars_until_next_milestone: next_milestone.map(|milestone| milestone.saturating_sub(total_stars)),
            voucher_milestones: self.milestones.clone(),
        })
    }

    fn unlocked_at(&self, total_stars: u32) -> u32 {
        self.milestones
            .iter()
            .filter(|milestone| **milestone <= total_stars)
            .count() as u32
    }

    fn milestone_after(&self, total_stars: u32) -> Option<u32> {
        self.milestones
            .iter()
            .copied()
            .find(|milestone| *milestone > total_stars)
    }
}
