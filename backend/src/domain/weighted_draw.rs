//! Weighted voucher selection.
//!
//! A draw is a pure function of the pool and a single ticket in `[0, 100)`:
//! walk the pool in order accumulating `chance` and take the first entry
//! whose running total exceeds the ticket.

use rand::{Rng, RngCore};

use super::errors::{AdventError, AdventResult};
use super::models::VoucherOption;

/// Total weight every draw pool must carry
pub const TOTAL_CHANCE: u32 = 100;

/// Source of lottery tickets.
pub trait TicketSource {
    /// A ticket uniformly distributed in `[0, upper)`
    fn ticket(&mut self, upper: u32) -> u32;
}

impl<R: RngCore> TicketSource for R {
    fn ticket(&mut self, upper: u32) -> u32 {
        self.gen_range(0..upper)
    }
}

/// Reject pools that cannot be drawn from.
pub fn validate_pool(pool: &[VoucherOption]) -> AdventResult<()> {
    if pool.is_empty() {
        return Err(AdventError::EmptyVoucherCatalog);
    }
    let total: u64 = pool.iter().map(|option| u64::from(option.chance)).sum();
    if total != u64::from(TOTAL_CHANCE) {
        return Err(AdventError::InvalidChanceTotal { total });
    }
    Ok(())
}

/// Select the entry covering `ticket`. The pool must already be validated.
pub fn pick_weighted(pool: &[VoucherOption], ticket: u32) -> Option<&VoucherOption> {
    let ticket = u64::from(ticket);
    let mut cumulative: u64 = 0;
    for option in pool {
        cumulative += u64::from(option.chance);
        if cumulative > ticket {
            return Some(option);
        }
    }
    pool.last()
}

/// Validate the pool, take one ticket and pick.
pub fn draw_from<'a, T: TicketSource + ?Sized>(
    pool: &'a [VoucherOption],
    tickets: &mut T,
) -> AdventResult<&'a VoucherOption> {
    validate_pool(pool)?;
    let ticket = tickets.ticket(TOTAL_CHANCE);
    pick_weighted(pool, ticket).ok_or(AdventError::EmptyVoucherCatalog)
}
