//! End-to-end advent flows against both storage backends.

use std::fs;
use std::sync::Arc;

use advent_backend::domain::{AdventError, Clock, FixedClock, TicketSource};
use advent_backend::domain::models::{DayRecord, VoucherOption};
use advent_backend::storage::{AdventStore, CsvStore, DayStorage, MemoryStore, PromptContent, VoucherStorage};
use advent_backend::{AdventConfig, Backend};
use chrono::NaiveDate;
use shared::CheckInStage;
use tempfile::TempDir;

struct FixedTicket(u32);

impl TicketSource for FixedTicket {
    fn ticket(&mut self, _upper: u32) -> u32 {
        self.0
    }
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 12, d).unwrap()
}

fn catalog() -> Vec<VoucherOption> {
    vec![
        VoucherOption::new("Massage", "relax", 60).redeemable_from(day(5)),
        VoucherOption::new("Breakfast", "in bed", 40),
    ]
}

/// A backend plus whatever must outlive it
struct Harness {
    backend: Backend,
    clock: FixedClock,
    store: Arc<dyn AdventStore>,
    _temp_dir: Option<TempDir>,
}

fn memory_harness(today: NaiveDate) -> Harness {
    let content: PromptContent = [
        ("puzzle_answer".to_string(), "Ember".to_string()),
        ("part1".to_string(), "Good morning!\nCheck in below.".to_string()),
    ]
    .into_iter()
    .collect();
    let store: Arc<dyn AdventStore> = Arc::new(
        MemoryStore::new()
            .with_voucher_options(catalog())
            .with_prompt(today, content),
    );
    harness(store, today, None)
}

fn csv_harness(today: NaiveDate) -> Harness {
    let temp_dir = TempDir::new().unwrap();
    let store = CsvStore::open(temp_dir.path()).unwrap();
    store.store_voucher_options(&catalog()).unwrap();
    fs::write(
        temp_dir.path().join("prompts.yaml"),
        format!(
            "{}:\n  puzzle_answer: Ember\n  part1:\n    - Good morning!\n    - Check in below.\n",
            today.format("%Y-%m-%d")
        ),
    )
    .unwrap();
    harness(Arc::new(store), today, Some(temp_dir))
}

fn harness(store: Arc<dyn AdventStore>, today: NaiveDate, temp_dir: Option<TempDir>) -> Harness {
    let clock = FixedClock::on(today);
    let backend = Backend::with_store(Arc::clone(&store), Arc::new(clock.clone()), &AdventConfig::in_memory());
    Harness {
        backend,
        clock,
        store,
        _temp_dir: temp_dir,
    }
}

fn both(today: NaiveDate, scenario: impl Fn(Harness)) {
    scenario(memory_harness(today));
    scenario(csv_harness(today));
}

#[test]
fn check_in_progression_and_reset() {
    both(day(4), |h| {
        let check_in = h.backend.check_in(day(4)).unwrap();
        let prompt = h.backend.prompt(day(4)).unwrap();
        assert_eq!(prompt.part1_prompts(), vec!["Good morning!", "Check in below."]);
        assert_eq!(check_in.current_stage().unwrap(), CheckInStage::Part1);

        check_in.complete_part1().unwrap();
        check_in.complete_part1().unwrap();
        assert_eq!(check_in.stars().unwrap(), 1);

        assert!(!check_in.attempt_part2(&prompt, "coal").unwrap());
        assert_eq!(check_in.stars().unwrap(), 1);
        assert!(check_in.attempt_part2(&prompt, " ember ").unwrap());
        assert_eq!(check_in.current_stage().unwrap(), CheckInStage::Done);

        check_in.reset_part1().unwrap();
        check_in.complete_part1().unwrap();
        assert_eq!(check_in.stars().unwrap(), 1);
        assert_eq!(check_in.current_stage().unwrap(), CheckInStage::Part2);
        assert_eq!(check_in.puzzle_attempts().unwrap().len(), 2);
    });
}

#[test]
fn four_stars_unlock_exactly_one_draw() {
    both(day(4), |h| {
        for d in 1..=3 {
            h.store.write_day(&DayRecord::new(day(d)).with_stars(1)).unwrap();
        }
        h.backend.check_in(day(4)).unwrap().complete_part1().unwrap();

        let reward = h.backend.reward();
        assert_eq!(reward.total_stars().unwrap(), 4);
        assert_eq!(reward.draws_unlocked().unwrap(), 1);
        assert_eq!(reward.draws_available().unwrap(), 1);

        reward.draw(&mut FixedTicket(80), None).unwrap();
        assert_eq!(reward.draws_available().unwrap(), 0);
        assert!(matches!(
            reward.draw(&mut FixedTicket(80), None),
            Err(AdventError::NoEligibleDraws)
        ));
        assert_eq!(h.store.all_vouchers().unwrap().len(), 1);
    });
}

#[test]
fn voucher_redemption_waits_for_its_date() {
    both(day(4), |h| {
        let reward = h.backend.reward();
        assert!(matches!(
            reward.redeem("voucher-0001"),
            Err(AdventError::VoucherNotFound { .. })
        ));

        for d in 1..=2 {
            h.store.write_day(&DayRecord::new(day(d)).with_stars(2)).unwrap();
        }
        let voucher = reward.draw(&mut FixedTicket(59), None).unwrap();
        assert_eq!(voucher.id, "voucher-0001");
        assert_eq!(voucher.redeemable_at, Some(day(5)));

        assert!(matches!(
            reward.redeem("voucher-0001"),
            Err(AdventError::VoucherNotRedeemable { .. })
        ));

        h.clock.advance_days(1);
        let redeemed = reward.redeem("voucher-0001").unwrap();
        assert_eq!(redeemed.redeemed_at, Some(h.clock.now()));
        assert!(matches!(
            reward.redeem("voucher-0001"),
            Err(AdventError::VoucherAlreadyRedeemed { .. })
        ));

        let summaries = reward.vouchers().unwrap();
        assert!(summaries[0].redeemed);
    });
}

#[test]
fn broken_pool_aborts_without_award() {
    both(day(4), |h| {
        h.store.write_day(&DayRecord::new(day(1)).with_stars(2)).unwrap();
        h.store.write_day(&DayRecord::new(day(2)).with_stars(2)).unwrap();

        let short = vec![VoucherOption::new("Massage", "", 60), VoucherOption::new("Tea", "", 30)];
        let err = h
            .backend
            .reward()
            .draw(&mut FixedTicket(0), Some(short.as_slice()))
            .unwrap_err();
        assert!(err.is_configuration_error());
        assert!(h.store.all_vouchers().unwrap().is_empty());
    });
}

#[test]
fn missing_prompt_is_configuration_error() {
    both(day(4), |h| {
        let err = h.backend.prompt(day(9)).unwrap_err();
        assert!(matches!(err, AdventError::MissingPrompt { .. }));
    });
}

#[test]
fn messages_are_kept_in_order() {
    both(day(4), |h| {
        let messages = h.backend.messages();
        messages.submit("first").unwrap();
        messages.submit("  second  ").unwrap();
        assert!(matches!(messages.submit("  "), Err(AdventError::EmptyMessage)));

        let stored: Vec<String> = messages.list().unwrap().into_iter().map(|m| m.message).collect();
        assert_eq!(stored, vec!["first", "second"]);
    });
}

#[test]
fn csv_state_survives_reopening() {
    let temp_dir = TempDir::new().unwrap();
    let clock = FixedClock::on(day(4));
    let config = AdventConfig::in_memory();

    {
        let store = CsvStore::open(temp_dir.path()).unwrap();
        store.store_voucher_options(&catalog()).unwrap();
        let backend = Backend::with_store(Arc::new(store), Arc::new(clock.clone()), &config);
        for d in 1..=2 {
            let check_in = backend.check_in(day(d)).unwrap();
            check_in.complete_part1().unwrap();
            check_in.complete_part2().unwrap();
        }
        backend.reward().draw(&mut FixedTicket(99), None).unwrap();
    }

    let reopened = CsvStore::open(temp_dir.path()).unwrap();
    let backend = Backend::with_store(Arc::new(reopened), Arc::new(clock), &config);
    let reward = backend.reward();
    assert_eq!(reward.total_stars().unwrap(), 4);
    assert_eq!(reward.draws_claimed().unwrap(), 1);
    assert_eq!(reward.vouchers().unwrap()[0].title, "Breakfast");
    assert_eq!(backend.check_in(day(1)).unwrap().total_check_ins().unwrap(), 2);
}

#[test]
fn backend_from_config_opens_csv_directory() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("advent.yaml");
    fs::write(
        &config_path,
        format!(
            "voucher_milestones: [1]\nstorage:\n  backend: csv\n  data_directory: {}\n",
            temp_dir.path().join("data").display()
        ),
    )
    .unwrap();

    let config = AdventConfig::from_yaml(&fs::read_to_string(&config_path).unwrap()).unwrap();
    let backend = Backend::from_config(&config).unwrap();
    let check_in = backend.check_in(day(1)).unwrap();
    check_in.complete_part1().unwrap();

    assert!(temp_dir.path().join("data").join("calendar_days.csv").exists());
    assert!(backend.reward().can_draw().unwrap());
}
