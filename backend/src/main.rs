use std::path::PathBuf;

use advent_backend::{AdventConfig, Backend};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use log::debug;
use serde::Serialize;
use serde_json::json;

#[derive(Parser)]
#[command(name = "advent", version, about = "Advent calendar check-ins and voucher lottery")]
struct Cli {
    /// Configuration file, created with defaults if missing
    #[arg(long, default_value = "advent.yaml")]
    config: PathBuf,

    /// Calendar day to act on (YYYY-MM-DD), defaults to today
    #[arg(long)]
    day: Option<NaiveDate>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Day status and lottery progress
    Status,
    /// Prompt lines and riddle for the day
    Prompt,
    /// Check in for the day
    CheckIn,
    /// Undo the day's check-in (also forgets a solved riddle)
    ResetCheckIn,
    /// Answer the day's riddle
    Solve { answer: String },
    /// Spend one unlocked draw on the voucher lottery
    Draw,
    /// Redeem a voucher by id (`voucher-0003` or just `3`)
    Redeem { id: String },
    /// List awarded vouchers
    Vouchers,
    /// Leave a message
    Message { text: String },
    /// List messages
    Messages,
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = AdventConfig::load_or_create(&cli.config)?;
    let backend = Backend::from_config(&config)?;
    let day = cli.day.unwrap_or_else(|| backend.today());
    debug!("Acting on {}", day);

    match cli.command {
        Commands::Status => {
            let status = backend.check_in(day)?.status(backend.calendar())?;
            let progress = backend.reward().progress()?;
            print_json(&json!({
                "day": status,
                "rewards": progress,
                "seconds_until_midnight": backend.calendar().seconds_until_local_midnight(),
            }))?;
        }
        Commands::Prompt => {
            print_json(&backend.prompt(day)?.to_view()?)?;
        }
        Commands::CheckIn => {
            let check_in = backend.check_in(day)?;
            check_in.complete_part1()?;
            print_json(&check_in.status(backend.calendar())?)?;
        }
        Commands::ResetCheckIn => {
            let check_in = backend.check_in(day)?;
            check_in.reset_part1()?;
            print_json(&check_in.status(backend.calendar())?)?;
        }
        Commands::Solve { answer } => {
            let check_in = backend.check_in(day)?;
            let prompt = backend.prompt(day)?;
            let correct = check_in.attempt_part2(&prompt, &answer)?;
            print_json(&json!({
                "correct": correct,
                "status": check_in.status(backend.calendar())?,
            }))?;
        }
        Commands::Draw => {
            let reward = backend.reward();
            let voucher = reward.draw(&mut rand::thread_rng(), None)?;
            print_json(&voucher.to_summary(backend.today()))?;
        }
        Commands::Redeem { id } => {
            let voucher = backend.reward().redeem(&id)?;
            print_json(&voucher.to_summary(backend.today()))?;
        }
        Commands::Vouchers => {
            print_json(&backend.reward().vouchers()?)?;
        }
        Commands::Message { text } => {
            print_json(&backend.messages().submit(&text)?)?;
        }
        Commands::Messages => {
            print_json(&backend.messages().list()?)?;
        }
    }
    Ok(())
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
