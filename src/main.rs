use crate::airport::{Airport, AirportState, DEFAULT_BAYS, Durations};
use crate::sim::{SimConfig, Simulation};
use clap::Parser;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::{Context, Editor, Helper, Highlighter, Hinter, Validator};
use std::sync::Arc;
use std::time::Duration;
use tabled::settings::Style;

mod airport;
mod bay;
mod plane;
mod sim;
mod sync;
mod time;

#[derive(Parser)]
#[command(about = "Fixed-capacity airport parking simulation")]
struct Args {
    /// Chance (percent) that each landing worker attempts a landing per tick
    #[arg(short, long, default_value_t = 50, value_parser = clap::value_parser!(u8).range(1..=90))]
    landing_prob: u8,

    /// Chance (percent) that each take-off worker attempts a take-off per tick
    #[arg(short, long, default_value_t = 50, value_parser = clap::value_parser!(u8).range(1..=90))]
    takeoff_prob: u8,

    /// Number of parking bays
    #[arg(long, default_value_t = DEFAULT_BAYS)]
    bays: usize,

    /// Number of landing workers
    #[arg(long, default_value_t = 15)]
    landing_workers: usize,

    /// Number of take-off workers
    #[arg(long, default_value_t = 5)]
    takeoff_workers: usize,

    /// Name of the airport
    #[arg(long, default_value = "Luman International")]
    name: String,
}

#[derive(Helper, Hinter, Highlighter, Validator)]
pub struct CompleteHelper {
    pub commands: Vec<String>,
}

impl Completer for CompleteHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, _pos: usize, _ctx: &Context<'_>) -> rustyline::Result<(usize, Vec<Pair>)> {
        let mut candidates = Vec::new();

        for cmd in &self.commands {
            if cmd.starts_with(line) {
                candidates.push(Pair {
                    display: cmd.clone(),
                    replacement: format!("{} ", cmd),
                });
            }
        }

        Ok((0, candidates))
    }
}

fn print_banner() {
    println!("{}", "Welcome to the airport simulator.".bold());
    println!("Type 'state' to display the state of the airport.");
    println!("Type 'quit' to terminate the simulation.\n");
}

fn print_state(state: &AirportState) {
    println!("Airport '{}' state:", state.name.bold());
    let mut table = tabled::Table::new(&state.bays);
    table.with(Style::rounded());
    table.with(tabled::settings::Alignment::left());
    println!("{}", table);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let airport = Arc::new(Airport::new(&args.name, args.bays, Durations::default()));
    let sim = Simulation::start(
        airport.clone(),
        SimConfig {
            landing_prob: args.landing_prob,
            takeoff_prob: args.takeoff_prob,
            landing_workers: args.landing_workers,
            takeoff_workers: args.takeoff_workers,
            tick: Duration::from_millis(500),
        },
    );

    print_banner();

    let config = rustyline::Config::builder()
        .history_ignore_space(true)
        .completion_type(rustyline::CompletionType::List)
        .build();

    let helper = CompleteHelper {
        commands: vec![
            "state".to_string(),
            "help".to_string(),
            "quit".to_string(),
        ],
    };

    let mut rl = Editor::with_config(config)?;
    rl.set_helper(Some(helper));

    loop {
        let readline = rl.readline(">> ");
        match readline {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() { continue; }

                rl.add_history_entry(trimmed)?;

                match trimmed {
                    "state" | "s" | "p" => print_state(&airport.snapshot()),
                    "help" | "?" => {
                        println!("\nAvailable Commands:");
                        println!("  state / s    - Display the current state of every parking bay");
                        println!("  help / ?     - Show this help menu");
                        println!("  quit / exit  - Stop the workers and exit the simulator\n");
                    },
                    "quit" | "exit" | "q" => break,
                    other => println!("Unknown command: {}", other),
                }
            },
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            },
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            },
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }

    println!("Waiting for in-flight operations to finish ...");
    sim.request_shutdown();
    sim.join();

    print_state(&airport.snapshot());
    Ok(())
}
