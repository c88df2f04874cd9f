//! CLI entry point for the PurpleAir air quality database.
//!
//! Runs an interactive menu over a CSV of sensor readings: print
//! average/minimum/maximum particulate concentration cross tables, adjust
//! the zip code display filter, and re-load the data set.

use std::ffi::OsStr;
use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use purple_air_db::aggregate::Statistic;
use purple_air_db::output::{render_filters, render_table};
use purple_air_db::session::{Session, SessionError};

const DEFAULT_DATA_PATH: &str = "purple_air.csv";

#[derive(Parser)]
#[command(name = "purple_air_db")]
#[command(about = "An interactive database for PurpleAir air quality data", long_about = None)]
struct Cli {
    /// Path to the sensor data CSV (falls back to $PURPLE_AIR_CSV, then
    /// "purple_air.csv")
    #[arg(short, long)]
    data: Option<String>,

    /// Display name; prompted interactively when omitted
    #[arg(long)]
    name: Option<String>,

    /// Menu header; prompted interactively when omitted
    #[arg(long)]
    header: Option<String>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/purple_air_db.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("purple_air_db.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("warn".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let data_path = cli
        .data
        .or_else(|| std::env::var("PURPLE_AIR_CSV").ok())
        .unwrap_or_else(|| DEFAULT_DATA_PATH.to_string());

    let stdin = io::stdin();
    let mut input = stdin.lock();

    let name = match cli.name {
        Some(name) => name,
        None => prompt(&mut input, "Please enter your name: ")?,
    };
    println!("Hello {name}, welcome to the Air Quality database.");

    let mut session = Session::new(name);
    let mut header = cli.header;
    loop {
        let candidate = match header.take() {
            Some(h) => h,
            None => prompt(&mut input, "Now please enter a header for the menu: ")?,
        };
        match session.set_header(&candidate) {
            Ok(()) => break,
            Err(e) => println!("{e}"),
        }
    }
    println!("\n");

    menu(&mut session, &mut input, &data_path)
}

fn print_menu() {
    println!("Main Menu");
    println!("1 - Print Average Particulate Concentration by Zip Code and Time");
    println!("2 - Print Minimum Particulate Concentration by Zip Code and Time");
    println!("3 - Print Maximum Particulate Concentration by Zip Code and Time");
    println!("4 - Adjust Zip Code Filters");
    println!("5 - Load Data");
    println!("9 - Quit");
}

/// Runs the main menu loop until the user quits or input ends.
fn menu(session: &mut Session, input: &mut impl BufRead, data_path: &str) -> Result<()> {
    loop {
        println!("{}", session.header());
        print_menu();
        let Some(choice) = prompt_opt(input, "What is your choice? ")? else {
            break;
        };
        let Ok(number) = choice.parse::<u32>() else {
            println!("Please enter a number next time.\n");
            continue;
        };
        match number {
            1 => print_table(session, Statistic::Average),
            2 => print_table(session, Statistic::Minimum),
            3 => print_table(session, Statistic::Maximum),
            4 => manage_filters(session, input)?,
            5 => load_data(session, data_path),
            9 => {
                println!("Exiting database. Goodbye.\n");
                break;
            }
            _ => println!("That is not a valid selection. Please choose something else.\n"),
        }
        println!();
    }
    Ok(())
}

fn print_table(session: &Session, stat: Statistic) {
    match session.cells() {
        Ok(cells) => {
            println!("\n{} Particulate Concentration", stat.label());
            print!("{}", render_table(&cells, stat));
        }
        Err(SessionError::NotLoaded) => {
            println!("No data is loaded. Please load the data set.");
        }
        Err(e) => println!("{e}"),
    }
}

fn load_data(session: &mut Session, data_path: &str) {
    match session.load(data_path) {
        Ok(summary) => {
            info!(
                loaded = summary.loaded,
                skipped = summary.skipped,
                "Data set loaded"
            );
            println!("{} lines loaded.", summary.loaded);
            if summary.skipped > 0 {
                println!("{} malformed lines skipped.", summary.skipped);
            }
        }
        Err(e) => {
            error!(error = %e, path = data_path, "Load failed");
            println!("Unable to load '{data_path}': {e}");
        }
    }
}

/// Handles the filter submenu: list known zip codes and toggle by index
/// until the user enters a blank line.
fn manage_filters(session: &mut Session, input: &mut impl BufRead) -> Result<()> {
    if !session.is_loaded() {
        println!("No data is loaded. Please load the data set.");
        return Ok(());
    }
    loop {
        let filter = session
            .filter_state()
            .expect("filter must exist after load");
        print!("{}", render_filters(filter));
        let Some(selection) = prompt_opt(
            input,
            "Please select an item to toggle or press enter/return when you are finished. ",
        )?
        else {
            break;
        };
        if selection.is_empty() {
            break;
        }
        let Ok(index) = selection.parse::<usize>() else {
            println!("Please enter a number next time.");
            continue;
        };
        let zip = index
            .checked_sub(1)
            .and_then(|i| filter.known_zips().nth(i))
            .map(str::to_string);
        match zip {
            Some(zip) => match session.toggle_zip(&zip) {
                Ok(enabled) => {
                    info!(zip = %zip, enabled, "Filter adjusted from menu");
                }
                Err(e) => println!("{e}"),
            },
            None => {
                println!("That is not a valid selection. Please choose something else.");
            }
        }
    }
    Ok(())
}

/// Prompts and reads one trimmed line; fails if input has ended.
fn prompt(input: &mut impl BufRead, message: &str) -> Result<String> {
    prompt_opt(input, message)?.ok_or_else(|| anyhow::anyhow!("input stream closed"))
}

/// Prompts and reads one trimmed line; `None` once input has ended.
fn prompt_opt(input: &mut impl BufRead, message: &str) -> Result<Option<String>> {
    print!("{message}");
    io::stdout().flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
