// src/cli.rs
use std::path::PathBuf;

use crate::{
    config::{consts::PROGRESS_EVERY, ArchiveOptions},
    core::HttpFetcher,
    error::{Result, ScrapeError},
    progress::Progress,
    runner,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Update,
    Summary,
    Query,
    Help,
}

impl Mode {
    /// Anything other than the known words is an event update.
    pub fn from_word(word: &str) -> Self {
        match word.to_ascii_lowercase().as_str() {
            "query" => Mode::Query,
            "summary" => Mode::Summary,
            _ => Mode::Update,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    pub mode: Mode,
    pub opts: ArchiveOptions,
}

/// Prints status lines as they come, plus a progress line for every
/// `PROGRESS_EVERY`-th snapshot in the list that yielded rows.
#[derive(Default)]
pub struct ConsoleProgress {
    total: usize,
}

impl ConsoleProgress {
    pub fn progress_line(&self, index: usize) -> Option<String> {
        (index % PROGRESS_EVERY == 0)
            .then(|| format!("Progress: {index}/{} snapshots visited...", self.total))
    }
}

impl Progress for ConsoleProgress {
    fn begin(&mut self, total: usize) { self.total = total; }
    fn log(&mut self, msg: &str) { println!("{msg}"); }
    fn item_done(&mut self, index: usize, _url: &str) {
        if let Some(line) = self.progress_line(index) {
            println!("{line}");
        }
    }
}

pub fn run(inv: &Invocation) -> Result<()> {
    let opts = &inv.opts;
    if inv.mode == Mode::Help {
        println!("{}", include_str!("cli_help.txt"));
        return Ok(());
    }

    crate::log::init(&opts.log_file);
    logf!("Mode {:?}, base {}, min year {}", inv.mode, opts.base_url, opts.min_year);

    let mut console = ConsoleProgress::default();
    match inv.mode {
        Mode::Update => {
            let fetcher = HttpFetcher::new(&opts.net)?;
            runner::update_events(opts, &fetcher, Some(&mut console))?;
        }
        Mode::Summary => {
            let fetcher = HttpFetcher::new(&opts.net)?;
            runner::update_summary(opts, &fetcher, Some(&mut console))?;
        }
        Mode::Query => print_query(opts)?,
        Mode::Help => {}
    }
    Ok(())
}

fn print_query(opts: &ArchiveOptions) -> Result<()> {
    let Some(q) = runner::query_events(&opts.events_path)? else {
        println!("No events CSV yet. Run: flare_scrape update");
        return Ok(());
    };

    println!("Total unique events in CSV: {}", q.total);
    if let Some(lines) = q.x_class {
        println!("\nX-class events (up to 20):");
        if lines.is_empty() {
            println!("None found.");
        }
        for l in lines {
            println!("{:<24} {:<22} {:<8} {}", l.ename, l.peak, l.goes_class, l.derived_position);
        }
    }
    Ok(())
}

/// Read the mode word and overrides. The first argument, when it isn't a flag,
/// picks the mode; flags may follow in any order.
pub fn parse_args<I>(args: I) -> Result<Invocation>
where
    I: IntoIterator<Item = String>,
{
    let mut opts = ArchiveOptions::default();
    let mut mode = Mode::Update;

    let mut args = args.into_iter().peekable();
    if let Some(first) = args.next_if(|a| !a.starts_with('-')) {
        mode = Mode::from_word(&first);
    }

    while let Some(a) = args.next() {
        match a.as_str() {
            "--base-url" => opts.base_url = value(&mut args, &a)?,
            "--min-year" => opts.min_year = number(&value(&mut args, &a)?, &a)?,
            "--events" => opts.events_path = PathBuf::from(value(&mut args, &a)?),
            "--summary-out" => opts.summary_path = PathBuf::from(value(&mut args, &a)?),
            "--workers" => {
                let n: usize = number(&value(&mut args, &a)?, &a)?;
                if n == 0 {
                    return Err(ScrapeError::InvalidArgument(s!("--workers must be at least 1")));
                }
                opts.net.workers = n;
            }
            "-h" | "--help" => mode = Mode::Help,
            _ => return Err(ScrapeError::InvalidArgument(format!("Unknown arg: {a}"))),
        }
    }

    Ok(Invocation { mode, opts })
}

fn value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
    args.next()
        .ok_or_else(|| ScrapeError::InvalidArgument(format!("Missing value for {flag}")))
}

fn number<T: std::str::FromStr>(v: &str, flag: &str) -> Result<T> {
    v.trim()
        .parse()
        .map_err(|_| ScrapeError::InvalidArgument(format!("{flag}: not a number: {v}")))
}
