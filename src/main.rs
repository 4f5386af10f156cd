//! kullback - index-of-coincidence triage from the command line.
//!
//! Reads text, a file or stdin, prints the IoC-per-period table and the
//! candidate key lengths, or the full report as JSON.

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]

use std::fs::File;
use std::io::{self, Read, Write};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::{ArgAction, Parser};
use memmap2::Mmap;
use serde::Serialize;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use kullback::analysis::IocDomain;
use kullback::plot::HitResult;
use kullback::util::format_bytes;
use kullback::{
    AnalysisConfig, AnalysisError, AnalysisRequest, AnalysisSession, Encoding, PeriodSample,
    PlotFrame, Point,
};

/// Exit status for input rejected by the decoder.
const EXIT_INVALID_INPUT: u8 = 2;

// =============================================================================
// Command line
// =============================================================================

#[derive(Parser, Debug)]
#[command(name = "kullback", version, about = "Index of Coincidence per candidate key length")]
struct Cli {
    /// Input file; reads stdin when neither FILE nor --text is given.
    file: Option<PathBuf>,

    /// Analyze this text instead of a file.
    #[arg(short, long, conflicts_with = "file")]
    text: Option<String>,

    /// Input encoding: utf-8, hex, base64, binary, file/raw.
    /// Defaults to utf-8 for --text and raw bytes otherwise.
    #[arg(short, long)]
    encoding: Option<Encoding>,

    /// Largest candidate key length.
    #[arg(short, long)]
    max_period: Option<usize>,

    /// Z-score above which a period is flagged.
    #[arg(short = 'z', long)]
    threshold: Option<f64>,

    /// Skip outlier detection.
    #[arg(long)]
    no_outliers: bool,

    /// Skip malformed input instead of rejecting it.
    #[arg(short, long)]
    lenient: bool,

    /// Display width used for scaled coordinates.
    #[arg(long)]
    width: Option<f64>,

    /// Display height used for scaled coordinates.
    #[arg(long)]
    height: Option<f64>,

    /// JSON config file; flags override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the report as JSON.
    #[arg(long)]
    json: bool,

    /// Include the resolved render model in the JSON report.
    #[arg(long, requires = "json")]
    frame: bool,

    /// Hit-test a cursor position, given as X,Y in display units.
    #[arg(long, value_name = "X,Y", value_parser = parse_cursor)]
    at: Option<Point>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn parse_cursor(s: &str) -> Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got {s:?}"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|e| format!("bad coordinate {v:?}: {e}"))
    };
    Ok(Point::new(parse(x)?, parse(y)?))
}

impl Cli {
    /// Config file (or defaults) with command-line overrides applied.
    fn config(&self) -> anyhow::Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::from_json_file(path)?,
            None => AnalysisConfig::default(),
        };
        if let Some(max_period) = self.max_period {
            config.max_period = max_period;
        }
        if let Some(threshold) = self.threshold {
            config.outlier_threshold = threshold;
        }
        if let Some(width) = self.width {
            config.display_width = width;
        }
        if let Some(height) = self.height {
            config.display_height = height;
        }
        config.detect_outliers &= !self.no_outliers;
        config.lenient |= self.lenient;
        Ok(config)
    }
}

// =============================================================================
// Input
// =============================================================================

/// Analysis input, memory-mapped when it comes from a file.
enum Input {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

impl Input {
    fn load(cli: &Cli) -> anyhow::Result<Self> {
        if let Some(text) = &cli.text {
            return Ok(Self::Owned(text.clone().into_bytes()));
        }
        match &cli.file {
            Some(path) => Self::map_file(path),
            None => {
                let mut buf = Vec::new();
                io::stdin()
                    .lock()
                    .read_to_end(&mut buf)
                    .context("reading stdin")?;
                Ok(Self::Owned(buf))
            }
        }
    }

    fn map_file(path: &Path) -> anyhow::Result<Self> {
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        let len = file
            .metadata()
            .with_context(|| format!("reading metadata of {}", path.display()))?
            .len();
        if len == 0 {
            // Zero-length mappings are rejected by the OS
            return Ok(Self::Owned(Vec::new()));
        }
        // SAFETY: the mapping is read-only and lives no longer than this process's use of it;
        // concurrent truncation of the file by another process is not guarded against.
        let mmap = unsafe { Mmap::map(&file) }
            .with_context(|| format!("memory-mapping {}", path.display()))?;
        Ok(Self::Mapped(mmap))
    }
}

impl Deref for Input {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            Self::Mapped(mmap) => mmap,
            Self::Owned(buf) => buf,
        }
    }
}

// =============================================================================
// Report
// =============================================================================

#[derive(Serialize)]
struct Report<'a> {
    valid: bool,
    encoding: Encoding,
    max_period: Option<usize>,
    domain: Option<IocDomain>,
    samples: &'a [PeriodSample],
    points: &'a [Point],
    outliers: &'a [bool],
    /// Candidate key lengths, one per cluster of flagged periods.
    peaks: Vec<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hit: Option<HitResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    frame: Option<PlotFrame>,
}

impl<'a> Report<'a> {
    fn new(session: &'a AnalysisSession, encoding: Encoding, cursor: Option<Point>) -> Self {
        let snapshot = session.snapshot();
        let peaks = snapshot
            .as_deref()
            .map(|snap| {
                snap.peaks()
                    .into_iter()
                    .map(|i| snap.samples()[i].period)
                    .collect()
            })
            .unwrap_or_default();
        let hit = cursor.map(|c| session.query(c.x, c.y));

        Self {
            valid: session.is_valid(),
            encoding,
            max_period: session.max_period(),
            domain: session.domain(),
            samples: session.series(),
            points: session.points(),
            outliers: session.outliers(),
            peaks,
            hit,
            frame: None,
        }
    }

    fn write_table(&self, out: &mut impl Write) -> io::Result<()> {
        if !self.valid {
            return writeln!(out, "not enough data to analyze");
        }
        writeln!(out, "{:>6}  {:>8}  flag", "period", "ioc")?;
        for (sample, &flagged) in self.samples.iter().zip(self.outliers) {
            let mark = if flagged { "*" } else { "" };
            writeln!(out, "{:>6}  {:>8.4}  {mark}", sample.period, sample.ioc)?;
        }

        if self.peaks.is_empty() {
            writeln!(out, "\nno anomalous periods")?;
        } else {
            let list: Vec<String> = self.peaks.iter().map(ToString::to_string).collect();
            writeln!(out, "\ncandidate key lengths: {}", list.join(", "))?;
        }

        if let Some(hit) = self.hit {
            let describe = match hit {
                HitResult::NearestPoint(i) => format!("point at period {}", self.samples[i].period),
                HitResult::NearestSegment(i) => format!(
                    "segment between periods {} and {}",
                    self.samples[i].period,
                    self.samples[i + 1].period
                ),
                HitResult::None => "nothing".to_string(),
            };
            writeln!(out, "cursor hits {describe}")?;
        }
        Ok(())
    }
}

// =============================================================================
// Entry point
// =============================================================================

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    let config = cli.config()?;
    let input = Input::load(cli)?;
    let encoding = cli.encoding.unwrap_or(if cli.text.is_some() {
        Encoding::Utf8
    } else {
        Encoding::File
    });
    debug!(%encoding, size = %format_bytes(input.len() as u64), "loaded input");

    let mut session = AnalysisSession::new();
    let outcome = session.run_analysis(&AnalysisRequest::new(&input, encoding, &config));

    let status = match &outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err @ AnalysisError::InvalidInput { .. }) => {
            eprintln!("invalid input: {err}");
            return Ok(ExitCode::from(EXIT_INVALID_INPUT));
        }
        Err(AnalysisError::InsufficientData { len }) => {
            warn!(len, "nothing to plot");
            ExitCode::SUCCESS
        }
        Err(err) => bail!("analysis failed: {err}"),
    };

    let mut report = Report::new(&session, encoding, cli.at);
    if cli.frame {
        report.frame = session.frame(report.hit.unwrap_or_default());
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if cli.json {
        serde_json::to_writer_pretty(&mut out, &report).context("writing JSON report")?;
        writeln!(out)?;
    } else {
        report.write_table(&mut out).context("writing report")?;
    }
    Ok(status)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
