use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use visitrank_config::{DEFAULT_CONFIG_FILE, VisitrankConfig, load_config, save_config};
use visitrank_engine::{Engine, PipelineOptions, write_stats};
use visitrank_ingest_text::TextFileSource;
use visitrank_logging::{LogFormat, LogLevel};
use visitrank_normalize::DateNormalizer;
use visitrank_parse::MalformedRowPolicy;
use visitrank_render::{OutputFormat, renderer_for};
use visitrank_writer::{ShardedTextSink, StreamSink};

#[derive(Parser, Debug)]
#[command(name = "visitrank")]
#[command(about = "Rank the busiest hospital departments per day from a visit log.", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read a visit log, rank departments per day, write the results.
    Run {
        /// Visit log to read (`-` for stdin).
        #[arg(long)]
        input: Option<PathBuf>,
        /// Output prefix. Shards are named <prefix>-00000-of-00001. Omit to print to stdout.
        #[arg(long)]
        output: Option<PathBuf>,
        /// YAML or JSON config file. Flags below override it.
        #[arg(long)]
        config: Option<PathBuf>,
        /// tuple, csv or jsonl
        #[arg(long)]
        format: Option<OutputFormat>,
        #[arg(long)]
        shards: Option<usize>,
        /// Threads for the map phase.
        #[arg(long)]
        workers: Option<usize>,
        /// Departments reported per day.
        #[arg(long)]
        top: Option<usize>,
        /// Days with fewer ranked departments are dropped.
        #[arg(long)]
        min_departments: Option<usize>,
        /// fail (default) or skip
        #[arg(long)]
        on_malformed: Option<MalformedRowPolicy>,
        #[arg(long)]
        delimiter: Option<char>,
        /// Header lines to skip at the top of the input.
        #[arg(long)]
        skip_header: Option<usize>,
        /// Also write stats.json next to the output.
        #[arg(long)]
        stats: bool,
        #[arg(long)]
        log_level: Option<LogLevel>,
        #[arg(long)]
        log_format: Option<LogFormat>,
    },

    /// Print the canonical form of each date, or <none>.
    NormalizeDate {
        #[arg(required = true)]
        values: Vec<String>,
        /// Date format to try, in order. Repeatable. Defaults to %d-%m-%Y then %d/%m/%Y.
        #[arg(long = "date-format")]
        date_formats: Vec<String>,
    },

    /// Write the default configuration.
    InitConfig {
        #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
        path: PathBuf,
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.cmd {
        Command::Run {
            input,
            output,
            config,
            format,
            shards,
            workers,
            top,
            min_departments,
            on_malformed,
            delimiter,
            skip_header,
            stats,
            log_level,
            log_format,
        } => {
            let mut cfg = match &config {
                Some(path) => load_config(path)?,
                None => VisitrankConfig::default(),
            };

            if input.is_some() {
                cfg.input = input;
            }
            if output.is_some() {
                cfg.output = output;
            }
            if let Some(f) = format {
                cfg.output_format = f;
            }
            if let Some(n) = shards {
                cfg.num_shards = n;
            }
            if let Some(n) = workers {
                cfg.workers = n;
            }
            if let Some(n) = top {
                cfg.top_n = n;
            }
            if let Some(n) = min_departments {
                cfg.min_departments = n;
            }
            if let Some(p) = on_malformed {
                cfg.on_malformed = p;
            }
            if let Some(d) = delimiter {
                cfg.delimiter = d;
            }
            if let Some(n) = skip_header {
                cfg.skip_header_lines = n;
            }
            if stats {
                cfg.write_stats = true;
            }
            if let Some(level) = log_level {
                cfg.logging.level = level;
            }
            if let Some(fmt) = log_format {
                cfg.logging.format = fmt;
            }

            cfg.validate()?;
            visitrank_logging::init(&cfg.logging)?;
            run(&cfg)?;
        }

        Command::NormalizeDate {
            values,
            date_formats,
        } => {
            let normalizer = if date_formats.is_empty() {
                DateNormalizer::new()
            } else {
                DateNormalizer::with_formats(date_formats)
            };
            for value in &values {
                match normalizer.normalize_to_string(value) {
                    Some(date) => println!("{date}"),
                    None => println!("<none>"),
                }
            }
        }

        Command::InitConfig { path, force } => {
            if path.exists() && !force {
                bail!("{path:?} already exists (pass --force to overwrite)");
            }
            save_config(&VisitrankConfig::default(), &path)?;
            println!("Wrote {}", path.display());
        }
    }

    Ok(())
}

fn run(cfg: &VisitrankConfig) -> Result<()> {
    let input = cfg
        .input
        .clone()
        .context("no input: pass --input or set `input` in the config")?;
    let source = TextFileSource::new(input, cfg.skip_header_lines);
    let engine = Engine::new(PipelineOptions::from(cfg));
    let renderer = renderer_for(cfg.output_format);

    let summary = match &cfg.output {
        Some(prefix) => {
            let mut sink = ShardedTextSink::new(
                prefix,
                cfg.effective_shard_suffix(),
                cfg.num_shards,
                renderer,
            );
            engine.run(&source, &mut sink)?
        }
        None => {
            let stdout = std::io::stdout();
            let mut sink = StreamSink::new(stdout.lock(), renderer);
            engine.run(&source, &mut sink)?
        }
    };

    if cfg.write_stats {
        match cfg.stats_path() {
            Some(path) => {
                write_stats(&path, &summary.stats)?;
                tracing::info!(path = ?path, "wrote stats");
            }
            None => tracing::warn!("stats requested without --output; not writing stats.json"),
        }
    }

    for file in &summary.report.files {
        tracing::debug!(path = ?file, "output shard");
    }
    Ok(())
}
