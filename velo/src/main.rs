mod config;

use anyhow::Context;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use clap::{Parser, Subcommand};
use config::{Config, PricingChoice};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use velolib::{
    export_monthly_report, guide_performance, load, monthly_bike_stats, monthly_summary,
    occupancy_rates, path_analytics, Snapshot,
};

#[derive(Parser, Debug)]
#[command(name = "velo", version, about = "Статистика и месячные отчёты велотуроператора")]
struct Cli {
    /// Входной XML-снимок (по умолчанию stdin)
    #[arg(short = 'i', long = "input", global = true)]
    input: Option<PathBuf>,

    /// Выходной файл (по умолчанию stdout)
    #[arg(short = 'o', long = "output", global = true)]
    output: Option<PathBuf>,

    /// TOML-файл настроек
    #[arg(long = "config", global = true)]
    config: Option<PathBuf>,

    /// Режим цены пакета; перекрывает настройку из файла
    #[arg(long = "pricing-mode", value_enum, global = true)]
    pricing_mode: Option<PricingChoice>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Месячный XML-отчёт (текущая и legacy-схемы)
    Report {
        #[arg(long)]
        year: i32,
        #[arg(long)]
        month: u32,
    },
    /// Статистика велосипедов за месяц (JSON)
    Bikes {
        #[arg(long)]
        year: i32,
        #[arg(long)]
        month: u32,
    },
    /// Работа гидов за период, границы включительно (JSON)
    Guides {
        /// YYYY-MM-DD или YYYY-MM-DDTHH:MM:SS
        #[arg(long, value_parser = parse_bound)]
        from: NaiveDateTime,
        #[arg(long, value_parser = parse_bound)]
        to: NaiveDateTime,
    },
    /// Маршруты за последние N месяцев до даты снимка (JSON)
    Paths {
        #[arg(long)]
        months: Option<u32>,
    },
    /// Загрузка велосипедов за последние N дней до даты снимка (JSON)
    Occupancy {
        #[arg(long)]
        days: Option<u32>,
    },
    /// Итоги месяца (JSON)
    Summary {
        #[arg(long)]
        year: i32,
        #[arg(long)]
        month: u32,
    },
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let cfg = Config::load(cli.config.as_deref())?;
    let snapshot = read_snapshot(&cli, &cfg)?;

    let body = match cli.command {
        Command::Report { year, month } => export_monthly_report(&snapshot, year, month)
            .with_context(|| format!("monthly report {year}-{month:02}"))?,
        Command::Bikes { year, month } => to_json(&monthly_bike_stats(&snapshot, year, month)?)?,
        Command::Guides { from, to } => to_json(&guide_performance(&snapshot, from, to)?)?,
        Command::Paths { months } => {
            let months = months.unwrap_or(cfg.analytics.period_months);
            to_json(&path_analytics(&snapshot, months)?)?
        }
        Command::Occupancy { days } => {
            let days = days.unwrap_or(cfg.analytics.occupancy_days);
            to_json(&occupancy_rates(&snapshot, days)?)?
        }
        Command::Summary { year, month } => to_json(&monthly_summary(&snapshot, year, month)?)?,
    };

    let mut writer: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("create {}", path.display()))?,
        ),
        None => Box::new(io::stdout()),
    };
    writer.write_all(body.as_bytes())?;
    writer.flush()?;
    Ok(())
}

fn read_snapshot(cli: &Cli, cfg: &Config) -> anyhow::Result<Snapshot> {
    let reader: Box<dyn io::Read> = match &cli.input {
        Some(path) => Box::new(
            File::open(path).with_context(|| format!("open {}", path.display()))?,
        ),
        None => Box::new(io::stdin()),
    };
    let mut snapshot = load(BufReader::new(reader)).context("load snapshot")?;

    let choice = cli.pricing_mode.unwrap_or(cfg.pricing.mode);
    if let Some(mode) = choice.mode() {
        snapshot = snapshot.with_pricing_mode(mode);
    }
    info!(
        current_date = %snapshot.current_date(),
        bookings = snapshot.bookings().len(),
        clients_section = snapshot.has_clients_section(),
        pricing_mode = ?snapshot.pricing_mode(),
        "snapshot ready"
    );
    Ok(snapshot)
}

fn to_json<T: Serialize>(value: &T) -> anyhow::Result<String> {
    let mut s = serde_json::to_string_pretty(value)?;
    s.push('\n');
    Ok(s)
}

fn parse_bound(s: &str) -> Result<NaiveDateTime, String> {
    if let Ok(ts) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Ok(ts);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|d| d.and_time(NaiveTime::MIN))
        .map_err(|e| format!("{s}: {e}"))
}
