//! Command implementations

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::cli::args::{DeriveArgs, OfficialArgs, OutputFormat, ReportArgs, SummaryArgs};
use crate::config::AppConfig;
use crate::error::RinkError;
use crate::official::PeriodInfo;
use crate::project::{is_project_file, Project};
use crate::report::{ice_time_summary, IceTime, ReportData};
use crate::utils::time::TimeParser;

/// Execute the derive command
pub fn derive(args: DeriveArgs, config: &AppConfig) -> Result<()> {
    info!("Starting derive operation on {}", args.path.display());

    let walked = args.path.is_dir();
    let targets = collect_projects(&args.path)?;
    if targets.is_empty() {
        bail!("No project files found in {}", args.path.display());
    }
    if args.output.is_some() && (walked || targets.len() > 1) {
        bail!("--output can only be used with a single project file");
    }

    let mut derived = 0usize;
    for target in &targets {
        let mut project = match Project::load(target) {
            Ok(project) => project,
            Err(e) if walked => {
                warn!("Skipping {}: {}", target.display(), e);
                continue;
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to load project {}", target.display()))
            }
        };
        let duration = project
            .resolve_duration(args.duration)
            .with_context(|| format!("Cannot derive {}", target.display()))?;
        project.video_duration = Some(duration);

        let summary = project.match_data.recalculate(duration, &config.timeline);

        println!(
            "{}: {} intervals, {} periods, {} players, {}/{} shifts on the official clock, official time {}",
            target.display(),
            summary.intervals,
            summary.periods,
            summary.players,
            summary.official_shifts,
            summary.raw_shifts,
            TimeParser::new().format_clock(summary.official_duration),
        );

        derived += 1;
        if args.dry_run {
            info!("Dry run, {} left untouched", target.display());
            continue;
        }

        let destination = args.output.as_deref().unwrap_or(target.as_path());
        project
            .save(destination)
            .with_context(|| format!("Failed to save project {}", destination.display()))?;
    }

    info!(
        "Derive operation completed for {} of {} projects",
        derived,
        targets.len()
    );
    Ok(())
}

/// Execute the official command
pub fn official(args: OfficialArgs, config: &AppConfig) -> Result<()> {
    let parser = TimeParser::new();
    let time = parser.parse_time(&args.time)?;

    let project = Project::load(&args.path)?;
    let map = project.match_data.official_time_map(&config.timeline);
    if map.is_empty() {
        warn!("Project has no clean play; run derive first");
    }

    match map.to_official(time) {
        Some(official) => match map.period_for(time) {
            Some(period) => println!("{} ({})", parser.format_clock(official), period.name),
            None => println!("{}", parser.format_clock(official)),
        },
        None => println!("outside clean play"),
    }
    Ok(())
}

#[derive(Serialize)]
struct SummaryView<'a> {
    periods: &'a [PeriodInfo],
    official_duration: f64,
    players: Vec<IceTime>,
}

/// Execute the summary command
pub fn summary(args: SummaryArgs, config: &AppConfig) -> Result<()> {
    let project = Project::load(&args.path)?;
    let game = &project.match_data;
    if game.calculated_ranges.is_empty() {
        warn!("Project has no derived intervals; run derive first");
    }

    let map = game.official_time_map(&config.timeline);
    let view = SummaryView {
        periods: map.periods(),
        official_duration: map.total_official_duration(),
        players: ice_time_summary(&game.player_shifts_official_timer),
    };

    match args.format {
        OutputFormat::Text => display_summary(&view),
        format => print_structured(&view, format)?,
    }
    Ok(())
}

/// Execute the report command
pub fn report(args: ReportArgs, config: &AppConfig) -> Result<()> {
    let project = Project::load(&args.path)?;
    let data = ReportData::extract(&project.match_data, &args.team, &config.timeline)
        .with_context(|| format!("Cannot build report for {}", args.team))?;

    match args.format {
        OutputFormat::Text => display_report(&data),
        format => print_structured(&data, format)?,
    }
    Ok(())
}

/// Project files under a path: the file itself, or every `.hkt` file found by
/// a recursive directory walk
fn collect_projects(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        return Err(RinkError::ProjectNotFound {
            path: path.display().to_string(),
        }
        .into());
    }

    let mut projects = Vec::new();
    for entry in WalkDir::new(path).sort_by_file_name() {
        match entry {
            Ok(entry) if entry.file_type().is_file() && is_project_file(entry.path()) => {
                projects.push(entry.into_path());
            }
            Ok(_) => {}
            Err(e) => warn!("Skipping unreadable entry: {}", e),
        }
    }
    Ok(projects)
}

fn print_structured<T: Serialize>(value: &T, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(value).context("Failed to serialize to YAML")?;
            print!("{}", yaml);
        }
        OutputFormat::Text => bail!("Text output has no structured form"),
    }
    Ok(())
}

fn display_summary(view: &SummaryView) {
    let clock = TimeParser::new();

    println!("Periods");
    println!("=======");
    for period in view.periods {
        println!(
            "  {}: clean {} of {} target, coefficient {:.4}",
            period.name,
            clock.format_clock(period.total_clean_duration),
            clock.format_clock(period.target_duration),
            period.coefficient
        );
    }
    println!("Official time: {}", clock.format_clock(view.official_duration));
    println!();

    println!("Time on ice");
    println!("===========");
    for player in &view.players {
        println!(
            "  {:<24} shifts {:>3}  total {}  avg {}",
            player.name,
            player.shift_count,
            clock.format_clock(player.total_secs),
            clock.format_clock(player.average_secs)
        );
    }
}

fn display_report(data: &ReportData) {
    let clock = TimeParser::new();

    println!("Report: {} ({})", data.team_name, data.team_key);
    println!("==========");

    println!("Periods:");
    for period in &data.periods {
        println!(
            "  {}: {} - {}",
            period.name,
            clock.format_clock(period.official_start),
            clock.format_clock(period.official_end)
        );
    }

    println!("Players:");
    for player in &data.players {
        let shifts: Vec<String> = player
            .shifts
            .iter()
            .map(|shift| {
                format!(
                    "#{} {}-{}",
                    shift.number,
                    clock.format_clock(shift.start_time),
                    clock.format_clock(shift.end_time)
                )
            })
            .collect();
        println!(
            "  {:>3} {:<20} {:<12} {}",
            player.number,
            player.name,
            player.role,
            shifts.join(", ")
        );
    }

    println!("Goals:");
    for goal in &data.goals {
        println!(
            "  {} {}",
            clock.format_clock(goal.official_time),
            goal.team.as_deref().unwrap_or("unknown")
        );
    }

    println!("Penalties:");
    for penalty in &data.penalties {
        println!(
            "  {} - {} {} ({})",
            clock.format_clock(penalty.official_start),
            clock.format_clock(penalty.official_end),
            penalty.player_name,
            penalty.violation_type
        );
    }
}
