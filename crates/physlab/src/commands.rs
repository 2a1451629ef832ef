//! Subcommand implementations.
//!
//! Each command returns its rendered output so the binary only prints and
//! the tests can inspect it directly.

use std::fmt::Write as _;
use std::sync::Arc;

use anyhow::{Context, Result};
use kinematics::{
    DerivedMetrics, OscillatorLab, OscillatorParams, OscillatorRun, ProjectileLab,
    ProjectileParams, ProjectileRun, simulate_oscillator, simulate_projectile,
};
use scoreboard::{
    DocumentStore, JsonFileStore, Leaderboard, Outcome, QuizCompletion, QuizStatus,
    ScoreAggregator, SkipReason, StoreError,
};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info};

use crate::cli::{
    Command, LeaderboardArgs, OscillatorArgs, ProjectileArgs, RegisterArgs, StatusArgs,
    SubmitArgs,
};
use crate::config::Config;

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Runs `command` and returns what it prints.
///
/// # Errors
///
/// Simulation input errors, malformed quiz submissions, and store errors
/// on the read-only commands. A failed score write during `submit` is not
/// an error.
pub async fn execute(command: &Command, config: &Config, format: Format) -> Result<String> {
    match command {
        Command::Projectile(args) => projectile(args, config, format),
        Command::Oscillator(args) => oscillator(args, config, format),
        Command::Register(args) => register(args, config, format),
        Command::Submit(args) => submit(args, config, format).await,
        Command::Status(args) => status(args, config, format).await,
        Command::Leaderboard(args) => leaderboard(args, config, format).await,
    }
}

#[derive(Serialize)]
struct ProjectileReport {
    params: ProjectileParams,
    clamped: bool,
    metrics: DerivedMetrics,
    samples: Vec<ProjectilePoint>,
}

#[derive(Serialize)]
struct ProjectilePoint {
    time: f64,
    height: f64,
    distance: f64,
}

impl ProjectileReport {
    fn new(params: ProjectileParams, clamped: bool, run: &ProjectileRun) -> Self {
        Self {
            params,
            clamped,
            metrics: run.metrics,
            samples: run
                .samples
                .iter()
                .map(|s| ProjectilePoint {
                    time: s.time,
                    height: s.height(),
                    distance: s.distance().unwrap_or_default(),
                })
                .collect(),
        }
    }
}

#[derive(Serialize)]
struct OscillatorReport {
    params: OscillatorParams,
    clamped: bool,
    period: f64,
    angular_frequency: f64,
    samples: Vec<OscillatorPoint>,
}

#[derive(Serialize)]
struct OscillatorPoint {
    time: f64,
    displacement: f64,
}

impl OscillatorReport {
    fn new(params: OscillatorParams, clamped: bool, run: &OscillatorRun) -> Self {
        Self {
            params,
            clamped,
            period: run.period,
            angular_frequency: run.angular_frequency,
            samples: run
                .samples
                .iter()
                .map(|s| OscillatorPoint {
                    time: s.time,
                    displacement: s.displacement(),
                })
                .collect(),
        }
    }
}

fn projectile(args: &ProjectileArgs, config: &Config, format: Format) -> Result<String> {
    let clamp = config.clamp_inputs && !args.no_clamp;

    let (params, run) = if clamp {
        let mut lab = ProjectileLab::new();
        lab.set_angle(args.angle);
        lab.set_speed(args.speed);
        let run = lab.launch()?.clone();
        (lab.params(), run)
    } else {
        let params = ProjectileParams::new(args.angle, args.speed);
        (params, simulate_projectile(params)?)
    };
    debug!(
        angle = params.launch_angle_degrees,
        speed = params.initial_speed,
        samples = run.samples.len(),
        "Projectile simulated"
    );

    if format == Format::Json {
        let report = ProjectileReport::new(params, clamp, &run);
        return Ok(serde_json::to_string_pretty(&report)?);
    }

    let mut out = String::new();
    writeln!(
        out,
        "Launch: {:.2} deg at {:.2} m/s",
        params.launch_angle_degrees, params.initial_speed
    )?;
    writeln!(out, "Time of flight: {:.2} s", run.metrics.time_of_flight)?;
    writeln!(out, "Max height: {:.2} m", run.metrics.max_height)?;
    writeln!(out, "Range: {:.2} m", run.metrics.range)?;
    writeln!(out)?;
    writeln!(out, "{:>8} {:>10} {:>10}", "t (s)", "x (m)", "y (m)")?;
    for sample in &run.samples {
        writeln!(
            out,
            "{:>8.2} {:>10.2} {:>10.2}",
            sample.time,
            sample.distance().unwrap_or_default(),
            sample.height()
        )?;
    }
    Ok(out)
}

fn oscillator(args: &OscillatorArgs, config: &Config, format: Format) -> Result<String> {
    let clamp = config.clamp_inputs && !args.no_clamp;

    let (params, run) = if clamp {
        let mut lab = OscillatorLab::new();
        lab.set_amplitude(args.amplitude)?;
        lab.set_spring_constant(args.spring_constant)?;
        (lab.params(), lab.run().clone())
    } else {
        let params = OscillatorParams::new(args.amplitude, args.spring_constant);
        (params, simulate_oscillator(params)?)
    };
    debug!(
        amplitude = params.amplitude,
        spring_constant = params.spring_constant,
        period = run.period,
        "Oscillator simulated"
    );

    if format == Format::Json {
        let report = OscillatorReport::new(params, clamp, &run);
        return Ok(serde_json::to_string_pretty(&report)?);
    }

    let mut out = String::new();
    writeln!(
        out,
        "Amplitude: {:.2} m, spring constant: {:.2} N/m",
        params.amplitude, params.spring_constant
    )?;
    writeln!(out, "Period: {:.3} s", run.period)?;
    writeln!(out, "Angular frequency: {:.3} rad/s", run.angular_frequency)?;
    writeln!(out)?;
    writeln!(out, "{:>8} {:>10}", "t (s)", "x (m)")?;
    for sample in &run.samples {
        writeln!(out, "{:>8.2} {:>10.3}", sample.time, sample.displacement())?;
    }
    Ok(out)
}

fn open_store(config: &Config) -> Arc<JsonFileStore> {
    debug!(path = %config.store_path.display(), "Opening document store");
    Arc::new(JsonFileStore::new(&config.store_path))
}

fn register(args: &RegisterArgs, config: &Config, format: Format) -> Result<String> {
    let store = open_store(config);
    let username = args
        .username
        .clone()
        .unwrap_or_else(|| args.user.to_string());
    let created = store
        .register(&args.user, &username)
        .with_context(|| format!("registering {}", args.user))?;

    if created {
        info!(user = %args.user, username = %username, "User registered");
    }

    Ok(match format {
        Format::Json => serde_json::to_string_pretty(&json!({
            "user": args.user,
            "username": username,
            "created": created,
        }))?,
        Format::Text if created => format!("Registered {} ({username})\n", args.user),
        Format::Text => format!("{} is already registered\n", args.user),
    })
}

async fn submit(args: &SubmitArgs, config: &Config, format: Format) -> Result<String> {
    let completion = QuizCompletion::new(args.subject, args.correct)?;
    let aggregator = ScoreAggregator::new(open_store(config)).with_strategy(config.strategy);
    let outcome = aggregator
        .record_completion(args.user.as_ref(), completion)
        .await;

    let final_score = completion.final_score();
    if format == Format::Json {
        let mut report = json!({
            "subject": completion.subject(),
            "correct": completion.correct_count(),
            "final_score": final_score,
            "saved": outcome.is_committed(),
        });
        match &outcome {
            Outcome::Committed { previous, total } => {
                report["previous"] = json!(previous);
                report["total"] = json!(total);
            }
            Outcome::Skipped(reason) => report["skipped"] = json!(skip_reason(*reason)),
            Outcome::Failed(e) => report["error"] = json!(e.to_string()),
        }
        return Ok(serde_json::to_string_pretty(&report)?);
    }

    let mut out = String::new();
    writeln!(
        out,
        "{} quiz: {}/5 correct, score {final_score}",
        completion.subject(),
        completion.correct_count()
    )?;
    match &outcome {
        Outcome::Committed { previous, total } => {
            writeln!(out, "Cumulative score: {total} (was {previous})")?;
        }
        Outcome::Skipped(reason) => writeln!(out, "Score not saved: {}", skip_reason(*reason))?,
        Outcome::Failed(e) => writeln!(out, "Score not saved: {e}")?,
    }
    Ok(out)
}

fn skip_reason(reason: SkipReason) -> &'static str {
    match reason {
        SkipReason::NotAuthenticated => "not signed in",
        SkipReason::MissingDocument => "no score document for this user",
    }
}

async fn status(args: &StatusArgs, config: &Config, format: Format) -> Result<String> {
    let store = open_store(config);
    let record = store
        .get(&args.user)
        .await?
        .ok_or_else(|| StoreError::NotFound(args.user.clone()))?;
    let status = QuizStatus::from_record(&record);

    if format == Format::Json {
        return Ok(serde_json::to_string_pretty(&json!({
            "user": args.user,
            "username": record.username,
            "score": scoreboard::display_points(&record),
            "subjects": status.subjects,
        }))?);
    }

    let mut out = String::new();
    writeln!(
        out,
        "{} ({})",
        record.username.as_deref().unwrap_or("unnamed"),
        args.user
    )?;
    writeln!(out, "Total score: {}", scoreboard::display_points(&record))?;
    for entry in &status.subjects {
        match entry.score {
            Some(score) => writeln!(out, "{}: {score}", entry.subject)?,
            None => writeln!(out, "{}: not attempted", entry.subject)?,
        }
    }
    Ok(out)
}

async fn leaderboard(args: &LeaderboardArgs, config: &Config, format: Format) -> Result<String> {
    let limit = args.limit.unwrap_or(config.leaderboard_limit);
    let store = open_store(config);
    let board = Leaderboard::fetch(store.as_ref(), limit).await?;

    if format == Format::Json {
        return Ok(serde_json::to_string_pretty(&board)?);
    }

    if board.is_empty() {
        return Ok("No users yet\n".to_string());
    }
    let mut out = String::new();
    for entry in &board.entries {
        writeln!(
            out,
            "{}. {} ({}) {}",
            entry.rank,
            entry.username.as_deref().unwrap_or("unnamed"),
            entry.user,
            entry.points
        )?;
    }
    Ok(out)
}
