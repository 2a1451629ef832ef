//! Command-line interface for `physlab`.
//!
//! # Examples
//!
//! ```bash
//! # Launch a projectile at 30 degrees, 25 m/s
//! physlab projectile --angle 30 --speed 25
//!
//! # One period of a 2 m amplitude spring, as JSON
//! physlab --json oscillator --amplitude 2 --spring-constant 40
//!
//! # Submit a quiz result against a custom store file
//! physlab --store users.json submit --user uid-1 --subject english --correct 4
//! ```

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use scoreboard::{Subject, UserId};

/// Physics lab: trajectory simulations and quiz scoreboard.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "physlab",
    author,
    version,
    about = "Physics lab: trajectory simulations and quiz scoreboard",
    long_about = "Runs the projectile and spring simulations and keeps cumulative \
                  quiz scores in a JSON document store."
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    ///
    /// Ignored when `RUST_LOG` is set
    #[arg(long, short = 'v', action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to a TOML configuration file
    #[arg(long, env = "PHYSLAB_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// JSON document store file
    ///
    /// Overrides `store_path` from the configuration file
    #[arg(long, env = "PHYSLAB_STORE", global = true)]
    pub store: Option<PathBuf>,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Simulate a projectile launch
    Projectile(ProjectileArgs),

    /// Simulate one period of a mass on a spring
    Oscillator(OscillatorArgs),

    /// Create a score document for a user
    Register(RegisterArgs),

    /// Record a finished quiz
    Submit(SubmitArgs),

    /// Show which quizzes a user has taken
    Status(StatusArgs),

    /// Show the top users by cumulative score
    Leaderboard(LeaderboardArgs),
}

/// Arguments for `projectile`.
#[derive(Args, Debug, Clone)]
pub struct ProjectileArgs {
    /// Launch angle, degrees (interactive range 0 to 90)
    #[arg(long, default_value_t = 45.0, allow_negative_numbers = true)]
    pub angle: f64,

    /// Initial speed, m/s (interactive range 5 to 50)
    #[arg(long, default_value_t = 20.0, allow_negative_numbers = true)]
    pub speed: f64,

    /// Pass values to the simulator as given instead of clamping them
    #[arg(long)]
    pub no_clamp: bool,
}

/// Arguments for `oscillator`.
#[derive(Args, Debug, Clone)]
pub struct OscillatorArgs {
    /// Amplitude, meters (interactive range 0.1 to 5)
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    pub amplitude: f64,

    /// Spring constant, N/m (interactive range 5 to 100)
    #[arg(long, default_value_t = 10.0, allow_negative_numbers = true)]
    pub spring_constant: f64,

    /// Pass values to the simulator as given instead of clamping them
    #[arg(long)]
    pub no_clamp: bool,
}

/// Arguments for `register`.
#[derive(Args, Debug, Clone)]
pub struct RegisterArgs {
    /// User id
    #[arg(long, short = 'u')]
    pub user: UserId,

    /// Display name (defaults to the user id)
    #[arg(long)]
    pub username: Option<String>,
}

/// Arguments for `submit`.
#[derive(Args, Debug, Clone)]
pub struct SubmitArgs {
    /// User id; omit to run as a signed-out user
    #[arg(long, short = 'u')]
    pub user: Option<UserId>,

    /// Quiz subject: english or indonesian
    #[arg(long, short = 's')]
    pub subject: Subject,

    /// Number of correct answers, 0 to 5
    #[arg(long, short = 'c')]
    pub correct: u8,
}

/// Arguments for `status`.
#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    /// User id
    #[arg(long, short = 'u')]
    pub user: UserId,
}

/// Arguments for `leaderboard`.
#[derive(Args, Debug, Clone)]
pub struct LeaderboardArgs {
    /// Number of entries (defaults to `leaderboard_limit` from config)
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,
}

impl Cli {
    /// Parse command line arguments.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Create CLI from iterator (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if argument parsing fails.
    pub fn try_parse_from<I, T>(iter: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_projectile_defaults() {
        let cli = Cli::try_parse_from(["physlab", "projectile"]).unwrap();
        match cli.command {
            Command::Projectile(args) => {
                assert!((args.angle - 45.0).abs() < f64::EPSILON);
                assert!((args.speed - 20.0).abs() < f64::EPSILON);
                assert!(!args.no_clamp);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parse_negative_numbers() {
        let cli =
            Cli::try_parse_from(["physlab", "projectile", "--angle", "-10", "--no-clamp"]).unwrap();
        let Command::Projectile(args) = cli.command else {
            panic!("expected projectile");
        };
        assert!((args.angle + 10.0).abs() < f64::EPSILON);
        assert!(args.no_clamp);
    }

    #[test]
    fn parse_submit() {
        let cli = Cli::try_parse_from([
            "physlab",
            "submit",
            "--user",
            "uid-1",
            "--subject",
            "Indonesian",
            "--correct",
            "4",
        ])
        .unwrap();
        let Command::Submit(args) = cli.command else {
            panic!("expected submit");
        };
        assert_eq!(args.user, Some(UserId::from("uid-1")));
        assert_eq!(args.subject, Subject::Indonesian);
        assert_eq!(args.correct, 4);
    }

    #[test]
    fn parse_submit_rejects_unknown_subject() {
        let err = Cli::try_parse_from([
            "physlab",
            "submit",
            "--subject",
            "biology",
            "--correct",
            "1",
        ])
        .unwrap_err();
        assert!(err.to_string().contains("biology"));
    }

    #[test]
    fn parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["physlab", "leaderboard", "--json", "-vv", "-n", "5"])
            .unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        let Command::Leaderboard(args) = cli.command else {
            panic!("expected leaderboard");
        };
        assert_eq!(args.limit, Some(5));
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
