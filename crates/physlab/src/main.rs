#![forbid(unsafe_code)]

//! # Physlab CLI
//!
//! ## Usage
//!
//! ```bash
//! physlab projectile --angle 30 --speed 25
//! physlab oscillator --amplitude 2 --spring-constant 40
//! physlab register --user uid-1 --username sari
//! physlab submit --user uid-1 --subject english --correct 4
//! physlab status --user uid-1
//! physlab leaderboard
//! ```

use physlab::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    physlab::run(Cli::parse_args()).await
}
