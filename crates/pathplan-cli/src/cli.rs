//! Command line arguments.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Plan diversion and search waypoints from JSON mission parameters
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Pretty-print the JSON output
    #[arg(long, global = true)]
    pub pretty: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Route from the current position to the rejoin point around a restricted zone
    Divert {
        /// Request file, `-` for stdin
        #[arg(long, short, default_value = "-")]
        input: PathBuf,
    },
    /// Concentric-ring search pattern around a centre point
    Search {
        /// Request file, `-` for stdin
        #[arg(long, short, default_value = "-")]
        input: PathBuf,

        /// Override PATHPLAN_OVERLAP_MULTIPLIER
        #[arg(long)]
        overlap: Option<f64>,

        /// Override PATHPLAN_MIN_RING_POINTS
        #[arg(long)]
        min_ring_points: Option<usize>,
    },
    /// Shortest round trips from an origin that visit every target
    Visit {
        /// Request file, `-` for stdin
        #[arg(long, short, default_value = "-")]
        input: PathBuf,
    },
}

/// Reads the whole request document from a file or stdin.
pub fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading request from stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("reading request from {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn divert_defaults_to_stdin() {
        let args = Args::try_parse_from(["pathplan", "divert"]).unwrap();
        match args.command {
            Command::Divert { input } => assert_eq!(input, PathBuf::from("-")),
            other => panic!("unexpected command {other:?}"),
        }
        assert!(!args.pretty);
    }

    #[test]
    fn search_accepts_overrides() {
        let args = Args::try_parse_from([
            "pathplan",
            "search",
            "--input",
            "mission.json",
            "--overlap",
            "1.5",
            "--min-ring-points",
            "6",
            "--pretty",
        ])
        .unwrap();
        assert!(args.pretty);
        match args.command {
            Command::Search {
                input,
                overlap,
                min_ring_points,
            } => {
                assert_eq!(input, PathBuf::from("mission.json"));
                assert_eq!(overlap, Some(1.5));
                assert_eq!(min_ring_points, Some(6));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn visit_reads_named_file() {
        let args = Args::try_parse_from(["pathplan", "visit", "-i", "targets.json"]).unwrap();
        match args.command {
            Command::Visit { input } => assert_eq!(input, PathBuf::from("targets.json")),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Args::try_parse_from(["pathplan"]).is_err());
        assert!(Args::try_parse_from(["pathplan", "search", "--overlap", "x"]).is_err());
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = read_input(Path::new("/nonexistent/pathplan-request.json")).unwrap_err();
        assert!(err.to_string().contains("pathplan-request.json"));
    }
}
