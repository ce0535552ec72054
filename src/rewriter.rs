use std::{fmt, fs, path::Path};

use anyhow::{Context, Result};
use tracing::{debug, error, info, instrument, warn};

use crate::{
    config::{Config, Token},
    error::RewriteError,
    patterns::PATTERN_RULES,
    status::{REASON_NO_PATTERNS, REASON_UP_TO_DATE, RunOutcome, RunResult},
    util::truncate_string,
};

/// Longest example shown per format in a [`PatternReport`]
pub const EXAMPLE_MAX_CHARS: usize = 50;

/// Rewrites every known cookie format in the playlist with the configured token
/// and records the outcome in the status file.
///
/// The playlist is only written when its content actually changed.
///
/// # Errors
/// [`RewriteError::FileNotFound`] when the playlist does not exist. No status record is written then.
/// Read and write failures are not errors here, they end up as [`RunOutcome::Error`].
#[instrument(skip(config), fields(playlist = %config.playlist_path.display()))]
pub fn run(config: &Config) -> Result<RunResult, RewriteError> {
    if !config.playlist_path.exists() {
        error!("{} file not found!", config.playlist_path.display());
        return Err(RewriteError::FileNotFound(config.playlist_path.clone()));
    }

    info!("Updating cookie in {}", config.playlist_path.display());
    let outcome = match rewrite_playlist(&config.playlist_path, &config.token) {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Error updating {}: {e:#}", config.playlist_path.display());
            RunOutcome::Error {
                message: format!("{e:#}"),
            }
        }
    };

    let result = RunResult::now(outcome);
    if let Err(e) = result.write_record(&config.status_path) {
        error!("{e:#}");
    }

    Ok(result)
}

fn rewrite_playlist(path: &Path, token: &Token) -> Result<RunOutcome> {
    let original = fs::read_to_string(path)
        .with_context(|| format!("Reading playlist {}", path.display()))?;

    let mut content = original.clone();
    let mut patterns_updated = 0;
    for rule in PATTERN_RULES.iter() {
        if !rule.is_present(&content) {
            continue;
        }
        content = rule.apply(&content, token).into_owned();
        patterns_updated += 1;
        info!("Updated {} format", rule.label);
    }

    if content == original {
        let reason = if patterns_updated == 0 {
            REASON_NO_PATTERNS
        } else {
            REASON_UP_TO_DATE
        };
        info!("{reason} in {}", path.display());
        return Ok(RunOutcome::NoChanges { reason });
    }

    fs::write(path, &content).with_context(|| format!("Writing playlist {}", path.display()))?;
    info!("Successfully updated {}!", path.display());
    info!("Total patterns updated: {patterns_updated}");

    Ok(RunOutcome::Success { patterns_updated })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternSighting {
    pub label: &'static str,
    pub occurrences: usize,
    /// First occurrence, truncated to [`EXAMPLE_MAX_CHARS`]
    pub example: String,
}

/// Which cookie formats a playlist currently contains
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternReport {
    pub sightings: Vec<PatternSighting>,
}

impl PatternReport {
    #[must_use]
    pub fn scan(content: &str) -> Self {
        let sightings = PATTERN_RULES
            .iter()
            .filter_map(|rule| {
                let (occurrences, first) = rule.sightings(content);
                first.map(|first| PatternSighting {
                    label: rule.label,
                    occurrences,
                    example: truncate_string(&first, EXAMPLE_MAX_CHARS),
                })
            })
            .collect();

        Self { sightings }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sightings.is_empty()
    }
}

impl fmt::Display for PatternReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Current cookie patterns found:")?;
        if self.is_empty() {
            return writeln!(f, "   - No recognizable cookie patterns found");
        }
        for sighting in &self.sightings {
            writeln!(
                f,
                "   - {}: {} occurrence(s)",
                sighting.label, sighting.occurrences
            )?;
            writeln!(f, "     Example: {}", sighting.example)?;
        }
        Ok(())
    }
}

/// Read-only diagnostic of the cookie formats present in `path`.
///
/// Returns `None` without a word when the file does not exist, and with a warning when it cannot be read.
#[instrument]
pub fn describe_patterns(path: &Path) -> Option<PatternReport> {
    if !path.exists() {
        debug!("Nothing to describe, playlist does not exist");
        return None;
    }

    match fs::read_to_string(path) {
        Ok(content) => Some(PatternReport::scan(&content)),
        Err(e) => {
            warn!("Error reading file: {e}");
            None
        }
    }
}
