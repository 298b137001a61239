//! Practice sets: a run of randomly chosen molecules with bookkeeping.
//!
//! A [`PracticeSet`] draws molecules from a catalog without replacement
//! and drives one [`BuildSession`] at a time. It counts attempts, tallies
//! the kinds of mistakes made (even when hints are off), and produces a
//! [`PracticeSummary`] at the end.
//!
//! Practice skips the counting and central-atom steps: each session starts
//! with the electron count confirmed and the designated central atom
//! locked, so the learner goes straight to building.

use std::fmt;
use std::time::Duration;

use log::{debug, info};
use thiserror::Error;

use crate::build::{
    BuildSession, CheckReport, CoachConfig, ElectronCount, Error as BuildError, Phase,
};
use crate::catalog::Catalog;
use crate::model::molecule::{CentralChoice, Molecule};
use crate::rng::Picker;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PracticeError {
    #[error(
        "a practice set needs at least one molecule (catalog has {available}, requested {requested})"
    )]
    EmptySet { available: usize, requested: usize },
}

/// Kinds of mistakes counted across a practice set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorTally {
    ElectronCount,
    BondingPattern,
    LonePairs,
    /// A placement refused because the bank could not cover it.
    Overspent,
}

impl ErrorTally {
    pub const ALL: [ErrorTally; 4] = [
        ErrorTally::ElectronCount,
        ErrorTally::BondingPattern,
        ErrorTally::LonePairs,
        ErrorTally::Overspent,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ErrorTally::ElectronCount => "Electron count issue",
            ErrorTally::BondingPattern => "Bonding pattern issue",
            ErrorTally::LonePairs => "Lone-pair issue",
            ErrorTally::Overspent => "Overspent electrons",
        }
    }
}

impl fmt::Display for ErrorTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone)]
pub struct PracticeOptions {
    /// Requested number of molecules; clamped to the catalog size.
    pub size: usize,
    pub seed: u64,
    pub config: CoachConfig,
}

impl Default for PracticeOptions {
    fn default() -> Self {
        Self {
            size: 5,
            seed: 0,
            config: CoachConfig::default(),
        }
    }
}

/// Per-molecule results, in set order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoleculeRecord {
    pub attempts: u32,
    pub solved: bool,
    pub time: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PracticeSummary {
    pub correct: usize,
    pub total: usize,
    pub attempts: u32,
    /// The most frequent mistake and its count; ties go to the kind listed
    /// first in [`ErrorTally::ALL`]. `None` when no mistake was recorded.
    pub most_common_error: Option<(ErrorTally, u32)>,
    /// Mean of the recorded times, over molecules that have one. Solved
    /// and skipped molecules are timed; time after a reveal is not.
    pub average_time: Option<Duration>,
}

#[derive(Debug)]
pub struct PracticeSet<'c> {
    molecules: Vec<&'c Molecule>,
    config: CoachConfig,
    index: usize,
    session: BuildSession<'c>,
    records: Vec<MoleculeRecord>,
    tallies: [u32; 4],
    attempts: u32,
    finished: bool,
}

fn start_session<'c>(molecule: &'c Molecule, config: &CoachConfig) -> BuildSession<'c> {
    let mut session = BuildSession::new(molecule, config.clone());
    // The true count and the designated central always pass both gates.
    match session.confirm_electron_count(molecule.total_valence_electrons()) {
        Ok(ElectronCount::Correct) => {}
        other => debug!("{}: electron count not confirmed: {other:?}", molecule.formula()),
    }
    if session.phase() == Phase::ElectronCountConfirmed {
        let choice = molecule
            .central()
            .primary()
            .map_or(CentralChoice::None, CentralChoice::Atom);
        if let Err(e) = session.lock_central(choice) {
            debug!("{}: central atom not locked: {e}", molecule.formula());
        }
    }
    debug_assert!(
        session.phase() == Phase::CentralAtomLocked,
        "practice session for {} did not reach the build step",
        molecule.formula()
    );
    session
}

impl<'c> PracticeSet<'c> {
    pub fn new(catalog: &'c Catalog, options: PracticeOptions) -> Result<Self, PracticeError> {
        let mut picker = Picker::from_seed_u64(options.seed);
        let molecules: Vec<&Molecule> = picker
            .sample_indices(catalog.len(), options.size)
            .into_iter()
            .map(|i| &catalog.molecules()[i])
            .collect();
        let Some(&first) = molecules.first() else {
            return Err(PracticeError::EmptySet {
                available: catalog.len(),
                requested: options.size,
            });
        };

        debug!(
            "practice set of {} molecules (seed {})",
            molecules.len(),
            options.seed
        );
        let session = start_session(first, &options.config);
        Ok(Self {
            records: vec![MoleculeRecord::default(); molecules.len()],
            molecules,
            config: options.config,
            index: 0,
            session,
            tallies: [0; 4],
            attempts: 0,
            finished: false,
        })
    }

    pub fn current(&self) -> &'c Molecule {
        self.molecules[self.index]
    }

    /// Zero-based index of the current molecule and the set size.
    pub fn position(&self) -> (usize, usize) {
        (self.index, self.molecules.len())
    }

    pub fn molecules(&self) -> &[&'c Molecule] {
        &self.molecules
    }

    pub fn records(&self) -> &[MoleculeRecord] {
        &self.records
    }

    pub fn session(&self) -> &BuildSession<'c> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut BuildSession<'c> {
        &mut self.session
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn tally(&self, kind: ErrorTally) -> u32 {
        self.tallies[kind as usize]
    }

    fn bump(&mut self, kind: ErrorTally) {
        self.tallies[kind as usize] += 1;
    }

    /// Checks the current structure and records the attempt.
    ///
    /// Mistake categories are tallied from the verdict itself, so they are
    /// counted even when hints are disabled. A correct check marks the
    /// molecule solved unless the answer was revealed. `elapsed` is the
    /// caller's measured time on the molecule so far; the latest value
    /// supplied before the molecule is solved is kept as its time. Once the
    /// answer has been revealed the time is no longer updated.
    pub fn check(&mut self, elapsed: Option<Duration>) -> Result<CheckReport, BuildError> {
        let report = self.session.check()?;
        self.attempts += 1;

        let verdict = &report.verdict;
        let mut mistakes = Vec::new();
        if !verdict.bank_empty() {
            mistakes.push(ErrorTally::ElectronCount);
        }
        if !verdict.bond_mismatches.is_empty() {
            mistakes.push(ErrorTally::BondingPattern);
        }
        if !verdict.lone_pair_mismatches.is_empty() {
            mistakes.push(ErrorTally::LonePairs);
        }
        for kind in mistakes {
            self.bump(kind);
        }

        let revealed = self.session.answer_revealed();
        let record = &mut self.records[self.index];
        record.attempts += 1;
        if elapsed.is_some() && !record.solved && !revealed {
            record.time = elapsed;
        }
        if verdict.is_correct() && !revealed {
            record.solved = true;
        }
        Ok(report)
    }

    /// Records a refused placement. Only bank refusals are tallied.
    pub fn record_refusal(&mut self, error: &BuildError) {
        if matches!(error, BuildError::InsufficientElectrons { .. }) {
            self.bump(ErrorTally::Overspent);
        }
    }

    /// Moves to the next molecule, or finishes the set after the last one.
    ///
    /// A molecule left unsolved keeps `elapsed` as its time, so skipped
    /// molecules still count toward the average. Solved molecules keep the
    /// time of their solving check, and a revealed molecule keeps the time it
    /// had before the reveal.
    pub fn advance(&mut self, elapsed: Option<Duration>) -> Option<&'c Molecule> {
        if self.finished {
            return None;
        }
        let revealed = self.session.answer_revealed();
        let record = &mut self.records[self.index];
        if elapsed.is_some() && !record.solved && !revealed {
            debug!(
                "{} left unsolved after {:?}",
                self.molecules[self.index].formula(),
                elapsed.unwrap_or_default()
            );
            record.time = elapsed;
        }
        if self.index + 1 >= self.molecules.len() {
            self.finished = true;
            let s = self.summary();
            info!(
                "practice set finished: {}/{} correct in {} attempts",
                s.correct, s.total, s.attempts
            );
            return None;
        }
        self.index += 1;
        let molecule = self.molecules[self.index];
        self.session = start_session(molecule, &self.config);
        Some(molecule)
    }

    pub fn summary(&self) -> PracticeSummary {
        let most_common_error = ErrorTally::ALL
            .iter()
            .map(|&k| (k, self.tally(k)))
            .fold(None, |best: Option<(ErrorTally, u32)>, (k, n)| match best {
                Some((_, m)) if m >= n => best,
                _ if n == 0 => best,
                _ => Some((k, n)),
            });

        let times: Vec<Duration> = self
            .records
            .iter()
            .filter_map(|r| r.time)
            .filter(|t| !t.is_zero())
            .collect();
        let average_time = (!times.is_empty())
            .then(|| times.iter().sum::<Duration>() / times.len() as u32);

        PracticeSummary {
            correct: self.records.iter().filter(|r| r.solved).count(),
            total: self.molecules.len(),
            attempts: self.attempts,
            most_common_error,
            average_time,
        }
    }
}
