use std::fmt;

use log::{debug, info};

use super::coach::Coach;
use super::config::{CentralPolicy, CoachConfig};
use super::error::Error;
use super::feedback::{Feedback, classify};
use super::ledger::ElectronLedger;
use super::placement::{PlacementStore, SlotId};
use super::validate::{CentralCheck, Verdict, check_central, validate};
use crate::model::molecule::{CentralAtom, CentralChoice, Molecule};
use crate::model::types::BondOrder;

/// Steps of one molecule attempt, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    AwaitingElectronCount,
    ElectronCountConfirmed,
    CentralAtomLocked,
    Building,
    /// Terminal: a check found the structure correct.
    Solved,
}

impl Phase {
    fn allows_placement(self) -> bool {
        matches!(self, Phase::CentralAtomLocked | Phase::Building)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::AwaitingElectronCount => "awaiting the electron count",
            Phase::ElectronCountConfirmed => "choosing the central atom",
            Phase::CentralAtomLocked => "starting to build",
            Phase::Building => "building",
            Phase::Solved => "the molecule is solved",
        };
        f.write_str(s)
    }
}

/// Outcome of an electron-count guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElectronCount {
    Correct,
    TooLow,
    TooHigh,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub verdict: Verdict,
    pub feedback: Feedback,
}

/// State of one learner's attempt at one molecule.
///
/// The session owns the placement store and the electron bank and keeps
/// them in sync. Every refused operation leaves the session unchanged.
///
/// # Examples
///
/// ```
/// use lewis_coach::{BondOrder, BuildSession, Catalog, CentralChoice, CoachConfig, ElectronCount};
///
/// let water = Catalog::builtin().get("H2O").unwrap();
/// let mut session = BuildSession::new(water, CoachConfig::default());
///
/// assert_eq!(session.confirm_electron_count(6)?, ElectronCount::TooLow);
/// assert_eq!(session.confirm_electron_count(8)?, ElectronCount::Correct);
/// session.lock_central(CentralChoice::Atom(0))?;
///
/// session.place_bond(0, 1, BondOrder::Single)?;
/// session.place_bond(2, 0, BondOrder::Single)?;
/// session.place_lone_pair(0, "a")?;
/// assert_eq!(session.place_lone_pair(0, "b")?, 0);
///
/// assert!(session.check()?.feedback.is_correct());
/// # Ok::<(), lewis_coach::BuildError>(())
/// ```
#[derive(Debug, Clone)]
pub struct BuildSession<'m> {
    molecule: &'m Molecule,
    config: CoachConfig,
    phase: Phase,
    ledger: Option<ElectronLedger>,
    store: PlacementStore,
    chosen_central: Option<CentralChoice>,
    answer_revealed: bool,
}

impl<'m> BuildSession<'m> {
    pub fn new(molecule: &'m Molecule, config: CoachConfig) -> Self {
        debug!("new build session for {}", molecule.formula());
        Self {
            molecule,
            config,
            phase: Phase::AwaitingElectronCount,
            ledger: None,
            store: PlacementStore::new(),
            chosen_central: None,
            answer_revealed: false,
        }
    }

    #[inline]
    pub fn molecule(&self) -> &'m Molecule {
        self.molecule
    }

    #[inline]
    pub fn config(&self) -> &CoachConfig {
        &self.config
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn total_valence_electrons(&self) -> u32 {
        self.molecule.total_valence_electrons()
    }

    /// Set once the electron count is confirmed.
    pub fn bank_total(&self) -> Option<u32> {
        self.ledger.map(|l| l.total())
    }

    pub fn bank_remaining(&self) -> Option<u32> {
        self.ledger.map(|l| l.remaining())
    }

    #[inline]
    pub fn placements(&self) -> &PlacementStore {
        &self.store
    }

    #[inline]
    pub fn chosen_central(&self) -> Option<CentralChoice> {
        self.chosen_central
    }

    #[inline]
    pub fn answer_revealed(&self) -> bool {
        self.answer_revealed
    }

    #[inline]
    pub fn is_solved(&self) -> bool {
        self.phase == Phase::Solved
    }

    pub fn coach(&self) -> Coach<'_> {
        Coach::new(
            self.molecule,
            &self.store,
            self.phase,
            self.chosen_central,
            self.bank_remaining().unwrap_or(0),
        )
    }

    fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            debug!(
                "{}: {:?} -> {:?}",
                self.molecule.formula(),
                self.phase,
                phase
            );
            self.phase = phase;
        }
    }

    /// Compares the learner's count with the molecule's total.
    ///
    /// A correct count opens the electron bank. For a diatomic molecule
    /// with `auto_lock_diatomic` set, the "no central atom" choice is
    /// locked at the same time.
    pub fn confirm_electron_count(&mut self, guess: u32) -> Result<ElectronCount, Error> {
        if self.phase != Phase::AwaitingElectronCount {
            return Err(Error::wrong_phase("confirm the electron count", self.phase));
        }
        let total = self.total_valence_electrons();
        let outcome = match guess.cmp(&total) {
            std::cmp::Ordering::Less => ElectronCount::TooLow,
            std::cmp::Ordering::Greater => ElectronCount::TooHigh,
            std::cmp::Ordering::Equal => ElectronCount::Correct,
        };
        if outcome != ElectronCount::Correct {
            debug!("electron count {guess} refused for {}", self.molecule.formula());
            return Ok(outcome);
        }

        self.ledger = Some(ElectronLedger::new(total));
        self.set_phase(Phase::ElectronCountConfirmed);
        if self.config.auto_lock_diatomic && self.molecule.central().is_none() {
            self.chosen_central = Some(CentralChoice::None);
            self.set_phase(Phase::CentralAtomLocked);
        }
        Ok(ElectronCount::Correct)
    }

    /// Atoms a learner may pick as central: every non-hydrogen atom.
    pub fn central_options(&self) -> Vec<usize> {
        self.molecule
            .atoms()
            .iter()
            .enumerate()
            .filter(|(_, el)| !el.is_hydrogen())
            .map(|(i, _)| i)
            .collect()
    }

    /// Locks the central-atom choice for the rest of the session.
    ///
    /// Under [`CentralPolicy::Strict`] an incorrect choice is refused and
    /// may be retried. Under [`CentralPolicy::Lenient`] it is kept and
    /// reported later as a central-atom hint.
    pub fn lock_central(&mut self, choice: CentralChoice) -> Result<CentralCheck, Error> {
        if self.phase != Phase::ElectronCountConfirmed {
            return Err(Error::wrong_phase("lock the central atom", self.phase));
        }
        if let CentralChoice::Atom(i) = choice {
            if i >= self.molecule.atom_count() {
                return Err(Error::invalid_atom(i, self.molecule.atom_count()));
            }
        }
        let check = check_central(self.molecule, Some(choice));
        if check == CentralCheck::Incorrect && self.config.central_policy == CentralPolicy::Strict
        {
            debug!("central choice {choice} refused for {}", self.molecule.formula());
            return Err(Error::WrongCentralAtom);
        }
        self.chosen_central = Some(choice);
        self.set_phase(Phase::CentralAtomLocked);
        Ok(check)
    }

    fn building(
        &mut self,
        action: &'static str,
    ) -> Result<(&mut PlacementStore, &mut ElectronLedger), Error> {
        if !self.phase.allows_placement() {
            return Err(Error::wrong_phase(action, self.phase));
        }
        match self.ledger.as_mut() {
            Some(ledger) => Ok((&mut self.store, ledger)),
            None => Err(Error::wrong_phase(action, self.phase)),
        }
    }

    fn after_mutation(&mut self) -> u32 {
        self.set_phase(Phase::Building);
        self.bank_remaining().unwrap_or(0)
    }

    /// Places or re-orders a bond. Returns the bank balance afterwards.
    pub fn place_bond(&mut self, a: usize, b: usize, order: BondOrder) -> Result<u32, Error> {
        let molecule = self.molecule;
        let (store, ledger) = self.building("place a bond")?;
        if let Err(e) = store.place_bond(ledger, molecule.atoms(), a, b, order) {
            debug!("bond {a}-{b} refused: {e}");
            return Err(e);
        }
        Ok(self.after_mutation())
    }

    /// Removes a bond if present. Returns the bank balance afterwards.
    pub fn remove_bond(&mut self, a: usize, b: usize) -> Result<u32, Error> {
        let (store, ledger) = self.building("remove a bond")?;
        store.remove_bond(ledger, a, b);
        Ok(self.after_mutation())
    }

    pub fn place_lone_pair(&mut self, atom: usize, slot: impl Into<SlotId>) -> Result<u32, Error> {
        let molecule = self.molecule;
        let (store, ledger) = self.building("place a lone pair")?;
        if let Err(e) = store.place_lone_pair(ledger, molecule.atoms(), atom, slot.into()) {
            debug!("lone pair on atom {atom} refused: {e}");
            return Err(e);
        }
        Ok(self.after_mutation())
    }

    pub fn remove_lone_pair(&mut self, atom: usize, slot: impl Into<SlotId>) -> Result<u32, Error> {
        let (store, ledger) = self.building("remove a lone pair")?;
        store.remove_lone_pair(ledger, atom, &slot.into());
        Ok(self.after_mutation())
    }

    /// Validates the current placements without changing them.
    ///
    /// A correct verdict moves the session to [`Phase::Solved`]. Checking
    /// a solved session reports the same result again.
    pub fn check(&mut self) -> Result<CheckReport, Error> {
        if !(self.phase.allows_placement() || self.phase == Phase::Solved) {
            return Err(Error::wrong_phase("check the structure", self.phase));
        }
        let Some(ledger) = self.ledger.as_ref() else {
            return Err(Error::wrong_phase("check the structure", self.phase));
        };

        let verdict = validate(self.molecule, &self.store, ledger, self.chosen_central);
        let mut feedback = classify(&verdict, self.config.hints);
        if self.config.molecule_tips {
            feedback = feedback.with_tip(self.molecule.tip());
        }

        if feedback.is_correct() && self.phase != Phase::Solved {
            info!(
                "{} solved{}",
                self.molecule.formula(),
                if self.answer_revealed {
                    " (answer was revealed)"
                } else {
                    ""
                }
            );
            self.set_phase(Phase::Solved);
        } else if !feedback.is_correct() {
            debug!(
                "{} checked: incorrect {:?}",
                self.molecule.formula(),
                feedback.hints()
            );
        }
        Ok(CheckReport { verdict, feedback })
    }

    /// Removes every placement and refills the bank. The electron count
    /// and the central atom stay locked.
    pub fn clear(&mut self) -> Result<(), Error> {
        let (store, ledger) = self.building("clear the structure")?;
        store.clear(ledger);
        self.set_phase(Phase::Building);
        Ok(())
    }

    /// Replaces the placements with the answer key.
    ///
    /// Steps not yet taken are completed on the learner's behalf: the bank
    /// is opened with the correct total, and the designated central atom
    /// (or "none" for diatomics) is locked. Lone pairs use the slot labels
    /// `"0"`, `"1"`, and so on. If the answer key cannot be laid out within
    /// the bank, the session is left as it was.
    pub fn show_answer(&mut self) -> Result<(), Error> {
        if self.phase == Phase::Solved {
            return Err(Error::wrong_phase("show the answer", self.phase));
        }
        let molecule = self.molecule;
        let mut ledger = ElectronLedger::new(
            self.bank_total()
                .unwrap_or_else(|| molecule.total_valence_electrons()),
        );
        let mut store = PlacementStore::new();
        for bond in molecule.expected_bonds() {
            store.place_bond(
                &mut ledger,
                molecule.atoms(),
                bond.pair.lo(),
                bond.pair.hi(),
                bond.order,
            )?;
        }
        for (&atom, &count) in molecule.expected_lone_pairs() {
            for slot in 0..count {
                store.place_lone_pair(
                    &mut ledger,
                    molecule.atoms(),
                    atom,
                    SlotId::new(slot.to_string()),
                )?;
            }
        }

        self.ledger = Some(ledger);
        self.store = store;
        if self.chosen_central.is_none() {
            self.chosen_central = Some(match molecule.central() {
                CentralAtom::None => CentralChoice::None,
                CentralAtom::Candidates(c) => c
                    .first()
                    .copied()
                    .map_or(CentralChoice::None, CentralChoice::Atom),
            });
        }
        self.answer_revealed = true;
        debug!("answer shown for {}", self.molecule.formula());
        self.set_phase(Phase::Building);
        Ok(())
    }
}
