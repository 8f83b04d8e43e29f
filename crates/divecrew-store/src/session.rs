//! Scheduling session: the cycle resolution workflow against live
//! collaborators.
//!
//! A session owns the crew directory, the schedule store, the roster
//! snapshot and every week loaded so far. Edits go to the in-memory weeks
//! and are marked dirty until [`SchedulingSession::save_all`] writes them
//! back, one atomic replace per week.
//!
//! An assignment that lands on an overdue crew member who was on duty the
//! week before does not complete in one call. [`SchedulingSession::assign`]
//! returns [`AssignOutcome::NeedsConfirmation`] with a [`ResetPrompt`];
//! the caller shows it to a human and resumes with
//! [`SchedulingSession::confirm`]. Other weeks can be loaded and edited in
//! between.
//!
//! Cycle resets write the crew member's new cycle start to the directory
//! *before* anything is recorded. If that write fails the operation fails
//! and the week is left exactly as it was. Once it succeeds the roster is
//! patched from the written record, so a failed re-read afterwards cannot
//! leave the roster behind the directory.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use divecrew_logic::calendar::{week_anchor, weeks_in_range, WeekAnchor};
use divecrew_logic::constants::{Boat, Position};
use divecrew_logic::crew::{CrewId, CrewMember, Roster};
use divecrew_logic::export::{self, PrintRow};
use divecrew_logic::resolution::{
    reset_assignment, resolve, ResetDecision, ResetPrompt, Resolution,
};
use divecrew_logic::rules::{
    eligible_candidates, propose_assignment, propose_reset, Proposal, ProposedAssignment,
};
use divecrew_logic::schedule::{Assignment, SlotKey, WeekSchedule};
use divecrew_logic::ScheduleError;

use crate::directory::CrewDirectory;
use crate::error::SessionError;
use crate::schedule_store::ScheduleStore;

/// Result of [`SchedulingSession::assign`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignOutcome {
    /// The slot was cleared; carries what it held.
    Removed(Option<Assignment>),
    /// The assignment is in the week, after any automatic reset.
    Recorded {
        assignment: Assignment,
        resolution: Resolution,
    },
    /// Nothing recorded yet; resume with [`SchedulingSession::confirm`].
    NeedsConfirmation(ResetPrompt),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekPanel {
    pub week: WeekAnchor,
    pub schedule: WeekSchedule,
}

/// The three weeks shown side by side around a viewed date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekPanels {
    pub previous: WeekPanel,
    pub current: WeekPanel,
    pub next: WeekPanel,
}

pub struct SchedulingSession<D, S> {
    directory: D,
    store: S,
    roster: Roster,
    weeks: BTreeMap<WeekAnchor, WeekSchedule>,
    dirty: BTreeSet<WeekAnchor>,
    current_week: WeekAnchor,
    lock_past_weeks: bool,
}

impl<D: CrewDirectory, S: ScheduleStore> SchedulingSession<D, S> {
    /// Start a session as of `today`, loading the roster.
    pub fn open(directory: D, store: S, today: NaiveDate) -> Result<Self, SessionError> {
        let roster = Roster::new(directory.list()?);
        log::info!("session opened for week {} with {} crew", week_anchor(today), roster.len());
        Ok(Self {
            directory,
            store,
            roster,
            weeks: BTreeMap::new(),
            dirty: BTreeSet::new(),
            current_week: week_anchor(today),
            lock_past_weeks: false,
        })
    }

    /// Refuse edits to weeks before the current week.
    pub fn with_past_week_lock(mut self, lock: bool) -> Self {
        self.lock_past_weeks = lock;
        self
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn current_week(&self) -> WeekAnchor {
        self.current_week
    }

    /// Hand back the collaborators. Unsaved edits are dropped.
    pub fn into_parts(self) -> (D, S) {
        if !self.dirty.is_empty() {
            log::warn!("closing session with {} unsaved weeks", self.dirty.len());
        }
        (self.directory, self.store)
    }

    /// Re-read the active crew from the directory.
    pub fn refresh_roster(&mut self) -> Result<(), SessionError> {
        self.roster = Roster::new(self.directory.list()?);
        Ok(())
    }

    /// The session's copy of `week`, fetched from the store on first use.
    pub fn load_week(&mut self, week: WeekAnchor) -> Result<&WeekSchedule, SessionError> {
        let schedule = match self.weeks.entry(week) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => e.insert(self.store.get_week(week)?),
        };
        Ok(schedule)
    }

    /// Previous, current and next week around the week containing `date`.
    pub fn load_panels(&mut self, date: NaiveDate) -> Result<WeekPanels, SessionError> {
        let current = week_anchor(date);
        let mut panel = |week: WeekAnchor| -> Result<WeekPanel, SessionError> {
            Ok(WeekPanel {
                week,
                schedule: self.load_week(week)?.clone(),
            })
        };
        Ok(WeekPanels {
            previous: panel(current.previous())?,
            current: panel(current)?,
            next: panel(current.next())?,
        })
    }

    /// Loaded copy of `week`, if any.
    pub fn week(&self, week: WeekAnchor) -> Option<&WeekSchedule> {
        self.weeks.get(&week)
    }

    pub fn is_dirty(&self, week: WeekAnchor) -> bool {
        self.dirty.contains(&week)
    }

    /// Crew that may be offered for (boat, position) in `week`.
    pub fn candidates(
        &mut self,
        week: WeekAnchor,
        boat: Boat,
        position: Position,
    ) -> Result<Vec<CrewMember>, SessionError> {
        let schedule = self.load_week(week)?.clone();
        Ok(eligible_candidates(&self.roster, week, &schedule, boat, position)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Put `crew_id` in (boat, position) for `week`, or clear the slot
    /// when `crew_id` is `None`.
    pub fn assign(
        &mut self,
        week: WeekAnchor,
        boat: Boat,
        position: Position,
        crew_id: Option<CrewId>,
    ) -> Result<AssignOutcome, SessionError> {
        self.check_editable(week)?;
        let proposed = match self.propose(week, boat, position, crew_id)? {
            Proposal::Unassign(slot) => {
                let removed = self.edit_week(week).remove(slot.boat, slot.position);
                return Ok(AssignOutcome::Removed(removed));
            }
            Proposal::Assign(p) => p,
        };

        let resolution = resolve(&proposed);
        log::debug!(
            "{} week {}/{} in {}: {:?}",
            proposed.crew.display_name(),
            proposed.cycle.week_in_cycle,
            proposed.crew.cycle_length_weeks,
            week,
            resolution
        );
        let assignment = match resolution {
            Resolution::Normal => self.record(&proposed, proposed.as_computed()),
            Resolution::AutoReset => self.reset_and_record(&proposed)?,
            Resolution::PendingConfirmation => {
                return Ok(AssignOutcome::NeedsConfirmation(ResetPrompt::from_proposal(&proposed)));
            }
        };
        Ok(AssignOutcome::Recorded {
            assignment,
            resolution,
        })
    }

    /// Resume an assignment suspended on a [`ResetPrompt`].
    ///
    /// The rules run again against the week as it is now, so a prompt
    /// answered after other edits can never double-book.
    pub fn confirm(
        &mut self,
        prompt: &ResetPrompt,
        decision: ResetDecision,
    ) -> Result<Assignment, SessionError> {
        self.check_editable(prompt.week)?;
        let proposed = self.propose_crew(prompt.week, prompt.slot(), prompt.crew_id)?;
        match decision {
            ResetDecision::Reset => self.reset_and_record(&proposed),
            ResetDecision::KeepAsIs => {
                log::info!(
                    "kept {} overdue at week {} of {}",
                    proposed.crew.display_name(),
                    proposed.week_in_cycle(),
                    proposed.crew.cycle_length_weeks
                );
                Ok(self.record(&proposed, proposed.as_computed()))
            }
        }
    }

    /// Restart the cycle of whoever holds (boat, position) in `week`.
    ///
    /// The holder is not re-checked for eligibility: the reset applies even
    /// when a later reset has moved their cycle start past `week`.
    pub fn reset_cycle(
        &mut self,
        week: WeekAnchor,
        boat: Boat,
        position: Position,
    ) -> Result<Assignment, SessionError> {
        self.check_editable(week)?;
        let holder = self
            .load_week(week)?
            .get(boat, position)
            .map(|a| a.crew_id)
            .ok_or(ScheduleError::SlotEmpty {
                week,
                boat,
                position,
            })?;
        let previous = self.load_week(week.previous())?.clone();
        let slot = SlotKey { boat, position };
        let proposed = propose_reset(&self.roster, week, &previous, slot, holder)?;
        self.reset_and_record(&proposed)
    }

    /// Write every edited week back to the store.
    ///
    /// Returns how many weeks were written. Weeks that fail stay dirty and
    /// the first failure is returned after every week has been tried.
    pub fn save_all(&mut self) -> Result<usize, SessionError> {
        let pending: Vec<WeekAnchor> = self.dirty.iter().copied().collect();
        let mut saved = 0;
        let mut failure = None;

        for week in pending {
            let schedule = self.weeks.get(&week).cloned().unwrap_or_default();
            match self.store.replace_week(week, &schedule) {
                Ok(()) => {
                    self.dirty.remove(&week);
                    saved += 1;
                }
                Err(e) => {
                    log::warn!("failed to save week {}: {}", week, e);
                    failure.get_or_insert(e);
                }
            }
        }

        match failure {
            Some(e) => Err(SessionError::PersistenceFailure(e)),
            None => {
                log::info!("saved {} weeks", saved);
                Ok(saved)
            }
        }
    }

    /// Printable rows for every stored week from `start` to `end`.
    /// Reads the store, so unsaved edits are not included.
    pub fn print_rows(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PrintRow>, SessionError> {
        let weeks = weeks_in_range(start, end)
            .into_iter()
            .map(|w| -> Result<_, SessionError> { Ok((w, self.store.get_week(w)?)) })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(export::print_rows(weeks.iter().map(|(w, s)| (*w, s))))
    }

    // ── Workflow steps ───────────────────────────────────────────────

    fn check_editable(&self, week: WeekAnchor) -> Result<(), ScheduleError> {
        if self.lock_past_weeks && week < self.current_week {
            return Err(ScheduleError::PastWeekLocked {
                week,
                current: self.current_week,
            });
        }
        Ok(())
    }

    fn propose(
        &mut self,
        week: WeekAnchor,
        boat: Boat,
        position: Position,
        crew_id: Option<CrewId>,
    ) -> Result<Proposal, SessionError> {
        let current = self.load_week(week)?.clone();
        let previous = self.load_week(week.previous())?.clone();
        propose_assignment(&self.roster, week, &current, &previous, boat, position, crew_id)
            .map_err(|e| {
                log::warn!("assignment rejected: {}", e);
                SessionError::Rejected(e)
            })
    }

    fn propose_crew(
        &mut self,
        week: WeekAnchor,
        slot: SlotKey,
        crew_id: CrewId,
    ) -> Result<ProposedAssignment, SessionError> {
        match self.propose(week, slot.boat, slot.position, Some(crew_id))? {
            Proposal::Assign(p) => Ok(p),
            // A crew id is always given here
            Proposal::Unassign(_) => Err(ScheduleError::UnknownCrew(crew_id).into()),
        }
    }

    /// Move the crew member's cycle start to the target week, then record
    /// week 1. Nothing is recorded unless the directory write succeeds.
    fn reset_and_record(
        &mut self,
        proposed: &ProposedAssignment,
    ) -> Result<Assignment, SessionError> {
        let mut crew = self.directory.get(proposed.crew.id).map_err(persistence_failure)?;
        crew.cycle_start = Some(proposed.week.date());
        let updated = self.directory.update(crew).map_err(persistence_failure)?;
        self.roster.upsert(updated);
        if let Err(e) = self.refresh_roster() {
            log::warn!("roster refresh after reset failed, keeping the written record: {}", e);
        }
        log::info!(
            "reset cycle for {}: week 1 of {} starts {}",
            proposed.crew.display_name(),
            proposed.crew.cycle_length_weeks,
            proposed.week
        );
        Ok(self.record(proposed, reset_assignment(proposed)))
    }

    fn record(&mut self, proposed: &ProposedAssignment, assignment: Assignment) -> Assignment {
        let slot = proposed.slot;
        self.edit_week(proposed.week)
            .set(slot.boat, slot.position, assignment.clone());
        assignment
    }

    fn edit_week(&mut self, week: WeekAnchor) -> &mut WeekSchedule {
        self.dirty.insert(week);
        self.weeks.entry(week).or_default()
    }
}

fn persistence_failure(e: crate::error::StoreError) -> SessionError {
    log::warn!("cycle reset aborted: {}", e);
    SessionError::PersistenceFailure(e)
}
