//! Per-(micrograph, family) picking record and its state machine.
//!
//! # Responsibility
//! - Own the manual and automatic particle lists of one pair.
//! - Drive the pair lifecycle (`Available -> Manual | Correct -> ...`).
//! - Keep the owning family's counters in step with list mutations.
//! - Answer the predicates the shell uses to enable picking and actions.
//!
//! # Invariants
//! - Every successful add increments exactly one family counter; every
//!   successful removal request decrements exactly one.
//! - A particle id appears at most once across both lists.
//! - Automatic particles are never removed by `remove_particle`, only flagged.
//! - Core operations never store `MicrographFamilyState::Autopick`.
//! - A failed operation leaves the record and the family untouched.
//!
//! # See also
//! - `crate::service::picking_session` for family-wide reset and recount.

use crate::config::PickerConfig;
use crate::error::{empty_field_msg, PickerError, PickerResult};
use crate::model::family::SharedFamily;
use crate::model::micrograph::{Micrograph, SharedMicrograph};
use crate::model::particle::{AutomaticParticle, Particle, ParticleId};
use crate::model::state::{FamilyState, MicrographFamilyState};
use log::{debug, warn};
use std::path::PathBuf;

/// Picking record for one micrograph under one family.
#[derive(Debug)]
pub struct MicrographFamilyData {
    micrograph: SharedMicrograph,
    family: SharedFamily,
    particles: Vec<Particle>,
    autoparticles: Vec<AutomaticParticle>,
    state: MicrographFamilyState,
}

impl MicrographFamilyData {
    /// Creates an empty record in state `Available`.
    pub fn new(micrograph: SharedMicrograph, family: SharedFamily) -> Self {
        Self {
            micrograph,
            family,
            particles: Vec::new(),
            autoparticles: Vec::new(),
            state: MicrographFamilyState::Available,
        }
    }

    /// Creates an empty record with a persisted state.
    ///
    /// The state is trusted; this is the rehydration path for saved projects.
    pub fn with_state(
        micrograph: SharedMicrograph,
        family: SharedFamily,
        state: MicrographFamilyState,
    ) -> Self {
        let mut record = Self::new(micrograph, family);
        record.state = state;
        record
    }

    pub fn state(&self) -> MicrographFamilyState {
        self.state
    }

    /// Overwrites the state without any transition checks.
    pub fn set_state(&mut self, state: MicrographFamilyState) {
        self.state = state;
    }

    pub fn micrograph(&self) -> &Micrograph {
        &self.micrograph
    }

    pub fn family(&self) -> &SharedFamily {
        &self.family
    }

    /// Manual picks in insertion order.
    pub fn manual_particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Automatic picks in insertion order, soft-deleted entries included.
    pub fn automatic_particles(&self) -> &[AutomaticParticle] {
        &self.autoparticles
    }

    /// Number of automatic picks not flagged as deleted.
    pub fn automatic_particles_count(&self) -> usize {
        self.autoparticles
            .iter()
            .filter(|particle| particle.is_live())
            .count()
    }

    pub fn has_manual_particles(&self) -> bool {
        !self.particles.is_empty()
    }

    /// Counts soft-deleted entries too.
    pub fn has_automatic_particles(&self) -> bool {
        !self.autoparticles.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty() && self.autoparticles.is_empty()
    }

    /// Workflow step this record has reached, as seen by the shell.
    pub fn step(&self) -> FamilyState {
        match self.state {
            MicrographFamilyState::Manual => FamilyState::Manual,
            MicrographFamilyState::Available => FamilyState::Available,
            _ => FamilyState::Supervised,
        }
    }

    /// Appends a manual pick and bumps `family.particles`.
    ///
    /// # Contract
    /// - From `Available`, moves to `Manual` under a manual family step and
    ///   to `Correct` under a supervised one; otherwise the state is kept.
    /// - Never fails. Callers are expected to consult
    ///   `is_picking_available` first; this method does not enforce it.
    /// - A particle whose id is already held by either list is ignored, so
    ///   neither the lists nor the counters change.
    pub fn add_manual_particle(&mut self, particle: Particle) {
        if self.holds(particle.id) {
            warn!(
                "event=duplicate_particle_ignored module=picking micrograph={} family={} particle={}",
                self.micrograph.name(),
                self.family.borrow().name(),
                particle.id
            );
            return;
        }
        if !self.is_picking_available() {
            debug!(
                "event=manual_pick_unchecked module=picking micrograph={} family={} state={}",
                self.micrograph.name(),
                self.family.borrow().name(),
                self.state
            );
        }

        debug!(
            "event=particle_added module=picking kind=manual micrograph={} particle={}",
            self.micrograph.name(),
            particle.id
        );
        self.particles.push(particle);
        let step = {
            let mut family = self.family.borrow_mut();
            family.increment_particles();
            family.step()
        };

        if self.state == MicrographFamilyState::Available {
            match step {
                FamilyState::Manual => self.transition(MicrographFamilyState::Manual),
                FamilyState::Supervised => self.transition(MicrographFamilyState::Correct),
                FamilyState::Available => {}
            }
        }
    }

    /// Appends an auto-picker candidate and bumps `family.autoparticles`.
    ///
    /// # Errors
    /// - `InvalidState` while the record is `Available`; automatic picks need
    ///   the auto-picker flow to have moved the record out of it first.
    /// - `InvalidArgument` when the id is already held by either list.
    pub fn add_automatic_particle(&mut self, particle: AutomaticParticle) -> PickerResult<()> {
        if self.state == MicrographFamilyState::Available {
            let family = self.family.borrow().name().to_string();
            warn!(
                "event=auto_pick_rejected module=picking status=error micrograph={} family={} state={}",
                self.micrograph.name(),
                family,
                self.state
            );
            return Err(PickerError::InvalidState {
                state: self.state,
                micrograph: self.micrograph.name().to_string(),
                family,
            });
        }

        if self.holds(particle.id()) {
            return Err(PickerError::InvalidArgument(format!(
                "particle {} is already picked on micrograph {}",
                particle.id(),
                self.micrograph.name()
            )));
        }

        debug!(
            "event=particle_added module=picking kind=automatic micrograph={} particle={} cost={}",
            self.micrograph.name(),
            particle.id(),
            particle.cost
        );
        self.autoparticles.push(particle);
        self.family.borrow_mut().increment_autoparticles();
        Ok(())
    }

    /// Removes a manual pick or soft-deletes an automatic one.
    ///
    /// # Contract
    /// - Manual: the particle leaves the list and `family.particles` drops.
    ///   When no manual pick and no live automatic pick remain, the record
    ///   returns to `Available`.
    /// - Automatic: the entry is flagged deleted and stays in the list;
    ///   `family.autoparticles` drops. The state is never changed here.
    /// - Deleting an already deleted automatic pick decrements the counter
    ///   again.
    ///
    /// # Errors
    /// - `InvalidArgument` for a nil id.
    /// - `InvalidArgument` for an id held by neither list. This is stricter
    ///   than the legacy picker, which decremented `family.particles` for an
    ///   unknown particle; failing here keeps the counters equal to the lists.
    pub fn remove_particle(&mut self, id: ParticleId) -> PickerResult<()> {
        if id.is_nil() {
            return Err(PickerError::InvalidArgument(empty_field_msg("particle")));
        }

        if let Some(index) = self.particles.iter().position(|particle| particle.id == id) {
            self.particles.remove(index);
            self.family.borrow_mut().decrement_particles();
            debug!(
                "event=particle_removed module=picking kind=manual micrograph={} particle={}",
                self.micrograph.name(),
                id
            );
            if self.particles.is_empty() && self.automatic_particles_count() == 0 {
                self.transition(MicrographFamilyState::Available);
            }
            return Ok(());
        }

        let Some(candidate) = self
            .autoparticles
            .iter_mut()
            .find(|particle| particle.id() == id)
        else {
            let family = self.family.borrow();
            warn!(
                "event=remove_unknown_particle module=picking status=error micrograph={} family={}",
                self.micrograph.name(),
                family.name()
            );
            return Err(PickerError::InvalidArgument(format!(
                "particle {id} is not picked on micrograph {} for family {}",
                self.micrograph.name(),
                family.name()
            )));
        };

        if candidate.deleted {
            warn!(
                "event=auto_particle_redeleted module=picking micrograph={} particle={}",
                self.micrograph.name(),
                id
            );
        }
        candidate.soft_delete();
        self.family.borrow_mut().decrement_autoparticles();
        debug!(
            "event=particle_removed module=picking kind=automatic micrograph={} particle={}",
            self.micrograph.name(),
            id
        );
        Ok(())
    }

    /// Empties both lists and returns the record to `Available`.
    ///
    /// # Precondition
    /// Family counters are NOT adjusted. After this call the family still
    /// counts the cleared particles; callers must discard the family with
    /// its records or rebuild its counters, e.g. via
    /// `FamilyPickingSession::reset_all`.
    pub fn reset(&mut self) {
        self.transition(MicrographFamilyState::Available);
        self.autoparticles.clear();
        self.particles.clear();
    }

    /// Whether the user may add a manual pick now.
    pub fn is_picking_available(&self) -> bool {
        match self.family.borrow().step() {
            FamilyState::Supervised => self.state == MicrographFamilyState::Correct,
            FamilyState::Manual => matches!(
                self.state,
                MicrographFamilyState::Available | MicrographFamilyState::Manual
            ),
            FamilyState::Available => false,
        }
    }

    /// Whether the shell should offer the auto-pick action button.
    pub fn is_action_available(&self) -> bool {
        match self.family.borrow().step() {
            FamilyState::Supervised => !matches!(
                self.state,
                MicrographFamilyState::Manual | MicrographFamilyState::ReadOnly
            ),
            FamilyState::Manual | FamilyState::Available => false,
        }
    }

    /// Label of the offered action; `None` hides the control.
    pub fn action(&self) -> Option<&'static str> {
        match self.state {
            MicrographFamilyState::Manual => None,
            MicrographFamilyState::Available => Some(MicrographFamilyState::Autopick.as_label()),
            state => Some(state.as_label()),
        }
    }

    /// Output path of the auto-picker training feature vectors for this pair.
    ///
    /// Layout: `<micrograph>_<generic>_<family>.txt` under the output dir.
    pub fn training_auto_features_vector_filename(&self, config: &PickerConfig) -> PathBuf {
        config.output_path(&format!(
            "{}_{}_{}.txt",
            self.micrograph.name(),
            config.training_auto_feature_vectors_generic(),
            self.family.borrow().name()
        ))
    }

    fn holds(&self, id: ParticleId) -> bool {
        self.particles.iter().any(|particle| particle.id == id)
            || self.autoparticles.iter().any(|particle| particle.id() == id)
    }

    fn transition(&mut self, next: MicrographFamilyState) {
        if self.state != next {
            debug!(
                "event=state_transition module=picking micrograph={} family={} from={} to={}",
                self.micrograph.name(),
                self.family.borrow().name(),
                self.state,
                next
            );
        }
        self.state = next;
    }
}
