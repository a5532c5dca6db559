//! Picking session for one family across many micrographs.
//!
//! # Responsibility
//! - Create and look up the per-micrograph records of a single family.
//! - Reset the whole family with its counters in one step.
//! - Audit family counters against the records' particle lists.
//!
//! # Invariants
//! - Every record in the session references the session family.
//! - At most one record exists per micrograph.
//! - After `reset_all` or `recount`, family counters match the lists.

use crate::error::{PickerError, PickerResult};
use crate::model::family::SharedFamily;
use crate::model::micrograph::{MicrographId, SharedMicrograph};
use crate::model::micrograph_family::MicrographFamilyData;
use crate::model::state::MicrographFamilyState;
use log::{info, warn};
use std::collections::BTreeMap;
use std::rc::Rc;

/// Family counters compared with what the records actually hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterAudit {
    pub recorded_particles: usize,
    pub recorded_autoparticles: usize,
    /// Sum of manual list lengths.
    pub expected_particles: usize,
    /// Sum of live (not soft-deleted) automatic entries.
    pub expected_autoparticles: usize,
}

impl CounterAudit {
    pub fn is_consistent(&self) -> bool {
        self.recorded_particles == self.expected_particles
            && self.recorded_autoparticles == self.expected_autoparticles
    }
}

pub struct FamilyPickingSession {
    family: SharedFamily,
    records: BTreeMap<MicrographId, MicrographFamilyData>,
}

impl FamilyPickingSession {
    pub fn new(family: SharedFamily) -> Self {
        Self {
            family,
            records: BTreeMap::new(),
        }
    }

    pub fn family(&self) -> &SharedFamily {
        &self.family
    }

    /// Returns the record for `micrograph`, creating an `Available` one.
    pub fn record_for(&mut self, micrograph: &SharedMicrograph) -> &mut MicrographFamilyData {
        let family = &self.family;
        self.records
            .entry(micrograph.id())
            .or_insert_with(|| MicrographFamilyData::new(Rc::clone(micrograph), Rc::clone(family)))
    }

    /// Registers a record rehydrated with a persisted state.
    ///
    /// # Errors
    /// - `InvalidArgument` when the micrograph already has a record.
    pub fn restore(
        &mut self,
        micrograph: &SharedMicrograph,
        state: MicrographFamilyState,
    ) -> PickerResult<&mut MicrographFamilyData> {
        if self.records.contains_key(&micrograph.id()) {
            return Err(PickerError::InvalidArgument(format!(
                "micrograph {} already has a record for family {}",
                micrograph.name(),
                self.family.borrow().name()
            )));
        }
        let record =
            MicrographFamilyData::with_state(Rc::clone(micrograph), Rc::clone(&self.family), state);
        Ok(self.records.entry(micrograph.id()).or_insert(record))
    }

    pub fn record(&self, micrograph: MicrographId) -> Option<&MicrographFamilyData> {
        self.records.get(&micrograph)
    }

    pub fn record_mut(&mut self, micrograph: MicrographId) -> Option<&mut MicrographFamilyData> {
        self.records.get_mut(&micrograph)
    }

    pub fn records(&self) -> impl Iterator<Item = &MicrographFamilyData> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Resets every record and zeroes the family counters.
    pub fn reset_all(&mut self) {
        for record in self.records.values_mut() {
            record.reset();
        }
        let mut family = self.family.borrow_mut();
        family.set_counters(0, 0);
        info!(
            "event=family_reset module=session status=ok family={} records={}",
            family.name(),
            self.records.len()
        );
    }

    /// Compares family counters with the particle lists without changing them.
    pub fn audit_counters(&self) -> CounterAudit {
        let family = self.family.borrow();
        CounterAudit {
            recorded_particles: family.particles(),
            recorded_autoparticles: family.autoparticles(),
            expected_particles: self
                .records
                .values()
                .map(|record| record.manual_particles().len())
                .sum(),
            expected_autoparticles: self
                .records
                .values()
                .map(MicrographFamilyData::automatic_particles_count)
                .sum(),
        }
    }

    /// Rebuilds family counters from the lists and returns the prior audit.
    pub fn recount(&mut self) -> CounterAudit {
        let audit = self.audit_counters();
        let mut family = self.family.borrow_mut();
        if !audit.is_consistent() {
            warn!(
                "event=counter_drift module=session family={} particles={}->{} autoparticles={}->{}",
                family.name(),
                audit.recorded_particles,
                audit.expected_particles,
                audit.recorded_autoparticles,
                audit.expected_autoparticles
            );
        }
        family.set_counters(audit.expected_particles, audit.expected_autoparticles);
        audit
    }
}

#[cfg(test)]
mod tests {
    use super::FamilyPickingSession;
    use crate::model::family::Family;
    use crate::model::micrograph::Micrograph;
    use crate::model::particle::{AutomaticParticle, Particle};
    use crate::model::state::{FamilyState, MicrographFamilyState};

    #[test]
    fn record_for_reuses_existing_record() {
        let family = Family::new("ribo", "red", FamilyState::Manual)
            .unwrap()
            .into_shared();
        let micrograph = Micrograph::new("mic01").unwrap().into_shared();
        let mut session = FamilyPickingSession::new(family);

        session
            .record_for(&micrograph)
            .add_manual_particle(Particle::new(micrograph.id(), 1, 2));
        let record = session.record_for(&micrograph);

        assert_eq!(record.manual_particles().len(), 1);
        assert_eq!(session.len(), 1);
    }

    #[test]
    fn restore_rejects_duplicate_micrograph() {
        let family = Family::new("ribo", "red", FamilyState::Supervised)
            .unwrap()
            .into_shared();
        let micrograph = Micrograph::new("mic01").unwrap().into_shared();
        let mut session = FamilyPickingSession::new(family);

        let record = session
            .restore(&micrograph, MicrographFamilyState::Correct)
            .unwrap();
        assert_eq!(record.state(), MicrographFamilyState::Correct);
        assert!(session
            .restore(&micrograph, MicrographFamilyState::ReadOnly)
            .is_err());
    }

    #[test]
    fn reset_all_restores_counter_consistency() {
        let family = Family::new("ribo", "red", FamilyState::Supervised)
            .unwrap()
            .into_shared();
        let micrograph = Micrograph::new("mic01").unwrap().into_shared();
        let mut session = FamilyPickingSession::new(family.clone());

        let record = session
            .restore(&micrograph, MicrographFamilyState::Correct)
            .unwrap();
        record.add_manual_particle(Particle::new(micrograph.id(), 1, 1));
        record
            .add_automatic_particle(AutomaticParticle::new(micrograph.id(), 2, 2, 0.4))
            .unwrap();

        session.reset_all();

        assert_eq!(family.borrow().particles(), 0);
        assert_eq!(family.borrow().autoparticles(), 0);
        assert!(session.records().all(|record| record.is_empty()));
        assert!(session.audit_counters().is_consistent());
    }

    #[test]
    fn recount_repairs_drift_left_by_record_reset() {
        let family = Family::new("ribo", "red", FamilyState::Manual)
            .unwrap()
            .into_shared();
        let first = Micrograph::new("mic01").unwrap().into_shared();
        let second = Micrograph::new("mic02").unwrap().into_shared();
        let mut session = FamilyPickingSession::new(family.clone());

        session
            .record_for(&first)
            .add_manual_particle(Particle::new(first.id(), 1, 1));
        session
            .record_for(&second)
            .add_manual_particle(Particle::new(second.id(), 2, 2));
        session.record_for(&first).reset();

        let audit = session.recount();
        assert!(!audit.is_consistent());
        assert_eq!(audit.recorded_particles, 2);
        assert_eq!(audit.expected_particles, 1);
        assert_eq!(family.borrow().particles(), 1);
        assert!(session.audit_counters().is_consistent());
    }
}
