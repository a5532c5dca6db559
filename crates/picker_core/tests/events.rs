use log::{Level, LevelFilter, Log, Metadata, Record};
use picker_core::{
    AutomaticParticle, Family, FamilyState, Micrograph, MicrographFamilyData,
    MicrographFamilyState, Particle,
};
use std::sync::{Mutex, Once};

static CAPTURED: Mutex<Vec<(Level, String)>> = Mutex::new(Vec::new());
static INSTALL: Once = Once::new();

struct CaptureLogger;

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        CAPTURED
            .lock()
            .expect("capture lock")
            .push((record.level(), record.args().to_string()));
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;

fn install_capture() {
    INSTALL.call_once(|| {
        log::set_logger(&LOGGER).expect("no other logger in this test binary");
        log::set_max_level(LevelFilter::Trace);
    });
}

fn events_for(micrograph: &str) -> Vec<(Level, String)> {
    let needle = format!("micrograph={micrograph} ");
    CAPTURED
        .lock()
        .expect("capture lock")
        .iter()
        .filter(|(_, message)| message.contains(&needle))
        .cloned()
        .collect()
}

#[test]
fn particle_additions_and_removals_emit_debug_events() {
    install_capture();
    let micrograph = Micrograph::new("mic_events").unwrap().into_shared();
    let family = Family::new("ribo", "red", FamilyState::Supervised)
        .unwrap()
        .into_shared();
    let mut record = MicrographFamilyData::with_state(
        micrograph.clone(),
        family,
        MicrographFamilyState::Correct,
    );
    let manual = Particle::new(micrograph.id(), 1, 1);
    let candidate = AutomaticParticle::new(micrograph.id(), 2, 2, 0.6);
    let candidate_id = candidate.id();

    record.add_manual_particle(manual.clone());
    record.add_automatic_particle(candidate).unwrap();
    record.remove_particle(candidate_id).unwrap();
    record.remove_particle(manual.id).unwrap();

    let events = events_for("mic_events");
    let debug_with = |fragment: &str| {
        events
            .iter()
            .any(|(level, message)| *level == Level::Debug && message.contains(fragment))
    };
    assert!(debug_with("event=particle_added module=picking kind=manual"));
    assert!(debug_with("event=particle_added module=picking kind=automatic"));
    assert!(debug_with("event=particle_removed module=picking kind=automatic"));
    assert!(debug_with("event=particle_removed module=picking kind=manual"));
}

#[test]
fn duplicate_manual_pick_logs_warning() {
    install_capture();
    let micrograph = Micrograph::new("mic_duplicate").unwrap().into_shared();
    let family = Family::new("ribo", "red", FamilyState::Manual)
        .unwrap()
        .into_shared();
    let mut record = MicrographFamilyData::new(micrograph.clone(), family);
    let particle = Particle::new(micrograph.id(), 4, 4);

    record.add_manual_particle(particle.clone());
    record.add_manual_particle(particle);

    assert!(events_for("mic_duplicate")
        .iter()
        .any(|(level, message)| *level == Level::Warn
            && message.contains("event=duplicate_particle_ignored")));
}
