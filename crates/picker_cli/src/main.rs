//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `picker_core` linkage and logging bootstrap.
//! - Walk a manual and a supervised record and print what a shell would see.

use log::info;
use picker_core::{
    AutomaticParticle, Family, FamilyState, Micrograph, MicrographFamilyData,
    MicrographFamilyState, Particle, PickerConfig,
};
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("picker_cli error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    println!("picker_core ping={}", picker_core::ping());
    println!("picker_core version={}", picker_core::core_version());

    let output_dir = std::env::temp_dir().join("particle_picker_smoke");
    let config = PickerConfig::new(&output_dir)?;
    picker_core::init_logging(config.log_level(), &output_dir.to_string_lossy())?;
    info!("event=cli_smoke module=cli status=start");

    let micrograph = Micrograph::new("mic01")?.into_shared();

    let manual = Family::new("manual_demo", "#00aa00", FamilyState::Manual)?.into_shared();
    let mut record = MicrographFamilyData::new(micrograph.clone(), manual);
    describe("manual/new", &record);
    record.add_manual_particle(Particle::new(micrograph.id(), 128, 256));
    describe("manual/picked", &record);

    let supervised =
        Family::new("supervised_demo", "#aa0000", FamilyState::Supervised)?.into_shared();
    let mut record = MicrographFamilyData::with_state(
        micrograph.clone(),
        supervised,
        MicrographFamilyState::Correct,
    );
    let candidate = AutomaticParticle::new(micrograph.id(), 64, 64, 0.42);
    let candidate_id = candidate.id();
    record.add_automatic_particle(candidate)?;
    record.remove_particle(candidate_id)?;
    describe("supervised/corrected", &record);
    println!(
        "training_features={}",
        record.training_auto_features_vector_filename(&config).display()
    );

    info!("event=cli_smoke module=cli status=ok");
    Ok(())
}

fn describe(label: &str, record: &MicrographFamilyData) {
    let family = record.family().borrow();
    println!(
        "{label}: state={} step={} picking={} action_available={} action={} particles={} autoparticles={}",
        record.state(),
        record.step(),
        record.is_picking_available(),
        record.is_action_available(),
        record.action().unwrap_or("-"),
        family.particles(),
        family.autoparticles()
    );
}
