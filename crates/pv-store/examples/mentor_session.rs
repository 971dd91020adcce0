use std::sync::Arc;

use crossbeam_channel::unbounded;
use pv_risk::{AdvisorConfig, RiskAdvisor, UnavailablePredictor};
use pv_store::{sort_by_risk, NewStudent, StoreConfig, StudentPatch, StudentRecordStore};
use pv_types::{AcademicMetrics, FeeStatus, NewNote, NoteCategory, NoteVisibility, Role};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("Pravartak mentor session");

    let config = match std::env::var("PRAVARTAK_STORE_CONFIG") {
        Ok(path) => StoreConfig::from_json_file(path)?,
        Err(_) => StoreConfig::default(),
    };

    let (alert_tx, alert_rx) = unbounded();
    let store = StudentRecordStore::with_alerts(config, alert_tx);

    let john = store.create(
        NewStudent::new("John Doe", "student@test.com", AcademicMetrics::new(7.5, 85, FeeStatus::Paid, 1))
            .with_mentor("mentor1"),
    )?;
    store.create(
        NewStudent::new("Jane Smith", "jane@test.com", AcademicMetrics::new(6.2, 70, FeeStatus::Overdue, 3))
            .with_mentor("mentor1"),
    )?;
    store.create(
        NewStudent::new("Mike Johnson", "mike@test.com", AcademicMetrics::new(8.5, 95, FeeStatus::Paid, 0))
            .with_mentor("mentor1"),
    )?;

    let patch = StudentPatch::new().attendance(58).fee_status(FeeStatus::Pending);
    let preview = store.preview_update(john.id, &patch)?;
    println!(
        "Preview for {}: {} ({}) -> {} ({})",
        john.name, preview.current.risk, preview.current.score, preview.projected.risk, preview.projected.score
    );
    store.update(john.id, patch)?;

    store.add_note(
        john.id,
        NewNote::new("Dr. Smith", "Attendance dropped; agreed on weekly check-ins.", NoteCategory::Behavioral, NoteVisibility::Shared),
    )?;

    let mut students = store.list_by_mentor("mentor1");
    sort_by_risk(&mut students);
    for s in &students {
        println!(
            "{:<14} {:>6} {:>4}/100  fees: {}",
            s.name,
            s.dropout_risk().as_str(),
            s.assessment().display_percent(),
            s.fee_status().as_wire_str()
        );
    }

    let summary = store.summary_for_mentor("mentor1");
    println!(
        "Total {} | high {} | medium {} | low {}",
        summary.total, summary.high, summary.medium, summary.low
    );

    for alert in alert_rx.try_iter() {
        println!("[{:?}] {}", alert.severity, alert.message);
    }

    println!("Notes visible to parent of {}:", john.name);
    for note in store.notes_for(john.id, Role::Parent)? {
        println!("  {} {}: {}", note.date, note.author, note.note);
    }

    let advisor = RiskAdvisor::new(Arc::new(UnavailablePredictor), AdvisorConfig::default());
    let shown = advisor.advise(Some(&store.get_by_id(john.id)?.metrics())).await;
    println!("Displayed risk for {}: {:?} via {:?}", john.name, shown.headline, shown.source);

    Ok(())
}
