//! In-memory authoritative store of student records.
//!
//! Every record sits behind its own lock, so the merge, recompute and write
//! for one id happen under a single write guard while updates to different
//! ids proceed in parallel.

use crossbeam_channel::Sender;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use pv_risk::{RiskAlert, RiskSeverity, RiskSummary};
use pv_types::{
    validation_error, CounselingNote, NewNote, NoteCategory, NoteVisibility, PvResult,
    RecordError, RecordResult, Role, StudentId,
};

use crate::config::StoreConfig;
use crate::record::{NewStudent, RiskPreview, StudentPatch, StudentRecord};

const CREATION_NOTE: &str = "Student profile created. Initial academic data recorded.";

/// Holds every student record and guarantees that risk fields always match
/// the academic metrics they were derived from.
#[derive(Debug)]
pub struct StudentRecordStore {
    records: DashMap<StudentId, RwLock<StudentRecord>>,
    insertion_order: RwLock<Vec<StudentId>>,
    emails: DashMap<String, StudentId>,
    config: StoreConfig,
    alert_tx: Option<Sender<RiskAlert>>,
}

impl Default for StudentRecordStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

impl StudentRecordStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            records: DashMap::new(),
            insertion_order: RwLock::new(Vec::new()),
            emails: DashMap::new(),
            config,
            alert_tx: None,
        }
    }

    /// Like [`StudentRecordStore::new`], also emitting a [`RiskAlert`] whenever
    /// an update moves a record to a different risk category.
    pub fn with_alerts(config: StoreConfig, alert_tx: Sender<RiskAlert>) -> Self {
        Self {
            alert_tx: Some(alert_tx),
            ..Self::new(config)
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Validate, assign an id, derive risk and store a new record.
    pub fn create(&self, new: NewStudent) -> RecordResult<StudentRecord> {
        let mut record = StudentRecord::create(Uuid::new_v4(), new).inspect_err(|e| {
            warn!(error = %e, "rejected new student record");
        })?;

        if self.config.record_creation_note {
            record.push_note(
                NewNote::new(
                    &self.config.creation_note_author,
                    CREATION_NOTE,
                    NoteCategory::General,
                    NoteVisibility::Shared,
                )
                .into_note(),
            );
        }

        self.insert_record(record.clone())?;
        info!(
            student_id = %record.id,
            score = record.risk_score(),
            risk = %record.dropout_risk(),
            "student record created"
        );
        Ok(record)
    }

    pub fn get_by_id(&self, id: StudentId) -> RecordResult<StudentRecord> {
        self.records
            .get(&id)
            .map(|entry| entry.read().clone())
            .ok_or_else(|| RecordError::not_found(id))
    }

    /// Merge `patch` into the record and, if any academic metric is part of
    /// it, re-derive risk from the merged metrics. Either everything applies
    /// or nothing does.
    pub fn update(&self, id: StudentId, patch: StudentPatch) -> RecordResult<StudentRecord> {
        let entry = self.records.get(&id).ok_or_else(|| RecordError::not_found(id))?;
        let mut current = entry.write();

        let next = current.merged(&patch).inspect_err(|e| {
            warn!(student_id = %id, error = %e, "rejected student update");
        })?;

        let old_email = email_key(&current.email);
        let new_email = email_key(&next.email);
        if self.config.enforce_unique_email && old_email != new_email {
            self.reserve_email(new_email, id)?;
            self.emails.remove_if(&old_email, |_, owner| *owner == id);
        }

        let before = current.assessment();
        *current = next;
        let updated = current.clone();
        drop(current);
        drop(entry);

        let after = updated.assessment();
        if patch.touches_metrics() {
            debug!(
                student_id = %id,
                old_score = before.score,
                new_score = after.score,
                "recomputed dropout risk"
            );
        }
        info!(student_id = %id, score = after.score, risk = %after.risk, "student record updated");

        if let Some(alert) = RiskAlert::for_transition(id, &updated.name, before, after) {
            self.emit(alert);
        }
        Ok(updated)
    }

    /// What `update` would do to the risk fields, without applying it.
    pub fn preview_update(&self, id: StudentId, patch: &StudentPatch) -> RecordResult<RiskPreview> {
        let entry = self.records.get(&id).ok_or_else(|| RecordError::not_found(id))?;
        let current = entry.read();
        let next = current.merged(patch)?;

        Ok(RiskPreview {
            current: current.assessment(),
            projected: next.assessment(),
        })
    }

    /// Records tagged to `mentor_id`, in insertion order.
    pub fn list_by_mentor(&self, mentor_id: &str) -> Vec<StudentRecord> {
        self.collect_where(|r| r.mentor_id.as_deref() == Some(mentor_id))
    }

    /// Records for `mentor_id` with medium risk or outstanding backlogs.
    pub fn needs_attention(&self, mentor_id: &str) -> Vec<StudentRecord> {
        self.collect_where(|r| r.mentor_id.as_deref() == Some(mentor_id) && r.needs_attention())
    }

    pub fn summary_for_mentor(&self, mentor_id: &str) -> RiskSummary {
        RiskSummary::from_assessments(
            self.list_by_mentor(mentor_id)
                .iter()
                .map(StudentRecord::assessment),
        )
    }

    /// Append a counseling note. Notes are never edited or removed.
    pub fn add_note(&self, id: StudentId, note: NewNote) -> RecordResult<CounselingNote> {
        if note.note.trim().is_empty() {
            return Err(validation_error!("note", "cannot be blank"));
        }
        if note.author.trim().is_empty() {
            return Err(validation_error!("author", "cannot be blank"));
        }

        let entry = self.records.get(&id).ok_or_else(|| RecordError::not_found(id))?;
        let note = note.into_note();
        entry.write().push_note(note.clone());

        debug!(student_id = %id, note_id = %note.id, category = ?note.category, "counseling note added");
        Ok(note)
    }

    /// Notes on a record that `role` may read, newest first.
    pub fn notes_for(&self, id: StudentId, role: Role) -> RecordResult<Vec<CounselingNote>> {
        self.records
            .get(&id)
            .map(|entry| entry.read().notes_visible_to(role))
            .ok_or_else(|| RecordError::not_found(id))
    }

    /// Every record, in insertion order, as pretty JSON.
    pub fn export_json(&self) -> PvResult<String> {
        let records = self.collect_where(|_| true);
        Ok(serde_json::to_string_pretty(&records)?)
    }

    /// Rebuild a store from [`StudentRecordStore::export_json`] output. Risk
    /// fields are recomputed from each record's metrics.
    pub fn import_json(json: &str, config: StoreConfig) -> PvResult<Self> {
        let records: Vec<StudentRecord> = serde_json::from_str(json)?;
        let store = Self::new(config);
        for record in records {
            store.insert_record(record)?;
        }
        info!(records = store.len(), "student records imported");
        Ok(store)
    }

    fn insert_record(&self, record: StudentRecord) -> RecordResult<()> {
        let id = record.id;
        if self.records.contains_key(&id) {
            return Err(validation_error!("id", "duplicate record id {id}"));
        }
        if self.config.enforce_unique_email {
            self.reserve_email(email_key(&record.email), id)?;
        }

        self.records.insert(id, RwLock::new(record));
        self.insertion_order.write().push(id);
        Ok(())
    }

    fn reserve_email(&self, key: String, id: StudentId) -> RecordResult<()> {
        match self.emails.entry(key) {
            Entry::Occupied(owner) if *owner.get() != id => Err(RecordError::validation(
                "email",
                format!("{} is already registered", owner.key()),
            )),
            Entry::Occupied(_) => Ok(()),
            Entry::Vacant(slot) => {
                slot.insert(id);
                Ok(())
            }
        }
    }

    fn collect_where<F>(&self, predicate: F) -> Vec<StudentRecord>
    where
        F: Fn(&StudentRecord) -> bool,
    {
        let order = self.insertion_order.read().clone();
        order
            .iter()
            .filter_map(|id| self.records.get(id).map(|entry| entry.read().clone()))
            .filter(|record| predicate(record))
            .collect()
    }

    fn emit(&self, alert: RiskAlert) {
        match alert.severity {
            RiskSeverity::Critical => warn!(%alert.message, "RISK CRITICAL"),
            RiskSeverity::Warning => warn!(%alert.message, "RISK WARNING"),
            RiskSeverity::Info => info!(%alert.message, "RISK INFO"),
        }
        if let Some(tx) = &self.alert_tx {
            // Best-effort send; if receiver is dropped we just log.
            if tx.try_send(alert).is_err() {
                debug!("risk alert receiver gone");
            }
        }
    }
}

fn email_key(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

/// Highest risk category first, then by descending score. Stable for equal
/// keys.
pub fn sort_by_risk(records: &mut [StudentRecord]) {
    records.sort_by(|a, b| {
        b.dropout_risk()
            .cmp(&a.dropout_risk())
            .then_with(|| b.risk_score().cmp(&a.risk_score()))
    });
}
