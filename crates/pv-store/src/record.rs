//! The student record aggregate.
//!
//! Academic metrics and the derived risk fields are private and only change
//! together, through [`StudentRecord::merged`], so a record can never carry a
//! score computed from metrics it no longer has.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pv_risk::{RiskAssessment, RiskBreakdown, RiskEngine};
use pv_types::{
    AcademicMetrics, CounselingNote, DropoutRisk, FeeStatus, MentorId, RecordError,
    RecordResult, Role, StudentId,
};

/// One student's record as held by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawStudentRecord")]
pub struct StudentRecord {
    pub id: StudentId,
    pub name: String,
    pub email: String,
    pub mentor_id: Option<MentorId>,
    #[serde(flatten)]
    metrics: AcademicMetrics,
    dropout_risk: DropoutRisk,
    risk_score: i32,
    counseling_notes: Vec<CounselingNote>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Deserialization shadow. Any stored risk fields are ignored and recomputed.
#[derive(Debug, Deserialize)]
struct RawStudentRecord {
    id: StudentId,
    name: String,
    email: String,
    #[serde(default)]
    mentor_id: Option<MentorId>,
    #[serde(flatten)]
    metrics: AcademicMetrics,
    #[serde(default)]
    counseling_notes: Vec<CounselingNote>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<RawStudentRecord> for StudentRecord {
    type Error = RecordError;

    fn try_from(raw: RawStudentRecord) -> Result<Self, Self::Error> {
        validate_profile(&raw.name, &raw.email)?;
        raw.metrics.validate()?;
        let assessment = RiskEngine::compute(&raw.metrics);

        Ok(Self {
            id: raw.id,
            name: raw.name,
            email: raw.email,
            mentor_id: raw.mentor_id,
            metrics: raw.metrics,
            dropout_risk: assessment.risk,
            risk_score: assessment.score,
            counseling_notes: raw.counseling_notes,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
        })
    }
}

impl StudentRecord {
    pub(crate) fn create(id: StudentId, new: NewStudent) -> RecordResult<Self> {
        new.validate()?;
        let assessment = RiskEngine::compute(&new.metrics);
        let now = Utc::now();

        Ok(Self {
            id,
            name: new.name,
            email: new.email,
            mentor_id: new.mentor_id,
            metrics: new.metrics,
            dropout_risk: assessment.risk,
            risk_score: assessment.score,
            counseling_notes: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Copy of this record with `patch` applied and risk re-derived from the
    /// merged metrics. Validation runs on the merged values; `self` is never
    /// touched.
    pub(crate) fn merged(&self, patch: &StudentPatch) -> RecordResult<Self> {
        let mut next = self.clone();

        if let Some(name) = &patch.name {
            next.name = name.clone();
        }
        if let Some(email) = &patch.email {
            next.email = email.clone();
        }
        if let Some(mentor_id) = &patch.mentor_id {
            next.mentor_id = Some(mentor_id.clone());
        }
        validate_profile(&next.name, &next.email)?;

        if patch.touches_metrics() {
            next.metrics = patch.merge_metrics(self.metrics);
            next.metrics.validate()?;
            let assessment = RiskEngine::compute(&next.metrics);
            next.dropout_risk = assessment.risk;
            next.risk_score = assessment.score;
        }

        if !patch.is_empty() {
            next.updated_at = Utc::now();
        }
        Ok(next)
    }

    pub(crate) fn push_note(&mut self, note: CounselingNote) {
        self.counseling_notes.push(note);
        self.updated_at = Utc::now();
    }

    pub fn metrics(&self) -> AcademicMetrics {
        self.metrics
    }

    pub fn cgpa(&self) -> f64 {
        self.metrics.cgpa
    }

    pub fn attendance(&self) -> i32 {
        self.metrics.attendance
    }

    pub fn fee_status(&self) -> FeeStatus {
        self.metrics.fee_status
    }

    pub fn backlogs(&self) -> i32 {
        self.metrics.backlogs
    }

    pub fn dropout_risk(&self) -> DropoutRisk {
        self.dropout_risk
    }

    pub fn risk_score(&self) -> i32 {
        self.risk_score
    }

    pub fn assessment(&self) -> RiskAssessment {
        RiskAssessment {
            score: self.risk_score,
            risk: self.dropout_risk,
        }
    }

    pub fn breakdown(&self) -> RiskBreakdown {
        RiskEngine::breakdown(&self.metrics)
    }

    /// All notes in insertion order.
    pub fn counseling_notes(&self) -> &[CounselingNote] {
        &self.counseling_notes
    }

    /// Notes `role` may read, newest first.
    pub fn notes_visible_to(&self, role: Role) -> Vec<CounselingNote> {
        let mut notes: Vec<CounselingNote> = self
            .counseling_notes
            .iter()
            .filter(|n| role.can_see(n.visibility))
            .cloned()
            .collect();
        notes.sort_by(|a, b| b.date.cmp(&a.date));
        notes
    }

    /// Mentor dashboard "updates needed" criterion.
    pub fn needs_attention(&self) -> bool {
        self.dropout_risk == DropoutRisk::Medium || self.metrics.backlogs > 0
    }
}

/// Fields for a new student profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewStudent {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub mentor_id: Option<MentorId>,
    #[serde(flatten)]
    pub metrics: AcademicMetrics,
}

impl NewStudent {
    pub fn new(name: &str, email: &str, metrics: AcademicMetrics) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            mentor_id: None,
            metrics,
        }
    }

    pub fn with_mentor(mut self, mentor_id: &str) -> Self {
        self.mentor_id = Some(mentor_id.to_string());
        self
    }

    pub fn validate(&self) -> RecordResult<()> {
        validate_profile(&self.name, &self.email)?;
        self.metrics.validate()
    }
}

/// Partial update. Risk fields are not part of the patch and a wire patch
/// that names them is rejected.
///
/// Deserializing a patch with an unrecognised `fee_status` fails inside serde
/// and surfaces as a `serde_json::Error`. Callers holding a raw string should
/// go through [`StudentPatch::fee_status_str`] to get a
/// [`RecordError::Validation`] on `fee_status` instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StudentPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    /// Reassigns the record to another mentor. There is no way to unassign:
    /// `None` and an explicit `null` both leave the current mentor in place.
    pub mentor_id: Option<MentorId>,
    pub cgpa: Option<f64>,
    pub attendance: Option<i32>,
    pub fee_status: Option<FeeStatus>,
    pub backlogs: Option<i32>,
}

impl StudentPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn email(mut self, email: &str) -> Self {
        self.email = Some(email.to_string());
        self
    }

    pub fn mentor(mut self, mentor_id: &str) -> Self {
        self.mentor_id = Some(mentor_id.to_string());
        self
    }

    pub fn cgpa(mut self, cgpa: f64) -> Self {
        self.cgpa = Some(cgpa);
        self
    }

    pub fn attendance(mut self, attendance: i32) -> Self {
        self.attendance = Some(attendance);
        self
    }

    pub fn fee_status(mut self, fee_status: FeeStatus) -> Self {
        self.fee_status = Some(fee_status);
        self
    }

    /// Like [`StudentPatch::fee_status`], parsing any accepted spelling
    /// (`"pending"`, `"payment_pending"`, ...).
    pub fn fee_status_str(self, fee_status: &str) -> RecordResult<Self> {
        Ok(self.fee_status(fee_status.parse()?))
    }

    pub fn backlogs(mut self, backlogs: i32) -> Self {
        self.backlogs = Some(backlogs);
        self
    }

    pub fn touches_metrics(&self) -> bool {
        self.cgpa.is_some()
            || self.attendance.is_some()
            || self.fee_status.is_some()
            || self.backlogs.is_some()
    }

    pub fn is_empty(&self) -> bool {
        !self.touches_metrics()
            && self.name.is_none()
            && self.email.is_none()
            && self.mentor_id.is_none()
    }

    fn merge_metrics(&self, current: AcademicMetrics) -> AcademicMetrics {
        AcademicMetrics {
            cgpa: self.cgpa.unwrap_or(current.cgpa),
            attendance: self.attendance.unwrap_or(current.attendance),
            fee_status: self.fee_status.unwrap_or(current.fee_status),
            backlogs: self.backlogs.unwrap_or(current.backlogs),
        }
    }
}

/// Current and projected risk for a pending update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskPreview {
    pub current: RiskAssessment,
    pub projected: RiskAssessment,
}

impl RiskPreview {
    pub fn category_changes(&self) -> bool {
        self.current.risk != self.projected.risk
    }
}

fn validate_profile(name: &str, email: &str) -> RecordResult<()> {
    if name.trim().is_empty() {
        return Err(RecordError::validation("name", "cannot be blank"));
    }
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(RecordError::validation(
            "email",
            format!("not a valid address: {email:?}"),
        ));
    }
    Ok(())
}
