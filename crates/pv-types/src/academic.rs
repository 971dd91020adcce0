use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::{RecordError, RecordResult};

/// Unique student record identifier
pub type StudentId = Uuid;

/// Identifier of the mentor a record is tagged to. Mentors are managed by the
/// authentication collaborator, so this is an opaque key here.
pub type MentorId = String;

pub const CGPA_MIN: f64 = 0.0;
pub const CGPA_MAX: f64 = 10.0;
pub const ATTENDANCE_MIN: i32 = 0;
pub const ATTENDANCE_MAX: i32 = 100;

/// Tuition fee payment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeStatus {
    Paid,
    #[serde(alias = "payment_pending")]
    Pending,
    #[serde(alias = "payment_overdue")]
    Overdue,
}

impl FeeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeeStatus::Paid => "paid",
            FeeStatus::Pending => "pending",
            FeeStatus::Overdue => "overdue",
        }
    }

    /// Spelling used by the records backend.
    pub fn as_wire_str(&self) -> &'static str {
        match self {
            FeeStatus::Paid => "paid",
            FeeStatus::Pending => "payment_pending",
            FeeStatus::Overdue => "payment_overdue",
        }
    }
}

impl fmt::Display for FeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeeStatus {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "paid" => Ok(FeeStatus::Paid),
            "pending" | "payment_pending" => Ok(FeeStatus::Pending),
            "overdue" | "payment_overdue" => Ok(FeeStatus::Overdue),
            other => Err(RecordError::validation(
                "fee_status",
                format!("expected one of paid, pending, overdue; got {other:?}"),
            )),
        }
    }
}

/// Coarse dropout-risk bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropoutRisk {
    Low,
    Medium,
    High,
}

impl DropoutRisk {
    pub fn as_str(&self) -> &'static str {
        match self {
            DropoutRisk::Low => "low",
            DropoutRisk::Medium => "medium",
            DropoutRisk::High => "high",
        }
    }
}

impl fmt::Display for DropoutRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DropoutRisk {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(DropoutRisk::Low),
            "medium" => Ok(DropoutRisk::Medium),
            "high" => Ok(DropoutRisk::High),
            other => Err(RecordError::validation(
                "dropout_risk",
                format!("expected one of low, medium, high; got {other:?}"),
            )),
        }
    }
}

/// The four inputs dropout risk is derived from.
///
/// Values are not range-checked on construction; call [`AcademicMetrics::validate`]
/// before committing them anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AcademicMetrics {
    /// Cumulative grade-point average on a 0-10 scale.
    pub cgpa: f64,
    /// Attendance in whole percent.
    pub attendance: i32,
    pub fee_status: FeeStatus,
    /// Outstanding failed or incomplete course requirements.
    pub backlogs: i32,
}

impl AcademicMetrics {
    pub fn new(cgpa: f64, attendance: i32, fee_status: FeeStatus, backlogs: i32) -> Self {
        Self {
            cgpa,
            attendance,
            fee_status,
            backlogs,
        }
    }

    /// Check every metric against its documented domain.
    pub fn validate(&self) -> RecordResult<()> {
        // NaN fails the range check as well.
        if !(CGPA_MIN..=CGPA_MAX).contains(&self.cgpa) {
            return Err(RecordError::validation(
                "cgpa",
                format!("must be within [{CGPA_MIN}, {CGPA_MAX}], got {}", self.cgpa),
            ));
        }
        if !(ATTENDANCE_MIN..=ATTENDANCE_MAX).contains(&self.attendance) {
            return Err(RecordError::validation(
                "attendance",
                format!(
                    "must be within [{ATTENDANCE_MIN}, {ATTENDANCE_MAX}], got {}",
                    self.attendance
                ),
            ));
        }
        if self.backlogs < 0 {
            return Err(RecordError::validation(
                "backlogs",
                format!("cannot be negative, got {}", self.backlogs),
            ));
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}
