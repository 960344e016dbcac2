//! Student records for inscription and re-inscription

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::sync::{Entity, EntityId, Patch};

/// Where a student stands for the current school year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentStatus {
    /// First inscription at the school
    Enrolled,
    /// Re-inscription of a returning student
    Reenrolled,
    Withdrawn,
}

impl EnrollmentStatus {
    /// Wire name, identical to the serde representation
    pub fn as_str(&self) -> &'static str {
        match self {
            EnrollmentStatus::Enrolled => "enrolled",
            EnrollmentStatus::Reenrolled => "reenrolled",
            EnrollmentStatus::Withdrawn => "withdrawn",
        }
    }
}

impl From<EnrollmentStatus> for serde_json::Value {
    fn from(status: EnrollmentStatus) -> Self {
        serde_json::Value::from(status.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: EntityId,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
    pub class_level: String,
    pub school_year: String,
    pub guardian_name: String,
    pub guardian_phone: Option<String>,
    pub status: EnrollmentStatus,
}

impl Entity for Student {
    const NAME: &'static str = "Student";
    const FIELDS: &'static [&'static str] = &[
        "first_name",
        "last_name",
        "birth_date",
        "class_level",
        "school_year",
        "guardian_name",
        "guardian_phone",
        "status",
    ];

    fn id(&self) -> EntityId {
        self.id
    }
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Enrolled or re-enrolled
    pub fn is_active(&self) -> bool {
        self.status != EnrollmentStatus::Withdrawn
    }

    /// Age in whole years on `on`
    pub fn age_on(&self, on: NaiveDate) -> Option<u32> {
        on.years_since(self.birth_date)
    }

    /// Patch for a first inscription
    pub fn inscription(
        first_name: &str,
        last_name: &str,
        birth_date: NaiveDate,
        class_level: &str,
        school_year: &str,
        guardian_name: &str,
    ) -> Patch<Student> {
        Patch::new()
            .set("first_name", first_name)
            .set("last_name", last_name)
            .set("birth_date", birth_date.to_string())
            .set("class_level", class_level)
            .set("school_year", school_year)
            .set("guardian_name", guardian_name)
            .set("guardian_phone", serde_json::Value::Null)
            .set("status", EnrollmentStatus::Enrolled)
    }

    /// Patch moving this student into a new school year
    pub fn reinscription(school_year: &str, class_level: &str) -> Patch<Student> {
        Patch::new()
            .set("school_year", school_year)
            .set("class_level", class_level)
            .set("status", EnrollmentStatus::Reenrolled)
    }

    pub fn withdrawal() -> Patch<Student> {
        Patch::new().set("status", EnrollmentStatus::Withdrawn)
    }
}
