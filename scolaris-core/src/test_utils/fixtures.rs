//! Test fixtures for creating common test objects
//!
//! Provides a minimal [`Named`] entity and factory functions for school data.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{EnrollmentStatus, Student};
use crate::sync::{Entity, EntityId};

/// Smallest possible entity: an id and a name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Named {
    pub id: EntityId,
    pub name: String,
}

impl Named {
    pub fn new(id: EntityId, name: &str) -> Self {
        Self { id, name: name.to_string() }
    }
}

impl Entity for Named {
    const NAME: &'static str = "Named";
    const FIELDS: &'static [&'static str] = &["name"];

    fn id(&self) -> EntityId {
        self.id
    }
}

/// Builder for creating test students
pub struct TestStudentBuilder {
    student: Student,
}

impl TestStudentBuilder {
    pub fn new(id: EntityId, first_name: &str, last_name: &str) -> Self {
        Self {
            student: Student {
                id,
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                birth_date: NaiveDate::from_ymd_opt(2015, 1, 1).expect("valid fixture date"),
                class_level: "CE2".to_string(),
                school_year: "2025-2026".to_string(),
                guardian_name: format!("Guardian of {first_name}"),
                guardian_phone: None,
                status: EnrollmentStatus::Enrolled,
            },
        }
    }

    pub fn with_class(mut self, class_level: &str) -> Self {
        self.student.class_level = class_level.to_string();
        self
    }

    pub fn with_year(mut self, school_year: &str) -> Self {
        self.student.school_year = school_year.to_string();
        self
    }

    pub fn with_status(mut self, status: EnrollmentStatus) -> Self {
        self.student.status = status;
        self
    }

    pub fn with_phone(mut self, phone: &str) -> Self {
        self.student.guardian_phone = Some(phone.to_string());
        self
    }

    pub fn build(self) -> Student {
        self.student
    }
}

/// Enrolled CE2 student for the 2025-2026 year
pub fn student(id: EntityId, first_name: &str, last_name: &str) -> Student {
    TestStudentBuilder::new(id, first_name, last_name).build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_builder() {
        let s = TestStudentBuilder::new(1, "Awa", "Diallo")
            .with_class("CM2")
            .with_status(EnrollmentStatus::Reenrolled)
            .with_phone("+221 77 000 00 00")
            .build();

        assert_eq!(s.class_level, "CM2");
        assert_eq!(s.status, EnrollmentStatus::Reenrolled);
        assert_eq!(s.guardian_phone.as_deref(), Some("+221 77 000 00 00"));
        assert_eq!(s.guardian_name, "Guardian of Awa");
    }

    #[test]
    fn test_named_serializes_flat() {
        let json = serde_json::to_value(Named::new(3, "C")).unwrap();
        assert_eq!(json, serde_json::json!({"id": 3, "name": "C"}));
    }
}
