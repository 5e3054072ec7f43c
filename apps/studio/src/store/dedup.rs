//! Duplicate detection for appended entries.
//!
//! The assistant frequently restates facts it already emitted; these keys make
//! `add_experience` / `add_education` idempotent for the same fact. Ids and
//! free-form fields (achievements, location, gpa) are not part of the key.

use crate::models::resume::{Education, Experience};

#[derive(Debug, PartialEq, Eq)]
pub struct ExperienceKey<'a> {
    pub company: &'a str,
    pub role: &'a str,
    pub start_date: &'a str,
    pub end_date: &'a str,
}

impl<'a> From<&'a Experience> for ExperienceKey<'a> {
    fn from(exp: &'a Experience) -> Self {
        Self {
            company: &exp.company,
            role: &exp.role,
            start_date: &exp.start_date,
            end_date: &exp.end_date,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct EducationKey<'a> {
    pub school: &'a str,
    pub degree: &'a str,
    pub field: &'a str,
    pub start_date: &'a str,
    pub end_date: &'a str,
}

impl<'a> From<&'a Education> for EducationKey<'a> {
    fn from(edu: &'a Education) -> Self {
        Self {
            school: &edu.school,
            degree: &edu.degree,
            field: &edu.field,
            start_date: &edu.start_date,
            end_date: &edu.end_date,
        }
    }
}

pub fn is_duplicate_experience(existing: &[Experience], candidate: &Experience) -> bool {
    let key = ExperienceKey::from(candidate);
    existing.iter().any(|e| ExperienceKey::from(e) == key)
}

pub fn is_duplicate_education(existing: &[Education], candidate: &Education) -> bool {
    let key = EducationKey::from(candidate);
    existing.iter().any(|e| EducationKey::from(e) == key)
}
