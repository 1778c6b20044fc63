//! Default subject templates applied when a semester is provisioned on
//! first access. Seeding is idempotent: rerunning it (or racing resolvers)
//! leaves at most one copy of each subject.

use crate::db::models::{Semester, Subject};
use crate::db::store::{CatalogStore, NewSubject, StoreError};

pub struct SubjectTemplate {
    pub name: &'static str,
    pub description: &'static str,
}

// Only semester 3 ships with a starter set; every other semester starts
// empty and is populated by professors.
const THIRD_SEMESTER_SUBJECTS: &[SubjectTemplate] = &[
    SubjectTemplate {
        name: "Data Structures and Algorithms",
        description: "Advanced implementation of data structures, algorithm design and analysis",
    },
    SubjectTemplate {
        name: "Object-Oriented Programming",
        description: "Principles of OOP, inheritance, polymorphism, and design patterns",
    },
    SubjectTemplate {
        name: "Database Management Systems",
        description: "Relational databases, SQL, normalization, and transaction management",
    },
];

pub fn template_for(semester_number: i32) -> &'static [SubjectTemplate] {
    match semester_number {
        3 => THIRD_SEMESTER_SUBJECTS,
        _ => &[],
    }
}

/// Apply the default subject template for `semester`. Subjects that already
/// exist (by name within the semester) are left untouched; the newly created
/// ones are returned.
pub async fn seed_semester_subjects(
    store: &dyn CatalogStore,
    semester: &Semester,
) -> Result<Vec<Subject>, StoreError> {
    let mut created = Vec::new();
    for template in template_for(semester.number) {
        let subject = NewSubject {
            name: template.name.to_string(),
            description: template.description.to_string(),
            semester_id: semester.id,
            // Auto-created subjects always inherit the semester's branch.
            branch_id: semester.branch_id,
        };
        if let Some(row) = store.create_subject_if_absent(subject).await? {
            created.push(row);
        }
    }
    if !created.is_empty() {
        log::info!(
            "seeded {} default subjects for semester {}",
            created.len(),
            semester.number
        );
    }
    Ok(created)
}
