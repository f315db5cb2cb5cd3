//! SIS gateway contract (spec.md §6): read-only fetches from the student
//! information system. An empty list always means "no data," never "error" —
//! callers that need to distinguish the two should consult `health_check`.

use crate::types::{Course, Enrollment, Student, Teacher};

pub trait SisGateway: Send + Sync {
    fn fetch_students(&self) -> Vec<Student>;
    fn fetch_teachers(&self) -> Vec<Teacher>;
    fn fetch_courses(&self) -> Vec<Course>;
    fn fetch_enrollments(&self) -> Vec<Enrollment>;
    fn health_check(&self) -> bool;
}

/// Fixed-snapshot gateway for tests and the CLI demo; never fails, never
/// reaches a network.
#[derive(Debug, Clone, Default)]
pub struct StaticSisGateway {
    pub students: Vec<Student>,
    pub teachers: Vec<Teacher>,
    pub courses: Vec<Course>,
    pub enrollments: Vec<Enrollment>,
}

impl StaticSisGateway {
    pub fn new(
        students: Vec<Student>,
        teachers: Vec<Teacher>,
        courses: Vec<Course>,
        enrollments: Vec<Enrollment>,
    ) -> Self {
        Self {
            students,
            teachers,
            courses,
            enrollments,
        }
    }
}

impl SisGateway for StaticSisGateway {
    fn fetch_students(&self) -> Vec<Student> {
        self.students.clone()
    }

    fn fetch_teachers(&self) -> Vec<Teacher> {
        self.teachers.clone()
    }

    fn fetch_courses(&self) -> Vec<Course> {
        self.courses.clone()
    }

    fn fetch_enrollments(&self) -> Vec<Enrollment> {
        self.enrollments.clone()
    }

    fn health_check(&self) -> bool {
        true
    }
}
