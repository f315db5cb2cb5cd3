use std::collections::HashMap;

use crate::types::Course;

/// Group courses by sequence key (subject + base name with level indicators
/// stripped), returning sequence groups first (sorted by level) and
/// singleton courses last, each group internally sorted by `priority_level`
/// then `level()` as spec.md §4.2 step 2 requires.
pub fn partition_sequences(courses: &[&Course]) -> Vec<Vec<usize>> {
    let mut by_key: HashMap<(String, String), Vec<usize>> = HashMap::new();
    for (idx, course) in courses.iter().enumerate() {
        by_key.entry(course.sequence_key()).or_default().push(idx);
    }

    let mut sequences: Vec<Vec<usize>> = Vec::new();
    let mut singletons: Vec<Vec<usize>> = Vec::new();

    // Deterministic order: iterate keys sorted, not hashmap order.
    let mut keys: Vec<_> = by_key.keys().cloned().collect();
    keys.sort();

    for key in keys {
        let mut indices = by_key.remove(&key).unwrap();
        indices.sort_by_key(|&i| {
            let c = courses[i];
            (
                std::cmp::Reverse(c.priority_level.unwrap_or(0)),
                c.level(),
                c.id.0.clone(),
            )
        });
        if indices.len() > 1 {
            sequences.push(indices);
        } else {
            singletons.push(indices);
        }
    }

    sequences.extend(singletons);
    sequences
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CourseId;

    fn course(id: &str, name: &str, subject: &str) -> Course {
        Course {
            id: CourseId(id.into()),
            code: id.into(),
            name: name.into(),
            subject: subject.into(),
            requires_lab: false,
            required_room_type: None,
            enrollment: 0,
            max_students: 30,
            min_enrollment: 0,
            sessions_per_week: 1,
            credits: None,
            priority_level: None,
            teacher_id: None,
            room_id: None,
            active: true,
        }
    }

    #[test]
    fn groups_same_subject_level_sequence() {
        let c1 = course("e9", "English 9", "English");
        let c2 = course("e10", "English 10", "English");
        let courses = vec![&c1, &c2];
        let groups = partition_sequences(&courses);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 2);
    }

    #[test]
    fn singleton_courses_are_separate_groups() {
        let c1 = course("m1", "Algebra 1", "Math");
        let c2 = course("g1", "Government", "Social-Studies");
        let courses = vec![&c1, &c2];
        let groups = partition_sequences(&courses);
        // Both singletons: two distinct groups, each length 1.
        assert_eq!(groups.len(), 2);
        assert!(groups.iter().all(|g| g.len() == 1));
    }
}
