//! In-memory sample data for the CLI demo, mirroring the shape of a small
//! high school: a handful of core-subject and elective courses, one teacher
//! per department, and a classroom/lab/gym room mix.

use master_scheduler::types::{
    ClockTime, Course, CourseId, Enrollment, Room, RoomId, RoomType, SchedulerConfiguration,
    Student, StudentId, Teacher, TeacherId, TimeSlot, Weekday,
};

pub struct SampleData {
    pub students: Vec<Student>,
    pub teachers: Vec<Teacher>,
    pub courses: Vec<Course>,
    pub rooms: Vec<Room>,
    pub enrollments: Vec<Enrollment>,
    pub config: SchedulerConfiguration,
}

pub fn load() -> SampleData {
    let teachers = vec![
        teacher("t001", "Ms. Anderson", "Math", &["Math"]),
        teacher("t002", "Mr. Baker", "English", &["English"]),
        teacher("t003", "Dr. Clark", "Science", &["Biology", "Chemistry"]),
        teacher("t004", "Ms. Davis", "Social Studies", &["Government", "History"]),
        teacher("t005", "Mr. Evans", "Fine Arts", &["Art", "Music"]),
        teacher("t006", "Coach Fisher", "Physical Education", &["Physical Education"]),
    ];

    let courses = vec![
        course("math10", "Algebra 2", "Math", 25, false, None, 5),
        course("eng10", "English 10", "English", 25, false, None, 5),
        course("sci10", "Biology", "Biology", 24, true, Some(RoomType::ScienceLab), 5),
        course("gov", "Government", "Government", 25, false, None, 3),
        course("art", "Art I", "Art", 20, false, Some(RoomType::ArtStudio), 3),
        course("music", "Concert Band", "Music", 25, false, Some(RoomType::BandRoom), 3),
        course("pe", "Physical Education", "Physical Education", 30, false, Some(RoomType::Gymnasium), 5),
    ];

    let rooms = vec![
        room("101", "Main", 1, 30, RoomType::Classroom),
        room("102", "Main", 1, 30, RoomType::Classroom),
        room("sci-lab-1", "Main", 2, 24, RoomType::ScienceLab),
        room("art-studio", "Annex", 1, 22, RoomType::ArtStudio),
        room("band-room", "Annex", 1, 30, RoomType::BandRoom),
        room("gym", "Main", 0, 60, RoomType::Gymnasium),
    ];

    let students: Vec<Student> = (1..=20)
        .map(|i| Student {
            id: StudentId(format!("s{i:03}")),
            name: format!("Student {i}"),
            grade_level: 10,
            gpa: None,
            has_iep: false,
            has_504: false,
            is_gifted: false,
        })
        .collect();

    let enrollments: Vec<Enrollment> = students
        .iter()
        .flat_map(|s| {
            ["math10", "eng10", "sci10", "gov"]
                .into_iter()
                .map(|course_id| Enrollment::new(s.id.clone(), CourseId(course_id.into())))
        })
        .collect();

    let mut config = SchedulerConfiguration::default();
    config.earliest_start = ClockTime::hm(7, 30);
    config.latest_end = ClockTime::hm(15, 0);

    SampleData {
        students,
        teachers,
        courses,
        rooms,
        enrollments,
        config,
    }
}

fn teacher(id: &str, name: &str, department: &str, certifications: &[&str]) -> Teacher {
    Teacher {
        id: TeacherId(id.into()),
        name: name.into(),
        department: department.into(),
        certifications: certifications.iter().map(|c| c.to_string()).collect(),
        planning_period: Some(TimeSlot::new(Weekday::Monday, ClockTime::hm(13, 0), ClockTime::hm(13, 50))),
        max_periods_per_day: 7,
    }
}

#[allow(clippy::too_many_arguments)]
fn course(
    id: &str,
    name: &str,
    subject: &str,
    enrollment: u32,
    requires_lab: bool,
    required_room_type: Option<RoomType>,
    sessions_per_week: u8,
) -> Course {
    Course {
        id: CourseId(id.into()),
        code: id.to_uppercase(),
        name: name.into(),
        subject: subject.into(),
        requires_lab,
        required_room_type,
        enrollment,
        max_students: enrollment + 5,
        min_enrollment: 0,
        sessions_per_week,
        credits: Some(1.0),
        priority_level: None,
        teacher_id: None,
        room_id: None,
        active: true,
    }
}

fn room(id: &str, building: &str, floor: i32, capacity: u32, room_type: RoomType) -> Room {
    Room {
        id: RoomId(id.into()),
        number: id.into(),
        building: building.into(),
        floor,
        capacity,
        room_type,
        allow_sharing: false,
        max_concurrent_classes: 1,
        available: true,
        features: vec![],
    }
}
