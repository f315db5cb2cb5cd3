use criterion::{black_box, criterion_group, criterion_main, Criterion};

use master_scheduler::solver::{self, CancellationToken};
use master_scheduler::types::{
    ClockTime, Course, CourseId, Enrollment, Room, RoomId, RoomType, SchedulerConfiguration,
    Student, StudentId, Teacher, TeacherId,
};

fn bench_fixture() -> (Vec<Course>, Vec<Teacher>, Vec<Room>, Vec<Student>, Vec<Enrollment>, SchedulerConfiguration) {
    let teachers: Vec<Teacher> = (0..6)
        .map(|i| Teacher {
            id: TeacherId(format!("t{i}")),
            name: format!("Teacher {i}"),
            department: "Math".into(),
            certifications: vec!["Math".into()],
            planning_period: None,
            max_periods_per_day: 7,
        })
        .collect();

    let courses: Vec<Course> = (0..12)
        .map(|i| Course {
            id: CourseId(format!("c{i}")),
            code: format!("C{i}"),
            name: format!("Course {i}"),
            subject: "Math".into(),
            requires_lab: false,
            required_room_type: None,
            enrollment: 20,
            max_students: 25,
            min_enrollment: 0,
            sessions_per_week: 5,
            credits: Some(1.0),
            priority_level: None,
            teacher_id: Some(TeacherId(format!("t{}", i % 6))),
            room_id: None,
            active: true,
        })
        .collect();

    let rooms: Vec<Room> = (0..4)
        .map(|i| Room {
            id: RoomId(format!("r{i}")),
            number: format!("10{i}"),
            building: "Main".into(),
            floor: 1,
            capacity: 30,
            room_type: RoomType::Classroom,
            allow_sharing: false,
            max_concurrent_classes: 1,
            available: true,
            features: vec![],
        })
        .collect();

    let students: Vec<Student> = (0..40)
        .map(|i| Student {
            id: StudentId(format!("s{i}")),
            name: format!("Student {i}"),
            grade_level: 10,
            gpa: None,
            has_iep: false,
            has_504: false,
        })
        .collect();

    let enrollments = Vec::new();

    let mut config = SchedulerConfiguration::default();
    config.earliest_start = ClockTime::hm(7, 30);
    config.latest_end = ClockTime::hm(15, 0);
    config.time_budget_secs = 2;
    config.unimproved_seconds_budget = 1;

    (courses, teachers, rooms, students, enrollments, config)
}

fn solve_benchmark(c: &mut Criterion) {
    let (courses, teachers, rooms, students, enrollments, config) = bench_fixture();
    let schedule_id = master_scheduler::types::ScheduleId::from("bench");

    c.bench_function("solve_small_school", |b| {
        b.iter(|| {
            let result = solver::solve(
                &schedule_id,
                black_box(&courses),
                black_box(&teachers),
                black_box(&rooms),
                black_box(&enrollments),
                black_box(&students),
                black_box(&config),
                &CancellationToken::new(),
            );
            black_box(result)
        })
    });
}

criterion_group!(benches, solve_benchmark);
criterion_main!(benches);
