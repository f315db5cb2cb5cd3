use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use master_scheduler::feasibility;
use master_scheduler::lifecycle::{
    GenerateScheduleRequest, InMemoryScheduleRepository, LifecycleManager, ScheduleRepository,
};
use master_scheduler::matcher;
use master_scheduler::solver::CancellationToken;
use master_scheduler::types::{ScheduleId, ScheduleStatus};

#[path = "../demos/sample.rs"]
mod sample;

#[derive(Parser)]
#[command(name = "master-scheduler")]
#[command(about = "Constraint-based K-12 master schedule generator")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline (match, solve, validate, publish) on bundled sample data
    Demo,
    /// Run the feasibility analyzer on sample data and report violations
    Analyze,
    /// Bind sample courses to teachers and report the resulting workload
    MatchTeachers,
    /// Generate a schedule from sample data and print the validation summary
    Solve {
        /// Time budget in seconds
        #[arg(long, default_value_t = 30)]
        time_budget: u64,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Demo => run_demo(),
        Commands::Analyze => run_analyze(),
        Commands::MatchTeachers => run_match(),
        Commands::Solve { time_budget } => run_solve(time_budget),
    }
}

fn run_analyze() -> Result<()> {
    println!("{}", "Feasibility Analysis".bold().cyan());
    println!("{}", "─".repeat(40));

    let data = sample::load();
    let report = feasibility::analyze(&data.courses, &data.teachers, &data.rooms, &data.config);

    if report.violations.is_empty() {
        println!("{}", "No feasibility violations found.".green());
        return Ok(());
    }

    for violation in &report.violations {
        let label = match violation.severity {
            master_scheduler::types::Severity::Critical => "CRITICAL".red().bold(),
            master_scheduler::types::Severity::High => "HIGH".red(),
            master_scheduler::types::Severity::Medium => "MEDIUM".yellow(),
            master_scheduler::types::Severity::Low => "LOW".normal(),
            master_scheduler::types::Severity::Info => "INFO".normal(),
        };
        println!("[{label}] {}: {}", violation.entity, violation.description);
    }
    println!(
        "\n{} violations, can_auto_fix={}",
        report.violations.len(),
        report.can_auto_fix
    );

    Ok(())
}

fn run_match() -> Result<()> {
    println!("{}", "Teacher-Course Matching".bold().cyan());
    println!("{}", "─".repeat(40));

    let mut data = sample::load();
    let result = matcher::assign_teachers(&mut data.courses, &data.teachers, &data.config);

    println!("{} bindings made", result.bindings.len().to_string().green());
    for (course_id, teacher_id) in &result.bindings {
        println!("  {} -> {}", course_id, teacher_id);
    }
    if !result.failures.is_empty() {
        println!("{}", format!("{} failures", result.failures.len()).red());
        for failure in &result.failures {
            println!("  {}: {:?}", failure.course_id, failure.reason);
        }
    }

    Ok(())
}

fn run_solve(time_budget: u64) -> Result<()> {
    println!("{}", "Schedule Generation".bold().cyan());
    println!("{}", "─".repeat(40));

    let mut data = sample::load();
    data.config.time_budget_secs = time_budget;
    matcher::assign_teachers(&mut data.courses, &data.teachers, &data.config);

    let repo = InMemoryScheduleRepository::new(
        data.teachers.clone(),
        data.courses.clone(),
        data.rooms.clone(),
        data.students.clone(),
        data.enrollments.clone(),
    );
    let manager = LifecycleManager::new(repo);

    let progress = ProgressBar::new_spinner();
    progress.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}").unwrap());
    progress.set_message("Solving...");
    progress.enable_steady_tick(std::time::Duration::from_millis(100));

    let request = GenerateScheduleRequest {
        schedule_id: ScheduleId::from("demo-schedule"),
        schedule_name: "Demo Schedule".to_string(),
        academic_year: Some("2026-2027".to_string()),
        config: data.config,
    };

    let result = manager
        .generate(request, &CancellationToken::new())
        .context("schedule generation failed")?;

    progress.finish_and_clear();

    println!(
        "{}",
        format!("Generated schedule {} -> {:?}", result.schedule_id, result.status).green()
    );
    println!("  Score:    {:.1}", result.summary_score);
    println!("  Duration: {}ms", result.duration_ms);
    for (severity, count) in &result.severity_counts {
        if *count > 0 {
            println!("  {:?}: {}", severity, count);
        }
    }
    for warning in &result.warnings {
        println!("  {} {}", "warning:".yellow(), warning);
    }

    Ok(())
}

fn run_demo() -> Result<()> {
    println!("{}", "Master Scheduler Demo".bold().cyan());
    println!("{}", "─".repeat(40));

    let mut data = sample::load();
    println!(
        "Loaded {} students, {} teachers, {} courses, {} rooms",
        data.students.len(),
        data.teachers.len(),
        data.courses.len(),
        data.rooms.len()
    );

    println!("\n{}", "Step 1: feasibility analysis".bold());
    let feasibility_report = feasibility::analyze(&data.courses, &data.teachers, &data.rooms, &data.config);
    println!("  {} violation(s)", feasibility_report.violations.len());

    println!("\n{}", "Step 2: teacher-course matching".bold());
    let match_report = matcher::assign_teachers(&mut data.courses, &data.teachers, &data.config);
    println!(
        "  {} bound, {} unbound",
        match_report.bindings.len(),
        match_report.failures.len()
    );

    println!("\n{}", "Step 3: solving".bold());
    let repo = InMemoryScheduleRepository::new(
        data.teachers.clone(),
        data.courses.clone(),
        data.rooms.clone(),
        data.students.clone(),
        data.enrollments.clone(),
    );
    let manager = LifecycleManager::new(repo);
    let schedule_id = ScheduleId::from("demo-schedule");
    let request = GenerateScheduleRequest {
        schedule_id: schedule_id.clone(),
        schedule_name: "Demo Schedule".to_string(),
        academic_year: Some("2026-2027".to_string()),
        config: data.config,
    };
    let result = manager.generate(request, &CancellationToken::new())?;
    println!("  status={:?} score={:.1}", result.status, result.summary_score);

    println!("\n{}", "Step 4: publish gate".bold());
    match manager.publish(&schedule_id) {
        Ok(()) => println!("  {}", "published".green()),
        Err(err) => println!("  {} {}", "refused:".red(), err),
    }

    let published = manager.repository().find_schedule(&schedule_id).unwrap();
    if published.status == ScheduleStatus::Published {
        println!("{}", "\n✓ Schedule generated and published successfully".green().bold());
    } else {
        println!("{}", "\n✗ Schedule left in review; see conflicts above".yellow().bold());
    }

    Ok(())
}
