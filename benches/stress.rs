use std::time::{Duration, Instant};

use chrono::{Days, NaiveDate};
use strum::IntoEnumIterator;

use fleetbook::engine::{Engine, Policy};
use fleetbook::model::{CalendarDate, Employee, Make};

// ── Helpers ──────────────────────────────────────────────────

fn percentile(sorted: &[Duration], p: f64) -> Duration {
    if sorted.is_empty() {
        return Duration::ZERO;
    }
    let idx = ((sorted.len() as f64) * p / 100.0) as usize;
    sorted[idx.min(sorted.len() - 1)]
}

fn print_latency(label: &str, latencies: &mut [Duration]) {
    latencies.sort();
    let total: Duration = latencies.iter().sum();
    let avg = total / latencies.len() as u32;
    println!("  {label}:");
    println!(
        "    n={}, avg={:.2}us, p50={:.2}us, p95={:.2}us, p99={:.2}us, max={:.2}us",
        latencies.len(),
        avg.as_secs_f64() * 1e6,
        percentile(latencies, 50.0).as_secs_f64() * 1e6,
        percentile(latencies, 95.0).as_secs_f64() * 1e6,
        percentile(latencies, 99.0).as_secs_f64() * 1e6,
        latencies.last().unwrap().as_secs_f64() * 1e6,
    );
}

const VEHICLES: usize = 64;
const BOOKINGS: usize = 16_000;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
}

fn day(offset: usize) -> CalendarDate {
    CalendarDate::from_naive(today().checked_add_days(Days::new(offset as u64)).unwrap())
}

fn plate(i: usize) -> String {
    format!("BN{i:04}")
}

/// Slot `i` is one single-day booking. Each day hosts one booking per
/// employee, each on a different vehicle, so no slot conflicts another.
fn slot(i: usize, employees: &[Employee]) -> (CalendarDate, String, Employee) {
    let per_day = employees.len();
    (day(i / per_day), plate(i % VEHICLES), employees[i % per_day])
}

// ── Phases ───────────────────────────────────────────────────

fn setup(engine: &mut Engine) {
    let obtained = CalendarDate::new(6, 1, 2020);
    let makes: Vec<Make> = Make::iter().collect();
    for i in 0..VEHICLES {
        engine
            .add_vehicle(&plate(i), obtained, makes[i % makes.len()], 10_000, CalendarDate::from_naive(today()))
            .unwrap();
    }
    println!("  added {} vehicles", engine.fleet().len());
}

fn phase1_sequential_booking(engine: &mut Engine, employees: &[Employee]) {
    let now = CalendarDate::from_naive(today());
    let mut latencies = Vec::with_capacity(BOOKINGS);
    let start = Instant::now();
    for i in 0..BOOKINGS {
        let (date, plate, employee) = slot(i, employees);
        let t = Instant::now();
        engine.book(date, date, &plate, employee, now).unwrap();
        latencies.push(t.elapsed());
    }
    let elapsed = start.elapsed();
    let ops = BOOKINGS as f64 / elapsed.as_secs_f64();
    println!("  {BOOKINGS} bookings in {:.2}s = {ops:.0} ops/sec", elapsed.as_secs_f64());
    print_latency("book", &mut latencies);
}

fn phase2_rejected_booking(engine: &mut Engine, employees: &[Employee]) {
    let now = CalendarDate::from_naive(today());
    let mut latencies = Vec::with_capacity(BOOKINGS / 4);
    let mut rejected = 0usize;
    for i in (0..BOOKINGS).step_by(4) {
        let (date, plate, employee) = slot(i, employees);
        let t = Instant::now();
        if engine.book(date, date, &plate, employee, now).is_err() {
            rejected += 1;
        }
        latencies.push(t.elapsed());
    }
    println!("  {rejected}/{} duplicate bookings rejected", latencies.len());
    print_latency("book (conflict)", &mut latencies);
}

fn phase3_reports(engine: &mut Engine) {
    let mut by_vehicle = Vec::with_capacity(20);
    let mut by_dept = Vec::with_capacity(20);
    for _ in 0..20 {
        let t = Instant::now();
        let n = engine.bookings_by_vehicle().len();
        by_vehicle.push(t.elapsed());
        assert_eq!(n, BOOKINGS);

        let t = Instant::now();
        let runs = engine.bookings_by_dept().len();
        by_dept.push(t.elapsed());
        assert!(runs > 0);
    }
    print_latency("print-by-vehicle", &mut by_vehicle);
    print_latency("print-by-dept", &mut by_dept);
}

fn phase4_returns(engine: &mut Engine) {
    let mut latencies = Vec::with_capacity(VEHICLES);
    for i in 0..VEHICLES {
        let plate = plate(i);
        let end = engine.earliest_booking(&plate).unwrap().end();
        let mileage = engine.vehicle(&plate).unwrap().borrow().mileage() + 120;
        let t = Instant::now();
        engine.return_vehicle(end, &plate, mileage).unwrap();
        latencies.push(t.elapsed());
    }
    println!("  {} trips logged", engine.trips().len());
    print_latency("return", &mut latencies);
}

fn main() {
    let employees: Vec<Employee> = Employee::iter().collect();
    // Long lead time so the run can spread bookings across years.
    let policy = Policy {
        max_advance_months: 1200,
        ..Policy::default()
    };
    let mut engine = Engine::new(policy);

    println!("=== fleetbook stress benchmark ===");
    println!("vehicles: {VEHICLES}, bookings: {BOOKINGS}\n");

    println!("[setup]");
    setup(&mut engine);

    println!("\n[phase 1] sequential booking throughput");
    phase1_sequential_booking(&mut engine, &employees);

    println!("\n[phase 2] conflict check on a full ledger");
    phase2_rejected_booking(&mut engine, &employees);

    println!("\n[phase 3] report sorting");
    phase3_reports(&mut engine);

    println!("\n[phase 4] returns");
    phase4_returns(&mut engine);

    println!("\n=== benchmark complete ===");
}
