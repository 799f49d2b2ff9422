use std::io;

use anyhow::{Context, Result};

mod config;
mod error;
mod menu;
mod model;
mod store;
mod utils;

use config::Config;
use menu::Menu;
use store::directory::EmployeeDirectory;
use store::ledger::AttendanceLedger;

use tracing::info;
use tracing_appender::rolling;

fn main() -> Result<()> {
    let config = Config::from_env();

    std::fs::create_dir_all(&config.log_dir)
        .with_context(|| format!("creating log directory {}", config.log_dir.display()))?;

    // Rolling daily log; the console belongs to the menu
    let file_appender = rolling::daily(&config.log_dir, &config.log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(config.log_level)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .init();

    info!("Attendance tracker starting...");

    let mut employees = EmployeeDirectory::load(&config.employee_data_file);
    let ledger = AttendanceLedger::new(&config.attendance_file);
    info!(
        employees = %employees.file().label(),
        attendance = %ledger.file().label(),
        known = employees.total(),
        "Stores ready"
    );

    let stdin = io::stdin();
    let mut menu = Menu::new(stdin.lock(), io::stdout(), io::stderr());
    menu.run(&mut employees, &ledger)
        .context("console I/O failed")?;

    info!("Attendance tracker exiting");
    Ok(())
}
