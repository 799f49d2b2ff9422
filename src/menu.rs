use std::collections::VecDeque;
use std::io::{BufRead, Write};

use anyhow::Result;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};
use tracing::debug;

use crate::error::StoreError;
use crate::store::directory::EmployeeDirectory;
use crate::store::ledger::{AttendanceLedger, AttendanceReport};

const RULE: &str = "---------------------------------";

/// Menu entries, in the order they are numbered on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum MenuChoice {
    #[strum(serialize = "Add Employee")]
    AddEmployee,
    #[strum(serialize = "Mark Attendance")]
    MarkAttendance,
    #[strum(serialize = "Display Attendance")]
    DisplayAttendance,
    #[strum(serialize = "Clear Attendance")]
    ClearAttendance,
    #[strum(serialize = "Clear Specific Employee Attendance")]
    ClearEmployeeAttendance,
    #[strum(serialize = "Display Employee Data")]
    DisplayEmployees,
    #[strum(serialize = "Remove Employee")]
    RemoveEmployee,
    #[strum(serialize = "Exit")]
    Exit,
}

impl MenuChoice {
    /// Map the number typed by the user (1-based) to a choice.
    pub fn from_selection(token: &str) -> Option<Self> {
        let n: usize = token.parse().ok()?;
        n.checked_sub(1).and_then(|i| Self::iter().nth(i))
    }
}

enum Flow {
    Continue,
    Quit,
}

/// Line-oriented console session over arbitrary reader/writers.
///
/// Input is consumed as whitespace separated words, so `1 E1 Alice` on one line
/// answers the choice and both prompts at once.
pub struct Menu<R, W, E> {
    input: R,
    out: W,
    err: E,
    pending: VecDeque<String>,
}

impl<R: BufRead, W: Write, E: Write> Menu<R, W, E> {
    pub fn new(input: R, out: W, err: E) -> Self {
        Self {
            input,
            out,
            err,
            pending: VecDeque::new(),
        }
    }

    pub fn run(
        &mut self,
        employees: &mut EmployeeDirectory,
        ledger: &AttendanceLedger,
    ) -> Result<()> {
        writeln!(self.out, "Good morning!")?;

        loop {
            self.print_menu()?;
            let Some(token) = self.prompt("Enter your choice: ")? else {
                debug!("Input closed, leaving menu");
                break;
            };

            let Some(choice) = MenuChoice::from_selection(&token) else {
                writeln!(self.out, "Invalid choice! Please try again.")?;
                continue;
            };

            debug!(%choice, "Menu selection");
            if let Flow::Quit = self.handle(choice, employees, ledger)? {
                break;
            }
        }

        self.out.flush()?;
        Ok(())
    }

    fn print_menu(&mut self) -> Result<()> {
        writeln!(self.out)?;
        for (i, choice) in MenuChoice::iter().enumerate() {
            writeln!(self.out, "{}. {}", i + 1, choice)?;
        }
        Ok(())
    }

    fn handle(
        &mut self,
        choice: MenuChoice,
        employees: &mut EmployeeDirectory,
        ledger: &AttendanceLedger,
    ) -> Result<Flow> {
        match choice {
            MenuChoice::AddEmployee => {
                let Some(id) = self.prompt("Enter Employee ID: ")? else {
                    return Ok(Flow::Quit);
                };
                let Some(name) = self.prompt("Enter Employee Name: ")? else {
                    return Ok(Flow::Quit);
                };
                match employees.add(&id, &name) {
                    Ok(record) => writeln!(self.out, "Employee data added for ID: {}", record.id)?,
                    Err(e) => self.report(&e)?,
                }
            }
            MenuChoice::MarkAttendance => {
                let Some(id) = self.prompt("Enter Employee ID: ")? else {
                    return Ok(Flow::Quit);
                };
                match ledger.mark_attendance(employees, &id) {
                    Ok(punch) => writeln!(
                        self.out,
                        "Attendance marked for employee ID: {}",
                        punch.employee_id
                    )?,
                    Err(e) => self.report(&e)?,
                }
            }
            MenuChoice::DisplayAttendance => match ledger.list_all(employees) {
                Ok(report) => self.print_attendance(report)?,
                Err(e) => self.report(&e)?,
            },
            MenuChoice::ClearAttendance => match ledger.clear_all() {
                Ok(()) => writeln!(self.out, "Attendance records cleared.")?,
                Err(e) => self.report(&e)?,
            },
            MenuChoice::ClearEmployeeAttendance => {
                let Some(id) = self.prompt("Enter Employee ID: ")? else {
                    return Ok(Flow::Quit);
                };
                match ledger.clear_for_employee(&id) {
                    Ok(_) => writeln!(
                        self.out,
                        "Attendance records cleared for employee ID: {}",
                        id
                    )?,
                    Err(e) => self.report(&e)?,
                }
            }
            MenuChoice::DisplayEmployees => match employees.list_all() {
                Ok(records) => {
                    writeln!(self.out, "Employee ID\tEmployee Name")?;
                    writeln!(self.out, "{}", RULE)?;
                    for record in records {
                        writeln!(self.out, "{:>12}\t{}", record.id, record.name)?;
                    }
                }
                Err(e) => self.report(&e)?,
            },
            MenuChoice::RemoveEmployee => {
                let Some(id) = self.prompt("Enter Employee ID: ")? else {
                    return Ok(Flow::Quit);
                };
                match employees.remove(&id) {
                    Ok(_) => writeln!(self.out, "Employee ID {} removed from the system.", id)?,
                    Err(e) => self.report(&e)?,
                }
            }
            MenuChoice::Exit => {
                writeln!(self.out, "Exiting the program.")?;
                return Ok(Flow::Quit);
            }
        }

        Ok(Flow::Continue)
    }

    fn print_attendance(&mut self, report: AttendanceReport) -> Result<()> {
        match report {
            AttendanceReport::NoEmployees => self.no_employees_notice()?,
            AttendanceReport::NoRecords => writeln!(self.out, "No attendance records found.")?,
            AttendanceReport::Punches(punches) => {
                writeln!(self.out, "Employee ID\tAttendance Time")?;
                writeln!(self.out, "{}", RULE)?;
                for punch in punches {
                    writeln!(self.out, "{:>12}\t{}", punch.employee_id, punch.local_time())?;
                }
            }
            AttendanceReport::Unreadable {
                error,
                no_employees,
            } => {
                self.report(&error)?;
                if no_employees {
                    self.no_employees_notice()?;
                }
            }
        }
        Ok(())
    }

    fn no_employees_notice(&mut self) -> Result<()> {
        writeln!(self.out, "No employees added. Please add employees first.")?;
        Ok(())
    }

    /// File failures go to the error stream; everything else is regular feedback.
    fn report(&mut self, e: &StoreError) -> Result<()> {
        if e.is_io() {
            writeln!(self.err, "{}", e)?;
        } else {
            writeln!(self.out, "{}", e)?;
        }
        Ok(())
    }

    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.out, "{}", text)?;
        self.out.flush()?;
        self.next_token()
    }

    fn next_token(&mut self) -> Result<Option<String>> {
        while self.pending.is_empty() {
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            self.pending
                .extend(line.split_whitespace().map(str::to_string));
        }
        Ok(self.pending.pop_front())
    }
}
