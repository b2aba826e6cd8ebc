use std::io::{BufRead, Write};
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::display::{write_available_slots, write_reservations, Theme};
use crate::export::write_reservations_csv;
use crate::schedule::{format_long_date, parse_date_key, Event, Granularity, Scheduler, Slot};

/// Book and cancel meeting slots from a browser or the terminal
#[derive(Debug, Parser)]
#[command(name = "meeting-scheduler", version)]
pub struct Cli {
    /// Path to a TOML settings file (defaults to ./scheduler.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Slot spacing, overrides the settings file
    #[arg(long, global = true, value_enum)]
    pub granularity: Option<Granularity>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the booking page and JSON API
    Serve {
        #[arg(short, long)]
        port: Option<u16>,
        #[arg(long)]
        bind: Option<String>,
    },
    /// Interactive booking shell on stdin/stdout
    Shell,
}

/// One line typed into the shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Date(NaiveDate),
    Book(Slot),
    Cancel(Slot),
    Slots,
    Reserved,
    Theme,
    Export,
    Help,
    Quit,
}

pub const SHELL_HELP: &str = "\
Commands:
  date YYYY-MM-DD   select a date (today or later)
  book HH:MM        book a slot on the selected date
  cancel HH:MM      cancel a booking on the selected date
  slots             list open slots for the selected date
  reserved          list every booking
  theme             switch between light and dark display
  export            print every booking as CSV
  help              show this text
  quit              leave the shell";

/// Parses a shell line into a command
pub fn parse_command(line: &str) -> Result<ShellCommand, String> {
    let mut words = line.split_whitespace();
    let Some(keyword) = words.next() else {
        return Err("Empty command".to_string());
    };
    let argument = words.next();
    if words.next().is_some() {
        return Err(format!("Too many arguments for '{}'", keyword));
    }

    let require = |what: &str| argument.ok_or_else(|| format!("'{}' needs {}", keyword, what));

    match keyword.to_ascii_lowercase().as_str() {
        "date" => parse_date_key(require("a date")?)
            .map(ShellCommand::Date)
            .map_err(|e| e.to_string()),
        "book" => require("a time slot")?
            .parse()
            .map(ShellCommand::Book)
            .map_err(|e: crate::SchedulerError| e.to_string()),
        "cancel" => require("a time slot")?
            .parse()
            .map(ShellCommand::Cancel)
            .map_err(|e: crate::SchedulerError| e.to_string()),
        "slots" => Ok(ShellCommand::Slots),
        "reserved" => Ok(ShellCommand::Reserved),
        "theme" => Ok(ShellCommand::Theme),
        "export" => Ok(ShellCommand::Export),
        "help" | "?" => Ok(ShellCommand::Help),
        "quit" | "exit" => Ok(ShellCommand::Quit),
        other => Err(format!("Unknown command '{}', type 'help' for a list", other)),
    }
}

/// Reads commands from `input` until `quit` or end of input
pub fn run_shell<R: BufRead, W: Write>(
    scheduler: &mut Scheduler,
    input: R,
    out: &mut W,
) -> std::io::Result<()> {
    let mut theme = Theme::default();
    writeln!(out, "Meeting scheduler, today is {}", format_long_date(scheduler.today()))?;
    writeln!(out, "Type 'help' for commands.")?;
    write_available_slots(out, scheduler)?;

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                writeln!(out, "error: {}", message)?;
                continue;
            }
        };

        match command {
            ShellCommand::Date(date) => {
                if date < scheduler.today() {
                    writeln!(out, "error: {} is in the past", format_long_date(date))?;
                    continue;
                }
                // Selecting a date cannot fail
                let _ = scheduler.apply(Event::SelectDate(date));
                write_available_slots(out, scheduler)?;
            }
            ShellCommand::Book(slot) => match scheduler.apply(Event::BookSlot(slot)) {
                Ok(()) => write_available_slots(out, scheduler)?,
                Err(err) => writeln!(out, "error: {}", err)?,
            },
            ShellCommand::Cancel(slot) => match scheduler.apply(Event::CancelSlot(slot)) {
                Ok(()) => write_available_slots(out, scheduler)?,
                Err(err) => writeln!(out, "error: {}", err)?,
            },
            ShellCommand::Slots => write_available_slots(out, scheduler)?,
            ShellCommand::Reserved => write_reservations(out, scheduler)?,
            ShellCommand::Theme => {
                theme = theme.toggled();
                writeln!(out, "Display: {:?} (type 'theme' for {})", theme, theme.toggle_label())?;
            }
            ShellCommand::Export => {
                write_reservations_csv(&mut *out, &scheduler.reservations())
                    .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
            }
            ShellCommand::Help => writeln!(out, "{}", SHELL_HELP)?,
            ShellCommand::Quit => break,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{Notification, NotificationQueue};
    use crate::schedule::{DailySchedule, FixedClock};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn run(script: &str) -> (Scheduler, String) {
        let mut scheduler = Scheduler::with_clock(DailySchedule::default(), Box::new(FixedClock(today())));
        let mut out = Vec::new();
        run_shell(&mut scheduler, script.as_bytes(), &mut out).unwrap();
        (scheduler, String::from_utf8(out).unwrap())
    }

    #[test]
    fn parses_known_commands() {
        assert_eq!(parse_command("book 9:00"), Ok(ShellCommand::Book(Slot::at(9, 0))));
        assert_eq!(parse_command("  CANCEL 10:00 "), Ok(ShellCommand::Cancel(Slot::at(10, 0))));
        assert_eq!(parse_command("date 2026-10-18"), Ok(ShellCommand::Date(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap())));
        assert_eq!(parse_command("exit"), Ok(ShellCommand::Quit));
    }

    #[test]
    fn reports_bad_input() {
        assert_eq!(parse_command("book"), Err("'book' needs a time slot".to_string()));
        assert!(parse_command("book 9:00 10:00").unwrap_err().contains("Too many"));
        assert!(parse_command("book noon").unwrap_err().contains("invalid time slot"));
        assert!(parse_command("dance").unwrap_err().contains("Unknown command"));
    }

    #[test]
    fn shell_books_and_cancels() {
        let (scheduler, output) = run("book 09:00\nreserved\ncancel 09:00\nquit\nbook 10:00\n");
        assert!(output.contains("** Reserved meetings (1) **\n  2026-10-16 09:00"));
        assert!(scheduler.reservations().is_empty());
    }

    #[test]
    fn shell_refuses_past_dates_before_forwarding() {
        let (scheduler, output) = run("date 2026-10-01\n");
        assert!(output.contains("error: Thu Oct 01 2026 is in the past"));
        assert_eq!(scheduler.selected_date(), today());
    }

    #[test]
    fn shell_surfaces_scheduler_errors() {
        let (_, output) = run("cancel 11:00\nbook 11:00\nbook 11:00\n");
        assert!(output.contains("error: 11:00 on 2026-10-16 has no reservation to cancel"));
        assert!(output.contains("error: 11:00 on 2026-10-16 is already booked"));
    }

    #[test]
    fn shell_exports_csv_and_toggles_theme() {
        let (_, output) = run("date 2026-10-17\nbook 14:00\nexport\ntheme\n");
        assert!(output.contains("date,slot\n2026-10-17,14:00\n"));
        assert!(output.contains("Display: Dark (type 'theme' for Light mode)"));
    }

    #[test]
    fn shell_notifications_reach_subscribers() {
        let mut scheduler = Scheduler::with_clock(DailySchedule::default(), Box::new(FixedClock(today())));
        let queue = NotificationQueue::new();
        scheduler.subscribe(queue.clone());
        let mut out = Vec::new();
        run_shell(&mut scheduler, "book 12:00\n".as_bytes(), &mut out).unwrap();
        assert_eq!(queue.drain(), vec![Notification::Booked { date: today(), slot: Slot::at(12, 0) }]);
    }
}
