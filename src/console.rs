use std::time::Instant;

use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::{FramedRead, FramedWrite, LinesCodec, LinesCodecError};
use tracing::debug;

use crate::command::{parse_command, Command, ParseError};
use crate::engine::{today, Engine, EngineError, ErrorKind};
use crate::framing::{CommandLineCodec, Inbound};
use crate::limits::MAX_LINE_LEN;
use crate::model::CalendarDate;
use crate::observability::{command_label, COMMANDS_TOTAL, COMMAND_DURATION_SECONDS};

pub const BANNER: &str = "Vehicle Management System is live.";
pub const FAREWELL: &str = "Vehicle Management System is terminated.";

/// Rendered response to one input line.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Reply {
    pub lines: Vec<String>,
    pub quit: bool,
}

impl Reply {
    fn line(text: impl Into<String>) -> Self {
        Self {
            lines: vec![text.into()],
            quit: false,
        }
    }
}

/// The request handler: owns the engine and turns protocol lines into
/// engine calls and rendered replies.
pub struct Session {
    engine: Engine,
    /// Pinned date; `None` reads the local clock per command.
    today: Option<CalendarDate>,
}

impl Session {
    pub fn new(engine: Engine, today: Option<CalendarDate>) -> Self {
        Self { engine, today }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    fn today(&self) -> CalendarDate {
        self.today.unwrap_or_else(today)
    }

    /// Handle one input line. Blank lines produce an empty reply.
    pub fn handle_line(&mut self, line: &str) -> Reply {
        if line.trim().is_empty() {
            return Reply::default();
        }
        match parse_command(line) {
            Ok(cmd) => {
                let label = command_label(&cmd);
                let start = Instant::now();
                let result = self.execute(cmd);
                metrics::histogram!(COMMAND_DURATION_SECONDS, "command" => label)
                    .record(start.elapsed().as_secs_f64());
                let status = match &result {
                    Ok(_) => "ok",
                    Err(e) => e.kind().label(),
                };
                metrics::counter!(COMMANDS_TOTAL, "command" => label, "status" => status).increment(1);
                result.unwrap_or_else(|e| {
                    debug!(command = label, kind = e.kind().label(), "rejected: {e}");
                    Reply::line(e.to_string())
                })
            }
            Err(e) => {
                debug!("malformed input {line:?}");
                self.reject(e)
            }
        }
    }

    /// Answer a line that never reached the parser, or failed in it.
    pub fn reject(&self, error: ParseError) -> Reply {
        metrics::counter!(
            COMMANDS_TOTAL,
            "command" => "unparsed",
            "status" => ErrorKind::MalformedInput.label()
        )
        .increment(1);
        debug!("rejected: {error}");
        Reply::line(error.to_string())
    }

    fn execute(&mut self, cmd: Command) -> Result<Reply, EngineError> {
        let today = self.today();
        match cmd {
            Command::AddVehicle {
                plate,
                obtained,
                make,
                mileage,
            } => {
                let vehicle = self
                    .engine
                    .add_vehicle(&plate, obtained, make, mileage, today)?;
                Ok(Reply::line(format!("{} has been added to the fleet.", vehicle.borrow())))
            }
            Command::DeleteVehicle { plate } => {
                let vehicle = self.engine.remove_vehicle(&plate)?;
                Ok(Reply::line(format!("{} has been removed from the fleet.", vehicle.borrow())))
            }
            Command::Book {
                begin,
                end,
                plate,
                employee,
            } => {
                let booking = self.engine.book(begin, end, &plate, employee, today)?;
                Ok(Reply::line(format!("{booking} booked.")))
            }
            Command::Cancel { begin, end, plate } => {
                let booking = self.engine.cancel(begin, end, &plate)?;
                Ok(Reply::line(format!(
                    "{}:{begin} ~ {end} has been canceled.",
                    booking.plate()
                )))
            }
            Command::Return { end, plate, mileage } => {
                let trip = self.engine.return_vehicle(end, &plate, mileage)?;
                Ok(Reply::line(format!("Trip completed: {trip}")))
            }
            Command::PrintFleet => Ok(self.print_fleet()),
            Command::PrintByVehicle => Ok(self.print_by_vehicle()),
            Command::PrintByDept => Ok(self.print_by_dept()),
            Command::PrintTrips => Ok(self.print_trips()),
            Command::Quit => Ok(Reply {
                lines: vec![FAREWELL.to_string()],
                quit: true,
            }),
        }
    }

    fn print_fleet(&mut self) -> Reply {
        let vehicles = self.engine.fleet_by_make();
        if vehicles.is_empty() {
            return Reply::line("The fleet is empty (No cars in fleet).");
        }
        let mut lines = vec!["*List of vehicles ordered by make and date obtained.".to_string()];
        lines.extend(vehicles.iter().map(|v| v.borrow().to_string()));
        lines.push("*end of list.".to_string());
        Reply { lines, quit: false }
    }

    fn print_by_vehicle(&mut self) -> Reply {
        let bookings = self.engine.bookings_by_vehicle();
        if bookings.is_empty() {
            return Reply::line("There is no booking record.");
        }
        let mut lines =
            vec!["*List of reservations ordered by license plate number and beginning date.".to_string()];
        lines.extend(bookings.iter().map(ToString::to_string));
        lines.push("*end of list.".to_string());
        Reply { lines, quit: false }
    }

    fn print_by_dept(&mut self) -> Reply {
        let runs = self.engine.bookings_by_dept();
        if runs.is_empty() {
            return Reply::line("There is no booking record.");
        }
        let mut lines = vec!["*List of reservations ordered by department and employee.".to_string()];
        for (dept, bookings) in runs {
            lines.push(format!("--{dept}--"));
            lines.extend(bookings.iter().map(ToString::to_string));
        }
        lines.push("*end of list.".to_string());
        Reply { lines, quit: false }
    }

    fn print_trips(&self) -> Reply {
        let trips = self.engine.trips_by_end_date();
        if trips.is_empty() {
            return Reply::line("No trips have been completed yet.");
        }
        let mut lines = vec!["*** Completed trips (sorted by end date) ***".to_string()];
        lines.extend(trips.iter().map(ToString::to_string));
        Reply { lines, quit: false }
    }
}

/// Drive a session over a line stream until QUIT or end of input.
/// One command is fully handled and answered before the next is read.
/// Bad lines are answered and skipped; only I/O errors end the run.
pub async fn run<R, W>(reader: R, writer: W, session: &mut Session) -> Result<(), LinesCodecError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut input = FramedRead::new(reader, CommandLineCodec::new(MAX_LINE_LEN));
    let mut output = FramedWrite::new(writer, LinesCodec::new());

    output.send(BANNER).await?;
    while let Some(frame) = input.next().await {
        let reply = match frame? {
            Inbound::Line(line) => session.handle_line(&line),
            Inbound::TooLong => session.reject(ParseError::LineTooLong(MAX_LINE_LEN)),
            Inbound::NotUtf8 => session.reject(ParseError::NotUtf8),
        };
        for text in &reply.lines {
            output.send(text.as_str()).await?;
        }
        if reply.quit {
            break;
        }
    }
    Ok(())
}
