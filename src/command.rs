use crate::limits::MAX_PLATE_LEN;
use crate::model::*;

/// Parsed command from one protocol line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddVehicle {
        plate: String,
        obtained: CalendarDate,
        make: Make,
        mileage: u32,
    },
    DeleteVehicle {
        plate: String,
    },
    Book {
        begin: CalendarDate,
        end: CalendarDate,
        plate: String,
        employee: Employee,
    },
    Cancel {
        begin: CalendarDate,
        end: CalendarDate,
        plate: String,
    },
    Return {
        end: CalendarDate,
        plate: String,
        mileage: u32,
    },
    PrintFleet,
    PrintByVehicle,
    PrintByDept,
    PrintTrips,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    Empty,
    UnknownVerb(String),
    WrongArity(&'static str, usize, usize),
    BadDate(String),
    BadNumber(String),
    UnknownMake(String),
    UnknownEmployee(String),
    PlateTooLong(String),
    LineTooLong(usize),
    NotUtf8,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Empty => write!(f, "empty command"),
            ParseError::UnknownVerb(v) => write!(f, "{v} - invalid command!"),
            ParseError::WrongArity(verb, expected, got) => {
                write!(f, "{verb} - invalid command! expected {expected} arguments, got {got}")
            }
            ParseError::BadDate(s) => write!(f, "{s} - invalid date format, expected M/D/YYYY."),
            ParseError::BadNumber(s) => write!(f, "{s} - invalid number."),
            ParseError::UnknownMake(s) => write!(f, "{s} - invalid make."),
            ParseError::UnknownEmployee(s) => write!(f, "{s} not an eligible employee to book."),
            ParseError::PlateTooLong(s) => write!(f, "{s} - license plate too long."),
            ParseError::LineTooLong(max) => {
                write!(f, "line longer than {max} bytes - invalid command!")
            }
            ParseError::NotUtf8 => write!(f, "line is not valid UTF-8 - invalid command!"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse one line. Verbs are case-insensitive and accept the short forms
/// (`A`, `D`, `B`, `C`, `R`, `PF`, `PR`, `PD`, `PT`, `Q`).
pub fn parse_command(line: &str) -> Result<Command, ParseError> {
    let mut tokens = line.split_whitespace();
    let Some(verb) = tokens.next() else {
        return Err(ParseError::Empty);
    };
    let args: Vec<&str> = tokens.collect();

    match verb.to_ascii_uppercase().as_str() {
        "ADD" | "A" => {
            let [plate, obtained, make, mileage] = arity::<4>("ADD", &args)?;
            Ok(Command::AddVehicle {
                plate: parse_plate(plate)?,
                obtained: parse_date(obtained)?,
                make: make
                    .parse()
                    .map_err(|_| ParseError::UnknownMake(make.to_string()))?,
                mileage: parse_mileage(mileage)?,
            })
        }
        "DELETE" | "D" => {
            let [plate] = arity::<1>("DELETE", &args)?;
            Ok(Command::DeleteVehicle {
                plate: parse_plate(plate)?,
            })
        }
        "BOOK" | "B" => {
            let [begin, end, plate, employee] = arity::<4>("BOOK", &args)?;
            Ok(Command::Book {
                begin: parse_date(begin)?,
                end: parse_date(end)?,
                plate: parse_plate(plate)?,
                employee: employee
                    .parse()
                    .map_err(|_| ParseError::UnknownEmployee(employee.to_string()))?,
            })
        }
        "CANCEL" | "C" => {
            let [begin, end, plate] = arity::<3>("CANCEL", &args)?;
            Ok(Command::Cancel {
                begin: parse_date(begin)?,
                end: parse_date(end)?,
                plate: parse_plate(plate)?,
            })
        }
        "RETURN" | "R" => {
            let [end, plate, mileage] = arity::<3>("RETURN", &args)?;
            Ok(Command::Return {
                end: parse_date(end)?,
                plate: parse_plate(plate)?,
                mileage: parse_mileage(mileage)?,
            })
        }
        "PRINT-FLEET" | "PF" => {
            arity::<0>("PRINT-FLEET", &args)?;
            Ok(Command::PrintFleet)
        }
        "PRINT-BY-VEHICLE" | "PR" => {
            arity::<0>("PRINT-BY-VEHICLE", &args)?;
            Ok(Command::PrintByVehicle)
        }
        "PRINT-BY-DEPT" | "PD" => {
            arity::<0>("PRINT-BY-DEPT", &args)?;
            Ok(Command::PrintByDept)
        }
        "PRINT-TRIPS" | "PT" => {
            arity::<0>("PRINT-TRIPS", &args)?;
            Ok(Command::PrintTrips)
        }
        "QUIT" | "Q" => {
            arity::<0>("QUIT", &args)?;
            Ok(Command::Quit)
        }
        _ => Err(ParseError::UnknownVerb(verb.to_string())),
    }
}

fn arity<'a, const N: usize>(verb: &'static str, args: &[&'a str]) -> Result<[&'a str; N], ParseError> {
    <[&str; N]>::try_from(args).map_err(|_| ParseError::WrongArity(verb, N, args.len()))
}

fn parse_date(s: &str) -> Result<CalendarDate, ParseError> {
    s.parse().map_err(|_| ParseError::BadDate(s.to_string()))
}

fn parse_mileage(s: &str) -> Result<u32, ParseError> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::BadNumber(s.to_string()));
    }
    s.parse().map_err(|_| ParseError::BadNumber(s.to_string()))
}

fn parse_plate(s: &str) -> Result<String, ParseError> {
    if s.len() > MAX_PLATE_LEN {
        return Err(ParseError::PlateTooLong(s.to_string()));
    }
    Ok(s.to_string())
}
