use super::{CliFlags, Command};

#[derive(Debug, PartialEq, Eq)]
pub enum ParseError {
    InvalidValue(String, String),
    MissingValue(String),
    UnknownArg(String),
    /// Flag given to a command that does not take it.
    NotAccepted(String, String),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::InvalidValue(flag, v) => write!(f, "Invalid value for {}: {}", flag, v),
            ParseError::MissingValue(flag) => write!(f, "Missing value for {}", flag),
            ParseError::UnknownArg(s) => write!(f, "Unknown argument: {}", s),
            ParseError::NotAccepted(flag, cmd) => write!(f, "{} is not accepted by {}", flag, cmd),
        }
    }
}

impl std::error::Error for ParseError {}

fn take_value(args: &[String], i: &mut usize) -> Result<String, ParseError> {
    let flag = args[*i].clone();
    *i += 1;
    match args.get(*i) {
        Some(v) if !v.starts_with('-') || v.len() == 1 => Ok(v.clone()),
        _ => Err(ParseError::MissingValue(flag)),
    }
}

pub fn parse(args: &[String]) -> Result<CliFlags, ParseError> {
    let mut flags = CliFlags::default();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => flags.help = true,
            "-v" | "--version" => flags.version = true,
            "-q" | "--quiet" => flags.quiet = true,
            "-u" | "--urandom" => flags.urandom = true,
            "-p" | "--participant" => flags.participant = Some(take_value(args, &mut i)?),
            "-n" | "--username" => flags.username = Some(take_value(args, &mut i)?),
            "-e" | "--entry" => flags.entry = Some(take_value(args, &mut i)?),
            "--home" => flags.home = Some(take_value(args, &mut i)?),
            "--vocab" => flags.vocab = Some(take_value(args, &mut i)?),
            "-t" | "--type" => {
                let v = take_value(args, &mut i)?;
                flags.password_type = Some(
                    v.parse()
                        .map_err(|_| ParseError::InvalidValue("--type".into(), v.clone()))?,
                );
            }
            cmd if flags.command == Command::None && !cmd.starts_with('-') => {
                flags.command = match cmd {
                    "register" => Command::Register,
                    "login" => Command::Login,
                    "experiment" => Command::Experiment,
                    "condition" => Command::Condition,
                    "keypad" => Command::Keypad,
                    "status" => Command::Status,
                    "logout" => Command::Logout,
                    other => return Err(ParseError::UnknownArg(other.to_string())),
                };
            }
            value
                if matches!(flags.command, Command::Experiment | Command::Condition)
                    && flags.value.is_none()
                    && !value.starts_with('-') =>
            {
                flags.value = Some(value.to_string());
            }
            arg => return Err(ParseError::UnknownArg(arg.to_string())),
        }
        i += 1;
    }

    // Register reads slots only after showing the passcode
    if flags.command == Command::Register && flags.entry.is_some() {
        return Err(ParseError::NotAccepted("--entry".into(), "register".into()));
    }

    Ok(flags)
}
