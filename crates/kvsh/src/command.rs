//! Shell command parser using nom
//!
//! One command per line, verbs case-insensitive:
//! ```text
//! INSERT <key> <value...>     SEARCH <key>     REMOVE <key>
//! SET <key> <value>           GET <key>
//! SADD <member>               SREM <member>    SISMEMBER <member>
//! DUMP   STATS   HELP   QUIT | EXIT
//! ```

use nom::{
    branch::alt,
    bytes::complete::{tag_no_case, take_while1},
    character::complete::{char, digit1, space0, space1},
    combinator::{all_consuming, map, map_res, opt, recognize, rest, value, verify},
    sequence::{delimited, pair, preceded, separated_pair, terminated},
    IResult,
};

/// A parsed shell command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Insert into both hash tables
    Insert { key: i64, value: String },
    /// Search both hash tables
    Search { key: i64 },
    /// Remove from both hash tables
    Remove { key: i64 },
    /// Cache set
    Set { key: i64, value: i64 },
    /// Cache get
    Get { key: i64 },
    /// Add a member to the string set
    SetAdd(String),
    /// Remove a member from the string set
    SetRemove(String),
    /// Membership check on the string set
    SetContains(String),
    /// Print every structure's contents
    Dump,
    /// Print statistics as JSON
    Stats,
    /// Print command usage
    Help,
    /// Leave the shell
    Quit,
}

/// Usage lines, one per command
pub const USAGE: &[(&str, &str)] = &[
    ("INSERT", "INSERT <key> <value...>"),
    ("SEARCH", "SEARCH <key>"),
    ("REMOVE", "REMOVE <key>"),
    ("SET", "SET <key> <value>"),
    ("GET", "GET <key>"),
    ("SADD", "SADD <member>"),
    ("SREM", "SREM <member>"),
    ("SISMEMBER", "SISMEMBER <member>"),
    ("DUMP", "DUMP"),
    ("STATS", "STATS"),
    ("HELP", "HELP"),
    ("QUIT", "QUIT | EXIT"),
];

/// Parse one input line
///
/// # Returns
/// * `Err(message)` with the usage of the verb when it is known, or a hint
///   to run HELP otherwise
pub fn parse(line: &str) -> Result<Command, String> {
    match all_consuming(delimited(space0, command, space0))(line) {
        Ok((_, cmd)) => Ok(cmd),
        Err(_) => Err(parse_error(line)),
    }
}

fn parse_error(line: &str) -> String {
    let verb = line.split_whitespace().next().unwrap_or("").to_uppercase();
    let verb = if verb == "EXIT" { "QUIT".to_string() } else { verb };
    match USAGE.iter().find(|(name, _)| *name == verb) {
        Some((_, usage)) => format!("usage: {}", usage),
        None => format!("unknown command '{}' (try HELP)", line.trim()),
    }
}

fn command(input: &str) -> IResult<&str, Command> {
    alt((
        map(
            preceded(verb("INSERT"), separated_pair(integer, space1, text)),
            |(key, value)| Command::Insert {
                key,
                value: value.trim_end().to_string(),
            },
        ),
        map(preceded(verb("SEARCH"), integer), |key| Command::Search { key }),
        map(preceded(verb("REMOVE"), integer), |key| Command::Remove { key }),
        map(
            preceded(verb("SET"), separated_pair(integer, space1, integer)),
            |(key, value)| Command::Set { key, value },
        ),
        map(preceded(verb("GET"), integer), |key| Command::Get { key }),
        map(preceded(verb("SADD"), word), |m| Command::SetAdd(m.to_string())),
        map(preceded(verb("SREM"), word), |m| Command::SetRemove(m.to_string())),
        map(preceded(verb("SISMEMBER"), word), |m| {
            Command::SetContains(m.to_string())
        }),
        value(Command::Dump, tag_no_case("DUMP")),
        value(Command::Stats, tag_no_case("STATS")),
        value(Command::Help, tag_no_case("HELP")),
        value(Command::Quit, alt((tag_no_case("QUIT"), tag_no_case("EXIT")))),
    ))(input)
}

/// Verb followed by at least one space
fn verb<'a>(name: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    terminated(tag_no_case(name), space1)
}

/// Signed decimal integer
fn integer(input: &str) -> IResult<&str, i64> {
    map_res(recognize(pair(opt(char('-')), digit1)), |s: &str| {
        s.parse::<i64>()
    })(input)
}

/// Run of non-whitespace characters
fn word(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !c.is_whitespace())(input)
}

/// Rest of the line, which must contain something besides spaces
fn text(input: &str) -> IResult<&str, &str> {
    verify(rest, |s: &str| !s.trim().is_empty())(input)
}
