//! kvsh - interactive shell over the kvtable hash tables and the kvcache LRU cache

mod command;
mod reply;
mod session;

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::Parser;
use kvtable::{TableConfig, DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR, DEFAULT_SET_CAPACITY};
use tracing::{debug, info, warn};

use crate::reply::Reply;
use crate::session::{Session, SessionConfig};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Initial slots / buckets for both hash tables
    #[arg(long, default_value_t = DEFAULT_CAPACITY, value_parser = positive)]
    table_capacity: usize,

    /// Load-factor threshold that triggers a rehash, in (0, 1)
    #[arg(long, default_value_t = DEFAULT_LOAD_FACTOR)]
    load_factor: f64,

    /// LRU cache capacity (number of entries)
    #[arg(short, long, default_value_t = 16, value_parser = positive)]
    cache_capacity: usize,

    /// Initial capacity of the string set
    #[arg(long, default_value_t = DEFAULT_SET_CAPACITY, value_parser = positive)]
    set_capacity: usize,

    /// No banner or prompt (for piped input)
    #[arg(short, long)]
    quiet: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

fn positive(s: &str) -> std::result::Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("must be greater than 0".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing; stdout is reserved for replies
    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(io::stderr)
        .init();

    let config = SessionConfig {
        table: TableConfig::new(args.table_capacity, args.load_factor),
        cache_capacity: args.cache_capacity,
        set_capacity: args.set_capacity,
    };
    let mut session = Session::new(&config).context("invalid shell configuration")?;

    info!("Starting kvsh v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Tables: capacity {}, load factor {}",
        config.table.initial_capacity, config.table.load_factor_threshold
    );
    info!("Cache capacity: {}", config.cache_capacity);

    if !args.quiet {
        println!("kvsh {} - type HELP for commands", env!("CARGO_PKG_VERSION"));
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    run(&mut session, stdin.lock(), stdout.lock(), !args.quiet)?;

    info!("Session closed");
    Ok(())
}

/// Read commands until QUIT or end of input, then print the GET results
fn run<R: BufRead, W: Write>(
    session: &mut Session,
    mut input: R,
    mut output: W,
    prompt: bool,
) -> io::Result<()> {
    let mut buf = Vec::new();

    loop {
        if prompt {
            write!(output, "> ")?;
            output.flush()?;
        }

        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            break;
        }

        // Bad bytes become U+FFFD instead of ending the session
        let line = String::from_utf8_lossy(&buf);
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let reply = match command::parse(trimmed) {
            Ok(cmd) => {
                debug!(?cmd, "Command");
                session.handle(cmd)
            }
            Err(e) => {
                warn!("Parse error: {}", e);
                Reply::Error(e)
            }
        };

        if reply == Reply::Quit {
            break;
        }
        writeln!(output, "{}", reply)?;
    }

    let results = session.get_results();
    if !results.is_empty() {
        let joined: Vec<String> = results.iter().map(i64::to_string).collect();
        writeln!(output, "GET results: {}", joined.join(" "))?;
    }
    output.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(&SessionConfig {
            table: TableConfig::default(),
            cache_capacity: 2,
            set_capacity: 4,
        })
        .unwrap()
    }

    fn transcript(script: impl AsRef<[u8]>) -> String {
        let mut session = session();
        let mut out = Vec::new();
        run(&mut session, script.as_ref(), &mut out, false).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_run_lru_queries() {
        let out = transcript("SET 1 1\nSET 2 2\nGET 1\nSET 3 3\nGET 2\nGET 3\nGET 1\n");
        assert!(out.ends_with("GET results: 1 -1 3 1\n"));
        assert!(out.contains("evicted key=2 value=2"));
    }

    #[test]
    fn test_run_stops_at_quit() {
        let out = transcript("GET 5\nQUIT\nGET 6\n");
        assert!(out.contains("get key=5 value=-1"));
        assert!(!out.contains("key=6"));
        assert!(out.ends_with("GET results: -1\n"));
    }

    #[test]
    fn test_run_reports_parse_errors() {
        let out = transcript("SET 1\n\nBOGUS\n");
        assert_eq!(
            out,
            "ERR usage: SET <key> <value>\nERR unknown command 'BOGUS' (try HELP)\n"
        );
    }

    #[test]
    fn test_run_survives_invalid_utf8() {
        let out = transcript(b"SET 1 1\nGET 1\nSADD caf\xe9\nGET 1\n");
        assert!(out.contains("added 'caf\u{FFFD}'"));
        assert!(out.ends_with("GET results: 1 1\n"));
    }

    #[test]
    fn test_run_prompt() {
        let mut session = session();
        let mut out = Vec::new();
        run(&mut session, "HELP\n".as_bytes(), &mut out, true).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with("> "));
        assert!(out.contains("INSERT <key> <value...>"));
    }

    #[test]
    fn test_positive() {
        assert_eq!(positive("3"), Ok(3));
        assert!(positive("0").is_err());
        assert!(positive("-1").is_err());
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from(["kvsh", "--cache-capacity", "4", "--quiet"]).unwrap();
        assert_eq!(args.cache_capacity, 4);
        assert_eq!(args.table_capacity, 8);
        assert!(args.quiet);
        assert!(Args::try_parse_from(["kvsh", "--cache-capacity", "0"]).is_err());
    }
}
