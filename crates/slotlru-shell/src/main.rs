//! slru - interactive shell over the slotlru LRU cache

mod command;
mod handler;
mod reply;

use std::fs::File;
use std::io::{self, BufRead, BufReader, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use slotlru::LruCache;
use tracing::{info, warn};

use crate::command::Command;
use crate::handler::CommandHandler;
use crate::reply::Reply;

/// Commands replayed by `--demo` against a capacity-3 cache
const DEMO_SCRIPT: &[&str] = &[
    "PUT k1 v1",
    "PUT k2 v2",
    "PUT k3 v3",
    "GET k1",
    "PUT k4 v4",
    "DEL k3",
    "GET k3",
];

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Cache capacity (number of entries)
    #[arg(short, long, env = "SLRU_CAPACITY", default_value_t = 1024)]
    capacity: usize,

    /// Read commands from a file instead of stdin
    #[arg(short, long, env = "SLRU_SCRIPT")]
    script: Option<PathBuf>,

    /// Replay a short walkthrough against a capacity-3 cache and exit
    #[arg(long)]
    demo: bool,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, env = "SLRU_LOG", default_value = "warn")]
    log_level: String,

    /// Suppress the banner and prompt
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_level)),
        )
        .with_writer(io::stderr)
        .init();

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.demo {
        return run_demo(&mut out);
    }

    let cache = LruCache::new(args.capacity).context("invalid --capacity")?;
    info!("Cache capacity: {}", args.capacity);
    let mut handler = CommandHandler::new(cache);

    match &args.script {
        Some(path) => {
            info!("Running script {}", path.display());
            let file = File::open(path)
                .with_context(|| format!("failed to open script {}", path.display()))?;
            run_session(&mut handler, BufReader::new(file), &mut out, false)
        }
        None => {
            let stdin = io::stdin();
            let interactive = !args.quiet && stdin.is_terminal();
            if interactive {
                writeln!(
                    out,
                    "slru {} - LRU cache shell (capacity {}). Type QUIT to exit.",
                    env!("CARGO_PKG_VERSION"),
                    args.capacity
                )?;
            }
            run_session(&mut handler, stdin.lock(), &mut out, interactive)
        }
    }
}

/// Read commands line by line until EOF or QUIT, writing one reply per command
fn run_session<R: BufRead, W: Write>(
    handler: &mut CommandHandler,
    mut input: R,
    out: &mut W,
    prompt: bool,
) -> Result<()> {
    let mut buf = Vec::new();

    loop {
        if prompt {
            write!(out, "slru> ")?;
            out.flush()?;
        }

        buf.clear();
        let n = input
            .read_until(b'\n', &mut buf)
            .context("failed to read command")?;
        if n == 0 {
            return Ok(());
        }

        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line,
            Err(e) => {
                warn!("Invalid UTF-8 in command: {}", e);
                writeln!(out, "{}", Reply::err("invalid UTF-8 in command"))?;
                continue;
            }
        };

        let cmd = match Command::parse(line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(e) => {
                warn!("Parse error: {}", e);
                writeln!(out, "{}", Reply::err(e))?;
                continue;
            }
        };

        let quit = cmd == Command::Quit;
        writeln!(out, "{}", handler.handle(cmd))?;
        if quit {
            return Ok(());
        }
    }
}

fn run_demo<W: Write>(out: &mut W) -> Result<()> {
    let cache = LruCache::new(3).context("demo cache")?;
    let mut handler = CommandHandler::new(cache);

    for line in DEMO_SCRIPT {
        let Some(cmd) = Command::parse(line)? else {
            continue;
        };
        let reply = handler.handle(cmd);
        writeln!(out, "slru> {}", line)?;
        writeln!(out, "{}", reply)?;
        writeln!(out, "   contents: {}", handler.cache())?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn session(capacity: usize, input: impl AsRef<[u8]>) -> String {
        let mut handler = CommandHandler::new(LruCache::new(capacity).unwrap());
        let mut out = Vec::new();
        run_session(&mut handler, Cursor::new(input.as_ref()), &mut out, false).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_session_replies_per_command() {
        let output = session(2, "PUT a 1\n\n# comment\nGET a\nGET b\n");
        assert_eq!(output, "OK\n\"1\"\n(nil)\n");
    }

    #[test]
    fn test_session_reports_errors_and_continues() {
        let output = session(2, "BOGUS\nPUT \"x\nPING\n");
        assert_eq!(
            output,
            "(error) ERR unknown command 'BOGUS'\n\
             (error) ERR unterminated quoted string\n\
             PONG\n"
        );
    }

    #[test]
    fn test_session_survives_invalid_utf8() {
        let output = session(2, b"PUT a 1\nPUT b \xff\nGET a\n");
        assert_eq!(output, "OK\n(error) ERR invalid UTF-8 in command\n\"1\"\n");
    }

    #[test]
    fn test_session_accepts_crlf_and_missing_final_newline() {
        let output = session(2, "PUT a 1\r\nGET a");
        assert_eq!(output, "OK\n\"1\"\n");
    }

    #[test]
    fn test_session_stops_at_quit() {
        let output = session(2, "PING\nQUIT\nPING\n");
        assert_eq!(output, "PONG\nBYE\n");
    }

    #[test]
    fn test_demo_output() {
        let mut out = Vec::new();
        run_demo(&mut out).unwrap();
        let output = String::from_utf8(out).unwrap();

        assert!(output.contains("contents: [(k3, v3)(k2, v2)(k1, v1)]"));
        assert!(output.contains("contents: [(k1, v1)(k3, v3)(k2, v2)]"));
        assert!(output.contains("contents: [(k4, v4)(k1, v1)(k3, v3)]"));
        assert!(output.ends_with("slru> GET k3\n(nil)\n   contents: [(k4, v4)(k1, v1)]\n"));
    }
}
