//! loginform - submit the login form from a terminal.
//!
//! The terminal stands in for the browser page: prompts fill the
//! `loginForm` controls, alerts are printed, and the navigation target is
//! reported instead of followed.

mod terminal;

use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use loginform_core::{
    Config, Document, FormElement, LoginPage, Storage, SubmitHandler, SubmitOutcome, TOKEN_KEY,
};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use terminal::{TerminalNavigator, TerminalNotifier};

/// Log file name used when `log_dir` is configured
const LOG_FILE: &str = "loginform.log";

const USAGE: &str = "\
Usage: loginform [OPTIONS]

Options:
  --email <ADDR>   Email address to log in with
  --origin <URL>   Origin serving /login (overrides config)
  --token          Print the stored token and exit
  --clear          Remove the stored token and exit
  -h, --help       Print this help";

#[derive(Debug, Default)]
struct Args {
    email: Option<String>,
    origin: Option<String>,
    show_token: bool,
    clear: bool,
    help: bool,
}

impl Args {
    fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Self> {
        let mut parsed = Args::default();
        let mut iter = args.into_iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--email" => {
                    parsed.email = Some(iter.next().context("--email needs a value")?);
                }
                "--origin" => {
                    parsed.origin = Some(iter.next().context("--origin needs a value")?);
                }
                "--token" => parsed.show_token = true,
                "--clear" => parsed.clear = true,
                "-h" | "--help" => parsed.help = true,
                other => anyhow::bail!("Unknown argument: {}\n\n{}", other, USAGE),
            }
        }
        Ok(parsed)
    }
}

/// Initialize the tracing subscriber for logging
fn init_tracing(config: &Config) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::never(dir, LOG_FILE);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args = Args::parse(std::env::args().skip(1))?;
    if args.help {
        println!("{}", USAGE);
        return Ok(ExitCode::SUCCESS);
    }

    let mut config = Config::load()?;
    if let Some(origin) = args.origin.clone() {
        config.origin = origin;
    }

    let _guard = init_tracing(&config);
    info!(origin = %config.origin, storage = ?config.storage, "loginform starting");

    let storage = config.open_storage()?;

    if args.show_token {
        show_token(
            storage.as_ref(),
            &config.origin,
            &mut io::stdout(),
            &mut io::stderr(),
        )?;
        return Ok(ExitCode::SUCCESS);
    }
    if args.clear {
        clear_token(storage.as_ref(), &config.origin, &mut io::stdout())?;
        return Ok(ExitCode::SUCCESS);
    }

    let origin = config.origin_url()?;
    let handler = SubmitHandler::from_config(
        &config,
        storage,
        Arc::new(TerminalNotifier),
        Arc::new(TerminalNavigator::new(origin)),
    )?;

    let mut document = Document::new();
    document.insert(FormElement::login());
    let mut page = LoginPage::attach(document, handler)?;

    let email = match args.email {
        Some(email) => email,
        None => prompt_email(config.last_email.as_deref())?,
    };
    let password = rpassword::prompt_password("Password: ")?;

    page.form_mut().set_value("email", email.as_str())?;
    page.form_mut().set_value("password", password)?;

    let outcome = page.submit().await?;

    if let Err(e) = remember_email(email) {
        warn!(error = %e, "Failed to save config");
    }

    match outcome {
        SubmitOutcome::LoggedIn => Ok(ExitCode::SUCCESS),
        SubmitOutcome::Rejected { status } => {
            info!(status = %status, "Login rejected");
            Ok(ExitCode::FAILURE)
        }
        SubmitOutcome::Ignored => Ok(ExitCode::FAILURE),
    }
}

/// Persist the email for the next prompt, leaving overrides out of the file
fn remember_email(email: String) -> Result<()> {
    let mut stored = Config::load_file()?;
    stored.last_email = Some(email);
    stored.save()
}

fn prompt_email(last_email: Option<&str>) -> Result<String> {
    read_email(last_email, &mut io::stdin().lock(), &mut io::stdout())
}

/// Print the stored token, or note on `err` that there is none
fn show_token(
    storage: &dyn Storage,
    origin: &str,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<()> {
    match storage.get_item(TOKEN_KEY)? {
        Some(token) => writeln!(out, "{}", token)?,
        None => writeln!(err, "No token stored for {}", origin)?,
    }
    Ok(())
}

fn clear_token(storage: &dyn Storage, origin: &str, out: &mut impl Write) -> Result<()> {
    storage.remove_item(TOKEN_KEY)?;
    writeln!(out, "Token cleared for {}", origin)?;
    Ok(())
}

/// Ask for the email; an empty answer keeps `last_email`
fn read_email(
    last_email: Option<&str>,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<String> {
    match last_email {
        Some(last) => write!(out, "Email [{}]: ", last)?,
        None => write!(out, "Email: ")?,
    }
    out.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let line = line.trim();

    Ok(match last_email {
        Some(last) if line.is_empty() => last.to_string(),
        _ => line.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use loginform_core::MemoryStorage;
    use std::io::Cursor;

    fn args(list: &[&str]) -> Result<Args> {
        Args::parse(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_args() {
        let parsed = args(&["--email", "a@b.com", "--origin", "http://127.0.0.1:3000"]).unwrap();
        assert_eq!(parsed.email.as_deref(), Some("a@b.com"));
        assert_eq!(parsed.origin.as_deref(), Some("http://127.0.0.1:3000"));
        assert!(!parsed.show_token);

        let parsed = args(&["--token"]).unwrap();
        assert!(parsed.show_token);
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(args(&["--email"]).is_err());
        assert!(args(&["--verbose"]).is_err());
    }

    #[test]
    fn test_show_token() {
        let storage = MemoryStorage::new();
        let (mut out, mut err) = (Vec::new(), Vec::new());

        show_token(&storage, "http://localhost:8080", &mut out, &mut err).unwrap();
        assert!(out.is_empty());
        assert_eq!(
            String::from_utf8(err).unwrap(),
            "No token stored for http://localhost:8080\n"
        );

        storage.set_item(TOKEN_KEY, "abc123").unwrap();
        let (mut out, mut err) = (Vec::new(), Vec::new());
        show_token(&storage, "http://localhost:8080", &mut out, &mut err).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "abc123\n");
        assert!(err.is_empty());
    }

    #[test]
    fn test_clear_token() {
        let storage = MemoryStorage::new();
        storage.set_item(TOKEN_KEY, "abc123").unwrap();
        storage.set_item("theme", "dark").unwrap();

        let mut out = Vec::new();
        clear_token(&storage, "http://localhost:8080", &mut out).unwrap();

        assert_eq!(storage.get_item(TOKEN_KEY).unwrap(), None);
        assert_eq!(storage.get_item("theme").unwrap().as_deref(), Some("dark"));
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Token cleared for http://localhost:8080\n"
        );

        // Clearing again is fine
        clear_token(&storage, "http://localhost:8080", &mut Vec::new()).unwrap();
    }

    #[test]
    fn test_read_email() {
        let mut out = Vec::new();
        let email = read_email(None, &mut Cursor::new("a@b.com\n"), &mut out).unwrap();
        assert_eq!(email, "a@b.com");
        assert_eq!(String::from_utf8(out).unwrap(), "Email: ");

        // Empty answer keeps the remembered address
        let mut out = Vec::new();
        let email = read_email(Some("last@b.com"), &mut Cursor::new("\n"), &mut out).unwrap();
        assert_eq!(email, "last@b.com");
        assert_eq!(String::from_utf8(out).unwrap(), "Email [last@b.com]: ");

        let mut input = Cursor::new("  new@b.com \n");
        let email = read_email(Some("last@b.com"), &mut input, &mut Vec::new()).unwrap();
        assert_eq!(email, "new@b.com");

        // EOF without input
        let email = read_email(None, &mut Cursor::new(""), &mut Vec::new()).unwrap();
        assert_eq!(email, "");
    }
}
