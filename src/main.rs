use anyhow::{bail, Context, Result};
use benefits_calculator::auth::{AuthGate, AuthOutcome, FileLocalStore};
use benefits_calculator::config::AppConfig;
use benefits_calculator::currency::CurrencyFormatter;
use benefits_calculator::report::{render_clipboard_text, render_screen_text};
use benefits_calculator::{logging, registry, CalculatorSession};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "benefits-calc")]
#[command(about = "Benefits Calculator V2 - calculate and present business case impacts")]
struct Cli {
    /// Local storage file holding the password flag (or BENEFITS_CALC_STORE)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List project types with their inputs and defaults
    Types {
        #[arg(long)]
        json: bool,
    },
    /// Calculate the EBIT impact for a project type
    Calculate {
        /// sales, productivity, employee or nps
        project_type: String,

        /// Override an input, e.g. --set stores=4
        #[arg(long = "set", value_parser = parse_assignment)]
        set: Vec<Assignment>,

        #[arg(long)]
        json: bool,

        /// Team password, if this machine has not logged in yet
        #[arg(long)]
        password: Option<String>,
    },
    /// Write the presentation summary
    Export {
        project_type: String,

        #[arg(long = "set", value_parser = parse_assignment)]
        set: Vec<Assignment>,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(long)]
        password: Option<String>,
    },
    /// Enter the team password and remember it
    Login {
        #[arg(long)]
        password: String,
    },
}

#[derive(Debug, Clone)]
struct Assignment {
    key: String,
    value: String,
}

fn parse_assignment(s: &str) -> std::result::Result<Assignment, String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok(Assignment {
            key: key.trim().to_string(),
            value: value.to_string(),
        }),
        _ => Err(format!("expected key=value, got '{}'", s)),
    }
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    logging::init("warn");

    let cli = Cli::parse();
    let mut config = AppConfig::from_env()?;
    if let Some(store) = cli.store {
        config.store_path = store;
    }

    match cli.command {
        Command::Types { json } => list_types(json)?,
        Command::Calculate {
            project_type,
            set,
            json,
            password,
        } => {
            ensure_access(&config, password.as_deref())?;
            let session = build_session(&project_type, &set)?;
            let result = session.calculate();

            if json {
                let output = serde_json::json!({
                    "projectType": session.project_type().id,
                    "inputs": session.values(),
                    "results": result,
                    "confidence": result.confidence_table(),
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                let project_type = session.project_type();
                println!("{} {}", project_type.icon, project_type.name);
                println!("{}\n", project_type.description);
                print!("{}", render_screen_text(&result, &CurrencyFormatter::default()));
            }
        }
        Command::Export {
            project_type,
            set,
            output,
            password,
        } => {
            ensure_access(&config, password.as_deref())?;
            let session = build_session(&project_type, &set)?;
            let text = render_clipboard_text(
                session.project_type(),
                &session.calculate(),
                &CurrencyFormatter::default(),
            );

            match output {
                Some(path) => {
                    std::fs::write(&path, &text)
                        .with_context(|| format!("writing {}", path.display()))?;
                    info!("Results copied to clipboard! ({})", path.display());
                }
                None => {
                    print!("{}", text);
                    info!("Results copied to clipboard!");
                }
            }
        }
        Command::Login { password } => {
            let mut gate = AuthGate::open(FileLocalStore::new(&config.store_path))?;
            match gate.submit(&password)? {
                AuthOutcome::Granted => println!("Access granted"),
                AuthOutcome::Denied { message } => bail!(message),
            }
        }
    }

    Ok(())
}

fn ensure_access(config: &AppConfig, password: Option<&str>) -> Result<()> {
    let mut gate = AuthGate::open(FileLocalStore::new(&config.store_path))?;
    match gate.require(password)? {
        AuthOutcome::Granted => Ok(()),
        AuthOutcome::Denied { message } if password.is_none() => {
            bail!("{} (use --password or `benefits-calc login`)", message)
        }
        AuthOutcome::Denied { message } => bail!(message),
    }
}

fn build_session(project_type: &str, assignments: &[Assignment]) -> Result<CalculatorSession> {
    let mut session = CalculatorSession::new();
    session.select_str(project_type)?;
    for assignment in assignments {
        session.set_text(&assignment.key, &assignment.value)?;
    }
    Ok(session)
}

fn list_types(json: bool) -> Result<()> {
    if json {
        let types: Vec<_> = registry().iter().collect();
        println!("{}", serde_json::to_string_pretty(&types)?);
        return Ok(());
    }

    for project_type in registry().iter() {
        println!("{} {} ({})", project_type.icon, project_type.name, project_type.id);
        println!("  {}", project_type.description);
        for field in project_type.inputs {
            println!(
                "  - {}: {} [default {}] - {}",
                field.key, field.label, field.default, field.hint
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use benefits_calculator::ProjectTypeId;

    #[test]
    fn test_parse_assignment() {
        let assignment = parse_assignment("stores=4").unwrap();
        assert_eq!(assignment.key, "stores");
        assert_eq!(assignment.value, "4");

        let empty_value = parse_assignment("uplift=").unwrap();
        assert_eq!(empty_value.value, "");

        assert!(parse_assignment("=5").is_err());
        assert!(parse_assignment("novalue").is_err());
    }

    #[test]
    fn test_build_session_applies_assignments() {
        let assignments = vec![
            parse_assignment("stores=2").unwrap(),
            parse_assignment("weeks=10").unwrap(),
            parse_assignment("baseSales=5000").unwrap(),
            parse_assignment("uplift=10").unwrap(),
            parse_assignment("grossMargin=40").unwrap(),
        ];
        let session = build_session("sales", &assignments).unwrap();

        assert_eq!(session.project_type().id, ProjectTypeId::Sales);
        assert!((session.calculate().total() - 4000.0).abs() < 1e-6);
    }

    #[test]
    fn test_build_session_rejects_bad_input() {
        assert!(build_session("marketing", &[]).is_err());
        let weeks = vec![parse_assignment("weeks=52").unwrap()];
        assert!(build_session("employee", &weeks).is_err());
    }

    #[test]
    fn test_ensure_access() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            store_path: dir.path().join("local_storage.json"),
            ..AppConfig::default()
        };

        let err = ensure_access(&config, None).unwrap_err();
        assert!(err.to_string().starts_with("Enter the team password to continue"));

        let err = ensure_access(&config, Some("nope")).unwrap_err();
        assert_eq!(err.to_string(), "Incorrect password");
        assert!(!config.store_path.exists());

        ensure_access(&config, Some("kmart2026")).unwrap();
        ensure_access(&config, None).unwrap();
    }
}
