//! Credential Manager CLI
//!
//! Secure local credential management for per-service `.env` files

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use credential_manager::store::CredentialFileKind;
use credential_manager::validation::VALIDATED_SERVICES;
use credential_manager::{
    CliOverrides, ConfigLoadOptions, ConfigLoader, ConsoleNotifier, CredentialError,
    CredentialStore, ManagerConfig, Notifier, Service, TemplateCatalog, ValidationEngine,
};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Secure local credential manager
#[derive(Parser)]
#[command(name = "credential-manager")]
#[command(version)]
#[command(about = "Secure local credential manager", long_about = None)]
#[command(after_help = r#"EXAMPLES:
    credential-manager template supabase    Create Supabase credential template
    credential-manager load supabase        Load Supabase credentials
    credential-manager validate all         Validate all credentials
    credential-manager list                 List credential files
    credential-manager export supabase      Export credentials for shell use

SECURITY:
    - Credentials stored in: ~/.credential-manager/credentials/
    - File permissions: 600 (read/write owner only)
    - Never commit credential files to git"#)]
struct Cli {
    /// Root directory (defaults to ~/.credential-manager)
    #[arg(long, global = true, value_name = "DIR")]
    home: Option<PathBuf>,

    /// Reject malformed lines and treat format mismatches as failures
    #[arg(long, global = true)]
    strict: bool,

    /// Do not copy loaded credentials into the environment
    #[arg(long, global = true)]
    no_export: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load credentials for a service
    Load {
        /// Service name (supabase, stripe, aws, github, all)
        #[arg(default_value = "all")]
        service: String,
    },

    /// Load and validate credentials for a service
    Validate {
        /// Service name (supabase, stripe, aws, all)
        #[arg(default_value = "all")]
        service: String,
    },

    /// Create a redacted credential template
    Template {
        /// Service name (supabase, stripe, aws, github, all)
        #[arg(default_value = "all")]
        service: String,
    },

    /// List credential and template files
    List {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Print shell export statements (eval "$(credential-manager export stripe)")
    Export {
        /// Service name (supabase, stripe, aws, github, all)
        #[arg(default_value = "all")]
        service: String,

        /// Show masked values instead of the secrets
        #[arg(long)]
        masked: bool,
    },
}

impl Commands {
    /// Commands whose stdout is meant to be consumed by a shell or script
    fn writes_shell_output(&self) -> bool {
        matches!(self, Commands::Export { .. } | Commands::List { json: true })
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("credential_manager=warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("{} {:#}", "✗".red(), e);
            process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();

    let config = ConfigLoader::load(&ConfigLoadOptions::from_process_env(CliOverrides {
        home: cli.home.clone(),
        strict: cli.strict,
        no_export: cli.no_export,
    }))?;

    let paths = config.paths();
    paths.ensure()?;

    let console = if config.log.enabled {
        ConsoleNotifier::with_log_file(paths.log_file())
    } else {
        ConsoleNotifier::new()
    };
    let notifier: Arc<dyn Notifier> =
        Arc::new(console.with_stderr_only(cli.command.writes_shell_output()));

    let mut app = App::new(&config, notifier);

    let ok = match cli.command {
        Commands::Load { service } => app.load_command(&service),
        Commands::Validate { service } => app.validate_command(&service),
        Commands::Template { service } => app.template_command(&service),
        Commands::List { json } => app.list_command(json)?,
        Commands::Export { service, masked } => app.export_command(&service, masked),
    };

    Ok(if ok { 0 } else { 1 })
}

/// Expand "all" to `all`, otherwise parse a single service name
fn resolve_targets(name: &str, all: &[Service]) -> Result<Vec<Service>, CredentialError> {
    if name == "all" {
        return Ok(all.to_vec());
    }
    Ok(vec![Service::parse(name)?])
}

struct App {
    notifier: Arc<dyn Notifier>,
    store: CredentialStore,
    engine: ValidationEngine,
    catalog: TemplateCatalog,
    export_on_load: bool,
}

impl App {
    fn new(config: &ManagerConfig, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            store: CredentialStore::from_config(config, notifier.clone()),
            engine: ValidationEngine::new(notifier.clone())
                .with_strict_patterns(config.policy.strict_patterns),
            catalog: TemplateCatalog::new(config.paths().credentials, notifier.clone()),
            export_on_load: config.policy.export_on_load,
            notifier,
        }
    }

    fn targets(&self, name: &str, all: &[Service]) -> Option<Vec<Service>> {
        match resolve_targets(name, all) {
            Ok(targets) => Some(targets),
            Err(e) => {
                self.notifier.error(&e.to_string());
                None
            }
        }
    }

    /// Returns false if any service failed; never stops early
    fn load_command(&mut self, name: &str) -> bool {
        let Some(targets) = self.targets(name, &Service::KNOWN) else {
            return false;
        };

        let mut ok = true;
        for service in &targets {
            if self.store.load(service).is_err() {
                ok = false;
                continue;
            }
            if self.export_on_load {
                if let Err(e) = self.store.export_to_environment(service) {
                    self.notifier.error(&e.to_string());
                    ok = false;
                }
            }
        }
        ok
    }

    fn validate_command(&mut self, name: &str) -> bool {
        let Some(targets) = self.targets(name, &VALIDATED_SERVICES) else {
            return false;
        };

        let mut ok = true;
        for service in &targets {
            if self.store.load(service).is_err() {
                ok = false;
                continue;
            }
            match self.engine.validate(&self.store, service) {
                Ok(report) if report.passed() => {}
                _ => ok = false,
            }
        }
        ok
    }

    fn template_command(&self, name: &str) -> bool {
        let Some(targets) = self.targets(name, &Service::KNOWN) else {
            return false;
        };

        targets
            .iter()
            .map(|service| self.catalog.generate(service).is_ok())
            .fold(true, |acc, ok| acc && ok)
    }

    fn list_command(&self, json: bool) -> Result<bool> {
        let files = self.store.list_files();

        if json {
            println!("{}", serde_json::to_string_pretty(&files)?);
            return Ok(true);
        }

        self.notifier.info(&format!(
            "Credential files in {}:",
            self.store.credentials_dir().display()
        ));

        if files.is_empty() {
            self.notifier.warning("No credential files found");
            return Ok(true);
        }

        for file in files.iter().filter(|f| f.kind == CredentialFileKind::Credential) {
            println!(
                "  {} {} ({} bytes, {})",
                "●".green(),
                file.name,
                file.size,
                file.permissions
            );
        }
        for file in files.iter().filter(|f| f.kind == CredentialFileKind::Template) {
            println!("  {} {} (template)", "○".yellow(), file.name);
        }

        Ok(true)
    }

    fn export_command(&mut self, name: &str, masked: bool) -> bool {
        let Some(targets) = self.targets(name, &Service::KNOWN) else {
            return false;
        };

        let mut ok = true;
        for service in &targets {
            if self.store.load(service).is_err() {
                ok = false;
                continue;
            }
            match self.store.export_lines(service, masked) {
                Ok(lines) => {
                    println!();
                    println!("{}", format!("# Export commands for {}:", service).cyan());
                    for line in lines {
                        println!("{}", line);
                    }
                }
                Err(e) => {
                    self.notifier.error(&e.to_string());
                    ok = false;
                }
            }
        }
        ok
    }
}
