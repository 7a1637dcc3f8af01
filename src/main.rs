use clap::{Arg, ArgAction, ArgMatches, Command};
use log::{error, info, LevelFilter};
use std::path::PathBuf;
use std::process;

use inject_admin::admin::ConfigError;
use inject_admin::security::SecureMasterKey;
use inject_admin::trigger::{escape_html, retire_artifact, USER_NOT_CREATED};
use inject_admin::utils::logging::initialize_logging;
use inject_admin::{FileArtifact, InjectConfig, LocalHost, Trigger, TriggerExit};

fn build_cli() -> Command {
    Command::new("inject-admin")
        .about("Create one administrator account with random credentials, log it in, then delete this program")
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .help("JSON configuration file")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("store")
                .long("store")
                .value_name("FILE")
                .help("Encrypted account store")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("session")
                .long("session")
                .value_name("FILE")
                .help("Where the persistent login token is written")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("artifact")
                .long("artifact")
                .value_name("FILE")
                .help("Entry point to delete after the run (defaults to this executable)")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("admin-url")
                .long("admin-url")
                .value_name("URL")
                .help("Administrative landing page to redirect to"),
        )
        .arg(
            Arg::new("multisite")
                .long("multisite")
                .help("Also grant network-wide super administrator")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("username-length")
                .long("username-length")
                .value_name("N")
                .help("Length of the generated username")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .value_name("FILE")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log at debug level")
                .action(ArgAction::SetTrue),
        )
}

/// Config file first, then command line flags on top
fn resolve_config(matches: &ArgMatches) -> Result<InjectConfig, ConfigError> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => InjectConfig::load(path)?,
        None => InjectConfig::default(),
    };

    if let Some(path) = matches.get_one::<PathBuf>("store") {
        config.store_path = path.clone();
    }
    if let Some(path) = matches.get_one::<PathBuf>("session") {
        config.session_path = path.clone();
    }
    if let Some(path) = matches.get_one::<PathBuf>("artifact") {
        config.artifact_path = Some(path.clone());
    }
    if let Some(url) = matches.get_one::<String>("admin-url") {
        config.admin_url = url.clone();
    }
    if matches.get_flag("multisite") {
        config.multisite = true;
    }
    if let Some(length) = matches.get_one::<usize>("username-length") {
        config.username_length = *length;
    }
    if let Some(path) = matches.get_one::<PathBuf>("log-file") {
        config.log_file = path.clone();
    }
    if matches.get_flag("verbose") {
        config.log_level = LevelFilter::Debug.to_string();
    }

    config.validate()?;
    Ok(config)
}

/// Print the outcome and return the process exit code
fn report(exit: TriggerExit) -> i32 {
    match exit {
        TriggerExit::Redirect(url) => {
            println!("Location: {}", url);
            0
        }
        TriggerExit::Halt(message) => {
            eprintln!("{}", message);
            1
        }
    }
}

fn run(config: &InjectConfig) -> i32 {
    let mut artifact = match &config.artifact_path {
        Some(path) => FileArtifact::new(path),
        None => match FileArtifact::current_executable() {
            Ok(artifact) => artifact,
            Err(e) => {
                error!("Cannot locate own executable: {}", e);
                return report(TriggerExit::Halt(escape_html(USER_NOT_CREATED)));
            }
        },
    };

    let host = SecureMasterKey::new().and_then(|key| {
        LocalHost::open(config, Box::new(key))
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))
    });
    let mut host = match host {
        Ok(host) => host,
        Err(e) => {
            // No host means no provisioning, but the entry point still goes
            error!("Cannot open account store: {}", e);
            let cleanup = retire_artifact(&mut artifact);
            return report(TriggerExit::decide(&cleanup, true, config.admin_url.clone()));
        }
    };

    let result = Trigger::new(&mut host, &mut artifact)
        .username_length(config.username_length)
        .run(&mut rand::thread_rng());

    match result {
        Ok(run_report) => {
            info!("Run finished after states {:?}", run_report.states);
            report(run_report.exit)
        }
        Err(consumed) => {
            error!("{}", consumed);
            report(TriggerExit::Halt(escape_html(USER_NOT_CREATED)))
        }
    }
}

fn main() {
    let matches = build_cli().get_matches();

    let config = match resolve_config(&matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", escape_html(&e.to_string()));
            process::exit(2);
        }
    };

    let level = config.log_level_filter().unwrap_or(LevelFilter::Info);
    if let Err(e) = initialize_logging(&config.log_file, level) {
        eprintln!("Warning: logging disabled: {}", e);
    }

    process::exit(run(&config));
}
