use std::process::ExitCode;

use benq_status::common::transport::DEFAULT_DEVICE;
use benq_status::{Command, Projector};
use clap::Parser;
use colored::Colorize;
use log::{debug, error, warn};

#[derive(Parser)]
#[command(version, about = "Reads the status of a BenQ projector over RS-232")]
struct Cli {
    /// Serial device path or socket://host:port
    #[arg(short, long, default_value = DEFAULT_DEVICE)]
    device: String,

    /// Print the status as JSON
    #[arg(long)]
    json: bool,

    /// Send a single raw query token and print its answer
    #[arg(short, long, value_name = "TOKEN")]
    query: Option<String>,

    /// List available serial ports and known command tokens, then exit
    #[arg(long)]
    list: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if cli.list {
        return list_ports();
    }

    let mut projector = match Projector::open(&cli.device) {
        Ok(projector) => projector,
        Err(err) => {
            error!("{}", err);
            eprintln!("{}", err.to_string().red());
            return ExitCode::FAILURE;
        }
    };

    if let Some(token) = cli.query {
        if !is_known(&token) {
            warn!("{} is not a known status command, sending it anyway", token);
        }
        println!("{}", projector.query(&token));
        return ExitCode::SUCCESS;
    }

    let status = projector.status();

    if cli.json {
        match serde_json::to_string_pretty(&status) {
            Ok(json) => println!("{}", json),
            Err(err) => {
                error!("Failed serializing status: {}", err);
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!("beamer is on? {}", on_off(status.power));
        println!("audio is muted? {}", on_off(status.audio_mute));
        println!(
            "audio volume? speaker: {} microphone: {}",
            status.audio_volume, status.audio_mic_volume
        );
        println!("selected source? {}", status.source);
        println!("lamp hours? {}", status.lamp_hours);
    }

    ExitCode::SUCCESS
}

fn on_off(value: bool) -> String {
    if value {
        "yes".green().to_string()
    } else {
        "no".red().to_string()
    }
}

/// Raw tokens are still sent, this only decides whether to warn.
fn is_known(token: &str) -> bool {
    match token.parse::<Command>() {
        Ok(_) => true,
        Err(err) => {
            debug!("{}", err);
            false
        }
    }
}

fn known_tokens() -> String {
    Command::ALL
        .iter()
        .map(|cmd| cmd.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn list_ports() -> ExitCode {
    println!("Known commands: {}", known_tokens());

    match serialport::available_ports() {
        Ok(ports) if ports.is_empty() => {
            println!("No ports available.");
            ExitCode::SUCCESS
        }
        Ok(ports) => {
            for port in ports {
                println!("{}", port.port_name);
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("Cannot enumerate available ports: {}", err);
            ExitCode::FAILURE
        }
    }
}
