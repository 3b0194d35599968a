// Terminal client for the quiz display server: runs the polling of a display page without a
// browser, for diagnosing a server or a network.

#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

mod console_config;
mod monitor_view;
mod reqwest_transport;
mod session_main;

use anyhow::Context;
use clap::{ArgMatches, Command, arg};
use console_config::ConsoleConfig;
use quiz_display::role::DisplayRole;
use session_main::RunLimits;


fn config_arg() -> clap::Arg {
    arg!(<config_file> "Path to the configuration file: yaml-serialized ConsoleConfig.")
}

fn count_arg() -> clap::Arg {
    arg!(-'n' --"count" <n> "Stop after this many polls").value_parser(clap::value_parser!(u64))
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::new()
        .target(env_logger::Target::Stdout)
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let matches = Command::new("Quiz display")
        .version(clap::crate_version!())
        .about("Quiz display console client")
        .subcommand_required(true)
        .subcommand(
            Command::new("puppet")
                .about("Poll as a presentation display, following the controller")
                .arg(config_arg())
                .arg(count_arg()),
        )
        .subcommand(
            Command::new("controller")
                .about("Poll as the controller page")
                .arg(config_arg())
                .arg(count_arg()),
        )
        .subcommand(
            Command::new("monitor")
                .about("Show display health, like the monitor page")
                .arg(config_arg())
                .arg(count_arg()),
        )
        .subcommand(
            Command::new("step")
                .about("Move the controller to the next set of slides")
                .arg(config_arg())
                .arg(arg!(--"prev" "Move to the previous set of slides instead")),
        )
        .get_matches();

    ctrlc::set_handler(move || std::process::exit(0)).context("Installing Ctrl-C handler")?;

    match matches.subcommand() {
        Some(("puppet", sub_matches)) => {
            let config = read_config(sub_matches)?;
            let role = config.display_role();
            if role.is_controller() {
                anyhow::bail!("Puppet flag \"{}\" is reserved for the controller", role.flag());
            }
            async_std::task::block_on(session_main::run_display(
                config,
                role,
                run_limits(sub_matches),
            ))
        }
        Some(("controller", sub_matches)) => {
            async_std::task::block_on(session_main::run_display(
                read_config(sub_matches)?,
                DisplayRole::Controller,
                run_limits(sub_matches),
            ))
        }
        Some(("monitor", sub_matches)) => async_std::task::block_on(session_main::run_monitor(
            read_config(sub_matches)?,
            run_limits(sub_matches),
        )),
        Some(("step", sub_matches)) => async_std::task::block_on(session_main::run_step(
            read_config(sub_matches)?,
            !sub_matches.get_flag("prev"),
        )),
        _ => unreachable!("Exhausted list of subcommands and subcommand_required prevents `None`"),
    }
}

fn read_config(sub_matches: &ArgMatches) -> anyhow::Result<ConsoleConfig> {
    let filename = sub_matches
        .get_one::<String>("config_file")
        .context("Missing config file argument")?;
    ConsoleConfig::read(filename)
}

fn run_limits(sub_matches: &ArgMatches) -> RunLimits {
    RunLimits { max_polls: sub_matches.get_one::<u64>("count").copied() }
}
