//! Command-line host for a simple voting registry.
//! Each invocation restores the registry snapshot, applies one call on behalf
//! of the given identity, and persists the snapshot again if state changed.

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use log::{error, info};
use thiserror::Error;

use simple_voting::api::Call;
use simple_voting::config::DEFAULT_CONFIG_PATH;
use simple_voting::host::read_transcript;
use simple_voting::model::Address;
use simple_voting::{Config, Host, HostError, VotingRegistry};

const PROGRAM_NAME: &str = "simple-voting";

const ABOUT_TEXT: &str = "Submit calls to a single-admin voting registry.

EXIT CODES:
     0: Success.
     1: Host error (config, snapshot or transcript could not be used).
     2: The registry rejected the call.";

const CONFIG: &str = "CONFIG";
const FROM: &str = "FROM";
const NAME: &str = "NAME";
const VOTER: &str = "VOTER";
const CANDIDATE_ID: &str = "CANDIDATE_ID";
const TRANSCRIPT: &str = "TRANSCRIPT";

/// Construct the CLI configuration.
fn cli() -> Command {
    // Make the build dirty when the toml changes.
    include_str!("../Cargo.toml");

    clap::command!(PROGRAM_NAME)
        .about(ABOUT_TEXT)
        .subcommand_required(true)
        .arg(
            Arg::new(CONFIG)
                .long("config")
                .short('c')
                .help("Path to the configuration file")
                .default_value(DEFAULT_CONFIG_PATH)
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new(FROM)
                .long("from")
                .help("Identity submitting the call; defaults to the configured admin")
                .value_parser(value_parser!(Address))
                .action(ArgAction::Set),
        )
        .subcommand(Command::new("owner").about("Print the registry owner"))
        .subcommand(Command::new("is-voting-allowed").about("Print whether voting is open"))
        .subcommand(Command::new("start-voting").about("Open the voting session"))
        .subcommand(Command::new("end-voting").about("Close the voting session"))
        .subcommand(
            Command::new("add-candidate")
                .about("Register a candidate and print its ID")
                .arg(Arg::new(NAME).required(true).action(ArgAction::Set)),
        )
        .subcommand(Command::new("candidates-count").about("Print the number of candidates"))
        .subcommand(
            Command::new("candidate")
                .about("Print a single candidate")
                .arg(candidate_id_arg()),
        )
        .subcommand(Command::new("candidates").about("Print all candidates in ID order"))
        .subcommand(
            Command::new("add-voter")
                .about("Register an eligible voter")
                .arg(voter_arg()),
        )
        .subcommand(
            Command::new("voter")
                .about("Print a voter's registration and voting status")
                .arg(voter_arg()),
        )
        .subcommand(
            Command::new("is-registered")
                .about("Print whether an identity is a registered voter")
                .arg(voter_arg()),
        )
        .subcommand(
            Command::new("has-voted")
                .about("Print whether an identity has voted")
                .arg(voter_arg()),
        )
        .subcommand(
            Command::new("vote")
                .about("Cast a vote")
                .arg(candidate_id_arg()),
        )
        .subcommand(Command::new("winner").about("Print the current leading candidate"))
        .subcommand(Command::new("total-votes").about("Print the number of votes cast"))
        .subcommand(
            Command::new("replay")
                .about("Apply a JSON array of transactions in order")
                .arg(Arg::new(TRANSCRIPT).required(true).action(ArgAction::Set)),
        )
        .subcommand(Command::new("results").about("Print all candidates by votes"))
}

fn voter_arg() -> Arg {
    Arg::new(VOTER)
        .required(true)
        .value_parser(value_parser!(Address))
        .action(ArgAction::Set)
}

fn candidate_id_arg() -> Arg {
    Arg::new(CANDIDATE_ID)
        .required(true)
        .value_parser(value_parser!(u64))
        .action(ArgAction::Set)
}

/// Errors that this program may produce.
#[derive(Debug, Error)]
enum Error {
    #[error(transparent)]
    Host(#[from] HostError),
    #[error(transparent)]
    Rejected(#[from] simple_voting::Error),
}

/// Human-readable report of the whole registry, most votes first.
fn results_report(registry: &VotingRegistry) -> String {
    let mut candidates = registry.candidates().iter().collect::<Vec<_>>();
    // Stable sort, so ties stay in ID order.
    candidates.sort_by(|a, b| b.vote_count.cmp(&a.vote_count));

    let mut lines = vec![format!(
        "Voting is {}. {} vote{} cast.",
        registry.session(),
        registry.total_votes(),
        if registry.total_votes() != 1 { "s" } else { "" }
    )];
    lines.extend(candidates.iter().map(|candidate| candidate.to_string()));
    match registry.winner() {
        Ok(winner) => lines.push(format!("Winner: {}", winner.name)),
        Err(err) => lines.push(err.to_string()),
    }
    lines.join("\n")
}

/// Work out which call the arguments describe, or handle the host-only
/// subcommands directly.
fn execute(config: &Config, args: &ArgMatches) -> Result<String, Error> {
    let mut host = Host::open(config)?;
    let caller = args
        .get_one::<Address>(FROM)
        .copied()
        .unwrap_or_else(|| config.admin());

    // Required arguments are guaranteed to be present by clap.
    let voter = |sub: &ArgMatches| *sub.get_one::<Address>(VOTER).unwrap();
    let candidate_id = |sub: &ArgMatches| *sub.get_one::<u64>(CANDIDATE_ID).unwrap();
    let call = match args.subcommand() {
        Some(("owner", _)) => Call::Owner,
        Some(("is-voting-allowed", _)) => Call::IsVotingAllowed,
        Some(("start-voting", _)) => Call::StartVoting,
        Some(("end-voting", _)) => Call::EndVoting,
        Some(("add-candidate", sub)) => Call::AddCandidate {
            name: sub.get_one::<String>(NAME).cloned().unwrap_or_default(),
        },
        Some(("candidates-count", _)) => Call::CandidatesCount,
        Some(("candidate", sub)) => Call::Candidate {
            candidate_id: candidate_id(sub),
        },
        Some(("candidates", _)) => Call::Candidates,
        Some(("add-voter", sub)) => Call::AddVoter { voter: voter(sub) },
        Some(("voter", sub)) => Call::Voter { voter: voter(sub) },
        Some(("is-registered", sub)) => Call::IsRegistered { voter: voter(sub) },
        Some(("has-voted", sub)) => Call::HasVoted { voter: voter(sub) },
        Some(("vote", sub)) => Call::Vote {
            candidate_id: candidate_id(sub),
        },
        Some(("winner", _)) => Call::Winner,
        Some(("total-votes", _)) => Call::TotalVotes,
        Some(("replay", sub)) => {
            let path: &String = sub.get_one(TRANSCRIPT).unwrap();
            let transactions = read_transcript(path)?;
            let results = host.replay(transactions);
            host.persist()?;
            let lines = results
                .iter()
                .enumerate()
                .map(|(i, result)| match result {
                    Ok(response) => format!("tx{i}: {response}"),
                    Err(err) => format!("tx{i}: rejected: {err}"),
                })
                .collect::<Vec<_>>();
            return Ok(lines.join("\n"));
        }
        Some(("results", _)) => return Ok(results_report(host.registry())),
        _ => unreachable!("a subcommand is required"),
    };

    let mutation = call.is_mutation();
    let response = host.submit(caller, call)?;
    if mutation {
        host.persist()?;
    }
    Ok(response.to_string())
}

/// Run the requested command, report the result, and return the exit code.
fn run(config: &Config, args: &ArgMatches) -> u8 {
    match execute(config, args) {
        Ok(output) => {
            println!("{output}");
            0
        }
        Err(Error::Host(err)) => {
            error!("{err}");
            println!("Error: {err}");
            1
        }
        Err(Error::Rejected(err)) => {
            println!("Rejected: {err}");
            2
        }
    }
}

fn main() {
    let args = cli().get_matches();
    let config_path: &String = args.get_one(CONFIG).unwrap(); // Has a default value.
    let config = match Config::load(config_path) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Failed to load config {config_path}: {err}");
            std::process::exit(1)
        }
    };

    // Set up logging.
    if let Err(err) = log4rs::init_file(config.log_config(), Default::default()) {
        eprintln!("Failed to initialise logging: {err}");
        std::process::exit(1)
    }
    info!("Initialised logging");

    let exit_code = run(&config, &args);
    std::process::exit(exit_code.into())
}
