//! Terminal blackjack player.
//!
//! Waits for a host to announce itself on the LAN, asks how many rounds
//! to play, then plays them at the prompt: new cards are printed as they
//! arrive and every decision is a typed `Hit` or `Stand`.

use std::io::{self, Write};

use anyhow::Error;
use lan_blackjack::{
    DEFAULT_CONFIG_PATH, GameClient, Outcome, ProtocolConfig, RoundSummary,
    errors::ProtocolError, messages::Decision,
};
use pico_args::Arguments;

const HELP: &str = "\
Find a blackjack table on the local network and play

USAGE:
  lb_client NAME

ARGS:
  NAME                     Display name sent to the host (at most 32 bytes)

FLAGS:
  -h, --help               Print help information
";

fn main() -> Result<(), Error> {
    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let name: String = pargs.free_from_str()?;
    let leftover = pargs.finish();
    if !leftover.is_empty() {
        anyhow::bail!("unexpected arguments: {leftover:?}");
    }

    let config = ProtocolConfig::load(DEFAULT_CONFIG_PATH)?;

    println!("Listening for game hosts...");
    let host = GameClient::discover(&config)?;
    println!("Found '{}' at {}", host.name, host.addr);

    let rounds = prompt_rounds();
    let mut client = GameClient::connect(host.addr, &name, rounds, &config)?;

    for round in 1..=rounds {
        println!("\n=== Round {round} ===");
        println!("Waiting for initial cards...");

        let mut seen_player = 0;
        let mut seen_dealer = 0;
        let mut shown_upcard = false;
        let played = client.play_round(|view| {
            print_news(view, &mut seen_player, &mut seen_dealer, &mut shown_upcard);
            prompt_decision()
        });

        match played {
            Ok(summary) => {
                print_news(&summary, &mut seen_player, &mut seen_dealer, &mut shown_upcard);
                if let Some(outcome) = summary.outcome {
                    println!("{}", outcome_banner(outcome));
                }
            }
            Err(ProtocolError::PeerDisconnected) => {
                println!("Server disconnected");
                break;
            }
            Err(error) => return Err(error.into()),
        }
    }

    Ok(())
}

/// Print whatever `view` holds that has not been shown yet. The opening
/// pair keeps the numbered form; later player cards arrive one at a time
/// from hits.
fn print_news(
    view: &RoundSummary,
    seen_player: &mut usize,
    seen_dealer: &mut usize,
    shown_upcard: &mut bool,
) {
    for card in &view.player_cards[*seen_player..] {
        *seen_player += 1;
        if *seen_player <= 2 {
            println!("Player card {seen_player}: {card}");
        } else {
            println!("Received card: {card}");
        }
    }
    if !*shown_upcard {
        if let Some(card) = view.dealer_upcard {
            println!("Dealer shows: {card}");
            *shown_upcard = true;
        }
    }
    for card in &view.dealer_cards[*seen_dealer..] {
        *seen_dealer += 1;
        println!("Dealer card: {card}");
    }
}

fn outcome_banner(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Win => "You won 🎉",
        Outcome::Loss => "You lost ❌",
        Outcome::Tie => "Tie 🤝",
    }
}

fn prompt_rounds() -> u8 {
    loop {
        match prompt_line("Enter number of rounds: ").parse::<u8>() {
            Ok(rounds) if rounds > 0 => return rounds,
            _ => println!("Please enter a number between 1 and 255"),
        }
    }
}

fn prompt_decision() -> Decision {
    loop {
        match prompt_line("Hit or Stand? ").to_lowercase().as_str() {
            "hit" => return Decision::Hit,
            "stand" => return Decision::Stand,
            _ => println!("Please type 'Hit' or 'Stand'"),
        }
    }
}

/// Show `prompt` and read one line, trimmed. Exits when stdin closes.
fn prompt_line(prompt: &str) -> String {
    print!("{prompt}");
    let _ = io::stdout().flush();
    let mut line = String::new();
    match io::stdin().read_line(&mut line) {
        Ok(0) => {
            println!();
            std::process::exit(0);
        }
        Ok(_) => line.trim().to_string(),
        Err(error) => {
            eprintln!("failed to read input: {error}");
            std::process::exit(1);
        }
    }
}
