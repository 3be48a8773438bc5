// Terminal filmstrip player
//
// Drives a player session against a running daygate server:
//
//   daygate-play [player] [--server URL] [--now OVERRIDE]
//
// Type an answer to submit it for the current puzzle, or:
//   :hint      show the hint
//   :goto N    jump to an unlocked day (1-based)
//   :status    unlock state and next-unlock countdown
//   :quit      exit

use std::io::{BufRead, Write};

use daygate::cache;
use daygate::clock::{parse_now_override, Clock};
use daygate::config::AppConfig;
use daygate::filmstrip::{SubmitOutcome, TileState};
use daygate::puzzles;
use daygate::remote::ProgressClient;
use daygate::schedule::countdown;
use daygate::session::PlayerSession;

struct Args {
    player: String,
    server: String,
    now: Option<String>,
}

fn parse_args(config: &AppConfig) -> Args {
    let mut player = config.default_player.clone();
    let mut server = std::env::var("DAYGATE_SERVER")
        .unwrap_or_else(|_| format!("http://{}", config.addr));
    let mut now = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--server" => {
                if let Some(v) = args.next() {
                    server = v;
                }
            }
            "--now" => now = args.next(),
            other if !other.starts_with('-') => player = other.to_string(),
            other => eprintln!("ignoring unknown flag {other}"),
        }
    }

    Args { player, server, now }
}

fn show_current(session: &PlayerSession) {
    let status = session.unlock_status();
    let strip = session.filmstrip();

    let Some(puzzle) = strip.current() else {
        println!("No puzzles in the catalog.");
        return;
    };
    let idx = strip.current_index();
    let day = idx + 1;

    match strip.tile_state(idx, status.unlocked_count) {
        TileState::Locked => {
            println!("Day {day} is still locked.");
            show_countdown(session);
        }
        TileState::Solved => {
            println!("Day {day}: {} [solved]", puzzle.display_title(day));
            if let Some(answer) = strip.progress().accepted_answer_by_id.get(&puzzle.id) {
                println!("  Accepted answer: {answer}");
            }
            if let Some(reveal) = strip.progress().reveal_by_id.get(&puzzle.id) {
                println!("  {reveal}");
            }
        }
        TileState::Unsolved => {
            println!("Day {day}: {}", puzzle.display_title(day));
            println!("  {}", puzzle.question);
        }
    }
}

fn show_countdown(session: &PlayerSession) {
    let now = session.now_local();
    let status = session.unlock_status();
    let total = session.filmstrip().puzzles().len();
    println!(
        "Unlocked {}/{} days, {} solved.",
        status.unlocked_count,
        total,
        session.filmstrip().completed_count()
    );
    if status.next_unlock.is_some() {
        let parts = countdown(session.schedule().next_unlock_target(now), now);
        println!(
            "Next unlock in {}d {:02}h {:02}m {:02}s",
            parts.days, parts.hours, parts.minutes, parts.seconds
        );
    }
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("daygate=warn"),
    )
    .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };
    let catalog = match puzzles::load_catalog() {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("Failed to load puzzle catalog: {e}");
            std::process::exit(1);
        }
    };

    let args = parse_args(&config);
    let clock = args
        .now
        .as_deref()
        .and_then(parse_now_override)
        .map(Clock::anchored)
        .unwrap_or_else(Clock::system);

    let schedule = config.schedule(catalog.len());
    let client = ProgressClient::new(args.server.clone(), args.player.clone());
    let cache_path = cache::default_path(&args.player);

    println!("Daygate quest for {} (server {})", args.player, args.server);
    let mut session =
        PlayerSession::start(catalog, schedule, clock, client, cache_path).await;

    show_countdown(&session);
    show_current(&session);

    let stdin = std::io::stdin();
    loop {
        print!("> ");
        let _ = std::io::stdout().flush();
        let mut line = String::new();
        if stdin.lock().read_line(&mut line).unwrap_or(0) == 0 {
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match input {
            ":quit" | ":q" => break,
            ":status" => show_countdown(&session),
            ":hint" => {
                match session.filmstrip().current().and_then(|p| p.hint.clone()) {
                    Some(hint) => println!("Hint: {hint}"),
                    None => println!("No hint for this one."),
                }
            }
            _ if input.starts_with(":goto ") => {
                let day: Option<usize> = input[6..].trim().parse().ok();
                match day {
                    Some(day) if day >= 1 => {
                        if session.select(day - 1).await {
                            show_current(&session);
                        } else {
                            println!("That day isn't unlocked.");
                        }
                    }
                    _ => println!("That day isn't unlocked."),
                }
            }
            answer => {
                match session.submit(answer).await {
                    SubmitOutcome::Solved { milestone, reveal_text } => {
                        println!("✅ Correct!");
                        if let Some(reveal) = reveal_text {
                            println!("  {reveal}");
                        }
                        let total = session.filmstrip().puzzles().len();
                        println!(
                            "🎉 Milestone {}/{total}",
                            milestone.completed_count
                        );
                        if session.filmstrip().all_complete() {
                            println!("🏆 All puzzles complete. Quest finished!");
                            break;
                        }
                        show_current(&session);
                    }
                    SubmitOutcome::Incorrect { attempts } => {
                        println!("❌ Try again! (attempt {attempts})");
                    }
                    SubmitOutcome::AlreadySolved => {
                        println!("Already solved. Pick another day with :goto.");
                    }
                    SubmitOutcome::Locked => {
                        println!("That day hasn't unlocked yet.");
                        show_countdown(&session);
                    }
                }
            }
        }
    }
}
