use std::error::Error;
use std::io::{stdin, stdout, BufRead, Write};

use headsup_core::bet::Action;
use headsup_core::policy::Archetype;
use headsup_core::state::{GameState, Seat, StackScenario, State};
use structopt::StructOpt;

#[derive(StructOpt)]
struct Opt {
    #[structopt(long, default_value = "equal", help = "equal, short, or big")]
    scenario: StackScenario,
    #[structopt(
        long,
        default_value = "caller",
        help = "caller, smallball, tank, hunter, or gladiator"
    )]
    opponent: Archetype,
    #[structopt(long, help = "Seed for a reproducible match")]
    seed: Option<u64>,
    #[structopt(long, help = "Skip the post-hand decision report")]
    no_report: bool,
    #[structopt(long, help = "Silence game prompts (useful for tests with set input)")]
    no_prompts: bool,
}

#[derive(Debug, Copy, Clone)]
enum Command {
    Action(Action),
    Info,
    Log,
    Quit,
    Help,
}

fn print_help() {
    println!("Known commands are:");
    for (cmds, desc) in [
        ("(h)elp", "This output."),
        ("(i)nfo", "Current pot, stacks, and board."),
        ("(l)og", "Replay everything that has happened this hand."),
        ("(q)uit", "Stop playing."),
        ("(c)heck / call", "Check, or call whatever is owed."),
        ("(f)old", "Give up the hand."),
        ("(r)aise X", "Put in the call amount plus X more."),
        ("(a)llin", "Push the whole stack in."),
    ] {
        println!("  {:14}: {}", cmds, desc);
    }
    println!("Raise amounts are chips on top of the amount owed.");
}

fn try_parse_command(stream: &mut dyn BufRead) -> Result<Command, Box<dyn Error>> {
    let mut s = String::new();
    let n = stream.read_line(&mut s)?;
    if n == 0 {
        return Ok(Command::Quit);
    }
    let words: Vec<&str> = s.split_whitespace().collect();
    if words.is_empty() {
        return Err("Empty input".into());
    }
    let c = match words[0] {
        "help" | "h" => Command::Help,
        "info" | "i" => Command::Info,
        "log" | "l" => Command::Log,
        "quit" | "q" => Command::Quit,
        "fold" | "f" => Command::Action(Action::Fold),
        "check" | "call" | "c" => Command::Action(Action::CheckCall),
        "allin" | "all" | "a" => Command::Action(Action::AllIn),
        "raise" | "r" => {
            if words.len() != 2 {
                return Err("Raise needs an amount".into());
            }
            Command::Action(Action::Raise(words[1].parse()?))
        }
        w => return Err(format!("Unknown command {:?}", w).into()),
    };
    Ok(c)
}

fn print_table(gs: &GameState) {
    let view = gs.public_view();
    let board: Vec<String> = view.board.iter().map(|c| c.to_string()).collect();
    println!(
        "Hand {:2} [{}] pot {:>6}  board: {}",
        view.hand_num,
        view.state,
        view.pot,
        board.join(" ")
    );
    let pocket = match view.player_pocket {
        Some(p) => format!("{}{}", p[0], p[1]),
        None => String::from("--"),
    };
    let btn = |s: Seat| if view.button == s { " (button)" } else { "" };
    println!("  You      [{:>7}] {}{}", view.player_stack, pocket, btn(Seat::Player));
    let opp_pocket = match view.opponent_pocket {
        Some(p) => format!("{}{}", p[0], p[1]),
        None => String::from("??"),
    };
    println!(
        "  Opponent [{:>7}] {}{}",
        view.opponent_stack,
        opp_pocket,
        btn(Seat::Opponent)
    );
}

fn prompt(gs: &GameState, display_prompts: bool) -> Result<Command, Box<dyn Error>> {
    if display_prompts {
        let owed = (gs.player(Seat::Opponent).street_bet - gs.player(Seat::Player).street_bet)
            .max(0);
        if owed > 0 {
            println!("Your action ({} to call):", owed);
        } else {
            println!("Your action:");
        }
    }
    let c = loop {
        if display_prompts {
            print!("> ");
            stdout().flush()?;
        }
        match try_parse_command(&mut stdin().lock()) {
            Ok(c) => break c,
            Err(e) => println!("{}", e),
        }
    };
    Ok(c)
}

/// Run a single hand. Returns true if the player asked to quit.
fn single_hand(gs: &mut GameState, display_prompts: bool) -> Result<bool, Box<dyn Error>> {
    gs.start_hand()?;
    if display_prompts {
        println!("--- Hand {} ---", gs.hand_num());
        print_table(gs);
    }
    loop {
        if matches!(gs.state(), State::EndOfHand) {
            return Ok(false);
        }
        if gs.turn() == Seat::Opponent {
            let action = gs.opponent_act()?;
            if display_prompts {
                println!("Opponent: {}", action);
            }
            continue;
        }
        match prompt(gs, display_prompts)? {
            Command::Help => {
                if display_prompts {
                    print_help();
                }
            }
            Command::Info => {
                if display_prompts {
                    print_table(gs);
                }
            }
            Command::Log => {
                if display_prompts {
                    for item in gs.hand_log() {
                        println!("  {}", item);
                    }
                }
            }
            Command::Quit => return Ok(true),
            Command::Action(a) => match gs.submit_action(Seat::Player, a) {
                Ok(()) => {
                    if display_prompts {
                        print_table(gs);
                    }
                }
                Err(e) => println!("{}", e),
            },
        }
    }
}

fn print_report(gs: &mut GameState) -> Result<(), Box<dyn Error>> {
    let rows = gs.hand_report()?;
    if rows.is_empty() {
        println!("No decisions to grade this hand.");
        return Ok(());
    }
    println!("--- Decision report ---");
    for row in rows {
        println!(
            "[{}] {} ({} chips, ~{:.0}% equity)",
            row.street,
            row.action,
            row.chips,
            row.equity * 100.0
        );
        println!("    {}", row.ev_advice);
        println!("    {}", row.disguise_advice);
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let opt = Opt::from_args();
    let mut gs = match opt.seed {
        Some(seed) => GameState::seeded(opt.scenario, opt.opponent, seed),
        None => GameState::new(opt.scenario, opt.opponent),
    };
    if !opt.no_prompts {
        println!(
            "Heads-up vs {} with {} stacks. 'help' lists commands.",
            gs.archetype(),
            opt.scenario
        );
    }
    loop {
        let wants_quit = single_hand(&mut gs, !opt.no_prompts)?;
        if !opt.no_report && matches!(gs.state(), State::EndOfHand) {
            print_report(&mut gs)?;
        }
        if wants_quit || gs.match_over() {
            break;
        }
    }
    if gs.match_over() {
        match gs.match_winner() {
            Some(Seat::Player) => println!("You win the match!"),
            Some(Seat::Opponent) => println!("The opponent takes the match."),
            _ => {}
        }
    }
    Ok(())
}
