//! Gomoku engine CLI
//!
//! Runs demo scenarios (`--demo`) or an interactive game against the
//! AI. Moves are typed as two base-36 digits, row then column.

use std::io::{self, BufRead, Write};
use std::time::Duration;

use ninuki::notation::{format_move, parse_move, render_board};
use ninuki::{Ai, AiSettings, Game, Pos, Stone};

fn main() {
    let demo = std::env::args().any(|arg| arg == "--demo");
    if demo {
        run_demos();
    } else {
        run_interactive();
    }
}

fn run_demos() {
    println!("===========================================");
    println!("        Ninuki Engine v0.1.0");
    println!("===========================================\n");

    println!("--- Demo 1: Empty Board ---");
    demo_empty_board();

    println!("\n--- Demo 2: Find Winning Move ---");
    demo_winning_move();

    println!("\n--- Demo 3: Pair Capture ---");
    demo_capture();

    println!("\n--- Demo 4: Double Open Three ---");
    demo_double_three();

    println!("\n===========================================");
    println!("          All Demos Completed!");
    println!("===========================================");
}

fn demo_empty_board() {
    let game = Game::new(19, 19);
    let mut ai = Ai::new(AiSettings { depth: 2, ..AiSettings::default() });

    match ai.suggest_move(&game) {
        Some(pos) => {
            println!("  Black plays: {}", format_move(pos.row as i32, pos.col as i32));
            println!("  Expected: center (99)");
        }
        None => println!("  No move found"),
    }
}

fn demo_winning_move() {
    let mut game = Game::new(19, 19);
    for (row, col) in [(9, 5), (0, 0), (9, 6), (0, 2), (9, 7), (0, 4), (9, 8), (0, 6)] {
        let _ = game.make_move(row, col);
    }

    let mut ai = Ai::new(AiSettings { depth: 2, ..AiSettings::default() });
    if let Some(Pos { row, col }) = ai.suggest_move(&game) {
        println!("  Position: Black has four at row 9, cols 5-8");
        println!("  Black plays: {}", format_move(row as i32, col as i32));
        if game.make_move(row as i32, col as i32).is_ok() && game.winner() == Some(Stone::Black) {
            println!("  Result: win confirmed");
        }
    }
}

fn demo_capture() {
    let mut game = Game::new(19, 19);
    for (row, col) in [(9, 5), (9, 6), (13, 13), (9, 7)] {
        let _ = game.make_move(row, col);
    }
    let _ = game.make_move(9, 8);

    println!("  Black bracketed the white pair at 96, 97");
    println!("  Black capture score: {}", game.score(Stone::Black));
    println!("{}", render_board(&game));
}

fn demo_double_three() {
    let mut game = Game::new(19, 19);
    for (row, col) in [(9, 7), (0, 0), (9, 8), (0, 1), (10, 9), (0, 2), (11, 9), (0, 3)] {
        let _ = game.make_move(row, col);
    }

    match game.make_move(9, 9) {
        Err(err) => println!("  Move 99 rejected as expected: {err}"),
        Ok(_) => println!("  Unexpected: move was accepted"),
    }
}

fn run_interactive() {
    println!("Ninuki: five in a row, captures enabled.");
    println!("You play X. Enter moves as two digits, e.g. 99 for the center.\n");

    let mut game = Game::new(19, 19);
    let mut ai = Ai::new(AiSettings::default());
    let stdin = io::stdin();

    while !game.is_over() {
        println!("{}", render_board(&game));
        println!(
            "Captures: you {} / ai {}",
            game.score(Stone::Black),
            game.score(Stone::White)
        );

        print!("your move> ");
        let _ = io::stdout().flush();

        let Some(Ok(line)) = stdin.lock().lines().next() else {
            return;
        };
        let Some((row, col)) = parse_move(&line) else {
            println!("could not read that move, try again");
            continue;
        };
        if let Err(err) = game.make_move(row, col) {
            println!("{err}");
            continue;
        }
        if game.is_over() {
            break;
        }

        if let Some(pos) = ai.suggest_move_timed(&game, Duration::from_millis(500)) {
            if game.make_move(pos.row as i32, pos.col as i32).is_ok() {
                println!("ai plays {}", format_move(pos.row as i32, pos.col as i32));
            }
        }
    }

    println!("{}", render_board(&game));
    match game.winner() {
        Some(Stone::Black) => println!("you win"),
        Some(_) => println!("the ai wins"),
        None => println!("draw"),
    }
}
