//! The `levelup memory` command: an interactive memory match board.

use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use levelup_core::game::{BoardPhase, MemoryGame};
use levelup_core::memory::FlipOutcome;
use levelup_core::wordlist::{collect_words, ListSelector};
use levelup_store::ConsoleSpeech;

use super::Context;
use crate::console::{render_cards, ConsolePresenter};

pub async fn execute(
    ctx: &Context,
    name: String,
    list: Option<String>,
    seed: Option<u64>,
) -> Result<()> {
    let mut data = ctx.load_data()?;
    let student = data.student(&name)?.clone();
    let selector = ListSelector::from_option(list.as_deref());
    let words = collect_words(&student, &selector)?;

    let mut config = ctx.config.memory_config(seed);
    config.voice = ctx.voice(&data);
    let game = MemoryGame::start(
        student,
        &words,
        config,
        Arc::new(ConsoleSpeech::new()),
        Arc::new(ConsolePresenter),
    )?;

    println!("🧠 Memory match: {selector}");
    println!("Type a card number to flip it. Commands: :restart :quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match game.wait_ready().await {
            BoardPhase::Won | BoardPhase::Closed => break,
            BoardPhase::Ready | BoardPhase::Locked => {}
        }
        println!("{}", render_cards(&game.cards()));

        let Some(line) = lines.next_line().await? else {
            break;
        };
        match line.trim() {
            "" => continue,
            ":quit" => break,
            ":restart" => {
                game.restart(&words)?;
                continue;
            }
            input => {
                let Ok(number) = input.parse::<usize>() else {
                    println!("Type a card number between 1 and {}.", game.cards().len());
                    continue;
                };
                let outcome = game.flip(number.wrapping_sub(1));
                if outcome == FlipOutcome::Ignored {
                    println!("That card can't be flipped right now.");
                    continue;
                }
                if !matches!(outcome, FlipOutcome::FirstFlipped { .. }) {
                    data.students.insert(name.clone(), game.student());
                    ctx.save_data(&data)?;
                }
            }
        }
    }

    let (found, total) = game.progress();
    data.students.insert(name.clone(), game.exit());
    ctx.save_data(&data)?;
    println!("\n{found}/{total} pairs found. See you next time!");
    Ok(())
}
