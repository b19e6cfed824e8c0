//! Interactive prompt over stdin.

pub mod display;
pub mod input;

use crate::viewer::Viewer;
use input::{Command, HELP};
use tokio::io::{AsyncBufReadExt, BufReader};

pub async fn run_prompt(viewer: &mut Viewer) -> anyhow::Result<()> {
    if !viewer.swipe_tooltip_seen() {
        println!("{}", display::SWIPE_TOOLTIP);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        if command == Command::Quit {
            break;
        }
        execute(viewer, command).await;
    }

    Ok(())
}

/// Apply one command. The render hook prints the resulting view.
pub async fn execute(viewer: &mut Viewer, command: Command) {
    match command {
        Command::Next => viewer.next(),
        Command::Previous => viewer.previous(),
        Command::Shuffle => viewer.shuffle(),
        Command::Flip => viewer.flip(),
        Command::TogglePlay => {
            if !viewer.toggle_play() && viewer.snapshot().total == 0 {
                println!("Nothing to play.");
            }
        }
        Command::Filter(category) => {
            let search = viewer.session().filter().search().to_string();
            viewer.apply_filter(&category, &search);
        }
        Command::Search(text) => {
            let category = viewer.session().filter().category.as_str().to_string();
            viewer.apply_filter(&category, &text);
        }
        Command::ClearFilter => viewer.apply_filter("all", ""),
        Command::SelectDeck(id) => {
            if let Err(e) = viewer.select_deck(&id).await {
                println!("{}", e);
            }
        }
        Command::ListDecks => {
            println!(
                "{}",
                display::render_decks(viewer.decks(), &viewer.current_deck().id)
            );
        }
        Command::Reload => {
            viewer.reload().await;
        }
        Command::Swipe(delta_x) => {
            if viewer.swipe(delta_x).is_none() {
                println!("Swipe too short.");
            }
        }
        Command::DismissTooltip => {
            if let Err(e) = viewer.mark_swipe_tooltip_seen() {
                tracing::warn!(%e, "failed to save tooltip flag");
            }
        }
        Command::Help => println!("{}", HELP),
        Command::Quit => {}
    }
}
