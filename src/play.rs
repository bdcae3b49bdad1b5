//! Terminal loop for offline play.

use anyhow::Result;
use noughts::{AppConfig, Difficulty, LocalMatch, MatchSnapshot, Position, ScoreStore};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info, instrument, warn};

const HELP: &str = "Enter a cell 1-9 or a name like 'center'. \
Commands: new, difficulty <easy|harder|expert>, scores, help, quit.";

/// One line of player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Cell(Position),
    NewGame,
    SetDifficulty(Difficulty),
    Scores,
    Help,
    Quit,
}

/// Parses a line. Cells are numbered 1-9 as drawn on the board.
fn parse_input(line: &str) -> Option<Input> {
    let line = line.trim().to_lowercase();
    let mut words = line.split_whitespace();
    let first = words.next()?;
    match first {
        "q" | "quit" | "exit" => Some(Input::Quit),
        "n" | "new" => Some(Input::NewGame),
        "s" | "scores" => Some(Input::Scores),
        "h" | "help" | "?" => Some(Input::Help),
        "d" | "difficulty" => words.next()?.parse().ok().map(Input::SetDifficulty),
        _ => match first.parse::<usize>() {
            Ok(n) => n
                .checked_sub(1)
                .and_then(Position::from_index)
                .map(Input::Cell),
            Err(_) => Position::from_label_or_number(&line).map(Input::Cell),
        },
    }
}

/// Runs an offline match on stdin/stdout until the player quits or input ends.
///
/// Scores are loaded at start and saved on exit, along with a snapshot of the
/// game in progress.
#[instrument(skip(config))]
pub async fn run(config: &AppConfig, difficulty: Option<Difficulty>, fresh: bool) -> Result<()> {
    let store = ScoreStore::new(config.scores_path());
    let scores = store.load()?;

    let saved = if fresh {
        None
    } else {
        MatchSnapshot::load(config.snapshot_path())?
    };
    let mut local = match saved {
        Some(snapshot) => {
            info!("Resuming saved game");
            LocalMatch::restore_with_scores(snapshot, scores)
        }
        None => LocalMatch::new(*config.difficulty(), scores),
    };
    if let Some(difficulty) = difficulty {
        local.set_difficulty(difficulty);
    }

    let mut out = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    out.write_all(format!("Difficulty: {}. {}\n\n", local.difficulty().label(), HELP).as_bytes())
        .await?;
    render(&mut out, &local).await?;

    while let Some(line) = lines.next_line().await? {
        let Some(input) = parse_input(&line) else {
            out.write_all(b"Didn't catch that. Type 'help' for commands.\n").await?;
            continue;
        };
        debug!(?input, "Player input");

        match input {
            Input::Quit => break,
            Input::Help => out.write_all(format!("{}\n", HELP).as_bytes()).await?,
            Input::Scores => {
                out.write_all(format!("{}\n", local.scores()).as_bytes()).await?
            }
            Input::NewGame => {
                local.new_game();
                render(&mut out, &local).await?;
            }
            Input::SetDifficulty(level) => {
                local.set_difficulty(level);
                out.write_all(format!("Difficulty: {}\n", level.label()).as_bytes())
                    .await?;
            }
            Input::Cell(position) => match local.human_move(position.to_index()) {
                Ok(report) => {
                    if let Some(reply) = report.computer() {
                        out.write_all(format!("Computer plays {}.\n", reply).as_bytes())
                            .await?;
                    }
                    render(&mut out, &local).await?;
                }
                Err(e) => {
                    out.write_all(format!("{}\n", e.status_line()).as_bytes()).await?;
                }
            },
        }
    }

    if let Err(e) = local.snapshot().save(config.snapshot_path()) {
        warn!(error = %e, "Could not save game");
    }
    store.save(local.scores())?;
    out.write_all(format!("{}\nBye.\n", local.scores()).as_bytes()).await?;
    out.flush().await?;
    Ok(())
}

async fn render<R: rand::Rng>(out: &mut tokio::io::Stdout, local: &LocalMatch<R>) -> Result<()> {
    out.write_all(format!("\n{}\n\n{}\n", local.board(), local.status_line()).as_bytes())
        .await?;
    out.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_are_one_based() {
        assert_eq!(parse_input("1"), Some(Input::Cell(Position::TopLeft)));
        assert_eq!(parse_input(" 9 "), Some(Input::Cell(Position::BottomRight)));
        assert_eq!(parse_input("0"), None);
        assert_eq!(parse_input("10"), None);
    }

    #[test]
    fn test_labels_and_commands() {
        assert_eq!(parse_input("Center"), Some(Input::Cell(Position::Center)));
        assert_eq!(parse_input("top-left"), Some(Input::Cell(Position::TopLeft)));
        assert_eq!(
            parse_input("difficulty HARDER"),
            Some(Input::SetDifficulty(Difficulty::Harder))
        );
        assert_eq!(parse_input("difficulty"), None);
        assert_eq!(parse_input("new"), Some(Input::NewGame));
        assert_eq!(parse_input("q"), Some(Input::Quit));
        assert_eq!(parse_input(""), None);
        assert_eq!(parse_input("banana"), None);
    }
}
