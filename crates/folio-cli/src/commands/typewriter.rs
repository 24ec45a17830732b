use std::io::{self, Write};
use std::rc::Rc;

use anyhow::Result;
use crossterm::{
    cursor, execute,
    style::Print,
    terminal::{Clear, ClearType},
};
use tokio::task::LocalSet;
use tracing::debug;

use folio_core::{AppConfig, Scheduler, TokioScheduler, TypewriterConfig};
use folio_ui::Typewriter;

/// Cycle the phrases on the current terminal line until Ctrl-C or `cycles` passes
pub async fn run(config: &AppConfig, phrases: Vec<String>, cycles: Option<usize>) -> Result<()> {
    let phrases = if phrases.is_empty() {
        config.ui.hero_phrases.clone()
    } else {
        phrases
    };
    let timing = config.typewriter.clone();

    // Timer callbacks are !Send, so the engine lives on a LocalSet
    let local = LocalSet::new();
    local
        .run_until(async move {
            let scheduler: Rc<dyn Scheduler> = Rc::new(TokioScheduler::new());
            let mut stdout = io::stdout();
            animate(&mut stdout, phrases, timing, scheduler, cycles).await?;
            Ok(())
        })
        .await
}

/// Render every text change to `out`; returns the number of completed passes
async fn animate<W: Write>(
    out: &mut W,
    phrases: Vec<String>,
    timing: TypewriterConfig,
    scheduler: Rc<dyn Scheduler>,
    cycles: Option<usize>,
) -> Result<usize> {
    let typewriter = Typewriter::new(phrases, timing, scheduler)?;
    let mut text_rx = typewriter.subscribe();
    let mut passes_rx = typewriter.subscribe_passes();
    let limit_reached = |passes: usize| cycles.is_some_and(|limit| passes >= limit);

    render(out, &text_rx.borrow_and_update())?;

    let mut completed = 0;
    while !limit_reached(completed) {
        tokio::select! {
            changed = text_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let text = text_rx.borrow_and_update().clone();
                render(out, &text)?;
            }
            changed = passes_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                completed = *passes_rx.borrow_and_update();
                debug!(completed, "Phrase list pass finished");
            }
            _ = tokio::signal::ctrl_c() => {
                debug!("Interrupted");
                break;
            }
        }
    }

    typewriter.destroy();
    writeln!(out)?;
    Ok(completed)
}

fn render<W: Write>(out: &mut W, text: &str) -> Result<()> {
    execute!(
        out,
        cursor::MoveToColumn(0),
        Clear(ClearType::CurrentLine),
        Print(text),
        Print("|"),
    )?;
    Ok(())
}
