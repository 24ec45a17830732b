use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

use anyhow::{Context, Result};
use serde::Deserialize;
use tokio::sync::mpsc;

use folio_core::{AppConfig, ManualScheduler};
use folio_ui::scroll::{AnimationConfigExt, ElementRect};
use folio_ui::{ScrollCoordinator, ScrollEvent, StaticLayout};

/// Page description read from `--layout`
#[derive(Debug, Deserialize)]
struct LayoutFile {
    viewport_height: f64,
    /// Navigation sections in document order
    #[serde(default)]
    sections: Vec<String>,
    /// Elements that get an entrance animation
    #[serde(default)]
    triggers: Vec<String>,
    #[serde(default)]
    elements: HashMap<String, ElementRect>,
}

pub fn run(config: &AppConfig, path: &Path, offsets: &[f64]) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read layout file {}", path.display()))?;
    let file: LayoutFile = serde_json::from_str(&content)
        .with_context(|| format!("Invalid layout file {}", path.display()))?;

    let mut layout = StaticLayout::new(file.viewport_height);
    layout.elements = file.elements;

    // Simulated clock: each offset is held long enough for entrances to finish
    let clock = ManualScheduler::new();
    let settle = config.animation.animation_duration();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut coordinator =
        ScrollCoordinator::new(&config.scroll, &config.animation, Rc::new(clock.clone()))?
            .with_event_sender(tx);

    coordinator.register(file.sections.iter().cloned());
    let triggers: Vec<_> = file
        .triggers
        .iter()
        .map(|id| (id.clone(), coordinator.observe_default(id.clone())))
        .collect();

    coordinator.mount(&layout);
    println!("mount:");
    print_events(&mut rx);

    for &offset in offsets {
        layout.scroll_to(offset);
        coordinator.evaluate(&layout);

        println!("scroll {}:", offset);
        print_events(&mut rx);

        clock.advance(settle);
        println!(
            "  active: {}",
            coordinator.active_section().unwrap_or("(none)")
        );
        for (element_id, id) in &triggers {
            let played = coordinator.is_played(*id).unwrap_or(false);
            let active = coordinator.is_active(*id).unwrap_or(false);
            let state = coordinator.visual_state(*id);
            match state {
                Some(state) => println!(
                    "  {}: {} active={} opacity={:.2} x={:.1} y={:.1} scale={:.2}",
                    element_id,
                    if played { "played" } else { "not played" },
                    active,
                    state.opacity,
                    state.offset_x,
                    state.offset_y,
                    state.scale
                ),
                None => println!("  {}: detached", element_id),
            }
        }
    }

    if !file.sections.is_empty() {
        println!("\nNavigation targets:");
        for section in &file.sections {
            match coordinator.scroll_target(section, &layout) {
                Some(y) => println!("  {} -> {:.0}", section, y),
                None => println!("  {} -> (not laid out)", section),
            }
        }
    }

    coordinator.destroy();
    Ok(())
}

/// Print everything the coordinator emitted since the last call
fn print_events(rx: &mut mpsc::UnboundedReceiver<ScrollEvent>) {
    for line in drain_events(rx) {
        println!("  {}", line);
    }
}

fn drain_events(rx: &mut mpsc::UnboundedReceiver<ScrollEvent>) -> Vec<String> {
    let mut lines = Vec::new();
    while let Ok(event) = rx.try_recv() {
        lines.push(match event {
            ScrollEvent::ActiveSectionChanged { previous, current } => format!(
                "section {} -> {}",
                previous.as_deref().unwrap_or("(none)"),
                current
            ),
            ScrollEvent::Entered { element_id, .. } => format!("enter {}", element_id),
            ScrollEvent::Reversed { element_id, .. } => format!("leave {}", element_id),
        });
    }
    lines
}
