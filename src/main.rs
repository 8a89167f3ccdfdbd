// SPDX-License-Identifier: GPL-3.0-only

//! Keypopup session replayer
//!
//! Replays a scripted gesture session (JSON) against the key popup engine and
//! prints every committed action, one per line. Used to check popup placement
//! and selection on a given device profile without a rendering toolkit.

use std::error::Error;
use std::fs;

use clap::Parser;
use serde::Deserialize;

use keypopup::app_settings;
use keypopup::config::EngineConfig;
use keypopup::layout::{parse_layout_table_file, KeyCap, LayoutTable, ParseError};
use keypopup::popup::{GestureEvent, GestureOutcome, KeyboardContainer, Rect, Size};

#[derive(Parser, Debug)]
#[command(name = "keypopup")]
#[command(about = "Replay a gesture script against the key popup engine", long_about = None)]
struct Args {
    /// Gesture script (JSON)
    #[arg(required_unless_present = "list_profiles")]
    script: Option<String>,

    /// Engine config (JSON)
    #[arg(short, long)]
    config: Option<String>,

    /// Layout table replacing the built-in one (JSON)
    #[arg(short, long)]
    table: Option<String>,

    /// Print the layout profiles and exit
    #[arg(long)]
    list_profiles: bool,
}

/// One key of a scripted keyboard.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScriptKey {
    key_cap: KeyCap,
    frame: Rect,
    #[serde(default)]
    hit_test_frame: Option<Rect>,
    #[serde(default = "enabled_by_default")]
    enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

/// A scripted session: the observed screen, the keys, and the events.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Script {
    screen: Size,
    keys: Vec<ScriptKey>,
    events: Vec<GestureEvent>,
}

fn load_script(path: &str) -> Result<Script, ParseError> {
    let json = fs::read_to_string(path).map_err(|e| ParseError::io_error_with_path(e, path))?;
    serde_json::from_str(&json).map_err(|e| ParseError::json_error_with_path(e, path))
}

fn print_profiles(table: &LayoutTable) {
    for screen in table.screens() {
        let Some(profile) = table.get(screen) else {
            continue;
        };
        let marker = if screen == table.default_profile().screen() {
            " (default)"
        } else {
            ""
        };
        println!(
            "{:>9}  key {:>5.2} x {:>4.1}  gap {:>3.1}  row gap {:>5.2}  {}{}",
            screen.to_string(),
            profile.key_button_width(),
            profile.key_height(),
            profile.button_gap(),
            profile.key_row_gap(),
            profile.device().unwrap_or("-"),
            marker
        );
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(app_settings::LOG_DIRECTIVE.parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EngineConfig::load(path)?.into_value(),
        None => EngineConfig::default(),
    };

    let table = match &args.table {
        Some(path) => parse_layout_table_file(path)?.into_value(),
        None => LayoutTable::builtin(),
    };
    let table = config.apply_to(table)?;

    if args.list_profiles {
        print_profiles(&table);
        return Ok(());
    }

    let Some(script_path) = args.script.as_deref() else {
        return Err("no gesture script given".into());
    };
    let script = load_script(script_path)?;

    let mut keyboard = KeyboardContainer::for_screen(&table, script.screen, &config);
    for key in script.keys {
        let id = keyboard.add_key(key.key_cap, key.frame);
        keyboard.set_hit_test_frame(id, key.hit_test_frame);
        keyboard.set_key_enabled(id, key.enabled);
    }

    tracing::info!(
        "Session start: {} key(s), {} event(s), profile {}",
        keyboard.len(),
        script.events.len(),
        keyboard.geometry().profile().screen()
    );

    let mut committed = 0;
    for event in script.events {
        let outcome = keyboard.dispatch(event);
        match &outcome {
            GestureOutcome::Committed { key, action } => {
                tracing::info!("Key {} committed {}", key.0, action);
                println!("{}", action);
                committed += 1;
            }
            other => tracing::debug!("{:?} -> {:?}", event, other),
        }
    }

    tracing::info!("Session end: {} action(s) committed", committed);
    Ok(())
}
