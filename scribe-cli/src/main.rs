//! Scribe CLI - terminal front end for the rich-text formatting engine

mod app;
mod cli;
mod config;
mod io;
mod keys;
mod ui;

use std::fs::File;
use std::io::stdout;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use ratatui::prelude::*;
use tracing::{debug, info};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::filter::LevelFilter;

use scribe_core::{
    commands, seed_document, BlockFormat, Editor, Format, MarkType, Platform, Session,
};

use app::{App, Mode};
use cli::{Action, Cli, Command, SelectionArgs};
use config::Config;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let interactive = matches!(cli.command, None | Some(Command::Edit { .. }));
    init_logging(cli.verbose, cli.log_file.as_deref(), interactive)?;

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Some(Command::Seed { output }) => io::write_output(output.as_deref(), &seed_document()),
        Some(Command::Apply {
            file,
            selection,
            actions,
            output,
        }) => apply(&file, &selection, &actions, output.as_deref()),
        Some(Command::Query {
            file,
            selection,
            json,
        }) => query(&file, &selection, json),
        Some(Command::Edit { file }) => edit(file, &config),
        None => edit(None, &config),
    }
}

/// Logs go to stderr, or to `log_file`. The editor owns the terminal, so
/// it only logs when a file is given.
fn init_logging(verbose: u8, log_file: Option<&Path>, interactive: bool) -> Result<()> {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    let (writer, level) = match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file: {}", path.display()))?;
            (BoxMakeWriter::new(Mutex::new(file)), level)
        }
        None if interactive => (BoxMakeWriter::new(std::io::sink), LevelFilter::OFF),
        None => (BoxMakeWriter::new(std::io::stderr), level),
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(writer)
        .with_ansi(log_file.is_none())
        .with_target(false)
        .init();
    Ok(())
}

fn load_editor(file: &Path, selection: &SelectionArgs) -> Result<Editor> {
    let document = io::load_document(file)?;
    let range = selection.range();
    document
        .validate_range(&range)
        .with_context(|| format!("Selection {range} does not fit {}", file.display()))?;
    Ok(Editor::new(document).with_selection(range))
}

fn apply(
    file: &Path,
    selection: &SelectionArgs,
    actions: &[Action],
    output: Option<&Path>,
) -> Result<()> {
    let mut editor = load_editor(file, selection)?;

    for action in actions {
        editor = match action {
            Action::Toggle(Format::Block(format)) => commands::toggle_block(&editor, *format),
            Action::Toggle(Format::Mark(mark)) => commands::toggle_mark(&editor, *mark),
            Action::Checked => commands::toggle_checked(&editor),
        }
        .with_context(|| format!("Failed to toggle {action}"))?;
        debug!(%action, selection = ?editor.selection, "applied");
    }

    if editor.marks.is_some() {
        info!("collapsed selection: mark toggles only changed the cursor marks");
    }
    io::write_output(output, &editor.document)
}

/// Activity of every toolbar format over the editor's selection
fn active_formats(editor: &Editor) -> Vec<(Format, bool)> {
    let marks = MarkType::all().iter().map(|mark| Format::Mark(*mark));
    let blocks = BlockFormat::toolbar().iter().map(|format| Format::Block(*format));
    marks
        .chain(blocks)
        .map(|format| {
            let active = match format {
                Format::Block(block) => commands::is_block_active(editor, block),
                Format::Mark(mark) => commands::is_mark_active(editor, mark),
            };
            (format, active)
        })
        .collect()
}

fn query(file: &Path, selection: &SelectionArgs, json: bool) -> Result<()> {
    let editor = load_editor(file, selection)?;
    let formats = active_formats(&editor);

    if json {
        let object: serde_json::Map<String, serde_json::Value> = formats
            .iter()
            .map(|(format, active)| (format.to_string(), serde_json::Value::Bool(*active)))
            .collect();
        println!("{}", serde_json::to_string_pretty(&object)?);
        return Ok(());
    }
    for (format, active) in formats {
        println!("{format}\t{}", if active { "active" } else { "-" });
    }
    Ok(())
}

fn edit(file: Option<PathBuf>, config: &Config) -> Result<()> {
    let mut session = match &file {
        Some(path) => io::load_session(path)?,
        None => Session::seeded(),
    };
    // Terminals report Ctrl, never Cmd, so `mod` always means Ctrl here
    session.hotkeys = config.hotkey_table(Platform::Other)?;

    let mut app = App::new(session, config.display.check_list);
    match &file {
        Some(path) => app.set_status(&format!("Loaded {}", path.display())),
        None => app.set_status("Welcome document loaded. Press ? for help."),
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    // Lets Ctrl+I and friends arrive as themselves instead of Tab etc.
    let enhanced = supports_keyboard_enhancement().unwrap_or(false);
    if enhanced {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        )?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    if enhanced {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = res {
        eprintln!("Error: {}", e);
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    while app.running {
        terminal.draw(|f| ui::draw(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            // Clear status on any key
            app.clear_status();

            match app.mode {
                Mode::Normal => handle_normal_mode(app, &key),
                Mode::Help => {
                    app.mode = Mode::Normal;
                }
            }
        }
    }
    Ok(())
}

fn handle_normal_mode(app: &mut App, key: &KeyEvent) {
    if let Some(press) = keys::key_press(key) {
        if app.handle_hotkey(&press) {
            return;
        }
    }
    // Unbound chords never fall through to the plain-key commands
    if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            app.running = false;
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.running = false,
        KeyCode::Char('?') => app.mode = Mode::Help,

        // Selection
        KeyCode::Char('j') | KeyCode::Down => app.move_down(),
        KeyCode::Char('k') | KeyCode::Up => app.move_up(),
        KeyCode::Char('J') => app.extend_down(),
        KeyCode::Char('K') => app.extend_up(),
        KeyCode::Char('g') => app.move_to_top(),
        KeyCode::Char('G') => app.move_to_bottom(),

        KeyCode::Char('x') => app.toggle_checked(),

        // File
        KeyCode::Char('s') => match io::save_session(&app.session) {
            Ok(path) => app.set_status(&format!("Saved to {}", path.display())),
            Err(e) => app.set_status(&format!("Save failed: {}", e)),
        },
        KeyCode::Char('e') => match io::export_session(&app.session) {
            Ok(path) => app.set_status(&format!("Exported to {}", path.display())),
            Err(e) => app.set_status(&format!("Export failed: {}", e)),
        },

        KeyCode::Char(c) => match keys::block_format_for(c) {
            Some(format) => app.toggle(Format::Block(format)),
            None => app.set_status(&format!("Unbound key: {c}")),
        },

        _ => {}
    }
}
