//! Terminal UI rendering

use ratatui::{
    layout::{Alignment as LineAlign, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block as Panel, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use scribe_core::matcher::above;
use scribe_core::{Alignment, BlockFormat, BlockType, Document, Format, Leaf, MarkType};

use crate::app::{text_blocks, App, Mode};
use crate::config::CheckListStyle;
use crate::keys::BLOCK_KEYS;

// Catppuccin Mocha colors
const SURFACE0: Color = Color::Rgb(49, 50, 68);
const SURFACE1: Color = Color::Rgb(69, 71, 90);
const TEXT: Color = Color::Rgb(205, 214, 244);
const SUBTEXT0: Color = Color::Rgb(166, 173, 200);
const GREEN: Color = Color::Rgb(166, 227, 161);
const BLUE: Color = Color::Rgb(137, 180, 250);
const MAUVE: Color = Color::Rgb(203, 166, 247);
const TEAL: Color = Color::Rgb(148, 226, 213);
const PEACH: Color = Color::Rgb(250, 179, 135);

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title bar
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_title_bar(frame, app, chunks[0]);
    draw_main_area(frame, app, chunks[1]);
    draw_status_bar(frame, app, chunks[2]);

    if app.mode == Mode::Help {
        draw_help(frame, app);
    }
}

fn draw_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let (first, last) = app.selected_blocks();
    let title_text = format!(
        " Scribe - {} [{} words] [blocks {}-{}/{}]",
        app.title(),
        app.session.word_count(),
        first + 1,
        last + 1,
        app.block_count()
    );

    let title_bar = Paragraph::new(title_text).style(Style::default().fg(TEXT).bg(SURFACE0));
    frame.render_widget(title_bar, area);
}

fn draw_main_area(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),     // Document
            Constraint::Length(26), // Toolbar
        ])
        .split(area);

    draw_document(frame, app, chunks[0]);
    draw_toolbar(frame, app, chunks[1]);
}

/// Text shown before a block's content
fn block_prefix(document: &Document, block_path: &[usize], check_list: CheckListStyle) -> String {
    let Some(block) = document.block(block_path) else {
        return String::new();
    };
    match block.block_type {
        BlockType::HeadingOne => "# ".to_string(),
        BlockType::HeadingTwo => "## ".to_string(),
        BlockType::BlockQuote => "│ ".to_string(),
        BlockType::CheckListItem => match check_list {
            CheckListStyle::Boxes if block.checked == Some(true) => "[x] ".to_string(),
            CheckListStyle::Boxes => "[ ] ".to_string(),
            CheckListStyle::Plain => String::new(),
        },
        BlockType::ListItem => {
            let list = above(document, block_path, |n| {
                n.block_type().is_some_and(|t| t.is_list())
            });
            match list {
                Some((node, list_path)) if node.block_type() == Some(BlockType::NumberedList) => {
                    let index = block_path.get(list_path.len()).copied().unwrap_or(0);
                    format!("{}. ", index + 1)
                }
                Some(_) => "• ".to_string(),
                None => "- ".to_string(),
            }
        }
        _ => String::new(),
    }
}

fn leaf_style(leaf: &Leaf, base: Style) -> Style {
    let mut style = base;
    for mark in &leaf.marks {
        style = match mark {
            MarkType::Bold => style.add_modifier(Modifier::BOLD),
            MarkType::Italic => style.add_modifier(Modifier::ITALIC),
            MarkType::Underline => style.add_modifier(Modifier::UNDERLINED),
            MarkType::Code => style.fg(TEAL),
        };
    }
    style
}

fn line_alignment(align: Option<Alignment>) -> LineAlign {
    match align {
        Some(Alignment::Center) => LineAlign::Center,
        Some(Alignment::Right) => LineAlign::Right,
        // terminals cannot justify; fall back to left
        Some(Alignment::Left) | Some(Alignment::Justify) | None => LineAlign::Left,
    }
}

fn draw_document(frame: &mut Frame, app: &App, area: Rect) {
    let panel = Panel::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(BLUE))
        .title("Document");
    let inner = panel.inner(area);
    frame.render_widget(panel, area);

    let document = app.session.document();
    let (first, last) = app.selected_blocks();

    let lines: Vec<Line> = text_blocks(document)
        .iter()
        .enumerate()
        .filter_map(|(ix, block_path)| {
            let node = document.node(block_path)?;
            let block = node.as_block()?;
            let selected = ix >= first && ix <= last;

            let mut base = Style::default().fg(TEXT);
            if block.block_type == BlockType::BlockQuote {
                base = base.fg(SUBTEXT0).add_modifier(Modifier::ITALIC);
            }
            if matches!(block.block_type, BlockType::HeadingOne | BlockType::HeadingTwo) {
                base = base.fg(MAUVE).add_modifier(Modifier::BOLD);
            }
            if app.check_list == CheckListStyle::Plain && app.is_checked(node) {
                base = base.fg(SUBTEXT0).add_modifier(Modifier::CROSSED_OUT);
            }
            if selected {
                base = base.bg(SURFACE1);
            }

            let gutter = if ix == app.cursor { ">" } else { " " };
            let indent = "  ".repeat(block_path.len().saturating_sub(1));
            let mut spans = vec![
                Span::styled(gutter, Style::default().fg(PEACH)),
                Span::styled(
                    format!("{indent}{}", block_prefix(document, block_path, app.check_list)),
                    base.fg(SUBTEXT0),
                ),
            ];
            spans.extend(
                block
                    .children
                    .iter()
                    .filter_map(|child| child.as_leaf())
                    .map(|leaf| Span::styled(leaf.text.clone(), leaf_style(leaf, base))),
            );
            Some(Line::from(spans).alignment(line_alignment(block.align)))
        })
        .collect();

    let offset = scroll_offset(&lines, app.cursor, inner.width, inner.height);
    let paragraph = Paragraph::new(lines)
        .scroll((offset, 0))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, inner);
}

/// Rows `lines` take up once wrapped to `width`
fn wrapped_rows(lines: &[Line<'_>], width: u16) -> usize {
    Paragraph::new(lines.to_vec())
        .wrap(Wrap { trim: false })
        .line_count(width)
}

/// First visible row that keeps the cursor block on screen, counted in
/// wrapped rows so long blocks push the view further
fn scroll_offset(lines: &[Line<'_>], cursor: usize, width: u16, height: u16) -> u16 {
    let cursor = cursor.min(lines.len().saturating_sub(1));
    let before = wrapped_rows(&lines[..cursor], width);
    let through = wrapped_rows(&lines[..(cursor + 1).min(lines.len())], width);
    let offset = through.saturating_sub(height as usize).min(before);
    u16::try_from(offset).unwrap_or(u16::MAX)
}

fn draw_toolbar(frame: &mut Frame, app: &App, area: Rect) {
    let panel = Panel::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(SUBTEXT0))
        .title("Formats");

    let marks = MarkType::all().iter().map(|mark| {
        let key = app
            .session
            .hotkeys
            .hotkey_for(*mark)
            .map(|h| h.to_string())
            .unwrap_or_default();
        (Format::Mark(*mark), key)
    });
    let blocks = BlockFormat::toolbar().iter().map(|format| {
        let key = BLOCK_KEYS
            .iter()
            .find(|(_, f)| f == format)
            .map(|(c, _)| c.to_string())
            .unwrap_or_default();
        (Format::Block(*format), key)
    });

    let items: Vec<ListItem> = marks
        .chain(blocks)
        .map(|(format, key)| {
            let active = app.session.is_active(format);
            let (marker, style) = if active {
                ("●", Style::default().fg(GREEN).add_modifier(Modifier::BOLD))
            } else {
                ("○", Style::default().fg(SUBTEXT0))
            };
            ListItem::new(format!("{marker} {:<14}{key}", format.to_string())).style(style)
        })
        .collect();

    let list = List::new(items).block(panel);
    frame.render_widget(list, area);
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mode_str = match app.mode {
        Mode::Normal => "NORMAL",
        Mode::Help => "HELP",
    };

    let status = app.session.status_message.as_deref().unwrap_or("");
    let help_hint = "j/k move | J/K extend | s save | ? help | q quit";

    let status_text = format!(
        " {} | {}",
        mode_str,
        if status.is_empty() { help_hint } else { status },
    );

    let status_bar = Paragraph::new(status_text).style(Style::default().fg(SUBTEXT0).bg(SURFACE0));
    frame.render_widget(status_bar, area);
}

fn draw_help(frame: &mut Frame, app: &App) {
    let area = centered_rect(56, 26, frame.area());
    frame.render_widget(Clear, area);

    let panel = Panel::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(BLUE))
        .title("Help (press any key to close)");

    let heading = |text: &'static str| {
        Line::from(Span::styled(text, Style::default().fg(MAUVE).add_modifier(Modifier::BOLD)))
    };

    let mut help_text = vec![
        heading("Selection"),
        Line::from("  j/k      Move to next/prev block"),
        Line::from("  J/K      Extend selection down/up"),
        Line::from("  g/G      Go to top/bottom"),
        Line::from(""),
        heading("Marks"),
    ];
    for (hotkey, mark) in app.session.hotkeys.bindings() {
        help_text.push(Line::from(format!("  {:<9}{mark}", hotkey.to_string())));
    }
    help_text.push(Line::from(""));
    help_text.push(heading("Blocks"));
    for (key, format) in BLOCK_KEYS {
        help_text.push(Line::from(format!("  {key:<9}{format}")));
    }
    help_text.extend([
        Line::from("  x        Toggle checked"),
        Line::from(""),
        heading("File"),
        Line::from("  s        Save document"),
        Line::from("  e        Export session as JSON"),
    ]);

    let paragraph = Paragraph::new(help_text).block(panel);
    frame.render_widget(paragraph, area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}
