use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use markdown_compass_config::Config;
use markdown_compass_engine::{Document, TokenKind, flatten_toc, segments};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Position},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use std::{
    env,
    io::{Stdout, stdout},
    path::{Path, PathBuf},
    process,
};

const UNTITLED: &str = "untitled.md";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Editor,
    Toc,
}

/// One visible TOC entry, detached from the document's analysis.
struct TocRow {
    depth: usize,
    text: String,
    line: usize,
    id: String,
}

struct App {
    path: PathBuf,
    doc: Document,
    caret: usize,
    focus: Focus,
    toc_state: ListState,
    toc_max_level: u8,
    sync_on_caret: bool,
    /// First document line shown in the editor panel.
    scroll: usize,
    /// First character column shown in the editor panel.
    hscroll: usize,
    /// Editor rows available at the last draw, used for paging.
    page: usize,
    message: Option<String>,
}

impl App {
    fn new(path: PathBuf, doc: Document, config: &Config) -> Self {
        let mut app = Self {
            path,
            doc,
            caret: 0,
            focus: Focus::Editor,
            toc_state: ListState::default(),
            toc_max_level: config.toc_max_level,
            sync_on_caret: config.sync_on_caret,
            scroll: 0,
            hscroll: 0,
            page: 20,
            message: None,
        };
        if !app.toc_rows().is_empty() {
            app.toc_state.select(Some(0));
        }
        app
    }

    fn toc_rows(&mut self) -> Vec<TocRow> {
        let max_level = self.toc_max_level;
        flatten_toc(&self.doc.analysis().toc, Some(max_level))
            .into_iter()
            .map(|(depth, node)| TocRow {
                depth,
                text: node.text.clone(),
                line: node.line,
                id: node.id.clone(),
            })
            .collect()
    }

    /// Selects the TOC entry of the caret's section. A section hidden by
    /// `toc_max_level` selects the nearest visible entry above it. A caret
    /// with no section leaves the selection where it was.
    fn sync_toc(&mut self) {
        if !self.sync_on_caret {
            return;
        }
        let Some(slug) = self.doc.resolve_section(self.caret).map(str::to_string) else {
            return;
        };
        let (line, _) = self.doc.line_col(self.caret);
        let rows = self.toc_rows();
        let selected = rows
            .iter()
            .position(|row| row.id == slug)
            .or_else(|| rows.iter().rposition(|row| row.line <= line));
        if let Some(i) = selected {
            self.toc_state.select(Some(i));
        }
    }

    fn move_left(&mut self) {
        let text = &self.doc.analysis().text;
        self.caret = prev_boundary(text, self.caret);
        self.sync_toc();
    }

    fn move_right(&mut self) {
        let text = &self.doc.analysis().text;
        self.caret = next_boundary(text, self.caret);
        self.sync_toc();
    }

    fn move_vertical(&mut self, lines: isize) {
        let (line, _) = self.doc.line_col(self.caret);
        let last = self.doc.line_count().saturating_sub(1);
        let target = line.saturating_add_signed(lines).min(last);
        let from_start = self.doc.offset_of_line(line);
        let to_start = self.doc.offset_of_line(target);

        let text = &self.doc.analysis().text;
        let col = text[from_start..self.caret].chars().count();
        self.caret = column_offset(text, to_start, col);
        self.sync_toc();
    }

    fn move_home(&mut self) {
        let (line, _) = self.doc.line_col(self.caret);
        self.caret = self.doc.offset_of_line(line);
        self.sync_toc();
    }

    fn move_end(&mut self) {
        let (line, _) = self.doc.line_col(self.caret);
        let start = self.doc.offset_of_line(line);
        let text = &self.doc.analysis().text;
        self.caret = column_offset(text, start, usize::MAX);
        self.sync_toc();
    }

    fn insert(&mut self, s: &str) {
        self.caret = self.doc.insert(self.caret, s);
        self.message = None;
        self.sync_toc();
    }

    fn backspace(&mut self) {
        let prev = prev_boundary(&self.doc.analysis().text, self.caret);
        if prev < self.caret {
            self.caret = self.doc.delete(prev..self.caret);
            self.message = None;
            self.sync_toc();
        }
    }

    fn delete_forward(&mut self) {
        let next = next_boundary(&self.doc.analysis().text, self.caret);
        if next > self.caret {
            self.caret = self.doc.delete(self.caret..next);
            self.message = None;
            self.sync_toc();
        }
    }

    fn toc_step(&mut self, forward: bool) {
        let len = self.toc_rows().len();
        if len == 0 {
            return;
        }
        let i = match self.toc_state.selected() {
            Some(i) if forward => (i + 1) % len,
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.toc_state.select(Some(i));
    }

    /// Moves the caret to the start of the selected header and returns focus
    /// to the editor.
    fn jump_to_selected(&mut self) {
        let rows = self.toc_rows();
        if let Some(row) = self.toc_state.selected().and_then(|i| rows.get(i)) {
            self.caret = self.doc.offset_of_line(row.line);
            log::debug!("jumped to section {} at line {}", row.id, row.line);
        }
        self.focus = Focus::Editor;
    }

    fn save(&mut self) -> Result<()> {
        std::fs::write(&self.path, self.doc.to_bytes())
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        log::info!("saved {} (version {})", self.path.display(), self.doc.version());
        self.message = Some(format!("Saved {}", self.path.display()));
        Ok(())
    }

    /// Handles one key press. Returns `true` when the app should quit.
    fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return Ok(true),
            KeyCode::Char('q') if ctrl => return Ok(true),
            KeyCode::Char('s') if ctrl => {
                if let Err(e) = self.save() {
                    self.message = Some(format!("{e:#}"));
                }
            }
            KeyCode::Tab => {
                self.focus = match self.focus {
                    Focus::Editor => Focus::Toc,
                    Focus::Toc => Focus::Editor,
                };
            }
            _ if self.focus == Focus::Toc => match key.code {
                KeyCode::Down => self.toc_step(true),
                KeyCode::Up => self.toc_step(false),
                KeyCode::Enter => self.jump_to_selected(),
                _ => {}
            },
            KeyCode::Left => self.move_left(),
            KeyCode::Right => self.move_right(),
            KeyCode::Up => self.move_vertical(-1),
            KeyCode::Down => self.move_vertical(1),
            KeyCode::PageUp => self.move_vertical(-(self.page as isize)),
            KeyCode::PageDown => self.move_vertical(self.page as isize),
            KeyCode::Home => self.move_home(),
            KeyCode::End => self.move_end(),
            KeyCode::Enter => self.insert("\n"),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete_forward(),
            KeyCode::Char(c) if !ctrl => {
                let mut buf = [0u8; 4];
                self.insert(c.encode_utf8(&mut buf));
            }
            _ => {}
        }
        Ok(false)
    }
}

fn prev_boundary(text: &str, at: usize) -> usize {
    text[..at].chars().next_back().map_or(at, |c| at - c.len_utf8())
}

fn next_boundary(text: &str, at: usize) -> usize {
    text[at..].chars().next().map_or(at, |c| at + c.len_utf8())
}

/// Offset of the `col`-th character of the line starting at `line_start`,
/// clamped to the end of that line.
fn column_offset(text: &str, line_start: usize, col: usize) -> usize {
    let line = &text[line_start..];
    let line_len = line.find('\n').unwrap_or(line.len());
    line[..line_len]
        .char_indices()
        .nth(col)
        .map_or(line_start + line_len, |(i, _)| line_start + i)
}

/// Display style for each token kind.
fn style_for(kind: TokenKind) -> Style {
    match kind {
        TokenKind::Text => Style::default(),
        k if k.is_marker() => Style::default().fg(Color::DarkGray),
        TokenKind::Header => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
        TokenKind::Bold => Style::default().add_modifier(Modifier::BOLD),
        TokenKind::Italic => Style::default().add_modifier(Modifier::ITALIC),
        TokenKind::Code => Style::default().fg(Color::Green),
        TokenKind::LinkText | TokenKind::ImageAlt => Style::default()
            .fg(Color::Blue)
            .add_modifier(Modifier::UNDERLINED),
        TokenKind::LinkUrl | TokenKind::ImageUrl => Style::default().fg(Color::DarkGray),
        TokenKind::Strikethrough => Style::default().add_modifier(Modifier::CROSSED_OUT),
        TokenKind::Blockquote => Style::default()
            .fg(Color::Gray)
            .add_modifier(Modifier::ITALIC),
        TokenKind::HorizontalRule | TokenKind::TableRow => Style::default().fg(Color::Magenta),
        _ => Style::default(),
    }
}

/// Keeps the `width` display columns of `line` starting at column `skip`.
fn crop_line(line: Line<'static>, skip: usize, width: usize) -> Line<'static> {
    let end = skip.saturating_add(width);
    let mut col = 0;
    let mut spans = Vec::new();
    for span in line.spans {
        if col >= end {
            break;
        }
        let len = span.content.chars().count();
        let (from, to) = (skip.max(col), end.min(col + len));
        if from < to {
            let part: String = span.content.chars().skip(from - col).take(to - from).collect();
            spans.push(Span::styled(part, span.style));
        }
        col += len;
    }
    Line::from(spans)
}

/// Moves `offset` the least amount that brings `pos` into a window of `size`.
fn scroll_to_show(offset: usize, pos: usize, size: usize) -> usize {
    if pos < offset {
        pos
    } else if pos >= offset + size {
        pos + 1 - size
    } else {
        offset
    }
}

/// Splits the highlighted segments of `text` into display lines.
///
/// Tabs show as a single space and carriage returns are dropped so that one
/// character is one column.
fn highlighted_lines(text: &str) -> Vec<Line<'static>> {
    let mut lines = vec![Line::default()];
    for seg in segments(text) {
        let style = style_for(seg.kind);
        for (i, part) in seg.content.split('\n').enumerate() {
            if i > 0 {
                lines.push(Line::default());
            }
            let part = part.replace('\r', "").replace('\t', " ");
            if part.is_empty() {
                continue;
            }
            if let Some(line) = lines.last_mut() {
                line.spans.push(Span::styled(part, style));
            }
        }
    }
    lines
}

fn resolve_path(arg: Option<&String>, config: &Config) -> PathBuf {
    let file = PathBuf::from(arg.map_or(UNTITLED, String::as_str));
    if let Some(found) = config.resolve_document(&file) {
        return found;
    }
    match &config.docs_path {
        Some(docs) if file.is_relative() && arg.is_none() => docs.join(file),
        _ => file,
    }
}

fn load_document(path: &Path) -> Result<Document> {
    if !path.exists() {
        log::info!("{} does not exist yet, starting empty", path.display());
        return Ok(Document::default());
    }
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let doc = Document::from_bytes(&bytes)
        .with_context(|| format!("Failed to load {}", path.display()))?;
    Ok(doc)
}

/// Sends log output to a file so it does not draw over the terminal UI.
fn init_logging() {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    let log_path = env::temp_dir().join("markdown-compass.log");
    if let Ok(file) = std::fs::File::create(&log_path) {
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
}

fn main() -> Result<()> {
    init_logging();
    log::info!("markdown-compass starting up!");

    let args: Vec<String> = env::args().collect();
    if args.len() > 2 {
        eprintln!("Usage: {} [FILE]", args[0]);
        process::exit(1);
    }

    let config = match Config::load() {
        Ok(Some(config)) => config,
        Ok(None) => Config::default(),
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            eprintln!("Config path: {}", Config::config_path().display());
            process::exit(1);
        }
    };

    let path = resolve_path(args.get(1), &config);
    let doc = load_document(&path)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(path, doc, &config);

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && app.handle_key(key)?
        {
            return Ok(());
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1), Constraint::Length(1)].as_ref())
        .split(f.area());
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)].as_ref())
        .split(rows[0]);

    let focused = Style::default().fg(Color::Yellow);

    // TOC panel
    let toc = app.toc_rows();
    if app.toc_state.selected().is_some_and(|i| i >= toc.len()) {
        app.toc_state.select(toc.len().checked_sub(1));
    }
    let toc_items: Vec<ListItem> = toc
        .iter()
        .map(|row| {
            let indent = "  ".repeat(row.depth);
            ListItem::new(Line::from(Span::raw(format!("{indent}{}", row.text))))
        })
        .collect();
    let mut toc_block = Block::default().borders(Borders::ALL).title("Contents");
    if app.focus == Focus::Toc {
        toc_block = toc_block.border_style(focused);
    }
    let toc_list = List::new(toc_items)
        .block(toc_block)
        .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));
    f.render_stateful_widget(toc_list, chunks[0], &mut app.toc_state);

    // Editor panel
    let editor_area = chunks[1];
    app.page = editor_area.height.saturating_sub(2).max(1) as usize;
    let width = editor_area.width.saturating_sub(2).max(1) as usize;
    let (line, _) = app.doc.line_col(app.caret);
    let line_start = app.doc.offset_of_line(line);
    app.scroll = scroll_to_show(app.scroll, line, app.page);

    let text = &app.doc.analysis().text;
    let col = text[line_start..app.caret].chars().count();
    app.hscroll = scroll_to_show(app.hscroll, col, width);
    // Only the visible window is handed to the widget, so offsets never
    // need to fit its u16 scroll position
    let lines: Vec<Line> = highlighted_lines(text)
        .into_iter()
        .skip(app.scroll)
        .take(app.page)
        .map(|l| crop_line(l, app.hscroll, width))
        .collect();

    let title = app
        .path
        .file_name()
        .map_or_else(|| UNTITLED.to_string(), |n| n.to_string_lossy().into_owned());
    let mut editor_block = Block::default().borders(Borders::ALL).title(title);
    if app.focus == Focus::Editor {
        editor_block = editor_block.border_style(focused);
    }
    let editor = Paragraph::new(lines).block(editor_block);
    f.render_widget(editor, editor_area);

    if app.focus == Focus::Editor
        && let (Ok(dx), Ok(dy)) = (
            u16::try_from(col - app.hscroll),
            u16::try_from(line - app.scroll),
        )
    {
        let x = editor_area.x.saturating_add(1).saturating_add(dx);
        let y = editor_area.y.saturating_add(1).saturating_add(dy);
        if x < editor_area.right().saturating_sub(1) && y < editor_area.bottom().saturating_sub(1) {
            f.set_cursor_position(Position { x, y });
        }
    }

    // Status line: current section and advisory issues
    let section = app
        .doc
        .resolve_section(app.caret)
        .map_or_else(|| "-".to_string(), |s| format!("#{s}"));
    let mut status = vec![
        Span::styled(format!(" {section} "), Style::default().fg(Color::Cyan)),
        Span::raw(format!("line {} ", line + 1)),
    ];
    if let Some(message) = &app.message {
        status.push(Span::styled(
            format!("| {message} "),
            Style::default().fg(Color::Green),
        ));
    }
    for issue in &app.doc.analysis().issues {
        status.push(Span::styled(
            format!("| {issue} "),
            Style::default().fg(Color::Red),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(status)), rows[1]);

    let help_text = Line::from(vec![
        Span::raw("Esc/Ctrl-Q: Quit | "),
        Span::raw("Ctrl-S: Save | "),
        Span::raw("Tab: Switch panel | "),
        Span::raw("Enter (contents): Jump to section"),
    ]);
    f.render_widget(Paragraph::new(help_text), rows[2]);
}
