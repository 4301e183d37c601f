mod buffer;

use anyhow::{Context, Result};
use buffer::EditBuffer;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use markdown_livepad_config::Config;
use markdown_livepad_engine::{
    EditorSession, HeadingIdStrategy, InlineOptions, MathDelimiters, RenderOptions, Renderer,
    SessionSettings, io,
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use std::{
    env,
    fs::File,
    io::stdout,
    path::{Path, PathBuf},
    process,
    time::{Duration, Instant},
};

/// How long to wait for input when no render is pending.
const IDLE_POLL: Duration = Duration::from_millis(500);

fn render_options(config: &Config) -> RenderOptions {
    RenderOptions {
        heading_ids: if config.preview.deduplicate_heading_ids {
            HeadingIdStrategy::Deduplicate
        } else {
            HeadingIdStrategy::Preserve
        },
        inline: InlineOptions {
            external_links_new_tab: config.preview.external_links_new_tab,
        },
        max_length: Some(config.editor.max_length),
    }
}

fn build_renderer(config: &Config) -> Renderer {
    let renderer = Renderer::new(render_options(config));
    if config.preview.math {
        renderer.with_post_processor(MathDelimiters)
    } else {
        renderer
    }
}

fn session_settings(config: &Config) -> SessionSettings {
    SessionSettings {
        history_size: config.editor.history_size,
        debounce: config.debounce(),
    }
}

fn document_title(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Untitled".to_string())
}

fn export_path(path: &Path, export_dir: Option<&Path>) -> PathBuf {
    let html = path.with_extension("html");
    match (export_dir, html.file_name()) {
        (Some(dir), Some(name)) => dir.join(name),
        _ => html,
    }
}

struct App {
    session: EditorSession,
    buffer: EditBuffer,
    path: PathBuf,
    export_dir: Option<PathBuf>,
    message: Option<String>,
}

impl App {
    fn new(path: PathBuf, config: &Config) -> Result<Self> {
        let content = if path.exists() {
            io::read_document(&path)?
        } else {
            String::new()
        };

        let session =
            EditorSession::with_renderer(content.as_str(), session_settings(config), build_renderer(config));
        let buffer = EditBuffer::new(&content, 0);

        Ok(Self {
            session,
            buffer,
            path,
            export_dir: config.file.export_dir.clone(),
            message: None,
        })
    }

    /// Pushes the buffer into the session after an edit.
    fn commit(&mut self) {
        let cursor = self.buffer.cursor();
        self.session
            .set_content_with_selection(self.buffer.text(), cursor..cursor);
    }

    /// Reloads the buffer after undo/redo changed the store.
    fn sync_from_store(&mut self) {
        let store = self.session.store();
        self.buffer = EditBuffer::new(&store.content(), store.selection().end);
    }

    fn move_cursor(&mut self, f: impl FnOnce(&mut EditBuffer)) {
        f(&mut self.buffer);
        let cursor = self.buffer.cursor();
        self.session.set_selection(cursor..cursor);
    }

    fn save(&mut self) {
        let content = self.session.store().content();
        self.message = Some(match io::write_document(&self.path, &content) {
            Ok(()) => {
                self.session.mark_saved();
                format!("Saved {}", self.path.display())
            }
            Err(e) => {
                log::warn!("save failed: {e}");
                format!("Save failed: {e}")
            }
        });
    }

    fn export(&mut self) {
        self.session.flush();
        let target = export_path(&self.path, self.export_dir.as_deref());
        let Some(result) = self.session.preview().current() else {
            self.message = Some("Nothing to export: the document has not rendered".to_string());
            return;
        };
        self.message = Some(
            match io::export_html(&target, &document_title(&self.path), &result.html) {
                Ok(()) => format!("Exported {}", target.display()),
                Err(e) => format!("Export failed: {e}"),
            },
        );
    }

    /// Returns `false` when the user asked to quit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        self.message = None;

        match key.code {
            KeyCode::Esc => return false,
            KeyCode::Char('q') if ctrl => return false,
            KeyCode::Char('s') if ctrl => self.save(),
            KeyCode::Char('e') if ctrl => self.export(),
            KeyCode::Char('z') if ctrl => {
                if self.session.undo() {
                    self.sync_from_store();
                } else {
                    self.message = Some("Nothing to undo".to_string());
                }
            }
            KeyCode::Char('y') if ctrl => {
                if self.session.redo() {
                    self.sync_from_store();
                } else {
                    self.message = Some("Nothing to redo".to_string());
                }
            }
            KeyCode::Char(c) if !ctrl => {
                self.buffer.insert_char(c);
                self.commit();
            }
            KeyCode::Enter => {
                self.buffer.insert_char('\n');
                self.commit();
            }
            KeyCode::Tab => {
                self.buffer.insert_str("    ");
                self.commit();
            }
            KeyCode::Backspace => {
                if self.buffer.backspace() {
                    self.commit();
                }
            }
            KeyCode::Delete => {
                if self.buffer.delete() {
                    self.commit();
                }
            }
            KeyCode::Left => self.move_cursor(EditBuffer::move_left),
            KeyCode::Right => self.move_cursor(EditBuffer::move_right),
            KeyCode::Up => self.move_cursor(EditBuffer::move_up),
            KeyCode::Down => self.move_cursor(EditBuffer::move_down),
            KeyCode::Home => self.move_cursor(EditBuffer::move_home),
            KeyCode::End => self.move_cursor(EditBuffer::move_end),
            _ => {}
        }
        true
    }
}

fn print_usage(program: &str) {
    eprintln!("Usage: {program} [file]");
    eprintln!("       {program} render <file> [--standalone]");
}

fn load_config() -> Config {
    match Config::load() {
        Ok(Some(config)) => config,
        Ok(None) => Config::default(),
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            eprintln!("Fix or remove {}", Config::config_path().display());
            process::exit(1);
        }
    }
}

/// Prints the HTML for `path` to stdout.
fn render_file(path: &Path, standalone: bool, config: &Config) -> Result<()> {
    let content =
        io::read_document(path).with_context(|| format!("reading {}", path.display()))?;
    let result = build_renderer(config).render(&content);
    if let Some(err) = &result.error {
        anyhow::bail!("render failed: {err}");
    }
    if standalone {
        print!("{}", io::standalone_html(&document_title(path), &result.html));
    } else {
        println!("{}", result.html);
    }
    Ok(())
}

fn init_logging(to_file: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if to_file {
        // Keep log lines off the alternate screen.
        let log_path = env::temp_dir().join("markdown-livepad.log");
        if let Ok(file) = File::create(&log_path) {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
    }
    builder.init();
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let config = load_config();

    if args.get(1).map(String::as_str) == Some("render") {
        init_logging(false);
        let standalone = args.iter().skip(2).any(|a| a == "--standalone");
        let Some(file) = args.iter().skip(2).find(|a| !a.starts_with("--")) else {
            print_usage(&args[0]);
            process::exit(1);
        };
        return render_file(Path::new(file), standalone, &config);
    }

    let path = match args.len() {
        1 => PathBuf::from(&config.file.default_filename),
        2 => PathBuf::from(&args[1]),
        _ => {
            print_usage(&args[0]);
            process::exit(1);
        }
    };

    if path.exists() && !io::is_supported(&path) {
        eprintln!(
            "Error: '{}' is not a markdown or text file",
            path.display()
        );
        process::exit(1);
    }

    init_logging(true);
    log::info!("markdown-livepad starting up with {}", path.display());

    let mut app = App::new(path, &config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

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

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    loop {
        terminal.draw(|f| ui(f, app))?;

        let timeout = app
            .session
            .next_deadline()
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
            .unwrap_or(IDLE_POLL);

        if event::poll(timeout)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && !app.handle_key(key)
        {
            return Ok(());
        }

        app.session.tick(Instant::now());
    }
}

fn clamp_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

/// Screen cell for a zero-based column and visible row inside a bordered
/// pane. Columns past the right border stick to it.
fn cursor_cell(pane: Rect, column: usize, row: usize) -> Position {
    let x = pane.x.saturating_add(1).saturating_add(clamp_u16(column));
    let y = pane.y.saturating_add(1).saturating_add(clamp_u16(row));
    Position::new(x.min(pane.right().saturating_sub(2)), y)
}

fn ui(f: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1), Constraint::Length(1)])
        .split(f.area());

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    // Editor pane, scrolled to keep the cursor visible
    let store = app.session.store();
    let cursor = store.cursor();
    let visible = panes[0].height.saturating_sub(2) as usize;
    let scroll = (cursor.line - 1).saturating_sub(visible.saturating_sub(1));

    let title = format!(
        "{}{}",
        app.path.display(),
        if store.is_modified() { " *" } else { "" }
    );
    let editor_lines: Vec<Line> = app
        .buffer
        .text()
        .split('\n')
        .map(|line| Line::from(Span::raw(line.to_string())))
        .collect();
    let editor = Paragraph::new(editor_lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .scroll((clamp_u16(scroll), 0));
    f.render_widget(editor, panes[0]);

    f.set_cursor_position(cursor_cell(panes[0], cursor.column - 1, cursor.line - 1 - scroll));

    // Preview pane: the rendered HTML source
    let preview = app.session.preview();
    let preview_title = match (app.session.next_deadline(), preview.last_error()) {
        (Some(_), _) => "Preview (rendering…)",
        (None, Some(_)) => "Preview (error)",
        (None, None) => "Preview",
    };
    let preview_style = if preview.last_error().is_some() {
        Style::default().fg(Color::Red)
    } else {
        Style::default()
    };
    let preview_lines: Vec<Line> = preview
        .html()
        .lines()
        .map(|line| Line::from(Span::raw(line.to_string())))
        .collect();
    let preview_widget = Paragraph::new(preview_lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(preview_title)
                .border_style(preview_style),
        )
        .wrap(ratatui::widgets::Wrap { trim: false });
    f.render_widget(preview_widget, panes[1]);

    // Status bar
    let stats = store.stats();
    let status = Line::from(vec![
        Span::styled(
            format!(" Ln {}, Col {} ", cursor.line, cursor.column),
            Style::default().bg(Color::Blue).fg(Color::White),
        ),
        Span::raw(format!(
            " {} words | {} chars | {} lines",
            stats.words, stats.chars, stats.lines
        )),
        Span::raw(
            app.message
                .as_ref()
                .map(|m| format!(" | {m}"))
                .unwrap_or_default(),
        ),
    ]);
    f.render_widget(Paragraph::new(status), rows[1]);

    let help = Line::from(vec![
        Span::raw("Esc/Ctrl+Q: Quit | "),
        Span::raw("Ctrl+S: Save | "),
        Span::raw("Ctrl+E: Export HTML | "),
        Span::raw("Ctrl+Z/Ctrl+Y: Undo/Redo"),
    ]);
    f.render_widget(Paragraph::new(help), rows[2]);
}
