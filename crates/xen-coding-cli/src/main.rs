use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use std::{
    env,
    io::{self, BufRead, Stdout, Write, stdout},
    process,
};
use xen_coding_config::{Config, ConfigError};
use xen_coding_engine::{ExpandError, Expander, ExpanderOptions, ShortcutTable};

/// A committed expansion shown in the history panel.
struct Entry {
    abbreviation: String,
    markup: String,
}

struct App {
    expander: Expander,
    input: String,
    history: Vec<Entry>,
    history_state: ListState,
}

impl App {
    fn new(expander: Expander) -> Self {
        Self {
            expander,
            input: String::new(),
            history: Vec::new(),
            history_state: ListState::default(),
        }
    }

    fn preview(&self) -> Result<String, ExpandError> {
        self.expander.expand(&self.input)
    }

    /// Moves the current expansion into history. Input that does not expand
    /// stays in the input line.
    fn commit(&mut self) {
        match self.preview() {
            Ok(markup) => {
                log::debug!("committed {:?}", self.input);
                self.history.push(Entry {
                    abbreviation: std::mem::take(&mut self.input),
                    markup,
                });
                self.history_state.select(None);
            }
            Err(e) => log::debug!("nothing to commit for {:?}: {e}", self.input),
        }
    }

    fn previous_entry(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let i = match self.history_state.selected() {
            Some(0) => 0,
            Some(i) => i - 1,
            None => self.history.len() - 1,
        };
        self.select_entry(i);
    }

    fn next_entry(&mut self) {
        match self.history_state.selected() {
            Some(i) if i + 1 < self.history.len() => self.select_entry(i + 1),
            Some(_) => {
                self.history_state.select(None);
                self.input.clear();
            }
            None => {}
        }
    }

    fn select_entry(&mut self, index: usize) {
        self.history_state.select(Some(index));
        if let Some(entry) = self.history.get(index) {
            self.input = entry.abbreviation.clone();
        }
    }

    /// Applies one key press. Returns `true` when the app should quit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }
        match key.code {
            KeyCode::Esc => return true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,
            KeyCode::Enter | KeyCode::Tab => self.commit(),
            KeyCode::Up => self.previous_entry(),
            KeyCode::Down => self.next_entry(),
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) => self.input.push(c),
            _ => {}
        }
        false
    }
}

/// Builds the expander from the user's configuration, or the stock expander
/// when there is none.
fn build_expander(config: Option<&Config>) -> Result<Expander, ConfigError> {
    let Some(config) = config else {
        return Ok(Expander::default());
    };

    let shortcuts = ShortcutTable::with_overrides(config.shortcut_overrides()?);
    let mut options = ExpanderOptions::default();
    if let Some(prefixes) = &config.escape_prefixes {
        options.rules.escape_prefixes = prefixes.clone();
    }
    if let Some(keywords) = &config.verbatim_keywords {
        options.rules.verbatim_keywords = keywords.clone();
    }
    if let Some(indent) = &config.indent {
        options.render.indent = indent.clone();
    }
    log::debug!("{} shortcuts loaded", shortcuts.len());
    Ok(Expander::new(shortcuts, options))
}

/// Expands every input line, echoing lines that do not expand unchanged.
fn expand_lines(expander: &Expander, input: impl BufRead, mut output: impl Write) -> Result<()> {
    for line in input.lines() {
        let line = line?;
        match expander.expand(&line) {
            Ok(markup) => writeln!(output, "{markup}")?,
            Err(_) => writeln!(output, "{line}")?,
        }
    }
    Ok(())
}

/// Lists the active alias table, one `alias → Element` pair per line.
fn write_aliases(expander: &Expander, mut output: impl Write) -> Result<()> {
    let shortcuts = expander.shortcuts();
    let width = shortcuts.iter().map(|(alias, _)| alias.len()).max().unwrap_or(0);
    for (alias, name) in shortcuts.iter() {
        writeln!(output, "{alias:<width$} → {name}")?;
    }
    Ok(())
}

fn print_usage(program: &str) {
    eprintln!("Usage: {program} [abbreviation | - | --aliases]");
    eprintln!();
    eprintln!("  <abbreviation>  print the expansion of one abbreviation");
    eprintln!("  -               expand every line read from stdin");
    eprintln!("  --aliases       list the aliases in effect");
    eprintln!("  (none)          open the interactive preview");
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().collect();
    let config_path = Config::config_path();
    log::debug!("Config path: {}", config_path.display());

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };
    let expander = match build_expander(config.as_ref()) {
        Ok(expander) => expander,
        Err(e) => {
            eprintln!("Error: Failed to load shortcuts: {e}");
            eprintln!("Check shortcut_files in {}", config_path.display());
            process::exit(1);
        }
    };

    match args.get(1).map(String::as_str) {
        None => run_tui(expander),
        Some("-h" | "--help") => {
            print_usage(&args[0]);
            Ok(())
        }
        Some("--aliases") if args.len() == 2 => write_aliases(&expander, stdout().lock()),
        Some("-") if args.len() == 2 => expand_lines(&expander, io::stdin().lock(), stdout().lock()),
        Some(abbreviation) if args.len() == 2 => match expander.expand(abbreviation) {
            Ok(markup) => {
                println!("{markup}");
                Ok(())
            }
            Err(e) => {
                eprintln!("Error: {e}");
                process::exit(1);
            }
        },
        Some(_) => {
            print_usage(&args[0]);
            process::exit(1);
        }
    }
}

fn run_tui(expander: Expander) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(expander);
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
            && app.handle_key(key)
        {
            return Ok(());
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    // Input line
    let input = Paragraph::new(app.input.as_str())
        .block(Block::default().borders(Borders::ALL).title("Abbreviation"));
    f.render_widget(input, rows[0]);
    let cursor_x = rows[0].x + 1 + app.input.chars().count() as u16;
    f.set_cursor_position((cursor_x.min(rows[0].right().saturating_sub(2)), rows[0].y + 1));

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(rows[1]);

    // History panel
    let history_items: Vec<ListItem> = app
        .history
        .iter()
        .map(|entry| ListItem::new(Line::from(vec![Span::raw(entry.abbreviation.clone())])))
        .collect();
    let history = List::new(history_items)
        .block(Block::default().borders(Borders::ALL).title("History"))
        .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));
    f.render_stateful_widget(history, columns[0], &mut app.history_state);

    // Preview panel
    let preview_text = if app.input.is_empty() {
        match app.history_state.selected().and_then(|i| app.history.get(i)) {
            Some(entry) => Text::raw(entry.markup.clone()),
            None => Text::from("Type an abbreviation, e.g. grid>stack>btn*3{item $}"),
        }
    } else {
        match app.preview() {
            Ok(markup) => Text::raw(markup),
            Err(e) => Text::from(Line::from(Span::styled(
                e.to_string(),
                Style::default().fg(Color::Red),
            ))),
        }
    };
    let preview = Paragraph::new(preview_text)
        .block(Block::default().borders(Borders::ALL).title("Preview"));
    f.render_widget(preview, columns[1]);

    // Instructions
    let help_text = Line::from(vec![
        Span::raw("Esc/Ctrl-C: Quit | "),
        Span::raw("Enter/Tab: Commit | "),
        Span::raw("↑/↓: History"),
    ]);
    f.render_widget(Paragraph::new(help_text), rows[2]);
}
