use anyhow::Result;
use callout_block_config::Config;
use callout_block_engine::{StaticHost, block::view, metadata};
use crossterm::{
    event::{self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::{
    env,
    io::{Stdout, stdout},
    path::PathBuf,
    process,
};

mod app;

use app::{Action, App, init_config};

const CARET: &str = "▏";

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .init();

    let args: Vec<String> = env::args().collect();
    let (record_path, print_html) = match args.as_slice() {
        [_, flag] if flag == "--init-config" => {
            let config_path = Config::config_path();
            if init_config(&config_path)? {
                println!("Wrote default config to {}", config_path.display());
            } else {
                println!("Config already exists at {}", config_path.display());
            }
            return Ok(());
        }
        [_, path] => (PathBuf::from(path), false),
        [_, path, flag] if flag == "--html" => (PathBuf::from(path), true),
        _ => {
            eprintln!("Usage: {} <block.json> [--html]", args[0]);
            eprintln!("       {} --init-config", args[0]);
            process::exit(1);
        }
    };

    let config = match Config::load() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            eprintln!("Config path: {}", Config::config_path().display());
            process::exit(1);
        }
    };
    let host = StaticHost {
        catalog: config.load_translations()?,
        styles: config.styles(),
    };

    let mut app = App::open(record_path, &config.block_config(), &host)?;

    if print_html {
        println!("{}", app.block.render().outer_html());
        return Ok(());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => match app.handle_key(key) {
                Ok(Action::Quit) => return Ok(()),
                Ok(Action::Continue) => {}
                Err(e) => app.status = format!("Error: {e:#}"),
            },
            Event::Paste(text) => app.paste(&text),
            _ => {}
        }
    }
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(3), Constraint::Length(2)].as_ref())
        .split(f.area());

    let toolbox = metadata::toolbox();
    let dirty = if app.is_dirty() { " *" } else { "" };
    let title = format!("{} - {}{}", toolbox.title, app.path.display(), dirty);

    let emoji = app
        .block
        .render()
        .find(|element| element.has_class(view::EMOJI_CLASS))
        .map(|element| element.text_content())
        .unwrap_or_default();

    let text = app.text();
    let lines: Vec<Line> = if text.is_empty() {
        vec![Line::from(vec![
            Span::raw(format!("{emoji} ")),
            Span::raw(CARET),
            Span::styled(
                app.block.placeholder().to_string(),
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            ),
        ])]
    } else {
        let mut shown: String = text.chars().take(app.caret).collect();
        shown.push_str(CARET);
        shown.extend(text.chars().skip(app.caret));
        shown
            .replace('\u{a0}', "·")
            .split('\n')
            .enumerate()
            .map(|(i, line)| {
                let prefix = if i == 0 {
                    format!("{emoji} ")
                } else {
                    "   ".to_string()
                };
                Line::from(vec![Span::raw(prefix), Span::raw(line.to_string())])
            })
            .collect()
    };

    let content = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false });
    f.render_widget(content, chunks[0]);

    let help = Line::from(vec![
        Span::raw("Ctrl-S: Save | "),
        Span::raw("Tab: Indent | "),
        Span::raw("Esc/Ctrl-Q: Quit  "),
        Span::styled(app.status.clone(), Style::default().fg(Color::Yellow)),
    ]);
    f.render_widget(Paragraph::new(vec![help]), chunks[1]);
}
