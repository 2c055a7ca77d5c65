//! Terminal file picker used by `pressmark edit`.

use std::{
    io,
    path::{Path, PathBuf},
};

use ratatui::{
    DefaultTerminal, Frame,
    crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    layout::{Constraint, Layout},
    style::{Color, Modifier, Style, Stylize},
    text::Line,
    widgets::{Block, List, ListItem, ListState, Paragraph},
};

/// One file offered by the picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileItem {
    pub name: String,
    pub description: String,
    pub path: PathBuf,
}

/// Gather markdown sources from `content_dir` and generated pages from
/// `output_dir`. A directory that can't be read is reported and skipped.
pub fn collect_items(content_dir: &Path, output_dir: &Path) -> Vec<FileItem> {
    let mut items = list_files(content_dir, &["md", "markdown"], "Markdown file");
    items.extend(list_files(output_dir, &["html"], "HTML file"));
    items
}

fn list_files(dir: &Path, extensions: &[&str], kind: &str) -> Vec<FileItem> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Could not read directory {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut items: Vec<FileItem> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| extensions.contains(&ext))
                .unwrap_or(false)
        })
        .map(|path| FileItem {
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
            description: format!("{} in {}", kind, dir.display()),
            path,
        })
        .collect();

    items.sort_by(|a, b| a.name.cmp(&b.name));
    items
}

#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Selected(PathBuf),
    Cancelled,
}

pub struct Picker {
    items: Vec<FileItem>,
    filter: String,
    visible: Vec<usize>,
    state: ListState,
}

impl Picker {
    pub fn new(items: Vec<FileItem>) -> Self {
        let mut picker = Self {
            items,
            filter: String::new(),
            visible: Vec::new(),
            state: ListState::default(),
        };
        picker.refilter();
        picker
    }

    pub fn selected(&self) -> Option<&FileItem> {
        let index = self.state.selected()?;
        self.visible.get(index).map(|&i| &self.items[i])
    }

    /// Feed one key press. Returns `Some` once the user has decided.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Outcome> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Esc => return Some(Outcome::Cancelled),
            KeyCode::Char('c') if ctrl => return Some(Outcome::Cancelled),
            KeyCode::Enter => {
                return Some(match self.selected() {
                    Some(item) => Outcome::Selected(item.path.clone()),
                    None => Outcome::Cancelled,
                });
            }
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Char('p') if ctrl => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::Char('n') if ctrl => self.move_selection(1),
            KeyCode::Home => self.move_selection(isize::MIN),
            KeyCode::End => self.move_selection(isize::MAX),
            KeyCode::Backspace => {
                self.filter.pop();
                self.refilter();
            }
            KeyCode::Char(c) if !ctrl => {
                self.filter.push(c);
                self.refilter();
            }
            _ => {}
        }

        None
    }

    // Moves within the visible rows, stopping at either end
    fn move_selection(&mut self, delta: isize) {
        let Some(last) = self.visible.len().checked_sub(1) else {
            return;
        };
        let current = self.state.selected().unwrap_or(0) as isize;
        let next = current.saturating_add(delta).clamp(0, last as isize);
        self.state.select(Some(next as usize));
    }

    fn refilter(&mut self) {
        let needle = self.filter.to_lowercase();
        self.visible = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.name.to_lowercase().contains(&needle))
            .map(|(i, _)| i)
            .collect();

        self.state
            .select(if self.visible.is_empty() { None } else { Some(0) });
    }

    fn draw(&mut self, frame: &mut Frame) {
        let [list_area, filter_area] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(3)]).areas(frame.area());

        let rows: Vec<ListItem> = self
            .visible
            .iter()
            .map(|&i| {
                let item = &self.items[i];
                ListItem::new(vec![
                    Line::from(item.name.clone()).bold(),
                    Line::from(item.description.clone()).dim(),
                ])
            })
            .collect();

        let list = List::new(rows)
            .block(Block::bordered().title(" Select a file to edit ".fg(Color::Magenta).bold()))
            .highlight_style(Style::new().fg(Color::Magenta).add_modifier(Modifier::BOLD))
            .highlight_symbol("> ");
        frame.render_stateful_widget(list, list_area, &mut self.state);

        let status = format!(
            " {} of {} files · Enter open · Esc cancel ",
            self.visible.len(),
            self.items.len()
        );
        let filter = Paragraph::new(format!("Filter: {}", self.filter))
            .block(Block::bordered().title(status));
        frame.render_widget(filter, filter_area);
    }
}

/// Show the picker full-screen and return the chosen path, if any.
pub fn pick(items: Vec<FileItem>) -> io::Result<Option<PathBuf>> {
    let mut terminal = ratatui::try_init()?;
    let outcome = run(&mut terminal, Picker::new(items));
    ratatui::restore();

    match outcome? {
        Outcome::Selected(path) => Ok(Some(path)),
        Outcome::Cancelled => Ok(None),
    }
}

fn run(terminal: &mut DefaultTerminal, mut picker: Picker) -> io::Result<Outcome> {
    loop {
        terminal.draw(|frame| picker.draw(frame))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if let Some(outcome) = picker.handle_key(key) {
                return Ok(outcome);
            }
        }
    }
}
