//! Main application logic for the terminal user interface.
//!
//! `App` owns the command [`Context`], turns key presses into command
//! handler calls, and renders the task list projection. Edit and remove-all
//! answers are gathered in non-blocking modals and then handed to the
//! handlers, so the handlers never wait on the terminal.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};

use crate::commands::{self, Context, Outcome, REMOVE_ALL_PROMPT};
use crate::error::Result;
use crate::fields::SortOrder;
use crate::prompt::Scripted;
use crate::store::KeyValueStore;
use crate::task::{TaskId, TaskView};
use crate::tui::{
    colors::{DARK_RED, GOLD, PICK_RED, SLATE},
    enums::AppState,
    input::InputField,
    utils::centered_rect,
};

pub struct App<S> {
    state: AppState,
    ctx: Context<S>,
    table_state: TableState,
    input: InputField,
    status_message: String,
}

impl<S: KeyValueStore> App<S> {
    pub fn new(ctx: Context<S>) -> Self {
        let mut app = App {
            state: AppState::TaskList,
            ctx,
            table_state: TableState::default(),
            input: InputField::new(),
            status_message: String::new(),
        };
        app.sync_selection();
        app
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    pub fn context(&self) -> &Context<S> {
        &self.ctx
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    fn set_status_message(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    /// Keep the selection on a valid row after the list changes.
    fn sync_selection(&mut self) {
        let len = self.ctx.list.len();
        let selected = match self.table_state.selected() {
            _ if len == 0 => None,
            Some(i) => Some(i.min(len - 1)),
            None => Some(0),
        };
        self.table_state.select(selected);
    }

    fn select_id(&mut self, id: TaskId) {
        if let Some(i) = self.ctx.list.position(id) {
            self.table_state.select(Some(i));
        }
    }

    fn selected_id(&self) -> Option<TaskId> {
        self.table_state
            .selected()
            .and_then(|i| self.ctx.list.id_at(i))
    }

    /// Report the result of a persisting command in the status bar.
    fn apply(&mut self, result: Result<Outcome>, changed: &str) {
        match result {
            Ok(Outcome::Changed) => self.set_status_message(changed),
            Ok(Outcome::Unchanged) => {}
            Err(e) => self.set_status_message(format!("Error saving tasks: {e}")),
        }
        self.sync_selection();
    }

    /// Handle one key press. Returns true if the application should quit.
    pub fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) -> bool {
        if key == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }
        match self.state {
            AppState::TaskList => return self.handle_task_list_input(key, modifiers),
            AppState::AddTask => self.handle_add_input(key, modifiers),
            AppState::EditTask(id) => self.handle_edit_input(key, modifiers, id),
            AppState::Help => self.state = AppState::TaskList,
            AppState::Confirm => self.handle_confirm_input(key),
        }
        false
    }

    fn handle_task_list_input(&mut self, key: KeyCode, modifiers: KeyModifiers) -> bool {
        match key {
            _ if modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {}
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up | KeyCode::Char('k') => {
                if let Some(selected) = self.table_state.selected() {
                    self.table_state.select(Some(selected.saturating_sub(1)));
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if let Some(selected) = self.table_state.selected() {
                    if selected + 1 < self.ctx.list.len() {
                        self.table_state.select(Some(selected + 1));
                    }
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(id) = self.selected_id() {
                    let result = commands::toggle(&mut self.ctx, id);
                    self.apply(result, "Toggled task");
                }
            }
            KeyCode::Char('a') => {
                self.input = InputField::new();
                self.state = AppState::AddTask;
            }
            KeyCode::Char('e') => {
                if let Some(id) = self.selected_id() {
                    if commands::begin_edit(&mut self.ctx, id) {
                        let current = self
                            .ctx
                            .list
                            .get(id)
                            .map(|e| e.task.text.clone())
                            .unwrap_or_default();
                        self.input = InputField::with_value(&current);
                        self.state = AppState::EditTask(id);
                    }
                }
            }
            KeyCode::Char('d') => {
                if let Some(id) = self.selected_id() {
                    let result = commands::remove(&mut self.ctx, id);
                    self.apply(result, "Removed task");
                }
            }
            KeyCode::Char('c') => {
                let result = commands::remove_completed(&mut self.ctx);
                self.apply(result, "Removed completed tasks");
            }
            KeyCode::Char('X') => {
                if self.ctx.list.has_uncompleted() {
                    self.state = AppState::Confirm;
                } else {
                    // Nothing open, so the handler will not ask.
                    let result =
                        commands::remove_all(&mut self.ctx, &mut Scripted::confirm(false));
                    self.apply(result, "Removed all tasks");
                }
            }
            KeyCode::Char('s') => self.sort(SortOrder::Asc),
            KeyCode::Char('S') => self.sort(SortOrder::Desc),
            KeyCode::Char('r') => {
                if let Some(id) = commands::pick_random(&mut self.ctx) {
                    self.select_id(id);
                    self.set_status_message("Picked a random task");
                }
            }
            KeyCode::Char('w') => match commands::clear_storage(&mut self.ctx) {
                Ok(_) => self.set_status_message("Cleared stored tasks"),
                Err(e) => self.set_status_message(format!("Error clearing storage: {e}")),
            },
            KeyCode::Char('h') | KeyCode::F(1) => self.state = AppState::Help,
            _ => {}
        }
        false
    }

    fn sort(&mut self, order: SortOrder) {
        let selected = self.selected_id();
        commands::sort(&mut self.ctx, order);
        if let Some(id) = selected {
            self.select_id(id);
        }
        self.set_status_message(match order {
            SortOrder::Asc => "Sorted oldest first",
            SortOrder::Desc => "Sorted newest first",
        });
    }

    /// Shared line editing for the add and edit prompts.
    ///
    /// Control and Alt chords are not text.
    fn edit_input(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        match key {
            KeyCode::Char(c) => {
                if !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
                    self.input.handle_char(c);
                }
            }
            KeyCode::Backspace => self.input.handle_backspace(),
            KeyCode::Delete => self.input.handle_delete(),
            KeyCode::Left => self.input.move_cursor_left(),
            KeyCode::Right => self.input.move_cursor_right(),
            KeyCode::Home => self.input.move_home(),
            KeyCode::End => self.input.move_end(),
            _ => {}
        }
    }

    fn handle_add_input(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        match key {
            KeyCode::Esc => {
                self.input.take();
                self.state = AppState::TaskList;
            }
            KeyCode::Enter => {
                let text = self.input.take();
                let result = commands::add(&mut self.ctx, &text);
                self.state = AppState::TaskList;
                self.table_state.select(Some(0));
                self.apply(result, "Added task");
            }
            other => self.edit_input(other, modifiers),
        }
    }

    fn handle_edit_input(&mut self, key: KeyCode, modifiers: KeyModifiers, id: TaskId) {
        match key {
            KeyCode::Esc => {
                self.input.take();
                let result = commands::finish_edit(&mut self.ctx, id, None);
                self.state = AppState::TaskList;
                self.apply(result, "Edit cancelled");
            }
            KeyCode::Enter => {
                let text = self.input.take();
                let result = commands::finish_edit(&mut self.ctx, id, Some(&text));
                self.state = AppState::TaskList;
                self.apply(result, "Updated task");
            }
            other => self.edit_input(other, modifiers),
        }
    }

    fn handle_confirm_input(&mut self, key: KeyCode) {
        let answer = match key {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => true,
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => false,
            _ => return,
        };
        let result = commands::remove_all(&mut self.ctx, &mut Scripted::confirm(answer));
        self.state = AppState::TaskList;
        self.apply(result, "Removed all tasks");
    }

    /// Poll for and handle keyboard events.
    ///
    /// Returns true if the application should quit.
    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    return Ok(false);
                }
                self.status_message.clear();
                return Ok(self.handle_key(key.code, key.modifiers));
            }
        }
        Ok(false)
    }

    fn view_row(view: &TaskView) -> Row<'static> {
        let mut text_style = Style::default();
        if view.struck {
            text_style = text_style.fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT);
        }
        if view.editing {
            text_style = text_style.fg(Color::Yellow).add_modifier(Modifier::ITALIC);
        }
        let icon = view.icon.as_deref().map_or(Span::raw(""), |icon| {
            Span::styled(format!("◆ {icon}"), Style::default().fg(GOLD))
        });

        let row = Row::new(vec![
            Cell::from(if view.checked { "[x]" } else { "[ ]" }),
            Cell::from(Span::styled(view.text.clone(), text_style)),
            Cell::from(view.date_label.clone()),
            Cell::from(Line::from(icon)),
        ]);
        if view.highlighted {
            row.style(Style::default().bg(PICK_RED).fg(Color::White))
        } else {
            row
        }
    }

    fn render_task_list(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let header = Paragraph::new(Line::from(vec![Span::styled(
            "TASK LIST",
            Style::default().add_modifier(Modifier::BOLD),
        )]))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);
        f.render_widget(header, chunks[0]);

        let views = self.ctx.list.render();
        let completed = views.iter().filter(|v| v.checked).count();
        let rows: Vec<Row> = views.iter().map(Self::view_row).collect();

        let header_cells = ["Done", "Task", "Date", "Icon"]
            .iter()
            .map(|h| Cell::from(*h).style(Style::default().add_modifier(Modifier::BOLD)));
        let header = Row::new(header_cells)
            .style(Style::default().bg(SLATE).fg(Color::White))
            .height(1);

        let widths = [
            Constraint::Length(5),
            Constraint::Min(25),
            Constraint::Length(28),
            Constraint::Length(24),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title(format!(
                "Tasks ({}/{} done) - Press 'h' for help",
                completed,
                views.len()
            )))
            .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol(">> ");

        f.render_stateful_widget(table, chunks[1], &mut self.table_state);
    }

    fn render_prompt(&mut self, f: &mut Frame, area: Rect, title: &str) {
        let area = centered_rect(60, 20, area);
        f.render_widget(Clear, area);

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .style(Style::default().bg(SLATE).fg(Color::White));
        let inner = block.inner(area);
        let paragraph = Paragraph::new(vec![
            Line::from(self.input.value.clone()),
            Line::from(""),
            Line::from("Enter to save, Esc to cancel"),
        ])
        .block(block);
        f.render_widget(paragraph, area);

        let before_cursor: String = self.input.value.chars().take(self.input.cursor).collect();
        let x = inner.x + (before_cursor.chars().count() as u16).min(inner.width.saturating_sub(1));
        f.set_cursor_position((x, inner.y));
    }

    fn render_confirm(&mut self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .title("Confirm Action")
            .borders(Borders::ALL)
            .style(Style::default().bg(DARK_RED));

        let area = centered_rect(50, 20, area);
        f.render_widget(Clear, area);

        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                REMOVE_ALL_PROMPT,
                Style::default().add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from("Press 'y' to confirm, 'n' to cancel"),
        ];

        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });

        f.render_widget(paragraph, area);
    }

    fn render_help(&mut self, f: &mut Frame, area: Rect) {
        let help_text = vec![
            Line::from(vec![Span::styled(
                "Task List Help",
                Style::default().add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from("  ↑/↓, k/j     Move selection"),
            Line::from("  Enter/Space  Toggle completed"),
            Line::from("  a            Add task"),
            Line::from("  e            Edit selected task"),
            Line::from("  d            Remove selected task"),
            Line::from("  c            Remove completed tasks"),
            Line::from("  X            Remove all tasks"),
            Line::from("  s / S        Sort oldest / newest first"),
            Line::from("  r            Pick a random task"),
            Line::from("  w            Clear stored tasks (list stays)"),
            Line::from("  h/F1         Show this help"),
            Line::from("  q/Ctrl+C/Esc Quit"),
        ];

        let paragraph = Paragraph::new(help_text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Help - Press any key to return"),
            )
            .wrap(Wrap { trim: true });

        f.render_widget(paragraph, area);
    }

    fn render_status_bar(&mut self, f: &mut Frame, area: Rect) {
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            match self.state {
                AppState::TaskList => {
                    format!("Tasks: {} | Press 'h' for help", self.ctx.list.len())
                }
                AppState::AddTask => "Add Task".to_string(),
                AppState::EditTask(_) => "Edit Task".to_string(),
                AppState::Help => "Help".to_string(),
                AppState::Confirm => "Confirm Action".to_string(),
            }
        };

        let status = Paragraph::new(status_text)
            .style(Style::default().bg(SLATE).fg(Color::White))
            .alignment(Alignment::Left);

        f.render_widget(status, area);
    }

    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(f.area());

        match self.state {
            AppState::Help => self.render_help(f, chunks[0]),
            state => {
                self.render_task_list(f, chunks[0]);
                match state {
                    AppState::AddTask => self.render_prompt(f, chunks[0], "New Task"),
                    AppState::EditTask(_) => self.render_prompt(f, chunks[0], "Update the task"),
                    AppState::Confirm => self.render_confirm(f, chunks[0]),
                    _ => {}
                }
            }
        }

        self.render_status_bar(f, chunks[1]);
    }

    pub fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        terminal.draw(|f| self.render(f))?;
        Ok(())
    }

    /// Main event loop for the TUI application.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            self.draw(terminal)?;

            if self.handle_input()? {
                break;
            }
        }
        Ok(())
    }
}
