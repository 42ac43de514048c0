use crate::commands::format_age;
use crate::draft::{current_time_label, NoteForm};
use crate::model::{Accent, Folder, FolderFilter, Note, Period};
use crate::seed::suggestions;
use crate::storage::{KeyValueStore, StoreLocation};
use crate::store::NotesStore;
use anyhow::Result;
use chrono::Utc;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use log::debug;
use rand::seq::SliceRandom;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::{Alignment, Color, Modifier, Rect, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap};
use ratatui::Terminal;
use std::io::{stdout, Stdout};
use std::time::{Duration, Instant};

const CARD_WIDTH: u16 = 34;

pub fn run<S: KeyValueStore>(
    store: NotesStore<S>,
    location: StoreLocation,
    recent_limit: usize,
) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let mut app = App::new(store, location, recent_limit);
    let result = app.event_loop(&mut terminal);
    teardown_terminal(&mut terminal)?;
    result
}

struct App<S: KeyValueStore> {
    store: NotesStore<S>,
    location: StoreLocation,
    recent_limit: usize,
    period: Period,
    folder_filter: FolderFilter,
    focus: Focus,
    selected_note: usize,
    note_offset: usize,
    selected_recent: usize,
    selected_folder: usize,
    last_save: Instant,
    status: String,
    mode: Mode,
}

enum Mode {
    Normal,
    Creating(NoteEditor),
    Editing { note_id: String, editor: NoteEditor },
    Searching(SearchPanel),
    ConfirmDelete { note_id: String },
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum Focus {
    Notes,
    Recent,
    Folders,
}

enum FormAction {
    Create,
    Edit(String),
}

struct NoteEditor {
    title: FieldValue,
    time_label: FieldValue,
    period: Period,
    accent: Accent,
    items: Vec<FieldValue>,
    field: EditorField,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum EditorField {
    Title,
    TimeLabel,
    Period,
    Accent,
    Item(usize),
}

struct SearchPanel {
    query: FieldValue,
    selected: usize,
}

#[derive(Clone)]
struct FieldValue {
    value: String,
    cursor: usize,
}

impl FieldValue {
    fn new(value: &str) -> Self {
        FieldValue {
            value: value.to_string(),
            cursor: value.len(),
        }
    }

    fn move_left(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor = prev_grapheme(self.cursor, &self.value);
    }

    fn move_right(&mut self) {
        if self.cursor >= self.value.len() {
            return;
        }
        self.cursor = next_grapheme(self.cursor, &self.value);
    }

    fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let prev = prev_grapheme(self.cursor, &self.value);
        self.value.drain(prev..self.cursor);
        self.cursor = prev;
    }

    fn insert_char(&mut self, ch: char) {
        self.value.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    fn with_caret(&self) -> String {
        let mut text = self.value.clone();
        text.insert_str(self.cursor, "▌");
        text
    }
}

impl Focus {
    fn next(&self) -> Focus {
        match self {
            Focus::Notes => Focus::Recent,
            Focus::Recent => Focus::Folders,
            Focus::Folders => Focus::Notes,
        }
    }

    fn prev(&self) -> Focus {
        match self {
            Focus::Notes => Focus::Folders,
            Focus::Recent => Focus::Notes,
            Focus::Folders => Focus::Recent,
        }
    }
}

impl NoteEditor {
    fn new(period: Period) -> Self {
        NoteEditor::from_form(NoteForm {
            period,
            ..NoteForm::default()
        })
    }

    fn from_form(form: NoteForm) -> Self {
        let mut items: Vec<FieldValue> = form.items.iter().map(|i| FieldValue::new(i)).collect();
        if items.is_empty() {
            items.push(FieldValue::new(""));
        }
        NoteEditor {
            title: FieldValue::new(&form.title),
            time_label: FieldValue::new(&form.time_label),
            period: form.period,
            accent: form.accent,
            items,
            field: EditorField::Title,
        }
    }

    fn to_form(&self) -> NoteForm {
        NoteForm {
            title: self.title.value.clone(),
            time_label: self.time_label.value.clone(),
            items: self.items.iter().map(|i| i.value.clone()).collect(),
            period: self.period,
            accent: self.accent,
        }
    }

    fn next_field(&mut self) {
        let last_item = self.items.len().saturating_sub(1);
        self.field = match self.field {
            EditorField::Title => EditorField::TimeLabel,
            EditorField::TimeLabel => EditorField::Period,
            EditorField::Period => EditorField::Accent,
            EditorField::Accent => EditorField::Item(0),
            EditorField::Item(idx) if idx < last_item => EditorField::Item(idx + 1),
            EditorField::Item(_) => EditorField::Title,
        };
    }

    fn prev_field(&mut self) {
        let last_item = self.items.len().saturating_sub(1);
        self.field = match self.field {
            EditorField::Title => EditorField::Item(last_item),
            EditorField::TimeLabel => EditorField::Title,
            EditorField::Period => EditorField::TimeLabel,
            EditorField::Accent => EditorField::Period,
            EditorField::Item(0) => EditorField::Accent,
            EditorField::Item(idx) => EditorField::Item(idx - 1),
        };
    }

    fn active_text_mut(&mut self) -> Option<&mut FieldValue> {
        match self.field {
            EditorField::Title => Some(&mut self.title),
            EditorField::TimeLabel => Some(&mut self.time_label),
            EditorField::Item(idx) => self.items.get_mut(idx),
            EditorField::Period | EditorField::Accent => None,
        }
    }

    fn cycle_choice(&mut self, forward: bool) {
        match self.field {
            EditorField::Period => {
                self.period = if forward {
                    self.period.next()
                } else {
                    self.period.prev()
                }
            }
            EditorField::Accent => {
                self.accent = if forward {
                    self.accent.next()
                } else {
                    self.accent.prev()
                }
            }
            _ => {}
        }
    }

    fn add_item(&mut self) {
        let at = match self.field {
            EditorField::Item(idx) => idx + 1,
            _ => self.items.len(),
        };
        self.items.insert(at, FieldValue::new(""));
        self.field = EditorField::Item(at);
    }

    fn remove_item(&mut self) {
        if let EditorField::Item(idx) = self.field {
            if self.items.len() > 1 {
                self.items.remove(idx);
                self.field = EditorField::Item(idx.min(self.items.len() - 1));
            } else if let Some(only) = self.items.first_mut() {
                *only = FieldValue::new("");
            }
        }
    }
}

impl<S: KeyValueStore> App<S> {
    fn new(store: NotesStore<S>, location: StoreLocation, recent_limit: usize) -> Self {
        let status = match store.last_persist_error() {
            Some(err) => format!("Working in memory only, could not save: {}", err),
            None => format!("Loaded {} notes from {}", store.notes().len(), location.dir.display()),
        };
        App {
            store,
            location,
            recent_limit,
            period: Period::Today,
            folder_filter: FolderFilter::All,
            focus: Focus::Notes,
            selected_note: 0,
            note_offset: 0,
            selected_recent: 0,
            selected_folder: 0,
            last_save: Instant::now(),
            status,
            mode: Mode::Normal,
        }
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|f| self.draw(f))?;
            if event::poll(Duration::from_millis(200))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key)? {
                        break;
                    }
                }
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        match self.mode {
            Mode::Normal => self.handle_normal_key(key),
            Mode::Creating(_) | Mode::Editing { .. } => self.handle_form_key(key),
            Mode::Searching(_) => self.handle_search_key(key),
            Mode::ConfirmDelete { .. } => self.handle_confirm_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Result<bool> {
        match key.code {
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::BackTab => self.focus = self.focus.prev(),
            KeyCode::Char('n') => {
                self.mode = Mode::Creating(NoteEditor::new(self.period));
                self.status =
                    "New note (Tab moves, Enter adds item, Ctrl+S saves, Esc cancels)".into();
            }
            KeyCode::Char('e') | KeyCode::Enter => self.open_editor_for_current(),
            KeyCode::Char('d') => match self.current_note() {
                Some(note) => {
                    let note_id = note.id.clone();
                    self.status = format!("Delete {}? (y to confirm, n/Esc to cancel)", note.title);
                    self.mode = Mode::ConfirmDelete { note_id };
                }
                None => self.status = "No note selected to delete".into(),
            },
            KeyCode::Char('/') => {
                self.mode = Mode::Searching(SearchPanel {
                    query: FieldValue::new(""),
                    selected: 0,
                });
                self.status = "Search notes (Enter opens, Esc closes)".into();
            }
            KeyCode::Char('s') => self.add_suggestion(),
            KeyCode::Char('[') => self.cycle_tab(false),
            KeyCode::Char(']') => self.cycle_tab(true),
            KeyCode::Left | KeyCode::Char('h') => self.move_selection(-1),
            KeyCode::Right | KeyCode::Char('l') => self.move_selection(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            _ => {}
        }
        self.ensure_bounds();
        Ok(false)
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Result<bool> {
        let mut close_form = false;
        let mut mode = std::mem::replace(&mut self.mode, Mode::Normal);
        match &mut mode {
            Mode::Creating(editor) => {
                close_form = self.process_form_key(FormAction::Create, editor, key);
            }
            Mode::Editing { note_id, editor } => {
                let id = note_id.clone();
                close_form = self.process_form_key(FormAction::Edit(id), editor, key);
            }
            _ => {}
        }
        if !close_form {
            self.mode = mode;
        }
        Ok(false)
    }

    fn process_form_key(&mut self, action: FormAction, editor: &mut NoteEditor, key: KeyEvent) -> bool {
        let control = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => {
                self.status = "Canceled".into();
                return true;
            }
            KeyCode::Char('s') if control => return self.try_submit(action, editor),
            KeyCode::Enter if control => return self.try_submit(action, editor),
            KeyCode::Char('x') if control => editor.remove_item(),
            KeyCode::Tab | KeyCode::Down => editor.next_field(),
            KeyCode::BackTab | KeyCode::Up => editor.prev_field(),
            KeyCode::Enter => match editor.field {
                EditorField::Item(_) => editor.add_item(),
                _ => editor.next_field(),
            },
            KeyCode::Left => match editor.active_text_mut() {
                Some(field) => field.move_left(),
                None => editor.cycle_choice(false),
            },
            KeyCode::Right => match editor.active_text_mut() {
                Some(field) => field.move_right(),
                None => editor.cycle_choice(true),
            },
            KeyCode::Backspace => {
                if let Some(field) = editor.active_text_mut() {
                    field.backspace();
                }
            }
            KeyCode::Char(' ') if editor.active_text_mut().is_none() => editor.cycle_choice(true),
            KeyCode::Char(c) => {
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
                {
                    if let Some(field) = editor.active_text_mut() {
                        field.insert_char(c);
                    }
                }
            }
            _ => {}
        }
        false
    }

    fn try_submit(&mut self, action: FormAction, editor: &NoteEditor) -> bool {
        let draft = match editor.to_form().validate(&current_time_label()) {
            Ok(draft) => draft,
            Err(err) => {
                self.status = format!("Could not save: {}", err);
                return false;
            }
        };
        let period = draft.period;
        let title = draft.title.clone();
        match action {
            FormAction::Create => {
                let id = self.store.create_note(draft);
                debug!("created {} from form", id);
                self.show_note(period, &id);
                self.after_mutation(format!("Created \"{}\"", title));
            }
            FormAction::Edit(note_id) => {
                if self.store.update_note(&note_id, draft.into_patch()) {
                    self.show_note(period, &note_id);
                    self.after_mutation(format!("Updated \"{}\"", title));
                } else {
                    self.status = "That note no longer exists".into();
                }
            }
        }
        true
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> Result<bool> {
        let mut panel = match std::mem::replace(&mut self.mode, Mode::Normal) {
            Mode::Searching(panel) => panel,
            other => {
                self.mode = other;
                return Ok(false);
            }
        };
        let result_count = self.store.search_notes(&panel.query.value).len();
        match key.code {
            KeyCode::Esc => {
                self.status = "Search closed".into();
                return Ok(false);
            }
            KeyCode::Enter => {
                let picked = self
                    .store
                    .search_notes(&panel.query.value)
                    .get(panel.selected)
                    .map(|note| (note.id.clone(), NoteForm::from_note(note)));
                match picked {
                    Some((note_id, form)) => {
                        self.status = format!("Editing {}", form.title);
                        self.mode = Mode::Editing {
                            note_id,
                            editor: NoteEditor::from_form(form),
                        };
                        return Ok(false);
                    }
                    None => self.status = "Nothing to open".into(),
                }
            }
            KeyCode::Up => panel.selected = panel.selected.saturating_sub(1),
            KeyCode::Down => {
                if panel.selected + 1 < result_count {
                    panel.selected += 1;
                }
            }
            KeyCode::Left => panel.query.move_left(),
            KeyCode::Right => panel.query.move_right(),
            KeyCode::Backspace => {
                panel.query.backspace();
                panel.selected = 0;
            }
            KeyCode::Char(c) => {
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
                {
                    panel.query.insert_char(c);
                    panel.selected = 0;
                }
            }
            _ => {}
        }
        self.mode = Mode::Searching(panel);
        Ok(false)
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) -> Result<bool> {
        let note_id = match &self.mode {
            Mode::ConfirmDelete { note_id } => note_id.clone(),
            _ => return Ok(false),
        };
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                if self.store.delete_note(&note_id) {
                    self.after_mutation(format!("Deleted {}", note_id));
                } else {
                    self.status = "That note no longer exists".into();
                }
                self.mode = Mode::Normal;
            }
            KeyCode::Char('n') | KeyCode::Esc => {
                self.status = "Delete canceled".into();
                self.mode = Mode::Normal;
            }
            _ => {}
        }
        Ok(false)
    }

    fn open_editor_for_current(&mut self) {
        match self.current_note() {
            Some(note) => {
                let note_id = note.id.clone();
                let form = NoteForm::from_note(note);
                self.status = format!("Editing {}", form.title);
                self.mode = Mode::Editing {
                    note_id,
                    editor: NoteEditor::from_form(form),
                };
            }
            None => self.status = "No note selected to edit".into(),
        }
    }

    fn add_suggestion(&mut self) {
        let draft = match suggestions().choose(&mut rand::thread_rng()) {
            Some(draft) => draft.clone(),
            None => return,
        };
        let period = draft.period;
        let title = draft.title.clone();
        let id = self.store.create_note(draft);
        self.show_note(period, &id);
        self.after_mutation(format!("Added suggestion \"{}\"", title));
    }

    fn cycle_tab(&mut self, forward: bool) {
        match self.focus {
            Focus::Notes => {
                let order = Period::BOARD_ORDER;
                let idx = order.iter().position(|p| *p == self.period).unwrap_or(0);
                let next = if forward {
                    (idx + 1) % order.len()
                } else {
                    (idx + order.len() - 1) % order.len()
                };
                self.period = order[next];
                self.selected_note = 0;
                self.note_offset = 0;
            }
            Focus::Folders => {
                let order = FolderFilter::ALL;
                let idx = order
                    .iter()
                    .position(|f| *f == self.folder_filter)
                    .unwrap_or(0);
                let next = if forward {
                    (idx + 1) % order.len()
                } else {
                    (idx + order.len() - 1) % order.len()
                };
                self.folder_filter = order[next];
                self.selected_folder = 0;
            }
            Focus::Recent => {}
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let slot = match self.focus {
            Focus::Notes => &mut self.selected_note,
            Focus::Recent => &mut self.selected_recent,
            Focus::Folders => &mut self.selected_folder,
        };
        *slot = if delta < 0 {
            slot.saturating_sub(delta.unsigned_abs())
        } else {
            slot.saturating_add(delta as usize)
        };
    }

    /// Switch the board to `period` and select `note_id` within it.
    fn show_note(&mut self, period: Period, note_id: &str) {
        self.period = period;
        self.focus = Focus::Notes;
        self.selected_note = self
            .store
            .notes_by_period(period)
            .iter()
            .position(|n| n.id == note_id)
            .unwrap_or(0);
    }

    fn after_mutation(&mut self, message: String) {
        match self.store.last_persist_error() {
            Some(err) => self.status = format!("{} (not saved: {})", message, err),
            None => {
                self.last_save = Instant::now();
                self.status = message;
            }
        }
        self.ensure_bounds();
    }

    fn ensure_bounds(&mut self) {
        let notes_len = self.store.notes_by_period(self.period).len();
        let recent_len = self.store.recent_notes(self.recent_limit).len();
        let folders_len = self.store.folders_by_filter(self.folder_filter).len();
        self.selected_note = self.selected_note.min(notes_len.saturating_sub(1));
        self.selected_recent = self.selected_recent.min(recent_len.saturating_sub(1));
        self.selected_folder = self.selected_folder.min(folders_len.saturating_sub(1));
    }

    fn current_note(&self) -> Option<&Note> {
        match self.focus {
            Focus::Notes => self
                .store
                .notes_by_period(self.period)
                .get(self.selected_note)
                .copied(),
            Focus::Recent => self
                .store
                .recent_notes(self.recent_limit)
                .get(self.selected_recent)
                .copied(),
            Focus::Folders => None,
        }
    }

    fn current_folder(&self) -> Option<&Folder> {
        self.store
            .folders_by_filter(self.folder_filter)
            .get(self.selected_folder)
            .copied()
    }

    fn draw(&mut self, f: &mut ratatui::Frame<'_>) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(12),
                Constraint::Length(4),
            ])
            .split(f.size());

        self.draw_header(f, layout[0]);

        let body = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(layout[1]);
        self.draw_notes_board(f, body[0]);

        let lower = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(body[1]);
        self.draw_recent(f, lower[0]);
        self.draw_folders(f, lower[1]);

        self.draw_footer(f, layout[2]);

        match &self.mode {
            Mode::Creating(editor) => self.draw_editor(f, "New Note", editor),
            Mode::Editing { editor, .. } => self.draw_editor(f, "Edit Note", editor),
            Mode::Searching(panel) => self.draw_search(f, panel),
            Mode::ConfirmDelete { note_id } => self.draw_confirm(f, note_id),
            Mode::Normal => {}
        }
    }

    fn draw_header(&self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let title = Line::from(vec![
            Span::styled(
                "notefold ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("{} notes", self.store.notes().len()),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("  •  "),
            Span::styled(self.location.scope.label(), Style::default().fg(Color::Green)),
            Span::raw("  •  "),
            Span::styled(
                format!("{}", self.location.dir.display()),
                Style::default().fg(Color::DarkGray),
            ),
            Span::raw("  •  "),
            Span::styled(
                format!("saved {}", format_elapsed(self.last_save)),
                Style::default().fg(Color::Gray),
            ),
        ]);

        let block = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray));
        let paragraph = Paragraph::new(title)
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(paragraph, area);
    }

    fn draw_notes_board(&mut self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let focused = self.focus == Focus::Notes;
        let block = panel_block("Notes", focused);
        let inner = block.inner(area);
        f.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Min(3)])
            .split(inner);

        let counts = self.store.period_counts();
        let titles = counts
            .iter()
            .map(|(p, n)| Line::from(format!("{} ({})", p.label(), n)))
            .collect::<Vec<_>>();
        let active = counts
            .iter()
            .position(|(p, _)| *p == self.period)
            .unwrap_or(0);
        let tabs = Tabs::new(titles)
            .select(active)
            .style(Style::default().fg(Color::Gray))
            .highlight_style(
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::LightCyan)
                    .add_modifier(Modifier::BOLD),
            )
            .divider(" ");
        f.render_widget(tabs, rows[0]);

        let notes = self.store.notes_by_period(self.period);
        if notes.is_empty() {
            let msg = Paragraph::new("No notes for this period. Press n to add one.")
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray));
            f.render_widget(msg, rows[1]);
            return;
        }

        let visible = (rows[1].width / CARD_WIDTH).max(1) as usize;
        let selected = self.selected_note.min(notes.len() - 1);
        let offset = adjust_offset(selected, self.note_offset, visible, 0, notes.len());
        let shown = &notes[offset..(offset + visible).min(notes.len())];

        let mut constraints = vec![Constraint::Length(CARD_WIDTH); shown.len()];
        constraints.push(Constraint::Min(0));
        let slots = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(rows[1]);

        for (i, note) in shown.iter().enumerate() {
            let is_selected = focused && offset + i == selected;
            f.render_widget(note_card(note, is_selected), slots[i]);
        }

        if offset > 0 || offset + shown.len() < notes.len() {
            let hint = format!("‹ {} / {} ›", selected + 1, notes.len());
            let hint_area = Rect {
                x: rows[1].x,
                y: rows[1].y + rows[1].height.saturating_sub(1),
                width: rows[1].width,
                height: 1,
            };
            f.render_widget(
                Paragraph::new(hint)
                    .alignment(Alignment::Right)
                    .style(Style::default().fg(Color::DarkGray)),
                hint_area,
            );
        }
        self.note_offset = offset;
    }

    fn draw_recent(&self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let focused = self.focus == Focus::Recent;
        let notes = self.store.recent_notes(self.recent_limit);
        let now = Utc::now();
        let items = if notes.is_empty() {
            vec![ListItem::new("No notes yet")]
        } else {
            notes
                .iter()
                .map(|note| {
                    let (r, g, b) = note.accent.rgb();
                    ListItem::new(Line::from(vec![
                        Span::styled("● ", Style::default().fg(Color::Rgb(r, g, b))),
                        Span::styled(
                            truncate_text(&note.title, 28),
                            Style::default()
                                .fg(Color::White)
                                .add_modifier(Modifier::BOLD),
                        ),
                        Span::raw("  "),
                        Span::styled(
                            note.period.label(),
                            Style::default().fg(Color::LightMagenta),
                        ),
                        Span::raw("  "),
                        Span::styled(
                            format_age(note.updated_at, now),
                            Style::default().fg(Color::DarkGray),
                        ),
                    ]))
                })
                .collect()
        };
        let mut state = ListState::default();
        if focused && !notes.is_empty() {
            state.select(Some(self.selected_recent.min(notes.len() - 1)));
        }
        let list = List::new(items)
            .block(panel_block("Recent", focused))
            .highlight_style(highlight_style());
        f.render_stateful_widget(list, area, &mut state);
    }

    fn draw_folders(&self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let focused = self.focus == Focus::Folders;
        let block = panel_block("Folders", focused);
        let inner = block.inner(area);
        f.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Min(1)])
            .split(inner);

        let counts = self.store.folder_filter_counts();
        let titles = counts
            .iter()
            .map(|(filter, n)| Line::from(format!("{} ({})", filter.label(), n)))
            .collect::<Vec<_>>();
        let active = counts
            .iter()
            .position(|(filter, _)| *filter == self.folder_filter)
            .unwrap_or(0);
        let tabs = Tabs::new(titles)
            .select(active)
            .style(Style::default().fg(Color::Gray))
            .highlight_style(
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::LightYellow)
                    .add_modifier(Modifier::BOLD),
            )
            .divider(" ");
        f.render_widget(tabs, rows[0]);

        let folders = self.store.folders_by_filter(self.folder_filter);
        let now = Utc::now();
        let items = if folders.is_empty() {
            vec![ListItem::new("No folders")]
        } else {
            folders
                .iter()
                .map(|folder| folder_item(folder, now))
                .collect()
        };
        let mut state = ListState::default();
        if focused && !folders.is_empty() {
            state.select(Some(self.selected_folder.min(folders.len() - 1)));
        }
        let list = List::new(items).highlight_style(highlight_style());
        f.render_stateful_widget(list, rows[1], &mut state);
    }

    fn draw_footer(&self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Length(2)])
            .split(area);

        let help_bar = Paragraph::new(footer_help_line())
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::TOP)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
        f.render_widget(help_bar, rows[0]);

        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(rows[1]);

        let status_style = if self.store.last_persist_error().is_some() {
            Style::default().fg(Color::LightRed)
        } else {
            Style::default()
        };
        let status = Paragraph::new(self.status.clone())
            .style(status_style)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::TOP)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
        f.render_widget(status, bottom[0]);

        let (detail, title) = self.detail_content();
        let detail = Paragraph::new(detail).wrap(Wrap { trim: true }).block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(title),
        );
        f.render_widget(detail, bottom[1]);
    }

    fn detail_content(&self) -> (Line<'static>, String) {
        if self.focus == Focus::Folders {
            return match self.current_folder() {
                Some(folder) => (
                    Line::from(vec![
                        Span::styled(
                            folder.name.clone(),
                            Style::default()
                                .fg(Color::Yellow)
                                .add_modifier(Modifier::BOLD),
                        ),
                        Span::raw("  "),
                        Span::styled(
                            folder.updated_at.format("%Y-%m-%d %H:%M").to_string(),
                            Style::default().fg(Color::Gray),
                        ),
                    ]),
                    "Folder".into(),
                ),
                None => (Line::from("No folder selected"), "Folder".into()),
            };
        }
        match self.current_note() {
            Some(note) => (
                Line::from(vec![
                    Span::styled(
                        note.title.clone(),
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("  "),
                    Span::styled(
                        format!("{} item(s)", note.items.len()),
                        Style::default().fg(Color::Gray),
                    ),
                    Span::raw("  "),
                    Span::styled(note.id.clone(), Style::default().fg(Color::DarkGray)),
                ]),
                "Selected".into(),
            ),
            None => (Line::from("No note selected"), "Selected".into()),
        }
    }

    fn draw_editor(&self, f: &mut ratatui::Frame<'_>, title: &str, editor: &NoteEditor) {
        let area = centered_rect(60, 70, f.size());
        let mut lines = Vec::new();
        lines.push(field_line(
            "Title",
            &editor.title,
            editor.field == EditorField::Title,
        ));
        lines.push(field_line(
            "Time",
            &editor.time_label,
            editor.field == EditorField::TimeLabel,
        ));
        lines.push(choice_line(
            "Period",
            editor.period.label(),
            None,
            editor.field == EditorField::Period,
        ));
        let (r, g, b) = editor.accent.rgb();
        lines.push(choice_line(
            "Accent",
            editor.accent.label(),
            Some(Color::Rgb(r, g, b)),
            editor.field == EditorField::Accent,
        ));
        lines.push(Line::from(Span::styled(
            "Items:",
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::BOLD | Modifier::DIM),
        )));
        for (idx, item) in editor.items.iter().enumerate() {
            lines.push(field_line(
                &format!("  {}.", idx + 1),
                item,
                editor.field == EditorField::Item(idx),
            ));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Ctrl+S save • Esc cancel • Tab/Shift-Tab move • ←→ change period/accent • Enter adds item • Ctrl+X removes item",
            Style::default().fg(Color::Gray),
        )));
        let dialog = Paragraph::new(lines)
            .block(
                Block::default()
                    .title(Span::styled(
                        title.to_string(),
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    ))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .wrap(Wrap { trim: true });

        f.render_widget(Clear, area);
        f.render_widget(dialog, area);
    }

    fn draw_search(&self, f: &mut ratatui::Frame<'_>, panel: &SearchPanel) {
        let area = centered_rect(60, 60, f.size());
        f.render_widget(Clear, area);
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(3)])
            .split(area);

        let input = Paragraph::new(panel.query.with_caret()).block(
            Block::default()
                .title(Span::styled(
                    "Search",
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );
        f.render_widget(input, rows[0]);

        let results = self.store.search_notes(&panel.query.value);
        let items = if panel.query.value.trim().is_empty() {
            vec![ListItem::new("Type to search titles, items and times")]
        } else if results.is_empty() {
            vec![ListItem::new("No matches")]
        } else {
            results
                .iter()
                .map(|note| {
                    ListItem::new(Line::from(vec![
                        Span::styled(
                            truncate_text(&note.title, 32),
                            Style::default()
                                .fg(Color::White)
                                .add_modifier(Modifier::BOLD),
                        ),
                        Span::raw("  "),
                        Span::styled(note.time_label.clone(), Style::default().fg(Color::Gray)),
                        Span::raw("  "),
                        Span::styled(
                            note.period.label(),
                            Style::default().fg(Color::LightMagenta),
                        ),
                    ]))
                })
                .collect()
        };
        let mut state = ListState::default();
        if !results.is_empty() {
            state.select(Some(panel.selected.min(results.len() - 1)));
        }
        let list = List::new(items)
            .block(
                Block::default()
                    .title(format!("Results ({})", results.len()))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray)),
            )
            .highlight_style(highlight_style());
        f.render_stateful_widget(list, rows[1], &mut state);
    }

    fn draw_confirm(&self, f: &mut ratatui::Frame<'_>, note_id: &str) {
        let area = centered_rect(50, 30, f.size());
        let title = self
            .store
            .note(note_id)
            .map(|n| n.title.clone())
            .unwrap_or_else(|| note_id.to_string());
        let body = vec![
            Line::from(Span::styled(
                format!("Delete \"{}\"?", title),
                Style::default()
                    .fg(Color::LightRed)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("Press y to confirm, n or Esc to cancel"),
        ];
        let dialog = Paragraph::new(body).alignment(Alignment::Center).block(
            Block::default()
                .title(Span::styled(
                    "Confirm Delete",
                    Style::default()
                        .fg(Color::LightRed)
                        .add_modifier(Modifier::BOLD),
                ))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::LightRed)),
        );
        f.render_widget(Clear, area);
        f.render_widget(dialog, area);
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn teardown_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn panel_block(title: &str, focused: bool) -> Block<'static> {
    let color = if focused { Color::Cyan } else { Color::DarkGray };
    Block::default()
        .title(Span::styled(
            title.to_string(),
            Style::default()
                .fg(if focused { Color::Cyan } else { Color::Gray })
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
}

fn highlight_style() -> Style {
    Style::default()
        .bg(Color::LightCyan)
        .fg(Color::Black)
        .add_modifier(Modifier::BOLD)
}

fn footer_help_line() -> Line<'static> {
    Line::from(vec![
        Span::styled("Tab", Style::default().fg(Color::LightCyan)),
        Span::raw(" focus  "),
        Span::styled("[ ]", Style::default().fg(Color::LightCyan)),
        Span::raw(" tabs  "),
        Span::styled("←↑↓→ / h j k l", Style::default().fg(Color::LightCyan)),
        Span::raw(" move  "),
        Span::styled("n", Style::default().fg(Color::LightMagenta)),
        Span::raw(" new  "),
        Span::styled("s", Style::default().fg(Color::LightMagenta)),
        Span::raw(" suggest  "),
        Span::styled("e", Style::default().fg(Color::LightYellow)),
        Span::raw(" edit  "),
        Span::styled("/", Style::default().fg(Color::LightGreen)),
        Span::raw(" search  "),
        Span::styled("d", Style::default().fg(Color::LightRed)),
        Span::raw(" delete  "),
        Span::styled("q", Style::default().fg(Color::LightRed)),
        Span::raw(" quit"),
    ])
}

fn note_card(note: &Note, selected: bool) -> Paragraph<'static> {
    let (r, g, b) = note.accent.rgb();
    let accent = Color::Rgb(r, g, b);
    let inner_width = CARD_WIDTH.saturating_sub(4) as usize;
    let mut lines = vec![
        Line::from(Span::styled(
            note.time_label.clone(),
            Style::default().fg(Color::Gray).add_modifier(Modifier::DIM),
        )),
        Line::from(""),
    ];
    for item in &note.items {
        lines.push(Line::from(vec![
            Span::styled("• ", Style::default().fg(accent)),
            Span::raw(truncate_text(item, inner_width.saturating_sub(2))),
        ]));
    }
    let block = Block::default()
        .title(Span::styled(
            truncate_text(&note.title, inner_width),
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(if selected {
            BorderType::Thick
        } else {
            BorderType::Rounded
        })
        .border_style(Style::default().fg(accent))
        .style(if selected {
            Style::default().bg(Color::Rgb(40, 42, 54))
        } else {
            Style::default().bg(Color::Rgb(22, 24, 30))
        });
    Paragraph::new(lines)
        .block(block)
        .style(Style::default().fg(Color::White))
        .wrap(Wrap { trim: true })
}

fn folder_item(folder: &Folder, now: chrono::DateTime<Utc>) -> ListItem<'static> {
    let (r, g, b) = folder.accent.rgb();
    let mut spans = vec![
        Span::styled(
            format!(" {:<2} ", folder.abbreviation),
            Style::default()
                .bg(Color::Rgb(r, g, b))
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(
            truncate_text(&folder.name, 24),
            Style::default().fg(Color::White),
        ),
        Span::raw("  "),
        Span::styled(
            format_age(folder.updated_at, now),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if folder.is_recent {
        spans.push(Span::styled("  recent", Style::default().fg(Color::LightGreen)));
    }
    ListItem::new(Line::from(spans))
}

fn field_line(label: &str, field: &FieldValue, active: bool) -> Line<'static> {
    let label_style = Style::default()
        .fg(Color::Gray)
        .add_modifier(Modifier::BOLD | Modifier::DIM);
    let value_style = Style::default().fg(if active { Color::Cyan } else { Color::White });
    let text = if active {
        field.with_caret()
    } else {
        field.value.clone()
    };
    Line::from(vec![
        Span::styled(format!("{}: ", label), label_style),
        Span::styled(text, value_style),
    ])
}

fn choice_line(label: &str, value: &str, swatch: Option<Color>, active: bool) -> Line<'static> {
    let label_style = Style::default()
        .fg(Color::Gray)
        .add_modifier(Modifier::BOLD | Modifier::DIM);
    let value_style = Style::default().fg(if active { Color::Cyan } else { Color::White });
    let mut spans = vec![Span::styled(format!("{}: ", label), label_style)];
    if active {
        spans.push(Span::styled(format!("‹ {} ›", value), value_style));
    } else {
        spans.push(Span::styled(value.to_string(), value_style));
    }
    if let Some(color) = swatch {
        spans.push(Span::raw(" "));
        spans.push(Span::styled("  ", Style::default().bg(color)));
    }
    Line::from(spans)
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

fn adjust_offset(
    selected: usize,
    current_offset: usize,
    viewport: usize,
    scrolloff: usize,
    len: usize,
) -> usize {
    if viewport == 0 || len == 0 {
        return 0;
    }
    let max_offset = len.saturating_sub(viewport);
    let margin = scrolloff.min(viewport.saturating_sub(1));
    let mut offset = current_offset.min(max_offset);
    if selected < offset.saturating_add(margin) {
        offset = selected.saturating_sub(margin);
    } else {
        let upper = offset
            .saturating_add(viewport.saturating_sub(1))
            .saturating_sub(margin);
        if selected > upper {
            offset = selected.saturating_add(margin + 1).saturating_sub(viewport);
        }
    }
    offset.min(max_offset)
}

fn prev_grapheme(cursor: usize, text: &str) -> usize {
    if cursor == 0 {
        return 0;
    }
    let mut prev = 0;
    for (idx, _) in text.char_indices() {
        if idx >= cursor {
            break;
        }
        prev = idx;
    }
    prev
}

fn next_grapheme(cursor: usize, text: &str) -> usize {
    for (idx, ch) in text.char_indices() {
        if idx > cursor {
            return idx;
        }
        if idx == cursor {
            return cursor + ch.len_utf8();
        }
    }
    text.len()
}

fn truncate_text(text: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(&"...".chars().take(max - keep).collect::<String>());
    out
}

fn format_elapsed(last: Instant) -> String {
    let secs = last.elapsed().as_secs();
    if secs < 60 {
        format!("{}s ago", secs)
    } else if secs < 3600 {
        format!("{}m ago", secs / 60)
    } else {
        format!("{}h ago", secs / 3600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, StoreScope};
    use crate::store::DEFAULT_STORAGE_KEY;
    use std::path::PathBuf;

    fn app() -> App<MemoryStore> {
        let store = NotesStore::initialize(MemoryStore::new(), DEFAULT_STORAGE_KEY);
        let location = StoreLocation {
            dir: PathBuf::from("/tmp/notefold-test"),
            scope: StoreScope::Custom,
        };
        App::new(store, location, 5)
    }

    fn press(app: &mut App<MemoryStore>, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE)).unwrap();
    }

    fn ctrl(app: &mut App<MemoryStore>, ch: char) {
        app.handle_key(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL))
            .unwrap();
    }

    fn type_text(app: &mut App<MemoryStore>, text: &str) {
        for ch in text.chars() {
            press(app, KeyCode::Char(ch));
        }
    }

    #[test]
    fn creating_through_the_form_prepends_to_the_active_period() {
        let mut app = app();
        let before = app.store.notes().len();
        press(&mut app, KeyCode::Char('n'));
        type_text(&mut app, "  Packing list ");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "6:00 AM");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "passport");
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "charger");
        ctrl(&mut app, 's');

        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(app.store.notes().len(), before + 1);
        let created = &app.store.notes()[0];
        assert_eq!(created.title, "Packing list");
        assert_eq!(created.time_label, "6:00 AM");
        assert_eq!(created.period, Period::ThisWeek);
        assert_eq!(created.items, vec!["passport".to_string(), "charger".to_string()]);
        assert_eq!(app.period, Period::ThisWeek);
        assert_eq!(app.current_note().map(|n| n.id.clone()), Some(created.id.clone()));
    }

    #[test]
    fn submitting_an_empty_form_keeps_it_open() {
        let mut app = app();
        let before = app.store.notes().len();
        press(&mut app, KeyCode::Char('n'));
        ctrl(&mut app, 's');
        assert!(matches!(app.mode, Mode::Creating(_)));
        assert!(app.status.contains("title is required"));
        assert_eq!(app.store.notes().len(), before);
    }

    #[test]
    fn search_opens_the_matching_note_for_editing() {
        let mut app = app();
        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "atomic");
        press(&mut app, KeyCode::Enter);
        match &app.mode {
            Mode::Editing { editor, .. } => assert_eq!(editor.title.value, "Books to Read"),
            _ => panic!("expected the editor to open"),
        }
    }

    #[test]
    fn editing_replaces_fields_and_keeps_position() {
        let mut app = app();
        let target = app.store.notes()[1].id.clone();
        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "random thoughts");
        press(&mut app, KeyCode::Enter);
        for _ in 0.."Random Thoughts".len() {
            press(&mut app, KeyCode::Backspace);
        }
        type_text(&mut app, "Musings");
        ctrl(&mut app, 's');
        assert_eq!(app.store.notes()[1].id, target);
        assert_eq!(app.store.notes()[1].title, "Musings");
    }

    #[test]
    fn delete_requires_confirmation() {
        let mut app = app();
        let before = app.store.notes().len();
        let first = app.current_note().map(|n| n.id.clone()).unwrap();
        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.store.notes().len(), before);
        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.store.notes().len(), before - 1);
        assert!(app.store.note(&first).is_none());
    }

    #[test]
    fn tabs_cycle_period_and_folder_filter() {
        let mut app = app();
        assert_eq!(app.period, Period::Today);
        press(&mut app, KeyCode::Char(']'));
        assert_eq!(app.period, Period::ThisMonth);
        press(&mut app, KeyCode::Char('['));
        assert_eq!(app.period, Period::Today);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Focus::Folders);
        press(&mut app, KeyCode::Char(']'));
        assert_eq!(app.folder_filter, FolderFilter::Recent);
        assert!(app.current_note().is_none());
        assert!(app.current_folder().unwrap().is_recent);
    }

    #[test]
    fn selection_is_clamped() {
        let mut app = app();
        for _ in 0..10 {
            press(&mut app, KeyCode::Right);
        }
        assert_eq!(app.selected_note, 1);
        for _ in 0..10 {
            press(&mut app, KeyCode::Left);
        }
        assert_eq!(app.selected_note, 0);
    }

    #[test]
    fn editor_item_list_never_goes_empty() {
        let mut editor = NoteEditor::new(Period::Today);
        editor.field = EditorField::Item(0);
        editor.items[0].insert_char('x');
        editor.remove_item();
        assert_eq!(editor.items.len(), 1);
        assert_eq!(editor.items[0].value, "");
        editor.add_item();
        assert_eq!(editor.items.len(), 2);
        assert_eq!(editor.field, EditorField::Item(1));
        editor.remove_item();
        assert_eq!(editor.field, EditorField::Item(0));
    }

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<String>, crate::storage::StorageError> {
            Ok(None)
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), crate::storage::StorageError> {
            Err(crate::storage::StorageError::Unavailable("read-only".into()))
        }
    }

    #[test]
    fn unwritable_backend_still_opens_and_reports() {
        let store = NotesStore::initialize(FailingStore, DEFAULT_STORAGE_KEY);
        let location = StoreLocation {
            dir: PathBuf::from("/tmp/notefold-test"),
            scope: StoreScope::Custom,
        };
        let mut app = App::new(store, location, 5);
        assert!(app.status.contains("could not save"));
        assert_eq!(app.store.notes().len(), 4);

        app.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::NONE))
            .unwrap();
        assert_eq!(app.store.notes().len(), 5);
        assert!(app.status.contains("not saved"));
    }

    #[test]
    fn truncate_text_respects_limit() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("a long title here", 8), "a lon...");
        assert_eq!(truncate_text("abc", 0), "");
    }

    #[test]
    fn adjust_offset_scrolls_to_selection() {
        assert_eq!(adjust_offset(0, 0, 3, 0, 10), 0);
        assert_eq!(adjust_offset(5, 0, 3, 0, 10), 3);
        assert_eq!(adjust_offset(1, 4, 3, 0, 10), 1);
        assert_eq!(adjust_offset(9, 0, 3, 0, 10), 7);
    }
}
