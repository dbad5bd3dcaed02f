use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind};
use log::{debug, error, info};
use ratatui::{
    Frame, Terminal,
    layout::{Alignment, Constraint, Direction as LayoutDirection, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};

use crate::catalog::Catalog;
use crate::event_source::EventSource;
use crate::pdf::{DocumentLoader, resolve_url};
use crate::system_command::{RealSystemCommandExecutor, SystemCommandExecutor};
use crate::theme::OCEANIC_NEXT;
use crate::thumbnail::{Thumbnail, ThumbnailService};
use crate::viewer::{Viewer, ViewerConfig};
use crate::widget::page_image::{PageImage, Reveal};

/// Display pixels moved per line scroll in the viewer stage
const SCROLL_STEP: i64 = 2;
const MOUSE_SCROLL_STEP: i64 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Quit,
}

pub struct App {
    catalog: Catalog,
    thumbnails: Vec<Option<Thumbnail>>,
    thumbnail_service: ThumbnailService,
    thumbnails_requested: bool,
    viewer: Viewer,
    list_state: ListState,
    system_command_executor: Box<dyn SystemCommandExecutor>,
    stage_area: Option<Rect>,
}

impl App {
    pub fn new(
        catalog: Catalog,
        loader: Arc<dyn DocumentLoader>,
        viewer_config: ViewerConfig,
        thumbnail_workers: usize,
    ) -> Self {
        Self::new_with_executor(
            catalog,
            loader,
            viewer_config,
            thumbnail_workers,
            Box::new(RealSystemCommandExecutor),
        )
    }

    pub fn new_with_executor(
        catalog: Catalog,
        loader: Arc<dyn DocumentLoader>,
        viewer_config: ViewerConfig,
        thumbnail_workers: usize,
        system_command_executor: Box<dyn SystemCommandExecutor>,
    ) -> Self {
        let mut list_state = ListState::default();
        if !catalog.is_empty() {
            list_state.select(Some(0));
        }
        Self {
            thumbnails: vec![None; catalog.len()],
            thumbnail_service: ThumbnailService::new(Arc::clone(&loader), thumbnail_workers),
            thumbnails_requested: false,
            viewer: Viewer::new(loader, viewer_config),
            catalog,
            list_state,
            system_command_executor,
            stage_area: None,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    pub fn selected(&self) -> Option<usize> {
        self.list_state.selected()
    }

    pub fn list_offset(&self) -> usize {
        self.list_state.offset()
    }

    pub fn thumbnail(&self, index: usize) -> Option<&Thumbnail> {
        self.thumbnails.get(index).and_then(Option::as_ref)
    }

    pub fn pending_thumbnails(&self) -> usize {
        self.thumbnail_service.pending_count()
    }

    /// Queue a thumbnail for every catalog entry, once
    pub fn request_thumbnails(&mut self, container_width: f32) {
        if self.thumbnails_requested {
            return;
        }
        self.thumbnails_requested = true;
        info!(
            "Rendering {} thumbnails at width {container_width}",
            self.catalog.len()
        );
        for (index, entry) in self.catalog.entries().iter().enumerate() {
            self.thumbnail_service
                .request(index, &entry.url, container_width);
        }
    }

    /// Store finished thumbnails. Returns true if any arrived.
    pub fn poll_thumbnails(&mut self) -> bool {
        let responses = self.thumbnail_service.poll_responses();
        let arrived = !responses.is_empty();
        for response in responses {
            if let Some(slot) = self.thumbnails.get_mut(response.index) {
                *slot = Some(response.thumbnail);
            }
        }
        arrived
    }

    /// Block until all requested thumbnails arrive or `timeout` elapses
    pub fn wait_for_thumbnails(&mut self, timeout: Duration) {
        for response in self.thumbnail_service.wait_all(timeout) {
            if let Some(slot) = self.thumbnails.get_mut(response.index) {
                *slot = Some(response.thumbnail);
            }
        }
    }

    /// Advance viewer timers and collect thumbnails. Returns true if the
    /// screen needs redrawing.
    pub fn tick(&mut self, now: Instant) -> bool {
        let viewer_changed = self.viewer.tick(now);
        let thumbnails_arrived = self.poll_thumbnails();
        viewer_changed || thumbnails_arrived || self.viewer.is_animating()
    }

    /// Feed the latest layout to the thumbnail workers and the viewer
    fn sync_layout(&mut self, preview: Rect, stage: Rect, now: Instant) {
        self.request_thumbnails(f32::from(preview.width));

        if self.stage_area == Some(stage) {
            return;
        }
        let width = f32::from(stage.width);
        let height = u32::from(stage.height) * 2;
        if self.stage_area.is_none() {
            self.viewer.set_stage_size(width, height);
        } else {
            self.viewer.resize(width, height, now);
        }
        self.stage_area = Some(stage);
    }

    pub fn handle_event(&mut self, event: &Event, now: Instant) -> Option<AppAction> {
        self.viewer.tick(now);
        match event {
            Event::Key(key) => self.handle_key(*key, now),
            Event::Mouse(mouse) => {
                self.handle_mouse(*mouse);
                None
            }
            _ => None,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Option<AppAction> {
        if key.kind != KeyEventKind::Press {
            return None;
        }

        if self.viewer.is_open() {
            self.handle_viewer_key(key, now);
            return None;
        }

        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.move_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(-1),
            KeyCode::Char('g') | KeyCode::Home => self.select(0),
            KeyCode::Char('G') | KeyCode::End => {
                self.select(self.catalog.len().saturating_sub(1));
            }
            KeyCode::Enter => self.open_selected(),
            KeyCode::Char('q') | KeyCode::Esc => return Some(AppAction::Quit),
            _ => {}
        }
        None
    }

    fn handle_viewer_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Right
            | KeyCode::PageDown
            | KeyCode::Char('l')
            | KeyCode::Char('n')
            | KeyCode::Char(' ') => {
                self.viewer.next(now);
            }
            KeyCode::Left | KeyCode::PageUp | KeyCode::Char('h') | KeyCode::Char('p') => {
                self.viewer.prev(now);
            }
            KeyCode::Char('j') | KeyCode::Down => self.viewer.scroll_by(SCROLL_STEP),
            KeyCode::Char('k') | KeyCode::Up => self.viewer.scroll_by(-SCROLL_STEP),
            KeyCode::Char('d') => self.download_current(),
            KeyCode::Esc | KeyCode::Char('q') => self.close_viewer(),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        match (mouse.kind, self.viewer.is_open()) {
            (MouseEventKind::ScrollDown, true) => self.viewer.scroll_by(MOUSE_SCROLL_STEP),
            (MouseEventKind::ScrollUp, true) => self.viewer.scroll_by(-MOUSE_SCROLL_STEP),
            (MouseEventKind::ScrollDown, false) => self.move_selection(1),
            (MouseEventKind::ScrollUp, false) => self.move_selection(-1),
            _ => {}
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let Some(current) = self.list_state.selected() else {
            return;
        };
        self.select(current.saturating_add_signed(delta));
    }

    fn select(&mut self, index: usize) {
        if self.catalog.is_empty() {
            return;
        }
        self.list_state
            .select(Some(index.min(self.catalog.len() - 1)));
    }

    pub fn open_selected(&mut self) {
        let Some(entry) = self
            .list_state
            .selected()
            .and_then(|index| self.catalog.get(index))
            .cloned()
        else {
            return;
        };
        self.viewer.open(&entry, self.list_state.offset());
    }

    pub fn close_viewer(&mut self) {
        if let Some(offset) = self.viewer.close() {
            *self.list_state.offset_mut() = offset;
        }
    }

    fn download_current(&mut self) {
        let Some(url) = self.viewer.download_url() else {
            return;
        };
        let target = resolve_url(url, self.catalog.base_dir());
        let target = target.to_string_lossy();
        if let Err(e) = self.system_command_executor.open_url(&target) {
            error!("Failed to open {target}: {e}");
        }
    }

    pub fn draw(&mut self, f: &mut Frame, now: Instant) {
        let palette = &OCEANIC_NEXT;
        f.render_widget(
            Block::default().style(Style::default().bg(palette.base_00)),
            f.area(),
        );

        let rows = Layout::default()
            .direction(LayoutDirection::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(f.area());
        let columns = Layout::default()
            .direction(LayoutDirection::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(rows[0]);

        let modal = centered_rect(90, 90, f.area());
        let (toolbar, stage) = modal_areas(modal);
        let preview = Block::default().borders(Borders::ALL).inner(columns[1]);
        self.sync_layout(preview, stage, now);

        self.render_catalog(f, columns[0]);
        self.render_preview(f, columns[1]);
        self.render_help_bar(f, rows[1]);

        if self.viewer.is_open() {
            self.render_viewer(f, modal, toolbar, stage, now);
        }
    }

    fn render_catalog(&mut self, f: &mut Frame, area: Rect) {
        let palette = &OCEANIC_NEXT;
        let focused = !self.viewer.is_open();
        let border_color = if focused {
            palette.base_0d
        } else {
            palette.base_03
        };

        let items: Vec<ListItem> = self
            .catalog
            .entries()
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let marker = match self.thumbnails.get(index) {
                    Some(Some(thumbnail)) if thumbnail.is_placeholder() => {
                        Span::styled(" !", Style::default().fg(palette.base_08))
                    }
                    Some(Some(_)) => Span::raw(""),
                    _ => Span::styled(" …", Style::default().fg(palette.base_03)),
                };
                ListItem::new(Line::from(vec![
                    Span::styled(entry.title.clone(), Style::default().fg(palette.base_05)),
                    marker,
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Documents ")
                    .border_style(Style::default().fg(border_color)),
            )
            .highlight_style(
                Style::default()
                    .bg(palette.base_02)
                    .fg(palette.base_07)
                    .add_modifier(Modifier::BOLD),
            );

        f.render_stateful_widget(list, area, &mut self.list_state);
    }

    fn render_preview(&self, f: &mut Frame, area: Rect) {
        let palette = &OCEANIC_NEXT;
        let title = self
            .list_state
            .selected()
            .and_then(|index| self.catalog.get(index))
            .map(|entry| format!(" {} ", entry.title))
            .unwrap_or_default();
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(palette.base_03));
        let inner = block.inner(area);
        f.render_widget(block, area);

        let thumbnail = self.list_state.selected().and_then(|i| self.thumbnail(i));
        match thumbnail {
            Some(thumbnail) => {
                f.render_widget(
                    PageImage::new(&thumbnail.canvas)
                        .fit_to_area()
                        .background(palette.base_00),
                    inner,
                );
            }
            None if !self.catalog.is_empty() => {
                f.render_widget(
                    Paragraph::new("Rendering…")
                        .alignment(Alignment::Center)
                        .style(Style::default().fg(palette.base_03)),
                    inner,
                );
            }
            None => {
                f.render_widget(
                    Paragraph::new("No documents")
                        .alignment(Alignment::Center)
                        .style(Style::default().fg(palette.base_03)),
                    inner,
                );
            }
        }
    }

    fn render_help_bar(&self, f: &mut Frame, area: Rect) {
        let help_text = if self.viewer.is_open() {
            "h/l: Page | j/k: Scroll | d: Download PDF | ESC: Close"
        } else {
            "j/k: Navigate | Enter: Open | q: Quit"
        };
        f.render_widget(
            Paragraph::new(help_text).style(Style::default().fg(OCEANIC_NEXT.base_03)),
            area,
        );
    }

    fn render_viewer(&self, f: &mut Frame, modal: Rect, toolbar: Rect, stage: Rect, now: Instant) {
        let palette = &OCEANIC_NEXT;
        f.render_widget(Clear, modal);
        let title = self
            .viewer
            .title()
            .map(|t| format!(" {t} "))
            .unwrap_or_default();
        f.render_widget(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(palette.base_0d))
                .style(Style::default().bg(palette.base_00)),
            modal,
        );

        let controls = self.viewer.controls();
        let button = |label: &'static str, enabled: bool| {
            let color = if enabled {
                palette.base_0d
            } else {
                palette.base_03
            };
            Span::styled(label, Style::default().fg(color).add_modifier(Modifier::BOLD))
        };
        let toolbar_line = Line::from(vec![
            button("‹", controls.prev_enabled),
            Span::styled(
                format!(" {} ", controls.indicator()),
                Style::default().fg(palette.base_05),
            ),
            button("›", controls.next_enabled),
            Span::raw("   "),
            Span::styled("[d] Download PDF", Style::default().fg(palette.base_0c)),
        ]);
        f.render_widget(
            Paragraph::new(toolbar_line).alignment(Alignment::Center),
            toolbar,
        );

        if self.viewer.is_loading() {
            f.render_widget(
                Paragraph::new("Loading…")
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(palette.base_0a)),
                stage,
            );
            return;
        }

        let reveal = self
            .viewer
            .secondary()
            .is_visible()
            .then(|| self.viewer.transition_progress(now))
            .flatten()
            .map(|(direction, progress)| Reveal {
                canvas: self.viewer.secondary(),
                direction,
                progress,
            });

        f.render_widget(
            PageImage::new(self.viewer.primary())
                .scroll(self.viewer.stage_scroll())
                .reveal(reveal)
                .background(palette.base_00),
            stage,
        );
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(LayoutDirection::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(LayoutDirection::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

/// Toolbar row and page stage inside the modal border
fn modal_areas(modal: Rect) -> (Rect, Rect) {
    let inner = Block::default().borders(Borders::ALL).inner(modal);
    let parts = Layout::default()
        .direction(LayoutDirection::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(inner);
    (parts[0], parts[1])
}

/// How long the loop may wait for input before the next tick or viewer deadline
fn poll_timeout(app: &App, rate: Duration, last_tick: Instant, now: Instant) -> Duration {
    let until_tick = rate
        .checked_sub(now.saturating_duration_since(last_tick))
        .unwrap_or_default();
    match app.viewer().next_deadline() {
        Some(deadline) => until_tick.min(deadline.saturating_duration_since(now)),
        None => until_tick,
    }
}

pub fn run_app_with_event_source<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    event_source: &mut dyn EventSource,
) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    let tick_rate = Duration::from_millis(50);
    let animation_tick_rate = Duration::from_millis(16);
    let mut last_tick = Instant::now();

    // Lay out once before handling input so the viewer knows its stage size
    terminal.draw(|f| app.draw(f, Instant::now()))?;

    loop {
        let mut events_processed = 0;
        let mut should_quit = false;

        while event_source.poll(Duration::from_millis(0))? && events_processed < 50 {
            let event = event_source.read()?;
            events_processed += 1;

            match &event {
                Event::Mouse(mouse)
                    if matches!(
                        mouse.kind,
                        MouseEventKind::ScrollLeft | MouseEventKind::ScrollRight
                    ) => {}
                Event::Resize(cols, rows) => {
                    debug!("Terminal resized to {cols}x{rows}");
                }
                _ => {
                    if app.handle_event(&event, Instant::now()) == Some(AppAction::Quit) {
                        should_quit = true;
                    }
                }
            }

            if should_quit {
                break;
            }
        }

        let mut needs_redraw = events_processed > 0;

        let rate = if app.viewer().is_animating() {
            animation_tick_rate
        } else {
            tick_rate
        };
        let deadline_due = app
            .viewer()
            .next_deadline()
            .is_some_and(|deadline| Instant::now() >= deadline);
        if deadline_due || last_tick.elapsed() >= rate {
            if app.tick(Instant::now()) {
                needs_redraw = true;
            }
            last_tick = Instant::now();
        }

        if needs_redraw {
            terminal.draw(|f| app.draw(f, Instant::now()))?;
        }

        if should_quit {
            return Ok(());
        }

        if events_processed == 0 {
            let _ = event_source.poll(poll_timeout(app, rate, last_tick, Instant::now()));
        }
    }
}
