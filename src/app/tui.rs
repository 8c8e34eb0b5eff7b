use std::io::Stdout;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Tabs, Wrap,
};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use crate::analyze::validate_target_url;
use crate::error::Result;
use crate::report::LinkReport;
use crate::text::truncate_with_ellipsis;

use super::types::{
    AnalysisControl, AnalysisEvent, AppState, PageSource, ResultView, clamp_selection,
};
use super::ui_utils::{centered_rect, group_size_style, hotkey_spans, open_url_in_browser};

const PAGE_JUMP_STEP: usize = 10;
const NAME_COLUMN_CHARS: usize = 48;

pub(crate) struct TuiOptions {
    pub(crate) source: PageSource,
    pub(crate) view: ResultView,
    pub(crate) show_html: bool,
}

fn row_count(report: Option<&LinkReport>, view: ResultView) -> usize {
    match (report, view) {
        (None, _) => 0,
        (Some(report), ResultView::Grouped) => report.unique_destinations,
        (Some(report), ResultView::Flat) => report.total_anchors,
    }
}

/// Full URL behind the current selection: the destination in the grouped
/// view, the anchor's own href in the flat view.
fn selected_url(
    report: Option<&LinkReport>,
    view: ResultView,
    selected_group_idx: usize,
    selected_anchor_idx: usize,
) -> Option<String> {
    let report = report?;
    match view {
        ResultView::Grouped => report
            .groups_by_size()
            .get(selected_group_idx)
            .map(|group| group.normalized_url.clone()),
        ResultView::Flat => report
            .anchors_by_group_size()
            .get(selected_anchor_idx)
            .map(|(anchor, _)| anchor.full_url.clone()),
    }
}

fn move_selection(selected: usize, len: usize, delta: isize) -> usize {
    if len == 0 {
        return 0;
    }
    let next = if delta < 0 {
        selected.saturating_sub(delta.unsigned_abs())
    } else {
        selected.saturating_add(delta as usize)
    };
    next.min(len - 1)
}

fn request_analysis(
    state: &mut AppState,
    control_tx: &UnboundedSender<AnalysisControl>,
    source: PageSource,
) {
    if control_tx.send(AnalysisControl::Analyze(source)).is_err() {
        state.push_error("analysis worker is not running".to_string());
    } else {
        state.running = true;
        state.last_error = None;
    }
}

pub(crate) fn draw_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    options: TuiOptions,
    control_tx: &UnboundedSender<AnalysisControl>,
    rx: &mut UnboundedReceiver<AnalysisEvent>,
) -> Result<()> {
    let mut state = AppState::default();
    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(120);
    let mut current_source = options.source;
    let mut view = options.view;
    let mut show_html = options.show_html;
    let mut url_input = match &current_source {
        PageSource::Remote(url) => url.clone(),
        PageSource::LocalFile { base_url, .. } => base_url.clone(),
    };
    let mut edit_mode = false;
    let mut help_mode = false;
    let mut selected_group_idx = 0usize;
    let mut selected_anchor_idx = 0usize;
    let mut group_detail_scroll = 0u16;
    let mut group_table_state = TableState::default();
    let mut anchor_table_state = TableState::default();

    request_analysis(&mut state, control_tx, current_source.clone());

    loop {
        while let Ok(event) = rx.try_recv() {
            if state.handle_event(event) {
                selected_group_idx = 0;
                selected_anchor_idx = 0;
                group_detail_scroll = 0;
            }
        }

        terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(6),
                    Constraint::Length(3),
                    Constraint::Min(10),
                    Constraint::Length(3),
                ])
                .split(f.area());

            let title = if state.running {
                "anchorscope - Analyzing (press q to quit)"
            } else {
                "anchorscope - Ready (press q to quit)"
            };
            let metric_label = Style::default().fg(Color::Gray);
            let sep_style = Style::default().fg(Color::DarkGray);
            let input_style = if edit_mode {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let mut header_lines = vec![Line::from(vec![
                Span::styled("URL ", metric_label),
                Span::styled(
                    if edit_mode {
                        format!("{url_input}_")
                    } else {
                        url_input.clone()
                    },
                    input_style,
                ),
            ])];
            match state.report.as_ref() {
                Some(report) => {
                    header_lines.push(Line::from(vec![
                        Span::styled("Anchors ", metric_label),
                        Span::styled(
                            report.total_anchors.to_string(),
                            Style::default()
                                .fg(Color::Cyan)
                                .add_modifier(Modifier::BOLD),
                        ),
                        Span::styled("  |  ", sep_style),
                        Span::styled("Destinations ", metric_label),
                        Span::styled(
                            report.unique_destinations.to_string(),
                            Style::default()
                                .fg(Color::LightCyan)
                                .add_modifier(Modifier::BOLD),
                        ),
                        Span::styled("  |  ", sep_style),
                        Span::styled("Base ", metric_label),
                        Span::raw(report.base_url.clone()),
                    ]));
                    header_lines.push(Line::from(vec![
                        Span::styled("Skipped ", metric_label),
                        Span::styled(
                            format!(
                                "{} navigation, {} footer, {} not internal",
                                report.stats.skipped_navigation,
                                report.stats.skipped_footer,
                                report.stats.skipped_not_internal
                            ),
                            Style::default().fg(Color::DarkGray),
                        ),
                    ]));
                }
                None => header_lines.push(Line::from(Span::styled(
                    "No results yet",
                    Style::default().fg(Color::DarkGray),
                ))),
            }
            if let Some(error) = state.last_error.as_ref() {
                header_lines.push(Line::from(Span::styled(
                    format!("Error: {error}"),
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )));
            } else if let Some(notice) = state.notice() {
                header_lines.push(Line::from(Span::styled(
                    notice,
                    Style::default().fg(Color::Yellow),
                )));
            } else if let Some(status) = state.status_messages.front() {
                header_lines.push(Line::from(Span::styled(
                    status.clone(),
                    Style::default().fg(Color::Gray),
                )));
            }

            let header = Paragraph::new(header_lines)
                .block(
                    Block::default()
                        .title(title)
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(if state.last_error.is_some() {
                            Color::Red
                        } else if state.running {
                            Color::Cyan
                        } else {
                            Color::Green
                        })),
                )
                .wrap(Wrap { trim: true });
            f.render_widget(header, chunks[0]);

            let controls = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(30), Constraint::Min(20)])
                .split(chunks[1]);

            let hotkey_style = Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD);
            let tab_label_style = Style::default().fg(Color::Gray);
            let tabs = Tabs::new(vec![
                Line::from(vec![
                    Span::styled("1", hotkey_style),
                    Span::styled(" Grouped", tab_label_style),
                ]),
                Line::from(vec![
                    Span::styled("2", hotkey_style),
                    Span::styled(" Flat", tab_label_style),
                ]),
            ])
            .select(view.as_index())
            .block(Block::default().title("View").borders(Borders::ALL))
            .highlight_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            );
            f.render_widget(tabs, controls[0]);

            let analyzed_at = state
                .report
                .as_ref()
                .map(|report| report.analyzed_at.clone())
                .unwrap_or_else(|| "-".to_string());
            let options_line = Paragraph::new(Line::from(vec![
                Span::styled("HTML snippets ", metric_label),
                Span::styled(
                    if show_html { "on" } else { "off" },
                    Style::default().fg(if show_html { Color::Green } else { Color::DarkGray }),
                ),
                Span::styled("  |  ", sep_style),
                Span::styled("Analyzed ", metric_label),
                Span::raw(analyzed_at),
            ]))
            .block(Block::default().title("Options").borders(Borders::ALL));
            f.render_widget(options_line, controls[1]);

            match (state.report.as_ref(), view) {
                (None, _) => {
                    let message = if state.running {
                        "Fetching and analyzing page..."
                    } else {
                        "Press e to enter a URL, r to analyze again."
                    };
                    f.render_widget(
                        Paragraph::new(message)
                            .block(Block::default().title("Links").borders(Borders::ALL))
                            .wrap(Wrap { trim: true }),
                        chunks[2],
                    );
                }
                (Some(report), ResultView::Grouped) => {
                    let panel_chunks = Layout::default()
                        .direction(Direction::Horizontal)
                        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
                        .split(chunks[2]);

                    let groups = report.groups_by_size();
                    group_table_state.select(clamp_selection(selected_group_idx, groups.len()));
                    let rows = groups.iter().map(|group| {
                        let size = group.anchors.len();
                        Row::new(vec![
                            Cell::from(size.to_string()).style(group_size_style(size)),
                            Cell::from(group.normalized_url.clone()),
                        ])
                    });
                    let groups_table = Table::new(rows, [Constraint::Length(7), Constraint::Min(20)])
                        .header(
                            Row::new(vec!["Links", "Destination"])
                                .style(Style::default().add_modifier(Modifier::BOLD)),
                        )
                        .row_highlight_style(
                            Style::default()
                                .bg(Color::DarkGray)
                                .add_modifier(Modifier::BOLD),
                        )
                        .block(
                            Block::default()
                                .title(format!("Destinations ({})", groups.len()))
                                .borders(Borders::ALL)
                                .border_style(Style::default().fg(Color::Cyan)),
                        )
                        .column_spacing(1);
                    f.render_stateful_widget(groups_table, panel_chunks[0], &mut group_table_state);

                    let detail = if let Some(group) = groups.get(selected_group_idx) {
                        let mut lines = vec![
                            Line::from(Span::styled(
                                group.normalized_url.clone(),
                                Style::default()
                                    .fg(Color::Cyan)
                                    .add_modifier(Modifier::BOLD),
                            )),
                            Line::from(""),
                        ];
                        for anchor in &group.anchors {
                            lines.push(Line::from(vec![
                                Span::styled("- ", sep_style),
                                Span::styled(
                                    anchor.anchor_name.clone(),
                                    Style::default().add_modifier(Modifier::BOLD),
                                ),
                            ]));
                            lines.push(Line::from(vec![
                                Span::styled("  Full URL: ", metric_label),
                                Span::raw(anchor.full_url.clone()),
                            ]));
                            if show_html {
                                lines.push(Line::from(Span::styled(
                                    format!("  {}", anchor.html_snippet),
                                    Style::default().fg(Color::DarkGray),
                                )));
                            }
                        }
                        lines
                    } else {
                        vec![Line::from("No destination selected")]
                    };
                    f.render_widget(
                        Paragraph::new(detail)
                            .block(
                                Block::default()
                                    .title("Anchors ([ ] scroll)")
                                    .borders(Borders::ALL),
                            )
                            .wrap(Wrap { trim: false })
                            .scroll((group_detail_scroll, 0)),
                        panel_chunks[1],
                    );
                }
                (Some(report), ResultView::Flat) => {
                    let panel_chunks = Layout::default()
                        .direction(Direction::Vertical)
                        .constraints([Constraint::Min(6), Constraint::Length(7)])
                        .split(chunks[2]);

                    let anchors = report.anchors_by_group_size();
                    anchor_table_state.select(clamp_selection(selected_anchor_idx, anchors.len()));
                    let rows = anchors.iter().map(|(anchor, group_size)| {
                        Row::new(vec![
                            Cell::from(truncate_with_ellipsis(
                                &anchor.anchor_name,
                                NAME_COLUMN_CHARS,
                            )),
                            Cell::from(group_size.to_string()).style(group_size_style(*group_size)),
                            Cell::from(anchor.normalized_url.clone()),
                        ])
                    });
                    let anchors_table = Table::new(
                        rows,
                        [
                            Constraint::Length(NAME_COLUMN_CHARS as u16 + 3),
                            Constraint::Length(7),
                            Constraint::Min(20),
                        ],
                    )
                    .header(
                        Row::new(vec!["Anchor", "Group", "Destination"])
                            .style(Style::default().add_modifier(Modifier::BOLD)),
                    )
                    .row_highlight_style(
                        Style::default()
                            .bg(Color::DarkGray)
                            .add_modifier(Modifier::BOLD),
                    )
                    .block(
                        Block::default()
                            .title(format!("All Links ({})", anchors.len()))
                            .borders(Borders::ALL)
                            .border_style(Style::default().fg(Color::Cyan)),
                    )
                    .column_spacing(1);
                    f.render_stateful_widget(anchors_table, panel_chunks[0], &mut anchor_table_state);

                    let detail = if let Some((anchor, _)) = anchors.get(selected_anchor_idx) {
                        let mut lines = vec![
                            Line::from(vec![
                                Span::styled("Anchor: ", metric_label),
                                Span::raw(anchor.anchor_name.clone()),
                            ]),
                            Line::from(vec![
                                Span::styled("Full URL: ", metric_label),
                                Span::raw(anchor.full_url.clone()),
                            ]),
                        ];
                        if show_html {
                            lines.push(Line::from(Span::styled(
                                anchor.html_snippet.clone(),
                                Style::default().fg(Color::DarkGray),
                            )));
                        }
                        lines
                    } else {
                        vec![Line::from("No anchor selected")]
                    };
                    f.render_widget(
                        Paragraph::new(detail)
                            .block(Block::default().title("Detail").borders(Borders::ALL))
                            .wrap(Wrap { trim: true }),
                        panel_chunks[1],
                    );
                }
            }

            let footer_spans = if edit_mode {
                hotkey_spans(&[("enter", "analyze"), ("esc", "cancel"), ("ctrl+u", "clear")])
            } else {
                hotkey_spans(&[
                    ("q", "quit"),
                    ("tab", "view"),
                    ("e", "edit URL"),
                    ("r", "re-run"),
                    ("h", "html"),
                    ("o", "open"),
                    ("?", "help"),
                ])
            };
            f.render_widget(
                Paragraph::new(Line::from(footer_spans))
                    .block(Block::default().borders(Borders::ALL)),
                chunks[3],
            );

            if help_mode {
                let area = centered_rect(60, 50, f.area());
                f.render_widget(Clear, area);
                f.render_widget(
                    Paragraph::new(vec![
                        Line::from("Navigation"),
                        Line::from("  up/down or j/k: move selection"),
                        Line::from("  pgup/pgdn: jump by 10 rows"),
                        Line::from("  g/G or home/end: first/last row"),
                        Line::from("  [ / ]: scroll the anchors of a destination"),
                        Line::from("  tab or 1/2: grouped or flat view"),
                        Line::from(""),
                        Line::from("Actions"),
                        Line::from("  e: edit the URL, enter to analyze"),
                        Line::from("  r: analyze the current page again"),
                        Line::from("  h: show or hide HTML snippets"),
                        Line::from("  o / enter: open selected URL in the browser"),
                        Line::from(""),
                        Line::from("Press ? or Esc to close."),
                    ])
                    .block(
                        Block::default()
                            .title("Help")
                            .borders(Borders::ALL)
                            .border_style(Style::default().fg(Color::Yellow)),
                    )
                    .wrap(Wrap { trim: false }),
                    area,
                );
            }
        })?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let len = row_count(state.report.as_ref(), view);
                let selected = match view {
                    ResultView::Grouped => &mut selected_group_idx,
                    ResultView::Flat => &mut selected_anchor_idx,
                };
                if help_mode {
                    if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('?')) {
                        help_mode = false;
                    }
                } else if edit_mode {
                    match key.code {
                        KeyCode::Esc => edit_mode = false,
                        KeyCode::Enter => {
                            edit_mode = false;
                            match validate_target_url(&url_input) {
                                Ok(_) => {
                                    url_input = url_input.trim().to_string();
                                    current_source = PageSource::Remote(url_input.clone());
                                    request_analysis(&mut state, control_tx, current_source.clone());
                                }
                                Err(err) => {
                                    state.handle_event(AnalysisEvent::Failed(err.to_string()));
                                }
                            }
                        }
                        KeyCode::Backspace => {
                            url_input.pop();
                        }
                        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                            url_input.clear();
                        }
                        KeyCode::Char(ch) => {
                            if !key
                                .modifiers
                                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
                            {
                                url_input.push(ch);
                            }
                        }
                        _ => {}
                    }
                } else {
                    match key.code {
                        KeyCode::Char('q') => break,
                        KeyCode::Char('?') => help_mode = true,
                        KeyCode::Tab | KeyCode::BackTab => view = view.toggle(),
                        KeyCode::Char('1') => view = ResultView::Grouped,
                        KeyCode::Char('2') => view = ResultView::Flat,
                        KeyCode::Char('h') => show_html = !show_html,
                        KeyCode::Char('e') => edit_mode = true,
                        KeyCode::Char('r') if !state.running => {
                            request_analysis(&mut state, control_tx, current_source.clone());
                        }
                        KeyCode::Char('o') | KeyCode::Enter => {
                            if let Some(url) = selected_url(
                                state.report.as_ref(),
                                view,
                                selected_group_idx,
                                selected_anchor_idx,
                            ) {
                                if let Err(err) = open_url_in_browser(&url) {
                                    state.push_error(format!("failed to open {url}: {err}"));
                                } else {
                                    state.push_status(format!("opened {url}"));
                                }
                            }
                        }
                        KeyCode::Down | KeyCode::Char('j') => {
                            *selected = move_selection(*selected, len, 1);
                            group_detail_scroll = 0;
                        }
                        KeyCode::Up | KeyCode::Char('k') => {
                            *selected = move_selection(*selected, len, -1);
                            group_detail_scroll = 0;
                        }
                        KeyCode::PageDown => {
                            *selected = move_selection(*selected, len, PAGE_JUMP_STEP as isize);
                            group_detail_scroll = 0;
                        }
                        KeyCode::PageUp => {
                            *selected = move_selection(*selected, len, -(PAGE_JUMP_STEP as isize));
                            group_detail_scroll = 0;
                        }
                        KeyCode::Home | KeyCode::Char('g') => {
                            *selected = 0;
                            group_detail_scroll = 0;
                        }
                        KeyCode::End | KeyCode::Char('G') => {
                            *selected = len.saturating_sub(1);
                            group_detail_scroll = 0;
                        }
                        KeyCode::Char(']') => {
                            group_detail_scroll = group_detail_scroll.saturating_add(1);
                        }
                        KeyCode::Char('[') => {
                            group_detail_scroll = group_detail_scroll.saturating_sub(1);
                        }
                        _ => {}
                    }
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::analyze_html;

    fn report() -> LinkReport {
        analyze_html(
            r#"<main>
                <a href="/solo">Solo</a>
                <a href="/pair">Pair one</a>
                <a href="/pair#again">Pair two</a>
            </main>"#,
            "https://shop.test/",
            "https://shop.test/",
        )
        .unwrap()
    }

    #[test]
    fn move_selection_clamps_to_list() {
        assert_eq!(move_selection(0, 5, -1), 0);
        assert_eq!(move_selection(3, 5, 10), 4);
        assert_eq!(move_selection(4, 5, -2), 2);
        assert_eq!(move_selection(7, 0, 1), 0);
    }

    #[test]
    fn row_count_follows_view() {
        let report = report();
        assert_eq!(row_count(Some(&report), ResultView::Grouped), 2);
        assert_eq!(row_count(Some(&report), ResultView::Flat), 3);
        assert_eq!(row_count(None, ResultView::Flat), 0);
    }

    #[test]
    fn selected_url_uses_destination_or_full_href() {
        let report = report();
        assert_eq!(
            selected_url(Some(&report), ResultView::Grouped, 0, 0).as_deref(),
            Some("https://shop.test/pair")
        );
        assert_eq!(
            selected_url(Some(&report), ResultView::Flat, 0, 1).as_deref(),
            Some("https://shop.test/pair#again")
        );
        assert_eq!(selected_url(Some(&report), ResultView::Flat, 0, 9), None);
    }

    #[test]
    fn request_analysis_marks_running() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut state = AppState::default();
        request_analysis(
            &mut state,
            &tx,
            PageSource::Remote("https://shop.test/".to_string()),
        );
        assert!(state.running);
        assert!(matches!(rx.try_recv(), Ok(AnalysisControl::Analyze(_))));

        drop(rx);
        let mut state = AppState::default();
        request_analysis(
            &mut state,
            &tx,
            PageSource::Remote("https://shop.test/".to_string()),
        );
        assert!(!state.running);
        assert_eq!(state.errors.len(), 1);
    }
}
