use std::io::{Stdout, stdout};
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use folio_core::FolioConfig;
use folio_core::page::PageSnapshot;
use folio_core::widgets::Field;
use folio_protocol::{Reveal, Theme, ThemeToken};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::app::{App, SECTION_ROWS, Section};
use crate::palette;

const FRAME: Duration = Duration::from_millis(50);

/// Header and footer rows around the page viewport.
fn viewport_rows(terminal_height: u16) -> u16 {
    terminal_height.saturating_sub(2).max(1)
}

pub fn run_tui(config: &FolioConfig) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, config);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    result
}

fn event_loop(terminal: &mut Terminal<CrosstermBackend<Stdout>>, config: &FolioConfig) -> Result<()> {
    let size = terminal.size()?;
    let mut app = App::new(config, viewport_rows(size.height))?;
    let mut last = Instant::now();

    loop {
        let now = Instant::now();
        app.tick(now.duration_since(last));
        last = now;

        terminal.draw(|frame| draw(frame, &app))?;

        if event::poll(FRAME)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if !app.on_key(key) {
                        break;
                    }
                }
                Event::Mouse(mouse) => app.on_mouse(mouse.kind, mouse.row.saturating_sub(1)),
                Event::Resize(_, height) => app.resize(viewport_rows(height)),
                _ => {}
            }
        }
    }
    Ok(())
}

/// Resolves tokens for one section; unrevealed sections draw everything
/// in the hidden color.
struct Paint {
    theme: Theme,
    hidden: bool,
}

impl Paint {
    fn fg(&self, token: ThemeToken) -> Style {
        let token = if self.hidden { ThemeToken::Hidden } else { token };
        Style::default().fg(palette::resolve(self.theme, token))
    }

    fn on(&self, fg: ThemeToken, bg: ThemeToken) -> Style {
        self.fg(fg).bg(palette::resolve(self.theme, bg))
    }
}

fn draw(frame: &mut Frame, app: &App) {
    let snap = app.page.snapshot();
    let area = frame.area();
    let theme = snap.theme;
    let color = |token| palette::resolve(theme, token);

    let header_area = Rect::new(0, 0, area.width, 1);
    let body_area = Rect::new(0, 1, area.width, viewport_rows(area.height));
    let footer_area = Rect::new(0, area.height.saturating_sub(1), area.width, 1);

    frame.render_widget(header(app, &snap), header_area);

    let lines: Vec<Line> = app
        .sections
        .iter()
        .flat_map(|section| section_lines(app, section, &snap))
        .collect();
    let body = Paragraph::new(lines)
        .scroll((app.scroll_row(), 0))
        .block(Block::default().style(Style::default().bg(color(ThemeToken::Background))));
    frame.render_widget(body, body_area);

    frame.render_widget(footer(app, &snap), footer_area);

    if snap.menu_open {
        let links = app.page.nav().links();
        let height = u16::try_from(links.len()).unwrap_or(u16::MAX).saturating_add(2);
        let menu_area = Rect::new(1, 1, 24.min(area.width), height.min(body_area.height));
        let open_for = app.menu_open_for().unwrap_or_default();
        // Items slide in one after another.
        let items: Vec<Line> = links
            .iter()
            .zip(&snap.menu_delays_ms)
            .enumerate()
            .filter(|(_, (_, delay))| Duration::from_millis(u64::from(**delay)) <= open_for)
            .map(|(i, (link, _))| {
                let token = if snap.active_section == link.key {
                    ThemeToken::NavLinkActive
                } else {
                    ThemeToken::NavLink
                };
                Line::styled(format!(" {} {}", i + 1, link.label), Style::default().fg(color(token)))
            })
            .collect();
        let menu = Paragraph::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color(ThemeToken::Border)))
                .style(Style::default().bg(color(ThemeToken::NavBackground))),
        );
        frame.render_widget(Clear, menu_area);
        frame.render_widget(menu, menu_area);
    }
}

fn header<'a>(app: &'a App, snap: &PageSnapshot) -> Paragraph<'a> {
    let color = |token| palette::resolve(snap.theme, token);
    let bg = if snap.nav_scrolled {
        ThemeToken::NavBackground
    } else {
        ThemeToken::Background
    };

    let mut spans = vec![Span::styled(
        " folio ",
        Style::default()
            .fg(color(ThemeToken::Primary))
            .add_modifier(Modifier::BOLD),
    )];
    for link in app.page.nav().links() {
        spans.push(Span::raw(" "));
        let style = if snap.active_section == link.key {
            Style::default()
                .fg(color(ThemeToken::NavLinkActive))
                .underline_color(color(ThemeToken::NavUnderline))
                .add_modifier(Modifier::UNDERLINED)
        } else {
            Style::default().fg(color(ThemeToken::NavLink))
        };
        spans.push(Span::styled(link.label.as_str(), style));
    }
    spans.push(Span::styled(
        format!("  [t] {}", snap.theme_toggle_label),
        Style::default().fg(color(ThemeToken::MutedForeground)),
    ));

    Paragraph::new(Line::from(spans)).style(Style::default().bg(color(bg)))
}

fn footer<'a>(app: &'a App, snap: &PageSnapshot) -> Paragraph<'a> {
    let color = |token| palette::resolve(snap.theme, token);
    let mut text = String::from(" ↑↓ scroll | m menu | h/l cards | p pause | Tab contact | q quit");
    if snap.show_scroll_top {
        text.push_str(" | g ↑ top");
    }
    if let Some(status) = &app.status {
        text.push_str(" | ");
        text.push_str(status);
    }
    Paragraph::new(text).style(
        Style::default()
            .fg(color(ThemeToken::MutedForeground))
            .bg(color(ThemeToken::Card)),
    )
}

fn section_lines<'a>(app: &'a App, section: &'a Section, snap: &PageSnapshot) -> Vec<Line<'a>> {
    let reveal = snap
        .reveals
        .iter()
        .find(|s| s.key == section.key)
        .map_or(Reveal::Hidden, |s| s.reveal);
    let paint = Paint {
        theme: snap.theme,
        hidden: reveal == Reveal::Hidden,
    };

    let mut lines = vec![
        Line::default(),
        Line::styled(
            format!("  ── {} ──", section.label),
            paint.fg(ThemeToken::Primary).add_modifier(Modifier::BOLD),
        ),
        Line::default(),
    ];
    match section.key.as_str() {
        "certifications" => lines.extend(carousel_lines(app, snap, &paint)),
        "contact" => lines.extend(contact_lines(app, snap, &paint)),
        "experiences" => lines.extend(timeline_lines(app, &paint)),
        _ => lines.push(Line::styled(
            format!("  {}", section.key.href()),
            paint.fg(ThemeToken::MutedForeground),
        )),
    }

    lines.resize(usize::from(SECTION_ROWS), Line::default());
    lines
}

fn carousel_lines<'a>(app: &'a App, snap: &PageSnapshot, paint: &Paint) -> Vec<Line<'a>> {
    let certifications = app.page.certifications();
    let carousel = &snap.carousel;

    let mut shown: Vec<_> = carousel.placements.iter().filter(|p| p.is_shown()).collect();
    shown.sort_by_key(|p| p.offset);
    let mut cards = vec![Span::raw("  ")];
    for placement in shown {
        let title = &certifications[placement.index].title;
        let span = if placement.is_active {
            Span::styled(
                format!("▶ {title} ◀"),
                paint.fg(ThemeToken::ActiveBorder).add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(format!("[ {title} ]"), paint.fg(ThemeToken::MutedForeground))
        };
        cards.push(span);
        cards.push(Span::raw("  "));
    }

    let current = &certifications[carousel.current];
    let mut dots = vec![Span::raw("  ")];
    for i in 0..certifications.len() {
        let (glyph, token) = if i == carousel.current {
            ("● ", ThemeToken::CarouselDotActive)
        } else {
            ("○ ", ThemeToken::CarouselDot)
        };
        dots.push(Span::styled(glyph, paint.fg(token)));
    }

    let dot_label = carousel
        .dot_labels
        .get(carousel.current)
        .cloned()
        .unwrap_or_default();

    let indicator = if carousel.auto_playing {
        Span::styled("  Auto-sliding", paint.fg(ThemeToken::AutoPlayIndicator))
    } else {
        Span::styled("  Paused", paint.fg(ThemeToken::MutedForeground))
    };

    vec![
        Line::from(cards),
        Line::styled(
            format!("  {} · {}", current.issuer, current.date),
            paint.fg(ThemeToken::Foreground),
        ),
        Line::default(),
        Line::from(dots),
        Line::styled(format!("  {dot_label}"), paint.fg(ThemeToken::MutedForeground)),
        Line::from(indicator),
    ]
}

fn timeline_lines(app: &App, paint: &Paint) -> Vec<Line<'static>> {
    app.page
        .experiences()
        .iter()
        .flat_map(|exp| {
            [
                Line::styled(
                    format!("  ● {}", exp.role),
                    paint.fg(ThemeToken::Foreground).add_modifier(Modifier::BOLD),
                ),
                Line::styled(
                    format!("    {} · {}", exp.company, exp.period),
                    paint.fg(ThemeToken::MutedForeground),
                ),
            ]
        })
        .collect()
}

fn contact_lines(app: &App, snap: &PageSnapshot, paint: &Paint) -> Vec<Line<'static>> {
    let contact = &snap.contact;
    let mut lines: Vec<Line<'static>> = app
        .page
        .contact_channels()
        .iter()
        .map(|channel| {
            Line::from(vec![
                Span::styled(
                    format!("  {:<8}", channel.label),
                    paint.fg(ThemeToken::MutedForeground),
                ),
                Span::styled(format!(" {}", channel.value), paint.fg(ThemeToken::Primary)),
            ])
        })
        .collect();
    lines.push(Line::default());
    for field in Field::ALL {
        let focused = contact.focused == Some(field);
        let (token, cursor) = if focused {
            (ThemeToken::FieldFocusGlow, "▏")
        } else {
            (ThemeToken::Foreground, "")
        };
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<8}", field.label()), paint.fg(ThemeToken::MutedForeground)),
            Span::styled(
                format!(" {}{cursor} ", contact.fields.get(field)),
                paint.on(token, ThemeToken::FieldBackground),
            ),
        ]));
    }
    lines.push(Line::styled(
        format!("  {:>8} {}", "", contact.counter),
        paint.fg(ThemeToken::MutedForeground),
    ));
    lines.push(Line::default());

    let button = if contact.submitting {
        "[ Sending... ]"
    } else {
        "[ Send Message ]"
    };
    lines.push(Line::from(vec![
        Span::raw("  "),
        Span::styled(button, paint.on(ThemeToken::PrimaryForeground, ThemeToken::SubmitButton)),
    ]));
    lines
}
