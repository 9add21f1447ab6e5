pub mod dashboard;
pub mod positions;
pub mod theme;
pub mod trade;
pub mod wallet;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget};
use ratatui::Frame;

use crate::event::NoticeKind;
use crate::format;
use crate::state::{AppState, Tab};

use dashboard::DashboardView;
use positions::PositionsView;
use theme::Theme;
use trade::TradeView;
use wallet::WalletView;

/// Project the state store onto the active tab. Only the visible tab's
/// widgets read the snapshot; data refreshed for another tab sits in the
/// store until that tab is shown again.
pub fn render(frame: &mut Frame, state: &AppState, theme: &Theme) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Length(1), // tab bar
            Constraint::Min(8),    // active tab
            Constraint::Length(1), // notice
            Constraint::Length(1), // keybinds
        ])
        .split(frame.area());

    frame.render_widget(StatusBar { state, theme }, outer[0]);
    frame.render_widget(TabBar { state, theme }, outer[1]);

    match state.active_tab {
        Tab::Dashboard => frame.render_widget(DashboardView { state, theme }, outer[2]),
        Tab::Trade => frame.render_widget(TradeView { state, theme }, outer[2]),
        Tab::Positions => frame.render_widget(PositionsView { state, theme }, outer[2]),
        Tab::Wallet => frame.render_widget(WalletView { state, theme }, outer[2]),
    }

    frame.render_widget(NoticeBar { state, theme }, outer[3]);
    frame.render_widget(
        KeybindBar {
            tab: state.active_tab,
            theme,
        },
        outer[4],
    );

    if let Some(phrase) = &state.recovery_phrase {
        render_recovery_overlay(frame, phrase, theme);
    }
}

struct StatusBar<'a> {
    state: &'a AppState,
    theme: &'a Theme,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let network = self
            .state
            .identity
            .as_ref()
            .map(|id| id.network.to_string())
            .unwrap_or_else(|| "...".to_string());
        let network_color = match self.state.identity.as_ref().map(|id| id.network) {
            Some(crate::model::account::Network::Mainnet) => self.theme.long,
            _ => Color::Yellow,
        };
        let balance = self
            .state
            .balance
            .map(|b| {
                if b.exists {
                    format::format_usd(b.usdt_balance)
                } else {
                    "$0.00".to_string()
                }
            })
            .unwrap_or_else(|| format::PLACEHOLDER.to_string());

        let line = Line::from(vec![
            Span::styled(
                " nado-terminal ",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("| ", Style::default().fg(self.theme.hint)),
            Span::styled(network, Style::default().fg(network_color)),
            Span::styled(" | ", Style::default().fg(self.theme.hint)),
            Span::styled(balance, Style::default().fg(Color::White)),
        ]);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}

struct TabBar<'a> {
    state: &'a AppState,
    theme: &'a Theme,
}

impl Widget for TabBar<'_> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let mut spans = Vec::with_capacity(Tab::ALL.len() * 2 + 1);
        spans.push(Span::raw(" "));
        for tab in Tab::ALL {
            let style = if tab == self.state.active_tab {
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                Style::default().fg(self.theme.hint)
            };
            spans.push(Span::styled(tab.label(), style));
            spans.push(Span::raw("  "));
        }
        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}

struct NoticeBar<'a> {
    state: &'a AppState,
    theme: &'a Theme,
}

impl Widget for NoticeBar<'_> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let Some(notice) = self.state.notice() else {
            return;
        };
        let color = match notice.kind {
            NoticeKind::Info => self.theme.accent,
            NoticeKind::Success => self.theme.long,
            NoticeKind::Error => self.theme.short,
        };
        let line = Line::from(Span::styled(
            format!(" {}", notice.text),
            Style::default().fg(color),
        ));
        buf.set_line(area.x, area.y, &line, area.width);
    }
}

struct KeybindBar<'a> {
    tab: Tab,
    theme: &'a Theme,
}

impl Widget for KeybindBar<'_> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let binds: &[(&str, &str)] = match self.tab {
            Tab::Dashboard => &[("1-4", "tabs"), ("q", "quit")],
            Tab::Trade => &[
                ("\u{2190}\u{2192}", "product"),
                ("l/s", "side"),
                ("\u{2191}\u{2193}", "leverage"),
                ("+/-", "size"),
                ("i", "type size"),
                ("Enter", "submit"),
            ],
            Tab::Positions => &[
                ("\u{2191}\u{2193}", "select"),
                ("c", "close"),
                ("a", "close all"),
            ],
            Tab::Wallet => &[("n", "switch network")],
        };
        let mut spans = Vec::with_capacity(binds.len() * 2);
        for (key, label) in binds {
            spans.push(Span::styled(
                format!(" [{}]", key),
                Style::default().fg(Color::Yellow),
            ));
            spans.push(Span::styled(
                format!(" {} ", label),
                Style::default().fg(self.theme.hint),
            ));
        }
        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}

/// One-time recovery phrase modal. Shown only for freshly provisioned
/// accounts; dismissal discards the phrase for good.
fn render_recovery_overlay(frame: &mut Frame, phrase: &str, theme: &Theme) {
    let area = centered_rect(frame.area(), 60, 40);
    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(Span::styled(
            "Write down your recovery phrase",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )),
        Line::raw(""),
    ];
    for (i, word) in phrase.split_whitespace().enumerate() {
        lines.push(Line::from(vec![
            Span::styled(format!("{:>2}. ", i + 1), Style::default().fg(theme.hint)),
            Span::styled(word.to_string(), Style::default().fg(Color::White)),
        ]));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "This is shown once and never stored. [Enter] to dismiss",
        Style::default().fg(theme.short),
    )));

    let block = Block::default()
        .title(" Recovery Phrase ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn centered_rect(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}
