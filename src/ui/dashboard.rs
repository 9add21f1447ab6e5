use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};

use crate::format;
use crate::state::AppState;

use super::theme::Theme;

/// Positions shown inline on the dashboard before the "more" hint.
const SUMMARY_LIMIT: usize = 3;

pub struct DashboardView<'a> {
    pub state: &'a AppState,
    pub theme: &'a Theme,
}

impl Widget for DashboardView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(6),
                Constraint::Length(SUMMARY_LIMIT as u16 + 3),
            ])
            .split(area);

        render_balance(self.state, self.theme, rows[0], buf);
        render_price_grid(self.state, self.theme, rows[1], buf);
        render_position_summary(self.state, self.theme, rows[2], buf);
    }
}

fn render_balance(state: &AppState, theme: &Theme, area: Rect, buf: &mut Buffer) {
    let balance_str = match state.balance {
        Some(b) if b.exists => format::format_usd(b.usdt_balance),
        Some(_) => "$0.00".to_string(),
        None => format::PLACEHOLDER.to_string(),
    };
    let line = Line::from(vec![
        Span::styled("Balance: ", Style::default().fg(theme.hint)),
        Span::styled(
            balance_str,
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
    ]);
    let block = Block::default()
        .title(" Account ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.hint));
    Paragraph::new(line).block(block).render(area, buf);
}

fn render_price_grid(state: &AppState, theme: &Theme, area: Rect, buf: &mut Buffer) {
    let mut lines = Vec::with_capacity(state.catalog.len());
    for product in &state.catalog {
        let quote = state.prices.get(product);
        let mid = quote
            .map(|q| format::format_price(q.mid, product))
            .unwrap_or_else(|| format::PLACEHOLDER.to_string());
        let spread = quote
            .map(|q| format!("{:.4}", q.spread()))
            .unwrap_or_else(|| format::PLACEHOLDER.to_string());
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:<6}", format!("{}-PERP", product)),
                Style::default().fg(theme.accent),
            ),
            Span::styled(format!("  {:>14}", mid), Style::default().fg(Color::White)),
            Span::styled(
                format!("  spread {:>8}", spread),
                Style::default().fg(theme.hint),
            ),
        ]));
    }
    let block = Block::default()
        .title(" Markets ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.hint));
    Paragraph::new(lines).block(block).render(area, buf);
}

fn render_position_summary(state: &AppState, theme: &Theme, area: Rect, buf: &mut Buffer) {
    let mut lines = Vec::new();
    if state.positions.is_empty() {
        lines.push(Line::from(Span::styled(
            "No open positions",
            Style::default().fg(theme.hint),
        )));
    } else {
        for pos in state.positions.iter().take(SUMMARY_LIMIT) {
            let side_color = match pos.side {
                crate::model::position::PositionSide::Long => theme.long,
                crate::model::position::PositionSide::Short => theme.short,
            };
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{:<10}", pos.product_name),
                    Style::default().fg(Color::White),
                ),
                Span::styled(
                    format!(" {:<5}", pos.side.to_string()),
                    Style::default().fg(side_color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  size {:>10}", format::format_size(pos.amount)),
                    Style::default().fg(theme.hint),
                ),
                Span::styled(
                    format!(
                        "  entry {:>12}",
                        format::format_price(pos.entry_price, pos.base_symbol())
                    ),
                    Style::default().fg(theme.hint),
                ),
            ]));
        }
        if state.positions.len() > SUMMARY_LIMIT {
            lines.push(Line::from(Span::styled(
                format!("{} more position(s)", state.positions.len() - SUMMARY_LIMIT),
                Style::default().fg(theme.hint),
            )));
        }
    }
    let block = Block::default()
        .title(" Positions ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.hint));
    Paragraph::new(lines).block(block).render(area, buf);
}
