use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};

use crate::calc;
use crate::format;
use crate::model::position::PositionSide;
use crate::state::AppState;

use super::theme::Theme;

pub struct PositionsView<'a> {
    pub state: &'a AppState,
    pub theme: &'a Theme,
}

impl Widget for PositionsView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let state = self.state;
        let theme = self.theme;

        let mut lines = Vec::new();
        if state.positions.is_empty() {
            lines.push(Line::from(Span::styled(
                "No open positions",
                Style::default().fg(theme.hint),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                format!(
                    "{:<12}{:<7}{:>10}{:>14}{:>14}{:>14}",
                    "Product", "Side", "Size", "Entry", "Current", "PnL"
                ),
                Style::default().fg(theme.hint),
            )));
            for (i, pos) in state.positions.iter().enumerate() {
                let base = pos.base_symbol();
                let quote = state.prices.get(base);
                let current = quote
                    .map(|q| format::format_price(q.mid, base))
                    .unwrap_or_else(|| format::PLACEHOLDER.to_string());
                // A missing quote renders as a placeholder, never as zero.
                let (pnl_str, pnl_color) = match calc::position_pnl(pos, &state.prices) {
                    Some(pnl) => {
                        let color = if pnl >= 0.0 { theme.long } else { theme.short };
                        (format::format_signed_usd(pnl), color)
                    }
                    None => (format::PLACEHOLDER.to_string(), theme.hint),
                };
                let side_color = match pos.side {
                    PositionSide::Long => theme.long,
                    PositionSide::Short => theme.short,
                };

                let row_style = if i == state.selected_position {
                    Style::default().add_modifier(Modifier::REVERSED)
                } else {
                    Style::default()
                };
                lines.push(
                    Line::from(vec![
                        Span::styled(
                            format!("{:<12}", pos.product_name),
                            Style::default().fg(Color::White),
                        ),
                        Span::styled(
                            format!("{:<7}", pos.side.to_string()),
                            Style::default().fg(side_color),
                        ),
                        Span::styled(
                            format!("{:>10}", format::format_size(pos.amount)),
                            Style::default().fg(Color::White),
                        ),
                        Span::styled(
                            format!("{:>14}", format::format_price(pos.entry_price, base)),
                            Style::default().fg(Color::White),
                        ),
                        Span::styled(format!("{:>14}", current), Style::default().fg(Color::White)),
                        Span::styled(format!("{:>14}", pnl_str), Style::default().fg(pnl_color)),
                    ])
                    .style(row_style),
                );
            }
        }
        if state.close_busy {
            lines.push(Line::raw(""));
            lines.push(Line::from(Span::styled(
                "Closing...",
                Style::default().fg(theme.hint),
            )));
        }

        let block = Block::default()
            .title(" Open Positions ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.hint));
        Paragraph::new(lines).block(block).render(area, buf);
    }
}
