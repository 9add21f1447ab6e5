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

pub struct TradeView<'a> {
    pub state: &'a AppState,
    pub theme: &'a Theme,
}

impl Widget for TradeView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let state = self.state;
        let theme = self.theme;
        let selection = &state.selection;

        // Margin and the ticket price always read the latest quote
        // snapshot, never a value captured earlier.
        let quote = state.prices.get(&selection.product);
        let mid = quote.map(|q| q.mid).unwrap_or(0.0);
        let size: f64 = selection.size_input.parse().unwrap_or(0.0);
        let margin = calc::estimated_margin(size, mid, selection.leverage);

        let price_str = quote
            .map(|q| format::format_price(q.mid, &selection.product))
            .unwrap_or_else(|| format::PLACEHOLDER.to_string());

        let direction_color = match selection.direction {
            PositionSide::Long => theme.long,
            PositionSide::Short => theme.short,
        };
        let submit_label = match selection.direction {
            PositionSide::Long => "Open Long",
            PositionSide::Short => "Open Short",
        };

        let size_style = if selection.editing_size {
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::White)
        };

        let lines = vec![
            Line::from(vec![
                Span::styled("Product:  ", Style::default().fg(theme.hint)),
                Span::styled(
                    format!("< {}-PERP >", selection.product),
                    Style::default()
                        .fg(theme.accent)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("Price:    ", Style::default().fg(theme.hint)),
                Span::styled(price_str, Style::default().fg(Color::White)),
            ]),
            Line::from(vec![
                Span::styled("Side:     ", Style::default().fg(theme.hint)),
                Span::styled(
                    selection.direction.to_string(),
                    Style::default()
                        .fg(direction_color)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("Leverage: ", Style::default().fg(theme.hint)),
                Span::styled(
                    format!("{}x", selection.leverage),
                    Style::default().fg(Color::White),
                ),
            ]),
            Line::from(vec![
                Span::styled("Size:     ", Style::default().fg(theme.hint)),
                Span::styled(selection.size_input.clone(), size_style),
                Span::styled(
                    if selection.editing_size {
                        "  (typing)"
                    } else {
                        ""
                    },
                    Style::default().fg(theme.hint),
                ),
            ]),
            Line::from(vec![
                Span::styled("Est. margin: ", Style::default().fg(theme.hint)),
                Span::styled(
                    format::format_usd(margin),
                    Style::default().fg(Color::White),
                ),
            ]),
            Line::raw(""),
            Line::from(if state.trade_guard.is_idle() {
                Span::styled(
                    format!("[Enter] {}", submit_label),
                    Style::default()
                        .fg(direction_color)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                Span::styled("Submitting...", Style::default().fg(theme.hint))
            }),
        ];

        let block = Block::default()
            .title(" Trade ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.hint));
        Paragraph::new(lines).block(block).render(area, buf);
    }
}
