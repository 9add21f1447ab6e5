use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};

use crate::format;
use crate::model::account::Network;
use crate::state::AppState;

use super::theme::Theme;

pub struct WalletView<'a> {
    pub state: &'a AppState,
    pub theme: &'a Theme,
}

impl Widget for WalletView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let state = self.state;
        let theme = self.theme;

        let address = state
            .wallet
            .as_ref()
            .map(|w| w.active_address.clone())
            .unwrap_or_else(|| format::PLACEHOLDER.to_string());
        let network = state.wallet.as_ref().map(|w| w.network);

        let network_span = |target: Network| {
            let active = network == Some(target);
            let style = if active {
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                Style::default().fg(theme.hint)
            };
            Span::styled(format!(" {} ", target), style)
        };

        let mut lines = vec![
            Line::from(vec![
                Span::styled("Deposit address: ", Style::default().fg(theme.hint)),
                Span::styled(address, Style::default().fg(Color::White)),
            ]),
            Line::raw(""),
            Line::from(vec![
                Span::styled("Network: ", Style::default().fg(theme.hint)),
                network_span(Network::Testnet),
                Span::raw(" "),
                network_span(Network::Mainnet),
            ]),
        ];

        if network == Some(Network::Testnet) {
            lines.push(Line::raw(""));
            lines.push(Line::from(Span::styled(
                "Testnet faucet funds are available from the service",
                Style::default().fg(theme.hint),
            )));
        }
        if let Some(balance) = state.balance {
            if !balance.exists {
                lines.push(Line::raw(""));
                lines.push(Line::from(Span::styled(
                    "Deposit funds to start trading",
                    Style::default().fg(Color::Yellow),
                )));
            }
        }
        if state.network_busy {
            lines.push(Line::raw(""));
            lines.push(Line::from(Span::styled(
                "Switching network...",
                Style::default().fg(theme.hint),
            )));
        }

        let block = Block::default()
            .title(" Wallet ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.hint));
        Paragraph::new(lines).block(block).render(area, buf);
    }
}
