use crossterm::event::KeyCode;

use crate::state::Tab;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    SwitchTab(Tab),
    NextTab,
    ProductPrev,
    ProductNext,
    DirectionLong,
    DirectionShort,
    LeverageUp,
    LeverageDown,
    SizeStepUp,
    SizeStepDown,
    EditSize,
    SubmitTrade,
    PositionUp,
    PositionDown,
    CloseSelected,
    CloseAll,
    ToggleNetwork,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeEditCommand {
    Digit(char),
    Dot,
    Backspace,
    Done,
}

pub fn parse_main_command(key_code: &KeyCode, active_tab: Tab) -> Option<UiCommand> {
    match key_code {
        KeyCode::Tab => Some(UiCommand::NextTab),
        KeyCode::Char('1') => Some(UiCommand::SwitchTab(Tab::Dashboard)),
        KeyCode::Char('2') => Some(UiCommand::SwitchTab(Tab::Trade)),
        KeyCode::Char('3') => Some(UiCommand::SwitchTab(Tab::Positions)),
        KeyCode::Char('4') => Some(UiCommand::SwitchTab(Tab::Wallet)),
        KeyCode::Left if active_tab == Tab::Trade => Some(UiCommand::ProductPrev),
        KeyCode::Right if active_tab == Tab::Trade => Some(UiCommand::ProductNext),
        KeyCode::Up if active_tab == Tab::Trade => Some(UiCommand::LeverageUp),
        KeyCode::Down if active_tab == Tab::Trade => Some(UiCommand::LeverageDown),
        KeyCode::Up if active_tab == Tab::Positions => Some(UiCommand::PositionUp),
        KeyCode::Down if active_tab == Tab::Positions => Some(UiCommand::PositionDown),
        KeyCode::Enter if active_tab == Tab::Trade => Some(UiCommand::SubmitTrade),
        KeyCode::Char('+') | KeyCode::Char('=') if active_tab == Tab::Trade => {
            Some(UiCommand::SizeStepUp)
        }
        KeyCode::Char('-') if active_tab == Tab::Trade => Some(UiCommand::SizeStepDown),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'd' => Some(UiCommand::SwitchTab(Tab::Dashboard)),
            't' => Some(UiCommand::SwitchTab(Tab::Trade)),
            'p' => Some(UiCommand::SwitchTab(Tab::Positions)),
            'w' => Some(UiCommand::SwitchTab(Tab::Wallet)),
            'l' if active_tab == Tab::Trade => Some(UiCommand::DirectionLong),
            's' if active_tab == Tab::Trade => Some(UiCommand::DirectionShort),
            'i' if active_tab == Tab::Trade => Some(UiCommand::EditSize),
            'c' if active_tab == Tab::Positions => Some(UiCommand::CloseSelected),
            'a' if active_tab == Tab::Positions => Some(UiCommand::CloseAll),
            'n' if active_tab == Tab::Wallet => Some(UiCommand::ToggleNetwork),
            _ => None,
        },
        _ => None,
    }
}

/// Key mapping while the size field is in edit mode; everything else on the
/// trade tab is suspended until the edit finishes.
pub fn parse_size_edit_command(key_code: &KeyCode) -> Option<SizeEditCommand> {
    match key_code {
        KeyCode::Char(c) if c.is_ascii_digit() => Some(SizeEditCommand::Digit(*c)),
        KeyCode::Char('.') => Some(SizeEditCommand::Dot),
        KeyCode::Backspace => Some(SizeEditCommand::Backspace),
        KeyCode::Enter | KeyCode::Esc => Some(SizeEditCommand::Done),
        _ => None,
    }
}
