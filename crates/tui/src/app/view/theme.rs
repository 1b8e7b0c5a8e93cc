use ratatui::style::Color;
use std::sync::OnceLock;

use crate::app::confirm::ConfirmKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct UiColors {
    pub(crate) warning: Color,
    pub(crate) danger: Color,
    pub(crate) info: Color,
    pub(crate) success: Color,
    pub(crate) modal_bg: Color,
    pub(crate) modal_fg: Color,
    pub(crate) button_fg: Color,
    pub(crate) tab_active_fg: Color,
    pub(crate) muted_fg: Color,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ThemeName {
    Impact,
    Ocean,
    Forest,
}

pub(crate) fn parse_theme_name(value: &str) -> Option<ThemeName> {
    match value.trim().to_ascii_lowercase().as_str() {
        "impact" | "default" => Some(ThemeName::Impact),
        "ocean" => Some(ThemeName::Ocean),
        "forest" => Some(ThemeName::Forest),
        _ => None,
    }
}

const fn colors_for(name: ThemeName) -> UiColors {
    match name {
        ThemeName::Impact => UiColors {
            warning: Color::Rgb(232, 178, 92),
            danger: Color::Rgb(220, 76, 70),
            info: Color::Rgb(110, 168, 254),
            success: Color::Rgb(92, 184, 92),
            modal_bg: Color::Rgb(32, 34, 38),
            modal_fg: Color::White,
            button_fg: Color::Black,
            tab_active_fg: Color::Rgb(248, 208, 120),
            muted_fg: Color::Gray,
        },
        ThemeName::Ocean => UiColors {
            warning: Color::Rgb(235, 203, 139),
            danger: Color::Rgb(191, 97, 106),
            info: Color::Rgb(124, 193, 255),
            success: Color::Rgb(163, 190, 140),
            modal_bg: Color::Rgb(36, 44, 52),
            modal_fg: Color::White,
            button_fg: Color::Black,
            tab_active_fg: Color::Rgb(169, 218, 255),
            muted_fg: Color::Gray,
        },
        ThemeName::Forest => UiColors {
            warning: Color::Rgb(222, 196, 120),
            danger: Color::Rgb(200, 107, 123),
            info: Color::Rgb(167, 206, 188),
            success: Color::Rgb(149, 208, 146),
            modal_bg: Color::Rgb(28, 38, 30),
            modal_fg: Color::White,
            button_fg: Color::Black,
            tab_active_fg: Color::Rgb(186, 230, 173),
            muted_fg: Color::Gray,
        },
    }
}

static UI_COLORS: OnceLock<UiColors> = OnceLock::new();

fn selected_theme_name_from_env() -> ThemeName {
    std::env::var("IMPACT_TUI_THEME")
        .ok()
        .as_deref()
        .and_then(parse_theme_name)
        .unwrap_or(ThemeName::Impact)
}

/// Palette resolved on first paint and reused for the life of the process.
pub(crate) fn ui_colors() -> UiColors {
    *UI_COLORS.get_or_init(|| colors_for(selected_theme_name_from_env()))
}

pub(crate) fn accent_for(colors: &UiColors, kind: ConfirmKind) -> Color {
    match kind {
        ConfirmKind::Warning => colors.warning,
        ConfirmKind::Danger => colors.danger,
        ConfirmKind::Info => colors.info,
        ConfirmKind::Success => colors.success,
    }
}
