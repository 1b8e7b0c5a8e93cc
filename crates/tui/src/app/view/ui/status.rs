use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::app::state::{Banner, BannerTone};
use crate::app::view::theme::ui_colors;

use super::text::truncate_to_width;

pub(super) fn build_status_line(
    banner: Option<&Banner>,
    modal_open: bool,
    width: usize,
) -> Line<'static> {
    let colors = ui_colors();
    if let Some(banner) = banner {
        let style = match banner.tone {
            BannerTone::Info => Style::default().fg(colors.info),
            BannerTone::Success => Style::default().fg(colors.success),
            BannerTone::Warning => Style::default().fg(colors.warning),
            BannerTone::Error => Style::default()
                .fg(colors.danger)
                .add_modifier(Modifier::BOLD),
        };
        return Line::from(Span::styled(truncate_to_width(&banner.text, width), style));
    }

    let segments: &[&str] = if modal_open {
        &[
            "Enter choose",
            "Tab switch",
            "y confirm",
            "n cancel",
            "Esc dismiss",
        ]
    } else {
        &["↑/↓ select", "←/→ entity", "d delete", "r reload", "q quit"]
    };
    Line::from(Span::styled(
        truncate_to_width(&segments.join("  •  "), width),
        Style::default().add_modifier(Modifier::DIM),
    ))
}

pub(super) fn build_header_line(
    current: &str,
    previous: &str,
    next: &str,
    width: usize,
) -> Line<'static> {
    let colors = ui_colors();
    let spans = vec![
        Span::styled("Impact Auto  ", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(format!("‹ {previous}  "), Style::default().fg(colors.muted_fg)),
        Span::styled(
            current.to_string(),
            Style::default()
                .fg(colors.tab_active_fg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("  {next} ›"), Style::default().fg(colors.muted_fg)),
    ];
    let line = Line::from(spans);
    if line.width() <= width {
        return line;
    }
    Line::from(Span::styled(
        truncate_to_width(&format!("Impact Auto  {current}"), width),
        Style::default().add_modifier(Modifier::BOLD),
    ))
}
