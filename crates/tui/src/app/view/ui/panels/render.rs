use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::app::view::theme::ui_colors;

use super::super::text::{truncate_to_width, visual_width};
use super::types::PanelView;

/// Turns a panel into at most `max_lines` rows, scrolled so the selected row
/// stays visible.
pub(in crate::app::view::ui) fn build_panel_render(
    panel: &PanelView,
    max_lines: u16,
    max_width: usize,
) -> Vec<Line<'static>> {
    if max_lines == 0 {
        return Vec::new();
    }
    let colors = ui_colors();
    let mut out = Vec::new();
    let mut remaining = max_lines as usize;
    if let Some(title) = panel.title.as_ref() {
        out.push(Line::from(Span::styled(
            truncate_to_width(title, max_width),
            Style::default().add_modifier(Modifier::DIM),
        )));
        remaining -= 1;
    }

    if remaining == 0 {
        return out;
    }
    if panel.lines.is_empty() {
        out.push(Line::from(Span::styled(
            format!("  {}", panel.empty_hint),
            Style::default().fg(colors.muted_fg),
        )));
        return out;
    }

    let total = panel.lines.len();
    let visible = usize::min(total, remaining);
    let selected = panel.selected.unwrap_or(0).min(total - 1);
    let start = if selected >= visible {
        selected + 1 - visible
    } else {
        0
    };
    let content_width = max_width.saturating_sub(2).max(1);

    for index in start..start + visible {
        let is_selected = panel.selected == Some(index);
        let marker = if is_selected { "> " } else { "  " };
        let label = truncate_to_width(&panel.lines[index], content_width);
        let mut style = Style::default();
        if is_selected {
            style = style.add_modifier(Modifier::BOLD);
        }
        let mut spans = vec![Span::styled(format!("{marker}{label}"), style)];

        let used = visual_width(&label);
        let room = content_width.saturating_sub(used + 3);
        if let Some(detail) = panel.details.get(index).and_then(Option::as_ref) {
            if room > 0 {
                spans.push(Span::styled(
                    format!(" · {}", truncate_to_width(detail, room)),
                    Style::default().fg(colors.muted_fg),
                ));
            }
        }
        out.push(Line::from(spans));
    }
    out
}
