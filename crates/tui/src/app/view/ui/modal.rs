use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::app::confirm::{ConfirmBroker, ConfirmFocus, ConfirmRequest, ModalBindings};
use crate::app::util::text::wrap_line;
use crate::app::view::theme::{accent_for, ui_colors, UiColors};

use super::constants::{
    BUTTON_GAP, MODAL_CASCADE_X, MODAL_CASCADE_Y, MODAL_MAX_WIDTH, MODAL_MIN_HEIGHT,
    MODAL_MIN_WIDTH, MODAL_PADDING_X,
};
use super::text::{truncate_to_width, visual_width};

pub(super) struct ModalLayout {
    pub(super) outer: Rect,
    pub(super) body: Rect,
    pub(super) confirm_button: Rect,
    pub(super) cancel_button: Rect,
    pub(super) title: String,
    pub(super) lines: Vec<String>,
    pub(super) confirm_label: String,
    pub(super) cancel_label: String,
}

impl ModalLayout {
    pub(super) fn bindings(&self) -> ModalBindings {
        ModalBindings {
            content: self.outer,
            confirm_button: self.confirm_button,
            cancel_button: self.cancel_button,
        }
    }
}

fn button_text(label: &str, max_width: usize) -> String {
    truncate_to_width(&format!("[ {label} ]"), max_width)
}

/// Places one modal inside `area`. Later modals cascade down and right so the
/// one underneath stays recognisable. `None` when the screen is too small.
pub(super) fn compute_modal_layout(
    area: Rect,
    request: &ConfirmRequest,
    depth: usize,
) -> Option<ModalLayout> {
    if area.width < MODAL_MIN_WIDTH || area.height < MODAL_MIN_HEIGHT {
        return None;
    }
    let width = area
        .width
        .saturating_sub(4)
        .clamp(MODAL_MIN_WIDTH, MODAL_MAX_WIDTH);
    let inner_width = width.saturating_sub(2 + MODAL_PADDING_X * 2);
    let content_width = inner_width as usize;

    let mut lines = Vec::new();
    for line in request.message.lines() {
        if line.trim().is_empty() {
            lines.push(String::new());
        } else {
            lines.extend(wrap_line(line, content_width));
        }
    }
    // borders, spacer row, button row
    let max_lines = area.height.saturating_sub(4) as usize;
    if lines.len() > max_lines {
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            *last = truncate_to_width(&format!("{last}..."), content_width);
        }
    }
    let height = lines.len() as u16 + 4;

    let depth = u16::try_from(depth).unwrap_or(u16::MAX);
    let max_x = area.x + area.width - width;
    let max_y = area.y + area.height - height;
    let x = (area.x + (area.width - width) / 2)
        .saturating_add(depth.saturating_mul(MODAL_CASCADE_X))
        .min(max_x);
    let y = (area.y + (area.height - height) / 2)
        .saturating_add(depth.saturating_mul(MODAL_CASCADE_Y))
        .min(max_y);
    let outer = Rect::new(x, y, width, height);
    let body = Rect::new(
        x + 1 + MODAL_PADDING_X,
        y + 1,
        inner_width,
        lines.len() as u16,
    );

    let max_button = content_width.saturating_sub(BUTTON_GAP as usize) / 2;
    let confirm_label = button_text(&request.confirm_label, max_button);
    let cancel_label = button_text(&request.cancel_label, max_button);
    let confirm_width = visual_width(&confirm_label) as u16;
    let cancel_width = visual_width(&cancel_label) as u16;
    let button_row = y + height - 2;
    let confirm_x = x + width - 1 - MODAL_PADDING_X - confirm_width;
    let cancel_x = confirm_x.saturating_sub(BUTTON_GAP + cancel_width);

    let title_room = (width as usize).saturating_sub(6);
    let title = format!(
        " {} {} ",
        request.kind.icon(),
        truncate_to_width(&request.title, title_room)
    );

    Some(ModalLayout {
        outer,
        body,
        confirm_button: Rect::new(confirm_x, button_row, confirm_width, 1),
        cancel_button: Rect::new(cancel_x, button_row, cancel_width, 1),
        title,
        lines,
        confirm_label,
        cancel_label,
    })
}

fn button_style(base: Style, colors: &UiColors, color: Color, focused: bool) -> Style {
    if focused {
        base.fg(colors.button_fg).bg(color).add_modifier(Modifier::BOLD)
    } else {
        base.fg(color)
    }
}

fn render_modal(f: &mut Frame, layout: &ModalLayout, request: &ConfirmRequest, colors: &UiColors) {
    let accent = accent_for(colors, request.kind);
    let mut base = Style::default().fg(colors.modal_fg).bg(colors.modal_bg);
    if request.is_closing() {
        base = base.add_modifier(Modifier::DIM);
    }

    f.render_widget(Clear, layout.outer);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(base.fg(accent))
        .title(Line::from(Span::styled(
            layout.title.clone(),
            base.fg(accent).add_modifier(Modifier::BOLD),
        )))
        .style(base);
    f.render_widget(block, layout.outer);

    let lines: Vec<Line> = layout
        .lines
        .iter()
        .map(|line| Line::from(line.clone()))
        .collect();
    f.render_widget(Paragraph::new(Text::from(lines)).style(base), layout.body);

    let focus = request.is_pending().then_some(request.focus);
    f.render_widget(
        Paragraph::new(layout.cancel_label.clone()).style(button_style(
            base,
            colors,
            colors.muted_fg,
            focus == Some(ConfirmFocus::Cancel),
        )),
        layout.cancel_button,
    );
    f.render_widget(
        Paragraph::new(layout.confirm_label.clone()).style(button_style(
            base,
            colors,
            accent,
            focus == Some(ConfirmFocus::Confirm),
        )),
        layout.confirm_button,
    );
}

/// Paints every open confirmation over a dimmed screen and hands the fresh
/// click regions of pending ones back to the broker.
pub(crate) fn render_confirm_layer(f: &mut Frame, area: Rect, broker: &mut ConfirmBroker) {
    if broker.visible_count() == 0 {
        return;
    }
    f.buffer_mut()
        .set_style(area, Style::default().add_modifier(Modifier::DIM));

    let colors = ui_colors();
    let mut bindings = Vec::new();
    for (depth, request) in broker.visible().enumerate() {
        let Some(layout) = compute_modal_layout(area, request, depth) else {
            continue;
        };
        render_modal(f, &layout, request, &colors);
        if request.is_pending() {
            bindings.push((request.id, layout.bindings()));
        }
    }
    for (id, modal_bindings) in bindings {
        broker.attach_bindings(id, modal_bindings);
    }
}
