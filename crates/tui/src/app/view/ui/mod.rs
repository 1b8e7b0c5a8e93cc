mod constants;
mod modal;
mod panels;
mod status;
mod text;

use crate::app::AppState;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Text};
use ratatui::widgets::{Block, Clear, Paragraph};
use ratatui::Frame;

use self::constants::{HEADER_BG, HEADER_HEIGHT, LIST_PADDING_X, STATUS_HEIGHT};
use self::modal::render_confirm_layer;
use self::panels::{build_panel_render, build_records_panel_view};
use self::status::{build_header_line, build_status_line};

pub fn draw_ui(f: &mut Frame, app: &AppState) {
    let size = f.area();
    if size.width == 0 || size.height == 0 {
        return;
    }
    f.render_widget(Clear, size);

    let header_height = HEADER_HEIGHT.min(size.height);
    let status_height = STATUS_HEIGHT.min(size.height.saturating_sub(header_height));
    let list_height = size
        .height
        .saturating_sub(header_height + status_height);

    let header_area = Rect::new(size.x, size.y, size.width, header_height);
    if header_area.height > 0 {
        f.render_widget(Block::default().style(Style::default().bg(HEADER_BG)), header_area);
        let kind = app.screen.kind;
        let header = build_header_line(
            kind.label(),
            kind.previous().label(),
            kind.next().label(),
            size.width as usize,
        );
        f.render_widget(
            Paragraph::new(Text::from(vec![header])),
            Rect::new(size.x, size.y, size.width, 1),
        );
    }

    let list_area = Rect::new(
        size.x + LIST_PADDING_X.min(size.width),
        size.y + header_height,
        size.width.saturating_sub(LIST_PADDING_X * 2),
        list_height,
    );
    if list_area.height > 0 && list_area.width > 0 {
        let store = app.store.borrow();
        let records = store.list(app.screen.kind);
        let view = build_records_panel_view(&app.screen, records);
        let lines: Vec<Line> =
            build_panel_render(&view, list_area.height, list_area.width as usize);
        f.render_widget(Paragraph::new(Text::from(lines)), list_area);
    }

    let modal_open = app.confirm.has_pending();
    let status_area = Rect::new(
        size.x,
        size.y + header_height + list_height,
        size.width,
        status_height,
    );
    if status_area.height > 0 {
        let banner = app.notices.current();
        let line = build_status_line(banner.as_ref(), modal_open, size.width as usize);
        f.render_widget(Paragraph::new(Text::from(vec![line])), status_area);
    }

    if app.confirm.visible_count() > 0 {
        app.confirm
            .with(|broker| render_confirm_layer(f, size, broker));
    }
}
