use ratatui::style::Color;

pub(super) const HEADER_HEIGHT: u16 = 2;
pub(super) const STATUS_HEIGHT: u16 = 1;
pub(super) const LIST_PADDING_X: u16 = 2;
pub(super) const HEADER_BG: Color = Color::Rgb(40, 40, 40);

pub(super) const MODAL_MAX_WIDTH: u16 = 60;
pub(super) const MODAL_MIN_WIDTH: u16 = 24;
pub(super) const MODAL_MIN_HEIGHT: u16 = 5;
pub(super) const MODAL_PADDING_X: u16 = 1;
pub(super) const MODAL_CASCADE_X: u16 = 2;
pub(super) const MODAL_CASCADE_Y: u16 = 1;
pub(super) const BUTTON_GAP: u16 = 2;
