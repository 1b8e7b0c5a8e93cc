mod records;
mod render;
mod types;

pub(super) use records::build_records_panel_view;
pub(super) use render::build_panel_render;
