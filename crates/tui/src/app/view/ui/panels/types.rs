pub(in crate::app::view::ui) struct PanelView {
    pub(super) title: Option<String>,
    pub(super) lines: Vec<String>,
    pub(super) details: Vec<Option<String>>,
    pub(super) selected: Option<usize>,
    pub(super) empty_hint: &'static str,
}
