use crate::app::state::{Record, RecordsScreen};

use super::types::PanelView;

pub(in crate::app::view::ui) fn build_records_panel_view(
    screen: &RecordsScreen,
    records: &[Record],
) -> PanelView {
    PanelView {
        title: Some(format!("{} ({})", screen.kind.label(), records.len())),
        lines: records
            .iter()
            .map(|record| format!("#{}  {}", record.id, record.label))
            .collect(),
        details: records.iter().map(|record| record.detail.clone()).collect(),
        selected: (!records.is_empty()).then(|| screen.selected.min(records.len() - 1)),
        empty_hint: "No records",
    }
}
