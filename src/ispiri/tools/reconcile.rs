use tracing::{debug, warn};

use crate::ispiri::tools::config::StandardizeConfig;
use crate::ispiri::tools::model::{Cell, Sheet};
use crate::ispiri::tools::schema::HeaderSchema;

/// Result of reconciling one target sheet against its base counterpart.
#[derive(Debug, Clone, PartialEq)]
pub enum ReconcileOutcome {
    /// The sheet was rebuilt in the base layout.
    Reconciled { sheet: Sheet, unmatched: usize },
    /// One of the sheets has no header row; the target is returned as is.
    TooShort { sheet: Sheet },
}

impl ReconcileOutcome {
    pub fn into_sheet(self) -> Sheet {
        match self {
            ReconcileOutcome::Reconciled { sheet, .. } | ReconcileOutcome::TooShort { sheet } => {
                sheet
            }
        }
    }

    pub fn sheet(&self) -> &Sheet {
        match self {
            ReconcileOutcome::Reconciled { sheet, .. } | ReconcileOutcome::TooShort { sheet } => {
                sheet
            }
        }
    }
}

/// Rebuilds `target` so that its columns follow the header row of `base`.
///
/// Rows above the header row are copied from the target and padded or cut to
/// the base width. The header row is taken verbatim from the base. Every row
/// below it is remapped by exact header label; columns whose label the target
/// lacks come out empty.
pub fn reconcile_sheet(
    base: &Sheet,
    target: &Sheet,
    config: &StandardizeConfig,
) -> ReconcileOutcome {
    let header_row = config.header_row;
    let (Some(base_header), Some(target_header)) = (base.row(header_row), target.row(header_row))
    else {
        warn!(
            sheet = %target.name,
            base_rows = base.height(),
            target_rows = target.height(),
            "not enough rows to standardize; skipping sheet"
        );
        return ReconcileOutcome::TooShort {
            sheet: target.clone(),
        };
    };

    let mut base_schema = HeaderSchema::from_row(base_header);
    let mut target_schema = HeaderSchema::from_row(target_header);
    if config.strip_label_suffixes {
        base_schema = base_schema.without_suffixes();
        target_schema = target_schema.without_suffixes();
    }
    let mapping = base_schema.map_onto(&target_schema, config.duplicate_labels);
    let width = mapping.width();

    let mut rows = Vec::with_capacity(target.height());
    for row in &target.rows[..header_row] {
        let mut row = row.clone();
        row.resize(width, Cell::Empty);
        rows.push(row);
    }
    rows.push(base_header.to_vec());
    rows.extend(
        target.rows[header_row + 1..]
            .iter()
            .map(|row| mapping.project(row)),
    );

    debug!(
        sheet = %target.name,
        columns = width,
        unmatched = mapping.unmatched(),
        data_rows = target.height() - header_row - 1,
        "sheet reconciled"
    );

    ReconcileOutcome::Reconciled {
        sheet: Sheet::new(target.name.clone(), base.columns.clone(), rows),
        unmatched: mapping.unmatched(),
    }
}

/// Replaces the structural column labels with `title` followed by blanks.
///
/// Cell contents are left untouched; a sheet without columns is returned as is.
pub fn overwrite_title(mut sheet: Sheet, title: &str) -> Sheet {
    if sheet.width() == 0 {
        return sheet;
    }
    for (position, label) in sheet.columns.iter_mut().enumerate() {
        *label = if position == 0 {
            title.to_string()
        } else {
            String::new()
        };
    }
    sheet
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ispiri::tools::config::DuplicateLabelPolicy;

    fn text_row(values: &[&str]) -> Vec<Cell> {
        values.iter().map(|value| Cell::from(*value)).collect()
    }

    /// Builds a sheet with `meta` metadata rows, then `header`, then `data`.
    fn report(name: &str, meta: Vec<Vec<Cell>>, header: &[&str], data: &[&[&str]]) -> Sheet {
        let mut rows = meta;
        rows.push(text_row(header));
        rows.extend(data.iter().map(|row| text_row(row)));
        Sheet::new(name, vec!["Report".into()], rows)
    }

    fn metadata(width: usize) -> Vec<Vec<Cell>> {
        (0..9)
            .map(|row| {
                (0..width)
                    .map(|col| Cell::Text(format!("m{row}{col}")))
                    .collect()
            })
            .collect()
    }

    #[test]
    fn remaps_data_rows_by_header_label() {
        let base = report("Data", metadata(3), &["Date", "Name", "Status"], &[]);
        let target = report(
            "Data",
            metadata(2),
            &["Name", "Date"],
            &[&["Alice", "2024-01-01"]],
        );

        let outcome = reconcile_sheet(&base, &target, &StandardizeConfig::default());
        let ReconcileOutcome::Reconciled { sheet, unmatched } = outcome else {
            panic!("expected the sheet to be reconciled");
        };

        assert_eq!(unmatched, 1);
        assert_eq!(sheet.rows[9], text_row(&["Date", "Name", "Status"]));
        assert_eq!(sheet.rows[10], text_row(&["2024-01-01", "Alice", ""]));
        assert_eq!(sheet.height(), 11);
    }

    #[test]
    fn metadata_rows_take_base_width() {
        let base = report("Data", metadata(2), &["A", "B"], &[]);
        let wide = report("Data", metadata(5), &["A", "B", "C", "D", "E"], &[]);
        let narrow = report("Data", metadata(1), &["A"], &[]);

        for target in [wide, narrow] {
            let sheet = reconcile_sheet(&base, &target, &StandardizeConfig::default()).into_sheet();
            for (index, row) in sheet.rows[..9].iter().enumerate() {
                assert_eq!(row.len(), 2);
                assert_eq!(row[0], target.rows[index][0]);
            }
            assert_eq!(sheet.width(), 2);
        }
    }

    #[test]
    fn zero_data_rows_emit_only_metadata_and_header() {
        let base = report("Data", metadata(1), &["A"], &[&["base data"]]);
        let target = report("Data", metadata(1), &["A"], &[]);

        let sheet = reconcile_sheet(&base, &target, &StandardizeConfig::default()).into_sheet();
        assert_eq!(sheet.height(), 10);
    }

    #[test]
    fn short_sheets_are_returned_unmodified() {
        let base = report("Data", metadata(1), &["A"], &[]);
        let short = Sheet::new("Data", vec!["x".into()], vec![text_row(&["only"]); 9]);

        let outcome = reconcile_sheet(&base, &short, &StandardizeConfig::default());
        assert_eq!(outcome, ReconcileOutcome::TooShort { sheet: short.clone() });

        let outcome = reconcile_sheet(&short, &base, &StandardizeConfig::default());
        assert_eq!(outcome.sheet(), &base);
    }

    #[test]
    fn fully_covered_schema_keeps_every_cell() {
        let base = report("Data", metadata(3), &["C", "A", "B"], &[]);
        let target = report(
            "Data",
            metadata(3),
            &["A", "B", "C"],
            &[&["a1", "b1", "c1"], &["a2", "b2", "c2"]],
        );

        let sheet = reconcile_sheet(&base, &target, &StandardizeConfig::default()).into_sheet();
        assert_eq!(sheet.rows[10], text_row(&["c1", "a1", "b1"]));
        assert_eq!(sheet.rows[11], text_row(&["c2", "a2", "b2"]));
    }

    #[test]
    fn reconciling_twice_is_stable() {
        let base = report("Data", metadata(3), &["Date", "Name", "Status"], &[]);
        let target = report(
            "Data",
            metadata(4),
            &["Status", "Extra", "Name"],
            &[&["open", "x", "Bob"]],
        );
        let config = StandardizeConfig::default();

        let once = reconcile_sheet(&base, &target, &config).into_sheet();
        let twice = reconcile_sheet(&base, &once, &config).into_sheet();
        assert_eq!(once, twice);
    }

    #[test]
    fn custom_header_row_and_suffix_stripping() {
        let config = StandardizeConfig {
            header_row: 1,
            strip_label_suffixes: true,
            duplicate_labels: DuplicateLabelPolicy::Last,
            ..StandardizeConfig::default()
        };
        let base = Sheet::new(
            "Data",
            vec![],
            vec![text_row(&["meta"]), text_row(&["Owner", "Owner.1"])],
        );
        let target = Sheet::new(
            "Data",
            vec![],
            vec![
                text_row(&["meta", "more"]),
                text_row(&["Owner.1", "Owner.2"]),
                text_row(&["first", "second"]),
            ],
        );

        let sheet = reconcile_sheet(&base, &target, &config).into_sheet();
        assert_eq!(sheet.rows[1], text_row(&["Owner", "Owner.1"]));
        assert_eq!(sheet.rows[2], text_row(&["second", "second"]));
    }

    #[test]
    fn title_overwrite_replaces_labels_only() {
        let sheet = Sheet::new(
            "Summary",
            vec!["a".into(), "b".into(), "c".into()],
            vec![text_row(&["1", "2", "3"])],
        );

        let titled = overwrite_title(sheet.clone(), "Report");
        assert_eq!(titled.columns, vec!["Report", "", ""]);
        assert_eq!(titled.rows, sheet.rows);
        assert_eq!(overwrite_title(titled.clone(), "Report"), titled);

        let empty = Sheet::new("Empty", vec![], vec![]);
        assert_eq!(overwrite_title(empty.clone(), "Report"), empty);
    }
}
