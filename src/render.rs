//! Plain-text squad table.
//!
//! One column per squad with a `Squad N` header. Placeholders render as
//! blank cells and the leader's cell is prefixed with `*`.

use crate::models::TeamHistory;

const LEADER_MARK: char = '*';
const COLUMN_GAP: &str = "  ";

/// Renders stored squads as a text grid.
///
/// `leader_display_row` must match the row the history was generated with.
///
/// ```
/// use chrono::NaiveDate;
/// use u_squad::models::TeamHistory;
/// use u_squad::render::render_table;
///
/// let monday = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let h = TeamHistory::new(
///     "2024-01 week 1",
///     monday,
///     vec![vec![Some("Kim".into()), Some("Lee".into())]],
///     vec![1],
/// );
/// assert_eq!(render_table(&h, 1), "Squad 1\n*Kim\nLee\n");
/// ```
pub fn render_table(history: &TeamHistory, leader_display_row: usize) -> String {
    let columns: Vec<Vec<String>> = history
        .squad_matrix
        .iter()
        .map(|squad| {
            let leader_at = leader_display_row
                .saturating_sub(1)
                .min(squad.len().saturating_sub(1));
            squad
                .iter()
                .enumerate()
                .map(|(i, slot)| match slot {
                    Some(name) if i == leader_at => format!("{LEADER_MARK}{name}"),
                    Some(name) => name.clone(),
                    None => String::new(),
                })
                .collect()
        })
        .collect();

    let headers: Vec<String> = (1..=columns.len()).map(|n| format!("Squad {n}")).collect();
    let widths: Vec<usize> = columns
        .iter()
        .zip(&headers)
        .map(|(cells, header)| {
            cells
                .iter()
                .map(|c| c.chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();
    let height = columns.iter().map(Vec::len).max().unwrap_or(0);

    let mut out = String::new();
    push_line(&mut out, headers.iter().map(String::as_str), &widths);
    for row in 0..height {
        let cells = columns
            .iter()
            .map(|col| col.get(row).map_or("", String::as_str));
        push_line(&mut out, cells, &widths);
    }
    out
}

fn push_line<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line = cells
        .zip(widths)
        .map(|(cell, &width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect::<Vec<_>>()
        .join(COLUMN_GAP);
    out.push_str(line.trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn history(squads: Vec<Vec<Option<&str>>>) -> TeamHistory {
        let matrix: Vec<Vec<Option<String>>> = squads
            .into_iter()
            .map(|s| s.into_iter().map(|c| c.map(String::from)).collect())
            .collect();
        let leaders = (1..=matrix.len() as i64).collect();
        TeamHistory::new(
            "w",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            matrix,
            leaders,
        )
    }

    #[test]
    fn test_grid_with_placeholder() {
        let h = history(vec![
            vec![Some("Kim"), Some("Lee"), Some("Park")],
            vec![Some("Choi"), Some("Jung"), None],
        ]);
        let expected = "\
Squad 1  Squad 2
Kim      Choi
*Lee     *Jung
Park
";
        assert_eq!(render_table(&h, 2), expected);
    }

    #[test]
    fn test_leader_row_beyond_short_squad() {
        let h = history(vec![vec![Some("A")], vec![Some("B"), Some("C")]]);
        let out = render_table(&h, 3);
        assert_eq!(out, "Squad 1  Squad 2\n*A       B\n         *C\n");
    }

    #[test]
    fn test_wide_names_widen_column() {
        let h = history(vec![vec![Some("Alexandria")], vec![Some("Bo")]]);
        let first_line = render_table(&h, 1).lines().next().unwrap().to_string();
        assert_eq!(first_line, "Squad 1     Squad 2");
    }

    #[test]
    fn test_empty_history() {
        let h = history(vec![]);
        assert_eq!(render_table(&h, 3), "\n");
    }
}
