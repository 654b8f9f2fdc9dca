//! Locating and moving the focused item inside a projection.
//!
//! Focus is tracked by item identity. Positions returned here are only valid
//! for the projection they were computed from and must be recomputed after
//! every rebuild.

use super::projection::{Card, Column, TableRow};

/// Column/row of a card on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoardPos {
    pub column: usize,
    pub row: usize,
}

// ---------------------------------------------------------------------------
// Board

pub fn locate_card(columns: &[Column], id: &str) -> Option<BoardPos> {
    columns.iter().enumerate().find_map(|(ci, col)| {
        col.cards
            .iter()
            .position(|c| c.id == id)
            .map(|row| BoardPos { column: ci, row })
    })
}

pub fn card_at(columns: &[Column], pos: BoardPos) -> Option<&Card> {
    columns.get(pos.column).and_then(|c| c.cards.get(pos.row))
}

/// First card of the first non-empty column
pub fn first_card(columns: &[Column]) -> Option<BoardPos> {
    columns
        .iter()
        .position(|c| !c.cards.is_empty())
        .map(|column| BoardPos { column, row: 0 })
}

/// Move within the board, clamping at the edges. Changing column keeps the
/// row, clamped to the new column's length.
pub fn move_board(columns: &[Column], pos: BoardPos, d_column: isize, d_row: isize) -> BoardPos {
    if columns.is_empty() {
        return BoardPos::default();
    }
    let column = clamp_step(pos.column, d_column, columns.len());
    let len = columns[column].cards.len();
    let row = if len == 0 {
        0
    } else {
        clamp_step(pos.row.min(len - 1), d_row, len)
    };
    BoardPos { column, row }
}

// ---------------------------------------------------------------------------
// Flat table

/// Step through a flat sequence of `len` rows, clamping at both ends
pub fn step_flat(len: usize, current: usize, delta: isize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(clamp_step(current.min(len - 1), delta, len))
}

// ---------------------------------------------------------------------------
// Grouped table

pub fn locate_row(rows: &[TableRow], id: &str) -> Option<usize> {
    rows.iter()
        .position(|r| r.item().is_some_and(|item| item.id == id))
}

pub fn first_item_row(rows: &[TableRow]) -> Option<usize> {
    rows.iter().position(|r| !r.is_header())
}

pub fn last_item_row(rows: &[TableRow]) -> Option<usize> {
    rows.iter().rposition(|r| !r.is_header())
}

/// Step through header + item rows treating the list as circular. Header
/// rows are skipped in the direction of travel, so focus never rests on one.
pub fn step_grouped(rows: &[TableRow], current: usize, delta: isize) -> Option<usize> {
    let n = rows.len();
    if n == 0 || first_item_row(rows).is_none() {
        return None;
    }
    if delta == 0 {
        return if rows.get(current).is_some_and(|r| !r.is_header()) {
            Some(current)
        } else {
            first_item_row(rows)
        };
    }

    let n_i = n as isize;
    let direction = delta.signum();
    let mut idx = (current.min(n - 1) as isize + delta).rem_euclid(n_i);
    for _ in 0..n {
        if !rows[idx as usize].is_header() {
            return Some(idx as usize);
        }
        idx = (idx + direction).rem_euclid(n_i);
    }
    None
}

fn clamp_step(current: usize, delta: isize, len: usize) -> usize {
    let target = current as isize + delta;
    target.clamp(0, len as isize - 1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GroupBy, Item};
    use crate::ops::projection::{board_columns, buckets, flatten};
    use pretty_assertions::assert_eq;

    fn items() -> Vec<Item> {
        let mut a = Item::new("a", "a", "Todo");
        a.assignees = vec!["amy".into()];
        let mut b = Item::new("b", "b", "Todo");
        b.assignees = vec!["bob".into()];
        let mut c = Item::new("c", "c", "Doing");
        c.assignees = vec!["bob".into()];
        vec![a, b, c]
    }

    #[test]
    fn locate_and_move_on_board() {
        let items = items();
        let refs: Vec<&Item> = items.iter().collect();
        let cols = board_columns(&refs, &["Todo", "Doing"]);
        let pos = locate_card(&cols, "b").unwrap();
        assert_eq!(pos, BoardPos { column: 0, row: 1 });

        // moving right clamps the row to the shorter column
        let right = move_board(&cols, pos, 1, 0);
        assert_eq!(right, BoardPos { column: 1, row: 0 });
        assert_eq!(card_at(&cols, right).unwrap().id, "c");

        // edges clamp
        assert_eq!(move_board(&cols, right, 1, 5), BoardPos { column: 1, row: 0 });
        assert_eq!(move_board(&cols, pos, -3, -3), BoardPos { column: 0, row: 0 });
    }

    #[test]
    fn flat_steps_clamp() {
        assert_eq!(step_flat(3, 2, 1), Some(2));
        assert_eq!(step_flat(3, 0, -1), Some(0));
        assert_eq!(step_flat(3, 9, 0), Some(2));
        assert_eq!(step_flat(0, 0, 1), None);
    }

    #[test]
    fn grouped_wraps_forward_to_first_item() {
        let items = items();
        let refs: Vec<&Item> = items.iter().collect();
        let groups = buckets(&refs, GroupBy::Assignee, &[]);
        let rows = flatten(&groups);
        // [amy] a [bob] b c
        let mut row = first_item_row(&rows).unwrap();
        let mut visited = Vec::new();
        for _ in 0..4 {
            row = step_grouped(&rows, row, 1).unwrap();
            assert!(!rows[row].is_header());
            visited.push(rows[row].item().unwrap().id.clone());
        }
        assert_eq!(visited, vec!["b", "c", "a", "b"]);
    }

    #[test]
    fn grouped_wraps_backward_to_last_item() {
        let items = items();
        let refs: Vec<&Item> = items.iter().collect();
        let groups = buckets(&refs, GroupBy::Assignee, &[]);
        let rows = flatten(&groups);
        let first = first_item_row(&rows).unwrap();
        let prev = step_grouped(&rows, first, -1).unwrap();
        assert_eq!(Some(prev), last_item_row(&rows));
        assert_eq!(rows[prev].item().unwrap().id, "c");
    }

    #[test]
    fn grouped_without_items() {
        let rows: Vec<TableRow> = Vec::new();
        assert_eq!(step_grouped(&rows, 0, 1), None);
    }

    #[test]
    fn locate_row_by_identity() {
        let items = items();
        let refs: Vec<&Item> = items.iter().collect();
        let groups = buckets(&refs, GroupBy::Status, &["Todo", "Doing"]);
        let rows = flatten(&groups);
        assert_eq!(locate_row(&rows, "c"), Some(4));
        assert_eq!(locate_row(&rows, "zzz"), None);
    }
}
