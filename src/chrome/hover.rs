use std::collections::BTreeSet;

pub const DELETE_TRIGGER_CLASS: &str = "killer";
pub const MARKED_ROW_CLASS: &str = "borrar";

/// Element under the pointer: its classes and the list row enclosing it.
#[derive(Clone, Copy, Debug)]
pub struct HoverTarget<'a> {
    pub classes: &'a [&'a str],
    pub row: Option<usize>,
}

impl HoverTarget<'_> {
    fn trigger_row(&self) -> Option<usize> {
        if self.classes.contains(&DELETE_TRIGGER_CLASS) {
            self.row
        } else {
            None
        }
    }
}

/// Rows currently marked as about to be removed.
#[derive(Clone, Debug, Default)]
pub struct RowHover {
    marked: BTreeSet<usize>,
}

impl RowHover {
    pub fn pointer_over(&mut self, target: HoverTarget<'_>) {
        if let Some(row) = target.trigger_row() {
            self.marked.insert(row);
        }
    }

    pub fn pointer_out(&mut self, target: HoverTarget<'_>) {
        if let Some(row) = target.trigger_row() {
            self.marked.remove(&row);
        }
    }

    pub fn row_class(&self, row: usize) -> Option<&'static str> {
        self.marked.contains(&row).then_some(MARKED_ROW_CLASS)
    }
}
