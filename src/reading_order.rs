//! Reading order reconstruction: rows top-to-bottom, left-to-right within
//! a row.
//!
//! Rows are found in a single forward sweep over the boxes sorted by their
//! top edge. A box joins the open row while its vertical center stays within
//! `row_tolerance` of the mean center of the row so far, so a row can drift
//! slightly (skewed scans) without splitting. Once a row is closed it is
//! never revisited.

use crate::traits::BoundingBox;

/// Boxes sharing a text row, in left-to-right order once closed.
#[derive(Debug, Clone, PartialEq)]
pub struct Row<T> {
    pub members: Vec<T>,
    center_y_sum: f32,
}

impl<T: BoundingBox> Row<T> {
    fn start(first: T) -> Self {
        let center_y_sum = first.center().1;
        Self {
            members: vec![first],
            center_y_sum,
        }
    }

    /// Mean vertical center of all members.
    pub fn mean_center_y(&self) -> f32 {
        self.center_y_sum / self.members.len() as f32
    }

    fn accepts(&self, element: &T, row_tolerance: f32) -> bool {
        (element.center().1 - self.mean_center_y()).abs() <= row_tolerance
    }

    fn push(&mut self, element: T) {
        self.center_y_sum += element.center().1;
        self.members.push(element);
    }

    fn close(mut self) -> Self {
        // Stable, so boxes with equal centers keep their top-edge order
        self.members.sort_by(|a, b| a.center().0.total_cmp(&b.center().0));
        self
    }
}

/// Cluster elements into rows, ordered top-to-bottom, each row sorted
/// left-to-right.
pub fn group_rows<T: BoundingBox + Clone>(elements: &[T], row_tolerance: f32) -> Vec<Row<T>> {
    let mut by_top: Vec<T> = elements.to_vec();
    by_top.sort_by(|a, b| a.bounds().1.total_cmp(&b.bounds().1));

    let mut rows = Vec::new();
    let mut current: Option<Row<T>> = None;

    for element in by_top {
        if let Some(row) = current.as_mut() {
            if row.accepts(&element, row_tolerance) {
                row.push(element);
                continue;
            }
        }
        if let Some(done) = current.replace(Row::start(element)) {
            rows.push(done.close());
        }
    }

    if let Some(done) = current {
        rows.push(done.close());
    }

    rows
}

/// Order elements the way a person reads them: rows top-to-bottom, each
/// row left-to-right.
pub fn sort_reading_order<T: BoundingBox + Clone>(elements: &[T], row_tolerance: f32) -> Vec<T> {
    group_rows(elements, row_tolerance)
        .into_iter()
        .flat_map(|row| row.members)
        .collect()
}
