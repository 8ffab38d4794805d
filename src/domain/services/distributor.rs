//! Even split of an aggregate quantity across the designs a person picked.

use crate::domain::model::{LineItem, Size};

/// Ordered design selection that is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesignSelection(Vec<String>);

impl DesignSelection {
    /// Keeps `labels` in order, falling back to `default` when there are none.
    pub fn new<I, S>(labels: I, default: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        if labels.is_empty() {
            Self(vec![default.to_string()])
        } else {
            Self(labels)
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Per-bucket counts for `quantity` over `buckets` buckets: the first
/// `quantity % buckets` get one extra. `buckets` must be at least 1.
pub fn split_evenly(quantity: u32, buckets: usize) -> Vec<u32> {
    debug_assert!(buckets > 0);
    let n = buckets as u32;
    let base = quantity / n;
    let extra = (quantity % n) as usize;
    (0..buckets)
        .map(|i| if i < extra { base + 1 } else { base })
        .collect()
}

/// Expand `quantity` units of `size` into line items, design by design.
pub fn distribute(quantity: u32, selection: &DesignSelection, size: &Size) -> Vec<LineItem> {
    let counts = split_evenly(quantity, selection.len());
    if quantity % selection.len() as u32 != 0 {
        tracing::debug!(
            "{} x {} across {} designs - distributed unevenly",
            quantity,
            size,
            selection.len()
        );
    }

    selection
        .labels()
        .iter()
        .zip(counts)
        .flat_map(|(design, count)| {
            (0..count).map(move |_| LineItem {
                design: design.clone(),
                size: size.clone(),
            })
        })
        .collect()
}
