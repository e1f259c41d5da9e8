//! Aggregate decoded records into per-class object counts

use crate::{CompactError, Record};
use blueprint_shared::{ItemCatalog, ObjectCount};
use hashbrown::HashMap;
use serde_json::Value;

/// Which record fields hold the class name and the quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountFields {
    pub class: String,
    /// `None` counts every record as one object
    pub quantity: Option<String>,
}

impl Default for CountFields {
    fn default() -> Self {
        Self {
            class: "name".to_string(),
            quantity: Some("qty".to_string()),
        }
    }
}

/// Sum quantities per class and resolve display names through `catalog`.
///
/// Output is ordered by category, then quantity (largest first), then name.
pub fn summarize(
    records: &[&Record],
    fields: &CountFields,
    catalog: &ItemCatalog,
) -> Result<Vec<ObjectCount>, CompactError> {
    let mut totals: HashMap<&str, u64> = HashMap::new();

    for (index, record) in records.iter().enumerate() {
        let class = match record.get(&fields.class) {
            Some(Value::String(class)) => class.as_str(),
            Some(_) => return Err(field_error(index, &fields.class, "is not a string")),
            None => return Err(field_error(index, &fields.class, "is missing")),
        };

        let quantity = match &fields.quantity {
            None => 1,
            Some(field) => match record.get(field) {
                Some(value) => value
                    .as_u64()
                    .ok_or_else(|| field_error(index, field, "is not a non-negative integer"))?,
                None => return Err(field_error(index, field, "is missing")),
            },
        };

        let total = totals.entry(class).or_default();
        *total = total.checked_add(quantity).ok_or_else(|| {
            let field = fields.quantity.as_deref().unwrap_or(&fields.class);
            field_error(index, field, "total overflows")
        })?;
    }

    let mut counts: Vec<ObjectCount> = totals
        .into_iter()
        .map(|(class, quantity)| ObjectCount {
            class: class.to_string(),
            name: catalog.display_name(class).to_string(),
            category: catalog.category(class),
            quantity,
        })
        .collect();

    counts.sort_by(|a, b| {
        (a.category as u8)
            .cmp(&(b.category as u8))
            .then(b.quantity.cmp(&a.quantity))
            .then_with(|| a.name.cmp(&b.name))
    });

    Ok(counts)
}

fn field_error(index: usize, field: &str, reason: &'static str) -> CompactError {
    CompactError::Field {
        index,
        field: field.to_string(),
        reason,
    }
}
