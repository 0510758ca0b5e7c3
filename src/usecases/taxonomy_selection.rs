//! Category selection engine.
//!
//! Group toggles over the domain → field → item tree. The item set decides what is
//! checked and what is filtered; domain and field memberships are advisory flags.
//! A field flag is only written for fields without items.
//!
//! Domain flag after a field toggle is asymmetric on purpose: it is set when every
//! field is fully selected, cleared only when no field keeps any selected item, and
//! otherwise left alone so a manually chosen domain survives partial deselection.

use crate::domain::selection::flip;
use crate::domain::{CategorySelection, DomainCategory, FieldCategory, Taxonomy, TaxonomyLevel};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Flip a single item. Returns false when the id is not in the tree.
pub fn toggle_item(taxonomy: &Taxonomy, selection: &mut CategorySelection, id: i64) -> bool {
    if taxonomy.item(id).is_none() {
        warn!(item_id = id, "toggle for unknown item category ignored");
        return false;
    }
    let now = flip(&mut selection.items, id);
    debug!(item_id = id, selected = now, "item category toggled");
    true
}

/// Group-toggle all items under a field, then refresh the owning domain flag.
pub fn toggle_field(taxonomy: &Taxonomy, selection: &mut CategorySelection, id: i64) -> bool {
    let Some((domain, field)) = taxonomy.field(id) else {
        warn!(field_id = id, "toggle for unknown field category ignored");
        return false;
    };

    let new_state = !field_fully_selected(field, selection);
    set_all(&mut selection.items, &field.item_ids(), new_state);
    // A field without items has nothing else to carry its checked state.
    if field.item_categories.is_empty() {
        set_member(&mut selection.fields, field.id, new_state);
    }
    refresh_domain_flag(domain, selection);

    debug!(
        field_id = id,
        domain_id = domain.id,
        selected = new_state,
        "field category toggled"
    );
    true
}

/// Group-toggle every item under a domain and mirror the result onto the domain
/// and all of its fields.
pub fn toggle_domain(taxonomy: &Taxonomy, selection: &mut CategorySelection, id: i64) -> bool {
    let Some(domain) = taxonomy.domain(id) else {
        warn!(domain_id = id, "toggle for unknown domain category ignored");
        return false;
    };

    let new_state = !domain_fully_selected(domain, selection);
    set_all(&mut selection.items, &domain.item_ids(), new_state);
    set_member(&mut selection.domains, domain.id, new_state);
    for field in &domain.field_categories {
        set_member(&mut selection.fields, field.id, new_state);
    }

    debug!(domain_id = id, selected = new_state, "domain category toggled");
    true
}

/// Checked state of a node: every item in its subtree is selected.
/// A node without items falls back to its advisory flag. Unknown nodes are unchecked.
pub fn is_fully_selected(
    taxonomy: &Taxonomy,
    selection: &CategorySelection,
    level: TaxonomyLevel,
    id: i64,
) -> bool {
    match level {
        TaxonomyLevel::Domain => taxonomy
            .domain(id)
            .is_some_and(|d| domain_fully_selected(d, selection)),
        TaxonomyLevel::Field => taxonomy
            .field(id)
            .is_some_and(|(_, f)| field_fully_selected(f, selection)),
        TaxonomyLevel::Item => selection.items.contains(&id),
    }
}

/// Some but not all items under the node are selected.
pub fn is_partially_selected(
    taxonomy: &Taxonomy,
    selection: &CategorySelection,
    level: TaxonomyLevel,
    id: i64,
) -> bool {
    let Some(items) = taxonomy.subtree_item_ids(level, id) else {
        return false;
    };
    let selected = items
        .iter()
        .filter(|i| selection.items.contains(i))
        .count();
    selected > 0 && selected < items.len()
}

fn field_fully_selected(field: &FieldCategory, selection: &CategorySelection) -> bool {
    if field.item_categories.is_empty() {
        return selection.fields.contains(&field.id);
    }
    field
        .item_categories
        .iter()
        .all(|i| selection.items.contains(&i.id))
}

fn domain_fully_selected(domain: &DomainCategory, selection: &CategorySelection) -> bool {
    let items = domain.item_ids();
    if items.is_empty() {
        return selection.domains.contains(&domain.id);
    }
    items.iter().all(|i| selection.items.contains(i))
}

fn refresh_domain_flag(domain: &DomainCategory, selection: &mut CategorySelection) {
    let every_field_full = domain
        .field_categories
        .iter()
        .all(|f| field_fully_selected(f, selection));
    let no_field_selected = domain.field_categories.iter().all(|f| {
        f.item_categories
            .iter()
            .all(|i| !selection.items.contains(&i.id))
    });

    if every_field_full {
        selection.domains.insert(domain.id);
    } else if no_field_selected {
        selection.domains.remove(&domain.id);
    }
}

fn set_all(set: &mut BTreeSet<i64>, ids: &[i64], state: bool) {
    for &id in ids {
        set_member(set, id, state);
    }
}

fn set_member(set: &mut BTreeSet<i64>, id: i64, state: bool) {
    if state {
        set.insert(id);
    } else {
        set.remove(&id);
    }
}
