//! Implements InputPort. Inquire-based interactive browser.
//!
//! Main menu → search text, category and location drill-down (toggle with
//! checked marks and ad counts), price range, sort, paging. Filters are saved on quit.

use crate::domain::{Ad, DomainError, LocationLevel, SortKey, TaxonomyLevel};
use crate::ports::{FilterStatePort, InputPort};
use crate::usecases::{BrowseSession, SearchResults};
use async_trait::async_trait;
use inquire::ui::{Color, RenderConfig, Styled};
use inquire::{InquireError, Select, Text};
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

const MENU_PAGE_SIZE: usize = 15;

/// Applies the prompt theme for all subsequent inquire prompts.
pub fn apply_theme() {
    let config = RenderConfig::default()
        .with_prompt_prefix(Styled::new("›").with_fg(Color::LightMagenta))
        .with_highlighted_option_prefix(Styled::new("➤").with_fg(Color::LightCyan));
    inquire::set_global_render_config(config);
}

/// One selectable menu line.
struct Entry<A> {
    label: String,
    action: A,
}

impl<A> Entry<A> {
    fn new(label: impl Into<String>, action: A) -> Self {
        Self {
            label: label.into(),
            action,
        }
    }
}

impl<A> fmt::Display for Entry<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Show a menu. Esc counts as "back" (`None`).
fn choose<A>(prompt: &str, entries: Vec<Entry<A>>) -> Result<Option<A>, DomainError> {
    match Select::new(prompt, entries)
        .with_page_size(MENU_PAGE_SIZE)
        .prompt()
    {
        Ok(entry) => Ok(Some(entry.action)),
        Err(InquireError::OperationCanceled) => Ok(None),
        Err(e) => Err(DomainError::Input(e.to_string())),
    }
}

fn ask_text(prompt: &str, initial: &str) -> Result<Option<String>, DomainError> {
    match Text::new(prompt).with_initial_value(initial).prompt() {
        Ok(s) => Ok(Some(s)),
        Err(InquireError::OperationCanceled) => Ok(None),
        Err(e) => Err(DomainError::Input(e.to_string())),
    }
}

fn mark(checked: bool, partial: bool) -> &'static str {
    if checked {
        "[x]"
    } else if partial {
        "[-]"
    } else {
        "[ ]"
    }
}

fn node_label(checked: bool, partial: bool, name: &str, count: usize) -> String {
    format!("{} {} ({})", mark(checked, partial), name, count)
}

/// "Rs. 1,500,000" style price, or a placeholder when the ad has none.
pub fn format_price(price: Option<f64>) -> String {
    let Some(price) = price else {
        return "price on request".to_string();
    };
    let whole = price.round() as i64;
    let digits = whole.unsigned_abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let sign = if whole < 0 { "-" } else { "" };
    format!("Rs. {}{}", sign, grouped)
}

fn ad_line(ad: &Ad) -> String {
    let id = ad.id.map(|i| format!("#{}", i)).unwrap_or_else(|| "#?".to_string());
    let posted = ad
        .created_at
        .map(|t| t.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    format!("{:>6}  {:<40}  {:>18}  {}", id, ad.title, format_price(ad.price), posted)
}

fn print_results(results: &SearchResults, sort_by: SortKey) {
    println!();
    println!(
        "── {} matches · page {}/{} · sorted by {} ──",
        results.total_matches, results.page, results.total_pages, sort_by
    );
    if results.ads.is_empty() {
        println!("   (no ads match the current filters)");
    }
    for ad in &results.ads {
        println!("{}", ad_line(ad));
    }
    println!();
}

#[derive(Clone, Copy)]
enum MainAction {
    Search,
    Categories,
    Locations,
    Price,
    Sort,
    NextPage,
    PrevPage,
    Reset,
    Quit,
}

enum CategoryNav {
    Enter(TaxonomyLevel, i64),
    Toggle(TaxonomyLevel, i64),
    Back,
}

enum LocationNav {
    Enter(LocationLevel, i64),
    Toggle(LocationLevel, i64),
    ToggleAddress(i64, usize),
    Back,
}

/// TUI adapter. Inquire prompts.
pub struct TuiInputPort {
    session: Mutex<BrowseSession>,
    state: Arc<dyn FilterStatePort>,
}

impl TuiInputPort {
    pub fn new(session: BrowseSession, state: Arc<dyn FilterStatePort>) -> Self {
        Self {
            session: Mutex::new(session),
            state,
        }
    }

    fn browse_categories(session: &mut BrowseSession) -> Result<(), DomainError> {
        loop {
            let mut entries: Vec<Entry<CategoryNav>> = session
                .catalog()
                .taxonomy
                .domains
                .iter()
                .map(|d| {
                    Entry::new(
                        node_label(
                            session.is_category_checked(TaxonomyLevel::Domain, d.id),
                            session.is_category_partial(TaxonomyLevel::Domain, d.id),
                            &d.name,
                            session.category_count(TaxonomyLevel::Domain, d.id),
                        ),
                        CategoryNav::Enter(TaxonomyLevel::Domain, d.id),
                    )
                })
                .collect();
            entries.push(Entry::new("« Back", CategoryNav::Back));

            match choose("Categories", entries)? {
                Some(CategoryNav::Enter(level, id)) => {
                    Self::browse_category_node(session, level, id)?
                }
                Some(CategoryNav::Toggle(level, id)) => {
                    session.toggle_category(level, id);
                }
                Some(CategoryNav::Back) | None => return Ok(()),
            }
        }
    }

    /// Drill into a domain or field: toggle the whole node or one of its children.
    fn browse_category_node(
        session: &mut BrowseSession,
        level: TaxonomyLevel,
        id: i64,
    ) -> Result<(), DomainError> {
        loop {
            let taxonomy = &session.catalog().taxonomy;
            let (name, fields, items) = match level {
                TaxonomyLevel::Domain => match taxonomy.domain(id) {
                    Some(d) => (
                        d.name.clone(),
                        d.field_categories
                            .iter()
                            .map(|f| (f.id, f.name.clone()))
                            .collect::<Vec<_>>(),
                        d.item_categories
                            .iter()
                            .map(|i| (i.id, i.name.clone()))
                            .collect::<Vec<_>>(),
                    ),
                    None => return Ok(()),
                },
                TaxonomyLevel::Field => match taxonomy.field(id) {
                    Some((_, f)) => (
                        f.name.clone(),
                        Vec::new(),
                        f.item_categories
                            .iter()
                            .map(|i| (i.id, i.name.clone()))
                            .collect(),
                    ),
                    None => return Ok(()),
                },
                TaxonomyLevel::Item => return Ok(()),
            };

            let mut entries = vec![Entry::new(
                format!(
                    "{} All of {} ({})",
                    mark(
                        session.is_category_checked(level, id),
                        session.is_category_partial(level, id)
                    ),
                    name,
                    session.category_count(level, id)
                ),
                CategoryNav::Toggle(level, id),
            )];
            for (field_id, field_name) in &fields {
                entries.push(Entry::new(
                    format!(
                        "{} ›",
                        node_label(
                            session.is_category_checked(TaxonomyLevel::Field, *field_id),
                            session.is_category_partial(TaxonomyLevel::Field, *field_id),
                            field_name,
                            session.category_count(TaxonomyLevel::Field, *field_id),
                        )
                    ),
                    CategoryNav::Enter(TaxonomyLevel::Field, *field_id),
                ));
            }
            for (item_id, item_name) in &items {
                entries.push(Entry::new(
                    node_label(
                        session.is_category_checked(TaxonomyLevel::Item, *item_id),
                        false,
                        item_name,
                        session.category_count(TaxonomyLevel::Item, *item_id),
                    ),
                    CategoryNav::Toggle(TaxonomyLevel::Item, *item_id),
                ));
            }
            entries.push(Entry::new("« Back", CategoryNav::Back));

            match choose(&name, entries)? {
                Some(CategoryNav::Enter(child_level, child_id)) => {
                    Self::browse_category_node(session, child_level, child_id)?
                }
                Some(CategoryNav::Toggle(node_level, node_id)) => {
                    session.toggle_category(node_level, node_id);
                }
                Some(CategoryNav::Back) | None => return Ok(()),
            }
        }
    }

    /// Drill down province → district → local level → ward → address.
    fn browse_locations(
        session: &mut BrowseSession,
        parent: Option<(LocationLevel, i64)>,
    ) -> Result<(), DomainError> {
        loop {
            let locations = &session.catalog().locations;
            let (title, next_level, children): (String, Option<LocationLevel>, Vec<(i64, String)>) =
                match parent {
                    None => (
                        "Locations".to_string(),
                        Some(LocationLevel::Province),
                        locations
                            .provinces
                            .iter()
                            .map(|p| (p.id, p.name.clone()))
                            .collect(),
                    ),
                    Some((LocationLevel::Province, id)) => match locations.province(id) {
                        Some(p) => (
                            p.name.clone(),
                            Some(LocationLevel::District),
                            p.districts.iter().map(|d| (d.id, d.name.clone())).collect(),
                        ),
                        None => return Ok(()),
                    },
                    Some((LocationLevel::District, id)) => match locations.district(id) {
                        Some(d) => (
                            d.name.clone(),
                            Some(LocationLevel::LocalLevel),
                            d.local_levels
                                .iter()
                                .map(|l| (l.id, l.name.clone()))
                                .collect(),
                        ),
                        None => return Ok(()),
                    },
                    Some((LocationLevel::LocalLevel, id)) => match locations.local_level(id) {
                        Some(l) => (
                            l.name.clone(),
                            Some(LocationLevel::Ward),
                            l.wards
                                .iter()
                                .map(|w| (w.id, format!("Ward {}", w.ward_number)))
                                .collect(),
                        ),
                        None => return Ok(()),
                    },
                    Some((LocationLevel::Ward, id)) => match locations.ward(id) {
                        Some(w) => (
                            format!("Ward {}", w.ward_number),
                            None,
                            w.local_addresses
                                .iter()
                                .enumerate()
                                .map(|(i, a)| (i as i64, a.clone()))
                                .collect(),
                        ),
                        None => return Ok(()),
                    },
                };

            let mut entries = Vec::new();
            if let Some((level, id)) = parent {
                entries.push(Entry::new(
                    format!(
                        "{} All of {} ({})",
                        mark(
                            session.is_location_checked(level, id),
                            session.is_location_partial(level, id)
                        ),
                        title,
                        session.location_count(level, id)
                    ),
                    LocationNav::Toggle(level, id),
                ));
            }
            for (child_id, child_name) in &children {
                let entry = match (next_level, parent) {
                    (Some(level), _) => Entry::new(
                        format!(
                            "{} ›",
                            node_label(
                                session.is_location_checked(level, *child_id),
                                session.is_location_partial(level, *child_id),
                                child_name,
                                session.location_count(level, *child_id),
                            )
                        ),
                        LocationNav::Enter(level, *child_id),
                    ),
                    (None, Some((_, ward_id))) => {
                        let index = *child_id as usize;
                        Entry::new(
                            node_label(
                                session.is_address_checked(ward_id, index),
                                false,
                                child_name,
                                session.address_count(ward_id, index),
                            ),
                            LocationNav::ToggleAddress(ward_id, index),
                        )
                    }
                    (None, None) => continue,
                };
                entries.push(entry);
            }
            entries.push(Entry::new("« Back", LocationNav::Back));

            match choose(&title, entries)? {
                Some(LocationNav::Enter(level, id)) => {
                    Self::browse_locations(session, Some((level, id)))?
                }
                Some(LocationNav::Toggle(level, id)) => {
                    session.toggle_location(level, id);
                }
                Some(LocationNav::ToggleAddress(ward_id, index)) => {
                    session.toggle_address(ward_id, index);
                }
                Some(LocationNav::Back) | None => return Ok(()),
            }
        }
    }

    fn edit_price(session: &mut BrowseSession) -> Result<(), DomainError> {
        let current = |bound: Option<f64>| bound.map(|n| n.to_string()).unwrap_or_default();
        let min_now = current(session.filters().price_min);
        let max_now = current(session.filters().price_max);
        let Some(min) = ask_text("Minimum price (blank for none):", &min_now)? else {
            return Ok(());
        };
        let Some(max) = ask_text("Maximum price (blank for none):", &max_now)? else {
            return Ok(());
        };
        session.set_price_range(&min, &max);
        Ok(())
    }

    fn edit_sort(session: &mut BrowseSession) -> Result<(), DomainError> {
        let entries = SortKey::ALL
            .iter()
            .map(|k| Entry::new(k.label(), *k))
            .collect();
        if let Some(key) = choose("Sort by", entries)? {
            session.set_sort(key);
        }
        Ok(())
    }
}

#[async_trait]
impl InputPort for TuiInputPort {
    async fn run_browse(&self) -> Result<(), DomainError> {
        let mut session = self.session.lock().await;

        loop {
            print_results(&session.results(), session.filters().sort_by);

            let entries = vec![
                Entry::new(
                    format!("Search text [{}]", session.filters().text),
                    MainAction::Search,
                ),
                Entry::new("Categories ›", MainAction::Categories),
                Entry::new("Locations ›", MainAction::Locations),
                Entry::new("Price range", MainAction::Price),
                Entry::new(format!("Sort [{}]", session.filters().sort_by), MainAction::Sort),
                Entry::new("Next page", MainAction::NextPage),
                Entry::new("Previous page", MainAction::PrevPage),
                Entry::new("Reset filters", MainAction::Reset),
                Entry::new("Save & quit", MainAction::Quit),
            ];

            match choose("What next?", entries)?.unwrap_or(MainAction::Quit) {
                MainAction::Search => {
                    let current = session.filters().text.clone();
                    if let Some(text) = ask_text("Search title/description:", &current)? {
                        session.set_text(text);
                    }
                }
                MainAction::Categories => Self::browse_categories(&mut session)?,
                MainAction::Locations => Self::browse_locations(&mut session, None)?,
                MainAction::Price => Self::edit_price(&mut session)?,
                MainAction::Sort => Self::edit_sort(&mut session)?,
                MainAction::NextPage => {
                    session.next_page();
                }
                MainAction::PrevPage => {
                    session.prev_page();
                }
                MainAction::Reset => session.reset(),
                MainAction::Quit => break,
            }
        }

        if let Err(e) = self.state.save(session.filters()).await {
            warn!(error = %e, "could not save filters");
        } else {
            info!("filters saved");
        }
        Ok(())
    }
}
