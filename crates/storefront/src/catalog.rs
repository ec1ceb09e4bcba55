//! Catalog selection state.
//!
//! Session-held view of the store list, the selected store, and the product
//! list fetched for it. Two hazards of the fetch-on-switch flow are handled
//! here rather than in the handlers:
//!
//! - the configured default store may not exist in the fetched store list;
//! - a slow product fetch for a previously selected store may resolve after
//!   the user has already switched again, and must not overwrite the newer
//!   list.
//!
//! The second is solved with generation-tagged fetch tickets: switching
//! stores bumps the generation, and applying a product list requires the
//! ticket issued for that fetch to still be current.

use apteka_core::{Product, StoreName};
use serde::{Deserialize, Serialize};

/// Proof of which selection a product fetch was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchTicket {
    generation: u64,
}

/// A product list arrived for a selection that is no longer current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("stale product list discarded (selection changed while the fetch was in flight)")]
pub struct StaleResponse;

/// Store list, current selection, and the products fetched for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    stores: Vec<StoreName>,
    selected: Option<StoreName>,
    generation: u64,
    products: Vec<Product>,
}

impl Catalog {
    /// Replace the store list and re-resolve the selection.
    ///
    /// The current selection survives if it is still listed. Otherwise the
    /// configured default wins if present, then the first fetched store; an
    /// empty list clears the selection. A selection change bumps the
    /// generation so in-flight product fetches for the old store go stale.
    pub fn set_stores(&mut self, stores: Vec<StoreName>, default: &StoreName) {
        self.stores = stores;

        let previous = self.selected.take();
        let resolved = previous
            .clone()
            .filter(|s| self.stores.contains(s))
            .or_else(|| self.stores.contains(default).then(|| default.clone()))
            .or_else(|| self.stores.first().cloned());

        if resolved != previous {
            self.generation += 1;
            self.products.clear();
        }
        self.selected = resolved;
    }

    /// Switch the selection to `store`.
    ///
    /// Returns a fetch ticket when the selection actually changed; selecting
    /// the store that is already current is a no-op and triggers no fetch.
    pub fn select(&mut self, store: StoreName) -> Option<FetchTicket> {
        if self.selected.as_ref() == Some(&store) {
            return None;
        }
        self.selected = Some(store);
        self.generation += 1;
        Some(self.ticket())
    }

    /// Ticket for fetching products of the current selection.
    #[must_use]
    pub const fn ticket(&self) -> FetchTicket {
        FetchTicket {
            generation: self.generation,
        }
    }

    /// Install a fetched product list, replacing the previous one wholesale.
    ///
    /// # Errors
    ///
    /// Returns [`StaleResponse`] (and changes nothing) if the selection has
    /// moved on since the ticket was issued.
    pub fn apply(
        &mut self,
        ticket: FetchTicket,
        products: Vec<Product>,
    ) -> Result<(), StaleResponse> {
        if ticket.generation != self.generation {
            return Err(StaleResponse);
        }
        self.products = products;
        Ok(())
    }

    /// The fetched store list.
    #[must_use]
    pub fn stores(&self) -> &[StoreName] {
        &self.stores
    }

    /// The currently selected store, if any.
    #[must_use]
    pub const fn selected(&self) -> Option<&StoreName> {
        self.selected.as_ref()
    }

    /// Products of the current selection.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }
}

#[cfg(test)]
mod tests {
    use apteka_core::{CurrencyCode, Price, ProductId};
    use rust_decimal::Decimal;

    use super::*;

    fn stores(names: &[&str]) -> Vec<StoreName> {
        names.iter().map(|n| StoreName::new(*n)).collect()
    }

    fn product(id: &str) -> Product {
        Product {
            id: ProductId::new(id),
            title: id.to_owned(),
            price: Price::new(Decimal::ONE, CurrencyCode::UAH),
            image_url: String::new(),
        }
    }

    #[test]
    fn test_default_store_preselected_when_listed() {
        let mut catalog = Catalog::default();
        catalog.set_stores(stores(&["Magazin_1", "Magazin_2"]), &StoreName::new("Magazin_1"));
        assert_eq!(catalog.selected(), Some(&StoreName::new("Magazin_1")));
    }

    #[test]
    fn test_missing_default_falls_back_to_first_store() {
        let mut catalog = Catalog::default();
        catalog.set_stores(stores(&["Magazin_2", "Magazin_3"]), &StoreName::new("Magazin_1"));
        assert_eq!(catalog.selected(), Some(&StoreName::new("Magazin_2")));
    }

    #[test]
    fn test_empty_store_list_clears_selection() {
        let mut catalog = Catalog::default();
        catalog.set_stores(stores(&["Magazin_1"]), &StoreName::new("Magazin_1"));
        catalog.set_stores(Vec::new(), &StoreName::new("Magazin_1"));
        assert_eq!(catalog.selected(), None);
    }

    #[test]
    fn test_existing_selection_survives_store_refresh() {
        let mut catalog = Catalog::default();
        catalog.set_stores(stores(&["Magazin_1", "Magazin_2"]), &StoreName::new("Magazin_1"));
        catalog.select(StoreName::new("Magazin_2"));

        catalog.set_stores(stores(&["Magazin_1", "Magazin_2"]), &StoreName::new("Magazin_1"));
        assert_eq!(catalog.selected(), Some(&StoreName::new("Magazin_2")));
    }

    #[test]
    fn test_selecting_current_store_is_noop() {
        let mut catalog = Catalog::default();
        catalog.set_stores(stores(&["Magazin_1"]), &StoreName::new("Magazin_1"));
        assert!(catalog.select(StoreName::new("Magazin_1")).is_none());
    }

    #[test]
    fn test_apply_replaces_products_wholesale() {
        let mut catalog = Catalog::default();
        catalog.set_stores(stores(&["Magazin_1"]), &StoreName::new("Magazin_1"));

        catalog
            .apply(catalog.ticket(), vec![product("a"), product("b")])
            .expect("current ticket");
        assert_eq!(catalog.products().len(), 2);

        catalog
            .apply(catalog.ticket(), vec![product("c")])
            .expect("current ticket");
        assert_eq!(catalog.products().len(), 1);
        assert_eq!(
            catalog.products().first().expect("product").id,
            ProductId::new("c")
        );
    }

    #[test]
    fn test_stale_fetch_is_discarded_after_switch() {
        let mut catalog = Catalog::default();
        catalog.set_stores(stores(&["Magazin_1", "Magazin_2"]), &StoreName::new("Magazin_1"));

        // Fetch for Magazin_1 goes out...
        let slow_ticket = catalog.ticket();

        // ...user switches to Magazin_2, whose fetch resolves first.
        let fast_ticket = catalog.select(StoreName::new("Magazin_2")).expect("switch");
        catalog
            .apply(fast_ticket, vec![product("fresh")])
            .expect("newer fetch wins");

        // The slow response for the old store must not overwrite it.
        assert_eq!(
            catalog.apply(slow_ticket, vec![product("stale")]),
            Err(StaleResponse)
        );
        assert_eq!(
            catalog.products().first().expect("product").id,
            ProductId::new("fresh")
        );
    }

    #[test]
    fn test_selection_change_on_refresh_invalidates_old_ticket() {
        let mut catalog = Catalog::default();
        catalog.set_stores(stores(&["Magazin_1"]), &StoreName::new("Magazin_1"));
        let old_ticket = catalog.ticket();

        // Magazin_1 disappears from the backend; selection moves on.
        catalog.set_stores(stores(&["Magazin_9"]), &StoreName::new("Magazin_1"));
        assert_eq!(catalog.apply(old_ticket, vec![product("x")]), Err(StaleResponse));
    }
}
