//! Category tabs and product grid.
//!
//! Both are pure views over catalog data handed in by the caller. The only
//! behaviour they own is deciding whether a click counts.

use askama::Template;
use kebab_pos_core::{Category, CategoryId, Product, ProductId};

/// One tab as rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabView {
    pub id: String,
    /// `id` encoded for the `category` query parameter.
    pub param: String,
    pub name: String,
    pub active: bool,
}

/// Horizontal strip of category tabs.
#[derive(Template)]
#[template(path = "partials/category_tabs.html")]
pub struct CategoryTabsTemplate {
    pub tabs: Vec<TabView>,
}

/// Tabs for `categories` with `selected_id` highlighted.
#[derive(Debug, Clone, Copy)]
pub struct CategoryTabs<'a> {
    categories: &'a [Category],
    selected_id: Option<&'a CategoryId>,
}

impl<'a> CategoryTabs<'a> {
    #[must_use]
    pub const fn new(categories: &'a [Category], selected_id: Option<&'a CategoryId>) -> Self {
        Self {
            categories,
            selected_id,
        }
    }

    #[must_use]
    pub fn tabs(&self) -> Vec<TabView> {
        self.categories
            .iter()
            .map(|category| TabView {
                id: category.id.to_string(),
                param: query_value(&category.id),
                name: category.name.clone(),
                active: self.selected_id == Some(&category.id),
            })
            .collect()
    }

    /// # Errors
    ///
    /// Returns error if the template fails to render.
    pub fn render(&self) -> Result<String, askama::Error> {
        CategoryTabsTemplate { tabs: self.tabs() }.render()
    }

    /// Handle a click on the tab for `id`.
    ///
    /// Every click on a known tab calls `on_select` exactly once, including
    /// a click on the tab that is already selected. Returns whether it fired.
    pub fn click(&self, id: &CategoryId, on_select: impl FnOnce(&CategoryId)) -> bool {
        match self.categories.iter().find(|c| &c.id == id) {
            Some(category) => {
                on_select(&category.id);
                true
            }
            None => false,
        }
    }
}

/// One product card as rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCardView {
    pub id: String,
    pub name: String,
    pub image: Option<String>,
    pub price_lines: Vec<String>,
    pub interactive: bool,
}

/// Grid of product cards, or an empty-state message.
#[derive(Template)]
#[template(path = "partials/product_grid.html")]
pub struct ProductGridTemplate {
    pub cards: Vec<ProductCardView>,
}

/// Cards for `products`, priced in `currency_symbol`.
#[derive(Debug, Clone, Copy)]
pub struct ProductGrid<'a> {
    products: &'a [Product],
    currency_symbol: &'a str,
}

impl<'a> ProductGrid<'a> {
    #[must_use]
    pub const fn new(products: &'a [Product], currency_symbol: &'a str) -> Self {
        Self {
            products,
            currency_symbol,
        }
    }

    #[must_use]
    pub fn cards(&self) -> Vec<ProductCardView> {
        self.products
            .iter()
            .map(|product| ProductCardView {
                id: product.id.to_string(),
                name: product.name.clone(),
                image: product.display_image().map(String::from),
                price_lines: price_lines(product, self.currency_symbol),
                interactive: product.is_available,
            })
            .collect()
    }

    /// # Errors
    ///
    /// Returns error if the template fails to render.
    pub fn render(&self) -> Result<String, askama::Error> {
        ProductGridTemplate {
            cards: self.cards(),
        }
        .render()
    }

    /// Handle a click on the card for `id`.
    ///
    /// Unavailable products are disabled: the handler never fires for them,
    /// whatever their price. Returns whether it fired.
    pub fn click(&self, id: &ProductId, on_product_click: impl FnOnce(&Product)) -> bool {
        match self.products.iter().find(|p| &p.id == id) {
            Some(product) if product.is_available => {
                on_product_click(product);
                true
            }
            _ => false,
        }
    }
}

/// Link that opens the till on the tab for `id`.
#[must_use]
pub fn category_href(id: &CategoryId) -> String {
    format!("/?category={}", query_value(id))
}

fn query_value(id: &CategoryId) -> String {
    url::form_urlencoded::byte_serialize(id.as_str().as_bytes()).collect()
}

/// Price lines for a card: `X ea` and `X/kg` for weighed items, else just `X`.
#[must_use]
pub fn price_lines(product: &Product, currency_symbol: &str) -> Vec<String> {
    let unit = product.price.display(currency_symbol);
    match product.price_per_kg.filter(kebab_pos_core::Price::is_positive) {
        Some(per_kg) => vec![
            format!("{unit} ea"),
            format!("{}/kg", per_kg.display(currency_symbol)),
        ],
        None => vec![unit],
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use kebab_pos_core::Price;

    use super::*;

    fn products() -> Vec<Product> {
        let wrap = Product::new("p1", "Lamb Wrap", Price::from_cents(1450));
        let mut meat = Product::new("p2", "Doner Meat", Price::from_cents(1200));
        meat.price_per_kg = Some(Price::from_cents(4500));
        let mut sold_out = Product::new("p3", "Baklava", Price::from_cents(400));
        sold_out.is_available = false;
        sold_out.price_per_kg = Some(Price::from_cents(3000));
        vec![wrap, meat, sold_out]
    }

    #[test]
    fn test_selected_tab_is_active() {
        let categories = vec![Category::new("1", "Wraps")];
        let selected = CategoryId::new("1");
        let html = CategoryTabs::new(&categories, Some(&selected)).render().unwrap();
        assert!(html.contains(r#"class="category-tab active""#));
        assert!(html.contains("Wraps"));
    }

    #[test]
    fn test_tab_links_encode_ids() {
        let odd = CategoryId::new("wraps & rolls#1");
        assert_eq!(category_href(&odd), "/?category=wraps+%26+rolls%231");
        assert_eq!(category_href(&CategoryId::new("2")), "/?category=2");

        let categories = vec![Category::new("wraps & rolls#1", "Wraps")];
        let html = CategoryTabs::new(&categories, None).render().unwrap();
        assert!(html.contains(r#"href="/?category=wraps+%26+rolls%231""#));
    }

    #[test]
    fn test_tab_click_fires_once_per_click() {
        let categories = vec![Category::new("1", "Wraps"), Category::new("2", "Plates")];
        let selected = CategoryId::new("1");
        let tabs = CategoryTabs::new(&categories, Some(&selected));

        let mut selections = Vec::new();
        assert!(tabs.click(&CategoryId::new("2"), |id| selections.push(id.clone())));
        assert_eq!(selections, vec![CategoryId::new("2")]);

        assert!(tabs.click(&CategoryId::new("2"), |id| selections.push(id.clone())));
        assert_eq!(selections.len(), 2);

        assert!(!tabs.click(&CategoryId::new("9"), |id| selections.push(id.clone())));
        assert_eq!(selections.len(), 2);
    }

    #[test]
    fn test_no_tab_active_without_selection() {
        let categories = vec![Category::new("1", "Wraps")];
        let tabs = CategoryTabs::new(&categories, None).tabs();
        assert!(tabs.iter().all(|t| !t.active));
    }

    #[test]
    fn test_price_lines() {
        let products = products();
        assert_eq!(price_lines(&products[0], "$"), vec!["$14.50"]);
        assert_eq!(
            price_lines(&products[1], "$"),
            vec!["$12.00 ea", "$45.00/kg"]
        );

        let mut free_per_kg = products[0].clone();
        free_per_kg.price_per_kg = Some(Price::ZERO);
        assert_eq!(price_lines(&free_per_kg, "$").len(), 1);
    }

    #[test]
    fn test_unavailable_product_never_fires() {
        let products = products();
        let grid = ProductGrid::new(&products, "$");

        let mut clicked = Vec::new();
        assert!(!grid.click(&ProductId::new("p3"), |p| clicked.push(p.id.clone())));
        assert!(clicked.is_empty());

        assert!(grid.click(&ProductId::new("p1"), |p| clicked.push(p.id.clone())));
        assert_eq!(clicked, vec![ProductId::new("p1")]);
    }

    #[test]
    fn test_grid_markup() {
        let products = products();
        let html = ProductGrid::new(&products, "$").render().unwrap();

        assert_eq!(html.matches(r#"class="product-card__price""#).count(), 5);
        assert_eq!(html.matches("disabled").count(), 1);
        assert!(html.contains("$45.00/kg"));
    }

    #[test]
    fn test_empty_grid() {
        let html = ProductGrid::new(&[], "$").render().unwrap();
        assert!(html.contains("No products in this category"));
        assert!(!html.contains("product-card"));
    }
}
