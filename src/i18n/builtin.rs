//! English strings shipped with the core.
//!
//! Only the chrome the core itself renders. Storefront copy is supplied by
//! the host through `[translations.*]` tables.

pub(super) fn english(key: &str) -> Option<&'static str> {
    let text = match key {
        "search.prompt" => "Start typing to discover...",
        "search.placeholder" => "Search",
        "search.searching" => "Searching...",
        "search.no_results" => "No results found for \"{term}\"",
        "search.retry" => "Something went wrong. Press enter to try again.",
        "search.trending" => "Trending",
        "search.suggestions" => "Suggestions",
        "search.products" => "Products",
        "search.collections" => "Collections",
        "search.articles" => "Journal",
        "search.pages" => "Pages",
        "search.total" => "{count} results",

        "cart.title" => "Your bag",
        "cart.empty" => "Your bag is empty",
        "cart.subtotal" => "Subtotal",
        "cart.discounts" => "Discounts",
        "cart.updating" => "Updating...",
        "cart.checkout" => "Checkout",
        "cart.free_shipping_remaining" => "Spend {amount} {currency} more for free shipping",
        "cart.free_shipping_unlocked" => "You've unlocked free shipping",

        "filters.title" => "Filters",
        "filters.active" => "{count} active",
        "filters.price" => "Price",
        "filters.online_only" => "Available online",

        "menu.title" => "Menu",
        "menu.back" => "Back",
        "login.title" => "Sign in",
        "wishlist.count" => "Wishlist ({count})",
        "promo.paused" => "Paused",
        _ => return None,
    };
    Some(text)
}
