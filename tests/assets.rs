//! The cart script mirrors `state::optimistic` in the browser.

const SCRIPT: &str = include_str!("../assets/storefront.js");

#[test]
fn decrement_at_zero_sends_nothing() {
    assert!(SCRIPT.contains("if (shown <= 0) return;"));
}

#[test]
fn remove_icon_only_at_one() {
    assert!(SCRIPT.contains(r#"quantity === 1 ? "&#128465;" : "&minus;""#));
}

#[test]
fn removal_dims_line_until_settled() {
    assert!(SCRIPT.contains(r#"if (removing) row.classList.add("opacity-50");"#));
    assert!(SCRIPT.contains(r#"if (removing) row.classList.remove("opacity-50");"#));
}

#[test]
fn failure_restores_confirmed_quantity() {
    assert!(SCRIPT.contains("render(confirmed);"));
}
