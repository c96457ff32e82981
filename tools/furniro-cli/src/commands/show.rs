//! Show the cart and wishlist.

use anyhow::Result;

use super::ShowArgs;
use crate::context::Context;
use crate::output::{format_subtotal, status_badge};

/// Run the show command.
pub fn run(args: ShowArgs, ctx: &Context) -> Result<()> {
    let cart = ctx.open_cart()?;
    let summary = cart.summary();

    if ctx.output.is_json() {
        if args.summary {
            ctx.output.json(&summary);
        } else {
            ctx.output.json(&serde_json::json!({
                "cart": cart.list_cart(),
                "wishlist": cart.list_wishlist(),
                "summary": summary,
                "persistence": cart.persistence_status(),
            }));
        }
        return Ok(());
    }

    if !args.summary {
        ctx.output.header(&format!("Cart ({} unique)", cart.cart_unique_count()));
        ctx.output.cart_table(&cart.list_cart());

        ctx.output.header(&format!("Wishlist ({})", summary.wishlist_count));
        ctx.output.wishlist_table(&cart.list_wishlist());
        println!();
    }

    ctx.output.kv("items", &summary.item_count.to_string());
    ctx.output.kv("wishlist", &summary.wishlist_count.to_string());
    ctx.output.kv("subtotal", &format_subtotal(summary.subtotal));
    ctx.output.kv("storage", &status_badge(cart.persistence_status()));
    if ctx.output.is_verbose() {
        ctx.output.kv("key", &cart.config().storage_key);
    }

    Ok(())
}
