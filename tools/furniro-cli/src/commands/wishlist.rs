//! Wishlist commands.

use anyhow::{bail, Result};
use furniro_cart::ProductId;

use super::{WishlistArgs, WishlistCommand};
use crate::context::Context;

/// Run the wishlist command.
pub fn run(args: WishlistArgs, ctx: &Context) -> Result<()> {
    let cart = ctx.open_cart()?;

    match args.command {
        WishlistCommand::Toggle(item) => {
            let snapshot = item.snapshot(cart.currency())?;
            let added = cart.toggle_wishlist(&snapshot)?;

            if ctx.output.is_json() {
                ctx.output.json(&serde_json::json!({
                    "product_id": snapshot.product_id,
                    "in_wishlist": added,
                }));
            } else if added {
                ctx.output.success(&format!("Added {} to wishlist", snapshot.title));
            } else {
                ctx.output.success(&format!("Removed {} from wishlist", snapshot.title));
            }
        }
        WishlistCommand::Move { id } => {
            let id = ProductId::new(id);
            if !cart.move_wishlist_to_cart(&id) {
                bail!("'{}' is not in the wishlist", id);
            }

            let quantity = cart.cart_quantity(&id).unwrap_or(1);
            if ctx.output.is_json() {
                ctx.output.json(&serde_json::json!({
                    "product_id": id,
                    "quantity": quantity,
                }));
            } else {
                ctx.output.success(&format!("Moved {} to cart (x{})", id, quantity));
            }
        }
        WishlistCommand::List => {
            let items = cart.list_wishlist();
            if ctx.output.is_json() {
                ctx.output.json(&items);
            } else {
                ctx.output.header(&format!("Wishlist ({})", items.len()));
                ctx.output.wishlist_table(&items);
            }
        }
    }

    Ok(())
}
