//! Cart mutation commands.

use anyhow::{bail, Result};
use furniro_cart::ProductId;

use super::{AddArgs, RemoveArgs, SetQtyArgs};
use crate::context::Context;
use crate::output::format_subtotal;

/// Run the add command.
pub fn add(args: AddArgs, ctx: &Context) -> Result<()> {
    let cart = ctx.open_cart()?;
    let item = args.item.snapshot(cart.currency())?;

    let changed = cart.add_to_cart(&item, args.quantity)?;
    let quantity = cart.cart_quantity(&item.product_id).unwrap_or(0);

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "product_id": item.product_id,
            "quantity": quantity,
            "changed": changed,
            "summary": cart.summary(),
        }));
    } else if changed {
        ctx.output.success(&format!("{} x{} in cart", item.title, quantity));
        ctx.output.kv("subtotal", &format_subtotal(cart.cart_subtotal()));
    } else {
        ctx.output.info(&format!("{} already at its quantity limit ({})", item.title, quantity));
    }
    Ok(())
}

/// Run the remove command.
pub fn remove(args: RemoveArgs, ctx: &Context) -> Result<()> {
    let cart = ctx.open_cart()?;
    let id = ProductId::new(args.id);

    if !cart.remove_from_cart(&id) {
        bail!("'{}' is not in the cart", id);
    }

    if ctx.output.is_json() {
        ctx.output.json(&cart.summary());
    } else {
        ctx.output.success(&format!("Removed {}", id));
    }
    Ok(())
}

/// Run the set-qty command.
pub fn set_quantity(args: SetQtyArgs, ctx: &Context) -> Result<()> {
    let cart = ctx.open_cart()?;
    let id = ProductId::new(args.id);

    if !cart.is_in_cart(&id) {
        bail!("'{}' is not in the cart", id);
    }

    cart.set_quantity(&id, args.quantity);

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "product_id": id,
            "quantity": cart.cart_quantity(&id),
            "summary": cart.summary(),
        }));
        return Ok(());
    }

    match cart.cart_quantity(&id) {
        Some(quantity) => ctx.output.success(&format!("{} x{}", id, quantity)),
        None => ctx.output.success(&format!("Removed {}", id)),
    }
    Ok(())
}
