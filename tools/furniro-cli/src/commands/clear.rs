//! Empty the cart or the wishlist.

use anyhow::Result;
use dialoguer::Confirm;

use super::{ClearArgs, ClearTarget};
use crate::context::Context;

/// Run the clear command.
pub fn run(args: ClearArgs, ctx: &Context) -> Result<()> {
    let cart = ctx.open_cart()?;

    let (name, count) = match args.target {
        ClearTarget::Cart => ("cart", cart.cart_unique_count()),
        ClearTarget::Wishlist => ("wishlist", cart.count_wishlist_items()),
    };

    if count == 0 {
        ctx.output.info(&format!("The {} is already empty", name));
        return Ok(());
    }

    if !args.yes && !ctx.output.is_json() {
        let confirmed = Confirm::new()
            .with_prompt(format!("Remove {} entr{} from the {}?", count, if count == 1 { "y" } else { "ies" }, name))
            .default(false)
            .interact()?;

        if !confirmed {
            ctx.output.info("Cancelled");
            return Ok(());
        }
    }

    match args.target {
        ClearTarget::Cart => cart.clear_cart(),
        ClearTarget::Wishlist => cart.clear_wishlist(),
    };

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "cleared": name, "removed": count }));
    } else {
        ctx.output.success(&format!("Cleared the {}", name));
    }
    Ok(())
}
