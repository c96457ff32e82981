//! Import product records exported from the content store.

use std::path::Path;

use anyhow::{Context as _, Result};
use furniro_cart::ProductRecord;
use serde::Deserialize;

use super::ImportArgs;
use crate::context::Context;

#[derive(Deserialize)]
#[serde(untagged)]
enum ProductFile {
    Many(Vec<ProductRecord>),
    One(ProductRecord),
}

/// Run the import command.
pub fn run(args: ImportArgs, ctx: &Context) -> Result<()> {
    let products = read_products(Path::new(&args.path))?;
    ctx.output.debug(&format!("Read {} product(s) from {}", products.len(), args.path));

    let cart = ctx.open_cart()?;
    let mut imported = Vec::new();

    for product in &products {
        let result = if args.wishlist {
            cart.toggle_product_in_wishlist(product)
        } else {
            cart.add_product_to_cart(product, args.quantity)
        };

        match result {
            Ok(_) => {
                if product.has_discount() {
                    if let Some(price) = product.discounted_price(cart.currency()) {
                        ctx.output.debug(&format!(
                            "{} is advertised at {} ({}% off); stored at list price",
                            product.title,
                            price.display(),
                            product.discount_percentage
                        ));
                    }
                }
                imported.push(product.id());
            }
            Err(e) => ctx.output.warn(&format!("Skipped '{}': {}", product.title, e)),
        }
    }

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "imported": imported,
            "skipped": products.len() - imported.len(),
            "summary": cart.summary(),
        }));
    } else {
        let target = if args.wishlist { "wishlist" } else { "cart" };
        ctx.output.success(&format!(
            "Imported {} of {} product(s) into the {}",
            imported.len(),
            products.len(),
            target
        ));
    }
    Ok(())
}

fn read_products(path: &Path) -> Result<Vec<ProductRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read product file: {}", path.display()))?;
    let file: ProductFile = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse product JSON: {}", path.display()))?;

    Ok(match file {
        ProductFile::Many(products) => products,
        ProductFile::One(product) => vec![product],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_single_and_many() {
        let dir = tempfile::tempdir().unwrap();

        let one = dir.path().join("one.json");
        std::fs::write(&one, r#"{"_id": "p1", "title": "Syltherine", "price": 2500000}"#).unwrap();
        let products = read_products(&one).unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].product_id, "p1");

        let many = dir.path().join("many.json");
        std::fs::write(
            &many,
            r#"[
                {"_id": "p1", "title": "Syltherine", "price": 2500},
                {"_id": "p2", "title": "Leviosa", "price": 1500, "dicountPercentage": 30}
            ]"#,
        )
        .unwrap();
        let products = read_products(&many).unwrap();
        assert_eq!(products.len(), 2);
        assert!(products[1].has_discount());
    }

    #[test]
    fn test_read_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(read_products(&path).is_err());
    }
}
